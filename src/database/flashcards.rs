//! Flashcard persistence and the review service that wraps the SM-2 scheduler.

use super::db::uuid_column;
use crate::error::{Error, Result};
use crate::models::{Flashcard, Grade, ReviewScheduler, ReviewState};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};
use uuid::Uuid;

const FLASHCARD_COLUMNS: &str =
    "id, front, back, repetition_count, easiness_factor, interval_days, next_review_on";

/// Lookup key for a front: trimmed and lowercased, so accented letters fold too.
pub fn front_key(front: &str) -> String {
    front.trim().to_lowercase()
}

/// Creates a new, never-reviewed flashcard due on `today`.
///
/// Fronts are unique regardless of case.
pub fn add_flashcard(
    front: &str,
    back: &str,
    today: NaiveDate,
    conn: &Connection,
) -> Result<Flashcard> {
    let card = Flashcard::new(front.trim(), back.trim(), today);
    insert_flashcard(&card, conn)?;
    info!("Flashcard '{}' created", card.front);
    Ok(card)
}

/// Stores a card as-is, scheduling state included.
pub fn insert_flashcard(card: &Flashcard, conn: &Connection) -> Result<()> {
    if card.front.trim().is_empty() || card.back.trim().is_empty() {
        return Err(Error::invalid_input("Flashcard front and back must not be blank"));
    }
    card.review.validate()?;
    if find_flashcard(&card.front, conn)?.is_some() {
        return Err(Error::AlreadyExists(format!(
            "Flashcard \"{}\"",
            card.front
        )));
    }

    conn.execute(
        "INSERT INTO flashcards (id, front, front_key, back, repetition_count, easiness_factor, interval_days, next_review_on)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            card.id.to_string(),
            card.front,
            front_key(&card.front),
            card.back,
            card.review.repetition_count,
            card.review.easiness_factor,
            card.review.interval_days,
            card.review.next_review_on,
        ],
    )?;
    Ok(())
}

pub fn get_all_flashcards(conn: &Connection) -> Result<Vec<Flashcard>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM flashcards ORDER BY front_key",
        FLASHCARD_COLUMNS
    ))?;
    let cards = stmt
        .query_map([], flashcard_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

/// Retrieves flashcards due for review
///
/// Returns cards whose next review date is on or before `today`,
/// ordered by next review date (oldest first).
pub fn get_flashcards_due(today: NaiveDate, conn: &Connection) -> Result<Vec<Flashcard>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM flashcards
         WHERE next_review_on <= ?1
         ORDER BY next_review_on ASC, front_key",
        FLASHCARD_COLUMNS
    ))?;
    let cards = stmt
        .query_map(params![today], flashcard_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    debug!("{} flashcards due on {}", cards.len(), today);
    Ok(cards)
}

/// Case-insensitive lookup by front
pub fn find_flashcard(front: &str, conn: &Connection) -> Result<Option<Flashcard>> {
    let card = conn
        .query_row(
            &format!("SELECT {} FROM flashcards WHERE front_key = ?1", FLASHCARD_COLUMNS),
            params![front_key(front)],
            flashcard_from_row,
        )
        .optional()?;
    Ok(card)
}

/// Overwrites the scheduling state of a flashcard
pub fn update_review_state(id: Uuid, state: &ReviewState, conn: &Connection) -> Result<()> {
    let updated = conn.execute(
        "UPDATE flashcards
         SET repetition_count = ?1, easiness_factor = ?2, interval_days = ?3, next_review_on = ?4
         WHERE id = ?5",
        params![
            state.repetition_count,
            state.easiness_factor,
            state.interval_days,
            state.next_review_on,
            id.to_string(),
        ],
    )?;

    if updated == 0 {
        return Err(Error::not_found(format!("Flashcard {}", id)));
    }
    Ok(())
}

/// Grades the card with the given front and stores its rescheduled state.
pub fn review_flashcard(
    front: &str,
    grade: Grade,
    today: NaiveDate,
    scheduler: &dyn ReviewScheduler,
    conn: &Connection,
) -> Result<Flashcard> {
    let tx = conn.unchecked_transaction()?;

    let mut card = find_flashcard(front, &tx)?
        .ok_or_else(|| Error::not_found(format!("Flashcard \"{}\"", front.trim())))?;
    card.review = scheduler.review(&card.review, grade, today);
    update_review_state(card.id, &card.review, &tx)?;

    tx.commit()?;
    info!(
        "Flashcard '{}' graded {}, next review on {} ({} days)",
        card.front,
        grade.value(),
        card.review.next_review_on,
        card.review.interval_days
    );
    Ok(card)
}

pub fn delete_flashcard(front: &str, conn: &Connection) -> Result<()> {
    let deleted = conn.execute(
        "DELETE FROM flashcards WHERE front_key = ?1",
        params![front_key(front)],
    )?;
    if deleted == 0 {
        return Err(Error::not_found(format!("Flashcard \"{}\"", front.trim())));
    }
    info!("Flashcard '{}' deleted", front.trim());
    Ok(())
}

fn flashcard_from_row(row: &Row<'_>) -> rusqlite::Result<Flashcard> {
    Ok(Flashcard {
        id: uuid_column(row, 0)?,
        front: row.get(1)?,
        back: row.get(2)?,
        review: ReviewState {
            repetition_count: row.get(3)?,
            easiness_factor: row.get(4)?,
            interval_days: row.get(5)?,
            next_review_on: row.get(6)?,
        },
    })
}
