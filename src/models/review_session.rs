//! Review session management for spaced repetition practice.
//! Handles multi-round flashcard review with SM-2 scheduling.

use super::{Flashcard, Grade, ReviewScheduler, Sm2Scheduler};
use crate::database::flashcards::review_flashcard;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// A due card and whether it has been recalled in the current session.
#[derive(Clone, Debug)]
pub struct SessionCard {
    pub flashcard: Flashcard,
    pub passed: bool,
}

/// Manages a review session with multiple rounds.
/// Cards that are graded as a lapse (grade < 3) are repeated in the next round.
pub struct ReviewSession {
    pub cards: Vec<SessionCard>,
    pub current_round_cards: Vec<usize>,
    pub current_index: usize,
    pub show_back: bool,
    pub round_number: usize,
    today: NaiveDate,
    conn: Arc<Mutex<Connection>>,
    scheduler: Box<dyn ReviewScheduler + Send>,
}

impl ReviewSession {
    /// Creates a session over the cards that are due on `today`.
    pub fn new(due_cards: Vec<Flashcard>, today: NaiveDate, conn: Arc<Mutex<Connection>>) -> Self {
        let cards: Vec<SessionCard> = due_cards
            .into_iter()
            .map(|flashcard| SessionCard {
                flashcard,
                passed: false,
            })
            .collect();
        let indices = (0..cards.len()).collect();

        Self {
            cards,
            current_round_cards: indices,
            current_index: 0,
            show_back: false,
            round_number: 1,
            today,
            conn,
            scheduler: Box::new(Sm2Scheduler),
        }
    }

    pub fn current_card(&self) -> Option<&SessionCard> {
        self.current_round_cards
            .get(self.current_index)
            .and_then(|&idx| self.cards.get(idx))
    }

    pub fn toggle_back(&mut self) {
        self.show_back = !self.show_back;
    }

    pub fn next_card(&mut self) {
        if self.current_index + 1 < self.current_round_cards.len() {
            self.current_index += 1;
            self.show_back = false;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with the cards that lapsed in this one.
    /// If none lapsed, the session is complete.
    fn start_next_round(&mut self) {
        let failed: Vec<usize> = self
            .current_round_cards
            .iter()
            .copied()
            .filter(|&idx| self.cards.get(idx).is_some_and(|card| !card.passed))
            .collect();

        if !failed.is_empty() {
            self.current_round_cards = failed;
            self.current_index = 0;
            self.show_back = false;
            self.round_number += 1;
        }
    }

    /// Grades the current card, persists its new schedule and records
    /// whether it passed for this session.
    ///
    /// Fails with `NotFound` once the session has no current card.
    pub fn grade_current_card(&mut self, grade: Grade) -> Result<()> {
        let Some(card) = self
            .current_round_cards
            .get(self.current_index)
            .and_then(|&idx| self.cards.get_mut(idx))
        else {
            warn!("Grade {} ignored: no card is being reviewed", grade.value());
            return Err(Error::not_found("No card is being reviewed"));
        };

        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        let updated = review_flashcard(
            &card.flashcard.front,
            grade,
            self.today,
            self.scheduler.as_ref(),
            &conn,
        )?;

        card.flashcard = updated;
        card.passed = !grade.is_lapse();
        Ok(())
    }

    pub fn passed_count(&self) -> usize {
        self.current_round_cards
            .iter()
            .filter(|&&idx| self.cards.get(idx).is_some_and(|card| card.passed))
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.current_round_cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.passed_count()
    }

    /// True when every card of the current round has been recalled.
    pub fn is_completed(&self) -> bool {
        self.current_round_cards.is_empty() || self.passed_count() == self.total_count()
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} cards", self.round_number, self.total_count())
        } else {
            format!(
                "Round {} (Review): {} cards to retry",
                self.round_number,
                self.total_count()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::test_connection;
    use crate::database::flashcards::{add_flashcard, find_flashcard, get_flashcards_due};
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    fn grade(value: u8) -> Grade {
        Grade::new(value).unwrap()
    }

    fn session_with(fronts: &[&str]) -> (ReviewSession, Arc<Mutex<Connection>>) {
        let conn = test_connection(today());
        for front in fronts {
            add_flashcard(front, "back", today(), &conn).unwrap();
        }
        let due = get_flashcards_due(today(), &conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (ReviewSession::new(due, today(), Arc::clone(&conn)), conn)
    }

    #[test]
    fn test_all_passed_in_first_round() {
        let (mut session, conn) = session_with(&["gato", "perro"]);
        assert_eq!(session.phase_message(), "Round 1: 2 cards");

        session.grade_current_card(grade(5)).unwrap();
        session.next_card();
        session.grade_current_card(grade(4)).unwrap();
        session.next_card();

        assert!(session.is_completed());
        assert_eq!(session.round_number, 1);

        let conn = conn.lock().unwrap();
        let stored = find_flashcard("gato", &conn).unwrap().unwrap();
        assert_eq!(stored.review.repetition_count, 1);
        assert_eq!(stored.review.next_review_on, today() + Days::new(1));
    }

    #[test]
    fn test_lapsed_card_is_repeated() {
        let (mut session, _conn) = session_with(&["gato", "perro"]);

        session.grade_current_card(grade(2)).unwrap();
        session.next_card();
        session.grade_current_card(grade(5)).unwrap();
        session.next_card();

        assert!(!session.is_completed());
        assert_eq!(session.round_number, 2);
        assert_eq!(session.total_count(), 1);
        assert_eq!(session.remaining_count(), 1);
        assert_eq!(session.current_card().unwrap().flashcard.front, "gato");
        assert_eq!(session.phase_message(), "Round 2 (Review): 1 cards to retry");

        session.grade_current_card(grade(4)).unwrap();
        session.next_card();
        assert!(session.is_completed());
    }

    #[test]
    fn test_toggle_back_resets_on_next_card() {
        let (mut session, _conn) = session_with(&["gato", "perro"]);
        session.toggle_back();
        assert!(session.show_back);

        session.grade_current_card(grade(5)).unwrap();
        session.next_card();
        assert!(!session.show_back);
    }

    #[test]
    fn test_empty_session_is_completed() {
        let (session, _conn) = session_with(&[]);
        assert!(session.is_completed());
        assert!(session.current_card().is_none());
    }

    #[test]
    fn test_grading_without_current_card_fails() {
        let (mut session, _conn) = session_with(&["gato"]);
        session.grade_current_card(grade(5)).unwrap();
        session.next_card();
        assert!(session.is_completed());

        assert!(matches!(
            session.grade_current_card(grade(5)),
            Err(Error::NotFound(_))
        ));

        let (mut empty, _conn) = session_with(&[]);
        assert!(matches!(
            empty.grade_current_card(grade(3)),
            Err(Error::NotFound(_))
        ));
    }
}
