//! Database connection, schema and simulated calendar
//!
//! Handles SQLite initialization for flashcards, exercises and workouts, and
//! the persisted "current date" the review schedule is computed against.

use crate::error::{Error, Result};
use chrono::{Days, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

const CURRENT_DATE_KEY: &str = "current_date";

/// Opens (or creates) the database at `path` and makes sure the schema exists.
///
/// The simulated current date starts at `today` the first time the file is created.
pub fn open_database(path: &Path, today: NaiveDate) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    init_database(&conn, today)?;
    info!("Opened database at {}", path.display());
    Ok(conn)
}

/// Creates all tables if missing and seeds the current date. Safe to call repeatedly.
pub fn init_database(conn: &Connection, today: NaiveDate) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS flashcards (
            id TEXT PRIMARY KEY,
            front TEXT NOT NULL,
            front_key TEXT NOT NULL UNIQUE,
            back TEXT NOT NULL,
            repetition_count INTEGER NOT NULL DEFAULT 0,
            easiness_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 1,
            next_review_on TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS exercises (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            normalized_name TEXT NOT NULL UNIQUE,
            muscle_group TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS workouts (
            id TEXT PRIMARY KEY,
            performed_on TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS workout_sets (
            workout_id TEXT NOT NULL,
            set_order INTEGER NOT NULL,
            exercise_id TEXT NOT NULL,
            weight_kg REAL NOT NULL,
            reps INTEGER NOT NULL,
            PRIMARY KEY (workout_id, set_order),
            FOREIGN KEY (workout_id) REFERENCES workouts(id) ON DELETE CASCADE,
            FOREIGN KEY (exercise_id) REFERENCES exercises(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_workout_sets_exercise ON workout_sets(exercise_id);
        CREATE INDEX IF NOT EXISTS idx_flashcards_next_review ON flashcards(next_review_on);",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES (?1, ?2)",
        params![CURRENT_DATE_KEY, today],
    )?;

    debug!("Database schema ready");
    Ok(())
}

/// Retrieves the simulated current date
pub fn get_current_date(conn: &Connection) -> Result<NaiveDate> {
    let date = conn.query_row(
        "SELECT value FROM app_state WHERE key = ?1",
        params![CURRENT_DATE_KEY],
        |row| row.get(0),
    )?;
    Ok(date)
}

pub fn set_current_date(date: NaiveDate, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO app_state (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![CURRENT_DATE_KEY, date],
    )?;
    Ok(())
}

/// Moves the simulated current date one day forward and returns it
pub fn advance_day(conn: &Connection) -> Result<NaiveDate> {
    let next_day = get_current_date(conn)?
        .checked_add_days(Days::new(1))
        .ok_or_else(|| Error::invalid_input("Current date cannot be advanced further"))?;
    set_current_date(next_day, conn)?;
    info!("Advanced current date to {}", next_day);
    Ok(next_day)
}

/// Reads a UUID stored as text.
pub(crate) fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
pub(crate) fn test_connection(today: NaiveDate) -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_database(&conn, today).unwrap();
    conn
}
