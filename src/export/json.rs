//! JSON import/export for flashcards and the workout log.
//! Flashcards keep their scheduling state; workouts are re-keyed on import.

use crate::database::{flashcards, workouts};
use crate::error::{Error, Result};
use crate::models::{Exercise, Flashcard, Workout, WorkoutSet};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlashcardExport {
    pub flashcards: Vec<Flashcard>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub exercises: Vec<Exercise>,
    pub workouts: Vec<Workout>,
}

/// Outcome of importing a file into the database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

pub fn export_flashcards_to_path(cards: &[Flashcard], path: &Path) -> Result<()> {
    write_json(
        &FlashcardExport {
            flashcards: cards.to_vec(),
        },
        path,
    )?;
    info!("Exported {} flashcards to {}", cards.len(), path.display());
    Ok(())
}

pub fn import_flashcards(path: &Path) -> Result<FlashcardExport> {
    read_json(path)
}

/// Adds every card from the file whose front is not taken yet.
///
/// All or nothing: an invalid card rolls back the whole import.
pub fn import_flashcards_into(path: &Path, conn: &Connection) -> Result<ImportSummary> {
    let export = import_flashcards(path)?;
    let mut summary = ImportSummary::default();

    let tx = conn.unchecked_transaction()?;
    for card in &export.flashcards {
        match flashcards::insert_flashcard(card, &tx) {
            Ok(()) => summary.added += 1,
            Err(Error::AlreadyExists(_)) => {
                warn!("Skipping flashcard '{}': already exists", card.front);
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    tx.commit()?;

    info!(
        "Imported {} flashcards from {} ({} skipped)",
        summary.added,
        path.display(),
        summary.skipped
    );
    Ok(summary)
}

pub fn export_workout_log_to_path(conn: &Connection, path: &Path) -> Result<WorkoutLog> {
    let log = WorkoutLog {
        exercises: workouts::get_all_exercises(conn)?,
        workouts: workouts::get_all_workouts(conn)?,
    };
    write_json(&log, path)?;
    info!(
        "Exported {} workouts to {}",
        log.workouts.len(),
        path.display()
    );
    Ok(log)
}

pub fn import_workout_log(path: &Path) -> Result<WorkoutLog> {
    read_json(path)
}

/// Recreates the logged workouts from a file.
///
/// Exercises are matched by name; unknown ones are created. Every workout is
/// stored under a new id, so importing the same file twice duplicates it.
/// Nothing is kept if any record fails.
pub fn import_workout_log_into(path: &Path, conn: &Connection) -> Result<ImportSummary> {
    let log = import_workout_log(path)?;

    let tx = conn.unchecked_transaction()?;
    let mut exercise_ids = HashMap::new();
    for exercise in &log.exercises {
        let local = match workouts::find_exercise_by_name(&exercise.name, &tx)? {
            Some(existing) => existing,
            None => workouts::add_exercise(&exercise.name, &exercise.muscle_group, &tx)?,
        };
        exercise_ids.insert(exercise.id, local.id);
    }

    let mut summary = ImportSummary::default();
    for workout in &log.workouts {
        let sets = workout
            .sets
            .iter()
            .map(|set| {
                let exercise_id = exercise_ids.get(&set.exercise_id).copied().ok_or_else(|| {
                    Error::invalid_input(format!(
                        "Workout {} references unknown exercise {}",
                        workout.id, set.exercise_id
                    ))
                })?;
                Ok(WorkoutSet {
                    exercise_id,
                    ..set.clone()
                })
            })
            .collect::<Result<Vec<_>>>()?;

        workouts::insert_workout(workout.performed_on, &sets, &tx)?;
        summary.added += 1;
    }
    tx.commit()?;

    info!("Imported {} workouts from {}", summary.added, path.display());
    Ok(summary)
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(value)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::test_connection;
    use crate::models::{Grade, Sm2Scheduler};
    use chrono::NaiveDate;
    use std::fs;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hobbyhub-{}-{}.json", name, Uuid::new_v4()))
    }

    #[test]
    fn test_flashcards_keep_schedule_across_export() {
        let source = test_connection(today());
        flashcards::add_flashcard("hola", "hello", today(), &source).unwrap();
        flashcards::add_flashcard("gato", "cat", today(), &source).unwrap();
        flashcards::review_flashcard(
            "hola",
            Grade::new(5).unwrap(),
            today(),
            &Sm2Scheduler,
            &source,
        )
        .unwrap();

        let path = temp_path("flashcards");
        let cards = flashcards::get_all_flashcards(&source).unwrap();
        export_flashcards_to_path(&cards, &path).unwrap();

        let target = test_connection(today());
        flashcards::add_flashcard("gato", "cat", today(), &target).unwrap();
        let summary = import_flashcards_into(&path, &target).unwrap();
        assert_eq!(summary, ImportSummary { added: 1, skipped: 1 });

        let imported = flashcards::find_flashcard("hola", &target).unwrap().unwrap();
        let original = flashcards::find_flashcard("hola", &source).unwrap().unwrap();
        assert_eq!(imported.review, original.review);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_import_rejects_invalid_state() {
        let path = temp_path("bad-state");
        fs::write(
            &path,
            r#"{
  "flashcards": [
    {
      "id": "6f1c2a4e-8a35-4c0e-9d8e-2a1f3b4c5d6e",
      "front": "hola",
      "back": "hello",
      "review": {
        "repetition_count": 2,
        "easiness_factor": 0.5,
        "interval_days": 6,
        "next_review_on": "2025-05-26"
      }
    }
  ]
}"#,
        )
        .unwrap();

        let conn = test_connection(today());
        assert!(matches!(
            import_flashcards_into(&path, &conn),
            Err(Error::InvalidInput(_))
        ));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_workout_log_roundtrip_into_new_database() {
        let source = test_connection(today());
        let squat = workouts::add_exercise("Squat", "Legs", &source).unwrap();
        workouts::create_workout(
            today(),
            &[WorkoutSet {
                order: 0,
                exercise_id: squat.id,
                weight_kg: 100.0,
                reps: 5,
            }],
            &source,
        )
        .unwrap();

        let path = temp_path("workouts");
        export_workout_log_to_path(&source, &path).unwrap();

        let target = test_connection(today());
        let existing = workouts::add_exercise("squat", "Legs", &target).unwrap();
        let summary = import_workout_log_into(&path, &target).unwrap();
        assert_eq!(summary.added, 1);

        let imported = workouts::get_all_workouts(&target).unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].performed_on, today());
        assert_eq!(imported[0].sets[0].exercise_id, existing.id);
        assert_eq!(workouts::get_all_exercises(&target).unwrap().len(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_flashcard_import_adds_nothing() {
        let source = test_connection(today());
        flashcards::add_flashcard("hola", "hello", today(), &source).unwrap();
        let mut cards = flashcards::get_all_flashcards(&source).unwrap();
        let mut broken = Flashcard::new("gato", "cat", today());
        broken.review.easiness_factor = 1.0;
        cards.push(broken);

        let path = temp_path("partial-flashcards");
        export_flashcards_to_path(&cards, &path).unwrap();

        let target = test_connection(today());
        assert!(matches!(
            import_flashcards_into(&path, &target),
            Err(Error::InvalidInput(_))
        ));
        assert!(flashcards::get_all_flashcards(&target).unwrap().is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_workout_import_adds_nothing() {
        let squat_id = Uuid::new_v4();
        let log = WorkoutLog {
            exercises: vec![Exercise {
                id: squat_id,
                name: "Squat".to_string(),
                muscle_group: "Legs".to_string(),
            }],
            workouts: vec![
                Workout {
                    id: Uuid::new_v4(),
                    performed_on: today(),
                    sets: vec![WorkoutSet {
                        order: 0,
                        exercise_id: squat_id,
                        weight_kg: 100.0,
                        reps: 5,
                    }],
                },
                Workout {
                    id: Uuid::new_v4(),
                    performed_on: today(),
                    sets: vec![WorkoutSet {
                        order: 0,
                        exercise_id: Uuid::new_v4(),
                        weight_kg: 60.0,
                        reps: 8,
                    }],
                },
            ],
        };
        let path = temp_path("partial-workouts");
        write_json(&log, &path).unwrap();

        let conn = test_connection(today());
        assert!(matches!(
            import_workout_log_into(&path, &conn),
            Err(Error::InvalidInput(_))
        ));
        assert!(workouts::get_all_workouts(&conn).unwrap().is_empty());
        assert!(workouts::get_all_exercises(&conn).unwrap().is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_flashcards(Path::new("nonexistent_file_xyz123.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let path = temp_path("invalid");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(import_workout_log(&path), Err(Error::Json(_))));

        let _ = fs::remove_file(&path);
    }
}
