//! Exercises, workouts and the strength analytics queries built on them.

use super::db::uuid_column;
use crate::analytics::{
    OneRepMaxFormula, OneRepMaxPoint, OverloadTrendAnalyzer, SetSample, TrendMetric,
    one_rep_max_series,
};
use crate::error::{Error, Result};
use crate::models::workout::normalize_name;
use crate::models::{Exercise, Workout, WorkoutSet};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

pub fn add_exercise(name: &str, muscle_group: &str, conn: &Connection) -> Result<Exercise> {
    let (name, muscle_group) = (name.trim(), muscle_group.trim());
    let normalized = normalize_name(name);
    if normalized.is_empty() || muscle_group.is_empty() {
        return Err(Error::invalid_input(
            "Exercise name and muscle group must not be blank",
        ));
    }
    if find_exercise_by_name(name, conn)?.is_some() {
        return Err(Error::AlreadyExists(format!("Exercise \"{}\"", name)));
    }

    let exercise = Exercise {
        id: Uuid::new_v4(),
        name: name.to_string(),
        muscle_group: muscle_group.to_string(),
    };
    conn.execute(
        "INSERT INTO exercises (id, name, normalized_name, muscle_group) VALUES (?1, ?2, ?3, ?4)",
        params![
            exercise.id.to_string(),
            exercise.name,
            normalized,
            exercise.muscle_group
        ],
    )?;

    info!("Exercise '{}' created", exercise.name);
    Ok(exercise)
}

pub fn get_all_exercises(conn: &Connection) -> Result<Vec<Exercise>> {
    let mut stmt =
        conn.prepare("SELECT id, name, muscle_group FROM exercises ORDER BY normalized_name")?;
    let exercises = stmt
        .query_map([], |row| {
            Ok(Exercise {
                id: uuid_column(row, 0)?,
                name: row.get(1)?,
                muscle_group: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(exercises)
}

/// Looks an exercise up by its normalized name, so "Bench Press" finds "bench-press".
pub fn find_exercise_by_name(name: &str, conn: &Connection) -> Result<Option<Exercise>> {
    let exercise = conn
        .query_row(
            "SELECT id, name, muscle_group FROM exercises WHERE normalized_name = ?1",
            params![normalize_name(name)],
            |row| {
                Ok(Exercise {
                    id: uuid_column(row, 0)?,
                    name: row.get(1)?,
                    muscle_group: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(exercise)
}

/// Deletes an exercise together with every set logged for it
pub fn delete_exercise(id: Uuid, conn: &Connection) -> Result<()> {
    let deleted = conn.execute("DELETE FROM exercises WHERE id = ?1", params![id.to_string()])?;
    if deleted == 0 {
        return Err(Error::not_found(format!("Exercise {}", id)));
    }
    info!("Exercise {} deleted", id);
    Ok(())
}

/// Logs a workout with its sets in one transaction.
pub fn create_workout(
    performed_on: NaiveDate,
    sets: &[WorkoutSet],
    conn: &Connection,
) -> Result<Workout> {
    let tx = conn.unchecked_transaction()?;
    let workout = insert_workout(performed_on, sets, &tx)?;
    tx.commit()?;
    Ok(workout)
}

/// Writes a workout without opening a transaction of its own, for callers
/// that already hold one.
pub(crate) fn insert_workout(
    performed_on: NaiveDate,
    sets: &[WorkoutSet],
    conn: &Connection,
) -> Result<Workout> {
    let mut orders = HashSet::new();
    for set in sets {
        set.validate()?;
        if !orders.insert(set.order) {
            return Err(Error::invalid_input(format!(
                "Set order {} is used twice",
                set.order
            )));
        }
    }

    let workout = Workout {
        id: Uuid::new_v4(),
        performed_on,
        sets: sets.to_vec(),
    };

    conn.execute(
        "INSERT INTO workouts (id, performed_on) VALUES (?1, ?2)",
        params![workout.id.to_string(), workout.performed_on],
    )?;
    for set in &workout.sets {
        insert_set(workout.id, set, conn)?;
    }

    info!(
        "Workout {} on {} logged with {} sets",
        workout.id,
        workout.performed_on,
        workout.sets.len()
    );
    Ok(workout)
}

pub fn add_set_to_workout(workout_id: Uuid, set: &WorkoutSet, conn: &Connection) -> Result<()> {
    set.validate()?;
    if !workout_exists(workout_id, conn)? {
        return Err(Error::not_found(format!("Workout {}", workout_id)));
    }

    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM workout_sets WHERE workout_id = ?1 AND set_order = ?2)",
        params![workout_id.to_string(), set.order],
        |row| row.get(0),
    )?;
    if taken {
        return Err(Error::AlreadyExists(format!(
            "Set {} of workout {}",
            set.order, workout_id
        )));
    }

    insert_set(workout_id, set, conn)?;
    info!("Set {} added to workout {}", set.order, workout_id);
    Ok(())
}

pub fn get_workout(id: Uuid, conn: &Connection) -> Result<Workout> {
    let performed_on: NaiveDate = conn
        .query_row(
            "SELECT performed_on FROM workouts WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| Error::not_found(format!("Workout {}", id)))?;

    Ok(Workout {
        id,
        performed_on,
        sets: get_sets(id, conn)?,
    })
}

/// All workouts with their sets, most recent first
pub fn get_all_workouts(conn: &Connection) -> Result<Vec<Workout>> {
    let mut stmt =
        conn.prepare("SELECT id, performed_on FROM workouts ORDER BY performed_on DESC, id DESC")?;
    let headers = stmt
        .query_map([], |row| {
            Ok((uuid_column(row, 0)?, row.get::<_, NaiveDate>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    headers
        .into_iter()
        .map(|(id, performed_on)| {
            Ok(Workout {
                id,
                performed_on,
                sets: get_sets(id, conn)?,
            })
        })
        .collect()
}

pub fn delete_workout(id: Uuid, conn: &Connection) -> Result<()> {
    let deleted = conn.execute("DELETE FROM workouts WHERE id = ?1", params![id.to_string()])?;
    if deleted == 0 {
        return Err(Error::not_found(format!("Workout {}", id)));
    }
    info!("Workout {} deleted", id);
    Ok(())
}

/// Every set of `exercise_id` from its `last_n` most recent sessions.
///
/// Sessions are ordered the same way the trend analyzer orders them
/// (date, then id), so the analyzer's own window is a no-op on this input.
pub fn recent_samples(exercise_id: Uuid, last_n: usize, conn: &Connection) -> Result<Vec<SetSample>> {
    let limit = i64::try_from(last_n).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(
        "SELECT w.id, w.performed_on, ws.weight_kg, ws.reps
         FROM workout_sets ws
         JOIN workouts w ON w.id = ws.workout_id
         WHERE ws.exercise_id = ?1
           AND w.id IN (
               SELECT w2.id
               FROM workouts w2
               JOIN workout_sets s2 ON s2.workout_id = w2.id
               WHERE s2.exercise_id = ?1
               GROUP BY w2.id
               ORDER BY w2.performed_on DESC, w2.id DESC
               LIMIT ?2
           )
         ORDER BY w.performed_on ASC, ws.set_order ASC",
    )?;

    let samples = stmt
        .query_map(params![exercise_id.to_string(), limit], |row| {
            Ok(SetSample {
                session_id: uuid_column(row, 0)?,
                session_date: row.get(1)?,
                weight: row.get(2)?,
                reps: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(
        "Fetched {} sets for exercise {} (last {} sessions)",
        samples.len(),
        exercise_id,
        last_n
    );
    Ok(samples)
}

/// Estimated 1RM of the top set in each of the last `last_n` sessions, oldest first.
pub fn one_rep_max_stats(
    exercise_id: Uuid,
    last_n: usize,
    formula: OneRepMaxFormula,
    conn: &Connection,
) -> Result<Vec<OneRepMaxPoint>> {
    let samples = recent_samples(exercise_id, last_n, conn)?;
    one_rep_max_series(&samples, last_n, formula)
}

/// Slope of `metric` across the last `last_n` sessions of an exercise.
pub fn overload_trend(
    exercise_id: Uuid,
    last_n: usize,
    metric: TrendMetric,
    conn: &Connection,
) -> Result<f64> {
    let samples = recent_samples(exercise_id, last_n, conn)?;
    let slope = OverloadTrendAnalyzer::new(metric).trend(&samples, last_n)?;
    debug!("Overload trend for exercise {}: {:.3}", exercise_id, slope);
    Ok(slope)
}

fn workout_exists(id: Uuid, conn: &Connection) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM workouts WHERE id = ?1)",
        params![id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn insert_set(workout_id: Uuid, set: &WorkoutSet, conn: &Connection) -> Result<()> {
    let known: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM exercises WHERE id = ?1)",
        params![set.exercise_id.to_string()],
        |row| row.get(0),
    )?;
    if !known {
        return Err(Error::not_found(format!("Exercise {}", set.exercise_id)));
    }

    conn.execute(
        "INSERT INTO workout_sets (workout_id, set_order, exercise_id, weight_kg, reps)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            workout_id.to_string(),
            set.order,
            set.exercise_id.to_string(),
            set.weight_kg,
            set.reps
        ],
    )?;
    Ok(())
}

fn get_sets(workout_id: Uuid, conn: &Connection) -> Result<Vec<WorkoutSet>> {
    let mut stmt = conn.prepare(
        "SELECT set_order, exercise_id, weight_kg, reps
         FROM workout_sets WHERE workout_id = ?1 ORDER BY set_order",
    )?;
    let sets = stmt
        .query_map(params![workout_id.to_string()], |row| {
            Ok(WorkoutSet {
                order: row.get(0)?,
                exercise_id: uuid_column(row, 1)?,
                weight_kg: row.get(2)?,
                reps: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::compute_trend;
    use crate::database::db::test_connection;
    use chrono::Days;

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap() + Days::new(offset)
    }

    fn set(order: u32, exercise: &Exercise, weight_kg: f64, reps: u32) -> WorkoutSet {
        WorkoutSet {
            order,
            exercise_id: exercise.id,
            weight_kg,
            reps,
        }
    }

    #[test]
    fn test_exercise_names_are_normalized() {
        let conn = test_connection(day(0));
        let bench = add_exercise("Bench Press", "Chest", &conn).unwrap();

        assert_eq!(find_exercise_by_name("bench-press", &conn).unwrap(), Some(bench));
        assert!(matches!(
            add_exercise("BENCH press", "Chest", &conn),
            Err(Error::AlreadyExists(_))
        ));
        assert!(matches!(
            add_exercise("!!", "Chest", &conn),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_create_and_get_workout() {
        let conn = test_connection(day(0));
        let squat = add_exercise("Squat", "Legs", &conn).unwrap();
        let bench = add_exercise("Bench Press", "Chest", &conn).unwrap();

        let workout = create_workout(
            day(0),
            &[set(0, &squat, 100.0, 5), set(1, &bench, 70.0, 8)],
            &conn,
        )
        .unwrap();

        let loaded = get_workout(workout.id, &conn).unwrap();
        assert_eq!(loaded, workout);

        add_set_to_workout(workout.id, &set(2, &squat, 110.0, 3), &conn).unwrap();
        assert_eq!(get_workout(workout.id, &conn).unwrap().sets.len(), 3);
        assert!(matches!(
            add_set_to_workout(workout.id, &set(2, &squat, 90.0, 3), &conn),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_create_workout_validation() {
        let conn = test_connection(day(0));
        let squat = add_exercise("Squat", "Legs", &conn).unwrap();

        assert!(create_workout(day(0), &[set(0, &squat, 0.0, 5)], &conn).is_err());
        assert!(create_workout(day(0), &[set(0, &squat, 60.0, 0)], &conn).is_err());
        assert!(
            create_workout(
                day(0),
                &[set(0, &squat, 60.0, 5), set(0, &squat, 70.0, 5)],
                &conn
            )
            .is_err()
        );

        let unknown = Exercise {
            id: Uuid::new_v4(),
            name: "Ghost".to_string(),
            muscle_group: "None".to_string(),
        };
        assert!(matches!(
            create_workout(day(0), &[set(0, &unknown, 60.0, 5)], &conn),
            Err(Error::NotFound(_))
        ));
        // Failed transactions leave nothing behind
        assert!(get_all_workouts(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_delete_workout_and_exercise() {
        let conn = test_connection(day(0));
        let squat = add_exercise("Squat", "Legs", &conn).unwrap();
        let workout = create_workout(day(0), &[set(0, &squat, 100.0, 5)], &conn).unwrap();

        delete_exercise(squat.id, &conn).unwrap();
        assert!(get_workout(workout.id, &conn).unwrap().sets.is_empty());

        delete_workout(workout.id, &conn).unwrap();
        assert!(matches!(
            get_workout(workout.id, &conn),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            delete_workout(workout.id, &conn),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_recent_samples_window() {
        let conn = test_connection(day(0));
        let squat = add_exercise("Squat", "Legs", &conn).unwrap();
        let bench = add_exercise("Bench Press", "Chest", &conn).unwrap();

        for (i, weight) in [100.0, 90.0, 80.0, 85.0, 90.0].into_iter().enumerate() {
            create_workout(
                day(i as u64),
                &[
                    set(0, &squat, weight, 5),
                    set(1, &squat, weight - 20.0, 10),
                    set(2, &bench, 60.0, 8),
                ],
                &conn,
            )
            .unwrap();
        }

        let samples = recent_samples(squat.id, 3, &conn).unwrap();
        assert_eq!(samples.len(), 6);
        assert!(samples.iter().all(|s| s.session_date >= day(2)));

        let slope = overload_trend(squat.id, 3, TrendMetric::TopSetWeight, &conn).unwrap();
        assert!((slope - 5.0).abs() < 1e-9);
        assert_eq!(slope, compute_trend(&samples, 3));

        let all = overload_trend(squat.id, 10, TrendMetric::TopSetWeight, &conn).unwrap();
        assert!(all < 0.0);
    }

    #[test]
    fn test_one_rep_max_stats() {
        let conn = test_connection(day(0));
        let squat = add_exercise("Squat", "Legs", &conn).unwrap();
        create_workout(day(1), &[set(0, &squat, 100.0, 5)], &conn).unwrap();
        create_workout(day(0), &[set(0, &squat, 120.0, 1), set(1, &squat, 80.0, 10)], &conn)
            .unwrap();

        let points = one_rep_max_stats(squat.id, 3, OneRepMaxFormula::Epley, &conn).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].performed_on, day(0));
        assert_eq!(points[0].one_rep_max, 120.0);
        assert!((points[1].one_rep_max - 116.667).abs() < 1e-3);
    }

    #[test]
    fn test_trend_without_sessions() {
        let conn = test_connection(day(0));
        let squat = add_exercise("Squat", "Legs", &conn).unwrap();
        assert_eq!(
            overload_trend(squat.id, 3, TrendMetric::TopSetWeight, &conn).unwrap(),
            0.0
        );
        assert!(one_rep_max_stats(squat.id, 3, OneRepMaxFormula::Epley, &conn)
            .unwrap()
            .is_empty());
    }
}
