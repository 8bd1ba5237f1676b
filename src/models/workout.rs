//! Exercises, workouts and the sets logged in them.
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_SET_WEIGHT_KG: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub muscle_group: String,
}

/// One training session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub performed_on: NaiveDate,
    pub sets: Vec<WorkoutSet>,
}

/// A set inside a workout, keyed by its `order` within that workout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub order: u32,
    pub exercise_id: Uuid,
    pub weight_kg: f64,
    pub reps: u32,
}

impl WorkoutSet {
    pub fn validate(&self) -> Result<()> {
        if !self.weight_kg.is_finite() || self.weight_kg < MIN_SET_WEIGHT_KG {
            return Err(Error::invalid_input(format!(
                "Set {} weight must be at least {} kg, got {}",
                self.order, MIN_SET_WEIGHT_KG, self.weight_kg
            )));
        }
        if self.reps < 1 {
            return Err(Error::invalid_input(format!(
                "Set {} must have at least 1 rep",
                self.order
            )));
        }
        Ok(())
    }
}

/// Canonical form of an exercise name used for uniqueness and lookups:
/// lowercase with everything but ASCII letters and digits stripped.
pub fn normalize_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
