//! Scheduling facts for one flashcard and the recall grade fed to the scheduler.
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const INITIAL_EASINESS_FACTOR: f64 = 2.5;
pub const MIN_EASINESS_FACTOR: f64 = 1.3;

/// Immutable SM-2 state. Every review produces a new value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Consecutive successful reviews since the last lapse
    pub repetition_count: u32,
    pub easiness_factor: f64,
    pub interval_days: u32,
    pub next_review_on: NaiveDate,
}

impl ReviewState {
    /// State of a card that has never been reviewed; it is due on the day it was created.
    pub fn new(created_on: NaiveDate) -> Self {
        Self {
            repetition_count: 0,
            easiness_factor: INITIAL_EASINESS_FACTOR,
            interval_days: 1,
            next_review_on: created_on,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review_on <= today
    }

    /// Checks state loaded from outside the scheduler (e.g. an imported file).
    pub fn validate(&self) -> Result<()> {
        if self.easiness_factor.is_nan() || self.easiness_factor < MIN_EASINESS_FACTOR {
            return Err(Error::invalid_input(format!(
                "Easiness factor must be at least {}, got {}",
                MIN_EASINESS_FACTOR, self.easiness_factor
            )));
        }
        if self.interval_days < 1 {
            return Err(Error::invalid_input("Interval must be at least 1 day"));
        }
        Ok(())
    }
}

/// Recall quality, 0 (blackout) to 5 (perfect).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MAX: u8 = 5;
    /// Lowest grade that counts as a successful recall.
    pub const PASSING: u8 = 3;

    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(Error::invalid_input(format!(
                "Grade must be between 0 and {}, got {}",
                Self::MAX,
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_lapse(self) -> bool {
        self.0 < Self::PASSING
    }

    /// All grades, lowest first, with the label shown on the grading buttons.
    pub fn all() -> impl Iterator<Item = (Grade, &'static str)> {
        [
            "Blackout",
            "Wrong",
            "Wrong (familiar)",
            "Difficult",
            "Correct",
            "Perfect",
        ]
        .into_iter()
        .enumerate()
        .map(|(i, label)| (Grade(i as u8), label))
    }
}

impl TryFrom<u8> for Grade {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let created = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
        let state = ReviewState::new(created);

        assert_eq!(state.repetition_count, 0);
        assert_eq!(state.easiness_factor, 2.5);
        assert_eq!(state.interval_days, 1);
        assert_eq!(state.next_review_on, created);
        assert!(state.is_due(created));
        assert!(!state.is_due(created.pred_opt().unwrap()));
    }

    #[test]
    fn test_validate() {
        let created = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
        let fresh = ReviewState::new(created);
        assert!(fresh.validate().is_ok());

        let low_ef = ReviewState {
            easiness_factor: 1.2,
            ..fresh
        };
        assert!(low_ef.validate().is_err());

        let no_interval = ReviewState {
            interval_days: 0,
            ..fresh
        };
        assert!(no_interval.validate().is_err());
    }

    #[test]
    fn test_grade_bounds() {
        assert!(Grade::new(0).is_ok());
        assert!(Grade::new(5).is_ok());
        assert!(matches!(Grade::new(6), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_grade_lapse_threshold() {
        assert!(Grade::new(2).unwrap().is_lapse());
        assert!(!Grade::new(3).unwrap().is_lapse());
        assert_eq!(Grade::all().count(), 6);
    }

    #[test]
    fn test_grade_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<Grade>("4").is_ok());
        assert!(serde_json::from_str::<Grade>("9").is_err());
    }
}
