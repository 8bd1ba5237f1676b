//! SM-2 (SuperMemo 2) spaced repetition algorithm implementation.
//!
//! The SM-2 algorithm calculates review intervals based on recall quality:
//! - Each card has an easiness factor (EF) that adjusts based on performance
//! - Grades 0-2: the card lapses, repetitions reset and it comes back tomorrow
//! - Grades 3-5: the interval grows (1 day → 6 days → previous interval × EF)
//! - EF is adjusted after every review, lapses included, and never drops below 1.3

use super::review_state::{Grade, MIN_EASINESS_FACTOR, ReviewState};
use chrono::{Days, NaiveDate};

/// Strategy for rescheduling a card after it has been graded.
pub trait ReviewScheduler {
    fn review(&self, state: &ReviewState, grade: Grade, today: NaiveDate) -> ReviewState;
}

/// The classic SM-2 schedule.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sm2Scheduler;

impl ReviewScheduler for Sm2Scheduler {
    fn review(&self, state: &ReviewState, grade: Grade, today: NaiveDate) -> ReviewState {
        review(state, grade, today)
    }
}

/// Computes the state that follows `state` after a review graded `grade` on `today`.
pub fn review(state: &ReviewState, grade: Grade, today: NaiveDate) -> ReviewState {
    let (repetition_count, interval_days) = if grade.is_lapse() {
        (0, 1)
    } else {
        let repetitions = state.repetition_count.saturating_add(1);
        let interval = match repetitions {
            1 => 1,
            2 => 6,
            // Grows from the EF the card had going into this review
            _ => (f64::from(state.interval_days) * state.easiness_factor).round() as u32,
        };
        (repetitions, interval)
    };

    let q = f64::from(grade.value());
    let easiness_factor = (state.easiness_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)))
        .max(MIN_EASINESS_FACTOR);

    ReviewState {
        repetition_count,
        easiness_factor,
        interval_days,
        next_review_on: today
            .checked_add_days(Days::new(u64::from(interval_days)))
            .map_or_else(latest_review_date, |date| date.min(latest_review_date())),
    }
}

/// Far end of the schedule. Dates are stored as `YYYY-MM-DD` text and compared
/// as strings, so they must keep a four-digit year.
pub fn latest_review_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    fn state(repetition_count: u32, easiness_factor: f64, interval_days: u32) -> ReviewState {
        ReviewState {
            repetition_count,
            easiness_factor,
            interval_days,
            next_review_on: today(),
        }
    }

    fn grade(value: u8) -> Grade {
        Grade::new(value).unwrap()
    }

    #[test]
    fn test_first_review() {
        let fresh = ReviewState::new(today());

        let next = review(&fresh, grade(5), today());
        assert_eq!(next.repetition_count, 1);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.next_review_on, NaiveDate::from_ymd_opt(2025, 5, 21).unwrap());
    }

    #[test]
    fn test_second_review() {
        for ef in [1.3, 2.0, 2.5, 3.1] {
            let next = review(&state(1, ef, 1), grade(5), today());
            assert_eq!(next.repetition_count, 2);
            assert_eq!(next.interval_days, 6);
            assert_eq!(next.next_review_on, NaiveDate::from_ymd_opt(2025, 5, 26).unwrap());
        }
    }

    #[test]
    fn test_third_review_multiplies_by_ef() {
        let next = review(&state(2, 2.5, 6), grade(5), today());
        assert_eq!(next.repetition_count, 3);
        assert_eq!(next.interval_days, 15);
        assert_eq!(next.next_review_on, today() + Days::new(15));
    }

    #[test]
    fn test_interval_uses_ef_before_update() {
        // Grade 3 lowers EF from 2.0 to 1.86, but the interval still uses 2.0
        let next = review(&state(2, 2.0, 6), grade(3), today());
        assert_eq!(next.interval_days, 12);
        assert!((next.easiness_factor - 1.86).abs() < 1e-9);
    }

    #[test]
    fn test_grade_below_3_resets() {
        for g in 0..3 {
            let next = review(&state(5, 2.5, 40), grade(g), today());
            assert_eq!(next.repetition_count, 0);
            assert_eq!(next.interval_days, 1);
            assert_eq!(next.next_review_on, today() + Days::new(1));
            // EF is still updated on a lapse
            assert!(next.easiness_factor < 2.5);
        }
    }

    #[test]
    fn test_ef_update_by_grade() {
        let expected = [(5, 2.6), (4, 2.5), (3, 2.36), (2, 2.18), (1, 1.96), (0, 1.7)];
        for (g, ef) in expected {
            let next = review(&state(0, 2.5, 1), grade(g), today());
            assert!((next.easiness_factor - ef).abs() < 1e-9, "grade {}", g);
        }
    }

    #[test]
    fn test_ef_floor() {
        for g in 0..=5 {
            for ef in [1.3, 1.35, 1.5, 2.5] {
                let next = review(&state(3, ef, 10), grade(g), today());
                assert!(next.easiness_factor >= 1.3);
                assert!(next.interval_days >= 1);
            }
        }
        let next = review(&state(1, 1.3, 1), grade(0), today());
        assert_eq!(next.easiness_factor, 1.3);
    }

    #[test]
    fn test_huge_interval_clamps_to_last_date() {
        let long = state(3, 2.5, 100_000_000);
        assert!(long.validate().is_ok());

        let next = review(&long, grade(5), today());
        assert_eq!(next.interval_days, 250_000_000);
        assert_eq!(next.next_review_on, latest_review_date());

        let maxed = review(&state(u32::MAX, 2.5, u32::MAX), grade(5), today());
        assert_eq!(maxed.repetition_count, u32::MAX);
        assert_eq!(maxed.interval_days, u32::MAX);
        assert_eq!(maxed.next_review_on, latest_review_date());
    }

    #[test]
    fn test_review_is_deterministic() {
        let start = state(4, 2.2, 20);
        let first = review(&start, grade(4), today());
        let second = review(&start, grade(4), today());
        assert_eq!(first, second);
        assert_eq!(start, state(4, 2.2, 20));
    }

    #[test]
    fn test_scheduler_trait_matches_free_function() {
        let start = state(2, 2.5, 6);
        assert_eq!(
            Sm2Scheduler.review(&start, grade(4), today()),
            review(&start, grade(4), today())
        );
    }
}
