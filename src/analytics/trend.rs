//! Progressive-overload trend over the top set of recent sessions.
//!
//! Each session contributes its heaviest set. Sessions are ordered by date and
//! the x-axis is the session index (0, 1, 2, ...) rather than elapsed days, so
//! irregular gaps between sessions do not distort the slope.

use super::one_rep_max::OneRepMaxFormula;
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One lift fed to the analyzer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetSample {
    pub session_id: Uuid,
    pub session_date: NaiveDate,
    pub weight: f64,
    pub reps: u32,
}

/// Estimated 1RM of one session's top set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneRepMaxPoint {
    pub workout_id: Uuid,
    pub performed_on: NaiveDate,
    pub one_rep_max: f64,
}

/// Least-squares line through points at x = 0, 1, 2, ...
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

/// What the trend regresses on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrendMetric {
    #[default]
    TopSetWeight,
    EstimatedOneRepMax(OneRepMaxFormula),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OverloadTrendAnalyzer {
    pub metric: TrendMetric,
}

impl OverloadTrendAnalyzer {
    pub fn new(metric: TrendMetric) -> Self {
        Self { metric }
    }

    /// Slope of the chosen metric over the `last_n` most recent sessions.
    ///
    /// Returns `0.0` with fewer than two sessions. Only the 1RM metric can
    /// fail, when a top set has an invalid rep count for the formula.
    pub fn trend(&self, samples: &[SetSample], last_n: usize) -> Result<f64> {
        let tops = top_sets(samples, last_n);
        let ys: Vec<f64> = match self.metric {
            TrendMetric::TopSetWeight => tops.iter().map(|s| s.weight).collect(),
            TrendMetric::EstimatedOneRepMax(formula) => tops
                .iter()
                .map(|s| formula.estimate(s.weight, s.reps))
                .collect::<Result<Vec<f64>>>()?,
        };
        Ok(slope(&ys))
    }
}

/// Slope of top-set weight over the `last_n` most recent sessions, `0.0` when
/// fewer than two sessions remain.
pub fn compute_trend(samples: &[SetSample], last_n: usize) -> f64 {
    let weights: Vec<f64> = top_sets(samples, last_n)
        .iter()
        .map(|s| s.weight)
        .collect();
    slope(&weights)
}

/// The heaviest sample of each session, oldest first, limited to the `last_n`
/// most recent sessions.
pub fn top_sets(samples: &[SetSample], last_n: usize) -> Vec<SetSample> {
    let mut best: HashMap<Uuid, &SetSample> = HashMap::new();
    for sample in samples {
        best.entry(sample.session_id)
            .and_modify(|current| {
                if is_heavier(sample, current) {
                    *current = sample;
                }
            })
            .or_insert(sample);
    }

    let mut tops: Vec<SetSample> = best.into_values().cloned().collect();
    tops.sort_by(|a, b| {
        a.session_date
            .cmp(&b.session_date)
            .then_with(|| a.session_id.cmp(&b.session_id))
    });

    let skip = tops.len().saturating_sub(last_n);
    tops.split_off(skip)
}

/// Top sets of the `last_n` most recent sessions as estimated 1RM points, oldest first.
pub fn one_rep_max_series(
    samples: &[SetSample],
    last_n: usize,
    formula: OneRepMaxFormula,
) -> Result<Vec<OneRepMaxPoint>> {
    top_sets(samples, last_n)
        .into_iter()
        .map(|s| {
            Ok(OneRepMaxPoint {
                workout_id: s.session_id,
                performed_on: s.session_date,
                one_rep_max: formula.estimate(s.weight, s.reps)?,
            })
        })
        .collect()
}

/// Ordinary least-squares fit with x = index. `None` with fewer than two points.
pub fn fit_line(ys: &[f64]) -> Option<LinearFit> {
    if ys.len() < 2 {
        return None;
    }

    let n = ys.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (sum_xy, sum_xx) = ys
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sum_xy, sum_xx), (i, y)| {
            let dx = i as f64 - mean_x;
            (sum_xy + dx * (y - mean_y), sum_xx + dx * dx)
        });

    let slope = sum_xy / sum_xx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

fn slope(ys: &[f64]) -> f64 {
    fit_line(ys).map_or(0.0, |fit| fit.slope)
}

// Heavier weight wins; on equal weight the set with more reps does.
fn is_heavier(candidate: &SetSample, current: &SetSample) -> bool {
    candidate.weight > current.weight
        || (candidate.weight == current.weight && candidate.reps > current.reps)
}
