//! One-rep max (1RM) estimation from a multi-rep set.
//!
//! Epley is the default formula: `weight × (1 + reps / 30)`. A single rep is
//! returned as-is since it already is a 1RM.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estimates the 1RM with the Epley formula.
///
/// Fails with `InvalidInput` when `reps` is 0.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> Result<f64> {
    OneRepMaxFormula::Epley.estimate(weight, reps)
}

/// Interchangeable 1RM estimation formulas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OneRepMaxFormula {
    #[default]
    Epley,
    /// `weight × 36 / (37 − reps)`, undefined from 37 reps up
    Brzycki,
}

impl OneRepMaxFormula {
    pub const ALL: [OneRepMaxFormula; 2] = [OneRepMaxFormula::Epley, OneRepMaxFormula::Brzycki];

    pub fn estimate(self, weight: f64, reps: u32) -> Result<f64> {
        if reps < 1 {
            return Err(Error::invalid_input("Reps must be >= 1"));
        }
        if reps == 1 {
            return Ok(weight);
        }

        let r = f64::from(reps);
        match self {
            Self::Epley => Ok(weight * (1.0 + r / 30.0)),
            Self::Brzycki => {
                if reps >= 37 {
                    return Err(Error::invalid_input(format!(
                        "Brzycki formula is undefined for {} reps",
                        reps
                    )));
                }
                Ok(weight * 36.0 / (37.0 - r))
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Epley => "epley",
            Self::Brzycki => "brzycki",
        }
    }
}

impl fmt::Display for OneRepMaxFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OneRepMaxFormula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "epley" => Ok(Self::Epley),
            "brzycki" => Ok(Self::Brzycki),
            other => Err(Error::invalid_input(format!(
                "Unknown one-rep max formula: {}",
                other
            ))),
        }
    }
}
