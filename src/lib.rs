pub mod analytics;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use analytics::{OneRepMaxFormula, SetSample, compute_trend, estimate_one_rep_max};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use models::{Flashcard, Grade, ReviewState, sm2::review};
