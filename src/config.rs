//! Runtime configuration read from `HOBBYHUB_*` environment variables.

use crate::analytics::OneRepMaxFormula;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "HOBBYHUB_DB_PATH";
pub const TREND_WINDOW_VAR: &str = "HOBBYHUB_TREND_WINDOW";
pub const FORMULA_VAR: &str = "HOBBYHUB_ONE_REP_MAX_FORMULA";

pub const DEFAULT_TREND_WINDOW: usize = 3;
const DB_FILE_NAME: &str = "hobbyhub.sqlite3";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    /// How many recent sessions the stats screen looks at by default
    pub trend_window: usize,
    pub formula: OneRepMaxFormula,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_path = get(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let trend_window = match get(TREND_WINDOW_VAR) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(Error::Config(format!(
                        "{} must be a positive integer, got '{}'",
                        TREND_WINDOW_VAR, raw
                    )));
                }
            },
            None => DEFAULT_TREND_WINDOW,
        };

        let formula = match get(FORMULA_VAR) {
            Some(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("{}: {}", FORMULA_VAR, e)))?,
            None => OneRepMaxFormula::default(),
        };

        Ok(Self {
            database_path,
            trend_window,
            formula,
        })
    }
}

/// `<platform data dir>/hobbyhub.sqlite3`, or the working directory when no
/// home directory can be determined.
fn default_database_path() -> PathBuf {
    ProjectDirs::from("com", "hobbyhub", "hobbyhub")
        .map(|dirs| dirs.data_dir().join(DB_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}
