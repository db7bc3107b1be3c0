use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::{DataLoadError, RecordStore};

pub const DATA_PATH_VAR: &str = "DISASTER_DATA_PATH";
pub const YEAR_RANGE_VAR: &str = "DISASTER_YEAR_RANGE";

const DEFAULT_DATA_PATH: &str = "1900-2021.csv";
const DEFAULT_YEAR_RANGE: (i32, i32) = (2000, 2021);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must look like LOWER-UPPER, got '{value}'")]
    InvalidRange { var: &'static str, value: String },
    #[error("{var}: lower year {lower} exceeds upper year {upper}")]
    InvertedRange {
        var: &'static str,
        lower: i32,
        upper: i32,
    },
}

/// Startup settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Dataset loaded once at startup.
    pub data_path: PathBuf,
    /// Initial slider position, clamped later to the dataset's years.
    pub initial_range: (i32, i32),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            initial_range: DEFAULT_YEAR_RANGE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();

        match lookup(DATA_PATH_VAR) {
            Some(path) if !path.trim().is_empty() => config.data_path = PathBuf::from(path.trim()),
            Some(_) => log::warn!("{DATA_PATH_VAR} is blank, using {DEFAULT_DATA_PATH}"),
            None => {}
        }

        if let Some(value) = lookup(YEAR_RANGE_VAR) {
            config.initial_range = parse_range(&value)?;
        }

        log::info!(
            "Dataset {} with initial years {}-{}",
            config.data_path.display(),
            config.initial_range.0,
            config.initial_range.1
        );
        Ok(config)
    }

    /// Load the configured dataset. Called once before the window opens.
    pub fn load_store(&self) -> Result<RecordStore, DataLoadError> {
        RecordStore::load(&self.data_path)
    }
}

fn parse_range(value: &str) -> Result<(i32, i32), ConfigError> {
    let invalid = || ConfigError::InvalidRange {
        var: YEAR_RANGE_VAR,
        value: value.to_string(),
    };
    let (lower, upper) = value.split_once('-').ok_or_else(invalid)?;
    let lower: i32 = lower.trim().parse().map_err(|_| invalid())?;
    let upper: i32 = upper.trim().parse().map_err(|_| invalid())?;
    if lower > upper {
        return Err(ConfigError::InvertedRange {
            var: YEAR_RANGE_VAR,
            lower,
            upper,
        });
    }
    Ok((lower, upper))
}
