//! Runtime configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Dataset loaded at start-up
    pub dataset_path: PathBuf,

    /// Serialized classifier loaded at start-up
    pub model_path: PathBuf,

    /// Cosmetic pause between submitting a reading and showing its verdict
    pub submit_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("Wafer_TRAIN.arff"),
            model_path: PathBuf::from("rf_model.json"),
            submit_delay: Duration::from_millis(2000),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            dataset_path: lookup("WAFER_DATASET")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_path),

            model_path: lookup("WAFER_MODEL")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            submit_delay: lookup("WAFER_SUBMIT_DELAY_MS")
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.submit_delay),
        }
    }
}
