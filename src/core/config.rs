use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};

/// Upper bound used when sizing the sort pool from the host CPU count.
const MAX_DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub initial_capacity: usize,        // First allocation of the record storage
    pub index_initial_entries: usize,   // First allocation of the grade index entry table
    pub sort_workers: usize,            // Worker threads per sort call
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_capacity: 100,
            index_initial_entries: 8,
            sort_workers: 4,
        }
    }
}

impl Config {
    /// Default config with the sort pool sized from the available CPUs (at most 4).
    pub fn with_available_parallelism() -> Self {
        Config {
            sort_workers: num_cpus::get().clamp(1, MAX_DEFAULT_WORKERS),
            ..Config::default()
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::new(ErrorKind::InvalidArgument, "initial_capacity must be non-zero"));
        }
        if self.index_initial_entries == 0 {
            return Err(Error::new(ErrorKind::InvalidArgument, "index_initial_entries must be non-zero"));
        }
        if self.sort_workers == 0 {
            return Err(Error::new(ErrorKind::InvalidArgument, "sort_workers must be at least 1"));
        }
        Ok(())
    }
}
