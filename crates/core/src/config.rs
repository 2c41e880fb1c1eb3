// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings for the coordination toolkit
//!
//! Loaded from TOML; every field has a default so a partial file (or no
//! file at all) works. Durations use humantime strings ("30s", "250ms").

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Worker pool settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Number of workers
    pub workers: usize,
    /// Whole-batch deadline, if any
    #[serde(with = "humantime_serde")]
    pub deadline: Option<Duration>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            workers: 4,
            deadline: None,
        }
    }
}

/// Pipeline settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Channel capacity
    pub capacity: usize,
    /// Number of registered producers
    pub producers: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            capacity: 64,
            producers: 4,
        }
    }
}

/// Lock ordering settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingSettings {
    /// Overall bound for one acquisition
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Duration,
}

impl Default for OrderingSettings {
    fn default() -> Self {
        Self {
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Top-level settings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationConfig {
    pub pool: PoolSettings,
    pub pipeline: PipelineSettings,
    pub ordering: OrderingSettings,
}

impl CoordinationConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
