// ABOUTME: Environment-based runtime configuration for the plan engine service
// ABOUTME: Parses DATABASE_URL, progression sweep settings, logging and engine tunables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use pierre_core::constants::runtime;
use pierre_intelligence::config::ConfigError;
use pierre_intelligence::PlanEngineConfig;
use tracing::info;

use crate::logging::LoggingConfig;

/// Where plans and session logs are stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// Process-local stores, lost on exit
    #[default]
    Memory,
    /// `SQLite` database; `sqlite::memory:` keeps it in memory
    SQLite {
        /// Connection URL including the `sqlite:` scheme
        url: String,
    },
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error for empty values or unsupported schemes
    pub fn parse_url(s: &str) -> Result<Self, ConfigError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::Parse("DATABASE_URL is empty".to_owned()));
        }
        if s == runtime::MEMORY_DATABASE_URL {
            return Ok(Self::Memory);
        }
        if s.starts_with("sqlite:") {
            return Ok(Self::SQLite { url: s.to_owned() });
        }
        Err(ConfigError::Parse(format!(
            "Unsupported DATABASE_URL '{s}': expected 'memory' or a sqlite: URL"
        )))
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str(runtime::MEMORY_DATABASE_URL),
            Self::SQLite { url } => f.write_str(url),
        }
    }
}

/// Periodic progression sweep settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    /// Seconds between sweeps; 0 disables the background sweep
    pub interval_secs: u64,
    /// Commit suggestions instead of storing them for review
    pub auto_apply: bool,
}

impl SweepConfig {
    /// Sweep interval, or `None` when disabled
    #[must_use]
    pub const fn interval(&self) -> Option<Duration> {
        if self.interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.interval_secs))
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: runtime::DEFAULT_SWEEP_INTERVAL_SECS,
            auto_apply: runtime::DEFAULT_SWEEP_AUTO_APPLY,
        }
    }
}

/// Runtime configuration assembled from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Store selection
    pub database: DatabaseUrl,
    /// Progression sweep
    pub sweep: SweepConfig,
    /// Logging
    pub logging: LoggingConfig,
    /// Engine tunables
    pub engine: PlanEngineConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed, or the
    /// engine configuration fails validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = match env::var("DATABASE_URL") {
            Ok(url) => DatabaseUrl::parse_url(&url)?,
            Err(env::VarError::NotPresent) => DatabaseUrl::default(),
            Err(e) => return Err(ConfigError::EnvVar(e)),
        };

        let sweep = SweepConfig {
            interval_secs: parse_env(
                "PROGRESSION_SWEEP_INTERVAL_SECS",
                runtime::DEFAULT_SWEEP_INTERVAL_SECS,
            )?,
            auto_apply: parse_bool_env(
                "PROGRESSION_SWEEP_AUTO_APPLY",
                runtime::DEFAULT_SWEEP_AUTO_APPLY,
            )?,
        };

        let config = Self {
            database,
            sweep,
            logging: LoggingConfig::from_env(),
            engine: PlanEngineConfig::load()?,
        };

        info!(
            database = %config.database,
            sweep_interval_secs = config.sweep.interval_secs,
            sweep_auto_apply = config.sweep.auto_apply,
            "Configuration loaded from environment"
        );

        Ok(config)
    }

    /// Replace the store selection, used by `--database-url`
    #[must_use]
    pub fn with_database(mut self, database: DatabaseUrl) -> Self {
        self.database = database;
        self
    }
}

fn parse_env<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Parse(format!("Invalid {name}: {value}"))),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(ConfigError::EnvVar(e)),
    }
}

fn parse_bool_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::Parse(format!("Invalid {name}: {value}"))),
        },
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(ConfigError::EnvVar(e)),
    }
}
