// ABOUTME: Plan engine configuration aggregating generation, adjustment and progression settings
// ABOUTME: Loads defaults, applies PLAN_* environment overrides, validates, and exposes a global instance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Plan Engine Configuration
//!
//! Every tunable used by the generator, the adjustment engine and the
//! progression analyzer. Defaults come from `pierre_core::constants`; any
//! value can be overridden through a `PLAN_*` environment variable.

use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

mod adjustment;
mod error;
mod generation;
mod progression;

pub use adjustment::AdjustmentConfig;
pub use error::ConfigError;
pub use generation::GenerationConfig;
pub use progression::ProgressionConfig;

static PLAN_ENGINE_CONFIG: OnceLock<PlanEngineConfig> = OnceLock::new();

/// Complete plan engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanEngineConfig {
    /// Plan generator settings
    pub generation: GenerationConfig,
    /// Adjustment engine settings
    pub adjustment: AdjustmentConfig,
    /// Progression analyzer settings
    pub progression: ProgressionConfig,
}

impl PlanEngineConfig {
    /// Get the global configuration instance
    ///
    /// Falls back to defaults if the environment holds invalid overrides.
    pub fn global() -> &'static Self {
        PLAN_ENGINE_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                tracing::warn!("Failed to load plan engine config: {e}, using defaults");
                Self::default()
            })
        })
    }

    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be parsed or the result fails validation
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first validation error found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        self.adjustment.validate()?;
        self.progression.validate()?;
        Ok(())
    }

    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Generation overrides
        override_from_env(
            "PLAN_BEGINNER_SET_FACTOR",
            &mut self.generation.beginner_set_factor,
        )?;
        override_from_env(
            "PLAN_ADVANCED_SET_FACTOR",
            &mut self.generation.advanced_set_factor,
        )?;
        override_from_env(
            "PLAN_MAX_EXERCISES_PER_SESSION",
            &mut self.generation.max_exercises_per_session,
        )?;

        // Adjustment overrides
        override_from_env("PLAN_MAX_VOLUME_PCT", &mut self.adjustment.max_volume_pct)?;
        override_from_env(
            "PLAN_MAX_INTENSITY_PCT",
            &mut self.adjustment.max_intensity_pct,
        )?;
        override_from_env(
            "PLAN_MAX_FREQUENCY_PCT",
            &mut self.adjustment.max_frequency_pct,
        )?;

        // Progression overrides
        override_from_env(
            "PLAN_MIN_SESSIONS_PER_EXERCISE",
            &mut self.progression.min_sessions_per_exercise,
        )?;
        override_from_env(
            "PLAN_LOOKBACK_ITERATIONS",
            &mut self.progression.lookback_iterations,
        )?;
        override_from_env("PLAN_HEADROOM_RPE", &mut self.progression.headroom_rpe)?;
        override_from_env("PLAN_OVERREACH_RPE", &mut self.progression.overreach_rpe)?;
        override_from_env(
            "PLAN_ABSOLUTE_LOAD_STEP_KG",
            &mut self.progression.absolute_load_step_kg,
        )?;
        override_from_env(
            "PLAN_RELATIVE_LOAD_STEP",
            &mut self.progression.relative_load_step,
        )?;
        override_from_env(
            "PLAN_MAX_ADDED_VOLUME_PCT",
            &mut self.progression.max_added_volume_pct,
        )?;

        Ok(self)
    }
}

/// Replace `target` with the parsed value of `name` when the variable is set
fn override_from_env<T: FromStr>(name: &'static str, target: &mut T) -> Result<(), ConfigError> {
    match env::var(name) {
        Ok(val) => {
            *target = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {name}: {val}")))?;
            Ok(())
        }
        Err(env::VarError::NotPresent) => Ok(()),
        Err(e) => Err(ConfigError::EnvVar(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PlanEngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rpe_thresholds_must_be_ordered() {
        let mut config = PlanEngineConfig::default();
        config.progression.headroom_rpe = 9.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_adjustment_bounds_must_be_positive() {
        let mut config = PlanEngineConfig::default();
        config.adjustment.max_volume_pct = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn test_added_volume_cap_must_be_positive() {
        let mut config = PlanEngineConfig::default();
        config.progression.max_added_volume_pct = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn test_zero_exercise_cap_rejected() {
        let mut config = PlanEngineConfig::default();
        config.generation.max_exercises_per_session = 0;
        assert!(config.validate().is_err());
    }
}
