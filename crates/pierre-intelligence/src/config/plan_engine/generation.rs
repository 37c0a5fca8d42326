// ABOUTME: Plan generation configuration for set scaling and session sizing
// ABOUTME: Holds per-level set factors and the per-session exercise cap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::constants::generation;
use pierre_core::models::ExperienceLevel;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Plan generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Set multiplier for beginners
    pub beginner_set_factor: f64,
    /// Set multiplier for intermediates
    pub intermediate_set_factor: f64,
    /// Set multiplier for advanced users
    pub advanced_set_factor: f64,
    /// Exercises per session before time budgeting
    pub max_exercises_per_session: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            beginner_set_factor: generation::BEGINNER_SET_FACTOR,
            intermediate_set_factor: generation::INTERMEDIATE_SET_FACTOR,
            advanced_set_factor: generation::ADVANCED_SET_FACTOR,
            max_exercises_per_session: generation::MAX_EXERCISES_PER_SESSION,
        }
    }
}

impl GenerationConfig {
    /// Set multiplier for an experience level
    #[must_use]
    pub const fn set_factor(&self, level: ExperienceLevel) -> f64 {
        match level {
            ExperienceLevel::Beginner => self.beginner_set_factor,
            ExperienceLevel::Intermediate => self.intermediate_set_factor,
            ExperienceLevel::Advanced => self.advanced_set_factor,
        }
    }

    /// Validate generation parameters
    ///
    /// # Errors
    ///
    /// Returns an error if a set factor is not positive or the exercise cap is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        for factor in [
            self.beginner_set_factor,
            self.intermediate_set_factor,
            self.advanced_set_factor,
        ] {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ConfigError::ValueOutOfRange(
                    "set factors must be positive",
                ));
            }
        }

        if self.beginner_set_factor > self.advanced_set_factor {
            return Err(ConfigError::InvalidRange(
                "beginner set factor must not exceed advanced set factor",
            ));
        }

        if self.max_exercises_per_session == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "max_exercises_per_session must be at least 1",
            ));
        }

        Ok(())
    }
}
