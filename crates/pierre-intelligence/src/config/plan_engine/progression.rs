// ABOUTME: Progression analyzer configuration for readiness thresholds and step sizes
// ABOUTME: Controls lookback, completion and RPE cut-offs, and per-suggestion increments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::constants::{adjustment, progression};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Progression analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Completed sessions an exercise needs before it is analyzed
    pub min_sessions_per_exercise: usize,
    /// Weekly cycles of history to read
    pub lookback_iterations: u32,
    /// Completion ratio at which the prescription counts as met
    pub full_completion_ratio: f64,
    /// Completion ratio below which the user is under-recovered
    pub min_completion_ratio: f64,
    /// RPE at or below which volume can grow
    pub headroom_rpe: f64,
    /// RPE above which nothing is suggested
    pub overreach_rpe: f64,
    /// Absolute load step (kg)
    pub absolute_load_step_kg: f64,
    /// Relative load step (percent)
    pub relative_load_step: f64,
    /// Reps added per set
    pub rep_step: u32,
    /// Seconds added per set for timed modalities
    pub duration_step_seconds: u32,
    /// Largest weekly volume growth, in percent, one analysis run may suggest as added sets
    pub max_added_volume_pct: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            min_sessions_per_exercise: progression::MIN_SESSIONS_PER_EXERCISE,
            lookback_iterations: progression::DEFAULT_LOOKBACK_ITERATIONS,
            full_completion_ratio: progression::FULL_COMPLETION_RATIO,
            min_completion_ratio: progression::MIN_COMPLETION_RATIO,
            headroom_rpe: progression::HEADROOM_RPE,
            overreach_rpe: progression::OVERREACH_RPE,
            absolute_load_step_kg: progression::ABSOLUTE_LOAD_STEP_KG,
            relative_load_step: progression::RELATIVE_LOAD_STEP,
            rep_step: progression::REP_STEP,
            duration_step_seconds: progression::DURATION_STEP_SECONDS,
            max_added_volume_pct: adjustment::MAX_VOLUME_PCT,
        }
    }
}

impl ProgressionConfig {
    /// Validate progression thresholds
    ///
    /// # Errors
    ///
    /// Returns an error if thresholds are out of order or steps are not positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_sessions_per_exercise == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "min_sessions_per_exercise must be at least 1",
            ));
        }

        if self.lookback_iterations == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "lookback_iterations must be at least 1",
            ));
        }

        if !(0.0..=1.0).contains(&self.min_completion_ratio)
            || !(0.0..=1.0).contains(&self.full_completion_ratio)
        {
            return Err(ConfigError::ValueOutOfRange(
                "completion ratios must be within [0, 1]",
            ));
        }

        if self.min_completion_ratio > self.full_completion_ratio {
            return Err(ConfigError::InvalidRange(
                "min_completion_ratio must not exceed full_completion_ratio",
            ));
        }

        if !(1.0..=10.0).contains(&self.headroom_rpe) || !(1.0..=10.0).contains(&self.overreach_rpe)
        {
            return Err(ConfigError::ValueOutOfRange("RPE thresholds must be within [1, 10]"));
        }

        if self.headroom_rpe >= self.overreach_rpe {
            return Err(ConfigError::InvalidRange(
                "headroom_rpe must be below overreach_rpe",
            ));
        }

        if !(self.absolute_load_step_kg > 0.0 && self.relative_load_step > 0.0)
            || self.rep_step == 0
            || self.duration_step_seconds == 0
        {
            return Err(ConfigError::ValueOutOfRange(
                "progression steps must be positive",
            ));
        }

        if !(self.max_added_volume_pct > 0.0 && self.max_added_volume_pct <= 100.0) {
            return Err(ConfigError::ValueOutOfRange(
                "max_added_volume_pct must be within (0, 100]",
            ));
        }

        Ok(())
    }
}
