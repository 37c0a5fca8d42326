// ABOUTME: Adjustment engine configuration for accepted delta ranges
// ABOUTME: Bounds volume, intensity and frequency percentages and the load rounding increment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::constants::adjustment;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Adjustment engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentConfig {
    /// Largest accepted absolute volume change in percent
    pub max_volume_pct: f64,
    /// Largest accepted absolute intensity change in percent
    pub max_intensity_pct: f64,
    /// Largest accepted absolute frequency change in percent
    pub max_frequency_pct: f64,
    /// Plate increment absolute loads are rounded to (kg)
    pub load_rounding_kg: f64,
    /// Exercises a surviving session may hold after a frequency decrease
    pub fold_session_cap: usize,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            max_volume_pct: adjustment::MAX_VOLUME_PCT,
            max_intensity_pct: adjustment::MAX_INTENSITY_PCT,
            max_frequency_pct: adjustment::MAX_FREQUENCY_PCT,
            load_rounding_kg: adjustment::LOAD_ROUNDING_KG,
            fold_session_cap: adjustment::FOLD_SESSION_CAP,
        }
    }
}

impl AdjustmentConfig {
    /// Validate adjustment bounds
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is outside (0, 100] the rounding increment is not positive or the session cap is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        for bound in [
            self.max_volume_pct,
            self.max_intensity_pct,
            self.max_frequency_pct,
        ] {
            if !bound.is_finite() || bound <= 0.0 || bound > 100.0 {
                return Err(ConfigError::ValueOutOfRange(
                    "adjustment bounds must be within (0, 100]",
                ));
            }
        }

        if !self.load_rounding_kg.is_finite() || self.load_rounding_kg <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "load_rounding_kg must be positive",
            ));
        }

        if self.fold_session_cap == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "fold_session_cap must be at least 1",
            ));
        }

        Ok(())
    }
}
