// ABOUTME: Configuration module for pierre-intelligence crate
// ABOUTME: Re-exports plan engine configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Plan engine configuration (generation, adjustment, progression)
pub mod plan_engine;

pub use plan_engine::{
    AdjustmentConfig, ConfigError, GenerationConfig, PlanEngineConfig, ProgressionConfig,
};
