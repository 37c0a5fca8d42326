// ABOUTME: Adaptive plan engines: generation, bounded adjustment and progression analysis
// ABOUTME: Pure, synchronous computation over pierre-core models with no I/O
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Intelligence
//!
//! CPU-only engines behind the adaptive plan lifecycle. Storage, locking and
//! versioning belong to the caller.
//!
//! ## Modules
//!
//! - **catalog**: `ExerciseCatalog` contract and the built-in seeded catalog
//! - **plan_generator**: builds an initial plan from profile constraints
//! - **adjustment_engine**: bounded percentage adjustments with preview
//! - **progression_analyzer**: suggestions from recent session logs
//! - **config**: `PlanEngineConfig` with environment overrides

/// Exercise catalog contract and built-in catalog
pub mod catalog;

/// Engine configuration
pub mod config;

/// Initial plan generation
pub mod plan_generator;

/// Bounded plan adjustments and previews
pub mod adjustment_engine;

/// Progression analysis over session logs
pub mod progression_analyzer;

pub use adjustment_engine::{AdjustmentDelta, AdjustmentEngine, AdjustmentOutcome, AdjustmentPreview};
pub use catalog::{BuiltinExerciseCatalog, ExerciseCatalog};
pub use config::PlanEngineConfig;
pub use plan_generator::PlanGenerator;
pub use progression_analyzer::{
    ExerciseSignal, ProgressionAnalysis, ProgressionAnalyzer, ProgressionOutcome,
};
