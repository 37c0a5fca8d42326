// ABOUTME: Core data models for the adaptive plan engine
// ABOUTME: Re-exports profile constraints, exercise templates, plans and session logs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Data structures shared by the plan engines, the stores and the service layer.
//!
//! ## Core Models
//!
//! - `ProfileConstraints`: onboarding inputs for plan generation
//! - `ExerciseTemplate`: catalog entry with a closed `Modality` tag
//! - `Plan`: the aggregate, with prescriptions, history and suggestions
//! - `SessionLog`: training history consumed by progression analysis

mod exercise;
mod plan;
mod profile;
mod session_log;

pub use exercise::{
    DefaultPrescription, ExercisePrescription, ExerciseTemplate, Modality, PlannedLoad,
    PlannedTarget,
};

pub use plan::{
    round_to_tenth, AdjustmentChanges, AdjustmentHistory, AdjustmentRecord, AdjustmentType,
    ChangeValue, DeclinedSuggestion, Plan, PlanMetrics, PlanStatus, PrescriptionField,
    ProgressionSuggestion, SuggestionChange, SuggestionType,
};

pub use profile::{Equipment, ExperienceLevel, Goal, MuscleGroup, ProfileConstraints, Weekday};

pub use session_log::{ActualPerformance, ExerciseLog, SessionLog};
