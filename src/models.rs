// ABOUTME: Core data models for the plan engine
// ABOUTME: Re-exports profile, exercise, plan and session log types from pierre-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! The model lives in `pierre-core` so the engines and the runtime share one
//! definition of a plan and its history.

pub use pierre_core::models::{
    round_to_tenth, ActualPerformance, AdjustmentChanges, AdjustmentHistory, AdjustmentRecord,
    AdjustmentType, ChangeValue, DeclinedSuggestion, DefaultPrescription, Equipment, ExerciseLog,
    ExercisePrescription, ExerciseTemplate, ExperienceLevel, Goal, Modality, MuscleGroup, Plan,
    PlanMetrics, PlanStatus, PlannedLoad, PlannedTarget, PrescriptionField, ProfileConstraints,
    ProgressionSuggestion, SessionLog, SuggestionChange, SuggestionType, Weekday,
};
