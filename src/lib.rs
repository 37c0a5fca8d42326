// ABOUTME: Main library entry point for the Pierre adaptive plan engine
// ABOUTME: Wires plan lifecycle orchestration, persistence adapters and the service surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy.
#![deny(unsafe_code)]

//! # Pierre Plan Engine
//!
//! Generates personalized multi-week workout plans, applies bounded manual
//! adjustments, computes progression suggestions from training history and
//! owns the plan lifecycle.
//!
//! ## Architecture
//!
//! - **`pierre-core`**: plan data model, error taxonomy, constants
//! - **`pierre-intelligence`**: pure engines (generator, adjustment, progression)
//! - **Lifecycle**: per-plan serialization, optimistic versioning, persistence
//! - **Services**: the operation surface, every call wrapped in [`services::ApiResponse`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pierre_plan_engine::database::memory::{InMemoryPlanStore, InMemorySessionLogStore};
//! use pierre_plan_engine::lifecycle::PlanLifecycleManager;
//! use pierre_plan_engine::services::PlanService;
//!
//! # async fn run() {
//! let manager = PlanLifecycleManager::with_defaults(
//!     Arc::new(InMemoryPlanStore::new()),
//!     Arc::new(InMemorySessionLogStore::new()),
//! );
//! let service = PlanService::new(Arc::new(manager));
//! let current = service.get_current_plan(uuid::Uuid::new_v4()).await;
//! assert!(!current.success);
//! # }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the CLI binary (src/bin/) and integration tests (tests/).

/// Environment configuration for the runtime around the engines
pub mod config;

/// Plan and session log store contracts plus in-memory and `SQLite` adapters
pub mod database;

/// Error types re-exported from `pierre-core`
pub mod errors;

/// Plan state machine and the periodic progression sweep
pub mod lifecycle;

/// Structured logging setup
pub mod logging;

/// Data model re-exported from `pierre-core`
pub mod models;

/// Operation surface returning uniform response envelopes
pub mod services;

pub use pierre_intelligence::{
    AdjustmentDelta, AdjustmentPreview, BuiltinExerciseCatalog, ExerciseCatalog,
    PlanEngineConfig,
};
