// ABOUTME: Core types and constants for the Pierre adaptive plan engine
// ABOUTME: Foundation crate with the plan data model, error taxonomy and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Core
//!
//! Foundation crate providing shared types and constants for the adaptive plan
//! engine. It holds data and validation only; generation, adjustment and
//! progression logic live in `pierre-intelligence`.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, `ErrorCategory` and the domain `PlanError`
//! - **constants**: engine defaults organized by component
//! - **models**: profile constraints, exercise templates, plans, session logs

/// Unified error handling system with standard error codes
pub mod errors;

/// Engine defaults organized by component
pub mod constants;

/// Core data models (`Plan`, `ProfileConstraints`, `SessionLog`, etc.)
pub mod models;
