// ABOUTME: Error types used across the plan engine runtime
// ABOUTME: Re-exports the unified error system from pierre-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Domain failures are raised as [`PlanError`] and converted into
//! [`AppError`] at the service boundary, where the response envelope carries
//! the [`ErrorCode`] to callers.

pub use pierre_core::errors::{AppError, ErrorCategory, ErrorCode, ErrorContext, PlanError};
