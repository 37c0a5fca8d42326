// ABOUTME: Domain service layer exposing plan operations behind a uniform response envelope
// ABOUTME: Protocol-agnostic; the CLI and any future transport call the same service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Every operation returns [`ApiResponse`], so callers never distinguish a
//! storage failure from a domain failure by anything other than `error_code`.

/// Plan operations: generation, adjustment, progression and lifecycle
pub mod plans;

pub use plans::{AdjustmentResult, ApiResponse, PlanService, ProgressionResult};
