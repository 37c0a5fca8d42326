// ABOUTME: Configuration management module for the plan engine runtime
// ABOUTME: Exposes environment-driven server settings next to the engine tunables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: store selection, sweep schedule and logging from environment variables
//! - **Engine**: [`PlanEngineConfig`] lives in `pierre-intelligence` and is loaded here

/// Environment and server configuration
pub mod environment;

pub use environment::{DatabaseUrl, ServerConfig, SweepConfig};
pub use pierre_intelligence::config::{ConfigError, PlanEngineConfig};
