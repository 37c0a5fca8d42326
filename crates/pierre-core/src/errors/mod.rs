// ABOUTME: Unified error handling for the adaptive plan engine
// ABOUTME: Defines ErrorCode, ErrorCategory and AppError with attachable context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every failure in the plan engine is per-request. Domain errors are raised as
//! [`PlanError`] and converted into [`AppError`] at the service boundary, where
//! they are folded into the response envelope instead of being propagated.

/// Plan engine domain errors
pub mod plan;

pub use plan::PlanError;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Standard error codes used throughout the plan engine
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Generic invalid input
    InvalidInput,
    /// A numeric value is outside its accepted range
    ValueOutOfRange,
    /// An adjustment request would not change anything
    NoOpAdjustment,

    // Resource Management (4000-4999)
    /// Requested plan or suggestion does not exist
    ResourceNotFound,
    /// Owner already has an active plan
    PlanAlreadyActive,
    /// Another writer updated the plan first
    ConcurrentModification,
    /// Operation requires an active plan
    PlanNotActive,

    // Generation (5000-5999)
    /// No exercise template fits the available equipment
    InsufficientEquipment,
    /// No focus areas were supplied
    EmptyFocusAreas,

    // Internal (9000-9999)
    /// Storage layer failure
    DatabaseError,
    /// Serialization failure
    SerializationError,
}

/// Coarse error taxonomy used by callers to decide on recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Bad input, rejected before any mutation
    Validation,
    /// Recoverable by caller action (deactivate, retry, re-fetch)
    Conflict,
    /// Referenced entity does not exist
    NotFound,
    /// Inputs cannot produce a plan; the user should broaden them
    GenerationInfeasible,
    /// Infrastructure failure
    Internal,
}

impl ErrorCode {
    /// Numeric code for logs and clients
    #[must_use]
    pub const fn numeric(self) -> u16 {
        match self {
            Self::InvalidInput => 3000,
            Self::ValueOutOfRange => 3003,
            Self::NoOpAdjustment => 3010,
            Self::ResourceNotFound => 4000,
            Self::PlanAlreadyActive => 4001,
            Self::ConcurrentModification => 4002,
            Self::PlanNotActive => 4003,
            Self::InsufficientEquipment => 5000,
            Self::EmptyFocusAreas => 5001,
            Self::DatabaseError => 9001,
            Self::SerializationError => 9003,
        }
    }

    /// Category of this code
    #[must_use]
    pub const fn category(self) -> ErrorCategory {
        match self {
            Self::InvalidInput | Self::ValueOutOfRange | Self::NoOpAdjustment => {
                ErrorCategory::Validation
            }
            Self::PlanAlreadyActive | Self::ConcurrentModification | Self::PlanNotActive => {
                ErrorCategory::Conflict
            }
            Self::ResourceNotFound => ErrorCategory::NotFound,
            Self::InsufficientEquipment | Self::EmptyFocusAreas => {
                ErrorCategory::GenerationInfeasible
            }
            Self::DatabaseError | Self::SerializationError => ErrorCategory::Internal,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::NoOpAdjustment => "The adjustment does not change the plan",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::PlanAlreadyActive => "An active plan already exists; deactivate it first",
            Self::ConcurrentModification => "The plan was modified concurrently; re-read and retry",
            Self::PlanNotActive => "The plan is not active",
            Self::InsufficientEquipment => "No exercises fit the available equipment",
            Self::EmptyFocusAreas => "At least one focus area is required",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// User ID if available
    pub user_id: Option<Uuid>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: Option<serde_json::Value>,
}

/// Unified error type for the application
#[derive(Debug, thiserror::Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Add a user ID to the error context
    #[must_use]
    pub const fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.context.user_id = Some(user_id);
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = Some(details);
        self
    }

    /// Category of the underlying code
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}
