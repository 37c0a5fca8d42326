// ABOUTME: Domain error types raised by plan generation, adjustment and lifecycle operations
// ABOUTME: Maps every variant onto an ErrorCode so the service layer can build envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use uuid::Uuid;

use super::{AppError, ErrorCode};

/// Errors raised by the adaptive plan engine
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// Profile constraints failed validation
    #[error("Invalid constraint '{field}': {reason}")]
    InvalidConstraints {
        /// Offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// An adjustment percentage is outside its accepted range
    #[error("{field} must be within [{min}, {max}], got {value}")]
    DeltaOutOfRange {
        /// Offending delta field
        field: &'static str,
        /// Submitted value
        value: f64,
        /// Lower bound (inclusive)
        min: f64,
        /// Upper bound (inclusive)
        max: f64,
    },

    /// Adjustment would not change the plan
    #[error("Adjustment has no effect: all deltas are zero and nothing else changed")]
    NoOpAdjustment,

    /// No template matches the available equipment, even after relaxing the level
    #[error("No exercises match the available equipment ({available}); add equipment or broaden goals")]
    InsufficientEquipment {
        /// Comma-separated equipment the user listed
        available: String,
    },

    /// No focus areas were supplied
    #[error("At least one focus area is required to build a plan")]
    EmptyFocusAreas,

    /// Owner already has an active plan
    #[error("User {owner_id} already has active plan {plan_id}; deactivate it first")]
    PlanAlreadyActive {
        /// Plan owner
        owner_id: Uuid,
        /// Currently active plan
        plan_id: Uuid,
    },

    /// Operation requires an active plan
    #[error("Plan {plan_id} is {status}, not active")]
    PlanNotActive {
        /// Plan identifier
        plan_id: Uuid,
        /// Current status label
        status: String,
    },

    /// Optimistic concurrency check failed
    #[error("Plan {plan_id} was modified concurrently (expected version {expected_version}, found {actual_version})")]
    ConcurrentModification {
        /// Plan identifier
        plan_id: Uuid,
        /// Version the writer read
        expected_version: u64,
        /// Version currently stored
        actual_version: u64,
    },

    /// Plan does not exist
    #[error("Plan {plan_id} not found")]
    PlanNotFound {
        /// Plan identifier
        plan_id: Uuid,
    },

    /// Suggestion does not exist on the plan
    #[error("Suggestion {suggestion_id} not found on plan {plan_id}")]
    SuggestionNotFound {
        /// Plan identifier
        plan_id: Uuid,
        /// Suggestion identifier
        suggestion_id: Uuid,
    },

    /// All planned weeks have been completed
    #[error("Plan {plan_id} already completed all {total_weeks} weeks")]
    PlanCompleted {
        /// Plan identifier
        plan_id: Uuid,
        /// Planned duration
        total_weeks: u32,
    },

    /// Persistence failure
    #[error("Storage error: {context}")]
    Storage {
        /// What failed
        context: String,
    },

    /// Encoding or decoding failure
    #[error("Serialization error: {context}")]
    Serialization {
        /// What failed
        context: String,
    },
}

impl PlanError {
    /// Create an invalid constraint error
    #[must_use]
    pub fn invalid_constraint(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConstraints {
            field,
            reason: reason.into(),
        }
    }

    /// Create a storage error
    #[must_use]
    pub fn storage(context: impl Into<String>) -> Self {
        Self::Storage {
            context: context.into(),
        }
    }

    /// Error code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidConstraints { .. } => ErrorCode::InvalidInput,
            Self::DeltaOutOfRange { .. } | Self::PlanCompleted { .. } => {
                ErrorCode::ValueOutOfRange
            }
            Self::NoOpAdjustment => ErrorCode::NoOpAdjustment,
            Self::InsufficientEquipment { .. } => ErrorCode::InsufficientEquipment,
            Self::EmptyFocusAreas => ErrorCode::EmptyFocusAreas,
            Self::PlanAlreadyActive { .. } => ErrorCode::PlanAlreadyActive,
            Self::PlanNotActive { .. } => ErrorCode::PlanNotActive,
            Self::ConcurrentModification { .. } => ErrorCode::ConcurrentModification,
            Self::PlanNotFound { .. } | Self::SuggestionNotFound { .. } => {
                ErrorCode::ResourceNotFound
            }
            Self::Storage { .. } => ErrorCode::DatabaseError,
            Self::Serialization { .. } => ErrorCode::SerializationError,
        }
    }

    /// Whether the caller should re-read the plan and retry
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }
}

impl From<PlanError> for AppError {
    fn from(error: PlanError) -> Self {
        let code = error.code();
        let app_error = Self::new(code, error.to_string());
        match &error {
            PlanError::DeltaOutOfRange {
                field,
                value,
                min,
                max,
            } => app_error.with_details(serde_json::json!({
                "field": field,
                "value": value,
                "min": min,
                "max": max,
            })),
            PlanError::PlanAlreadyActive { plan_id, .. }
            | PlanError::PlanNotActive { plan_id, .. }
            | PlanError::ConcurrentModification { plan_id, .. }
            | PlanError::PlanNotFound { plan_id }
            | PlanError::PlanCompleted { plan_id, .. } => {
                app_error.with_resource_id(plan_id.to_string())
            }
            _ => app_error,
        }
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            context: error.to_string(),
        }
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for PlanError {
    fn from(error: sqlx::Error) -> Self {
        Self::Storage {
            context: error.to_string(),
        }
    }
}
