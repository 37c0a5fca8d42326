// ABOUTME: Plan service wrapping lifecycle operations in success/data/message/error_code envelopes
// ABOUTME: Converts every PlanError into an AppError-backed response instead of propagating it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use pierre_core::errors::{AppError, ErrorCode, PlanError};
use pierre_core::models::{Plan, ProfileConstraints, ProgressionSuggestion, SessionLog};
use pierre_intelligence::{AdjustmentDelta, AdjustmentPreview};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::lifecycle::{PlanLifecycleManager, SweepReport};

/// Uniform response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Result payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable outcome or error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error code for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    /// Structured error details, such as the accepted range of a delta
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T> ApiResponse<T> {
    /// Successful response
    #[must_use]
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error_code: None,
            details: None,
        }
    }

    /// Failed response built from an application error
    #[must_use]
    pub fn error(error: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(error.message.clone()),
            error_code: Some(error.code),
            details: error.context.details.clone(),
        }
    }
}

/// Adjusted plan plus the projection that was applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentResult {
    /// Plan after the adjustment
    pub plan: Plan,
    /// Projection that was committed
    pub preview: AdjustmentPreview,
}

/// Outcome of a progression run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionResult {
    /// Suggestions produced by the run
    pub suggestions: Vec<ProgressionSuggestion>,
    /// Whether they were committed as one adjustment
    pub applied: bool,
    /// Plan after the run
    pub plan: Plan,
}

/// Exposed plan operations
#[derive(Clone)]
pub struct PlanService {
    manager: Arc<PlanLifecycleManager>,
}

impl PlanService {
    /// Create a service over a lifecycle manager
    #[must_use]
    pub const fn new(manager: Arc<PlanLifecycleManager>) -> Self {
        Self { manager }
    }

    /// Underlying lifecycle manager
    #[must_use]
    pub const fn manager(&self) -> &Arc<PlanLifecycleManager> {
        &self.manager
    }

    /// Generate and activate a plan for `user_id`
    pub async fn generate_plan(
        &self,
        user_id: Uuid,
        constraints: &ProfileConstraints,
    ) -> ApiResponse<Plan> {
        respond(
            "generate_plan",
            self.manager.generate_and_activate(user_id, constraints).await,
            |plan| {
                format!(
                    "Generated a {}-week plan with {} sessions per week",
                    plan.total_weeks, plan.sessions_per_week
                )
            },
        )
    }

    /// Active plan of `user_id`
    pub async fn get_current_plan(&self, user_id: Uuid) -> ApiResponse<Plan> {
        match self.manager.get_active(user_id).await {
            Ok(Some(plan)) => ApiResponse::ok(plan, "Active plan found"),
            Ok(None) => ApiResponse::error(
                &AppError::not_found("Active plan").with_user_id(user_id),
            ),
            Err(error) => failure("get_current_plan", error),
        }
    }

    /// Apply a manual adjustment
    pub async fn adjust_plan(
        &self,
        plan_id: Uuid,
        delta: &AdjustmentDelta,
    ) -> ApiResponse<AdjustmentResult> {
        let result = self
            .manager
            .adjust(plan_id, delta)
            .await
            .map(|outcome| AdjustmentResult {
                plan: outcome.plan,
                preview: outcome.preview,
            });
        respond("adjust_plan", result, |result| {
            format!(
                "Plan adjusted: {} sets per week, intensity {}, {} sessions per week",
                result.plan.weekly_volume,
                result.plan.average_intensity,
                result.plan.sessions_per_week
            )
        })
    }

    /// Project an adjustment without committing it
    pub async fn preview_adjustment(
        &self,
        plan_id: Uuid,
        delta: &AdjustmentDelta,
    ) -> ApiResponse<AdjustmentPreview> {
        respond(
            "preview_adjustment",
            self.manager.preview_adjustment(plan_id, delta).await,
            |preview| {
                format!(
                    "Weekly volume would change from {} to {} sets",
                    preview.current.weekly_volume, preview.projected.weekly_volume
                )
            },
        )
    }

    /// Run progression analysis for a plan
    pub async fn trigger_progression(
        &self,
        plan_id: Uuid,
        auto_apply: bool,
    ) -> ApiResponse<ProgressionResult> {
        let result = self
            .manager
            .trigger_progression(plan_id, auto_apply)
            .await
            .map(|outcome| ProgressionResult {
                suggestions: outcome.suggestions,
                applied: outcome.applied,
                plan: outcome.plan,
            });
        respond("trigger_progression", result, |result| {
            match (result.suggestions.len(), result.applied) {
                (0, _) => "No progression suggested".to_owned(),
                (count, true) => format!("Applied {count} progression suggestion(s)"),
                (count, false) => format!("{count} progression suggestion(s) awaiting review"),
            }
        })
    }

    /// Accept a pending suggestion
    pub async fn apply_suggestion(&self, plan_id: Uuid, suggestion_id: Uuid) -> ApiResponse<Plan> {
        respond(
            "apply_suggestion",
            self.manager.apply_suggestion(plan_id, suggestion_id).await,
            |_| "Suggestion applied".to_owned(),
        )
    }

    /// Decline a pending suggestion
    pub async fn decline_suggestion(
        &self,
        plan_id: Uuid,
        suggestion_id: Uuid,
    ) -> ApiResponse<Plan> {
        respond(
            "decline_suggestion",
            self.manager.decline_suggestion(plan_id, suggestion_id).await,
            |_| "Suggestion declined".to_owned(),
        )
    }

    /// Mark the current week as completed
    pub async fn complete_week(&self, plan_id: Uuid) -> ApiResponse<Plan> {
        respond(
            "complete_week",
            self.manager.complete_week(plan_id).await,
            |plan| {
                format!(
                    "Completed week {} of {}",
                    plan.weeks_completed, plan.total_weeks
                )
            },
        )
    }

    /// Deactivate a plan
    pub async fn deactivate_plan(&self, plan_id: Uuid) -> ApiResponse<Plan> {
        respond(
            "deactivate_plan",
            self.manager.deactivate(plan_id).await,
            |_| "Plan deactivated".to_owned(),
        )
    }

    /// Record a training session
    pub async fn record_session(&self, log: &SessionLog) -> ApiResponse<Uuid> {
        respond(
            "record_session",
            self.manager.record_session(log).await.map(|()| log.id),
            |_| "Session recorded".to_owned(),
        )
    }

    /// Run progression over every active plan
    pub async fn run_progression_sweep(&self, auto_apply: bool) -> ApiResponse<SweepReport> {
        respond(
            "run_progression_sweep",
            self.manager.run_progression_sweep(auto_apply).await,
            |report| {
                format!(
                    "Checked {} active plan(s), {} failed",
                    report.plans_checked, report.plans_failed
                )
            },
        )
    }
}

fn respond<T>(
    operation: &'static str,
    result: Result<T, PlanError>,
    message: impl FnOnce(&T) -> String,
) -> ApiResponse<T> {
    match result {
        Ok(data) => {
            let message = message(&data);
            ApiResponse::ok(data, message)
        }
        Err(error) => failure(operation, error),
    }
}

fn failure<T>(operation: &'static str, error: PlanError) -> ApiResponse<T> {
    let retryable = error.is_retryable();
    let app_error = AppError::from(error);
    warn!(
        operation,
        error_code = ?app_error.code,
        numeric_code = app_error.code.numeric(),
        category = ?app_error.category(),
        retryable,
        message = %app_error.message,
        "Plan operation failed"
    );
    ApiResponse::error(&app_error)
}
