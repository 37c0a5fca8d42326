// ABOUTME: Plan lifecycle state machine orchestrating generation, adjustment and progression
// ABOUTME: Serializes mutations per plan and persists them with optimistic version checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Lifecycle
//!
//! `NonExistent → Active ⇄ Active → Deactivated`. `Paused` is part of the
//! model but no operation enters it.
//!
//! - mutations of one plan run under a per-plan mutex and are saved with the
//!   version they were read at; a writer that still loses the race gets
//!   `ConcurrentModification` and must re-read
//! - generation runs under a per-owner mutex so the one-active-plan check and
//!   the insert cannot interleave
//! - previews and reads take no lock

/// Periodic progression sweep over every active plan
pub mod sweep;
mod locks;

use std::sync::Arc;

use chrono::Utc;
use pierre_core::constants::profile_limits::DAYS_IN_WEEK;
use pierre_core::errors::PlanError;
use pierre_core::models::{DeclinedSuggestion, Plan, ProfileConstraints, SessionLog};
use pierre_intelligence::{
    AdjustmentDelta, AdjustmentEngine, AdjustmentOutcome, AdjustmentPreview,
    BuiltinExerciseCatalog, ExerciseCatalog, PlanEngineConfig, PlanGenerator,
    ProgressionAnalyzer, ProgressionOutcome,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::database::{PlanStore, SessionLogStore};
use locks::KeyedLocks;

pub use sweep::{spawn_progression_sweep, SweepEntry, SweepHandle, SweepReport};

/// Owns the plan state machine
pub struct PlanLifecycleManager {
    plans: Arc<dyn PlanStore>,
    sessions: Arc<dyn SessionLogStore>,
    generator: PlanGenerator,
    adjustments: AdjustmentEngine,
    analyzer: ProgressionAnalyzer,
    plan_locks: KeyedLocks,
    owner_locks: KeyedLocks,
}

impl PlanLifecycleManager {
    /// Create a manager over the given stores, catalog and engine configuration
    #[must_use]
    pub fn new(
        plans: Arc<dyn PlanStore>,
        sessions: Arc<dyn SessionLogStore>,
        catalog: Arc<dyn ExerciseCatalog>,
        config: &PlanEngineConfig,
    ) -> Self {
        Self {
            plans,
            sessions,
            generator: PlanGenerator::with_config(catalog.clone(), config.generation.clone()),
            adjustments: AdjustmentEngine::with_config(catalog, config.adjustment.clone()),
            analyzer: ProgressionAnalyzer::with_config(config.progression.clone()),
            plan_locks: KeyedLocks::default(),
            owner_locks: KeyedLocks::default(),
        }
    }

    /// Create a manager with the built-in catalog and the global configuration
    #[must_use]
    pub fn with_defaults(plans: Arc<dyn PlanStore>, sessions: Arc<dyn SessionLogStore>) -> Self {
        Self::new(
            plans,
            sessions,
            Arc::new(BuiltinExerciseCatalog::new()),
            PlanEngineConfig::global(),
        )
    }

    /// Generate a plan and make it the owner's active plan
    ///
    /// # Errors
    ///
    /// Returns `PlanAlreadyActive` if the owner already has an active plan,
    /// any validation or generation error, or a storage error.
    #[instrument(skip_all, fields(owner_id = %owner_id))]
    pub async fn generate_and_activate(
        &self,
        owner_id: Uuid,
        constraints: &ProfileConstraints,
    ) -> Result<Plan, PlanError> {
        let _guard = self.owner_locks.lock(owner_id).await;

        if let Some(active) = self.plans.find_active_by_owner(owner_id).await? {
            warn!(plan_id = %active.id, "Owner already has an active plan");
            return Err(PlanError::PlanAlreadyActive {
                owner_id,
                plan_id: active.id,
            });
        }

        let plan = self.generator.generate(owner_id, constraints)?;
        self.plans.insert(&plan).await?;

        info!(
            plan_id = %plan.id,
            goal = plan.goal.as_str(),
            sessions_per_week = plan.sessions_per_week,
            weekly_volume = plan.weekly_volume,
            exercises = plan.exercises.len(),
            "Plan generated and activated"
        );
        Ok(plan)
    }

    /// Active plan of `owner_id`, if any
    ///
    /// # Errors
    ///
    /// Returns a storage error if the lookup fails
    pub async fn get_active(&self, owner_id: Uuid) -> Result<Option<Plan>, PlanError> {
        self.plans.find_active_by_owner(owner_id).await
    }

    /// Plan by id, in any status
    ///
    /// # Errors
    ///
    /// Returns `PlanNotFound` or a storage error
    pub async fn get_plan(&self, plan_id: Uuid) -> Result<Plan, PlanError> {
        self.plans
            .get(plan_id)
            .await?
            .ok_or(PlanError::PlanNotFound { plan_id })
    }

    /// Project an adjustment without changing anything
    ///
    /// # Errors
    ///
    /// Returns `PlanNotFound`, `PlanNotActive`, or the validation error the
    /// same delta would raise on commit
    pub async fn preview_adjustment(
        &self,
        plan_id: Uuid,
        delta: &AdjustmentDelta,
    ) -> Result<AdjustmentPreview, PlanError> {
        let plan = self.get_plan(plan_id).await?;
        ensure_active(&plan)?;
        self.adjustments.preview(&plan, delta)
    }

    /// Apply a manual adjustment
    ///
    /// # Errors
    ///
    /// Returns `PlanNotFound`, `PlanNotActive`, a validation error,
    /// `ConcurrentModification`, or a storage error
    #[instrument(skip_all, fields(plan_id = %plan_id))]
    pub async fn adjust(
        &self,
        plan_id: Uuid,
        delta: &AdjustmentDelta,
    ) -> Result<AdjustmentOutcome, PlanError> {
        let _guard = self.plan_locks.lock(plan_id).await;

        let plan = self.load_active(plan_id).await?;
        let outcome = self.adjustments.adjust(&plan, delta)?;
        let saved = self.plans.save(&outcome.plan, plan.version).await?;

        info!(
            version = saved.version,
            weekly_volume = saved.weekly_volume,
            average_intensity = saved.average_intensity,
            sessions_per_week = saved.sessions_per_week,
            history_len = saved.adjustment_history.len(),
            "Plan adjusted"
        );
        Ok(AdjustmentOutcome {
            plan: saved,
            preview: outcome.preview,
        })
    }

    /// Analyze recent sessions and either store or commit the suggestions
    ///
    /// # Errors
    ///
    /// Returns `PlanNotFound`, `PlanNotActive`, an adjustment error when
    /// committing, `ConcurrentModification`, or a storage error
    #[instrument(skip_all, fields(plan_id = %plan_id, auto_apply = auto_apply))]
    pub async fn trigger_progression(
        &self,
        plan_id: Uuid,
        auto_apply: bool,
    ) -> Result<ProgressionOutcome, PlanError> {
        let _guard = self.plan_locks.lock(plan_id).await;

        let plan = self.load_active(plan_id).await?;
        let logs = self
            .sessions
            .get_recent(plan.owner_id, self.analyzer.config().lookback_iterations)
            .await?;
        let outcome =
            self.analyzer
                .analyze_and_apply(&plan, &logs, auto_apply, &self.adjustments, Utc::now())?;

        let changed = outcome.applied
            || outcome.plan.progression_suggestions != plan.progression_suggestions;
        if !changed {
            debug!(sessions = logs.len(), "Progression produced no change");
            return Ok(outcome);
        }

        let saved = self.plans.save(&outcome.plan, plan.version).await?;
        info!(
            sessions = logs.len(),
            suggestions = outcome.suggestions.len(),
            applied = outcome.applied,
            version = saved.version,
            "Progression analyzed"
        );
        Ok(ProgressionOutcome {
            plan: saved,
            suggestions: outcome.suggestions,
            applied: outcome.applied,
        })
    }

    /// Commit one pending suggestion as a `Progression` adjustment
    ///
    /// # Errors
    ///
    /// Returns `SuggestionNotFound`, `PlanNotActive`, an adjustment error,
    /// `ConcurrentModification`, or a storage error
    #[instrument(skip_all, fields(plan_id = %plan_id, suggestion_id = %suggestion_id))]
    pub async fn apply_suggestion(
        &self,
        plan_id: Uuid,
        suggestion_id: Uuid,
    ) -> Result<Plan, PlanError> {
        let _guard = self.plan_locks.lock(plan_id).await;

        let mut plan = self.load_active(plan_id).await?;
        let expected_version = plan.version;
        let suggestion = plan
            .take_suggestion(suggestion_id)
            .ok_or(PlanError::SuggestionNotFound {
                plan_id,
                suggestion_id,
            })?;

        let updated = self
            .adjustments
            .apply_suggestions(&plan, &[suggestion], Utc::now())?;
        let saved = self.plans.save(&updated, expected_version).await?;

        info!(
            version = saved.version,
            history_len = saved.adjustment_history.len(),
            "Suggestion applied"
        );
        Ok(saved)
    }

    /// Drop a pending suggestion and remember it so it does not resurface
    ///
    /// # Errors
    ///
    /// Returns `SuggestionNotFound`, `PlanNotActive`,
    /// `ConcurrentModification`, or a storage error
    #[instrument(skip_all, fields(plan_id = %plan_id, suggestion_id = %suggestion_id))]
    pub async fn decline_suggestion(
        &self,
        plan_id: Uuid,
        suggestion_id: Uuid,
    ) -> Result<Plan, PlanError> {
        let _guard = self.plan_locks.lock(plan_id).await;

        let mut plan = self.load_active(plan_id).await?;
        let expected_version = plan.version;
        let suggestion = plan
            .take_suggestion(suggestion_id)
            .ok_or(PlanError::SuggestionNotFound {
                plan_id,
                suggestion_id,
            })?;

        let now = Utc::now();
        plan.declined_suggestions
            .extend(DeclinedSuggestion::from_suggestion(&suggestion, now));
        plan.updated_at = now;

        let saved = self.plans.save(&plan, expected_version).await?;
        info!(version = saved.version, "Suggestion declined");
        Ok(saved)
    }

    /// Mark one more planned week as completed
    ///
    /// # Errors
    ///
    /// Returns `PlanCompleted` once every week is done, `PlanNotActive`,
    /// `ConcurrentModification`, or a storage error
    #[instrument(skip_all, fields(plan_id = %plan_id))]
    pub async fn complete_week(&self, plan_id: Uuid) -> Result<Plan, PlanError> {
        let _guard = self.plan_locks.lock(plan_id).await;

        let mut plan = self.load_active(plan_id).await?;
        if plan.weeks_completed >= plan.total_weeks {
            return Err(PlanError::PlanCompleted {
                plan_id,
                total_weeks: plan.total_weeks,
            });
        }
        let expected_version = plan.version;
        plan.weeks_completed += 1;
        plan.updated_at = Utc::now();

        let saved = self.plans.save(&plan, expected_version).await?;
        info!(
            weeks_completed = saved.weeks_completed,
            total_weeks = saved.total_weeks,
            "Week completed"
        );
        Ok(saved)
    }

    /// Deactivate a plan; deactivating a deactivated plan succeeds unchanged
    ///
    /// # Errors
    ///
    /// Returns `PlanNotFound`, `ConcurrentModification`, or a storage error
    #[instrument(skip_all, fields(plan_id = %plan_id))]
    pub async fn deactivate(&self, plan_id: Uuid) -> Result<Plan, PlanError> {
        let _guard = self.plan_locks.lock(plan_id).await;

        let mut plan = self.get_plan(plan_id).await?;
        let expected_version = plan.version;
        if !plan.deactivate(Utc::now()) {
            debug!("Plan already deactivated");
            return Ok(plan);
        }

        let saved = self.plans.save(&plan, expected_version).await?;
        info!(owner_id = %saved.owner_id, version = saved.version, "Plan deactivated");
        Ok(saved)
    }

    /// Record a training session for later progression analysis
    ///
    /// # Errors
    ///
    /// Returns `InvalidConstraints` for malformed logs or logs that reference
    /// another user's plan, `PlanNotFound`, or a storage error
    #[instrument(skip_all, fields(user_id = %log.user_id, session_id = %log.id))]
    pub async fn record_session(&self, log: &SessionLog) -> Result<(), PlanError> {
        validate_session_log(log)?;
        if let Some(plan_id) = log.plan_id {
            let plan = self.get_plan(plan_id).await?;
            if plan.owner_id != log.user_id {
                return Err(PlanError::invalid_constraint(
                    "session_log.plan_id",
                    format!("plan {plan_id} belongs to another user"),
                ));
            }
        }
        self.sessions.record(log).await?;
        debug!(exercises = log.exercises.len(), completed = log.completed, "Session recorded");
        Ok(())
    }

    /// Run progression for every active plan through [`Self::trigger_progression`]
    ///
    /// Failures are collected per plan; one failing plan does not stop the sweep.
    ///
    /// # Errors
    ///
    /// Returns a storage error only if the active plans cannot be listed
    #[instrument(skip(self))]
    pub async fn run_progression_sweep(&self, auto_apply: bool) -> Result<SweepReport, PlanError> {
        let active = self.plans.list_active().await?;
        let mut report = SweepReport::default();

        for plan in active {
            let entry = match self.trigger_progression(plan.id, auto_apply).await {
                Ok(outcome) => SweepEntry::completed(&plan, &outcome),
                Err(error) => {
                    warn!(plan_id = %plan.id, error = %error, "Progression sweep failed for plan");
                    SweepEntry::failed(&plan, &error)
                }
            };
            report.record(entry);
        }

        info!(
            plans = report.plans_checked,
            suggested = report.plans_with_suggestions,
            applied = report.plans_applied,
            failed = report.plans_failed,
            "Progression sweep finished"
        );
        Ok(report)
    }

    async fn load_active(&self, plan_id: Uuid) -> Result<Plan, PlanError> {
        let plan = self.get_plan(plan_id).await?;
        ensure_active(&plan)?;
        Ok(plan)
    }
}

fn ensure_active(plan: &Plan) -> Result<(), PlanError> {
    if plan.is_active() {
        Ok(())
    } else {
        Err(PlanError::PlanNotActive {
            plan_id: plan.id,
            status: plan.status.to_string(),
        })
    }
}

fn validate_session_log(log: &SessionLog) -> Result<(), PlanError> {
    if let Some(day) = log.day_index {
        if day >= DAYS_IN_WEEK {
            return Err(PlanError::invalid_constraint(
                "session_log.day_index",
                format!("day index {day} is outside 0..{DAYS_IN_WEEK}"),
            ));
        }
    }
    for entry in &log.exercises {
        if entry.exercise_ref.trim().is_empty() {
            return Err(PlanError::invalid_constraint(
                "session_log.exercise_ref",
                "exercise reference must not be empty",
            ));
        }
        if let Some(rpe) = entry.rpe {
            if !(0.0..=10.0).contains(&rpe) {
                return Err(PlanError::invalid_constraint(
                    "session_log.rpe",
                    format!("RPE {rpe} for {} is outside 0..=10", entry.exercise_ref),
                ));
            }
        }
    }
    Ok(())
}
