// ABOUTME: Turns recent training logs into explainable progression suggestions for a plan
// ABOUTME: Optionally folds suggestions into a single progression adjustment through the adjustment engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Progression Analyzer
//!
//! Per exercise the analyzer computes a completion ratio (actual over planned
//! sets) and an RPE trend over the completed sessions in the lookback window,
//! then picks at most one suggestion:
//!
//! | Signal | Suggestion |
//! |--------|------------|
//! | RPE above overreach or ratio below the minimum | nothing |
//! | ratio below full completion | nothing (hold) |
//! | RPE at or below headroom | Volume |
//! | RPE between headroom and overreach | Intensity |
//! | no RPE | Intensity for advanced plans, otherwise Volume |
//!
//! Too little history is not an error; the exercise is skipped.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pierre_core::constants::{adjustment, progression};
use pierre_core::errors::PlanError;
use pierre_core::models::{
    ChangeValue, ExercisePrescription, ExperienceLevel, Plan, PlannedLoad, PlannedTarget,
    PrescriptionField, ProgressionSuggestion, SessionLog, SuggestionChange, SuggestionType,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::adjustment_engine::AdjustmentEngine;
use crate::config::{PlanEngineConfig, ProgressionConfig};

/// Observed performance for one exercise over the lookback window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSignal {
    /// Catalog identifier
    pub exercise_ref: String,
    /// Completed sessions that included the exercise
    pub sessions: usize,
    /// Mean of actual over planned sets
    pub completion_ratio: f64,
    /// Mean reported RPE, if any session reported one
    pub rpe_trend: Option<f64>,
}

/// Growth still available to suggestions within one analysis run
#[derive(Debug, Default)]
struct GrowthBudget {
    /// Minutes already committed per training day
    extra_minutes: BTreeMap<u8, f64>,
    /// Sets that may still be added across the plan
    sets_left: u32,
}

/// Result of a pure analysis run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressionAnalysis {
    /// Suggestions, at most one per exercise plus one plan-level frequency suggestion
    pub suggestions: Vec<ProgressionSuggestion>,
    /// Signals for every exercise with enough history
    pub signals: Vec<ExerciseSignal>,
}

/// Plan after an analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionOutcome {
    /// Updated plan
    pub plan: Plan,
    /// Suggestions produced by the run
    pub suggestions: Vec<ProgressionSuggestion>,
    /// Whether suggestions were committed as an adjustment
    pub applied: bool,
}

/// Analyzes training history against plan prescriptions
pub struct ProgressionAnalyzer {
    config: ProgressionConfig,
}

impl Default for ProgressionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionAnalyzer {
    /// Create an analyzer using the global engine configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PlanEngineConfig::global().progression.clone())
    }

    /// Create an analyzer with explicit configuration
    #[must_use]
    pub const fn with_config(config: ProgressionConfig) -> Self {
        Self { config }
    }

    /// Analyzer configuration
    #[must_use]
    pub const fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// Compute suggestions without changing the plan
    #[must_use]
    pub fn analyze(
        &self,
        plan: &Plan,
        recent_logs: &[SessionLog],
        now: DateTime<Utc>,
    ) -> ProgressionAnalysis {
        let logs: Vec<&SessionLog> = recent_logs
            .iter()
            .filter(|log| log.completed)
            .filter(|log| log.plan_id.is_none_or(|id| id == plan.id))
            .collect();

        let mut refs: Vec<&str> = Vec::new();
        for prescription in &plan.exercises {
            if !refs.contains(&prescription.exercise_ref.as_str()) {
                refs.push(&prescription.exercise_ref);
            }
        }

        let signals: Vec<ExerciseSignal> = refs
            .par_iter()
            .filter_map(|exercise_ref| self.signal(plan, &logs, exercise_ref))
            .collect();

        let budget = f64::from(plan.session_length_minutes);
        let mut growth = GrowthBudget {
            sets_left: (f64::from(plan.weekly_volume) * self.config.max_added_volume_pct / 100.0)
                .floor() as u32,
            ..GrowthBudget::default()
        };
        let mut suggestions = Vec::new();

        for signal in &signals {
            let Some(suggestion) = self.suggest(plan, signal, budget, &mut growth, now)
            else {
                continue;
            };
            if plan.is_declined(&suggestion) {
                debug!(plan_id = %plan.id, exercise_ref = %signal.exercise_ref, "Suppressing declined suggestion");
                continue;
            }
            suggestions.push(suggestion);
        }

        if let Some(frequency) = self.frequency_suggestion(plan, logs.len(), now) {
            if !plan.is_declined(&frequency) {
                suggestions.push(frequency);
            }
        }

        debug!(
            plan_id = %plan.id,
            analyzed = signals.len(),
            suggestions = suggestions.len(),
            "Progression analysis complete"
        );

        ProgressionAnalysis {
            suggestions,
            signals,
        }
    }

    /// Analyze and either store the suggestions or commit them
    ///
    /// With `auto_apply` every suggestion is folded into one `Progression`
    /// adjustment; otherwise the plan's pending suggestions are replaced.
    ///
    /// # Errors
    ///
    /// Returns the adjustment engine's error if committing fails.
    pub fn analyze_and_apply(
        &self,
        plan: &Plan,
        recent_logs: &[SessionLog],
        auto_apply: bool,
        engine: &AdjustmentEngine,
        now: DateTime<Utc>,
    ) -> Result<ProgressionOutcome, PlanError> {
        let analysis = self.analyze(plan, recent_logs, now);

        if auto_apply && !analysis.suggestions.is_empty() {
            let mut updated = engine.apply_suggestions(plan, &analysis.suggestions, now)?;
            updated.progression_suggestions.clear();
            return Ok(ProgressionOutcome {
                plan: updated,
                suggestions: analysis.suggestions,
                applied: true,
            });
        }

        let mut updated = plan.clone();
        if !auto_apply {
            updated
                .progression_suggestions
                .clone_from(&analysis.suggestions);
            updated.updated_at = now;
        }
        Ok(ProgressionOutcome {
            plan: updated,
            suggestions: analysis.suggestions,
            applied: false,
        })
    }

    fn signal(&self, plan: &Plan, logs: &[&SessionLog], exercise_ref: &str) -> Option<ExerciseSignal> {
        let mut ratios = Vec::new();
        let mut rpes = Vec::new();

        for log in logs {
            let Some(entry) = log.exercise(exercise_ref) else {
                continue;
            };
            let prescription = log
                .day_index
                .and_then(|day| {
                    plan.exercises
                        .iter()
                        .find(|p| p.exercise_ref == exercise_ref && p.day_index == day)
                })
                .or_else(|| plan.exercises.iter().find(|p| p.exercise_ref == exercise_ref))?;

            ratios.push(f64::from(entry.actual.sets) / f64::from(prescription.planned_sets.max(1)));
            if let Some(rpe) = entry.rpe {
                rpes.push(rpe);
            }
        }

        if ratios.len() < self.config.min_sessions_per_exercise {
            return None;
        }

        Some(ExerciseSignal {
            exercise_ref: exercise_ref.to_owned(),
            sessions: ratios.len(),
            completion_ratio: mean(&ratios),
            rpe_trend: (!rpes.is_empty()).then(|| mean(&rpes)),
        })
    }

    fn suggest(
        &self,
        plan: &Plan,
        signal: &ExerciseSignal,
        budget: f64,
        growth: &mut GrowthBudget,
        now: DateTime<Utc>,
    ) -> Option<ProgressionSuggestion> {
        let config = &self.config;
        // Overreaching or under-recovered
        if signal.rpe_trend.is_some_and(|rpe| rpe > config.overreach_rpe)
            || signal.completion_ratio < config.min_completion_ratio
        {
            return None;
        }
        // Prescription not yet met: hold
        if signal.completion_ratio < config.full_completion_ratio {
            return None;
        }

        let prefer_volume = match signal.rpe_trend {
            Some(rpe) => rpe <= config.headroom_rpe,
            None => plan.difficulty != ExperienceLevel::Advanced,
        };

        let instances: Vec<&ExercisePrescription> = plan
            .exercises
            .iter()
            .filter(|p| p.exercise_ref == signal.exercise_ref)
            .collect();
        let first = instances.first()?;
        let evidence = describe(signal);

        if prefer_volume {
            self.volume_suggestion(plan, &instances, budget, growth)
                .map(|(change, what)| ProgressionSuggestion {
                    id: Uuid::new_v4(),
                    suggestion_type: SuggestionType::Volume,
                    changes: vec![change],
                    reason: format!("{}: {evidence}; {what}", first.exercise_name),
                    suggested_at: now,
                })
        } else {
            self.intensity_suggestion(first).map(|(kind, change, what)| {
                ProgressionSuggestion {
                    id: Uuid::new_v4(),
                    suggestion_type: kind,
                    changes: vec![change],
                    reason: format!("{}: {evidence}; {what}", first.exercise_name),
                    suggested_at: now,
                }
            })
        }
    }

    /// +1 set if it fits every affected session and the set budget, else a rep
    /// or duration step
    fn volume_suggestion(
        &self,
        plan: &Plan,
        instances: &[&ExercisePrescription],
        budget: f64,
        growth: &mut GrowthBudget,
    ) -> Option<(SuggestionChange, String)> {
        let first = instances.first()?;
        let exercise_ref = Some(first.exercise_ref.clone());

        let fits = |extra: &dyn Fn(&ExercisePrescription) -> f64,
                    committed: &BTreeMap<u8, f64>| {
            instances.iter().all(|p| {
                let already = committed.get(&p.day_index).copied().unwrap_or(0.0);
                plan.session_minutes(p.day_index) + already + extra(p) <= budget
            })
        };
        let commit = |extra: &dyn Fn(&ExercisePrescription) -> f64,
                      committed: &mut BTreeMap<u8, f64>| {
            for p in instances {
                *committed.entry(p.day_index).or_insert(0.0) += extra(p);
            }
        };

        let add_set = |p: &ExercisePrescription| p.minutes_per_set();
        let added_sets = instances.len() as u32;
        if added_sets <= growth.sets_left && fits(&add_set, &growth.extra_minutes) {
            commit(&add_set, &mut growth.extra_minutes);
            growth.sets_left -= added_sets;
            let next = first.planned_sets + 1;
            return Some((
                SuggestionChange {
                    exercise_ref,
                    field: PrescriptionField::Sets,
                    old_value: ChangeValue::Number(f64::from(first.planned_sets)),
                    new_value: ChangeValue::Number(f64::from(next)),
                },
                format!("add a set ({} -> {next})", first.planned_sets),
            ));
        }

        match first.target {
            PlannedTarget::Reps { reps } => {
                let step = self.config.rep_step;
                let add_reps = |p: &ExercisePrescription| {
                    f64::from(step) * progression::SECONDS_PER_REP * f64::from(p.planned_sets)
                        / 60.0
                };
                if !fits(&add_reps, &growth.extra_minutes) {
                    return None;
                }
                commit(&add_reps, &mut growth.extra_minutes);
                Some((
                    SuggestionChange {
                        exercise_ref,
                        field: PrescriptionField::Reps,
                        old_value: ChangeValue::Number(f64::from(reps)),
                        new_value: ChangeValue::Number(f64::from(reps + step)),
                    },
                    format!("add {step} reps per set ({reps} -> {})", reps + step),
                ))
            }
            PlannedTarget::Duration { seconds } => {
                let step = self.config.duration_step_seconds;
                let add_time =
                    |p: &ExercisePrescription| f64::from(step) * f64::from(p.planned_sets) / 60.0;
                if !fits(&add_time, &growth.extra_minutes) {
                    return None;
                }
                commit(&add_time, &mut growth.extra_minutes);
                Some((
                    SuggestionChange {
                        exercise_ref,
                        field: PrescriptionField::DurationSeconds,
                        old_value: ChangeValue::Number(f64::from(seconds)),
                        new_value: ChangeValue::Number(f64::from(seconds + step)),
                    },
                    format!("add {step}s per set ({seconds}s -> {}s)", seconds + step),
                ))
            }
        }
    }

    /// Load step, or a harder variation for bodyweight movements
    fn intensity_suggestion(
        &self,
        prescription: &ExercisePrescription,
    ) -> Option<(SuggestionType, SuggestionChange, String)> {
        let exercise_ref = Some(prescription.exercise_ref.clone());
        match prescription.planned_load {
            PlannedLoad::Absolute { kg } => {
                let next = kg + self.config.absolute_load_step_kg;
                Some((
                    SuggestionType::Intensity,
                    SuggestionChange {
                        exercise_ref,
                        field: PrescriptionField::LoadKg,
                        old_value: ChangeValue::Number(kg),
                        new_value: ChangeValue::Number(next),
                    },
                    format!("increase load ({kg} kg -> {next} kg)"),
                ))
            }
            PlannedLoad::Relative { percent } => {
                if percent >= adjustment::MAX_INTENSITY {
                    return None;
                }
                let next = (percent + self.config.relative_load_step).min(adjustment::MAX_INTENSITY);
                Some((
                    SuggestionType::Intensity,
                    SuggestionChange {
                        exercise_ref,
                        field: PrescriptionField::RelativeLoad,
                        old_value: ChangeValue::Number(percent),
                        new_value: ChangeValue::Number(next),
                    },
                    format!("increase relative load ({percent}% -> {next}%)"),
                ))
            }
            PlannedLoad::Bodyweight => {
                let next = prescription.progression_ref.clone()?;
                let what = format!("progress to {next}");
                Some((
                    SuggestionType::Exercise,
                    SuggestionChange {
                        exercise_ref,
                        field: PrescriptionField::Exercise,
                        old_value: ChangeValue::Exercise(prescription.exercise_ref.clone()),
                        new_value: ChangeValue::Exercise(next),
                    },
                    what,
                ))
            }
        }
    }

    fn frequency_suggestion(
        &self,
        plan: &Plan,
        completed_sessions: usize,
        now: DateTime<Utc>,
    ) -> Option<ProgressionSuggestion> {
        let per_iteration =
            completed_sessions as f64 / f64::from(self.config.lookback_iterations.max(1));
        if per_iteration <= f64::from(plan.sessions_per_week)
            || plan.sessions_per_week >= adjustment::MAX_SESSIONS_PER_WEEK
        {
            return None;
        }

        let current = plan.sessions_per_week;
        Some(ProgressionSuggestion {
            id: Uuid::new_v4(),
            suggestion_type: SuggestionType::Frequency,
            changes: vec![SuggestionChange {
                exercise_ref: None,
                field: PrescriptionField::SessionsPerWeek,
                old_value: ChangeValue::Number(f64::from(current)),
                new_value: ChangeValue::Number(f64::from(current + 1)),
            }],
            reason: format!(
                "Averaging {per_iteration:.1} completed sessions per week against {current} planned; add a session"
            ),
            suggested_at: now,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn describe(signal: &ExerciseSignal) -> String {
    let completion = format!(
        "{:.0}% of planned sets over {} sessions",
        signal.completion_ratio * 100.0,
        signal.sessions
    );
    match signal.rpe_trend {
        Some(rpe) => format!("{completion} at RPE {rpe:.1}"),
        None => completion,
    }
}
