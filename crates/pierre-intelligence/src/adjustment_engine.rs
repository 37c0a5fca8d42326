// ABOUTME: Applies bounded percentage deltas to a plan and records each change in the audit trail
// ABOUTME: Preview and commit share one projection so previews always match committed results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Adjustment Engine
//!
//! Deltas act multiplicatively on the plan's current metrics through
//! [`PlanMetrics::apply_changes`]. Prescriptions follow the metrics:
//!
//! - frequency increases duplicate the lowest-volume sessions onto free days,
//!   decreases drop the latest sessions and fold their exercises into the
//!   smallest survivors
//! - planned sets are re-apportioned with the largest-remainder method whenever
//!   they no longer add up to the weekly volume, so a frequency change keeps
//!   the volume and spreads it over the new sessions
//! - intensity changes scale external loads; bodyweight loads are unchanged
//!
//! Every prescription keeps at least one set, so a cut below one set per
//! prescription is rejected with the smallest reachable percentage.
//!
//! Progression passes explicit prescription changes instead. Each change must
//! still match the plan it was computed from.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pierre_core::constants::{adjustment, profile_limits::DAYS_IN_WEEK, progression};
use pierre_core::errors::PlanError;
use pierre_core::models::{
    round_to_tenth, AdjustmentChanges, AdjustmentRecord, AdjustmentType, ChangeValue,
    ExercisePrescription, ExperienceLevel, Plan, PlanMetrics, PlannedLoad, PlannedTarget,
    PrescriptionField, ProgressionSuggestion, SuggestionChange, SuggestionType,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::ExerciseCatalog;
use crate::config::{AdjustmentConfig, PlanEngineConfig};
use crate::plan_generator::{prescribe, summarize};

/// Requested change to a plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdjustmentDelta {
    /// Volume change in percent
    #[serde(default)]
    pub volume_adjustment_pct: f64,
    /// Intensity change in percent
    #[serde(default)]
    pub intensity_adjustment_pct: f64,
    /// Frequency change in percent
    #[serde(default)]
    pub frequency_adjustment_pct: f64,
    /// New plan difficulty
    #[serde(default)]
    pub difficulty_preference: Option<ExperienceLevel>,
    /// Free-text notes stored on the record
    #[serde(default)]
    pub notes: Option<String>,
}

impl AdjustmentDelta {
    /// Percentage part of the delta
    #[must_use]
    pub const fn changes(&self) -> AdjustmentChanges {
        AdjustmentChanges {
            volume_adjustment_pct: self.volume_adjustment_pct,
            intensity_adjustment_pct: self.intensity_adjustment_pct,
            frequency_adjustment_pct: self.frequency_adjustment_pct,
            difficulty_preference: self.difficulty_preference,
        }
    }

    fn notes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }
}

/// Projected effect of a delta, computed without touching the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentPreview {
    /// Metrics before the adjustment
    pub current: PlanMetrics,
    /// Metrics after the adjustment
    pub projected: PlanMetrics,
    /// Percentages that would be recorded
    pub changes: AdjustmentChanges,
    /// Training days added by a frequency increase
    pub sessions_added: Vec<u8>,
    /// Training days removed by a frequency decrease
    pub sessions_removed: Vec<u8>,
    /// Prescriptions after the adjustment
    pub exercises: Vec<ExercisePrescription>,
}

/// Adjusted plan plus the preview it was committed from
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentOutcome {
    /// Adjusted plan with one more history record
    pub plan: Plan,
    /// Projection that was applied
    pub preview: AdjustmentPreview,
}

/// Applies bounded adjustments to plans
pub struct AdjustmentEngine {
    catalog: Arc<dyn ExerciseCatalog>,
    config: AdjustmentConfig,
}

impl AdjustmentEngine {
    /// Create an engine using the global engine configuration
    #[must_use]
    pub fn new(catalog: Arc<dyn ExerciseCatalog>) -> Self {
        Self::with_config(catalog, PlanEngineConfig::global().adjustment.clone())
    }

    /// Create an engine with explicit configuration
    #[must_use]
    pub fn with_config(catalog: Arc<dyn ExerciseCatalog>, config: AdjustmentConfig) -> Self {
        Self { catalog, config }
    }

    /// Engine configuration
    #[must_use]
    pub const fn config(&self) -> &AdjustmentConfig {
        &self.config
    }

    /// Compute the effect of `delta` without mutating `plan`
    ///
    /// # Errors
    ///
    /// Returns `DeltaOutOfRange` for out-of-range or non-finite percentages and
    /// `NoOpAdjustment` when the delta changes nothing.
    pub fn preview(&self, plan: &Plan, delta: &AdjustmentDelta) -> Result<AdjustmentPreview, PlanError> {
        self.validate(plan, delta, &[])?;
        self.project(plan, &delta.changes(), &[])
    }

    /// Apply a manual adjustment
    ///
    /// # Errors
    ///
    /// Same as [`AdjustmentEngine::preview`].
    pub fn adjust(&self, plan: &Plan, delta: &AdjustmentDelta) -> Result<AdjustmentOutcome, PlanError> {
        self.adjust_with_type(
            plan,
            delta,
            AdjustmentType::Manual,
            Vec::new(),
            "Manual adjustment".to_owned(),
            Utc::now(),
        )
    }

    /// Apply an adjustment of any origin, optionally with explicit prescription changes
    ///
    /// # Errors
    ///
    /// Returns `DeltaOutOfRange`, `NoOpAdjustment`, or `InvalidConstraints` when a
    /// prescription change references an exercise that is not in the plan or catalog.
    pub fn adjust_with_type(
        &self,
        plan: &Plan,
        delta: &AdjustmentDelta,
        adjustment_type: AdjustmentType,
        prescription_changes: Vec<SuggestionChange>,
        reason: String,
        now: DateTime<Utc>,
    ) -> Result<AdjustmentOutcome, PlanError> {
        self.validate(plan, delta, &prescription_changes)?;
        let changes = delta.changes();
        let preview = self.project(plan, &changes, &prescription_changes)?;

        let mut adjusted = plan.clone();
        adjusted.exercises = preview.exercises.clone();
        adjusted.set_metrics(&preview.projected);
        adjusted.updated_at = now;
        if adjustment_type == AdjustmentType::Manual {
            // Pending suggestions were computed against the old prescriptions
            adjusted.progression_suggestions.clear();
        }
        adjusted.adjustment_history.append(AdjustmentRecord {
            id: Uuid::new_v4(),
            adjusted_at: now,
            adjustment_type,
            changes,
            prescription_changes,
            notes: delta.notes().map(str::to_owned),
            reason,
            resulting: preview.projected,
        });

        debug!(
            plan_id = %plan.id,
            ?adjustment_type,
            weekly_volume = preview.projected.weekly_volume,
            average_intensity = preview.projected.average_intensity,
            sessions_per_week = preview.projected.sessions_per_week,
            "Adjustment applied"
        );

        Ok(AdjustmentOutcome {
            plan: adjusted,
            preview,
        })
    }

    /// Apply one prescription change to `prescription` in place
    ///
    /// # Errors
    ///
    /// Returns `InvalidConstraints` when an exercise swap targets an unknown template.
    pub fn apply_change(
        &self,
        prescription: &mut ExercisePrescription,
        change: &SuggestionChange,
    ) -> Result<(), PlanError> {
        match (&change.field, &change.new_value) {
            // Sessions of one exercise may carry different set counts, so the step applies to each
            (PrescriptionField::Sets, ChangeValue::Number(sets)) => {
                let step = match change.old_value {
                    ChangeValue::Number(old) => sets - old,
                    ChangeValue::Exercise(_) => 0.0,
                };
                let next = (f64::from(prescription.planned_sets) + step).round().max(1.0);
                prescription.set_planned_sets(next as u32);
            }
            (PrescriptionField::Reps, ChangeValue::Number(reps)) => {
                if let PlannedTarget::Reps { reps: current } = prescription.target {
                    let next = reps.round().max(1.0) as u32;
                    let extra_seconds = (f64::from(next) - f64::from(current))
                        * progression::SECONDS_PER_REP
                        * f64::from(prescription.planned_sets);
                    prescription.estimated_minutes =
                        (prescription.estimated_minutes + extra_seconds / 60.0).max(0.0);
                    prescription.target = PlannedTarget::Reps { reps: next };
                }
            }
            (PrescriptionField::DurationSeconds, ChangeValue::Number(seconds)) => {
                if let PlannedTarget::Duration { seconds: current } = prescription.target {
                    let next = seconds.round().max(1.0) as u32;
                    let extra_seconds = (f64::from(next) - f64::from(current))
                        * f64::from(prescription.planned_sets);
                    prescription.estimated_minutes =
                        (prescription.estimated_minutes + extra_seconds / 60.0).max(0.0);
                    prescription.target = PlannedTarget::Duration { seconds: next };
                }
            }
            (PrescriptionField::LoadKg, ChangeValue::Number(kg)) => {
                prescription.planned_load = PlannedLoad::Absolute { kg: kg.max(0.0) };
            }
            (PrescriptionField::RelativeLoad, ChangeValue::Number(percent)) => {
                prescription.planned_load = PlannedLoad::Relative {
                    percent: percent.clamp(0.0, adjustment::MAX_INTENSITY),
                };
            }
            (PrescriptionField::Exercise, ChangeValue::Exercise(exercise_ref)) => {
                let template = self.catalog.get(exercise_ref).ok_or_else(|| {
                    PlanError::invalid_constraint(
                        "prescription_changes",
                        format!("unknown exercise '{exercise_ref}'"),
                    )
                })?;
                *prescription =
                    prescribe(&template, prescription.planned_sets, prescription.day_index);
            }
            // Session count is carried by the frequency percentage
            (PrescriptionField::SessionsPerWeek, _) => {}
            (field, value) => {
                return Err(PlanError::invalid_constraint(
                    "prescription_changes",
                    format!("value {value:?} does not fit field {field:?}"),
                ));
            }
        }
        Ok(())
    }

    /// Fold `suggestions` into one `Progression` adjustment
    ///
    /// Prescription changes are applied as given. The recorded volume percentage
    /// reproduces the resulting set count exactly; an added session keeps the
    /// weekly volume and shares it with the existing sessions.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConstraints` if a change no longer matches the plan, or
    /// any other adjustment engine error.
    pub fn apply_suggestions(
        &self,
        plan: &Plan,
        suggestions: &[ProgressionSuggestion],
        now: DateTime<Utc>,
    ) -> Result<Plan, PlanError> {
        let changes: Vec<SuggestionChange> = suggestions
            .iter()
            .flat_map(|s| s.changes.iter().cloned())
            .collect();

        let mut simulated = plan.exercises.clone();
        self.apply_prescription_changes(plan, &mut simulated, &changes)?;

        let (_, old_intensity) = summarize(&plan.exercises);
        let (mut target_sets, new_intensity) = summarize(&simulated);
        let frequency_pct = if suggestions
            .iter()
            .any(|s| s.suggestion_type == SuggestionType::Frequency)
            && plan.sessions_per_week > 0
        {
            clamp_pct(
                100.0 / f64::from(plan.sessions_per_week),
                self.config.max_frequency_pct,
            )
        } else {
            0.0
        };

        if frequency_pct != 0.0 {
            let sessions = plan
                .metrics()
                .apply_changes(&AdjustmentChanges {
                    frequency_adjustment_pct: frequency_pct,
                    ..AdjustmentChanges::default()
                })
                .sessions_per_week;
            add_sessions(&mut simulated, sessions as usize);
            target_sets = target_sets.max(simulated.len() as u32);
        }

        // Not rounded, so the recorded percentage lands on `target_sets`
        let max_volume = self.config.max_volume_pct;
        let volume_pct = percent_change(f64::from(plan.weekly_volume), f64::from(target_sets))
            .clamp(-max_volume, max_volume);

        let delta = AdjustmentDelta {
            volume_adjustment_pct: volume_pct,
            intensity_adjustment_pct: clamp_pct(
                percent_change(old_intensity, new_intensity),
                self.config.max_intensity_pct,
            ),
            frequency_adjustment_pct: frequency_pct,
            difficulty_preference: None,
            notes: None,
        };
        let reason = suggestions
            .iter()
            .map(|s| s.reason.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        let outcome = self.adjust_with_type(
            plan,
            &delta,
            AdjustmentType::Progression,
            changes,
            reason,
            now,
        )?;
        Ok(outcome.plan)
    }

    /// Apply `changes` to `exercises`, rejecting any whose old value no longer
    /// matches the plan
    fn apply_prescription_changes(
        &self,
        plan: &Plan,
        exercises: &mut [ExercisePrescription],
        changes: &[SuggestionChange],
    ) -> Result<(), PlanError> {
        for change in changes {
            let Some(exercise_ref) = change.exercise_ref.as_deref() else {
                if change.field == PrescriptionField::SessionsPerWeek
                    && !same_value(
                        &ChangeValue::Number(f64::from(plan.sessions_per_week)),
                        &change.old_value,
                    )
                {
                    return Err(stale_change(change));
                }
                continue;
            };

            let current = exercises
                .iter()
                .find(|p| p.exercise_ref == exercise_ref)
                .ok_or_else(|| {
                    PlanError::invalid_constraint(
                        "prescription_changes",
                        format!("exercise '{exercise_ref}' is not in the plan"),
                    )
                })?;
            if !current_value(current, change.field)
                .is_some_and(|value| same_value(&value, &change.old_value))
            {
                return Err(stale_change(change));
            }

            for prescription in exercises
                .iter_mut()
                .filter(|p| p.exercise_ref == exercise_ref)
            {
                self.apply_change(prescription, change)?;
            }
        }
        Ok(())
    }

    fn validate(
        &self,
        plan: &Plan,
        delta: &AdjustmentDelta,
        prescription_changes: &[SuggestionChange],
    ) -> Result<(), PlanError> {
        check_range(
            "volume_adjustment_pct",
            delta.volume_adjustment_pct,
            self.config.max_volume_pct,
        )?;
        check_range(
            "intensity_adjustment_pct",
            delta.intensity_adjustment_pct,
            self.config.max_intensity_pct,
        )?;
        check_range(
            "frequency_adjustment_pct",
            delta.frequency_adjustment_pct,
            self.config.max_frequency_pct,
        )?;

        let difficulty_changes = delta
            .difficulty_preference
            .is_some_and(|level| level != plan.difficulty);
        if delta.changes().has_zero_deltas()
            && !difficulty_changes
            && delta.notes().is_none()
            && prescription_changes.is_empty()
        {
            return Err(PlanError::NoOpAdjustment);
        }
        Ok(())
    }

    /// The single projection used by both preview and commit
    fn project(
        &self,
        plan: &Plan,
        changes: &AdjustmentChanges,
        prescription_changes: &[SuggestionChange],
    ) -> Result<AdjustmentPreview, PlanError> {
        let current = plan.metrics();
        let projected = current.apply_changes(changes);
        let mut exercises = plan.exercises.clone();
        self.apply_prescription_changes(plan, &mut exercises, prescription_changes)?;

        let days_before = session_days(&exercises);
        let target_sessions = projected.sessions_per_week as usize;
        let mut sessions_added = Vec::new();
        let mut sessions_removed = Vec::new();

        if target_sessions > days_before.len() {
            sessions_added = add_sessions(&mut exercises, target_sessions);
        } else if target_sessions < days_before.len() {
            sessions_removed =
                remove_sessions(&mut exercises, target_sessions, self.config.fold_session_cap);
        }

        // One set per prescription at least
        if (projected.weekly_volume as usize) < exercises.len() {
            return Err(PlanError::DeltaOutOfRange {
                field: "volume_adjustment_pct",
                value: changes.volume_adjustment_pct,
                min: minimum_volume_pct(current.weekly_volume, exercises.len()),
                max: self.config.max_volume_pct,
            });
        }
        if total_sets(&exercises) != projected.weekly_volume {
            apportion_sets(&mut exercises, projected.weekly_volume);
        }

        if prescription_changes.is_empty() && changes.intensity_adjustment_pct != 0.0 {
            let factor = 1.0 + changes.intensity_adjustment_pct / 100.0;
            for prescription in &mut exercises {
                prescription.planned_load =
                    scale_load(prescription.planned_load, factor, self.config.load_rounding_kg);
            }
        }

        exercises.sort_by_key(|p| p.day_index);

        Ok(AdjustmentPreview {
            current,
            projected,
            changes: *changes,
            sessions_added,
            sessions_removed,
            exercises,
        })
    }
}

fn percent_change(old: f64, new: f64) -> f64 {
    if old > 0.0 {
        (new / old - 1.0) * 100.0
    } else {
        0.0
    }
}

/// Smallest volume percentage, to a tenth, that keeps one set per prescription
fn minimum_volume_pct(volume: u32, prescriptions: usize) -> f64 {
    let volume = f64::from(volume.max(1));
    let needed = prescriptions as f64;
    let mut pct = (((needed - 0.5) / volume - 1.0) * 1000.0).ceil() / 10.0;
    if (volume * (1.0 + pct / 100.0)).round() < needed {
        pct = round_to_tenth(pct + 0.1);
    }
    pct
}

fn stale_change(change: &SuggestionChange) -> PlanError {
    PlanError::invalid_constraint(
        "prescription_changes",
        format!(
            "{:?} of '{}' no longer matches {:?}",
            change.field,
            change.exercise_ref.as_deref().unwrap_or("plan"),
            change.old_value
        ),
    )
}

/// Current value of `field` on `prescription`, in suggestion terms
fn current_value(prescription: &ExercisePrescription, field: PrescriptionField) -> Option<ChangeValue> {
    match (field, prescription.target, prescription.planned_load) {
        (PrescriptionField::Sets, _, _) => {
            Some(ChangeValue::Number(f64::from(prescription.planned_sets)))
        }
        (PrescriptionField::Reps, PlannedTarget::Reps { reps }, _) => {
            Some(ChangeValue::Number(f64::from(reps)))
        }
        (PrescriptionField::DurationSeconds, PlannedTarget::Duration { seconds }, _) => {
            Some(ChangeValue::Number(f64::from(seconds)))
        }
        (PrescriptionField::LoadKg, _, PlannedLoad::Absolute { kg }) => Some(ChangeValue::Number(kg)),
        (PrescriptionField::RelativeLoad, _, PlannedLoad::Relative { percent }) => {
            Some(ChangeValue::Number(percent))
        }
        (PrescriptionField::Exercise, _, _) => {
            Some(ChangeValue::Exercise(prescription.exercise_ref.clone()))
        }
        _ => None,
    }
}

fn same_value(current: &ChangeValue, expected: &ChangeValue) -> bool {
    match (current, expected) {
        (ChangeValue::Number(a), ChangeValue::Number(b)) => (a - b).abs() < 1e-9,
        (ChangeValue::Exercise(a), ChangeValue::Exercise(b)) => a == b,
        _ => false,
    }
}

fn check_range(field: &'static str, value: f64, bound: f64) -> Result<(), PlanError> {
    if value.is_finite() && (-bound..=bound).contains(&value) {
        Ok(())
    } else {
        Err(PlanError::DeltaOutOfRange {
            field,
            value,
            min: -bound,
            max: bound,
        })
    }
}

fn clamp_pct(value: f64, bound: f64) -> f64 {
    if value.is_finite() {
        round_to_tenth(value.clamp(-bound, bound))
    } else {
        0.0
    }
}

fn session_days(exercises: &[ExercisePrescription]) -> Vec<u8> {
    let mut days: Vec<u8> = exercises.iter().map(|e| e.day_index).collect();
    days.sort_unstable();
    days.dedup();
    days
}

fn total_sets(exercises: &[ExercisePrescription]) -> u32 {
    exercises.iter().map(|e| e.planned_sets).sum()
}

fn session_sets(exercises: &[ExercisePrescription], day: u8) -> u32 {
    exercises
        .iter()
        .filter(|e| e.day_index == day)
        .map(|e| e.planned_sets)
        .sum()
}

/// Free weekday furthest from every existing session, earliest on ties
fn free_day(days: &[u8]) -> Option<u8> {
    let week = DAYS_IN_WEEK;
    (0..week).filter(|day| !days.contains(day)).max_by_key(|&day| {
        let gap = days
            .iter()
            .map(|&used| {
                let d = day.abs_diff(used);
                d.min(week - d)
            })
            .min()
            .unwrap_or(week);
        (gap, Reverse(day))
    })
}

/// Duplicate lowest-volume sessions onto free days; returns the new days
fn add_sessions(exercises: &mut Vec<ExercisePrescription>, target: usize) -> Vec<u8> {
    let mut added = Vec::new();
    let mut days = session_days(exercises);
    while days.len() < target {
        let Some(source) = days
            .iter()
            .copied()
            .min_by_key(|&day| (session_sets(exercises, day), day))
        else {
            break;
        };
        let Some(day) = free_day(&days) else {
            break;
        };
        let copies: Vec<ExercisePrescription> = exercises
            .iter()
            .filter(|e| e.day_index == source)
            .map(|e| ExercisePrescription {
                day_index: day,
                ..e.clone()
            })
            .collect();
        exercises.extend(copies);
        added.push(day);
        days = session_days(exercises);
    }
    added.sort_unstable();
    added
}

/// Remove the latest sessions, folding their distinct exercises into the
/// smallest surviving sessions under `cap`; returns the removed days
fn remove_sessions(exercises: &mut Vec<ExercisePrescription>, target: usize, cap: usize) -> Vec<u8> {
    let mut removed = Vec::new();
    let mut days = session_days(exercises);
    while days.len() > target.max(1) {
        let Some(last) = days.pop() else {
            break;
        };
        let (dropped, kept): (Vec<_>, Vec<_>) =
            exercises.drain(..).partition(|e| e.day_index == last);
        *exercises = kept;

        for prescription in dropped {
            let destination = days
                .iter()
                .copied()
                .filter(|&day| {
                    let on_day: Vec<&ExercisePrescription> =
                        exercises.iter().filter(|e| e.day_index == day).collect();
                    on_day.len() < cap
                        && on_day
                            .iter()
                            .all(|e| e.exercise_ref != prescription.exercise_ref)
                })
                .min_by_key(|&day| {
                    (
                        exercises.iter().filter(|e| e.day_index == day).count(),
                        day,
                    )
                });
            if let Some(day) = destination {
                exercises.push(ExercisePrescription {
                    day_index: day,
                    ..prescription
                });
            }
        }
        removed.push(last);
    }
    removed.sort_unstable();
    removed
}

/// Re-apportion planned sets to `volume` by the largest-remainder method
///
/// Every prescription keeps at least one set; the exact total holds whenever
/// `volume` covers one set per prescription.
fn apportion_sets(exercises: &mut [ExercisePrescription], volume: u32) {
    let total = total_sets(exercises);
    if total == 0 || exercises.is_empty() {
        return;
    }

    let quotas: Vec<f64> = exercises
        .iter()
        .map(|e| f64::from(e.planned_sets) * f64::from(volume) / f64::from(total))
        .collect();
    let mut allotted: Vec<u32> = quotas.iter().map(|q| q.floor() as u32).collect();
    let remaining = volume.saturating_sub(allotted.iter().sum());

    let mut by_remainder: Vec<usize> = (0..quotas.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = quotas[a] - quotas[a].floor();
        let rb = quotas[b] - quotas[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    for &index in by_remainder.iter().take(remaining as usize) {
        allotted[index] += 1;
    }

    // Lift empty prescriptions to one set, taken from the largest allotment
    while let Some(empty) = allotted.iter().position(|&sets| sets == 0) {
        allotted[empty] = 1;
        let donor = (0..allotted.len())
            .filter(|&i| allotted[i] > 1)
            .max_by_key(|&i| (allotted[i], Reverse(i)));
        if let Some(donor) = donor {
            allotted[donor] -= 1;
        }
    }

    for (prescription, sets) in exercises.iter_mut().zip(allotted) {
        prescription.set_planned_sets(sets);
    }
}

fn scale_load(load: PlannedLoad, factor: f64, rounding_kg: f64) -> PlannedLoad {
    match load {
        PlannedLoad::Bodyweight => PlannedLoad::Bodyweight,
        PlannedLoad::Absolute { kg } => PlannedLoad::Absolute {
            kg: ((kg * factor) / rounding_kg).round() * rounding_kg,
        },
        PlannedLoad::Relative { percent } => PlannedLoad::Relative {
            percent: round_to_tenth(percent * factor).min(adjustment::MAX_INTENSITY),
        },
    }
}
