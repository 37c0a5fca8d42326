// ABOUTME: Workout plan aggregate with its append-only adjustment history and progression suggestions
// ABOUTME: Holds the single metric formula shared by previews, adjustments and history replay
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::exercise::ExercisePrescription;
use super::profile::{ExperienceLevel, Goal};
use crate::constants::adjustment;

/// Round to one decimal place
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Lifecycle status of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Plan is in use and may be adjusted or progressed
    Active,
    /// Reserved; no operation enters or leaves this state
    Paused,
    /// Terminal; the plan is frozen
    Deactivated,
}

impl PlanStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Deactivated => "deactivated",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "deactivated" => Some(Self::Deactivated),
            _ => None,
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate numbers that adjustments act on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanMetrics {
    /// Planned sets per week
    pub weekly_volume: u32,
    /// Relative load index, 0 to 100
    pub average_intensity: f64,
    /// Training sessions per week
    pub sessions_per_week: u32,
    /// Plan difficulty
    pub difficulty: ExperienceLevel,
}

impl PlanMetrics {
    /// Apply percentage changes to these metrics.
    ///
    /// Percentages act multiplicatively on the current values. This is the only
    /// implementation of the formula: previews, commits and history replay all
    /// call it.
    #[must_use]
    pub fn apply_changes(&self, changes: &AdjustmentChanges) -> Self {
        let volume = (f64::from(self.weekly_volume)
            * (1.0 + changes.volume_adjustment_pct / 100.0))
            .round()
            .max(0.0);
        let intensity = round_to_tenth(
            self.average_intensity * (1.0 + changes.intensity_adjustment_pct / 100.0),
        )
        .clamp(0.0, adjustment::MAX_INTENSITY);
        let sessions = (f64::from(self.sessions_per_week)
            * (1.0 + changes.frequency_adjustment_pct / 100.0))
            .round()
            .clamp(
                f64::from(adjustment::MIN_SESSIONS_PER_WEEK),
                f64::from(adjustment::MAX_SESSIONS_PER_WEEK),
            );

        Self {
            weekly_volume: volume as u32,
            average_intensity: intensity,
            sessions_per_week: sessions as u32,
            difficulty: changes.difficulty_preference.unwrap_or(self.difficulty),
        }
    }
}

/// Origin of an adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Requested by the user
    Manual,
    /// Applied from progression suggestions
    Progression,
    /// Initiated by the platform
    System,
}

impl AdjustmentType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Progression => "progression",
            Self::System => "system",
        }
    }
}

/// Percentage deltas recorded for an adjustment
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AdjustmentChanges {
    /// Volume change in percent
    pub volume_adjustment_pct: f64,
    /// Intensity change in percent
    pub intensity_adjustment_pct: f64,
    /// Frequency change in percent
    pub frequency_adjustment_pct: f64,
    /// New plan difficulty, if changed
    #[serde(default)]
    pub difficulty_preference: Option<ExperienceLevel>,
}

impl AdjustmentChanges {
    /// Whether all percentages are zero
    #[must_use]
    pub fn has_zero_deltas(&self) -> bool {
        self.volume_adjustment_pct == 0.0
            && self.intensity_adjustment_pct == 0.0
            && self.frequency_adjustment_pct == 0.0
    }
}

/// Immutable audit entry describing one committed adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRecord {
    /// Record identifier
    pub id: Uuid,
    /// Commit time
    pub adjusted_at: DateTime<Utc>,
    /// Origin
    pub adjustment_type: AdjustmentType,
    /// Percentage deltas
    pub changes: AdjustmentChanges,
    /// Prescription-level changes applied alongside the deltas
    #[serde(default)]
    pub prescription_changes: Vec<SuggestionChange>,
    /// User notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Why the adjustment happened
    pub reason: String,
    /// Metrics after the adjustment
    pub resulting: PlanMetrics,
}

/// Append-only log of adjustments for one plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjustmentHistory {
    records: Vec<AdjustmentRecord>,
}

impl AdjustmentHistory {
    /// Empty history
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record; existing records are never touched
    pub fn append(&mut self, record: AdjustmentRecord) {
        self.records.push(record);
    }

    /// Iterate in commit order
    pub fn iter(&self) -> impl Iterator<Item = &AdjustmentRecord> {
        self.records.iter()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no adjustment has been committed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record
    #[must_use]
    pub fn last(&self) -> Option<&AdjustmentRecord> {
        self.records.last()
    }

    /// Records as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[AdjustmentRecord] {
        &self.records
    }

    /// Recompute metrics by replaying every record from `baseline`
    #[must_use]
    pub fn replay(&self, baseline: &PlanMetrics) -> PlanMetrics {
        self.records
            .iter()
            .fold(*baseline, |metrics, record| metrics.apply_changes(&record.changes))
    }
}

/// Kind of progression suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    /// More sets, reps or time
    Volume,
    /// More load
    Intensity,
    /// Swap to a harder variation
    Exercise,
    /// More sessions per week
    Frequency,
}

/// Field a suggestion changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionField {
    /// Planned sets
    Sets,
    /// Reps per set
    Reps,
    /// Seconds per set
    DurationSeconds,
    /// Absolute load in kg
    LoadKg,
    /// Relative load in percent
    RelativeLoad,
    /// Exercise identity
    Exercise,
    /// Plan-level sessions per week
    SessionsPerWeek,
}

/// Value on either side of a suggested change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChangeValue {
    /// Numeric quantity
    Number(f64),
    /// Exercise reference
    Exercise(String),
}

/// One field change proposed by a suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionChange {
    /// Affected exercise; `None` for plan-level changes
    pub exercise_ref: Option<String>,
    /// Affected field
    pub field: PrescriptionField,
    /// Current value
    pub old_value: ChangeValue,
    /// Proposed value
    pub new_value: ChangeValue,
}

/// Suggestion produced by a progression analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSuggestion {
    /// Suggestion identifier
    pub id: Uuid,
    /// Kind of suggestion
    pub suggestion_type: SuggestionType,
    /// Proposed changes
    pub changes: Vec<SuggestionChange>,
    /// Explanation shown to the user
    pub reason: String,
    /// When it was produced
    pub suggested_at: DateTime<Utc>,
}

/// Fingerprint of a declined suggestion so it does not resurface unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclinedSuggestion {
    /// Kind of the declined suggestion
    pub suggestion_type: SuggestionType,
    /// Affected exercise
    pub exercise_ref: Option<String>,
    /// Affected field
    pub field: PrescriptionField,
    /// Value at the time of the decline
    pub old_value: ChangeValue,
    /// When it was declined
    pub declined_at: DateTime<Utc>,
}

impl DeclinedSuggestion {
    /// Fingerprints for every change of a declined suggestion
    #[must_use]
    pub fn from_suggestion(suggestion: &ProgressionSuggestion, now: DateTime<Utc>) -> Vec<Self> {
        suggestion
            .changes
            .iter()
            .map(|change| Self {
                suggestion_type: suggestion.suggestion_type,
                exercise_ref: change.exercise_ref.clone(),
                field: change.field,
                old_value: change.old_value.clone(),
                declined_at: now,
            })
            .collect()
    }

    /// Whether `suggestion` proposes the same change from the same starting value
    #[must_use]
    pub fn matches(&self, suggestion: &ProgressionSuggestion) -> bool {
        self.suggestion_type == suggestion.suggestion_type
            && suggestion.changes.iter().any(|change| {
                change.exercise_ref == self.exercise_ref
                    && change.field == self.field
                    && change.old_value == self.old_value
            })
    }
}

/// Personalized multi-week workout plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan identifier
    pub id: Uuid,
    /// Owning user
    pub owner_id: Uuid,
    /// Lifecycle status
    pub status: PlanStatus,
    /// Primary goal
    pub goal: Goal,
    /// Difficulty
    pub difficulty: ExperienceLevel,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency version, incremented on every save
    pub version: u64,
    /// Planned duration
    pub total_weeks: u32,
    /// Weeks completed so far
    pub weeks_completed: u32,
    /// Sessions per week
    pub sessions_per_week: u32,
    /// Session time budget
    pub session_length_minutes: u16,
    /// Planned sets per week
    pub weekly_volume: u32,
    /// Relative load index, 0 to 100
    pub average_intensity: f64,
    /// Metrics at generation time
    pub baseline: PlanMetrics,
    /// Prescriptions ordered by day then slot
    pub exercises: Vec<ExercisePrescription>,
    /// Append-only adjustment log
    #[serde(default)]
    pub adjustment_history: AdjustmentHistory,
    /// Pending suggestions from the latest analysis
    #[serde(default)]
    pub progression_suggestions: Vec<ProgressionSuggestion>,
    /// Declined suggestion fingerprints
    #[serde(default)]
    pub declined_suggestions: Vec<DeclinedSuggestion>,
}

impl Plan {
    /// Whether the plan accepts adjustments and progression
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PlanStatus::Active
    }

    /// Current aggregate metrics
    #[must_use]
    pub const fn metrics(&self) -> PlanMetrics {
        PlanMetrics {
            weekly_volume: self.weekly_volume,
            average_intensity: self.average_intensity,
            sessions_per_week: self.sessions_per_week,
            difficulty: self.difficulty,
        }
    }

    /// Write aggregate metrics back onto the plan
    pub fn set_metrics(&mut self, metrics: &PlanMetrics) {
        self.weekly_volume = metrics.weekly_volume;
        self.average_intensity = metrics.average_intensity;
        self.sessions_per_week = metrics.sessions_per_week;
        self.difficulty = metrics.difficulty;
    }

    /// Distinct training days in ascending order
    #[must_use]
    pub fn session_days(&self) -> Vec<u8> {
        let mut days: Vec<u8> = self.exercises.iter().map(|e| e.day_index).collect();
        days.sort_unstable();
        days.dedup();
        days
    }

    /// Prescriptions scheduled on `day`
    pub fn exercises_on(&self, day: u8) -> impl Iterator<Item = &ExercisePrescription> {
        self.exercises.iter().filter(move |e| e.day_index == day)
    }

    /// Estimated minutes for the session on `day`
    #[must_use]
    pub fn session_minutes(&self, day: u8) -> f64 {
        self.exercises_on(day).map(|e| e.estimated_minutes).sum()
    }

    /// Sum of planned sets across all prescriptions
    #[must_use]
    pub fn total_planned_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.planned_sets).sum()
    }

    /// Pending suggestion by id
    #[must_use]
    pub fn suggestion(&self, suggestion_id: Uuid) -> Option<&ProgressionSuggestion> {
        self.progression_suggestions
            .iter()
            .find(|s| s.id == suggestion_id)
    }

    /// Remove and return a pending suggestion
    pub fn take_suggestion(&mut self, suggestion_id: Uuid) -> Option<ProgressionSuggestion> {
        let index = self
            .progression_suggestions
            .iter()
            .position(|s| s.id == suggestion_id)?;
        Some(self.progression_suggestions.remove(index))
    }

    /// Whether an equivalent suggestion was declined before
    #[must_use]
    pub fn is_declined(&self, suggestion: &ProgressionSuggestion) -> bool {
        self.declined_suggestions
            .iter()
            .any(|declined| declined.matches(suggestion))
    }

    /// Move to `Deactivated`; returns false if it already was
    pub fn deactivate(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == PlanStatus::Deactivated {
            return false;
        }
        self.status = PlanStatus::Deactivated;
        self.progression_suggestions.clear();
        self.updated_at = now;
        true
    }
}
