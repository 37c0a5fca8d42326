// ABOUTME: Logged training sessions used as the progression signal
// ABOUTME: Records actual sets, reps, load and optional RPE per exercise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the user actually did for one exercise
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActualPerformance {
    /// Completed sets
    pub sets: u32,
    /// Reps per set, if reps-based
    #[serde(default)]
    pub reps: Option<u32>,
    /// Load used, if any
    #[serde(default)]
    pub load_kg: Option<f64>,
    /// Seconds per set, if timed
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

/// One exercise inside a logged session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
    /// Catalog identifier
    pub exercise_ref: String,
    /// Actual performance
    pub actual: ActualPerformance,
    /// Self-reported rate of perceived exertion, 1 to 10
    #[serde(default)]
    pub rpe: Option<f64>,
}

/// A logged training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    /// Log identifier
    pub id: Uuid,
    /// User who trained
    pub user_id: Uuid,
    /// Plan the session followed, if any
    #[serde(default)]
    pub plan_id: Option<Uuid>,
    /// When the session happened
    pub performed_at: DateTime<Utc>,
    /// Plan day the session corresponds to, 0 = Monday
    #[serde(default)]
    pub day_index: Option<u8>,
    /// Whether the session was finished
    pub completed: bool,
    /// Exercises performed
    pub exercises: Vec<ExerciseLog>,
}

impl SessionLog {
    /// Entry for `exercise_ref`, if the exercise was performed
    #[must_use]
    pub fn exercise(&self, exercise_ref: &str) -> Option<&ExerciseLog> {
        self.exercises
            .iter()
            .find(|entry| entry.exercise_ref == exercise_ref)
    }
}
