// ABOUTME: Exercise catalog templates and the per-plan exercise prescriptions built from them
// ABOUTME: Modality is a closed tag that decides whether reps or duration is authoritative
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::profile::{Equipment, ExperienceLevel, Goal, MuscleGroup};
use crate::constants::generation;

/// Reps used when a reps-based template omits a default
const FALLBACK_REPS: u32 = 10;
/// Seconds used when a timed template omits a default
const FALLBACK_DURATION_SECONDS: u32 = 60;

/// How an exercise is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// Sets of repetitions
    Reps,
    /// Timed holds or efforts
    Time,
    /// Covered distance, prescribed as time
    Distance,
    /// Work/rest intervals
    Interval,
    /// Cadence-driven cardio
    Rpm,
}

impl Modality {
    /// Whether repetitions are the authoritative target
    #[must_use]
    pub const fn uses_reps(self) -> bool {
        match self {
            Self::Reps => true,
            Self::Time | Self::Distance | Self::Interval | Self::Rpm => false,
        }
    }
}

/// Per-set target; exactly one of reps or duration applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlannedTarget {
    /// Repetitions per set
    Reps {
        /// Repetitions
        reps: u32,
    },
    /// Work duration per set
    Duration {
        /// Seconds
        seconds: u32,
    },
}

/// Load prescribed for an exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlannedLoad {
    /// Own bodyweight at capacity
    Bodyweight,
    /// Absolute external load
    Absolute {
        /// Kilograms
        kg: f64,
    },
    /// Percentage of a reference maximum
    Relative {
        /// Percent, 0 to 100
        percent: f64,
    },
}

impl PlannedLoad {
    /// Relative load index (0-100) used for the plan's average intensity
    #[must_use]
    pub fn relative_intensity(&self, reference_max_kg: Option<f64>) -> f64 {
        match *self {
            Self::Bodyweight => generation::BODYWEIGHT_RELATIVE_LOAD,
            Self::Relative { percent } => percent,
            Self::Absolute { kg } => match reference_max_kg {
                Some(max) if max > 0.0 => kg / max * 100.0,
                _ => generation::DEFAULT_RELATIVE_LOAD,
            },
        }
    }
}

/// Starting prescription stored on a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultPrescription {
    /// Sets before experience scaling
    pub sets: u32,
    /// Reps per set for reps-based modalities
    #[serde(default)]
    pub reps: Option<u32>,
    /// Seconds per set for timed modalities
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    /// Starting load
    pub load: PlannedLoad,
    /// Rest between sets
    pub rest_seconds: u32,
}

/// Catalog entry describing an exercise and its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    /// Stable catalog identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Measurement modality
    pub modality: Modality,
    /// Goals this exercise serves
    pub goals: BTreeSet<Goal>,
    /// Experience level the template is written for
    pub level: ExperienceLevel,
    /// Equipment that must all be available
    pub required_equipment: BTreeSet<Equipment>,
    /// Primary muscles trained
    pub primary_muscles: BTreeSet<MuscleGroup>,
    /// Starting prescription
    pub default_prescription: DefaultPrescription,
    /// Estimated minutes for the default prescription including rest
    pub estimated_minutes: f64,
    /// Conditions that make the exercise unsuitable (e.g. "knee", "lower back")
    #[serde(default)]
    pub contraindications: Vec<String>,
    /// Reference maximum for absolute loads
    #[serde(default)]
    pub reference_max_kg: Option<f64>,
    /// Harder variation to progress to
    #[serde(default)]
    pub progression_ref: Option<String>,
}

impl ExerciseTemplate {
    /// Whether every required piece of equipment is available
    #[must_use]
    pub fn fits_equipment(&self, equipment: &BTreeSet<Equipment>) -> bool {
        self.required_equipment.is_subset(equipment)
    }

    /// Number of primary muscles inside `focus`
    #[must_use]
    pub fn focus_match_count(&self, focus: &BTreeSet<MuscleGroup>) -> usize {
        self.primary_muscles.intersection(focus).count()
    }

    /// Whether the template trains any of `focus`
    #[must_use]
    pub fn targets_any(&self, focus: &BTreeSet<MuscleGroup>) -> bool {
        self.focus_match_count(focus) > 0
    }

    /// Whether the template serves any of `goals`
    #[must_use]
    pub fn serves_any(&self, goals: &BTreeSet<Goal>) -> bool {
        !self.goals.is_disjoint(goals)
    }

    /// Case-insensitive substring match between contraindications and injury tokens
    #[must_use]
    pub fn is_contraindicated(&self, injury_tokens: &[String]) -> bool {
        self.contraindications.iter().any(|contraindication| {
            let contraindication = contraindication.to_lowercase();
            injury_tokens.iter().any(|token| {
                contraindication.contains(token.as_str()) || token.contains(&contraindication)
            })
        })
    }

    /// Authoritative per-set target for this template's modality
    #[must_use]
    pub fn planned_target(&self) -> PlannedTarget {
        let defaults = &self.default_prescription;
        if self.modality.uses_reps() {
            PlannedTarget::Reps {
                reps: defaults.reps.unwrap_or(FALLBACK_REPS),
            }
        } else {
            PlannedTarget::Duration {
                seconds: defaults
                    .duration_seconds
                    .unwrap_or(FALLBACK_DURATION_SECONDS),
            }
        }
    }
}

/// One exercise as prescribed on a specific training day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePrescription {
    /// Catalog identifier of the exercise
    pub exercise_ref: String,
    /// Display name
    pub exercise_name: String,
    /// Measurement modality
    pub modality: Modality,
    /// Primary muscles trained
    pub primary_muscles: BTreeSet<MuscleGroup>,
    /// Planned sets, at least one
    pub planned_sets: u32,
    /// Reps or duration per set
    pub target: PlannedTarget,
    /// Planned load
    pub planned_load: PlannedLoad,
    /// Reference maximum for absolute loads
    #[serde(default)]
    pub reference_max_kg: Option<f64>,
    /// Rest between sets
    pub rest_seconds: u32,
    /// Estimated minutes for all planned sets including rest
    pub estimated_minutes: f64,
    /// Training day, 0 = Monday
    pub day_index: u8,
    /// Harder variation to progress to
    #[serde(default)]
    pub progression_ref: Option<String>,
}

impl ExercisePrescription {
    /// Relative load index for this prescription
    #[must_use]
    pub fn relative_intensity(&self) -> f64 {
        self.planned_load.relative_intensity(self.reference_max_kg)
    }

    /// Estimated minutes consumed by one set
    #[must_use]
    pub fn minutes_per_set(&self) -> f64 {
        if self.planned_sets == 0 {
            return self.estimated_minutes;
        }
        self.estimated_minutes / f64::from(self.planned_sets)
    }

    /// Change the set count, keeping the per-set time estimate
    pub fn set_planned_sets(&mut self, sets: u32) {
        let per_set = self.minutes_per_set();
        self.planned_sets = sets.max(1);
        self.estimated_minutes = per_set * f64::from(self.planned_sets);
    }
}
