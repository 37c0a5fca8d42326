// ABOUTME: Profile constraint snapshot consumed by the plan generator
// ABOUTME: Defines goals, experience levels, equipment, weekdays, muscle groups and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{generation, profile_limits};
use crate::errors::PlanError;

/// Training goal a plan is built around
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    /// Maximal strength
    Strength,
    /// Muscle growth
    Hypertrophy,
    /// Muscular and cardiovascular endurance
    Endurance,
    /// Body composition
    FatLoss,
    /// Balanced general fitness
    GeneralFitness,
}

impl Goal {
    /// Default plan length in weeks for this goal
    #[must_use]
    pub const fn default_total_weeks(self) -> u32 {
        match self {
            Self::Strength | Self::Hypertrophy | Self::Endurance => generation::LONG_BLOCK_WEEKS,
            Self::FatLoss | Self::GeneralFitness => generation::SHORT_BLOCK_WEEKS,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Hypertrophy => "hypertrophy",
            Self::Endurance => "endurance",
            Self::FatLoss => "fat_loss",
            Self::GeneralFitness => "general_fitness",
        }
    }
}

/// Training experience, also used as plan difficulty
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// Less than a year of structured training
    #[default]
    Beginner,
    /// One to three years
    Intermediate,
    /// Three or more years
    Advanced,
}

impl ExperienceLevel {
    /// Levels to fall back to when no template matches exactly, nearest-below first
    #[must_use]
    pub const fn relaxation_order(self) -> &'static [Self] {
        match self {
            Self::Beginner => &[Self::Intermediate],
            Self::Intermediate => &[Self::Beginner, Self::Advanced],
            Self::Advanced => &[Self::Intermediate],
        }
    }

    /// Whether `other` is this level or directly adjacent to it
    #[must_use]
    pub fn is_within_one(self, other: Self) -> bool {
        (self as i8 - other as i8).abs() <= 1
    }

    /// Convert to string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equipment a user has access to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    /// No equipment beyond the floor
    Bodyweight,
    /// Dumbbells
    Dumbbells,
    /// Barbell and plates
    Barbell,
    /// Kettlebells
    Kettlebell,
    /// Elastic resistance bands
    ResistanceBands,
    /// Selectorized machines
    Machines,
    /// Cable stack
    Cable,
    /// Pull-up bar
    PullUpBar,
    /// Flat or adjustable bench
    Bench,
    /// Treadmill, bike, rower and similar
    CardioMachine,
}

impl Equipment {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bodyweight => "bodyweight",
            Self::Dumbbells => "dumbbells",
            Self::Barbell => "barbell",
            Self::Kettlebell => "kettlebell",
            Self::ResistanceBands => "resistance_bands",
            Self::Machines => "machines",
            Self::Cable => "cable",
            Self::PullUpBar => "pull_up_bar",
            Self::Bench => "bench",
            Self::CardioMachine => "cardio_machine",
        }
    }
}

/// Day of the training week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl Weekday {
    /// All weekdays in order
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Zero-based index, Monday = 0
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Weekday for a zero-based index
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }
}

/// Muscle groups used for focus selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    /// Pectorals
    Chest,
    /// Lats, traps and spinal erectors
    Back,
    /// Deltoids
    Shoulders,
    /// Biceps
    Biceps,
    /// Triceps
    Triceps,
    /// Abdominals and obliques
    Core,
    /// Quadriceps
    Quadriceps,
    /// Hamstrings
    Hamstrings,
    /// Glutes
    Glutes,
    /// Calves
    Calves,
    /// Compound whole-body work
    FullBody,
    /// Conditioning
    Cardio,
}

impl MuscleGroup {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Shoulders => "shoulders",
            Self::Biceps => "biceps",
            Self::Triceps => "triceps",
            Self::Core => "core",
            Self::Quadriceps => "quadriceps",
            Self::Hamstrings => "hamstrings",
            Self::Glutes => "glutes",
            Self::Calves => "calves",
            Self::FullBody => "full_body",
            Self::Cardio => "cardio",
        }
    }
}

/// Normalized snapshot of the onboarding inputs the generator needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConstraints {
    /// Training goals, at least one
    pub goals: BTreeSet<Goal>,
    /// Training experience
    pub experience_level: ExperienceLevel,
    /// Available equipment
    pub equipment: BTreeSet<Equipment>,
    /// Sessions per week, 2 to 6
    pub days_per_week: u8,
    /// Preferred training days; empty means no preference
    #[serde(default)]
    pub preferred_days: BTreeSet<Weekday>,
    /// Session length budget, 30 to 120 minutes
    pub session_length_minutes: u16,
    /// Muscle groups to emphasize
    pub focus_areas: BTreeSet<MuscleGroup>,
    /// Free-text injury notes, advisory only
    #[serde(default)]
    pub injuries: String,
}

impl ProfileConstraints {
    /// Validate ranges and generation preconditions
    ///
    /// # Errors
    ///
    /// Returns `InvalidConstraints` for out-of-range values, `InsufficientEquipment`
    /// when no equipment is listed and `EmptyFocusAreas` when no focus is given.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.goals.is_empty() {
            return Err(PlanError::invalid_constraint(
                "goals",
                "at least one goal is required",
            ));
        }

        if !(profile_limits::MIN_DAYS_PER_WEEK..=profile_limits::MAX_DAYS_PER_WEEK)
            .contains(&self.days_per_week)
        {
            return Err(PlanError::invalid_constraint(
                "days_per_week",
                format!(
                    "must be between {} and {}, got {}",
                    profile_limits::MIN_DAYS_PER_WEEK,
                    profile_limits::MAX_DAYS_PER_WEEK,
                    self.days_per_week
                ),
            ));
        }

        if !(profile_limits::MIN_SESSION_MINUTES..=profile_limits::MAX_SESSION_MINUTES)
            .contains(&self.session_length_minutes)
        {
            return Err(PlanError::invalid_constraint(
                "session_length_minutes",
                format!(
                    "must be between {} and {}, got {}",
                    profile_limits::MIN_SESSION_MINUTES,
                    profile_limits::MAX_SESSION_MINUTES,
                    self.session_length_minutes
                ),
            ));
        }

        if !self.preferred_days.is_empty()
            && self.preferred_days.len() < usize::from(self.days_per_week)
        {
            return Err(PlanError::invalid_constraint(
                "preferred_days",
                format!(
                    "{} preferred days cannot hold {} sessions",
                    self.preferred_days.len(),
                    self.days_per_week
                ),
            ));
        }

        if self.equipment.is_empty() {
            return Err(PlanError::InsufficientEquipment {
                available: "none".to_owned(),
            });
        }

        if self.focus_areas.is_empty() {
            return Err(PlanError::EmptyFocusAreas);
        }

        Ok(())
    }

    /// Primary goal, by declaration order of `Goal`
    #[must_use]
    pub fn primary_goal(&self) -> Goal {
        self.goals
            .iter()
            .next()
            .copied()
            .unwrap_or(Goal::GeneralFitness)
    }

    /// Lower-cased tokens from the injury notes used for contraindication matching
    #[must_use]
    pub fn injury_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .injuries
            .split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
            .filter(|token| token.chars().count() >= generation::MIN_INJURY_TOKEN_LEN)
            .filter(|token| !generation::INJURY_STOPWORDS.contains(&token.as_str()))
            .collect();
        tokens.sort();
        tokens.dedup();
        tokens
    }

    /// Comma-separated equipment list for messages
    #[must_use]
    pub fn equipment_summary(&self) -> String {
        self.equipment
            .iter()
            .map(|item| item.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
