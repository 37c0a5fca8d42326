// ABOUTME: Builds an initial multi-week workout plan from validated profile constraints
// ABOUTME: Schedules sessions, selects exercises by focus and level, and sizes sessions to the time budget
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Generator
//!
//! Deterministic plan construction. Given the same constraints, catalog and
//! clock the generator produces the same prescriptions; only identifiers are
//! random.
//!
//! Steps:
//! 1. Fetch templates for the focus, equipment and level (plus adjacent levels)
//!    and keep those serving at least one goal.
//! 2. Place sessions on the week.
//! 3. Give each session a focus group and pick templates for it, preferring the
//!    requested level and dropping contraindicated exercises.
//! 4. Scale sets by experience and trim each session to the time budget.
//! 5. Derive weekly volume and average intensity.

use std::collections::BTreeSet;
use std::iter;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pierre_core::constants::profile_limits::DAYS_IN_WEEK;
use pierre_core::errors::PlanError;
use pierre_core::models::{
    round_to_tenth, AdjustmentHistory, ExercisePrescription, ExerciseTemplate, ExperienceLevel,
    MuscleGroup, Plan, PlanMetrics, PlanStatus, ProfileConstraints,
};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{bodyweight_substitute, ExerciseCatalog};
use crate::config::{GenerationConfig, PlanEngineConfig};

/// Generates plans from profile constraints
pub struct PlanGenerator {
    catalog: Arc<dyn ExerciseCatalog>,
    config: GenerationConfig,
}

impl PlanGenerator {
    /// Create a generator using the global engine configuration
    #[must_use]
    pub fn new(catalog: Arc<dyn ExerciseCatalog>) -> Self {
        Self::with_config(catalog, PlanEngineConfig::global().generation.clone())
    }

    /// Create a generator with explicit configuration
    #[must_use]
    pub fn with_config(catalog: Arc<dyn ExerciseCatalog>, config: GenerationConfig) -> Self {
        Self { catalog, config }
    }

    /// Generate a plan for `owner_id`
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range constraints, `EmptyFocusAreas`
    /// without focus areas and `InsufficientEquipment` when no template fits.
    pub fn generate(
        &self,
        owner_id: Uuid,
        constraints: &ProfileConstraints,
    ) -> Result<Plan, PlanError> {
        self.generate_at(owner_id, constraints, Utc::now())
    }

    /// Generate a plan with a fixed clock
    ///
    /// # Errors
    ///
    /// Same as [`PlanGenerator::generate`].
    pub fn generate_at(
        &self,
        owner_id: Uuid,
        constraints: &ProfileConstraints,
        now: DateTime<Utc>,
    ) -> Result<Plan, PlanError> {
        constraints.validate()?;

        let level = constraints.experience_level;
        let candidates: Vec<ExerciseTemplate> = self
            .catalog
            .find_by_focus_and_equipment(&constraints.focus_areas, &constraints.equipment, level)
            .into_iter()
            .filter(|template| template.fits_equipment(&constraints.equipment))
            .filter(|template| template.serves_any(&constraints.goals))
            .collect();

        if preferred_level_pool(&candidates, &constraints.focus_areas, level).is_empty() {
            return Err(PlanError::InsufficientEquipment {
                available: constraints.equipment_summary(),
            });
        }

        let days = schedule_days(constraints);
        let focus_groups = focus_groups(&constraints.focus_areas, days.len());
        let injury_tokens = constraints.injury_tokens();
        let budget = f64::from(constraints.session_length_minutes);

        let mut exercises = Vec::new();
        for (slot, day) in days.iter().copied().enumerate() {
            let slot_focus = &focus_groups[slot % focus_groups.len()];
            let mut pool: Vec<ExerciseTemplate> =
                preferred_level_pool(&candidates, slot_focus, level)
                    .into_iter()
                    .filter(|template| !template.is_contraindicated(&injury_tokens))
                    .collect();

            if pool.is_empty() {
                debug!(day, "All candidates filtered for slot, using bodyweight substitute");
                pool.push(bodyweight_substitute(slot_focus));
            }

            pool.sort_by(|a, b| {
                b.focus_match_count(&constraints.focus_areas)
                    .cmp(&a.focus_match_count(&constraints.focus_areas))
                    .then_with(|| a.id.cmp(&b.id))
            });
            pool.truncate(self.config.max_exercises_per_session);

            let mut session: Vec<ExercisePrescription> = pool
                .iter()
                .map(|template| {
                    let sets = self.scaled_sets(template.default_prescription.sets, level);
                    prescribe(template, sets, day)
                })
                .collect();

            while session.len() > 1 && session_minutes(&session) > budget {
                session.pop();
            }

            exercises.extend(session);
        }

        let (weekly_volume, average_intensity) = summarize(&exercises);
        let sessions_per_week = days.len() as u32;
        let goal = constraints.primary_goal();
        let baseline = PlanMetrics {
            weekly_volume,
            average_intensity,
            sessions_per_week,
            difficulty: level,
        };

        debug!(
            %owner_id,
            sessions_per_week,
            weekly_volume,
            average_intensity,
            exercise_count = exercises.len(),
            "Generated plan"
        );

        Ok(Plan {
            id: Uuid::new_v4(),
            owner_id,
            status: PlanStatus::Active,
            goal,
            difficulty: level,
            created_at: now,
            updated_at: now,
            version: 1,
            total_weeks: goal.default_total_weeks(),
            weeks_completed: 0,
            sessions_per_week,
            session_length_minutes: constraints.session_length_minutes,
            weekly_volume,
            average_intensity,
            baseline,
            exercises,
            adjustment_history: AdjustmentHistory::new(),
            progression_suggestions: Vec::new(),
            declined_suggestions: Vec::new(),
        })
    }

    fn scaled_sets(&self, default_sets: u32, level: ExperienceLevel) -> u32 {
        let scaled = (f64::from(default_sets) * self.config.set_factor(level)).round();
        (scaled as u32).max(1)
    }
}

/// Build a prescription for `template` with `sets` on `day`
///
/// The time estimate scales with the ratio of `sets` to the template default.
#[must_use]
pub fn prescribe(template: &ExerciseTemplate, sets: u32, day: u8) -> ExercisePrescription {
    let defaults = &template.default_prescription;
    let sets = sets.max(1);
    let ratio = if defaults.sets == 0 {
        1.0
    } else {
        f64::from(sets) / f64::from(defaults.sets)
    };

    ExercisePrescription {
        exercise_ref: template.id.clone(),
        exercise_name: template.name.clone(),
        modality: template.modality,
        primary_muscles: template.primary_muscles.clone(),
        planned_sets: sets,
        target: template.planned_target(),
        planned_load: defaults.load,
        reference_max_kg: template.reference_max_kg,
        rest_seconds: defaults.rest_seconds,
        estimated_minutes: template.estimated_minutes * ratio,
        day_index: day,
        progression_ref: template.progression_ref.clone(),
    }
}

/// Weekly volume and set-weighted average intensity of `exercises`
#[must_use]
pub fn summarize(exercises: &[ExercisePrescription]) -> (u32, f64) {
    let volume: u32 = exercises.iter().map(|e| e.planned_sets).sum();
    if volume == 0 {
        return (0, 0.0);
    }
    let weighted: f64 = exercises
        .iter()
        .map(|e| f64::from(e.planned_sets) * e.relative_intensity())
        .sum();
    (volume, round_to_tenth(weighted / f64::from(volume)))
}

fn session_minutes(session: &[ExercisePrescription]) -> f64 {
    session.iter().map(|e| e.estimated_minutes).sum()
}

/// Templates targeting `focus` at the nearest available level
fn preferred_level_pool(
    candidates: &[ExerciseTemplate],
    focus: &BTreeSet<MuscleGroup>,
    level: ExperienceLevel,
) -> Vec<ExerciseTemplate> {
    iter::once(level)
        .chain(level.relaxation_order().iter().copied())
        .map(|lvl| {
            candidates
                .iter()
                .filter(|template| template.level == lvl && template.targets_any(focus))
                .cloned()
                .collect::<Vec<_>>()
        })
        .find(|pool| !pool.is_empty())
        .unwrap_or_default()
}

/// Training days (0 = Monday) for the requested number of sessions
fn schedule_days(constraints: &ProfileConstraints) -> Vec<u8> {
    let sessions = usize::from(constraints.days_per_week);

    if !constraints.preferred_days.is_empty() {
        return constraints
            .preferred_days
            .iter()
            .take(sessions)
            .map(|day| day.index())
            .collect();
    }

    let week = usize::from(DAYS_IN_WEEK);
    if sessions <= 4 {
        // A rest day between every pair of sessions
        let stride = (week / sessions).max(2);
        (0..sessions).map(|i| (i * stride) as u8).collect()
    } else {
        (0..sessions)
            .map(|i| ((i * week) as f64 / sessions as f64).round() as u8)
            .collect()
    }
}

/// Focus group per session; two alternating groups when the week is busy enough
fn focus_groups(focus: &BTreeSet<MuscleGroup>, sessions: usize) -> Vec<BTreeSet<MuscleGroup>> {
    if sessions > 3 && focus.len() >= 3 {
        let even = focus.iter().copied().step_by(2).collect();
        let odd = focus.iter().copied().skip(1).step_by(2).collect();
        vec![even, odd]
    } else {
        vec![focus.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuiltinExerciseCatalog;
    use pierre_core::models::{Equipment, Goal, Weekday};

    fn constraints() -> ProfileConstraints {
        ProfileConstraints {
            goals: BTreeSet::from([Goal::Hypertrophy]),
            experience_level: ExperienceLevel::Beginner,
            equipment: BTreeSet::from([Equipment::Bodyweight]),
            days_per_week: 3,
            preferred_days: BTreeSet::new(),
            session_length_minutes: 45,
            focus_areas: BTreeSet::from([MuscleGroup::Chest, MuscleGroup::Back]),
            injuries: String::new(),
        }
    }

    fn generator() -> PlanGenerator {
        PlanGenerator::with_config(
            Arc::new(BuiltinExerciseCatalog::new()),
            GenerationConfig::default(),
        )
    }

    #[test]
    fn test_even_schedule_has_rest_days() {
        for days in 2..=4 {
            let mut c = constraints();
            c.days_per_week = days;
            let scheduled = schedule_days(&c);
            assert_eq!(scheduled.len(), usize::from(days));
            for pair in scheduled.windows(2) {
                assert!(pair[1] - pair[0] >= 2, "{scheduled:?}");
            }
        }
        let mut c = constraints();
        c.days_per_week = 6;
        assert_eq!(schedule_days(&c), vec![0, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn test_preferred_days_take_earliest() {
        let mut c = constraints();
        c.days_per_week = 2;
        c.preferred_days = BTreeSet::from([Weekday::Saturday, Weekday::Tuesday, Weekday::Thursday]);
        assert_eq!(schedule_days(&c), vec![1, 3]);
    }

    #[test]
    fn test_focus_alternates_only_for_busy_weeks() {
        let focus = BTreeSet::from([MuscleGroup::Chest, MuscleGroup::Back, MuscleGroup::Core]);
        assert_eq!(focus_groups(&focus, 3).len(), 1);
        let groups = focus_groups(&focus, 4);
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[0],
            BTreeSet::from([MuscleGroup::Chest, MuscleGroup::Core])
        );
        assert_eq!(groups[1], BTreeSet::from([MuscleGroup::Back]));
    }

    #[test]
    fn test_beginner_sets_scaled_down() {
        let plan = generator()
            .generate(Uuid::new_v4(), &constraints())
            .unwrap();
        let push_up = plan
            .exercises
            .iter()
            .find(|e| e.exercise_ref == "push_up")
            .unwrap();
        // round(3 x 0.8) = 2
        assert_eq!(push_up.planned_sets, 2);
        assert_eq!(plan.weekly_volume, plan.total_planned_sets());
        assert_eq!(plan.baseline, plan.metrics());
    }

    #[test]
    fn test_injury_exclusion_falls_back_to_substitute() {
        let mut c = constraints();
        c.focus_areas = BTreeSet::from([MuscleGroup::Quadriceps]);
        c.goals = BTreeSet::from([Goal::GeneralFitness]);
        c.injuries = "bad knee".to_owned();
        let plan = generator().generate(Uuid::new_v4(), &c).unwrap();
        assert!(plan
            .exercises
            .iter()
            .all(|e| e.exercise_ref == "bodyweight_circuit"));
        assert_eq!(plan.session_days().len(), 3);
    }

    #[test]
    fn test_session_trimmed_to_budget() {
        let mut c = constraints();
        c.equipment = BTreeSet::from([Equipment::Bodyweight, Equipment::CardioMachine]);
        c.goals = BTreeSet::from([Goal::Endurance]);
        c.focus_areas = BTreeSet::from([MuscleGroup::Cardio, MuscleGroup::Core]);
        c.session_length_minutes = 30;
        let plan = generator().generate(Uuid::new_v4(), &c).unwrap();
        for day in plan.session_days() {
            assert!(plan.exercises_on(day).count() >= 1);
            assert!(plan.session_minutes(day) <= 30.0 || plan.exercises_on(day).count() == 1);
        }
    }

    #[test]
    fn test_no_matching_equipment() {
        let mut c = constraints();
        c.equipment = BTreeSet::from([Equipment::Cable]);
        c.focus_areas = BTreeSet::from([MuscleGroup::Chest]);
        assert!(matches!(
            generator().generate(Uuid::new_v4(), &c),
            Err(PlanError::InsufficientEquipment { .. })
        ));
    }
}
