// ABOUTME: Shared test utilities and fixtures for plan engine integration tests
// ABOUTME: Provides quiet logging, profile constraints, in-memory managers and session log builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `pierre_plan_engine`

use std::collections::BTreeSet;
use std::env;
use std::sync::{Arc, Once};

use chrono::{Duration, Utc};
use pierre_plan_engine::database::memory::{InMemoryPlanStore, InMemorySessionLogStore};
use pierre_plan_engine::lifecycle::PlanLifecycleManager;
use pierre_plan_engine::models::{
    ActualPerformance, Equipment, ExerciseLog, ExperienceLevel, Goal, MuscleGroup, Plan,
    PlannedTarget, ProfileConstraints, SessionLog,
};
use pierre_plan_engine::{BuiltinExerciseCatalog, PlanEngineConfig};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Hypertrophy, beginner, bodyweight only, 3 x 45 minutes, chest and back
pub fn beginner_bodyweight_constraints() -> ProfileConstraints {
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

/// Strength, intermediate, full gym, 4 x 60 minutes, four focus groups
pub fn intermediate_gym_constraints() -> ProfileConstraints {
    ProfileConstraints {
        goals: BTreeSet::from([Goal::Strength, Goal::Hypertrophy]),
        experience_level: ExperienceLevel::Intermediate,
        equipment: BTreeSet::from([
            Equipment::Bodyweight,
            Equipment::Dumbbells,
            Equipment::Barbell,
            Equipment::Bench,
        ]),
        days_per_week: 4,
        preferred_days: BTreeSet::new(),
        session_length_minutes: 60,
        focus_areas: BTreeSet::from([
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Quadriceps,
            MuscleGroup::Shoulders,
        ]),
        injuries: String::new(),
    }
}

/// Lifecycle manager over fresh in-memory stores with default engine settings
pub struct TestEnv {
    pub manager: Arc<PlanLifecycleManager>,
    pub plans: Arc<InMemoryPlanStore>,
    pub sessions: Arc<InMemorySessionLogStore>,
}

pub fn memory_env() -> TestEnv {
    init_test_logging();
    let plans = Arc::new(InMemoryPlanStore::new());
    let sessions = Arc::new(InMemorySessionLogStore::new());
    let manager = Arc::new(PlanLifecycleManager::new(
        plans.clone(),
        sessions.clone(),
        Arc::new(BuiltinExerciseCatalog::new()),
        &PlanEngineConfig::default(),
    ));
    TestEnv {
        manager,
        plans,
        sessions,
    }
}

/// Entry matching the prescription exactly, with the given RPE
pub fn entry_as_planned(plan: &Plan, exercise_ref: &str, rpe: Option<f64>) -> ExerciseLog {
    let prescription = plan
        .exercises
        .iter()
        .find(|p| p.exercise_ref == exercise_ref)
        .expect("exercise in plan");
    let (reps, duration_seconds) = match prescription.target {
        PlannedTarget::Reps { reps } => (Some(reps), None),
        PlannedTarget::Duration { seconds } => (None, Some(seconds)),
    };
    ExerciseLog {
        exercise_ref: exercise_ref.to_owned(),
        actual: ActualPerformance {
            sets: prescription.planned_sets,
            reps,
            load_kg: None,
            duration_seconds,
        },
        rpe,
    }
}

/// Completed session covering every prescription of `day` as planned
pub fn session_as_planned(plan: &Plan, day: u8, rpe: Option<f64>, days_ago: i64) -> SessionLog {
    let exercises = plan
        .exercises_on(day)
        .map(|p| entry_as_planned(plan, &p.exercise_ref, rpe))
        .collect();
    SessionLog {
        id: Uuid::new_v4(),
        user_id: plan.owner_id,
        plan_id: Some(plan.id),
        performed_at: Utc::now() - Duration::days(days_ago),
        day_index: Some(day),
        completed: true,
        exercises,
    }
}

/// Same as [`session_as_planned`] with every set count scaled by `fraction`
pub fn session_partially_done(plan: &Plan, day: u8, fraction: f64, days_ago: i64) -> SessionLog {
    let mut log = session_as_planned(plan, day, Some(6.0), days_ago);
    for entry in &mut log.exercises {
        entry.actual.sets = (f64::from(entry.actual.sets) * fraction).floor() as u32;
    }
    log
}
