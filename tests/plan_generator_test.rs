// ABOUTME: Integration tests for initial plan generation from profile constraints
// ABOUTME: Covers scheduling, equipment and focus feasibility, time budgets and validation errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use pierre_core::constants::generation::BODYWEIGHT_SUBSTITUTE_ID;
use pierre_core::errors::{ErrorCode, PlanError};
use pierre_core::models::{Equipment, Goal, MuscleGroup, PlanStatus, Weekday};
use pierre_intelligence::config::GenerationConfig;
use pierre_intelligence::{BuiltinExerciseCatalog, ExerciseCatalog, PlanGenerator};
use uuid::Uuid;

fn generator() -> (PlanGenerator, Arc<BuiltinExerciseCatalog>) {
    common::init_test_logging();
    let catalog = Arc::new(BuiltinExerciseCatalog::new());
    (
        PlanGenerator::with_config(catalog.clone(), GenerationConfig::default()),
        catalog,
    )
}

#[test]
fn test_beginner_bodyweight_plan() {
    let (generator, catalog) = generator();
    let constraints = common::beginner_bodyweight_constraints();
    let owner = Uuid::new_v4();

    let plan = generator.generate(owner, &constraints).unwrap();

    assert_eq!(plan.owner_id, owner);
    assert_eq!(plan.status, PlanStatus::Active);
    assert_eq!(plan.goal, Goal::Hypertrophy);
    assert_eq!(plan.version, 1);
    assert_eq!(plan.total_weeks, Goal::Hypertrophy.default_total_weeks());
    assert_eq!(plan.weeks_completed, 0);
    assert!(plan.adjustment_history.is_empty());
    assert!(plan.progression_suggestions.is_empty());

    // Three sessions, never on consecutive days
    assert_eq!(plan.sessions_per_week, 3);
    assert_eq!(plan.session_days(), vec![0, 2, 4]);

    for prescription in &plan.exercises {
        let template = catalog
            .get(&prescription.exercise_ref)
            .expect("prescription refers to a catalog template");
        assert!(
            template.fits_equipment(&constraints.equipment),
            "{} needs more than bodyweight",
            template.id
        );
        assert!(template.targets_any(&constraints.focus_areas));
        assert!(prescription.planned_sets >= 1);
    }

    for day in plan.session_days() {
        assert!(plan.exercises_on(day).count() >= 1);
        assert!(plan.session_minutes(day) <= f64::from(constraints.session_length_minutes));
    }

    assert_eq!(plan.weekly_volume, plan.total_planned_sets());
    assert_eq!(plan.baseline, plan.metrics());
    assert!(plan.average_intensity > 0.0 && plan.average_intensity <= 100.0);
}

#[test]
fn test_generation_is_deterministic_apart_from_ids() {
    let (generator, _) = generator();
    let constraints = common::intermediate_gym_constraints();

    let first = generator.generate(Uuid::new_v4(), &constraints).unwrap();
    let second = generator.generate(Uuid::new_v4(), &constraints).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.exercises, second.exercises);
    assert_eq!(first.metrics(), second.metrics());
}

#[test]
fn test_busy_week_alternates_focus_groups() {
    let (generator, _) = generator();
    let constraints = common::intermediate_gym_constraints();

    let plan = generator.generate(Uuid::new_v4(), &constraints).unwrap();
    let days = plan.session_days();
    assert_eq!(days.len(), 4);

    let muscles_on = |day: u8| -> BTreeSet<MuscleGroup> {
        plan.exercises_on(day)
            .flat_map(|e| e.primary_muscles.iter().copied())
            .collect()
    };
    // Consecutive sessions train different focus groups
    assert_ne!(muscles_on(days[0]), muscles_on(days[1]));
}

#[test]
fn test_preferred_days_are_used() {
    let (generator, _) = generator();
    let mut constraints = common::beginner_bodyweight_constraints();
    constraints.days_per_week = 2;
    constraints.preferred_days = BTreeSet::from([Weekday::Tuesday, Weekday::Saturday]);

    let plan = generator.generate(Uuid::new_v4(), &constraints).unwrap();
    assert_eq!(
        plan.session_days(),
        vec![Weekday::Tuesday.index(), Weekday::Saturday.index()]
    );
}

#[test]
fn test_contraindicated_exercises_are_excluded() {
    let (generator, _) = generator();
    let mut constraints = common::beginner_bodyweight_constraints();
    constraints.injuries = "recovering shoulder".to_owned();

    let plan = generator.generate(Uuid::new_v4(), &constraints).unwrap();
    assert!(plan
        .exercises
        .iter()
        .all(|e| e.exercise_ref != "prone_y_raise"));
}

#[test]
fn test_everything_contraindicated_uses_substitute() {
    let (generator, _) = generator();
    let mut constraints = common::beginner_bodyweight_constraints();
    constraints.injuries = "wrist, lower back and shoulder".to_owned();

    let plan = generator.generate(Uuid::new_v4(), &constraints).unwrap();
    assert_eq!(plan.sessions_per_week, 3);
    assert!(plan
        .exercises
        .iter()
        .all(|e| e.exercise_ref == BODYWEIGHT_SUBSTITUTE_ID));
}

#[test]
fn test_validation_errors() {
    let (generator, _) = generator();
    let owner = Uuid::new_v4();

    let mut constraints = common::beginner_bodyweight_constraints();
    constraints.days_per_week = 7;
    let err = generator.generate(owner, &constraints).unwrap_err();
    assert!(matches!(
        err,
        PlanError::InvalidConstraints {
            field: "days_per_week",
            ..
        }
    ));
    assert_eq!(err.code(), ErrorCode::InvalidInput);

    let mut constraints = common::beginner_bodyweight_constraints();
    constraints.session_length_minutes = 20;
    assert!(matches!(
        generator.generate(owner, &constraints),
        Err(PlanError::InvalidConstraints {
            field: "session_length_minutes",
            ..
        })
    ));

    let mut constraints = common::beginner_bodyweight_constraints();
    constraints.focus_areas.clear();
    assert_eq!(
        generator.generate(owner, &constraints).unwrap_err(),
        PlanError::EmptyFocusAreas
    );

    let mut constraints = common::beginner_bodyweight_constraints();
    constraints.equipment = BTreeSet::from([Equipment::CardioMachine]);
    assert!(matches!(
        generator.generate(owner, &constraints),
        Err(PlanError::InsufficientEquipment { .. })
    ));
}
