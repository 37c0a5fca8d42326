// ABOUTME: Integration tests for bounded plan adjustments and their previews
// ABOUTME: Validates multiplicative deltas, history records, bounds, no-ops and session folding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use pierre_core::errors::{ErrorCode, PlanError};
use chrono::Utc;
use pierre_core::models::{
    AdjustmentType, ChangeValue, ExperienceLevel, Plan, PlanMetrics, PrescriptionField,
    ProfileConstraints, ProgressionSuggestion, SuggestionChange, SuggestionType,
};
use pierre_intelligence::config::{AdjustmentConfig, GenerationConfig};
use pierre_intelligence::{
    AdjustmentDelta, AdjustmentEngine, BuiltinExerciseCatalog, PlanGenerator,
};
use uuid::Uuid;

fn engine() -> AdjustmentEngine {
    AdjustmentEngine::with_config(
        Arc::new(BuiltinExerciseCatalog::new()),
        AdjustmentConfig::default(),
    )
}

fn generated(constraints: &ProfileConstraints) -> Plan {
    common::init_test_logging();
    PlanGenerator::with_config(
        Arc::new(BuiltinExerciseCatalog::new()),
        GenerationConfig::default(),
    )
    .generate(Uuid::new_v4(), constraints)
    .unwrap()
}

/// Generated plan rescaled to exactly 100 weekly sets
fn plan_with_hundred_sets() -> Plan {
    let mut plan = generated(&common::intermediate_gym_constraints());
    let count = plan.exercises.len() as u32;
    for (index, prescription) in plan.exercises.iter_mut().enumerate() {
        let extra = u32::from((index as u32) < 100 % count);
        prescription.set_planned_sets(100 / count + extra);
    }
    plan.weekly_volume = plan.total_planned_sets();
    assert_eq!(plan.weekly_volume, 100);
    plan.baseline = plan.metrics();
    plan
}

fn volume(pct: f64) -> AdjustmentDelta {
    AdjustmentDelta {
        volume_adjustment_pct: pct,
        ..AdjustmentDelta::default()
    }
}

#[test]
fn test_volume_increase_records_manual_adjustment() {
    let plan = plan_with_hundred_sets();
    let outcome = engine().adjust(&plan, &volume(10.0)).unwrap();
    let adjusted = outcome.plan;

    assert_eq!(adjusted.weekly_volume, 110);
    assert_eq!(adjusted.total_planned_sets(), 110);
    assert_eq!(adjusted.adjustment_history.len(), 1);

    let record = adjusted.adjustment_history.last().unwrap();
    assert_eq!(record.adjustment_type, AdjustmentType::Manual);
    assert!((record.changes.volume_adjustment_pct - 10.0).abs() < f64::EPSILON);
    assert_eq!(record.resulting, adjusted.metrics());

    // Input plan untouched
    assert_eq!(plan.weekly_volume, 100);
    assert!(plan.adjustment_history.is_empty());
}

#[test]
fn test_preview_matches_commit() {
    let plan = plan_with_hundred_sets();
    let delta = AdjustmentDelta {
        volume_adjustment_pct: -15.0,
        intensity_adjustment_pct: 10.0,
        frequency_adjustment_pct: 25.0,
        difficulty_preference: Some(ExperienceLevel::Advanced),
        notes: Some("deload then push".to_owned()),
    };

    let engine = engine();
    let preview = engine.preview(&plan, &delta).unwrap();
    let outcome = engine.adjust(&plan, &delta).unwrap();

    assert_eq!(preview.current, plan.metrics());
    assert_eq!(preview.projected, outcome.plan.metrics());
    assert_eq!(preview.exercises, outcome.plan.exercises);
    assert_eq!(outcome.preview, preview);
    assert_eq!(outcome.plan.difficulty, ExperienceLevel::Advanced);
    assert_eq!(
        outcome.plan.adjustment_history.last().unwrap().notes.as_deref(),
        Some("deload then push")
    );
}

#[test]
fn test_sequential_adjustments_compound() {
    let plan = plan_with_hundred_sets();
    let engine = engine();

    let first = engine.adjust(&plan, &volume(10.0)).unwrap().plan;
    let second = engine.adjust(&first, &volume(10.0)).unwrap().plan;

    // 100 * 1.1 = 110, 110 * 1.1 = 121
    assert_eq!(second.weekly_volume, 121);
    assert_eq!(second.adjustment_history.len(), 2);
    assert_eq!(
        second.adjustment_history.replay(&second.baseline),
        second.metrics()
    );
}

#[test]
fn test_out_of_range_deltas_rejected_at_boundaries() {
    let plan = plan_with_hundred_sets();
    let engine = engine();

    assert!(engine.preview(&plan, &volume(30.0)).is_ok());
    assert!(engine.preview(&plan, &volume(-30.0)).is_ok());

    let err = engine.adjust(&plan, &volume(30.5)).unwrap_err();
    assert_eq!(
        err,
        PlanError::DeltaOutOfRange {
            field: "volume_adjustment_pct",
            value: 30.5,
            min: -30.0,
            max: 30.0,
        }
    );
    assert_eq!(err.code(), ErrorCode::ValueOutOfRange);

    let intensity = AdjustmentDelta {
        intensity_adjustment_pct: -20.1,
        ..AdjustmentDelta::default()
    };
    assert!(matches!(
        engine.adjust(&plan, &intensity),
        Err(PlanError::DeltaOutOfRange {
            field: "intensity_adjustment_pct",
            ..
        })
    ));

    let not_a_number = AdjustmentDelta {
        frequency_adjustment_pct: f64::NAN,
        ..AdjustmentDelta::default()
    };
    assert!(matches!(
        engine.preview(&plan, &not_a_number),
        Err(PlanError::DeltaOutOfRange { .. })
    ));
}

#[test]
fn test_zero_delta_is_no_op() {
    let plan = plan_with_hundred_sets();
    let engine = engine();

    assert_eq!(
        engine.adjust(&plan, &AdjustmentDelta::default()).unwrap_err(),
        PlanError::NoOpAdjustment
    );

    // Same difficulty is still nothing to do
    let same_level = AdjustmentDelta {
        difficulty_preference: Some(plan.difficulty),
        ..AdjustmentDelta::default()
    };
    assert_eq!(
        engine.preview(&plan, &same_level).unwrap_err(),
        PlanError::NoOpAdjustment
    );

    let new_level = AdjustmentDelta {
        difficulty_preference: Some(ExperienceLevel::Beginner),
        ..AdjustmentDelta::default()
    };
    let adjusted = engine.adjust(&plan, &new_level).unwrap().plan;
    assert_eq!(adjusted.difficulty, ExperienceLevel::Beginner);
    assert_eq!(adjusted.weekly_volume, plan.weekly_volume);
}

#[test]
fn test_frequency_increase_adds_free_days() {
    let plan = generated(&common::beginner_bodyweight_constraints());
    assert_eq!(plan.session_days(), vec![0, 2, 4]);

    let delta = AdjustmentDelta {
        frequency_adjustment_pct: 30.0,
        ..AdjustmentDelta::default()
    };
    let preview = engine().preview(&plan, &delta).unwrap();

    // round(3 * 1.3) = 4
    assert_eq!(preview.projected.sessions_per_week, 4);
    assert_eq!(preview.sessions_added.len(), 1);
    assert!(preview.sessions_removed.is_empty());
    let added = preview.sessions_added[0];
    assert!(![0, 2, 4].contains(&added));
}

#[test]
fn test_frequency_decrease_folds_last_session() {
    let plan = generated(&common::intermediate_gym_constraints());
    let delta = AdjustmentDelta {
        frequency_adjustment_pct: -25.0,
        ..AdjustmentDelta::default()
    };
    let adjusted = engine().adjust(&plan, &delta).unwrap();
    let last_day = *plan.session_days().last().unwrap();

    assert_eq!(adjusted.plan.sessions_per_week, 3);
    assert_eq!(adjusted.preview.sessions_removed, vec![last_day]);
    assert!(adjusted.plan.exercises_on(last_day).next().is_none());
    assert_eq!(adjusted.plan.session_days().len(), 3);
}

#[test]
fn test_metric_formula_is_shared() {
    let plan = plan_with_hundred_sets();
    let delta = AdjustmentDelta {
        volume_adjustment_pct: 7.0,
        intensity_adjustment_pct: -3.0,
        ..AdjustmentDelta::default()
    };
    let preview = engine().preview(&plan, &delta).unwrap();
    let expected: PlanMetrics = plan.metrics().apply_changes(&delta.changes());
    assert_eq!(preview.projected, expected);
}

#[test]
fn test_frequency_change_keeps_weekly_volume() {
    let plan = generated(&common::beginner_bodyweight_constraints());
    assert_eq!(plan.weekly_volume, 18);

    let delta = AdjustmentDelta {
        frequency_adjustment_pct: 30.0,
        ..AdjustmentDelta::default()
    };
    let adjusted = engine().adjust(&plan, &delta).unwrap().plan;

    assert_eq!(adjusted.sessions_per_week, 4);
    assert_eq!(adjusted.session_days().len(), 4);
    assert_eq!(adjusted.weekly_volume, 18);
    assert_eq!(adjusted.total_planned_sets(), 18);
    assert!(adjusted.exercises.iter().all(|e| e.planned_sets >= 1));
}

#[test]
fn test_volume_cut_stops_at_one_set_per_exercise() {
    let engine = engine();
    let mut plan = generated(&common::beginner_bodyweight_constraints());
    let prescriptions = plan.exercises.len() as u32;

    // 18 -> 13 -> 9, then 9 * 0.7 would leave fewer sets than prescriptions
    for expected in [13, 9] {
        plan = engine.adjust(&plan, &volume(-30.0)).unwrap().plan;
        assert_eq!(plan.weekly_volume, expected);
        assert_eq!(plan.total_planned_sets(), expected);
        assert!(plan.exercises.iter().all(|e| e.planned_sets >= 1));
    }
    assert_eq!(plan.weekly_volume, prescriptions);

    let err = engine.adjust(&plan, &volume(-30.0)).unwrap_err();
    let PlanError::DeltaOutOfRange { field, min, .. } = err else {
        panic!("expected DeltaOutOfRange, got {err:?}");
    };
    assert_eq!(field, "volume_adjustment_pct");
    assert!((min + 5.5).abs() < 1e-9);

    // The reported minimum is accepted and keeps every prescription
    let floored = engine.adjust(&plan, &volume(min)).unwrap().plan;
    assert_eq!(floored.weekly_volume, prescriptions);
    assert_eq!(floored.total_planned_sets(), prescriptions);
}

#[test]
fn test_stale_suggestion_is_rejected_after_adjustment() {
    let engine = engine();
    let plan = generated(&common::beginner_bodyweight_constraints());
    let push_up = plan
        .exercises
        .iter()
        .find(|e| e.exercise_ref == "push_up")
        .unwrap();
    assert_eq!(push_up.planned_sets, 2);

    let suggestion = ProgressionSuggestion {
        id: Uuid::new_v4(),
        suggestion_type: SuggestionType::Volume,
        changes: vec![SuggestionChange {
            exercise_ref: Some("push_up".to_owned()),
            field: PrescriptionField::Sets,
            old_value: ChangeValue::Number(2.0),
            new_value: ChangeValue::Number(3.0),
        }],
        reason: "Push-up: easy sessions; add a set (2 -> 3)".to_owned(),
        suggested_at: Utc::now(),
    };

    let mut cut = plan.clone();
    for _ in 0..2 {
        cut = engine.adjust(&cut, &volume(-30.0)).unwrap().plan;
    }
    assert!(cut.exercises.iter().all(|e| e.planned_sets == 1));

    let err = engine
        .apply_suggestions(&cut, &[suggestion.clone()], Utc::now())
        .unwrap_err();
    assert!(matches!(err, PlanError::InvalidConstraints { .. }));

    // Against the plan it was computed from, the same suggestion applies
    let progressed = engine
        .apply_suggestions(&plan, &[suggestion], Utc::now())
        .unwrap();
    assert_eq!(progressed.weekly_volume, 21);
    assert_eq!(progressed.total_planned_sets(), 21);
}
