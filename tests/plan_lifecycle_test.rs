// ABOUTME: Integration tests for the plan lifecycle manager over in-memory stores
// ABOUTME: Covers activation rules, versioned saves, suggestions, week completion, sessions and sweeps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use pierre_plan_engine::database::{PlanStore, SessionLogStore};
use pierre_plan_engine::errors::{ErrorCode, PlanError};
use pierre_plan_engine::lifecycle::spawn_progression_sweep;
use pierre_plan_engine::models::{AdjustmentType, PlanStatus};
use pierre_plan_engine::AdjustmentDelta;
use tokio::time::sleep;
use uuid::Uuid;

fn volume(pct: f64) -> AdjustmentDelta {
    AdjustmentDelta {
        volume_adjustment_pct: pct,
        ..AdjustmentDelta::default()
    }
}

#[tokio::test]
async fn test_one_active_plan_per_owner() {
    let env = common::memory_env();
    let owner = Uuid::new_v4();
    let constraints = common::beginner_bodyweight_constraints();

    let plan = env
        .manager
        .generate_and_activate(owner, &constraints)
        .await
        .unwrap();
    assert_eq!(plan.status, PlanStatus::Active);
    assert_eq!(
        env.manager.get_active(owner).await.unwrap().map(|p| p.id),
        Some(plan.id)
    );

    let err = env
        .manager
        .generate_and_activate(owner, &constraints)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PlanError::PlanAlreadyActive {
            owner_id: owner,
            plan_id: plan.id,
        }
    );
    assert_eq!(env.plans.len(), 1);

    // Another owner is unaffected
    assert!(env
        .manager
        .generate_and_activate(Uuid::new_v4(), &constraints)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_adjust_persists_with_version_and_history() {
    let env = common::memory_env();
    let plan = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &common::intermediate_gym_constraints())
        .await
        .unwrap();

    let outcome = env.manager.adjust(plan.id, &volume(10.0)).await.unwrap();
    assert_eq!(outcome.plan.version, plan.version + 1);
    assert_eq!(outcome.plan.adjustment_history.len(), 1);
    assert_eq!(outcome.preview.projected, outcome.plan.metrics());

    let stored = env.manager.get_plan(plan.id).await.unwrap();
    assert_eq!(stored, outcome.plan);
}

#[tokio::test]
async fn test_preview_does_not_persist() {
    let env = common::memory_env();
    let plan = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &common::beginner_bodyweight_constraints())
        .await
        .unwrap();

    let preview = env
        .manager
        .preview_adjustment(plan.id, &volume(20.0))
        .await
        .unwrap();
    assert!(preview.projected.weekly_volume > plan.weekly_volume);

    let stored = env.manager.get_plan(plan.id).await.unwrap();
    assert_eq!(stored, plan);
}

#[tokio::test]
async fn test_unknown_plan() {
    let env = common::memory_env();
    let missing = Uuid::new_v4();
    assert_eq!(
        env.manager.adjust(missing, &volume(5.0)).await.unwrap_err(),
        PlanError::PlanNotFound { plan_id: missing }
    );
    assert_eq!(
        env.manager.deactivate(missing).await.unwrap_err().code(),
        ErrorCode::ResourceNotFound
    );
}

#[tokio::test]
async fn test_deactivation_freezes_plan_and_is_idempotent() {
    let env = common::memory_env();
    let owner = Uuid::new_v4();
    let constraints = common::beginner_bodyweight_constraints();
    let plan = env
        .manager
        .generate_and_activate(owner, &constraints)
        .await
        .unwrap();

    let deactivated = env.manager.deactivate(plan.id).await.unwrap();
    assert_eq!(deactivated.status, PlanStatus::Deactivated);
    assert_eq!(deactivated.version, plan.version + 1);

    let again = env.manager.deactivate(plan.id).await.unwrap();
    assert_eq!(again, deactivated);

    for result in [
        env.manager.adjust(plan.id, &volume(5.0)).await.map(|_| ()),
        env.manager.preview_adjustment(plan.id, &volume(5.0)).await.map(|_| ()),
        env.manager.trigger_progression(plan.id, false).await.map(|_| ()),
        env.manager.complete_week(plan.id).await.map(|_| ()),
    ] {
        assert!(matches!(result, Err(PlanError::PlanNotActive { .. })));
    }

    // Owner may start over
    assert!(env.manager.get_active(owner).await.unwrap().is_none());
    let next = env
        .manager
        .generate_and_activate(owner, &constraints)
        .await
        .unwrap();
    assert_ne!(next.id, plan.id);
}

#[tokio::test]
async fn test_stale_version_is_rejected() {
    let env = common::memory_env();
    let plan = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &common::beginner_bodyweight_constraints())
        .await
        .unwrap();

    let stale = plan.clone();
    env.manager.adjust(plan.id, &volume(10.0)).await.unwrap();

    let err = env.plans.save(&stale, stale.version).await.unwrap_err();
    assert_eq!(
        err,
        PlanError::ConcurrentModification {
            plan_id: plan.id,
            expected_version: plan.version,
            actual_version: plan.version + 1,
        }
    );
    assert!(err.is_retryable());

    // The winning write is intact
    let stored = env.manager.get_plan(plan.id).await.unwrap();
    assert_eq!(stored.adjustment_history.len(), 1);
}

#[tokio::test]
async fn test_history_cannot_be_rewritten() {
    let env = common::memory_env();
    let plan = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &common::beginner_bodyweight_constraints())
        .await
        .unwrap();
    let adjusted = env.manager.adjust(plan.id, &volume(10.0)).await.unwrap().plan;

    let mut truncated = adjusted.clone();
    truncated.adjustment_history = plan.adjustment_history.clone();
    let err = env
        .plans
        .save(&truncated, adjusted.version)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DatabaseError);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adjustments_serialize() {
    let env = common::memory_env();
    let plan = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &common::intermediate_gym_constraints())
        .await
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = env.manager.clone();
            tokio::spawn(async move { manager.adjust(plan.id, &volume(1.0)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = env.manager.get_plan(plan.id).await.unwrap();
    assert_eq!(stored.version, plan.version + 8);
    assert_eq!(stored.adjustment_history.len(), 8);
    assert_eq!(
        stored.adjustment_history.replay(&stored.baseline),
        stored.metrics()
    );
}

#[tokio::test]
async fn test_complete_week_until_done() {
    let env = common::memory_env();
    let plan = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &common::beginner_bodyweight_constraints())
        .await
        .unwrap();

    for week in 1..=plan.total_weeks {
        let updated = env.manager.complete_week(plan.id).await.unwrap();
        assert_eq!(updated.weeks_completed, week);
    }
    let err = env.manager.complete_week(plan.id).await.unwrap_err();
    assert_eq!(
        err,
        PlanError::PlanCompleted {
            plan_id: plan.id,
            total_weeks: plan.total_weeks,
        }
    );

    // A finished plan stays active until deactivated
    let stored = env.manager.get_plan(plan.id).await.unwrap();
    assert_eq!(stored.status, PlanStatus::Active);
}

#[tokio::test]
async fn test_suggestions_can_be_accepted_and_declined() {
    let env = common::memory_env();
    let plan = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &common::beginner_bodyweight_constraints())
        .await
        .unwrap();
    for (day, days_ago) in [(0, 5), (2, 3)] {
        env.manager
            .record_session(&common::session_as_planned(&plan, day, Some(6.0), days_ago))
            .await
            .unwrap();
    }

    let outcome = env.manager.trigger_progression(plan.id, false).await.unwrap();
    assert!(!outcome.applied);
    assert!(outcome.suggestions.len() >= 2);
    assert_eq!(outcome.plan.version, plan.version + 1);
    assert_eq!(outcome.plan.progression_suggestions, outcome.suggestions);

    let accepted = outcome.suggestions[0].id;
    let declined = outcome.suggestions[1].id;

    let after_accept = env.manager.apply_suggestion(plan.id, accepted).await.unwrap();
    assert_eq!(after_accept.adjustment_history.len(), 1);
    assert_eq!(
        after_accept.adjustment_history.last().unwrap().adjustment_type,
        AdjustmentType::Progression
    );
    assert!(after_accept.suggestion(accepted).is_none());

    let after_decline = env.manager.decline_suggestion(plan.id, declined).await.unwrap();
    assert!(after_decline.suggestion(declined).is_none());
    assert!(!after_decline.declined_suggestions.is_empty());
    assert_eq!(after_decline.adjustment_history.len(), 1);

    assert!(matches!(
        env.manager.apply_suggestion(plan.id, declined).await,
        Err(PlanError::SuggestionNotFound { .. })
    ));

    // Re-running progression does not bring the declined change back
    let rerun = env.manager.trigger_progression(plan.id, false).await.unwrap();
    let declined_ref = outcome.suggestions[1].changes[0].exercise_ref.clone();
    assert!(rerun
        .suggestions
        .iter()
        .all(|s| s.changes[0].exercise_ref != declined_ref));
}

#[tokio::test]
async fn test_manual_adjustment_discards_pending_suggestions() {
    let env = common::memory_env();
    let plan = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &common::beginner_bodyweight_constraints())
        .await
        .unwrap();
    for (day, days_ago) in [(0, 5), (2, 3)] {
        env.manager
            .record_session(&common::session_as_planned(&plan, day, Some(6.0), days_ago))
            .await
            .unwrap();
    }

    let outcome = env.manager.trigger_progression(plan.id, false).await.unwrap();
    let pending = outcome.suggestions[0].id;

    let cut = env.manager.adjust(plan.id, &volume(-30.0)).await.unwrap().plan;
    assert!(cut.progression_suggestions.is_empty());
    assert_eq!(cut.weekly_volume, cut.total_planned_sets());

    // The suggestion was computed against the uncut sets
    assert!(matches!(
        env.manager.apply_suggestion(plan.id, pending).await,
        Err(PlanError::SuggestionNotFound { .. })
    ));
    let stored = env.manager.get_plan(plan.id).await.unwrap();
    assert_eq!(stored.exercises, cut.exercises);
    assert_eq!(stored.adjustment_history.len(), 1);
}

#[tokio::test]
async fn test_trigger_without_history_changes_nothing() {
    let env = common::memory_env();
    let plan = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &common::beginner_bodyweight_constraints())
        .await
        .unwrap();

    let outcome = env.manager.trigger_progression(plan.id, true).await.unwrap();
    assert!(outcome.suggestions.is_empty());
    assert!(!outcome.applied);
    assert_eq!(env.manager.get_plan(plan.id).await.unwrap().version, plan.version);
}

#[tokio::test]
async fn test_record_session_validation() {
    let env = common::memory_env();
    let plan = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &common::beginner_bodyweight_constraints())
        .await
        .unwrap();

    let mut bad_day = common::session_as_planned(&plan, 0, Some(6.0), 1);
    bad_day.day_index = Some(7);
    assert!(matches!(
        env.manager.record_session(&bad_day).await,
        Err(PlanError::InvalidConstraints {
            field: "session_log.day_index",
            ..
        })
    ));

    let bad_rpe = common::session_as_planned(&plan, 0, Some(11.0), 1);
    assert!(matches!(
        env.manager.record_session(&bad_rpe).await,
        Err(PlanError::InvalidConstraints {
            field: "session_log.rpe",
            ..
        })
    ));

    let mut foreign = common::session_as_planned(&plan, 0, Some(6.0), 1);
    foreign.user_id = Uuid::new_v4();
    assert!(matches!(
        env.manager.record_session(&foreign).await,
        Err(PlanError::InvalidConstraints {
            field: "session_log.plan_id",
            ..
        })
    ));

    let good = common::session_as_planned(&plan, 0, Some(6.0), 1);
    env.manager.record_session(&good).await.unwrap();
    let recent = env.sessions.get_recent(plan.owner_id, 1).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, good.id);
}

#[tokio::test]
async fn test_sweep_covers_every_active_plan() {
    let env = common::memory_env();
    let constraints = common::beginner_bodyweight_constraints();

    let trained = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &constraints)
        .await
        .unwrap();
    let idle = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &constraints)
        .await
        .unwrap();
    let stopped = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &constraints)
        .await
        .unwrap();
    env.manager.deactivate(stopped.id).await.unwrap();

    for (day, days_ago) in [(0, 5), (2, 3)] {
        env.manager
            .record_session(&common::session_as_planned(&trained, day, Some(6.0), days_ago))
            .await
            .unwrap();
    }

    let report = env.manager.run_progression_sweep(true).await.unwrap();
    assert_eq!(report.plans_checked, 2);
    assert_eq!(report.plans_with_suggestions, 1);
    assert_eq!(report.plans_applied, 1);
    assert_eq!(report.plans_failed, 0);

    let trained_entry = report
        .entries
        .iter()
        .find(|e| e.plan_id == trained.id)
        .unwrap();
    assert!(trained_entry.applied);
    let idle_entry = report.entries.iter().find(|e| e.plan_id == idle.id).unwrap();
    assert_eq!(idle_entry.suggestions, 0);

    let stored = env.manager.get_plan(trained.id).await.unwrap();
    assert_eq!(stored.adjustment_history.len(), 1);
}

#[tokio::test]
async fn test_background_sweep_runs_and_shuts_down() {
    let env = common::memory_env();
    let plan = env
        .manager
        .generate_and_activate(Uuid::new_v4(), &common::beginner_bodyweight_constraints())
        .await
        .unwrap();
    for (day, days_ago) in [(0, 5), (2, 3)] {
        env.manager
            .record_session(&common::session_as_planned(&plan, day, Some(6.0), days_ago))
            .await
            .unwrap();
    }

    let handle = spawn_progression_sweep(env.manager.clone(), Duration::from_millis(50), false);
    sleep(Duration::from_millis(300)).await;
    handle.shutdown().await;

    let stored = env.manager.get_plan(plan.id).await.unwrap();
    assert!(!stored.progression_suggestions.is_empty());
    assert!(stored.adjustment_history.is_empty());
}
