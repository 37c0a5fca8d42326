// ABOUTME: Integration tests for the SQLite plan and session log store
// ABOUTME: Covers round trips, optimistic versioning, active-plan uniqueness and append-only history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use chrono::Utc;
use pierre_plan_engine::database::sqlite::SqliteStore;
use pierre_plan_engine::database::{PlanStore, SessionLogStore};
use pierre_plan_engine::errors::{ErrorCode, PlanError};
use pierre_plan_engine::lifecycle::PlanLifecycleManager;
use pierre_plan_engine::models::{Plan, PlanStatus};
use pierre_plan_engine::{AdjustmentDelta, BuiltinExerciseCatalog, PlanEngineConfig};
use pierre_intelligence::config::{AdjustmentConfig, GenerationConfig};
use pierre_intelligence::{AdjustmentEngine, PlanGenerator};
use uuid::Uuid;

async fn memory_store() -> SqliteStore {
    common::init_test_logging();
    SqliteStore::connect("sqlite::memory:").await.unwrap()
}

fn new_plan(owner: Uuid) -> Plan {
    PlanGenerator::with_config(
        Arc::new(BuiltinExerciseCatalog::new()),
        GenerationConfig::default(),
    )
    .generate(owner, &common::beginner_bodyweight_constraints())
    .unwrap()
}

fn adjusted(plan: &Plan, volume_pct: f64) -> Plan {
    let delta = AdjustmentDelta {
        volume_adjustment_pct: volume_pct,
        ..AdjustmentDelta::default()
    };
    AdjustmentEngine::with_config(
        Arc::new(BuiltinExerciseCatalog::new()),
        AdjustmentConfig::default(),
    )
    .adjust(plan, &delta)
    .unwrap()
    .plan
}

#[tokio::test]
async fn test_insert_and_get_round_trip() {
    let store = memory_store().await;
    let plan = new_plan(Uuid::new_v4());

    store.insert(&plan).await.unwrap();
    let loaded = store.get(plan.id).await.unwrap().unwrap();

    assert_eq!(loaded, plan);
    assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_one_active_plan_per_owner() {
    let store = memory_store().await;
    let owner = Uuid::new_v4();
    let first = new_plan(owner);
    store.insert(&first).await.unwrap();

    let err = store.insert(&new_plan(owner)).await.unwrap_err();
    assert_eq!(
        err,
        PlanError::PlanAlreadyActive {
            owner_id: owner,
            plan_id: first.id,
        }
    );

    // Deactivating frees the slot
    let mut retired = first.clone();
    assert!(retired.deactivate(Utc::now()));
    store.save(&retired, first.version).await.unwrap();
    store.insert(&new_plan(owner)).await.unwrap();

    let active = store.find_active_by_owner(owner).await.unwrap().unwrap();
    assert_ne!(active.id, first.id);
    assert_eq!(
        store.get(first.id).await.unwrap().unwrap().status,
        PlanStatus::Deactivated
    );
}

#[tokio::test]
async fn test_save_checks_version() {
    let store = memory_store().await;
    let plan = new_plan(Uuid::new_v4());
    store.insert(&plan).await.unwrap();

    let next = adjusted(&plan, 10.0);
    let saved = store.save(&next, plan.version).await.unwrap();
    assert_eq!(saved.version, plan.version + 1);

    // Second writer still holding the old version
    let stale = adjusted(&plan, -10.0);
    let err = store.save(&stale, plan.version).await.unwrap_err();
    assert_eq!(
        err,
        PlanError::ConcurrentModification {
            plan_id: plan.id,
            expected_version: plan.version,
            actual_version: saved.version,
        }
    );
    assert_eq!(err.code(), ErrorCode::ConcurrentModification);

    let missing = new_plan(Uuid::new_v4());
    assert_eq!(
        store.save(&missing, 1).await.unwrap_err(),
        PlanError::PlanNotFound {
            plan_id: missing.id
        }
    );
}

#[tokio::test]
async fn test_history_is_appended_across_saves() {
    let store = memory_store().await;
    let plan = new_plan(Uuid::new_v4());
    store.insert(&plan).await.unwrap();

    let first = store.save(&adjusted(&plan, 10.0), plan.version).await.unwrap();
    let second = store
        .save(&adjusted(&first, 10.0), first.version)
        .await
        .unwrap();

    let loaded = store.get(plan.id).await.unwrap().unwrap();
    assert_eq!(loaded.version, second.version);
    assert_eq!(loaded.adjustment_history, second.adjustment_history);
    assert_eq!(loaded.adjustment_history.len(), 2);
    assert_eq!(
        loaded.adjustment_history.replay(&loaded.baseline),
        loaded.metrics()
    );

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plan_adjustments WHERE plan_id = $1")
        .bind(plan.id.to_string())
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(rows, 2);
}

#[tokio::test]
async fn test_history_cannot_shrink_or_be_edited() {
    let store = memory_store().await;
    let plan = new_plan(Uuid::new_v4());
    store.insert(&plan).await.unwrap();
    let saved = store.save(&adjusted(&plan, 10.0), plan.version).await.unwrap();

    let mut truncated = saved.clone();
    truncated.adjustment_history = plan.adjustment_history.clone();
    let err = store.save(&truncated, saved.version).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DatabaseError);

    // The failed write left version and history untouched
    let loaded = store.get(plan.id).await.unwrap().unwrap();
    assert_eq!(loaded.version, saved.version);
    assert_eq!(loaded.adjustment_history.len(), 1);

    // Rows are guarded against direct edits too
    let update = sqlx::query("UPDATE plan_adjustments SET adjustment_type = 'system'")
        .execute(store.pool())
        .await;
    assert!(update.is_err());
    let delete = sqlx::query("DELETE FROM plan_adjustments")
        .execute(store.pool())
        .await;
    assert!(delete.is_err());
}

#[tokio::test]
async fn test_list_active_skips_deactivated() {
    let store = memory_store().await;
    let kept = new_plan(Uuid::new_v4());
    let retired = new_plan(Uuid::new_v4());
    store.insert(&kept).await.unwrap();
    store.insert(&retired).await.unwrap();

    let mut deactivated = retired.clone();
    deactivated.deactivate(Utc::now());
    store.save(&deactivated, retired.version).await.unwrap();

    let active = store.list_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, kept.id);
}

#[tokio::test]
async fn test_session_logs_window() {
    let store = memory_store().await;
    let plan = new_plan(Uuid::new_v4());

    let old = common::session_as_planned(&plan, 0, Some(6.0), 30);
    let older_recent = common::session_as_planned(&plan, 0, Some(6.0), 9);
    let newest = common::session_as_planned(&plan, 2, Some(7.0), 1);
    for log in [&newest, &old, &older_recent] {
        store.record(log).await.unwrap();
    }
    let other_user = common::session_as_planned(&new_plan(Uuid::new_v4()), 0, None, 1);
    store.record(&other_user).await.unwrap();

    let recent = store.get_recent(plan.owner_id, 2).await.unwrap();
    assert_eq!(recent, vec![older_recent, newest.clone()]);

    let last_week = store.get_recent(plan.owner_id, 1).await.unwrap();
    assert_eq!(last_week, vec![newest]);
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("plans.db").display());

    let plan = {
        let store = SqliteStore::connect(&url).await.unwrap();
        let plan = new_plan(Uuid::new_v4());
        store.insert(&plan).await.unwrap();
        store.save(&adjusted(&plan, 20.0), plan.version).await.unwrap()
    };

    let reopened = SqliteStore::connect(&url).await.unwrap();
    let loaded = reopened.get(plan.id).await.unwrap().unwrap();
    assert_eq!(loaded, plan);
}

#[tokio::test]
async fn test_lifecycle_over_sqlite() {
    let store = Arc::new(memory_store().await);
    let manager = PlanLifecycleManager::new(
        store.clone(),
        store.clone(),
        Arc::new(BuiltinExerciseCatalog::new()),
        &PlanEngineConfig::default(),
    );
    let owner = Uuid::new_v4();

    let plan = manager
        .generate_and_activate(owner, &common::beginner_bodyweight_constraints())
        .await
        .unwrap();
    for (day, days_ago) in [(0, 4), (2, 2)] {
        manager
            .record_session(&common::session_as_planned(&plan, day, Some(6.0), days_ago))
            .await
            .unwrap();
    }

    let outcome = manager.trigger_progression(plan.id, true).await.unwrap();
    assert!(outcome.applied);

    let stored = store.get(plan.id).await.unwrap().unwrap();
    assert_eq!(stored.version, plan.version + 1);
    assert_eq!(stored.adjustment_history.len(), 1);
    assert_eq!(stored.exercises, outcome.plan.exercises);

    manager.deactivate(plan.id).await.unwrap();
    assert!(manager.get_active(owner).await.unwrap().is_none());
}
