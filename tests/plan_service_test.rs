// ABOUTME: Integration tests for the plan service response envelopes
// ABOUTME: Verifies success payloads, error codes, details and JSON shape of every operation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pierre_plan_engine::errors::ErrorCode;
use pierre_plan_engine::services::PlanService;
use pierre_plan_engine::AdjustmentDelta;
use serde_json::Value;
use uuid::Uuid;

fn service() -> PlanService {
    PlanService::new(common::memory_env().manager)
}

#[tokio::test]
async fn test_generate_and_fetch_current_plan() {
    let service = service();
    let user = Uuid::new_v4();

    let missing = service.get_current_plan(user).await;
    assert!(!missing.success);
    assert!(missing.data.is_none());
    assert_eq!(missing.error_code, Some(ErrorCode::ResourceNotFound));

    let generated = service
        .generate_plan(user, &common::beginner_bodyweight_constraints())
        .await;
    assert!(generated.success, "{:?}", generated.message);
    let plan = generated.data.unwrap();
    assert!(generated.message.unwrap().contains("3 sessions per week"));

    let current = service.get_current_plan(user).await;
    assert!(current.success);
    assert_eq!(current.data.unwrap().id, plan.id);

    let again = service
        .generate_plan(user, &common::beginner_bodyweight_constraints())
        .await;
    assert!(!again.success);
    assert_eq!(again.error_code, Some(ErrorCode::PlanAlreadyActive));
}

#[tokio::test]
async fn test_out_of_range_delta_carries_details() {
    let service = service();
    let plan = service
        .generate_plan(Uuid::new_v4(), &common::beginner_bodyweight_constraints())
        .await
        .data
        .unwrap();

    let delta = AdjustmentDelta {
        volume_adjustment_pct: 45.0,
        ..AdjustmentDelta::default()
    };
    let response = service.adjust_plan(plan.id, &delta).await;
    assert!(!response.success);
    assert_eq!(response.error_code, Some(ErrorCode::ValueOutOfRange));
    let details = response.details.as_ref().unwrap();
    assert_eq!(details["field"], "volume_adjustment_pct");
    assert_eq!(details["max"], 30.0);

    let json: Value = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error_code"], "VALUE_OUT_OF_RANGE");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_adjust_and_preview_envelopes() {
    let service = service();
    let plan = service
        .generate_plan(Uuid::new_v4(), &common::intermediate_gym_constraints())
        .await
        .data
        .unwrap();
    let delta = AdjustmentDelta {
        intensity_adjustment_pct: 5.0,
        ..AdjustmentDelta::default()
    };

    let preview = service.preview_adjustment(plan.id, &delta).await;
    assert!(preview.success);
    let preview = preview.data.unwrap();

    let adjusted = service.adjust_plan(plan.id, &delta).await;
    assert!(adjusted.success);
    let result = adjusted.data.unwrap();
    assert_eq!(result.preview, preview);
    assert_eq!(result.plan.version, plan.version + 1);

    let no_op = service
        .adjust_plan(plan.id, &AdjustmentDelta::default())
        .await;
    assert_eq!(no_op.error_code, Some(ErrorCode::NoOpAdjustment));
}

#[tokio::test]
async fn test_progression_and_lifecycle_envelopes() {
    let service = service();
    let user = Uuid::new_v4();
    let plan = service
        .generate_plan(user, &common::beginner_bodyweight_constraints())
        .await
        .data
        .unwrap();

    for (day, days_ago) in [(0, 4), (2, 2)] {
        let log = common::session_as_planned(&plan, day, Some(6.0), days_ago);
        let recorded = service.record_session(&log).await;
        assert!(recorded.success);
        assert_eq!(recorded.data, Some(log.id));
    }

    let progression = service.trigger_progression(plan.id, false).await;
    assert!(progression.success);
    let result = progression.data.unwrap();
    assert!(!result.applied);
    assert!(progression
        .message
        .unwrap()
        .contains("awaiting review"));

    let suggestion = result.suggestions[0].id;
    let applied = service.apply_suggestion(plan.id, suggestion).await;
    assert!(applied.success);

    let unknown = service.decline_suggestion(plan.id, Uuid::new_v4()).await;
    assert_eq!(unknown.error_code, Some(ErrorCode::ResourceNotFound));

    let week = service.complete_week(plan.id).await;
    assert!(week.success);
    assert_eq!(week.data.unwrap().weeks_completed, 1);

    let sweep = service.run_progression_sweep(false).await;
    assert!(sweep.success);
    assert_eq!(sweep.data.unwrap().plans_checked, 1);

    let deactivated = service.deactivate_plan(plan.id).await;
    assert!(deactivated.success);
    let again = service.deactivate_plan(plan.id).await;
    assert!(again.success);

    let frozen = service.complete_week(plan.id).await;
    assert_eq!(frozen.error_code, Some(ErrorCode::PlanNotActive));
    assert!(service.get_current_plan(user).await.data.is_none());
}
