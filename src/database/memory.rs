// ABOUTME: In-memory plan and session log stores backed by DashMap
// ABOUTME: Used for tests, the CLI default and single-process deployments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use pierre_core::constants::runtime::DAYS_PER_ITERATION;
use pierre_core::errors::PlanError;
use pierre_core::models::{Plan, SessionLog};
use uuid::Uuid;

use super::{ensure_history_extends, PlanStore, SessionLogStore};

/// Plans keyed by id, with an owner index for the active plan
#[derive(Default)]
pub struct InMemoryPlanStore {
    plans: DashMap<Uuid, Plan>,
    active_by_owner: DashMap<Uuid, Uuid>,
}

impl InMemoryPlanStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored plans
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Whether the store holds no plans
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn get(&self, plan_id: Uuid) -> Result<Option<Plan>, PlanError> {
        Ok(self.plans.get(&plan_id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, plan: &Plan) -> Result<(), PlanError> {
        if plan.is_active() {
            match self.active_by_owner.entry(plan.owner_id) {
                Entry::Occupied(existing) => {
                    return Err(PlanError::PlanAlreadyActive {
                        owner_id: plan.owner_id,
                        plan_id: *existing.get(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(plan.id);
                }
            }
        }
        self.plans.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn save(&self, plan: &Plan, expected_version: u64) -> Result<Plan, PlanError> {
        let stored = {
            let mut entry = self
                .plans
                .get_mut(&plan.id)
                .ok_or(PlanError::PlanNotFound { plan_id: plan.id })?;

            if entry.version != expected_version {
                return Err(PlanError::ConcurrentModification {
                    plan_id: plan.id,
                    expected_version,
                    actual_version: entry.version,
                });
            }
            ensure_history_extends(entry.value(), plan)?;

            let mut next = plan.clone();
            next.version = expected_version + 1;
            // Plan body and history move together in one entry swap
            *entry = next.clone();
            next
        };

        if !stored.is_active() {
            self.active_by_owner
                .remove_if(&stored.owner_id, |_, plan_id| *plan_id == stored.id);
        }
        Ok(stored)
    }

    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Option<Plan>, PlanError> {
        let Some(plan_id) = self.active_by_owner.get(&owner_id).map(|entry| *entry.value())
        else {
            return Ok(None);
        };
        Ok(self
            .plans
            .get(&plan_id)
            .map(|entry| entry.value().clone())
            .filter(Plan::is_active))
    }

    async fn list_active(&self) -> Result<Vec<Plan>, PlanError> {
        let mut active: Vec<Plan> = self
            .plans
            .iter()
            .filter(|entry| entry.value().is_active())
            .map(|entry| entry.value().clone())
            .collect();
        active.sort_by_key(|plan| (plan.created_at, plan.id));
        Ok(active)
    }
}

/// Session logs grouped by user
#[derive(Default)]
pub struct InMemorySessionLogStore {
    logs: DashMap<Uuid, Vec<SessionLog>>,
}

impl InMemorySessionLogStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionLogStore for InMemorySessionLogStore {
    async fn get_recent(
        &self,
        user_id: Uuid,
        since_iterations: u32,
    ) -> Result<Vec<SessionLog>, PlanError> {
        let cutoff = Utc::now() - Duration::days(DAYS_PER_ITERATION * i64::from(since_iterations));
        let mut recent: Vec<SessionLog> = self
            .logs
            .get(&user_id)
            .map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|log| log.performed_at >= cutoff)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        recent.sort_by_key(|log| log.performed_at);
        Ok(recent)
    }

    async fn record(&self, log: &SessionLog) -> Result<(), PlanError> {
        let mut logs = self.logs.entry(log.user_id).or_default();
        if logs.iter().any(|existing| existing.id == log.id) {
            return Err(PlanError::invalid_constraint(
                "session_log.id",
                format!("session {} is already recorded", log.id),
            ));
        }
        logs.push(log.clone());
        Ok(())
    }
}
