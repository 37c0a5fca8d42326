// ABOUTME: Persistence contracts for plans and session logs with store selection
// ABOUTME: Stores enforce optimistic versioning, one active plan per owner and append-only history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan and Session Log Stores
//!
//! Both adapters implement the same contract:
//!
//! - `save` succeeds only when the stored version equals `expected_version`
//!   and stores the plan with the version incremented by one
//! - a plan and its newly appended history records are written together
//! - history records already stored are never rewritten or removed
//! - at most one `Active` plan exists per owner

/// Process-local stores backed by `DashMap`
pub mod memory;

/// `SQLite` stores backed by `sqlx`
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use pierre_core::errors::PlanError;
use pierre_core::models::{Plan, SessionLog};
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseUrl;
use memory::{InMemoryPlanStore, InMemorySessionLogStore};
use sqlite::SqliteStore;

/// Plan persistence with optimistic concurrency
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Get a plan by id
    async fn get(&self, plan_id: Uuid) -> Result<Option<Plan>, PlanError>;

    /// Store a new plan
    ///
    /// Fails with `PlanAlreadyActive` when the plan is active and its owner
    /// already has an active plan.
    async fn insert(&self, plan: &Plan) -> Result<(), PlanError>;

    /// Replace a stored plan if its version still equals `expected_version`
    ///
    /// Returns the stored plan with its new version.
    async fn save(&self, plan: &Plan, expected_version: u64) -> Result<Plan, PlanError>;

    /// Active plan of `owner_id`, if any
    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Option<Plan>, PlanError>;

    /// Every active plan, oldest first
    async fn list_active(&self) -> Result<Vec<Plan>, PlanError>;
}

/// Training history consumed by progression analysis
#[async_trait]
pub trait SessionLogStore: Send + Sync {
    /// Sessions of `user_id` performed within the last `since_iterations`
    /// weekly cycles, oldest first
    async fn get_recent(
        &self,
        user_id: Uuid,
        since_iterations: u32,
    ) -> Result<Vec<SessionLog>, PlanError>;

    /// Record a session
    async fn record(&self, log: &SessionLog) -> Result<(), PlanError>;
}

/// Plan and session log stores sharing one backend
#[derive(Clone)]
pub struct Stores {
    /// Plan store
    pub plans: Arc<dyn PlanStore>,
    /// Session log store
    pub sessions: Arc<dyn SessionLogStore>,
}

impl Stores {
    /// Open the stores selected by `database`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the `SQLite` database cannot be opened or migrated
    pub async fn open(database: &DatabaseUrl) -> Result<Self, PlanError> {
        match database {
            DatabaseUrl::Memory => {
                info!("Using in-memory plan and session stores");
                Ok(Self {
                    plans: Arc::new(InMemoryPlanStore::new()),
                    sessions: Arc::new(InMemorySessionLogStore::new()),
                })
            }
            DatabaseUrl::SQLite { url } => {
                info!(database_url = %url, "Opening SQLite plan store");
                let store = Arc::new(SqliteStore::connect(url).await?);
                Ok(Self {
                    plans: store.clone(),
                    sessions: store,
                })
            }
        }
    }
}

/// Reject a write that would drop or rewrite stored history records
pub(crate) fn ensure_history_extends(stored: &Plan, next: &Plan) -> Result<(), PlanError> {
    if next
        .adjustment_history
        .as_slice()
        .starts_with(stored.adjustment_history.as_slice())
    {
        Ok(())
    } else {
        Err(PlanError::storage(format!(
            "adjustment history of plan {} cannot be rewritten ({} stored records, {} submitted)",
            next.id,
            stored.adjustment_history.len(),
            next.adjustment_history.len()
        )))
    }
}
