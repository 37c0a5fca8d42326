// ABOUTME: SQLite persistence for plans, their append-only adjustment history and session logs
// ABOUTME: Uses runtime sqlx queries; each plan write and its new history rows share one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pierre_core::constants::runtime::DAYS_PER_ITERATION;
use pierre_core::errors::PlanError;
use pierre_core::models::{AdjustmentHistory, AdjustmentRecord, Plan, PlanStatus, SessionLog};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{Row, Sqlite, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::{PlanStore, SessionLogStore};

/// `SQLite` implementation of both store contracts
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect and run migrations
    ///
    /// File databases are created if missing. `sqlite::memory:` uses a single
    /// connection so every query sees the same database.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the connection or a migration fails
    pub async fn connect(database_url: &str) -> Result<Self, PlanError> {
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await?
        } else if database_url.contains('?') {
            SqlitePool::connect(database_url).await?
        } else {
            // Ensure SQLite creates the database file if it doesn't exist
            SqlitePool::connect(&format!("{database_url}?mode=rwc")).await?
        };

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables, indexes and the append-only guards
    ///
    /// # Errors
    ///
    /// Returns a storage error if a statement fails
    pub async fn migrate(&self) -> Result<(), PlanError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS training_plans (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('active', 'paused', 'deactivated')),
                version INTEGER NOT NULL,
                body TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // One active plan per owner
        sqlx::query(
            r"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_training_plans_active_owner
            ON training_plans(owner_id) WHERE status = 'active'
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS plan_adjustments (
                plan_id TEXT NOT NULL REFERENCES training_plans(id),
                sequence INTEGER NOT NULL,
                id TEXT NOT NULL,
                adjustment_type TEXT NOT NULL,
                adjusted_at DATETIME NOT NULL,
                record TEXT NOT NULL,
                PRIMARY KEY (plan_id, sequence)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TRIGGER IF NOT EXISTS plan_adjustments_no_update
            BEFORE UPDATE ON plan_adjustments
            BEGIN
                SELECT RAISE(ABORT, 'plan_adjustments is append-only');
            END
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TRIGGER IF NOT EXISTS plan_adjustments_no_delete
            BEFORE DELETE ON plan_adjustments
            BEGIN
                SELECT RAISE(ABORT, 'plan_adjustments is append-only');
            END
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS session_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                plan_id TEXT,
                performed_at DATETIME NOT NULL,
                completed BOOLEAN NOT NULL,
                body TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_session_logs_user_time ON session_logs(user_id, performed_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load_plan(&self, plan_id: &str) -> Result<Option<Plan>, PlanError> {
        let row = sqlx::query("SELECT body, version, status FROM training_plans WHERE id = $1")
            .bind(plan_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let body: String = row.get("body");
        let version: i64 = row.get("version");
        let status: String = row.get("status");

        let mut plan: Plan = serde_json::from_str(&body)?;
        plan.version = version as u64;
        plan.status = PlanStatus::parse(&status)
            .ok_or_else(|| PlanError::storage(format!("unknown plan status '{status}'")))?;

        let records = sqlx::query(
            "SELECT record FROM plan_adjustments WHERE plan_id = $1 ORDER BY sequence ASC",
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await?;

        let mut history = AdjustmentHistory::new();
        for row in records {
            let record: String = row.get("record");
            history.append(serde_json::from_str::<AdjustmentRecord>(&record)?);
        }
        plan.adjustment_history = history;

        Ok(Some(plan))
    }

    async fn load_plans(&self, ids: Vec<String>) -> Result<Vec<Plan>, PlanError> {
        let mut plans = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(plan) = self.load_plan(&id).await? {
                plans.push(plan);
            }
        }
        Ok(plans)
    }
}

fn db_int(value: u64) -> Result<i64, PlanError> {
    i64::try_from(value)
        .map_err(|_| PlanError::storage(format!("value {value} exceeds the SQLite integer range")))
}

/// Plan row body; history lives in `plan_adjustments`
fn plan_body(plan: &Plan) -> Result<String, PlanError> {
    let mut body = plan.clone();
    body.adjustment_history = AdjustmentHistory::new();
    Ok(serde_json::to_string(&body)?)
}

/// Insert history records from index `from` onward
async fn append_history(
    tx: &mut Transaction<'_, Sqlite>,
    plan: &Plan,
    from: usize,
) -> Result<(), PlanError> {
    let plan_id = plan.id.to_string();
    for (sequence, record) in plan.adjustment_history.iter().enumerate().skip(from) {
        sqlx::query(
            r"
            INSERT INTO plan_adjustments (plan_id, sequence, id, adjustment_type, adjusted_at, record)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&plan_id)
        .bind(db_int(sequence as u64)?)
        .bind(record.id.to_string())
        .bind(record.adjustment_type.as_str())
        .bind(record.adjusted_at)
        .bind(serde_json::to_string(record)?)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl PlanStore for SqliteStore {
    async fn get(&self, plan_id: Uuid) -> Result<Option<Plan>, PlanError> {
        self.load_plan(&plan_id.to_string()).await
    }

    async fn insert(&self, plan: &Plan) -> Result<(), PlanError> {
        let mut tx = self.pool.begin().await?;

        if plan.is_active() {
            let existing = sqlx::query(
                "SELECT id FROM training_plans WHERE owner_id = $1 AND status = 'active'",
            )
            .bind(plan.owner_id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
            if let Some(row) = existing {
                let id: String = row.get("id");
                return Err(PlanError::PlanAlreadyActive {
                    owner_id: plan.owner_id,
                    plan_id: Uuid::parse_str(&id).map_err(|e| PlanError::storage(e.to_string()))?,
                });
            }
        }

        sqlx::query(
            r"
            INSERT INTO training_plans (id, owner_id, status, version, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(plan.id.to_string())
        .bind(plan.owner_id.to_string())
        .bind(plan.status.as_str())
        .bind(db_int(plan.version)?)
        .bind(plan_body(plan)?)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&mut *tx)
        .await?;

        append_history(&mut tx, plan, 0).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn save(&self, plan: &Plan, expected_version: u64) -> Result<Plan, PlanError> {
        let plan_id = plan.id.to_string();
        let next_version = expected_version + 1;
        let mut tx = self.pool.begin().await?;

        // Write first so the transaction holds the write lock before any read
        let updated = sqlx::query(
            r"
            UPDATE training_plans
            SET status = $1, version = $2, body = $3, updated_at = $4
            WHERE id = $5 AND version = $6
            ",
        )
        .bind(plan.status.as_str())
        .bind(db_int(next_version)?)
        .bind(plan_body(plan)?)
        .bind(plan.updated_at)
        .bind(&plan_id)
        .bind(db_int(expected_version)?)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            let current = sqlx::query("SELECT version FROM training_plans WHERE id = $1")
                .bind(&plan_id)
                .fetch_optional(&mut *tx)
                .await?;
            return Err(current.map_or(PlanError::PlanNotFound { plan_id: plan.id }, |row| {
                let actual: i64 = row.get("version");
                PlanError::ConcurrentModification {
                    plan_id: plan.id,
                    expected_version,
                    actual_version: actual as u64,
                }
            }));
        }

        let stored: i64 =
            sqlx::query("SELECT COUNT(*) AS stored FROM plan_adjustments WHERE plan_id = $1")
                .bind(&plan_id)
                .fetch_one(&mut *tx)
                .await?
                .get("stored");
        let stored = stored as usize;
        if plan.adjustment_history.len() < stored {
            return Err(PlanError::storage(format!(
                "adjustment history of plan {plan_id} cannot shrink ({stored} stored records, {} submitted)",
                plan.adjustment_history.len()
            )));
        }

        append_history(&mut tx, plan, stored).await?;
        tx.commit().await?;

        debug!(
            plan_id = %plan.id,
            version = next_version,
            history_len = plan.adjustment_history.len(),
            "Plan saved"
        );

        let mut saved = plan.clone();
        saved.version = next_version;
        Ok(saved)
    }

    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Option<Plan>, PlanError> {
        let row =
            sqlx::query("SELECT id FROM training_plans WHERE owner_id = $1 AND status = 'active'")
                .bind(owner_id.to_string())
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some(row) => self.load_plan(&row.get::<String, _>("id")).await,
            None => Ok(None),
        }
    }

    async fn list_active(&self) -> Result<Vec<Plan>, PlanError> {
        let ids = sqlx::query(
            "SELECT id FROM training_plans WHERE status = 'active' ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| row.get::<String, _>("id"))
        .collect();
        self.load_plans(ids).await
    }
}

#[async_trait]
impl SessionLogStore for SqliteStore {
    async fn get_recent(
        &self,
        user_id: Uuid,
        since_iterations: u32,
    ) -> Result<Vec<SessionLog>, PlanError> {
        let cutoff: DateTime<Utc> =
            Utc::now() - Duration::days(DAYS_PER_ITERATION * i64::from(since_iterations));
        let rows = sqlx::query(
            r"
            SELECT body FROM session_logs
            WHERE user_id = $1 AND performed_at >= $2
            ORDER BY performed_at ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let body: String = row.get("body");
                serde_json::from_str(&body).map_err(PlanError::from)
            })
            .collect()
    }

    async fn record(&self, log: &SessionLog) -> Result<(), PlanError> {
        sqlx::query(
            r"
            INSERT INTO session_logs (id, user_id, plan_id, performed_at, completed, body)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(log.id.to_string())
        .bind(log.user_id.to_string())
        .bind(log.plan_id.map(|id| id.to_string()))
        .bind(log.performed_at)
        .bind(log.completed)
        .bind(serde_json::to_string(log)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
