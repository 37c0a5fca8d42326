// ABOUTME: Periodic progression sweep running trigger_progression over every active plan
// ABOUTME: Background task on a tokio interval with an mpsc shutdown signal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Duration;

use pierre_core::errors::{ErrorCode, PlanError};
use pierre_core::models::Plan;
use pierre_intelligence::ProgressionOutcome;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::PlanLifecycleManager;

/// Result of one plan within a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepEntry {
    /// Plan identifier
    pub plan_id: Uuid,
    /// Plan owner
    pub owner_id: Uuid,
    /// Suggestions produced
    pub suggestions: usize,
    /// Whether they were committed
    pub applied: bool,
    /// Error code when progression failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    /// Error message when progression failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SweepEntry {
    pub(super) fn completed(plan: &Plan, outcome: &ProgressionOutcome) -> Self {
        Self {
            plan_id: plan.id,
            owner_id: plan.owner_id,
            suggestions: outcome.suggestions.len(),
            applied: outcome.applied,
            error_code: None,
            error: None,
        }
    }

    pub(super) fn failed(plan: &Plan, error: &PlanError) -> Self {
        Self {
            plan_id: plan.id,
            owner_id: plan.owner_id,
            suggestions: 0,
            applied: false,
            error_code: Some(error.code()),
            error: Some(error.to_string()),
        }
    }
}

/// Summary of one sweep over the active plans
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Active plans visited
    pub plans_checked: usize,
    /// Plans that received at least one suggestion
    pub plans_with_suggestions: usize,
    /// Plans whose suggestions were committed
    pub plans_applied: usize,
    /// Plans whose progression failed
    pub plans_failed: usize,
    /// Per-plan results in visit order
    pub entries: Vec<SweepEntry>,
}

impl SweepReport {
    pub(super) fn record(&mut self, entry: SweepEntry) {
        self.plans_checked += 1;
        if entry.suggestions > 0 {
            self.plans_with_suggestions += 1;
        }
        if entry.applied {
            self.plans_applied += 1;
        }
        if entry.error.is_some() {
            self.plans_failed += 1;
        }
        self.entries.push(entry);
    }
}

/// Handle to a running background sweep
pub struct SweepHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Signal the sweep to stop and wait for the task to finish
    pub async fn shutdown(self) {
        if let Err(e) = self.shutdown_tx.send(()).await {
            debug!(error = ?e, "Sweep shutdown signal send failed (task already stopped)");
        }
        if let Err(e) = self.task.await {
            error!(error = %e, "Progression sweep task ended abnormally");
        }
    }
}

/// Spawn a task that runs [`PlanLifecycleManager::run_progression_sweep`]
/// every `every` until [`SweepHandle::shutdown`] is called
///
/// The first sweep runs one full interval after spawning.
#[must_use]
pub fn spawn_progression_sweep(
    manager: Arc<PlanLifecycleManager>,
    every: Duration,
    auto_apply: bool,
) -> SweepHandle {
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    let task = tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        info!(interval_secs = every.as_secs(), auto_apply, "Progression sweep started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = manager.run_progression_sweep(auto_apply).await {
                        error!(error = %e, "Progression sweep could not list active plans");
                    }
                }
                _ = shutdown_rx.recv() => {
                    debug!("Progression sweep received shutdown signal");
                    break;
                }
            }
        }
    });

    SweepHandle { shutdown_tx, task }
}
