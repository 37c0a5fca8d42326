// ABOUTME: Pierre plan CLI - command-line access to the adaptive plan engine
// ABOUTME: Generates, adjusts, progresses and deactivates plans; prints JSON response envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Generate a plan (state persists only with a sqlite: database URL)
//! pierre-plan-cli --database-url sqlite:./data/plans.db generate \
//!     --user 5f0c... --goal hypertrophy --level beginner --equipment bodyweight \
//!     --days 3 --minutes 45 --focus chest --focus back
//!
//! # Preview, then apply, a 10% volume increase
//! pierre-plan-cli preview --plan 9a1b... --volume 10
//! pierre-plan-cli adjust --plan 9a1b... --volume 10 --notes "feeling strong"
//!
//! # Log a session and ask for progression suggestions
//! pierre-plan-cli log-session --user 5f0c... --plan 9a1b... --day 0 --exercise push_up,3,12,,6
//! pierre-plan-cli progress --plan 9a1b...
//!
//! # Run the progression sweep every hour until interrupted
//! pierre-plan-cli sweep --interval 3600
//! ```

mod helpers;

use std::collections::BTreeSet;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{Duration as DaysDuration, Utc};
use clap::{Parser, Subcommand};
use pierre_plan_engine::config::{DatabaseUrl, ServerConfig};
use pierre_plan_engine::database::Stores;
use pierre_plan_engine::lifecycle::{spawn_progression_sweep, PlanLifecycleManager};
use pierre_plan_engine::models::{
    Equipment, ExerciseLog, ExperienceLevel, Goal, MuscleGroup, ProfileConstraints, SessionLog,
    Weekday,
};
use pierre_plan_engine::services::PlanService;
use pierre_plan_engine::{AdjustmentDelta, BuiltinExerciseCatalog};
use tokio::signal;
use tracing::info;
use uuid::Uuid;

use helpers::{parse_enum, parse_exercise_log, print_response};

#[derive(Parser)]
#[command(
    name = "pierre-plan-cli",
    about = "Pierre Adaptive Plan Engine CLI",
    long_about = "Generate, adjust, progress and manage personalized workout plans."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override (`memory` or a `sqlite:` URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

/// Percentage deltas shared by `preview` and `adjust`
#[derive(clap::Args)]
struct DeltaArgs {
    /// Plan identifier
    #[arg(long)]
    plan: Uuid,

    /// Volume change in percent
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    volume: f64,

    /// Intensity change in percent
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    intensity: f64,

    /// Frequency change in percent
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    frequency: f64,

    /// New plan difficulty (beginner, intermediate, advanced)
    #[arg(long, value_parser = parse_enum::<ExperienceLevel>)]
    difficulty: Option<ExperienceLevel>,

    /// Notes stored on the adjustment record
    #[arg(long)]
    notes: Option<String>,
}

impl DeltaArgs {
    fn delta(&self) -> AdjustmentDelta {
        AdjustmentDelta {
            volume_adjustment_pct: self.volume,
            intensity_adjustment_pct: self.intensity,
            frequency_adjustment_pct: self.frequency,
            difficulty_preference: self.difficulty,
            notes: self.notes.clone(),
        }
    }
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Generate and activate a plan
    Generate {
        /// User identifier
        #[arg(long)]
        user: Uuid,

        /// Training goal (repeatable)
        #[arg(long = "goal", required = true, value_parser = parse_enum::<Goal>)]
        goals: Vec<Goal>,

        /// Experience level
        #[arg(long, value_parser = parse_enum::<ExperienceLevel>)]
        level: ExperienceLevel,

        /// Available equipment (repeatable)
        #[arg(long = "equipment", required = true, value_parser = parse_enum::<Equipment>)]
        equipment: Vec<Equipment>,

        /// Training days per week
        #[arg(long)]
        days: u8,

        /// Preferred training day (repeatable)
        #[arg(long = "preferred-day", value_parser = parse_enum::<Weekday>)]
        preferred_days: Vec<Weekday>,

        /// Session length in minutes
        #[arg(long)]
        minutes: u16,

        /// Focus muscle group (repeatable)
        #[arg(long = "focus", required = true, value_parser = parse_enum::<MuscleGroup>)]
        focus_areas: Vec<MuscleGroup>,

        /// Injuries or limitations, free text
        #[arg(long, default_value = "")]
        injuries: String,
    },

    /// Show the active plan of a user
    Show {
        /// User identifier
        #[arg(long)]
        user: Uuid,
    },

    /// Preview an adjustment without applying it
    Preview(DeltaArgs),

    /// Apply a manual adjustment
    Adjust(DeltaArgs),

    /// Analyze recent sessions for progression
    Progress {
        /// Plan identifier
        #[arg(long)]
        plan: Uuid,

        /// Commit suggestions immediately instead of storing them for review
        #[arg(long)]
        auto_apply: bool,
    },

    /// Accept a pending progression suggestion
    Accept {
        /// Plan identifier
        #[arg(long)]
        plan: Uuid,

        /// Suggestion identifier
        #[arg(long)]
        suggestion: Uuid,
    },

    /// Decline a pending progression suggestion
    Decline {
        /// Plan identifier
        #[arg(long)]
        plan: Uuid,

        /// Suggestion identifier
        #[arg(long)]
        suggestion: Uuid,
    },

    /// Record a training session
    LogSession {
        /// User identifier
        #[arg(long)]
        user: Uuid,

        /// Plan the session followed
        #[arg(long)]
        plan: Option<Uuid>,

        /// Plan day, 0 = Monday
        #[arg(long)]
        day: Option<u8>,

        /// How many days ago the session happened
        #[arg(long, default_value_t = 0)]
        days_ago: u32,

        /// Mark the session as not finished
        #[arg(long)]
        incomplete: bool,

        /// Exercise entry `REF,SETS[,REPS[,LOAD_KG[,RPE]]]` (repeatable)
        #[arg(long = "exercise", value_parser = parse_exercise_log)]
        exercises: Vec<ExerciseLog>,
    },

    /// Mark one more week of the plan as completed
    CompleteWeek {
        /// Plan identifier
        #[arg(long)]
        plan: Uuid,
    },

    /// Deactivate a plan
    Deactivate {
        /// Plan identifier
        #[arg(long)]
        plan: Uuid,
    },

    /// Run progression over every active plan
    Sweep {
        /// Commit suggestions instead of storing them for review
        #[arg(long)]
        auto_apply: bool,

        /// Keep running every N seconds until interrupted
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = cli.database_url.as_deref() {
        config = config.with_database(DatabaseUrl::parse_url(url)?);
    }

    // Initialize logging
    let logging = if cli.verbose {
        config.logging.clone().with_level("debug")
    } else {
        config.logging.clone()
    };
    logging.init()?;

    info!(database = %config.database, "Pierre plan CLI");
    let stores = Stores::open(&config.database).await?;
    let manager = Arc::new(PlanLifecycleManager::new(
        stores.plans,
        stores.sessions,
        Arc::new(BuiltinExerciseCatalog::new()),
        &config.engine,
    ));
    let service = PlanService::new(manager);

    let success = run(cli.command, &service).await?;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

// Long function: one match arm per subcommand
async fn run(command: Command, service: &PlanService) -> Result<bool> {
    let success = match command {
        Command::Generate {
            user,
            goals,
            level,
            equipment,
            days,
            preferred_days,
            minutes,
            focus_areas,
            injuries,
        } => {
            let constraints = ProfileConstraints {
                goals: goals.into_iter().collect(),
                experience_level: level,
                equipment: equipment.into_iter().collect(),
                days_per_week: days,
                preferred_days: preferred_days.into_iter().collect::<BTreeSet<_>>(),
                session_length_minutes: minutes,
                focus_areas: focus_areas.into_iter().collect(),
                injuries,
            };
            print_response(&service.generate_plan(user, &constraints).await)?
        }
        Command::Show { user } => print_response(&service.get_current_plan(user).await)?,
        Command::Preview(args) => {
            print_response(&service.preview_adjustment(args.plan, &args.delta()).await)?
        }
        Command::Adjust(args) => {
            print_response(&service.adjust_plan(args.plan, &args.delta()).await)?
        }
        Command::Progress { plan, auto_apply } => {
            print_response(&service.trigger_progression(plan, auto_apply).await)?
        }
        Command::Accept { plan, suggestion } => {
            print_response(&service.apply_suggestion(plan, suggestion).await)?
        }
        Command::Decline { plan, suggestion } => {
            print_response(&service.decline_suggestion(plan, suggestion).await)?
        }
        Command::LogSession {
            user,
            plan,
            day,
            days_ago,
            incomplete,
            exercises,
        } => {
            let log = SessionLog {
                id: Uuid::new_v4(),
                user_id: user,
                plan_id: plan,
                performed_at: Utc::now() - DaysDuration::days(i64::from(days_ago)),
                day_index: day,
                completed: !incomplete,
                exercises,
            };
            print_response(&service.record_session(&log).await)?
        }
        Command::CompleteWeek { plan } => print_response(&service.complete_week(plan).await)?,
        Command::Deactivate { plan } => print_response(&service.deactivate_plan(plan).await)?,
        Command::Sweep {
            auto_apply,
            interval: None,
        } => print_response(&service.run_progression_sweep(auto_apply).await)?,
        Command::Sweep {
            auto_apply,
            interval: Some(secs),
        } => {
            let handle = spawn_progression_sweep(
                service.manager().clone(),
                Duration::from_secs(secs.max(1)),
                auto_apply,
            );
            signal::ctrl_c().await?;
            info!("Interrupt received, stopping progression sweep");
            handle.shutdown().await;
            true
        }
    };
    Ok(success)
}
