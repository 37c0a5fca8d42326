// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for plan generation, adjustment bounds and progression heuristics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Defaults for the adaptive plan engine, grouped by the component that reads
//! them. Runtime overrides live in the engine configuration; these values are
//! the fallbacks when nothing is configured.

/// Profile constraint ranges
pub mod profile_limits {
    /// Minimum sessions per week
    pub const MIN_DAYS_PER_WEEK: u8 = 2;
    /// Maximum sessions per week at generation time
    pub const MAX_DAYS_PER_WEEK: u8 = 6;
    /// Minimum session length in minutes
    pub const MIN_SESSION_MINUTES: u16 = 30;
    /// Maximum session length in minutes
    pub const MAX_SESSION_MINUTES: u16 = 120;
    /// Days in the weekly cycle
    pub const DAYS_IN_WEEK: u8 = 7;
}

/// Plan generation defaults
pub mod generation {
    /// Set multiplier for beginners
    pub const BEGINNER_SET_FACTOR: f64 = 0.8;
    /// Set multiplier for intermediates
    pub const INTERMEDIATE_SET_FACTOR: f64 = 1.0;
    /// Set multiplier for advanced users
    pub const ADVANCED_SET_FACTOR: f64 = 1.2;
    /// Upper bound on exercises in one session before time budgeting
    pub const MAX_EXERCISES_PER_SESSION: usize = 6;
    /// Relative load assigned to bodyweight movements performed at capacity
    pub const BODYWEIGHT_RELATIVE_LOAD: f64 = 100.0;
    /// Relative load used when an absolute load has no reference max
    pub const DEFAULT_RELATIVE_LOAD: f64 = 60.0;
    /// Plan length for strength, hypertrophy and endurance goals
    pub const LONG_BLOCK_WEEKS: u32 = 8;
    /// Plan length for fat loss and general fitness goals
    pub const SHORT_BLOCK_WEEKS: u32 = 6;
    /// Catalog id of the generic bodyweight substitute
    pub const BODYWEIGHT_SUBSTITUTE_ID: &str = "bodyweight_circuit";
    /// Minimum injury token length considered for contraindication matching
    pub const MIN_INJURY_TOKEN_LEN: usize = 3;
    /// Filler words ignored when tokenizing injury notes
    pub const INJURY_STOPWORDS: &[&str] = &[
        "and", "the", "with", "from", "have", "has", "had", "left", "right", "minor", "old",
        "injury", "injured", "pain", "sore", "some", "bit", "little", "slight", "recovering",
    ];
}

/// Adjustment bounds
pub mod adjustment {
    /// Maximum absolute volume change per adjustment (percent)
    pub const MAX_VOLUME_PCT: f64 = 30.0;
    /// Maximum absolute intensity change per adjustment (percent)
    pub const MAX_INTENSITY_PCT: f64 = 20.0;
    /// Maximum absolute frequency change per adjustment (percent)
    pub const MAX_FREQUENCY_PCT: f64 = 30.0;
    /// Sessions per week never drop below this
    pub const MIN_SESSIONS_PER_WEEK: u32 = 1;
    /// Sessions per week never exceed the days of the week
    pub const MAX_SESSIONS_PER_WEEK: u32 = 7;
    /// Absolute loads are rounded to this plate increment (kg)
    pub const LOAD_ROUNDING_KG: f64 = 0.5;
    /// Upper bound of the relative intensity index
    pub const MAX_INTENSITY: f64 = 100.0;
    /// Exercises a surviving session may hold when folding in removed sessions
    pub const FOLD_SESSION_CAP: usize = 6;
}

/// Progression heuristics
pub mod progression {
    /// Completed sessions required per exercise before suggesting anything
    pub const MIN_SESSIONS_PER_EXERCISE: usize = 2;
    /// Weekly cycles examined by default
    pub const DEFAULT_LOOKBACK_ITERATIONS: u32 = 2;
    /// Completion ratio at or above which the prescription was fully met
    pub const FULL_COMPLETION_RATIO: f64 = 1.0;
    /// Completion ratio below which the user is under-recovered
    pub const MIN_COMPLETION_RATIO: f64 = 0.8;
    /// RPE at or below which headroom exists
    pub const HEADROOM_RPE: f64 = 7.0;
    /// RPE above which the user is overreaching
    pub const OVERREACH_RPE: f64 = 8.0;
    /// Load step for absolute loads (kg)
    pub const ABSOLUTE_LOAD_STEP_KG: f64 = 2.5;
    /// Load step for relative loads (percent of reference)
    pub const RELATIVE_LOAD_STEP: f64 = 5.0;
    /// Rep step for volume progression
    pub const REP_STEP: u32 = 2;
    /// Duration step per set for timed modalities (seconds)
    pub const DURATION_STEP_SECONDS: u32 = 15;
    /// Working time assumed per repetition when estimating session length (seconds)
    pub const SECONDS_PER_REP: f64 = 3.0;
}

/// Runtime defaults for the service around the engines
pub mod runtime {
    /// Service name reported in structured logs
    pub const SERVICE_NAME: &str = "pierre-plan-engine";
    /// Database URL selecting the in-memory stores
    pub const MEMORY_DATABASE_URL: &str = "memory";
    /// Interval between progression sweeps (seconds); 0 disables the sweep
    pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 0;
    /// Whether sweeps commit suggestions instead of storing them for review
    pub const DEFAULT_SWEEP_AUTO_APPLY: bool = false;
    /// Length of one plan iteration used for session history lookback (days)
    pub const DAYS_PER_ITERATION: i64 = 7;
}
