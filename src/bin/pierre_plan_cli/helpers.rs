// ABOUTME: Argument parsers and output helpers for the plan CLI
// ABOUTME: Parses model enums by their serde names and compact exercise log entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Display;
use std::str::FromStr;

use pierre_plan_engine::models::{ActualPerformance, ExerciseLog};
use pierre_plan_engine::services::ApiResponse;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Parse a model enum from its `snake_case` name (e.g. `hypertrophy`, `dumbbells`)
pub fn parse_enum<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    let name = value.trim().to_lowercase().replace('-', "_");
    serde_json::from_value(Value::String(name)).map_err(|_| format!("unknown value '{value}'"))
}

/// Parse `REF,SETS[,REPS[,LOAD_KG[,RPE]]]`; empty fields are skipped
pub fn parse_exercise_log(value: &str) -> Result<ExerciseLog, String> {
    let mut parts = value.split(',').map(str::trim);
    let exercise_ref = parts
        .next()
        .filter(|r| !r.is_empty())
        .ok_or_else(|| "missing exercise reference".to_owned())?
        .to_owned();
    let sets = parts
        .next()
        .ok_or_else(|| format!("missing set count for {exercise_ref}"))?
        .parse::<u32>()
        .map_err(|e| format!("invalid set count for {exercise_ref}: {e}"))?;
    let reps = optional(parts.next(), "reps")?;
    let load_kg = optional(parts.next(), "load")?;
    let rpe = optional(parts.next(), "rpe")?;

    Ok(ExerciseLog {
        exercise_ref,
        actual: ActualPerformance {
            sets,
            reps,
            load_kg,
            duration_seconds: None,
        },
        rpe,
    })
}

fn optional<T: FromStr>(part: Option<&str>, what: &str) -> Result<Option<T>, String>
where
    T::Err: Display,
{
    match part {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| format!("invalid {what} '{raw}': {e}")),
    }
}

/// Print the envelope as pretty JSON on stdout
pub fn print_response<T: Serialize>(response: &ApiResponse<T>) -> serde_json::Result<bool> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(response.success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pierre_plan_engine::models::{Equipment, Goal};

    #[test]
    fn test_parse_enum() {
        assert_eq!(parse_enum::<Goal>("Hypertrophy").unwrap(), Goal::Hypertrophy);
        assert_eq!(parse_enum::<Equipment>("dumbbells").unwrap(), Equipment::Dumbbells);
        assert!(parse_enum::<Goal>("yoga").is_err());
    }

    #[test]
    fn test_parse_exercise_log() {
        let entry = parse_exercise_log("push_up,3,12,,7.5").unwrap();
        assert_eq!(entry.exercise_ref, "push_up");
        assert_eq!(entry.actual.sets, 3);
        assert_eq!(entry.actual.reps, Some(12));
        assert_eq!(entry.actual.load_kg, None);
        assert_eq!(entry.rpe, Some(7.5));
        assert!(parse_exercise_log(",3").is_err());
        assert!(parse_exercise_log("push_up,three").is_err());
    }
}
