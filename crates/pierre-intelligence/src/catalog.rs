// ABOUTME: Exercise catalog contract consumed by plan generation and progression swaps
// ABOUTME: Ships a seeded built-in catalog covering bodyweight, free weight, machine and cardio work
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise Catalog
//!
//! The generator only sees the catalog through [`ExerciseCatalog`]. The
//! built-in implementation is a static, seeded list; storage-backed catalogs
//! can implement the same trait.

use std::collections::BTreeSet;

use pierre_core::constants::generation::BODYWEIGHT_SUBSTITUTE_ID;
use pierre_core::models::{
    DefaultPrescription, Equipment, ExerciseTemplate, ExperienceLevel, Goal, Modality,
    MuscleGroup, PlannedLoad,
};

/// Read access to exercise templates
pub trait ExerciseCatalog: Send + Sync {
    /// Templates at `level` or an adjacent level whose required equipment is
    /// available and whose primary muscles intersect `focus`, ordered by id
    fn find_by_focus_and_equipment(
        &self,
        focus: &BTreeSet<MuscleGroup>,
        equipment: &BTreeSet<Equipment>,
        level: ExperienceLevel,
    ) -> Vec<ExerciseTemplate>;

    /// Template by id
    fn get(&self, id: &str) -> Option<ExerciseTemplate>;
}

/// Generic bodyweight circuit used when injury filtering empties a session
#[must_use]
pub fn bodyweight_substitute(focus: &BTreeSet<MuscleGroup>) -> ExerciseTemplate {
    ExerciseTemplate {
        id: BODYWEIGHT_SUBSTITUTE_ID.to_owned(),
        name: "Bodyweight Circuit".to_owned(),
        modality: Modality::Time,
        goals: BTreeSet::from([
            Goal::Strength,
            Goal::Hypertrophy,
            Goal::Endurance,
            Goal::FatLoss,
            Goal::GeneralFitness,
        ]),
        level: ExperienceLevel::Beginner,
        required_equipment: BTreeSet::from([Equipment::Bodyweight]),
        primary_muscles: focus.clone(),
        default_prescription: DefaultPrescription {
            sets: 3,
            reps: None,
            duration_seconds: Some(45),
            load: PlannedLoad::Bodyweight,
            rest_seconds: 45,
        },
        estimated_minutes: 5.0,
        contraindications: Vec::new(),
        reference_max_kg: None,
        progression_ref: None,
    }
}

/// Static catalog seeded with a general-purpose exercise library
#[derive(Debug, Clone)]
pub struct BuiltinExerciseCatalog {
    templates: Vec<ExerciseTemplate>,
}

impl Default for BuiltinExerciseCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinExerciseCatalog {
    /// Catalog with the built-in exercise library
    #[must_use]
    pub fn new() -> Self {
        Self::from_templates(seed_templates())
    }

    /// Catalog over caller-provided templates
    #[must_use]
    pub fn from_templates(mut templates: Vec<ExerciseTemplate>) -> Self {
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        Self { templates }
    }

    /// All templates, ordered by id
    #[must_use]
    pub fn templates(&self) -> &[ExerciseTemplate] {
        &self.templates
    }
}

impl ExerciseCatalog for BuiltinExerciseCatalog {
    fn find_by_focus_and_equipment(
        &self,
        focus: &BTreeSet<MuscleGroup>,
        equipment: &BTreeSet<Equipment>,
        level: ExperienceLevel,
    ) -> Vec<ExerciseTemplate> {
        self.templates
            .iter()
            .filter(|template| template.level.is_within_one(level))
            .filter(|template| template.fits_equipment(equipment))
            .filter(|template| template.targets_any(focus))
            .cloned()
            .collect()
    }

    fn get(&self, id: &str) -> Option<ExerciseTemplate> {
        self.templates
            .iter()
            .find(|template| template.id == id)
            .cloned()
    }
}

struct Seed(ExerciseTemplate);

impl Seed {
    fn new(id: &str, name: &str, modality: Modality, level: ExperienceLevel) -> Self {
        Self(ExerciseTemplate {
            id: id.to_owned(),
            name: name.to_owned(),
            modality,
            goals: BTreeSet::new(),
            level,
            required_equipment: BTreeSet::from([Equipment::Bodyweight]),
            primary_muscles: BTreeSet::new(),
            default_prescription: DefaultPrescription {
                sets: 3,
                reps: None,
                duration_seconds: None,
                load: PlannedLoad::Bodyweight,
                rest_seconds: 60,
            },
            estimated_minutes: 5.0,
            contraindications: Vec::new(),
            reference_max_kg: None,
            progression_ref: None,
        })
    }

    fn goals(mut self, goals: &[Goal]) -> Self {
        self.0.goals = goals.iter().copied().collect();
        self
    }

    fn equipment(mut self, equipment: &[Equipment]) -> Self {
        self.0.required_equipment = equipment.iter().copied().collect();
        self
    }

    fn muscles(mut self, muscles: &[MuscleGroup]) -> Self {
        self.0.primary_muscles = muscles.iter().copied().collect();
        self
    }

    fn reps(mut self, sets: u32, reps: u32) -> Self {
        self.0.default_prescription.sets = sets;
        self.0.default_prescription.reps = Some(reps);
        self
    }

    fn timed(mut self, sets: u32, seconds: u32) -> Self {
        self.0.default_prescription.sets = sets;
        self.0.default_prescription.duration_seconds = Some(seconds);
        self
    }

    fn absolute(mut self, kg: f64, reference_max_kg: f64) -> Self {
        self.0.default_prescription.load = PlannedLoad::Absolute { kg };
        self.0.reference_max_kg = Some(reference_max_kg);
        self
    }

    fn relative(mut self, percent: f64) -> Self {
        self.0.default_prescription.load = PlannedLoad::Relative { percent };
        self
    }

    fn rest(mut self, seconds: u32) -> Self {
        self.0.default_prescription.rest_seconds = seconds;
        self
    }

    fn minutes(mut self, minutes: f64) -> Self {
        self.0.estimated_minutes = minutes;
        self
    }

    fn avoid(mut self, conditions: &[&str]) -> Self {
        self.0.contraindications = conditions.iter().map(|c| (*c).to_owned()).collect();
        self
    }

    fn progresses_to(mut self, id: &str) -> Self {
        self.0.progression_ref = Some(id.to_owned());
        self
    }

    fn build(self) -> ExerciseTemplate {
        self.0
    }
}

// Long function: flat seed table, one entry per template
fn seed_templates() -> Vec<ExerciseTemplate> {
    use Equipment as Kit;
    use ExperienceLevel::{Advanced, Beginner, Intermediate};
    use Goal::{Endurance, FatLoss, GeneralFitness, Hypertrophy, Strength};
    use MuscleGroup as M;

    vec![
        // Bodyweight
        Seed::new("push_up", "Push-Up", Modality::Reps, Beginner)
            .goals(&[Strength, Hypertrophy, Endurance, FatLoss, GeneralFitness])
            .muscles(&[M::Chest, M::Triceps, M::Shoulders])
            .reps(3, 10)
            .minutes(6.0)
            .avoid(&["wrist"])
            .progresses_to("decline_push_up")
            .build(),
        Seed::new("decline_push_up", "Decline Push-Up", Modality::Reps, Intermediate)
            .goals(&[Strength, Hypertrophy, Endurance, GeneralFitness])
            .muscles(&[M::Chest, M::Triceps, M::Shoulders])
            .reps(3, 10)
            .minutes(7.0)
            .avoid(&["wrist", "shoulder"])
            .progresses_to("archer_push_up")
            .build(),
        Seed::new("archer_push_up", "Archer Push-Up", Modality::Reps, Advanced)
            .goals(&[Strength, Hypertrophy])
            .muscles(&[M::Chest, M::Triceps])
            .reps(3, 8)
            .rest(90)
            .minutes(7.0)
            .avoid(&["wrist", "shoulder"])
            .build(),
        Seed::new("superman_hold", "Superman Hold", Modality::Time, Beginner)
            .goals(&[Hypertrophy, Endurance, GeneralFitness])
            .muscles(&[M::Back, M::Glutes])
            .timed(3, 30)
            .rest(30)
            .minutes(4.0)
            .avoid(&["lower back"])
            .build(),
        Seed::new("prone_y_raise", "Prone Y Raise", Modality::Reps, Beginner)
            .goals(&[Hypertrophy, GeneralFitness])
            .muscles(&[M::Back, M::Shoulders])
            .reps(3, 12)
            .rest(45)
            .minutes(5.0)
            .avoid(&["shoulder"])
            .build(),
        Seed::new("bodyweight_squat", "Bodyweight Squat", Modality::Reps, Beginner)
            .goals(&[Hypertrophy, Endurance, FatLoss, GeneralFitness])
            .muscles(&[M::Quadriceps, M::Glutes])
            .reps(3, 15)
            .minutes(6.0)
            .avoid(&["knee"])
            .progresses_to("jump_squat")
            .build(),
        Seed::new("jump_squat", "Jump Squat", Modality::Reps, Intermediate)
            .goals(&[Endurance, FatLoss, GeneralFitness])
            .muscles(&[M::Quadriceps, M::Glutes, M::Calves])
            .reps(3, 12)
            .rest(75)
            .minutes(7.0)
            .avoid(&["knee", "ankle"])
            .build(),
        Seed::new("glute_bridge", "Glute Bridge", Modality::Reps, Beginner)
            .goals(&[Strength, Hypertrophy, GeneralFitness])
            .muscles(&[M::Glutes, M::Hamstrings])
            .reps(3, 15)
            .rest(45)
            .minutes(5.0)
            .progresses_to("single_leg_glute_bridge")
            .build(),
        Seed::new(
            "single_leg_glute_bridge",
            "Single-Leg Glute Bridge",
            Modality::Reps,
            Intermediate,
        )
        .goals(&[Strength, Hypertrophy, GeneralFitness])
        .muscles(&[M::Glutes, M::Hamstrings])
        .reps(3, 10)
        .rest(45)
        .minutes(6.0)
        .build(),
        Seed::new("plank", "Plank", Modality::Time, Beginner)
            .goals(&[Strength, Hypertrophy, Endurance, FatLoss, GeneralFitness])
            .muscles(&[M::Core])
            .timed(3, 45)
            .rest(45)
            .minutes(4.5)
            .avoid(&["lower back"])
            .progresses_to("side_plank")
            .build(),
        Seed::new("side_plank", "Side Plank", Modality::Time, Intermediate)
            .goals(&[Strength, Endurance, GeneralFitness])
            .muscles(&[M::Core, M::Shoulders])
            .timed(3, 30)
            .rest(30)
            .minutes(4.0)
            .avoid(&["shoulder"])
            .build(),
        Seed::new("mountain_climber", "Mountain Climber", Modality::Interval, Beginner)
            .goals(&[Endurance, FatLoss, GeneralFitness])
            .muscles(&[M::Core, M::Cardio])
            .timed(4, 30)
            .rest(30)
            .minutes(4.0)
            .avoid(&["wrist"])
            .build(),
        Seed::new("burpee", "Burpee", Modality::Interval, Intermediate)
            .goals(&[Endurance, FatLoss])
            .muscles(&[M::FullBody, M::Cardio])
            .timed(4, 40)
            .rest(40)
            .minutes(5.5)
            .avoid(&["knee", "wrist"])
            .build(),
        // Dumbbells
        Seed::new(
            "dumbbell_bench_press",
            "Dumbbell Bench Press",
            Modality::Reps,
            Beginner,
        )
        .goals(&[Strength, Hypertrophy, GeneralFitness])
        .equipment(&[Kit::Dumbbells, Kit::Bench])
        .muscles(&[M::Chest, M::Triceps])
        .reps(3, 10)
        .absolute(15.0, 30.0)
        .rest(90)
        .minutes(8.0)
        .avoid(&["shoulder"])
        .build(),
        Seed::new("dumbbell_row", "Dumbbell Row", Modality::Reps, Beginner)
            .goals(&[Strength, Hypertrophy, GeneralFitness])
            .equipment(&[Kit::Dumbbells])
            .muscles(&[M::Back, M::Biceps])
            .reps(3, 10)
            .absolute(14.0, 28.0)
            .rest(75)
            .minutes(7.0)
            .build(),
        Seed::new(
            "dumbbell_shoulder_press",
            "Dumbbell Shoulder Press",
            Modality::Reps,
            Intermediate,
        )
        .goals(&[Strength, Hypertrophy])
        .equipment(&[Kit::Dumbbells])
        .muscles(&[M::Shoulders, M::Triceps])
        .reps(3, 10)
        .absolute(12.0, 24.0)
        .rest(90)
        .minutes(7.5)
        .avoid(&["shoulder"])
        .build(),
        Seed::new("goblet_squat", "Goblet Squat", Modality::Reps, Beginner)
            .goals(&[Strength, Hypertrophy, FatLoss, GeneralFitness])
            .equipment(&[Kit::Dumbbells])
            .muscles(&[M::Quadriceps, M::Glutes])
            .reps(3, 12)
            .absolute(16.0, 32.0)
            .rest(90)
            .minutes(8.0)
            .avoid(&["knee"])
            .build(),
        Seed::new(
            "dumbbell_romanian_deadlift",
            "Dumbbell Romanian Deadlift",
            Modality::Reps,
            Intermediate,
        )
        .goals(&[Strength, Hypertrophy])
        .equipment(&[Kit::Dumbbells])
        .muscles(&[M::Hamstrings, M::Glutes])
        .reps(3, 10)
        .absolute(20.0, 40.0)
        .rest(90)
        .minutes(8.0)
        .avoid(&["lower back"])
        .build(),
        Seed::new("dumbbell_curl", "Dumbbell Curl", Modality::Reps, Beginner)
            .goals(&[Hypertrophy, GeneralFitness])
            .equipment(&[Kit::Dumbbells])
            .muscles(&[M::Biceps])
            .reps(3, 12)
            .absolute(8.0, 16.0)
            .minutes(5.0)
            .avoid(&["elbow"])
            .build(),
        // Barbell
        Seed::new(
            "barbell_back_squat",
            "Barbell Back Squat",
            Modality::Reps,
            Intermediate,
        )
        .goals(&[Strength, Hypertrophy])
        .equipment(&[Kit::Barbell])
        .muscles(&[M::Quadriceps, M::Glutes, M::Core])
        .reps(4, 6)
        .relative(70.0)
        .rest(150)
        .minutes(12.0)
        .avoid(&["knee", "lower back"])
        .build(),
        Seed::new(
            "barbell_bench_press",
            "Barbell Bench Press",
            Modality::Reps,
            Intermediate,
        )
        .goals(&[Strength, Hypertrophy])
        .equipment(&[Kit::Barbell, Kit::Bench])
        .muscles(&[M::Chest, M::Triceps, M::Shoulders])
        .reps(4, 6)
        .relative(72.5)
        .rest(150)
        .minutes(12.0)
        .avoid(&["shoulder"])
        .build(),
        Seed::new("barbell_deadlift", "Barbell Deadlift", Modality::Reps, Advanced)
            .goals(&[Strength])
            .equipment(&[Kit::Barbell])
            .muscles(&[M::Back, M::Hamstrings, M::Glutes])
            .reps(3, 5)
            .relative(80.0)
            .rest(180)
            .minutes(11.0)
            .avoid(&["lower back"])
            .build(),
        Seed::new("overhead_press", "Overhead Press", Modality::Reps, Intermediate)
            .goals(&[Strength])
            .equipment(&[Kit::Barbell])
            .muscles(&[M::Shoulders, M::Triceps])
            .reps(4, 6)
            .relative(70.0)
            .rest(120)
            .minutes(10.0)
            .avoid(&["shoulder"])
            .build(),
        // Pull-up bar
        Seed::new("pull_up", "Pull-Up", Modality::Reps, Intermediate)
            .goals(&[Strength, Hypertrophy])
            .equipment(&[Kit::PullUpBar])
            .muscles(&[M::Back, M::Biceps])
            .reps(3, 6)
            .rest(120)
            .minutes(8.0)
            .avoid(&["shoulder", "elbow"])
            .build(),
        Seed::new(
            "hanging_knee_raise",
            "Hanging Knee Raise",
            Modality::Reps,
            Beginner,
        )
        .goals(&[Hypertrophy, GeneralFitness])
        .equipment(&[Kit::PullUpBar])
        .muscles(&[M::Core])
        .reps(3, 10)
        .minutes(5.0)
        .build(),
        // Kettlebell
        Seed::new("kettlebell_swing", "Kettlebell Swing", Modality::Reps, Beginner)
            .goals(&[Endurance, FatLoss, GeneralFitness])
            .equipment(&[Kit::Kettlebell])
            .muscles(&[M::Glutes, M::Hamstrings, M::FullBody])
            .reps(4, 15)
            .absolute(16.0, 32.0)
            .minutes(7.0)
            .avoid(&["lower back"])
            .build(),
        // Resistance bands
        Seed::new("band_pull_apart", "Band Pull-Apart", Modality::Reps, Beginner)
            .goals(&[Hypertrophy, GeneralFitness])
            .equipment(&[Kit::ResistanceBands])
            .muscles(&[M::Back, M::Shoulders])
            .reps(3, 15)
            .rest(45)
            .minutes(4.0)
            .build(),
        Seed::new("band_chest_press", "Band Chest Press", Modality::Reps, Beginner)
            .goals(&[Hypertrophy, Endurance, GeneralFitness])
            .equipment(&[Kit::ResistanceBands])
            .muscles(&[M::Chest, M::Triceps])
            .reps(3, 15)
            .rest(45)
            .minutes(5.0)
            .build(),
        // Machines and cables
        Seed::new("leg_press", "Leg Press", Modality::Reps, Beginner)
            .goals(&[Strength, Hypertrophy])
            .equipment(&[Kit::Machines])
            .muscles(&[M::Quadriceps, M::Glutes])
            .reps(3, 12)
            .absolute(80.0, 160.0)
            .rest(90)
            .minutes(8.0)
            .avoid(&["knee"])
            .build(),
        Seed::new("lat_pulldown", "Lat Pulldown", Modality::Reps, Beginner)
            .goals(&[Strength, Hypertrophy, GeneralFitness])
            .equipment(&[Kit::Machines])
            .muscles(&[M::Back, M::Biceps])
            .reps(3, 12)
            .absolute(40.0, 80.0)
            .rest(75)
            .minutes(7.0)
            .build(),
        Seed::new("cable_row", "Seated Cable Row", Modality::Reps, Intermediate)
            .goals(&[Hypertrophy, GeneralFitness])
            .equipment(&[Kit::Cable])
            .muscles(&[M::Back, M::Biceps])
            .reps(3, 12)
            .absolute(35.0, 70.0)
            .rest(75)
            .minutes(7.0)
            .build(),
        // Cardio machines
        Seed::new("treadmill_run", "Treadmill Run", Modality::Distance, Beginner)
            .goals(&[Endurance, FatLoss, GeneralFitness])
            .equipment(&[Kit::CardioMachine])
            .muscles(&[M::Cardio, M::Quadriceps])
            .timed(1, 1200)
            .relative(65.0)
            .rest(0)
            .minutes(22.0)
            .avoid(&["knee", "ankle"])
            .build(),
        Seed::new("bike_intervals", "Bike Intervals", Modality::Rpm, Intermediate)
            .goals(&[Endurance, FatLoss])
            .equipment(&[Kit::CardioMachine])
            .muscles(&[M::Cardio, M::Quadriceps])
            .timed(6, 60)
            .relative(80.0)
            .minutes(13.0)
            .build(),
        Seed::new("rower_intervals", "Rower Intervals", Modality::Interval, Advanced)
            .goals(&[Endurance, FatLoss])
            .equipment(&[Kit::CardioMachine])
            .muscles(&[M::Cardio, M::Back, M::FullBody])
            .timed(8, 45)
            .relative(85.0)
            .rest(45)
            .minutes(13.0)
            .avoid(&["lower back"])
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_respects_equipment_and_focus() {
        let catalog = BuiltinExerciseCatalog::new();
        let found = catalog.find_by_focus_and_equipment(
            &BTreeSet::from([MuscleGroup::Chest, MuscleGroup::Back]),
            &BTreeSet::from([Equipment::Bodyweight]),
            ExperienceLevel::Beginner,
        );
        assert!(!found.is_empty());
        for template in &found {
            assert!(template
                .required_equipment
                .iter()
                .all(|e| *e == Equipment::Bodyweight));
            assert!(template.primary_muscles.contains(&MuscleGroup::Chest)
                || template.primary_muscles.contains(&MuscleGroup::Back));
            assert_ne!(template.level, ExperienceLevel::Advanced);
        }
    }

    #[test]
    fn test_ids_are_unique_and_progressions_resolve() {
        let catalog = BuiltinExerciseCatalog::new();
        let ids: BTreeSet<&str> = catalog.templates().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.templates().len());
        for template in catalog.templates() {
            if let Some(next) = &template.progression_ref {
                assert!(catalog.get(next).is_some(), "missing {next}");
            }
        }
    }

    #[test]
    fn test_substitute_targets_slot_focus() {
        let focus = BTreeSet::from([MuscleGroup::Quadriceps]);
        let substitute = bodyweight_substitute(&focus);
        assert_eq!(substitute.id, BODYWEIGHT_SUBSTITUTE_ID);
        assert_eq!(substitute.primary_muscles, focus);
        assert!(substitute.contraindications.is_empty());
    }
}
