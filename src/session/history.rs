// ABOUTME: Previous-log lookups used when an exercise is selected or a photo is attached
// ABOUTME: Resolves last recorded weight by exercise code, then by normalized name, and rotates photo templates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::{CompletedExercise, Exercise, WorkoutLogRecord};
use tracing::debug;

/// Lowercased exercise name without a leading muscle-group prefix
///
/// `"Chest - Bench Press"` and `"chest: bench press"` both normalize to
/// `"bench press"`.
#[must_use]
pub fn normalize_exercise_name(name: &str) -> String {
    let without_prefix = name
        .split_once(" - ")
        .or_else(|| name.split_once(':'))
        .map_or(name, |(_, rest)| rest);
    without_prefix.trim().to_lowercase()
}

/// Recent workout logs for the session's user, newest first
#[derive(Debug, Clone, Default)]
pub struct ExerciseHistory {
    logs: Vec<WorkoutLogRecord>,
}

impl ExerciseHistory {
    /// Wrap logs ordered newest first
    #[must_use]
    pub const fn new(logs: Vec<WorkoutLogRecord>) -> Self {
        Self { logs }
    }

    /// Number of logs available
    #[must_use]
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    /// Whether no logs are available
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Most recent weight recorded for `exercise`
    ///
    /// An exact `exercise_code` match anywhere in the history wins over a
    /// name match.
    #[must_use]
    pub fn previous_weight(&self, exercise: &Exercise) -> Option<f64> {
        let by_code = exercise.exercise_code.as_deref().and_then(|code| {
            self.logs
                .iter()
                .find_map(|log| log.entry_for_code(code))
        });
        let entry = by_code.or_else(|| {
            let wanted = normalize_exercise_name(&exercise.name);
            self.logs
                .iter()
                .flat_map(|log| log.exercises_completed.iter())
                .find(|entry| normalize_exercise_name(&entry.exercise_name) == wanted)
        })?;
        debug!(
            exercise = %exercise.name,
            weight_kg = entry.weight_kg,
            "previous weight found"
        );
        Some(entry.weight_kg)
    }

    /// Number of logs in which `exercise` was performed
    #[must_use]
    pub fn times_performed(&self, exercise: &Exercise) -> usize {
        let wanted = normalize_exercise_name(&exercise.name);
        self.logs
            .iter()
            .filter(|log| {
                log.exercises_completed
                    .iter()
                    .any(|entry| matches_exercise(entry, exercise, &wanted))
            })
            .count()
    }

    /// Photo overlay template for the next photo of `exercise`
    ///
    /// Templates rotate by how many times the exercise was logged before.
    #[must_use]
    pub fn template_for<'a>(&self, exercise: &Exercise, templates: &'a [String]) -> Option<&'a str> {
        if templates.is_empty() {
            return None;
        }
        let index = self.times_performed(exercise) % templates.len();
        templates.get(index).map(String::as_str)
    }
}

fn matches_exercise(entry: &CompletedExercise, exercise: &Exercise, normalized: &str) -> bool {
    match (&entry.exercise_code, &exercise.exercise_code) {
        (Some(logged), Some(current)) => logged == current,
        _ => normalize_exercise_name(&entry.exercise_name) == normalized,
    }
}
