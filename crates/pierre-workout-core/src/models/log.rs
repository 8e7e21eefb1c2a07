// ABOUTME: Workout log record persisted once per finished session
// ABOUTME: Provides the total volume aggregation used for the log and the summary screen
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::progress::ExerciseProgress;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One exercise entry in a workout log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedExercise {
    /// Exercise display name
    pub exercise_name: String,
    /// Catalogue code, if any
    #[serde(default)]
    pub exercise_code: Option<String>,
    /// Number of sets finished
    pub sets_completed: u32,
    /// Reps performed in each set
    pub reps_per_set: u32,
    /// Working weight in kilograms
    pub weight_kg: f64,
    /// Recorded set video
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Photo template used for the exercise photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_url: Option<String>,
    /// Exercise photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl CompletedExercise {
    /// `sets × reps × weight`
    #[must_use]
    pub fn volume(&self) -> f64 {
        f64::from(self.sets_completed) * f64::from(self.reps_per_set) * self.weight_kg
    }
}

impl From<&ExerciseProgress> for CompletedExercise {
    fn from(progress: &ExerciseProgress) -> Self {
        Self {
            exercise_name: progress.exercise_name.clone(),
            exercise_code: progress.exercise_code.clone(),
            sets_completed: progress.sets_completed,
            reps_per_set: progress.reps_completed,
            weight_kg: progress.weight_kg,
            video_url: progress.video_url.clone(),
            template_url: progress.template_url.clone(),
            photo_url: progress.photo_url.clone(),
        }
    }
}

/// Durable record of one finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLogRecord {
    /// Client-generated id, lets the store ignore a retried write
    pub log_id: Uuid,
    /// Owner of the log
    pub user_email: String,
    /// Name of the performed workout
    pub workout_name: String,
    /// Targeted muscle group
    pub muscle_group: String,
    /// Calendar day the session finished
    pub date: NaiveDate,
    /// Elapsed session time rounded to whole minutes
    pub duration_minutes: u32,
    /// Exercises with at least one finished set
    pub exercises_completed: Vec<CompletedExercise>,
    /// Sum of `sets × reps × weight` over all logged exercises
    pub total_volume: f64,
}

impl WorkoutLogRecord {
    /// Logged entry carrying the given exercise code
    #[must_use]
    pub fn entry_for_code(&self, code: &str) -> Option<&CompletedExercise> {
        self.exercises_completed
            .iter()
            .find(|entry| entry.exercise_code.as_deref() == Some(code))
    }
}

/// Total volume over the exercises that have at least one finished set
#[must_use]
pub fn total_volume(exercises: &[CompletedExercise]) -> f64 {
    exercises
        .iter()
        .filter(|exercise| exercise.sets_completed > 0)
        .map(CompletedExercise::volume)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sets: u32, reps: u32, weight: f64) -> CompletedExercise {
        CompletedExercise {
            exercise_name: "Squat".to_owned(),
            exercise_code: None,
            sets_completed: sets,
            reps_per_set: reps,
            weight_kg: weight,
            video_url: None,
            template_url: None,
            photo_url: None,
        }
    }

    #[test]
    fn test_total_volume_skips_unstarted() {
        let exercises = vec![entry(2, 10, 20.0), entry(0, 10, 100.0), entry(3, 5, 60.0)];
        assert!((total_volume(&exercises) - 1300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_volume_empty() {
        assert!(total_volume(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_optional_urls_omitted_when_absent() {
        let json = serde_json::to_value(entry(1, 10, 10.0)).unwrap();
        assert!(json.get("video_url").is_none());
        assert!(json.get("photo_url").is_none());
    }
}
