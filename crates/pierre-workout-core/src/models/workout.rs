// ABOUTME: Workout plan and exercise definitions supplied by the schedule collaborator
// ABOUTME: Includes rep-target parsing and coach demo video resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::reps::DEFAULT_TARGET_REPS;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A scheduled workout, immutable for the duration of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Display name, also used as the log's `workout_name`
    pub name: String,
    /// Targeted muscle group
    pub muscle_group: String,
    /// Planned duration in minutes
    #[serde(default)]
    pub duration_minutes: u32,
    /// Exercises in the order they are presented
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Workout {
    /// Check the invariants the session relies on
    ///
    /// # Errors
    ///
    /// Returns an error if any exercise declares zero sets
    pub fn validate(&self) -> AppResult<()> {
        if let Some(exercise) = self.exercises.iter().find(|exercise| exercise.sets == 0) {
            return Err(AppError::invalid_input(format!(
                "exercise '{}' must have at least one set",
                exercise.name
            )));
        }
        Ok(())
    }

    /// Exercise at `index`, if any
    #[must_use]
    pub fn exercise(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }
}

/// One exercise of a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Display name, may carry a muscle-group prefix ("Chest - Bench Press")
    pub name: String,
    /// Stable catalogue code, preferred over the name for history lookups
    #[serde(default)]
    pub exercise_code: Option<String>,
    /// Number of sets to perform
    pub sets: u32,
    /// Rep target as written by the coach, e.g. "8-10"
    pub reps: String,
    /// Rest between sets in seconds
    #[serde(default)]
    pub rest_seconds: Option<u32>,
    /// Performed one side at a time
    #[serde(default)]
    pub is_unilateral: bool,
    /// Default demo video
    #[serde(default)]
    pub video_url: Option<String>,
    /// Demo videos recorded by specific coaches, keyed by coach id
    #[serde(default)]
    pub coach_videos: HashMap<String, String>,
    /// Free-form coaching notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl Exercise {
    /// Target rep count parsed from the `reps` string
    #[must_use]
    pub fn target_reps(&self) -> u32 {
        parse_target_reps(&self.reps)
    }

    /// Target rep count with a configured fallback for unparseable strings
    #[must_use]
    pub fn target_reps_or(&self, default: u32) -> u32 {
        parse_target_reps_or(&self.reps, default)
    }

    /// Rest between sets with a configured fallback when unset
    #[must_use]
    pub fn rest_seconds_or(&self, default: u32) -> u32 {
        self.rest_seconds.unwrap_or(default)
    }

    /// Demo video for the given coach, falling back to the default video
    #[must_use]
    pub fn demo_video(&self, coach_id: Option<&str>) -> Option<&str> {
        coach_id
            .and_then(|coach| self.coach_videos.get(coach))
            .map(String::as_str)
            .or(self.video_url.as_deref())
    }
}

/// Extract the leading integer of a rep string
///
/// `"8-10"` yields 8 and `" 12 reps"` yields 12. Strings without a leading
/// number, or with a leading zero count, yield [`DEFAULT_TARGET_REPS`].
#[must_use]
pub fn parse_target_reps(reps: &str) -> u32 {
    parse_target_reps_or(reps, DEFAULT_TARGET_REPS)
}

/// Same as [`parse_target_reps`] with a caller-supplied fallback
#[must_use]
pub fn parse_target_reps_or(reps: &str, default: u32) -> u32 {
    let trimmed = reps.trim_start();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    match trimmed[..digits_end].parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => {
            debug!(reps, default, "no leading rep count, using default target");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(reps: &str) -> Exercise {
        Exercise {
            name: "Chest - Bench Press".to_owned(),
            exercise_code: Some("BP01".to_owned()),
            sets: 3,
            reps: reps.to_owned(),
            rest_seconds: None,
            is_unilateral: false,
            video_url: Some("https://videos/default.mp4".to_owned()),
            coach_videos: HashMap::from([(
                "coach-ana".to_owned(),
                "https://videos/ana.mp4".to_owned(),
            )]),
            notes: None,
        }
    }

    #[test]
    fn test_parse_target_reps() {
        assert_eq!(parse_target_reps("8-10"), 8);
        assert_eq!(parse_target_reps("12"), 12);
        assert_eq!(parse_target_reps("  15 reps"), 15);
        assert_eq!(parse_target_reps("AMRAP"), DEFAULT_TARGET_REPS);
        assert_eq!(parse_target_reps(""), DEFAULT_TARGET_REPS);
        assert_eq!(parse_target_reps("0"), DEFAULT_TARGET_REPS);
        assert_eq!(parse_target_reps_or("to failure", 6), 6);
    }

    #[test]
    fn test_rest_falls_back_to_configured_default() {
        let mut ex = exercise("10");
        assert_eq!(ex.rest_seconds_or(90), 90);
        ex.rest_seconds = Some(30);
        assert_eq!(ex.rest_seconds_or(90), 30);
    }

    #[test]
    fn test_demo_video_prefers_coach() {
        let ex = exercise("10");
        assert_eq!(ex.demo_video(Some("coach-ana")), Some("https://videos/ana.mp4"));
        assert_eq!(ex.demo_video(Some("coach-bo")), Some("https://videos/default.mp4"));
        assert_eq!(ex.demo_video(None), Some("https://videos/default.mp4"));
    }

    #[test]
    fn test_validate_rejects_zero_sets() {
        let mut ex = exercise("10");
        ex.sets = 0;
        let workout = Workout {
            name: "Push".to_owned(),
            muscle_group: "chest".to_owned(),
            duration_minutes: 45,
            exercises: vec![ex],
        };
        assert!(workout.validate().is_err());
    }

    #[test]
    fn test_workout_deserializes_with_defaults() {
        let json = r#"{"name":"Legs","muscle_group":"legs","exercises":[{"name":"Lunge","sets":2,"reps":"12","is_unilateral":true}]}"#;
        let workout: Workout = serde_json::from_str(json).unwrap();
        assert_eq!(workout.exercises.len(), 1);
        assert!(workout.exercises[0].is_unilateral);
        assert!(workout.exercises[0].coach_videos.is_empty());
    }
}
