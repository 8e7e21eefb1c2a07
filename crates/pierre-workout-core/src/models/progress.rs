// ABOUTME: Per-exercise progress counters and per-exercise session settings
// ABOUTME: Enforces the sets_completed <= target_sets invariant at the mutation point
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::workout::Exercise;
use serde::{Deserialize, Serialize};

/// Progress for one exercise, created at session start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgress {
    /// Exercise display name
    pub exercise_name: String,
    /// Catalogue code, if the exercise has one
    pub exercise_code: Option<String>,
    /// Sets finished so far, never above `target_sets`
    pub sets_completed: u32,
    /// Planned number of sets
    pub target_sets: u32,
    /// Reps performed per completed set
    pub reps_completed: u32,
    /// Working weight in kilograms
    pub weight_kg: f64,
    /// Most recent uploaded set recording
    pub video_url: Option<String>,
    /// Photo template chosen by rotation when a photo was attached
    pub template_url: Option<String>,
    /// Uploaded exercise photo
    pub photo_url: Option<String>,
}

impl ExerciseProgress {
    /// Fresh progress for `exercise`
    #[must_use]
    pub fn for_exercise(exercise: &Exercise) -> Self {
        Self {
            exercise_name: exercise.name.clone(),
            exercise_code: exercise.exercise_code.clone(),
            sets_completed: 0,
            target_sets: exercise.sets,
            reps_completed: 0,
            weight_kg: 0.0,
            video_url: None,
            template_url: None,
            photo_url: None,
        }
    }

    /// Count one finished set; returns `false` when the target was already reached
    pub fn record_set(&mut self, reps: u32, weight_kg: f64) -> bool {
        if self.sets_completed >= self.target_sets {
            return false;
        }
        self.sets_completed += 1;
        self.reps_completed = reps;
        self.weight_kg = weight_kg;
        true
    }

    /// Whether every planned set is done
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.sets_completed >= self.target_sets
    }

    /// Drop partial work after a cancelled attempt
    pub fn discard_partial(&mut self) {
        self.sets_completed = 0;
        self.reps_completed = 0;
        self.video_url = None;
    }

    /// `sets × reps × weight` for this exercise
    #[must_use]
    pub fn volume(&self) -> f64 {
        f64::from(self.sets_completed) * f64::from(self.reps_completed) * self.weight_kg
    }
}

/// Choices produced by the stage selector, consumed once by the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettings {
    /// Record each set on camera (requires premium or admin)
    pub wants_to_record: bool,
    /// Drive reps with the cadence timer instead of manual taps
    pub use_timer: bool,
    /// Starting weight in kilograms
    pub weight: f64,
}
