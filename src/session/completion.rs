// ABOUTME: Workout completion: builds the log record and sequences achievement dialogs before the summary
// ABOUTME: Duration is rounded to whole minutes; only exercises with completed sets are logged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::timing::SECONDS_PER_MINUTE;
use crate::models::{
    total_volume, Achievement, CompletedExercise, ExerciseProgress, SessionUser, Workout,
    WorkoutLogRecord,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

/// Builds the single log record written when a workout finishes
pub struct CompletionAggregator;

impl CompletionAggregator {
    /// Whole minutes between `started_at` and `finished_at`, rounded to nearest
    #[must_use]
    pub fn duration_minutes(started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> u32 {
        let seconds = (finished_at - started_at).num_seconds().max(0);
        (seconds as f64 / SECONDS_PER_MINUTE).round() as u32
    }

    /// Log record for the session
    #[must_use]
    pub fn build_record(
        log_id: Uuid,
        user: &SessionUser,
        workout: &Workout,
        progress: &[ExerciseProgress],
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> WorkoutLogRecord {
        let exercises_completed: Vec<CompletedExercise> = progress
            .iter()
            .filter(|entry| entry.sets_completed > 0)
            .map(CompletedExercise::from)
            .collect();
        let total_volume = total_volume(&exercises_completed);

        WorkoutLogRecord {
            log_id,
            user_email: user.email.clone(),
            workout_name: workout.name.clone(),
            muscle_group: workout.muscle_group.clone(),
            date: finished_at.date_naive(),
            duration_minutes: Self::duration_minutes(started_at, finished_at),
            exercises_completed,
            total_volume,
        }
    }
}

/// Newly earned achievements, shown one at a time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementQueue {
    pending: VecDeque<Achievement>,
    shown: usize,
}

impl AchievementQueue {
    /// Queue in the order the checker reported them
    #[must_use]
    pub fn new(achievements: Vec<Achievement>) -> Self {
        Self {
            pending: achievements.into(),
            shown: 0,
        }
    }

    /// Achievement whose dialog is open
    #[must_use]
    pub fn current(&self) -> Option<&Achievement> {
        self.pending.front()
    }

    /// Dialogs not yet dismissed, including the open one
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Close the open dialog. Returns `true` while more remain.
    pub fn dismiss(&mut self) -> bool {
        if self.pending.pop_front().is_some() {
            self.shown += 1;
        }
        !self.pending.is_empty()
    }
}

/// What the completion screen is showing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum CompletionView {
    /// Log write in progress
    Saving,
    /// Log write failed; the record is kept for a retry
    SaveFailed {
        /// Failure reported by the log store
        message: String,
    },
    /// Waiting for the achievement check
    CheckingAchievements,
    /// One achievement dialog open
    Achievements {
        /// Remaining dialogs
        queue: AchievementQueue,
    },
    /// Final workout summary
    Summary,
}

impl CompletionView {
    /// Stable name used in errors and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Saving => "saving",
            Self::SaveFailed { .. } => "save_failed",
            Self::CheckingAchievements => "checking_achievements",
            Self::Achievements { .. } => "achievements",
            Self::Summary => "summary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn progress(name: &str, sets: u32, reps: u32, weight: f64) -> ExerciseProgress {
        ExerciseProgress {
            exercise_name: name.to_owned(),
            exercise_code: None,
            sets_completed: sets,
            target_sets: 3,
            reps_completed: reps,
            weight_kg: weight,
            video_url: None,
            template_url: None,
            photo_url: None,
        }
    }

    fn workout() -> Workout {
        Workout {
            name: "Full Body".to_owned(),
            muscle_group: "full".to_owned(),
            duration_minutes: 60,
            exercises: Vec::new(),
        }
    }

    #[test]
    fn test_duration_rounds_to_nearest_minute() {
        let start = Utc::now();
        assert_eq!(CompletionAggregator::duration_minutes(start, start), 0);
        assert_eq!(
            CompletionAggregator::duration_minutes(start, start + Duration::seconds(89)),
            1
        );
        assert_eq!(
            CompletionAggregator::duration_minutes(start, start + Duration::seconds(90)),
            2
        );
        assert_eq!(
            CompletionAggregator::duration_minutes(start, start - Duration::seconds(30)),
            0
        );
    }

    #[test]
    fn test_record_skips_unstarted_exercises() {
        let start = Utc::now();
        let entries = vec![
            progress("Squat", 2, 10, 20.0),
            progress("Row", 0, 0, 50.0),
            progress("Press", 1, 8, 30.0),
        ];
        let record = CompletionAggregator::build_record(
            Uuid::new_v4(),
            &SessionUser::free("ana@example.com"),
            &workout(),
            &entries,
            start,
            start + Duration::minutes(45),
        );
        assert_eq!(record.exercises_completed.len(), 2);
        assert!((record.total_volume - 640.0).abs() < f64::EPSILON);
        assert_eq!(record.duration_minutes, 45);
        assert_eq!(record.user_email, "ana@example.com");
    }

    #[test]
    fn test_empty_session_record() {
        let start = Utc::now();
        let record = CompletionAggregator::build_record(
            Uuid::new_v4(),
            &SessionUser::free("bo@example.com"),
            &workout(),
            &[progress("Squat", 0, 0, 0.0)],
            start,
            start,
        );
        assert!(record.exercises_completed.is_empty());
        assert!(record.total_volume.abs() < f64::EPSILON);
    }

    #[test]
    fn test_queue_dismisses_in_order() {
        let mut queue = AchievementQueue::new(vec![
            Achievement::new("first_workout"),
            Achievement::new("volume_1000"),
        ]);
        assert_eq!(queue.current().map(|a| a.achievement_type.as_str()), Some("first_workout"));
        assert!(queue.dismiss());
        assert_eq!(queue.current().map(|a| a.achievement_type.as_str()), Some("volume_1000"));
        assert!(!queue.dismiss());
        assert!(queue.current().is_none());
        assert!(!queue.dismiss());
    }
}
