// ABOUTME: Criterion benchmarks for the workout session engine
// ABOUTME: Measures rep cadence ticking, full controller runs, snapshot serialization and log persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the session engine.
//!
//! The controller runs on every timer tick, so tick handling and snapshot
//! publication must stay far below the 50ms phase tick.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use chrono::{NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pierre_workout_session::config::{SessionConfig, TimingConfig};
use pierre_workout_session::external::memory::InMemoryLogStore;
use pierre_workout_session::external::WorkoutLogStore;
use pierre_workout_session::models::{
    total_volume, CompletedExercise, Exercise, SessionUser, Workout, WorkoutLogRecord,
};
use pierre_workout_session::session::{
    ExecutionTimer, ExerciseHistory, SessionCommand, SessionController, SessionInput,
    StageAction,
};
use std::collections::HashMap;
use tokio::runtime::Runtime;
use uuid::Uuid;

fn exercise(index: usize, sets: u32) -> Exercise {
    Exercise {
        name: format!("Exercise {index}"),
        exercise_code: Some(format!("EX{index:03}")),
        sets,
        reps: "10".to_owned(),
        rest_seconds: Some(30),
        is_unilateral: index % 2 == 1,
        video_url: None,
        coach_videos: HashMap::new(),
        notes: None,
    }
}

fn workout(exercises: usize) -> Workout {
    Workout {
        name: "Benchmark Day".to_owned(),
        muscle_group: "full body".to_owned(),
        duration_minutes: 60,
        exercises: (0..exercises).map(|index| exercise(index, 3)).collect(),
    }
}

fn log_record(entries: usize) -> WorkoutLogRecord {
    let exercises_completed: Vec<CompletedExercise> = (0..entries)
        .map(|index| CompletedExercise {
            exercise_name: format!("Exercise {index}"),
            exercise_code: Some(format!("EX{index:03}")),
            sets_completed: 3,
            reps_per_set: 10,
            weight_kg: 20.0 + index as f64,
            video_url: None,
            template_url: None,
            photo_url: None,
        })
        .collect();
    WorkoutLogRecord {
        log_id: Uuid::new_v4(),
        user_email: "bench@example.com".to_owned(),
        workout_name: "Benchmark Day".to_owned(),
        muscle_group: "full body".to_owned(),
        date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        duration_minutes: 55,
        total_volume: total_volume(&exercises_completed),
        exercises_completed,
    }
}

fn apply(controller: &mut SessionController, command: SessionCommand) {
    controller.apply(SessionInput::Command(command)).unwrap();
}

/// Drive every exercise of the workout with manual sets and finish
fn run_manual_session(exercises: usize, config: &SessionConfig) -> SessionController {
    let mut controller = SessionController::new(
        SessionUser::free("bench@example.com"),
        workout(exercises),
        ExerciseHistory::default(),
        config.clone(),
    )
    .unwrap();
    for index in 0..exercises {
        apply(&mut controller, SessionCommand::SelectExercise(index));
        for action in [
            StageAction::Next,
            StageAction::Next,
            StageAction::Next,
            StageAction::ChooseTimer(false),
            StageAction::Next,
            StageAction::SetWeight(25.0),
        ] {
            apply(&mut controller, SessionCommand::Stage(action));
        }
        apply(&mut controller, SessionCommand::FinishStages);

        while controller.progress()[index].sets_completed < 3 {
            let epoch = controller.epoch();
            if controller
                .apply(SessionInput::Command(SessionCommand::CompleteSet))
                .is_err()
            {
                controller.apply(SessionInput::ClockTick { epoch }).unwrap();
            }
        }
        apply(&mut controller, SessionCommand::ConfirmExercise);
    }
    apply(&mut controller, SessionCommand::FinishWorkout);
    controller
}

/// Benchmark phase ticks for a full timer-driven set
fn bench_phase_ticks(c: &mut Criterion) {
    let timing = TimingConfig::default();
    let mut group = c.benchmark_group("phase_ticks");

    for (label, unilateral) in [("bilateral", false), ("unilateral", true)] {
        group.bench_function(BenchmarkId::new("ten_rep_set", label), |b| {
            b.iter(|| {
                let mut timer = ExecutionTimer::new(10, unilateral, true, &timing);
                while !timer.is_finished() {
                    if timer.is_switching_sides() {
                        black_box(timer.on_clock_tick());
                    } else {
                        black_box(timer.on_phase_tick());
                    }
                }
                timer
            });
        });
    }

    group.finish();
}

/// Benchmark complete controller runs for different workout sizes
fn bench_controller_session(c: &mut Criterion) {
    let config = SessionConfig::default();
    let mut group = c.benchmark_group("controller_session");

    for exercises in [1_usize, 5, 20] {
        group.throughput(Throughput::Elements(exercises as u64));
        group.bench_with_input(
            BenchmarkId::new("manual", exercises),
            &exercises,
            |b, &exercises| {
                b.iter(|| run_manual_session(black_box(exercises), &config));
            },
        );
    }

    group.finish();
}

/// Benchmark the snapshot published after every input
fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    let controller = run_manual_session(20, &SessionConfig::default());

    group.bench_function("build", |b| {
        b.iter(|| black_box(controller.snapshot()));
    });
    group.bench_function("build_and_serialize", |b| {
        b.iter(|| serde_json::to_vec(&controller.snapshot()).unwrap());
    });

    group.finish();
}

/// Benchmark volume aggregation and log persistence
fn bench_completion(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("completion");

    for entries in [10_usize, 100] {
        let record = log_record(entries);
        group.throughput(Throughput::Elements(entries as u64));
        group.bench_with_input(
            BenchmarkId::new("total_volume", entries),
            &record,
            |b, record| {
                b.iter(|| total_volume(black_box(&record.exercises_completed)));
            },
        );
    }

    let store = InMemoryLogStore::new();
    let record = log_record(10);
    group.bench_function("persist_duplicate_log", |b| {
        b.iter(|| rt.block_on(async { store.create(black_box(&record)).await.unwrap() }));
    });
    group.bench_function("persist_new_log", |b| {
        b.iter(|| {
            let mut fresh = record.clone();
            fresh.log_id = Uuid::new_v4();
            fresh.date = Utc::now().date_naive();
            rt.block_on(async { store.create(&fresh).await.unwrap() });
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_phase_ticks,
    bench_controller_session,
    bench_snapshot,
    bench_completion,
);
criterion_main!(benches);
