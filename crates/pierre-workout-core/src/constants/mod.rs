// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Timing, rep parsing, audio cue and media storage constants for workout sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by the part of the session that consumes them.

/// Session timer durations
pub mod timing {
    /// Pre-exercise countdown length in seconds
    pub const COUNTDOWN_SECONDS: u32 = 10;
    /// Pause inserted between the left and right side of a unilateral exercise
    pub const SIDE_SWITCH_SECONDS: u32 = 10;
    /// Rest between sets when the exercise does not define `rest_seconds`
    pub const DEFAULT_REST_SECONDS: u32 = 60;
    /// Contraction phase of a single rep in milliseconds
    pub const CONTRACTION_PHASE_MS: u64 = 1000;
    /// Extension phase of a single rep in milliseconds
    pub const EXTENSION_PHASE_MS: u64 = 3000;
    /// Resolution of the rep cadence ticker in milliseconds
    pub const PHASE_TICK_MS: u64 = 50;
    /// Wall-clock length of one countdown second in milliseconds
    pub const CLOCK_TICK_MS: u64 = 1000;
    /// Seconds per minute, used for workout duration rounding
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
}

/// Rep target parsing
pub mod reps {
    /// Target rep count when the reps string has no leading number
    pub const DEFAULT_TARGET_REPS: u32 = 10;
}

/// Audio cue pitches
pub mod audio {
    /// Tone played when a contraction phase begins
    pub const CONTRACTION_CUE_HZ: u32 = 880;
    /// Tone played when an extension phase begins
    pub const EXTENSION_CUE_HZ: u32 = 440;
    /// Tone played when the user should switch sides
    pub const SIDE_SWITCH_CUE_HZ: u32 = 660;
    /// Tone played when a set is complete
    pub const SET_COMPLETE_CUE_HZ: u32 = 1320;
}

/// Media upload naming
pub mod storage {
    /// Content type of recorded set videos
    pub const VIDEO_CONTENT_TYPE: &str = "video/webm";
    /// Content type of exercise photos
    pub const PHOTO_CONTENT_TYPE: &str = "image/jpeg";
    /// Object key prefix for recorded videos
    pub const VIDEO_PREFIX: &str = "workout-videos";
    /// Object key prefix for exercise photos
    pub const PHOTO_PREFIX: &str = "workout-photos";
}

/// Service identity used in structured logs
pub mod service_names {
    /// Name of the session engine service
    pub const PIERRE_WORKOUT_SESSION: &str = "pierre-workout-session";
}
