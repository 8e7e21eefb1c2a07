// ABOUTME: Rep cadence engine driving contraction/extension phases, audio cues and side switches
// ABOUTME: Counts integer ticks per phase so progress never drifts; manual mode ignores ticks entirely
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Execution timer
//!
//! Each rep is a contraction phase followed by an extension phase. While the
//! timer runs in automatic mode, every phase tick advances `phase_progress`
//! and every phase boundary produces an audio cue. Reaching the rep target on
//! the left side of a unilateral exercise starts a side switch, after which
//! the right side starts again from rep zero. Reaching it anywhere else
//! completes the set.

use super::countdown::Countdown;
use crate::config::TimingConfig;
use crate::constants::audio;
use serde::Serialize;
use tracing::debug;

/// Part of a rep currently being performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepPhase {
    /// Lifting or squeezing, the short phase
    Contraction,
    /// Controlled return, the long phase
    Extension,
}

/// Body side for unilateral exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// First side
    Left,
    /// Second side
    Right,
}

/// Tones played at phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    /// Start of a contraction phase
    Contraction,
    /// Start of an extension phase
    Extension,
    /// Start of a side switch
    SideSwitch,
    /// Set finished
    SetComplete,
}

impl AudioCue {
    /// Tone pitch; each cue has a distinct frequency
    #[must_use]
    pub const fn frequency_hz(self) -> u32 {
        match self {
            Self::Contraction => audio::CONTRACTION_CUE_HZ,
            Self::Extension => audio::EXTENSION_CUE_HZ,
            Self::SideSwitch => audio::SIDE_SWITCH_CUE_HZ,
            Self::SetComplete => audio::SET_COMPLETE_CUE_HZ,
        }
    }
}

/// Observable state of the running set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPhaseState {
    /// Reps finished on the current side
    pub current_rep: u32,
    /// Phase in progress
    pub rep_phase: RepPhase,
    /// Percentage of the current phase elapsed, 0 to 100
    pub phase_progress: u8,
    /// Side being worked; always `Left` for bilateral exercises
    pub current_side: Side,
    /// Progression frozen by the user
    pub is_paused: bool,
    /// Seconds left in the side switch, if one is running
    pub side_switch_remaining: Option<u32>,
}

/// Events produced by the timer for the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionSignal {
    /// Play a cue
    Cue(AudioCue),
    /// One rep finished on `side`
    RepCompleted {
        /// Reps now finished on this side
        rep: u32,
        /// Side the rep was performed on
        side: Side,
    },
    /// The side switch started and lasts `seconds`
    SideSwitchStarted {
        /// Switch length
        seconds: u32,
    },
    /// The side switch ended; the right side begins
    SideSwitchFinished,
    /// The set is finished
    SetComplete,
}

/// Per-set rep cadence engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionTimer {
    state: ExecutionPhaseState,
    target_reps: u32,
    unilateral: bool,
    automatic: bool,
    contraction_ticks: u32,
    extension_ticks: u32,
    ticks_in_phase: u32,
    side_switch_seconds: u32,
    side_switch: Option<Countdown>,
    finished: bool,
}

impl ExecutionTimer {
    /// Timer for one set. `automatic` is the user's timer choice.
    #[must_use]
    pub fn new(target_reps: u32, unilateral: bool, automatic: bool, timing: &TimingConfig) -> Self {
        Self {
            state: ExecutionPhaseState {
                current_rep: 0,
                rep_phase: RepPhase::Contraction,
                phase_progress: 0,
                current_side: Side::Left,
                is_paused: false,
                side_switch_remaining: None,
            },
            target_reps: target_reps.max(1),
            unilateral,
            automatic,
            contraction_ticks: timing.contraction_ticks().max(1),
            extension_ticks: timing.extension_ticks().max(1),
            ticks_in_phase: 0,
            side_switch_seconds: timing.side_switch_seconds,
            side_switch: None,
            finished: false,
        }
    }

    /// Current observable state
    #[must_use]
    pub const fn state(&self) -> &ExecutionPhaseState {
        &self.state
    }

    /// Rep target per side
    #[must_use]
    pub const fn target_reps(&self) -> u32 {
        self.target_reps
    }

    /// Whether the side switch pause is running
    #[must_use]
    pub const fn is_switching_sides(&self) -> bool {
        self.side_switch.is_some()
    }

    /// Whether the set has been completed
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Signals emitted when the set begins
    #[must_use]
    pub fn start(&self) -> Vec<ExecutionSignal> {
        if self.automatic {
            vec![ExecutionSignal::Cue(AudioCue::Contraction)]
        } else {
            Vec::new()
        }
    }

    /// Freeze phase progression and the side switch clock
    pub fn pause(&mut self) {
        self.state.is_paused = true;
    }

    /// Continue from where progression was frozen
    pub fn resume(&mut self) {
        self.state.is_paused = false;
    }

    /// Advance the rep cadence by one phase tick
    ///
    /// Ignored in manual mode, while paused, during a side switch and after
    /// the set has completed.
    pub fn on_phase_tick(&mut self) -> Vec<ExecutionSignal> {
        if !self.automatic || self.state.is_paused || self.side_switch.is_some() || self.finished
        {
            return Vec::new();
        }

        let phase_ticks = self.phase_ticks();
        self.ticks_in_phase += 1;
        if self.ticks_in_phase < phase_ticks {
            self.state.phase_progress = (self.ticks_in_phase * 100 / phase_ticks) as u8;
            return Vec::new();
        }

        self.ticks_in_phase = 0;
        self.state.phase_progress = 0;
        match self.state.rep_phase {
            RepPhase::Contraction => {
                self.state.rep_phase = RepPhase::Extension;
                vec![ExecutionSignal::Cue(AudioCue::Extension)]
            }
            RepPhase::Extension => {
                self.state.current_rep += 1;
                let mut signals = vec![ExecutionSignal::RepCompleted {
                    rep: self.state.current_rep,
                    side: self.state.current_side,
                }];
                if self.state.current_rep >= self.target_reps {
                    signals.extend(self.finish_side());
                } else {
                    self.state.rep_phase = RepPhase::Contraction;
                    signals.push(ExecutionSignal::Cue(AudioCue::Contraction));
                }
                signals
            }
        }
    }

    /// Advance the side switch clock by one second
    pub fn on_clock_tick(&mut self) -> Vec<ExecutionSignal> {
        if self.state.is_paused {
            return Vec::new();
        }
        let Some(switch) = self.side_switch.as_mut() else {
            return Vec::new();
        };

        let fired = switch.tick();
        self.state.side_switch_remaining = Some(switch.remaining());
        if !fired {
            return Vec::new();
        }

        debug!("side switch finished, starting right side");
        self.side_switch = None;
        self.state.side_switch_remaining = None;
        let mut signals = vec![ExecutionSignal::SideSwitchFinished];
        signals.extend(self.start());
        signals
    }

    /// The user's "Complete Set" action
    ///
    /// On the left side of a unilateral exercise this starts the side switch;
    /// everywhere else it completes the set. Returns nothing during a side
    /// switch or once the set is already complete.
    pub fn complete_set_manually(&mut self) -> Vec<ExecutionSignal> {
        if self.side_switch.is_some() || self.finished {
            return Vec::new();
        }
        self.state.current_rep = self.target_reps;
        self.finish_side()
    }

    fn finish_side(&mut self) -> Vec<ExecutionSignal> {
        self.ticks_in_phase = 0;
        self.state.phase_progress = 0;
        self.state.rep_phase = RepPhase::Contraction;

        if self.unilateral && self.state.current_side == Side::Left {
            self.state.current_side = Side::Right;
            self.state.current_rep = 0;
            self.side_switch = Some(Countdown::new(self.side_switch_seconds));
            self.state.side_switch_remaining = Some(self.side_switch_seconds);
            return vec![
                ExecutionSignal::Cue(AudioCue::SideSwitch),
                ExecutionSignal::SideSwitchStarted {
                    seconds: self.side_switch_seconds,
                },
            ];
        }

        self.finished = true;
        let mut signals = Vec::with_capacity(2);
        if self.automatic {
            signals.push(ExecutionSignal::Cue(AudioCue::SetComplete));
        }
        signals.push(ExecutionSignal::SetComplete);
        signals
    }

    const fn phase_ticks(&self) -> u32 {
        match self.state.rep_phase {
            RepPhase::Contraction => self.contraction_ticks,
            RepPhase::Extension => self.extension_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> TimingConfig {
        TimingConfig::default()
    }

    fn run_rep(timer: &mut ExecutionTimer) -> Vec<ExecutionSignal> {
        let ticks = timing().contraction_ticks() + timing().extension_ticks();
        (0..ticks).flat_map(|_| timer.on_phase_tick()).collect()
    }

    #[test]
    fn test_default_phase_tick_counts() {
        assert_eq!(timing().contraction_ticks(), 20);
        assert_eq!(timing().extension_ticks(), 60);
    }

    #[test]
    fn test_progress_increments_and_resets_at_boundary() {
        let mut timer = ExecutionTimer::new(10, false, true, &timing());
        timer.on_phase_tick();
        assert_eq!(timer.state().phase_progress, 5);
        for _ in 0..18 {
            timer.on_phase_tick();
        }
        assert_eq!(timer.state().phase_progress, 95);

        let signals = timer.on_phase_tick();
        assert_eq!(signals, vec![ExecutionSignal::Cue(AudioCue::Extension)]);
        assert_eq!(timer.state().phase_progress, 0);
        assert_eq!(timer.state().rep_phase, RepPhase::Extension);
    }

    #[test]
    fn test_rep_completes_after_both_phases() {
        let mut timer = ExecutionTimer::new(10, false, true, &timing());
        let signals = run_rep(&mut timer);
        assert!(signals.contains(&ExecutionSignal::RepCompleted {
            rep: 1,
            side: Side::Left
        }));
        assert_eq!(signals.last(), Some(&ExecutionSignal::Cue(AudioCue::Contraction)));
        assert_eq!(timer.state().current_rep, 1);
    }

    #[test]
    fn test_bilateral_set_completes_at_target() {
        let mut timer = ExecutionTimer::new(2, false, true, &timing());
        run_rep(&mut timer);
        let signals = run_rep(&mut timer);
        assert_eq!(signals.last(), Some(&ExecutionSignal::SetComplete));
        assert!(timer.is_finished());
        assert!(timer.on_phase_tick().is_empty());
    }

    #[test]
    fn test_unilateral_switches_then_completes() {
        let mut timer = ExecutionTimer::new(10, true, true, &timing());
        let mut signals = Vec::new();
        for _ in 0..10 {
            signals.extend(run_rep(&mut timer));
        }
        assert!(signals.contains(&ExecutionSignal::SideSwitchStarted { seconds: 10 }));
        assert!(!signals.contains(&ExecutionSignal::SetComplete));
        assert_eq!(timer.state().current_side, Side::Right);
        assert_eq!(timer.state().current_rep, 0);
        assert!(timer.is_switching_sides());

        // Phase ticks are ignored during the switch
        assert!(timer.on_phase_tick().is_empty());
        for _ in 0..9 {
            assert!(timer.on_clock_tick().is_empty());
        }
        assert_eq!(timer.state().side_switch_remaining, Some(1));
        let finished = timer.on_clock_tick();
        assert_eq!(finished[0], ExecutionSignal::SideSwitchFinished);
        assert!(!timer.is_switching_sides());

        let mut right = Vec::new();
        for _ in 0..10 {
            right.extend(run_rep(&mut timer));
        }
        assert_eq!(right.last(), Some(&ExecutionSignal::SetComplete));
        assert!(!right
            .iter()
            .any(|signal| matches!(signal, ExecutionSignal::SideSwitchStarted { .. })));
    }

    #[test]
    fn test_pause_freezes_progress() {
        let mut timer = ExecutionTimer::new(10, false, true, &timing());
        for _ in 0..4 {
            timer.on_phase_tick();
        }
        timer.pause();
        for _ in 0..100 {
            assert!(timer.on_phase_tick().is_empty());
        }
        assert_eq!(timer.state().phase_progress, 20);
        timer.resume();
        timer.on_phase_tick();
        assert_eq!(timer.state().phase_progress, 25);
    }

    #[test]
    fn test_manual_mode_ignores_ticks() {
        let mut timer = ExecutionTimer::new(10, false, false, &timing());
        assert!(timer.start().is_empty());
        for _ in 0..1000 {
            assert!(timer.on_phase_tick().is_empty());
        }
        assert_eq!(timer.state().phase_progress, 0);
        assert_eq!(timer.complete_set_manually(), vec![ExecutionSignal::SetComplete]);
    }

    #[test]
    fn test_manual_unilateral_left_starts_switch() {
        let mut timer = ExecutionTimer::new(8, true, false, &timing());
        let signals = timer.complete_set_manually();
        assert!(signals.contains(&ExecutionSignal::SideSwitchStarted { seconds: 10 }));
        assert!(timer.complete_set_manually().is_empty());
        for _ in 0..10 {
            timer.on_clock_tick();
        }
        assert_eq!(timer.complete_set_manually(), vec![ExecutionSignal::SetComplete]);
    }

    #[test]
    fn test_cues_have_distinct_pitches() {
        let cues = [
            AudioCue::Contraction,
            AudioCue::Extension,
            AudioCue::SideSwitch,
            AudioCue::SetComplete,
        ];
        for (i, a) in cues.iter().enumerate() {
            for b in &cues[i + 1..] {
                assert_ne!(a.frequency_hz(), b.frequency_hz());
            }
        }
    }
}
