// ABOUTME: One-second countdowns for the pre-exercise countdown, rest and side switch
// ABOUTME: TimerHandle owns the interval task feeding ticks and aborts it when dropped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::trace;

/// Counts whole seconds down to zero and fires exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Countdown {
    remaining: u32,
    fired: bool,
}

impl Countdown {
    /// Countdown starting at `seconds`
    #[must_use]
    pub const fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            fired: false,
        }
    }

    /// Seconds left
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether zero has been reached
    #[must_use]
    pub const fn has_fired(&self) -> bool {
        self.fired
    }

    /// Advance one second. Returns `true` only on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.fired = true;
            return true;
        }
        false
    }
}

/// Owns a periodic task that sends a fixed message until dropped
///
/// Dropping the handle aborts the task, so a timer can never outlive the
/// state that started it.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Send `message` on `sender` every `period`, first after one full period
    #[must_use]
    pub fn every<T>(period: Duration, sender: mpsc::Sender<T>, message: T) -> Self
    where
        T: Clone + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if sender.send(message.clone()).await.is_err() {
                            break;
                        }
                    }
                    () = sender.closed() => {
                        trace!("timer receiver closed");
                        break;
                    }
                }
            }
        });
        Self { task }
    }

    /// Whether the task has stopped
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_exactly_once() {
        let mut countdown = Countdown::new(3);
        assert!(!countdown.tick());
        assert!(!countdown.tick());
        assert!(countdown.tick());
        assert!(!countdown.tick());
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), 0);
        assert!(countdown.has_fired());
    }

    #[test]
    fn test_zero_length_fires_on_first_tick() {
        let mut countdown = Countdown::new(0);
        assert!(countdown.tick());
        assert!(!countdown.tick());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_each_period() {
        let (tx, mut rx) = mpsc::channel(8);
        let _timer = TimerHandle::every(Duration::from_secs(1), tx, 7_u8);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_timer_stops_sending() {
        let (tx, mut rx) = mpsc::channel(8);
        let timer = TimerHandle::every(Duration::from_secs(1), tx, ());
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(rx.try_recv().is_ok());

        drop(timer);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
