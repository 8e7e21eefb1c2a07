// ABOUTME: User-facing notification interface used by the session engine
// ABOUTME: Decouples alerts (camera denied, save failed) from any rendering mechanism
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Severity of a user notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral information
    Info,
    /// An operation finished successfully
    Success,
    /// Degraded but continuing, e.g. recording unavailable
    Warning,
    /// An operation failed and needs attention
    Error,
}

/// Sink for messages shown to the user
pub trait Notifier: Send + Sync {
    /// Show `message` to the user
    fn notify(&self, message: &str, kind: NotificationKind);
}

/// Notifier that renders notifications as tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Info | NotificationKind::Success => {
                info!(kind = ?kind, "{message}");
            }
            NotificationKind::Warning => warn!("{message}"),
            NotificationKind::Error => error!("{message}"),
        }
    }
}
