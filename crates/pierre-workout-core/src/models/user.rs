// ABOUTME: Session user identity and entitlement flags
// ABOUTME: Premium or admin status gates recording and photo capture
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Premium/admin status of the user running the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlements {
    /// Paid subscription
    pub is_premium: bool,
    /// Administrator account
    pub is_admin: bool,
}

impl Entitlements {
    /// Recording and photo stages are open to premium users and admins
    #[must_use]
    pub const fn can_capture(&self) -> bool {
        self.is_premium || self.is_admin
    }
}

/// Identity of the user running the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Email used as the owner key for logs
    pub email: String,
    /// Entitlement flags
    #[serde(default)]
    pub entitlements: Entitlements,
    /// Coach whose demo videos the user prefers
    #[serde(default)]
    pub coach_id: Option<String>,
}

impl SessionUser {
    /// User without premium or admin status
    pub fn free(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            entitlements: Entitlements::default(),
            coach_id: None,
        }
    }

    /// Premium user
    pub fn premium(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            entitlements: Entitlements {
                is_premium: true,
                is_admin: false,
            },
            coach_id: None,
        }
    }

    /// Prefer demo videos from `coach_id`
    #[must_use]
    pub fn with_coach(mut self, coach_id: impl Into<String>) -> Self {
        self.coach_id = Some(coach_id.into());
        self
    }
}
