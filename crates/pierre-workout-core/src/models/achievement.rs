// ABOUTME: Achievement descriptors returned by the achievement-check collaborator
// ABOUTME: Carries the achievement type and optional provider metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A newly earned achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Achievement identifier, e.g. `first_workout`
    pub achievement_type: String,
    /// Extra data for rendering the dialog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Achievement {
    /// Achievement without metadata
    pub fn new(achievement_type: impl Into<String>) -> Self {
        Self {
            achievement_type: achievement_type.into(),
            metadata: None,
        }
    }
}
