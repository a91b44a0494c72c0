// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Rendering wait outcomes as user-facing text.
//!
//! Commands distinguish exactly three outcomes: success, timeout (with a
//! status hint, since the resource may still converge on its own), and a
//! terminal failure reported by the resource itself. Everything else passes
//! through unmodified; retry counts and stack traces never reach the user.

use crate::error::{Result, VigilError};
use crate::store::ObjectKey;
use std::time::Duration;

/// What the wait was for, fixing the wording of the rendered messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitGoal {
    Ready,
    Deleted,
}

impl WaitGoal {
    fn pending_phrase(&self) -> &'static str {
        match self {
            WaitGoal::Ready => "to become ready",
            WaitGoal::Deleted => "to be deleted",
        }
    }

    fn success_phrase(&self) -> &'static str {
        match self {
            WaitGoal::Ready => "is ready",
            WaitGoal::Deleted => "was deleted",
        }
    }
}

/// Format whole seconds the way Go duration strings read: 30s, 1m30s, 1h0m0s
fn humanize(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, mins, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h{}m{}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m{}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Render a race outcome as the lines a command prints
pub fn render(goal: WaitGoal, key: &ObjectKey, timeout: Duration, result: &Result<()>) -> Vec<String> {
    match result {
        Ok(()) => vec![format!("Workload {:?} {}", key.name, goal.success_phrase())],
        Err(VigilError::Timeout(_)) => vec![
            format!(
                "Error: timeout after {} waiting for {:?} {}",
                humanize(timeout),
                key.name,
                goal.pending_phrase()
            ),
            format!(
                "To view status run: kubectl get workload {} --namespace {}",
                key.name, key.namespace
            ),
        ],
        Err(err) => vec![format!("Error: {}", err)],
    }
}
