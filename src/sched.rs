//! Sync status plus the single-slot push debounce.

use std::time::{Duration, Instant};

use serde::Serialize;

/// What the status dot in the header reflects. There is no retry loop
/// behind `Error`; recovery is a manual re-pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Checking,
    Connected,
    Error,
    Unconfigured,
}

/// Coalesces mutation bursts into one pending push. At most one deadline is
/// armed at a time; re-scheduling supersedes the previous one, so only the
/// most recent roster state ever goes out.
#[derive(Debug)]
pub struct PushDebounce {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl PushDebounce {
    pub fn new(quiet: Duration) -> PushDebounce {
        PushDebounce {
            quiet,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the deadline at `now + quiet`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    /// Disarm and report whether a push should fire now.
    pub fn take(&mut self, now: Instant) -> bool {
        if self.due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}
