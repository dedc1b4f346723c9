//! Remote sync adapter: full-replace push and full-fetch pull against one
//! spreadsheet-backed web-app endpoint.
//!
//! There is deliberately no merge logic. Push replaces the whole remote
//! store and pull replaces the whole local one; whichever side wrote last
//! wins, and concurrent sessions can clobber each other's unsynced edits.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config;
use crate::model::Student;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("sync endpoint is not configured")]
    Unconfigured,
    #[error("network error: {0}")]
    Network(String),
    #[error("endpoint returned status {0}")]
    BadStatus(u16),
    #[error("endpoint returned a non-array payload")]
    MalformedResponse,
}

pub struct RemoteSync {
    endpoint: String,
    agent: ureq::Agent,
}

impl RemoteSync {
    pub fn new(endpoint: String) -> RemoteSync {
        // Apps Script can be slow to cold-start; cap the wait so a dead
        // endpoint degrades to offline instead of hanging the load.
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout(Duration::from_secs(8))
            .build();
        RemoteSync { endpoint, agent }
    }

    pub fn is_configured(&self) -> bool {
        config::endpoint_is_configured(&self.endpoint)
    }

    /// Fetch the entire remote roster.
    ///
    /// Every failure mode comes back as an `Err` the caller must treat as
    /// "unknown" — never adopt it as state. `Ok(vec![])` is a real result
    /// meaning the remote store is empty.
    pub fn pull(&self) -> Result<Vec<Student>, RemoteError> {
        if !self.is_configured() {
            return Err(RemoteError::Unconfigured);
        }

        let resp = self
            .agent
            .get(&self.endpoint)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => RemoteError::BadStatus(code),
                ureq::Error::Transport(t) => RemoteError::Network(t.to_string()),
            })?;

        let body: serde_json::Value = resp
            .into_json()
            .map_err(|_| RemoteError::MalformedResponse)?;
        if !body.is_array() {
            return Err(RemoteError::MalformedResponse);
        }
        let students: Vec<Student> =
            serde_json::from_value(body).map_err(|_| RemoteError::MalformedResponse)?;
        debug!(count = students.len(), "pulled roster from sync endpoint");
        Ok(students)
    }

    /// Replace the entire remote roster with `students`.
    ///
    /// The body goes out as `text/plain` and the response content is never
    /// consulted (the upstream web app absorbs the raw body regardless), so
    /// success means only "a server answered": any HTTP status counts as
    /// delivered and only transport-level failures are reported.
    pub fn push(&self, students: &[Student]) -> Result<(), RemoteError> {
        if !self.is_configured() {
            return Err(RemoteError::Unconfigured);
        }

        let body =
            serde_json::to_string(students).map_err(|e| RemoteError::Network(e.to_string()))?;
        match self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "text/plain")
            .send_string(&body)
        {
            Ok(_) | Err(ureq::Error::Status(_, _)) => {
                debug!(count = students.len(), "pushed roster to sync endpoint");
                Ok(())
            }
            Err(ureq::Error::Transport(t)) => {
                warn!(error = %t, "push failed");
                Err(RemoteError::Network(t.to_string()))
            }
        }
    }
}
