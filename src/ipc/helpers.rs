use std::time::Instant;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::cache;
use crate::ipc::error::err;
use crate::ipc::types::AppState;
use crate::model::{seed_students, Student};
use crate::remote::RemoteError;
use crate::rollover;
use crate::sched::ConnectionStatus;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> HandlerErr {
        HandlerErr {
            code,
            message: message.into(),
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, None)
    }
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))
}

pub fn require_workspace(state: &AppState) -> Result<(), HandlerErr> {
    if state.workspace.is_none() {
        return Err(HandlerErr::new("no_workspace", "select a workspace first"));
    }
    Ok(())
}

pub fn student_json(student: &Student) -> serde_json::Value {
    serde_json::to_value(student).unwrap_or_else(|_| json!({}))
}

/// Pull-or-fallback load: adopt a non-empty remote roster, otherwise fall
/// back to the cache, otherwise the seed set; rollover-normalize into the
/// current academic year; mirror the result to the cache.
pub fn load_roster(state: &mut AppState) {
    state.status = if state.remote.is_configured() {
        ConnectionStatus::Checking
    } else {
        ConnectionStatus::Unconfigured
    };

    let mut roster: Option<Vec<Student>> = None;
    match state.remote.pull() {
        Ok(list) if !list.is_empty() => {
            state.status = ConnectionStatus::Connected;
            roster = Some(list);
        }
        // An empty remote store is a valid answer; the cache/seed fallback
        // still applies and the status dot keeps showing `checking`.
        Ok(_) => {}
        Err(RemoteError::Unconfigured) => {}
        Err(e) => {
            warn!(error = %e, "initial pull failed, working from local data");
            state.status = ConnectionStatus::Error;
        }
    }

    let mut roster = roster
        .or_else(|| state.cache.as_ref().and_then(cache::load))
        .unwrap_or_else(seed_students);

    if let Some(rolled) = rollover::apply(&roster, Utc::now().date_naive()) {
        info!("rolled roster into the current academic year");
        roster = rolled;
    }

    state.store.replace_all(roster);
    mirror_to_cache(state);
}

/// Persist the store to the local cache after a mutation and arm the
/// debounced auto-push.
pub fn mirror_and_schedule(state: &mut AppState) {
    mirror_to_cache(state);
    state.debounce.schedule(Instant::now());
}

pub fn mirror_to_cache(state: &AppState) {
    if let Some(conn) = &state.cache {
        if let Err(e) = cache::save(conn, state.store.students()) {
            warn!(error = %e, "failed to mirror roster to local cache");
        }
    }
}

/// Push the whole roster now and update the status dot. Returns whether the
/// push was delivered.
pub fn push_now(state: &mut AppState) -> bool {
    match state.remote.push(state.store.students()) {
        Ok(()) => {
            state.status = ConnectionStatus::Connected;
            true
        }
        Err(RemoteError::Unconfigured) => {
            state.status = ConnectionStatus::Unconfigured;
            false
        }
        Err(e) => {
            warn!(error = %e, "auto-push failed");
            state.status = ConnectionStatus::Error;
            false
        }
    }
}
