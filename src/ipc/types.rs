use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

use crate::config;
use crate::remote::RemoteSync;
use crate::sched::{ConnectionStatus, PushDebounce};
use crate::session::SessionGate;
use crate::store::RecordStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub cache: Option<Connection>,
    pub store: RecordStore,
    pub gate: SessionGate,
    pub remote: RemoteSync,
    pub status: ConnectionStatus,
    pub debounce: PushDebounce,
}

impl AppState {
    pub fn new() -> AppState {
        let remote = RemoteSync::new(config::sync_endpoint());
        let status = if remote.is_configured() {
            ConnectionStatus::Checking
        } else {
            ConnectionStatus::Unconfigured
        };
        AppState {
            workspace: None,
            cache: None,
            store: RecordStore::default(),
            gate: SessionGate::new(config::ACCESS_CODE),
            remote,
            status,
            debounce: PushDebounce::new(config::PUSH_QUIET_PERIOD),
        }
    }
}
