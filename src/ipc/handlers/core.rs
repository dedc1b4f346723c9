use serde_json::json;
use std::path::PathBuf;

use crate::cache;
use crate::config;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "configured": state.remote.is_configured(),
            "spreadsheetUrl": config::SPREADSHEET_URL,
        }),
    )
}

/// Open (or create) the workspace cache, then run the load sequence:
/// remote pull → cache → seed, rollover-normalized and mirrored back.
fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match cache::open(&path) {
        Ok(conn) => {
            state.workspace = Some(path.clone());
            state.cache = Some(conn);
            helpers::load_roster(state);
            ok(
                &req.id,
                json!({
                    "workspacePath": path.to_string_lossy(),
                    "status": state.status,
                    "studentCount": state.store.students().len(),
                }),
            )
        }
        Err(e) => err(&req.id, "cache_open_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
