use std::time::Instant;

use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};

fn handle_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "status": state.status,
            "pendingPush": state.debounce.pending(),
        }),
    )
}

/// Poll the debounce slot; fires the coalesced push once the quiet period
/// has elapsed. The host UI calls this on its own cadence.
fn handle_tick(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(e) = helpers::require_workspace(state) {
        return e.response(&req.id);
    }
    let mut fired = false;
    let mut pushed = false;
    if state.debounce.take(Instant::now()) {
        fired = true;
        pushed = helpers::push_now(state);
    }
    ok(
        &req.id,
        json!({ "fired": fired, "pushed": pushed, "status": state.status }),
    )
}

/// Push immediately, superseding any pending debounce.
fn handle_flush(state: &mut AppState, req: &Request) -> serde_json::Value {
    // Without a loaded roster the store is empty; pushing it would replace
    // the entire remote store with nothing.
    if let Err(e) = helpers::require_workspace(state) {
        return e.response(&req.id);
    }
    state.debounce.cancel();
    let pushed = helpers::push_now(state);
    ok(&req.id, json!({ "pushed": pushed, "status": state.status }))
}

/// Manual re-pull: there is no automatic retry loop, so recovering from an
/// `error` status is always an explicit caller action.
fn handle_pull(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(e) = helpers::require_workspace(state) {
        return e.response(&req.id);
    }
    // A pull replaces local state wholesale; anything unsynced is forfeit.
    state.debounce.cancel();
    helpers::load_roster(state);
    ok(
        &req.id,
        json!({
            "status": state.status,
            "studentCount": state.store.students().len(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "sync.status" => Some(handle_status(state, req)),
        "sync.tick" => Some(handle_tick(state, req)),
        "sync.flush" => Some(handle_flush(state, req)),
        "sync.pull" => Some(handle_pull(state, req)),
        _ => None,
    }
}
