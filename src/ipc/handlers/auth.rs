use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::get_required_str;
use crate::ipc::types::{AppState, Request};

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let code = match get_required_str(&req.params, "code") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    if state.gate.login(&code) {
        ok(&req.id, json!({ "authenticated": true }))
    } else {
        // No lockout; the caller may retry indefinitely.
        err(&req.id, "bad_code", "that code isn't quite right", None)
    }
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.gate.logout();
    // A relock also drops any pending auto-push; nothing should fire after
    // the teacher walks away.
    state.debounce.cancel();
    ok(&req.id, json!({ "authenticated": false }))
}

fn handle_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({ "authenticated": state.gate.is_unlocked() }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_login(state, req)),
        "auth.logout" => Some(handle_logout(state, req)),
        "auth.status" => Some(handle_status(state, req)),
        _ => None,
    }
}
