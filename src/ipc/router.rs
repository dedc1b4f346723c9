use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::err;

/// Methods reachable while the session gate is locked.
const UNGATED: &[&str] = &["health", "auth.login", "auth.logout", "auth.status"];

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    if !UNGATED.contains(&req.method.as_str()) && !state.gate.is_unlocked() {
        return err(&req.id, "locked", "enter the access code first", None);
    }

    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::auth::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::students::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::sync::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::suggest::try_handle(state, &req) {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}
