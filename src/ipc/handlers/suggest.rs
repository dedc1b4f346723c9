use serde_json::json;

use crate::config;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{self, get_required_str, student_json};
use crate::ipc::types::{AppState, Request};
use crate::suggest;

/// Generate instructional strategies for one student and union them into
/// their record.
fn handle_suggest(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(e) = helpers::require_workspace(state) {
        return e.response(&req.id);
    }
    let student_id = match get_required_str(&req.params, "studentId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let Some(student) = state.store.get(&student_id).cloned() else {
        return err(&req.id, "not_found", "no such student", None);
    };

    let api_key = std::env::var(config::SUGGEST_API_KEY_VAR).unwrap_or_default();
    let strategies = match suggest::generate(&api_key, &student) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "suggest_failed", format!("{e:#}"), None),
    };

    let Some(stored) = state.store.merge_strategies(&student_id, strategies) else {
        return err(&req.id, "not_found", "no such student", None);
    };
    let stored = student_json(stored);
    helpers::mirror_and_schedule(state);
    ok(&req.id, json!({ "student": stored }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "strategies.suggest" => Some(handle_suggest(state, req)),
        _ => None,
    }
}
