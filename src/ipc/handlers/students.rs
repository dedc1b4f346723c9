use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{self, get_required_str, student_json, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{GradeLevel, Student};
use crate::store::NewStudent;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(e) = helpers::require_workspace(state) {
        return e.response(&req.id);
    }
    ok(&req.id, json!({ "students": state.store.students() }))
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(e) = helpers::require_workspace(state) {
        return e.response(&req.id);
    }
    let student_id = match get_required_str(&req.params, "studentId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    match state.store.get(&student_id) {
        Some(s) => ok(&req.id, json!({ "student": student_json(s) })),
        None => err(&req.id, "not_found", "no such student", None),
    }
}

fn parse_new_student(params: &serde_json::Value) -> Result<NewStudent, HandlerErr> {
    let name = get_required_str(params, "name")?.trim().to_string();
    let teacher = get_required_str(params, "teacher")?.trim().to_string();
    if name.is_empty() || teacher.is_empty() {
        return Err(HandlerErr::new(
            "bad_params",
            "name/teacher must not be empty",
        ));
    }
    let grade_raw = get_required_str(params, "grade")?;
    let grade = GradeLevel::parse(&grade_raw)
        .ok_or_else(|| HandlerErr::new("bad_params", format!("unknown grade: {}", grade_raw)))?;
    let interests = params
        .get("interests")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let star_reading_level = params
        .get("starReadingLevel")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Ok(NewStudent {
        name,
        grade,
        teacher,
        interests,
        star_reading_level,
    })
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(e) = helpers::require_workspace(state) {
        return e.response(&req.id);
    }
    let new = match parse_new_student(&req.params) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let created = student_json(state.store.add(new));
    helpers::mirror_and_schedule(state);
    ok(&req.id, json!({ "student": created }))
}

/// Whole-record replacement: the UI sends the full edited student back and
/// the store restamps `lastUpdated`. No field-level patches cross this
/// boundary.
fn handle_replace(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(e) = helpers::require_workspace(state) {
        return e.response(&req.id);
    }
    let Some(raw) = req.params.get("student") else {
        return err(&req.id, "bad_params", "missing params.student", None);
    };
    let student: Student = match serde_json::from_value(raw.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", format!("invalid student: {e}"), None),
    };
    let Some(stored) = state.store.replace(student) else {
        return err(&req.id, "not_found", "no such student", None);
    };
    let stored = student_json(stored);
    helpers::mirror_and_schedule(state);
    ok(&req.id, json!({ "student": stored }))
}

fn handle_roll_forward(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(e) = helpers::require_workspace(state) {
        return e.response(&req.id);
    }
    let student_id = match get_required_str(&req.params, "studentId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let Some(stored) = state.store.roll_forward(&student_id) else {
        return err(&req.id, "not_found", "no such student", None);
    };
    let stored = student_json(stored);
    helpers::mirror_and_schedule(state);
    ok(&req.id, json!({ "student": stored }))
}

fn handle_assessment_remove(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(e) = helpers::require_workspace(state) {
        return e.response(&req.id);
    }
    let student_id = match get_required_str(&req.params, "studentId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let assessment_id = match get_required_str(&req.params, "assessmentId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let Some(stored) = state.store.remove_assessment(&student_id, &assessment_id) else {
        return err(&req.id, "not_found", "no such student/assessment", None);
    };
    let stored = student_json(stored);
    helpers::mirror_and_schedule(state);
    ok(&req.id, json!({ "student": stored }))
}

fn handle_note_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(e) = helpers::require_workspace(state) {
        return e.response(&req.id);
    }
    let student_id = match get_required_str(&req.params, "studentId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let text = match get_required_str(&req.params, "text") {
        Ok(v) => v.trim().to_string(),
        Err(e) => return e.response(&req.id),
    };
    if text.is_empty() {
        return err(&req.id, "bad_params", "text must not be empty", None);
    }
    let Some(stored) = state.store.add_note(&student_id, &text) else {
        return err(&req.id, "not_found", "no such student", None);
    };
    let stored = student_json(stored);
    helpers::mirror_and_schedule(state);
    ok(&req.id, json!({ "student": stored }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.get" => Some(handle_get(state, req)),
        "students.create" => Some(handle_create(state, req)),
        "students.replace" => Some(handle_replace(state, req)),
        "students.rollForward" => Some(handle_roll_forward(state, req)),
        "assessments.remove" => Some(handle_assessment_remove(state, req)),
        "notes.add" => Some(handle_note_add(state, req)),
        _ => None,
    }
}
