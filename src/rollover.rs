//! Academic-year math and the rollover transform.
//!
//! The academic year runs July through June. Rollover is applied to the
//! whole roster right after load so every student always carries an
//! assessment slot for the current year.

use chrono::{Datelike, NaiveDate};

use crate::model::{now_stamp, Assessment, Student};

/// "YYYY-YYYY" token for the academic year containing `date`.
/// July..December belong to the year starting that July; January..June to
/// the year that started the previous July.
pub fn academic_year_for(date: NaiveDate) -> String {
    let y = date.year();
    if date.month() >= 7 {
        format!("{}-{}", y, y + 1)
    } else {
        format!("{}-{}", y - 1, y)
    }
}

/// Increment both halves of a "YYYY-YYYY" token. Tokens that do not parse
/// come back unchanged rather than erroring; the caller is working with
/// free-form spreadsheet data.
pub fn next_year_string(year: &str) -> String {
    let mut parts = year.splitn(2, '-');
    let (Some(start), Some(end)) = (parts.next(), parts.next()) else {
        return year.to_string();
    };
    match (start.parse::<i32>(), end.parse::<i32>()) {
        (Ok(s), Ok(e)) => format!("{}-{}", s + 1, e + 1),
        _ => year.to_string(),
    }
}

/// Ensure every student has an assessment for the academic year containing
/// `today`, synthesizing an empty one from the latest prior year where
/// missing. Returns `None` when nothing changed so callers can skip
/// redundant cache/sync writes.
pub fn apply(students: &[Student], today: NaiveDate) -> Option<Vec<Student>> {
    let current_year = academic_year_for(today);
    let mut changed = false;

    let updated: Vec<Student> = students
        .iter()
        .map(|student| {
            if student.assessments.iter().any(|a| a.year == current_year) {
                return student.clone();
            }
            changed = true;

            // A student with no history keeps their current grade instead
            // of being advanced past it.
            let next_grade = student
                .latest_assessment()
                .map(|latest| latest.grade.successor())
                .unwrap_or(student.grade);

            let mut rolled = student.clone();
            rolled
                .assessments
                .insert(0, Assessment::empty(current_year.clone(), next_grade));
            rolled.grade = next_grade;
            rolled.last_updated = now_stamp();
            rolled
        })
        .collect();

    changed.then_some(updated)
}
