//! In-memory record store: the single source of truth for the roster once
//! loaded. All edits cross this boundary as whole-record replacements and
//! every mutation restamps `lastUpdated`.

use chrono::Utc;

use crate::model::{new_id, now_stamp, Assessment, GradeLevel, Note, Student};
use crate::rollover;

#[derive(Debug, Default)]
pub struct RecordStore {
    students: Vec<Student>,
}

/// Fields accepted when creating a student; everything else is seeded.
pub struct NewStudent {
    pub name: String,
    pub grade: GradeLevel,
    pub teacher: String,
    pub interests: Vec<String>,
    pub star_reading_level: Option<String>,
}

impl RecordStore {
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn get(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Swap in a freshly loaded roster (pull result, cache, or rollover
    /// output). Does not restamp; the records carry their own stamps.
    pub fn replace_all(&mut self, students: Vec<Student>) {
        self.students = students;
    }

    /// Create a student, prepended so newest shows first. Seeds one empty
    /// assessment for the current academic year at the chosen grade.
    pub fn add(&mut self, new: NewStudent) -> &Student {
        let year = rollover::academic_year_for(Utc::now().date_naive());
        let mut initial = Assessment::empty(year, new.grade);
        initial.star_reading_level = new.star_reading_level;
        let student = Student {
            id: new_id(),
            name: new.name,
            grade: new.grade,
            teacher: new.teacher,
            interests: new.interests,
            assessments: vec![initial],
            strategies: Vec::new(),
            notes: Vec::new(),
            last_updated: now_stamp(),
        };
        self.students.insert(0, student);
        &self.students[0]
    }

    /// Whole-record replacement keyed by id. Returns the stored record, or
    /// `None` when no student has that id.
    pub fn replace(&mut self, mut student: Student) -> Option<&Student> {
        let slot = self.students.iter_mut().find(|s| s.id == student.id)?;
        student.last_updated = now_stamp();
        *slot = student;
        Some(slot)
    }

    /// Append an observation, newest first. Notes are immutable once added.
    pub fn add_note(&mut self, student_id: &str, text: &str) -> Option<&Student> {
        let slot = self.students.iter_mut().find(|s| s.id == student_id)?;
        slot.notes.insert(
            0,
            Note {
                id: new_id(),
                text: text.to_string(),
                date: now_stamp(),
            },
        );
        slot.last_updated = now_stamp();
        Some(slot)
    }

    /// Explicit per-student "roll over to new year": advances one year past
    /// the latest assessment (or starts a ladder from the student's own
    /// grade) and updates the current grade to match.
    pub fn roll_forward(&mut self, student_id: &str) -> Option<&Student> {
        let slot = self.students.iter_mut().find(|s| s.id == student_id)?;
        let (year, grade) = match slot.assessments.iter().max_by(|a, b| a.year.cmp(&b.year)) {
            Some(latest) => (
                rollover::next_year_string(&latest.year),
                latest.grade.successor(),
            ),
            None => (
                rollover::academic_year_for(Utc::now().date_naive()),
                slot.grade,
            ),
        };
        slot.assessments.insert(0, Assessment::empty(year, grade));
        slot.grade = grade;
        slot.last_updated = now_stamp();
        Some(slot)
    }

    /// Remove one assessment year from a student's history. Returns `None`
    /// when either id does not resolve.
    pub fn remove_assessment(&mut self, student_id: &str, assessment_id: &str) -> Option<&Student> {
        let slot = self.students.iter_mut().find(|s| s.id == student_id)?;
        let before = slot.assessments.len();
        slot.assessments.retain(|a| a.id != assessment_id);
        if slot.assessments.len() == before {
            return None;
        }
        slot.last_updated = now_stamp();
        Some(slot)
    }

    /// Union new strategies into the student's list, preserving order and
    /// dropping duplicates. Used by the AI suggest flow.
    pub fn merge_strategies(&mut self, student_id: &str, extra: Vec<String>) -> Option<&Student> {
        let slot = self.students.iter_mut().find(|s| s.id == student_id)?;
        for s in extra {
            if !slot.strategies.contains(&s) {
                slot.strategies.push(s);
            }
        }
        slot.last_updated = now_stamp();
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed_students;

    fn store_with_seed() -> RecordStore {
        let mut store = RecordStore::default();
        store.replace_all(seed_students());
        store
    }

    #[test]
    fn add_prepends_and_seeds_current_year_assessment() {
        let mut store = store_with_seed();
        let id = store
            .add(NewStudent {
                name: "New Kid".into(),
                grade: GradeLevel::Third,
                teacher: "Ms. Cub".into(),
                interests: vec!["Robots".into()],
                star_reading_level: Some("3.0".into()),
            })
            .id
            .clone();

        assert_eq!(store.students()[0].id, id);
        let s = store.get(&id).expect("stored");
        assert_eq!(s.assessments.len(), 1);
        assert_eq!(s.assessments[0].grade, GradeLevel::Third);
        assert_eq!(s.assessments[0].star_reading_level.as_deref(), Some("3.0"));
        assert_eq!(
            s.assessments[0].year,
            rollover::academic_year_for(Utc::now().date_naive())
        );
    }

    #[test]
    fn replace_restamps_last_updated() {
        let mut store = store_with_seed();
        let mut edited = store.students()[0].clone();
        let old_stamp = edited.last_updated.clone();
        edited.name = "Renamed".into();
        edited.last_updated = "2000-01-01T00:00:00Z".into();

        let stored = store.replace(edited).expect("replaced");
        assert_eq!(stored.name, "Renamed");
        assert_ne!(stored.last_updated, "2000-01-01T00:00:00Z");
        assert!(stored.last_updated >= old_stamp);
    }

    #[test]
    fn replace_unknown_id_is_none() {
        let mut store = store_with_seed();
        let mut ghost = store.students()[0].clone();
        ghost.id = "missing".into();
        assert!(store.replace(ghost).is_none());
    }

    #[test]
    fn notes_prepend_newest_first() {
        let mut store = store_with_seed();
        let id = store.students()[0].id.clone();
        store.add_note(&id, "first").expect("note");
        store.add_note(&id, "second").expect("note");
        let notes = &store.get(&id).expect("student").notes;
        assert_eq!(notes[0].text, "second");
        assert_eq!(notes[1].text, "first");
    }

    #[test]
    fn roll_forward_advances_year_and_grade() {
        let mut store = store_with_seed();
        let id = store.students()[0].id.clone();
        let s = store.roll_forward(&id).expect("rolled");
        assert_eq!(s.assessments[0].year, "2025-2026");
        assert_eq!(s.assessments[0].grade, GradeLevel::Third);
        assert_eq!(s.grade, GradeLevel::Third);
    }

    #[test]
    fn remove_assessment_by_id() {
        let mut store = store_with_seed();
        let id = store.students()[0].id.clone();
        let victim = store.students()[0].assessments[1].id.clone();
        let s = store.remove_assessment(&id, &victim).expect("removed");
        assert_eq!(s.assessments.len(), 1);
        assert!(store.remove_assessment(&id, &victim).is_none());
    }

    #[test]
    fn merge_strategies_dedupes() {
        let mut store = store_with_seed();
        let id = store.students()[0].id.clone();
        let s = store
            .merge_strategies(&id, vec!["Visual cues".into(), "Choice boards".into()])
            .expect("merged");
        assert_eq!(
            s.strategies,
            vec![
                "Visual cues".to_string(),
                "Positive reinforcement".to_string(),
                "Choice boards".to_string()
            ]
        );
    }
}
