use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// K-8 grade ladder. Ordering of the variants is the promotion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeLevel {
    #[serde(rename = "Pre-K")]
    PreK,
    #[serde(rename = "Kindergarten")]
    Kindergarten,
    #[serde(rename = "1st Grade")]
    First,
    #[serde(rename = "2nd Grade")]
    Second,
    #[serde(rename = "3rd Grade")]
    Third,
    #[serde(rename = "4th Grade")]
    Fourth,
    #[serde(rename = "5th Grade")]
    Fifth,
    #[serde(rename = "6th Grade")]
    Sixth,
    #[serde(rename = "7th Grade")]
    Seventh,
    #[serde(rename = "8th Grade")]
    Eighth,
}

impl GradeLevel {
    pub const ALL: [GradeLevel; 10] = [
        GradeLevel::PreK,
        GradeLevel::Kindergarten,
        GradeLevel::First,
        GradeLevel::Second,
        GradeLevel::Third,
        GradeLevel::Fourth,
        GradeLevel::Fifth,
        GradeLevel::Sixth,
        GradeLevel::Seventh,
        GradeLevel::Eighth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GradeLevel::PreK => "Pre-K",
            GradeLevel::Kindergarten => "Kindergarten",
            GradeLevel::First => "1st Grade",
            GradeLevel::Second => "2nd Grade",
            GradeLevel::Third => "3rd Grade",
            GradeLevel::Fourth => "4th Grade",
            GradeLevel::Fifth => "5th Grade",
            GradeLevel::Sixth => "6th Grade",
            GradeLevel::Seventh => "7th Grade",
            GradeLevel::Eighth => "8th Grade",
        }
    }

    pub fn parse(s: &str) -> Option<GradeLevel> {
        GradeLevel::ALL
            .iter()
            .copied()
            .find(|g| g.label().eq_ignore_ascii_case(s))
    }

    /// Next grade up the ladder. Saturates at 8th; there is no modeled
    /// "graduated" state.
    pub fn successor(self) -> GradeLevel {
        let idx = GradeLevel::ALL.iter().position(|g| *g == self).unwrap_or(0);
        GradeLevel::ALL[(idx + 1).min(GradeLevel::ALL.len() - 1)]
    }

    /// State tests only apply to 3rd through 8th grade.
    #[allow(dead_code)]
    pub fn is_tcap(self) -> bool {
        self >= GradeLevel::Third
    }
}

/// One academic-year snapshot of a student's scores. Uniqueness per
/// (student, year) is a convention, not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    /// "YYYY-YYYY" start-end token; lexical order is chronological order.
    pub year: String,
    pub grade: GradeLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fall: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spring: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcap_ela: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcap_math: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcap_science: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcap_social_studies: Option<f64>,
    /// Free-text literacy level, e.g. "2.5" or "GE 3.1".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star_reading_level: Option<String>,
}

impl Assessment {
    pub fn empty(year: String, grade: GradeLevel) -> Assessment {
        Assessment {
            id: new_id(),
            year,
            grade,
            fall: None,
            winter: None,
            spring: None,
            tcap_ela: None,
            tcap_math: None,
            tcap_science: None,
            tcap_social_studies: None,
            star_reading_level: None,
        }
    }
}

/// Immutable once created; appended newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    /// Current grade; kept in step with the latest assessment on rollover.
    pub grade: GradeLevel,
    pub teacher: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
    #[serde(default)]
    pub strategies: Vec<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
    pub last_updated: String,
}

impl Student {
    /// The assessment with the lexically greatest year, i.e. the current
    /// one. Derived on read, never stored as a flag.
    pub fn latest_assessment(&self) -> Option<&Assessment> {
        self.assessments.iter().max_by(|a, b| a.year.cmp(&b.year))
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now_stamp() -> String {
    Utc::now().to_rfc3339()
}

/// Starter roster used when both the sync pipe and the local cache come up
/// empty, so a fresh deployment never shows a blank screen.
pub fn seed_students() -> Vec<Student> {
    vec![Student {
        id: new_id(),
        name: "Brownie Bear".to_string(),
        grade: GradeLevel::Second,
        teacher: "Mrs. Higgins".to_string(),
        interests: vec!["Drawing".to_string(), "Soccer".to_string()],
        assessments: vec![
            Assessment {
                fall: Some(90.0),
                winter: Some(92.0),
                star_reading_level: Some("2.5".to_string()),
                ..Assessment::empty("2024-2025".to_string(), GradeLevel::Second)
            },
            Assessment {
                fall: Some(82.0),
                winter: Some(85.0),
                spring: Some(89.0),
                star_reading_level: Some("1.2".to_string()),
                ..Assessment::empty("2023-2024".to_string(), GradeLevel::First)
            },
        ],
        strategies: vec![
            "Visual cues".to_string(),
            "Positive reinforcement".to_string(),
        ],
        notes: Vec::new(),
        last_updated: now_stamp(),
    }]
}
