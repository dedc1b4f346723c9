//! Instructional-strategy suggestions from a generative-language endpoint.
//!
//! One REST call per request, schema-constrained to a JSON object holding a
//! string array. A response the model garbles falls back to stock
//! strategies; only transport problems surface as errors.

use std::time::Duration;

use anyhow::{anyhow, Context};
use serde_json::json;
use tracing::warn;

use crate::model::Student;

const MODEL: &str = "gemini-3-flash-preview";

/// Returned when the model answers but the payload does not parse.
const FALLBACK_STRATEGIES: [&str; 2] = [
    "Incorporate personal interests into math problems",
    "Allow for choice-based projects",
];

fn endpoint() -> String {
    std::env::var("ROSTERD_SUGGEST_ENDPOINT").unwrap_or_else(|_| {
        format!("https://generativelanguage.googleapis.com/v1beta/models/{MODEL}:generateContent")
    })
}

pub fn build_prompt(student: &Student) -> String {
    let scores = serde_json::to_string(&student.assessments).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Suggest 3-5 specific, engaging classroom strategies for a student with the following profile:\n\
         Name: {}\n\
         Grade: {}\n\
         Interests: {}\n\
         Recent Test Scores: {}\n\n\
         The strategies should leverage their interests and help improve any weak areas while keeping them engaged.",
        student.name,
        student.grade.label(),
        student.interests.join(", "),
        scores
    )
}

/// Pull the strategy list out of a generateContent response. Any shape
/// surprise yields the stock fallback rather than an error.
pub fn parse_response(body: &serde_json::Value) -> Vec<String> {
    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(|v| v.as_str())
        .unwrap_or("{}");
    let parsed: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "model response was not valid JSON");
            return FALLBACK_STRATEGIES.iter().map(|s| s.to_string()).collect();
        }
    };
    // Valid JSON without a strategies array is an empty answer, not a
    // failure; the stock fallback is only for unparsable text.
    parsed
        .get("strategies")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

pub fn generate(api_key: &str, student: &Student) -> anyhow::Result<Vec<String>> {
    if api_key.is_empty() {
        return Err(anyhow!("no API key configured"));
    }

    let payload = json!({
        "contents": [{ "parts": [{ "text": build_prompt(student) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "strategies": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["strategies"]
            },
            "thinkingConfig": { "thinkingBudget": 0 }
        }
    });

    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(30))
        .build();
    let resp = agent
        .post(&endpoint())
        .set("x-goog-api-key", api_key)
        .set("Content-Type", "application/json")
        .send_json(payload)
        .context("strategy generation request failed")?;
    let body: serde_json::Value = resp
        .into_json()
        .context("strategy generation response was not JSON")?;
    Ok(parse_response(&body))
}
