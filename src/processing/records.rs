//! Report record shapes

use serde::Serialize;
use serde_json::{Map, Value};

/// One resume's extracted profile. Field order is the wire order of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRecord {
    #[serde(rename = "resource-name")]
    pub name: String,
    #[serde(rename = "resource-job-title")]
    pub job_title: String,
    #[serde(rename = "experties")]
    pub skills: Vec<String>,
    #[serde(rename = "resource-file")]
    pub source_file: String,
}

/// One job profile's ranked candidate matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobMatchRecord {
    pub job_file: String,
    pub job_title: String,
    pub matches: Vec<MatchEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchEntry {
    pub candidate_name: String,
    /// Always within 0..=100
    pub percent: u8,
}

/// First key holding a non-empty string.
pub(crate) fn first_string<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
}

impl JobMatchRecord {
    /// Read a job-match object leniently; missing pieces become empty.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let matches = fields
            .get("matches")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_object)
                    .map(MatchEntry::from_fields)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            job_file: first_string(fields, &["job_file", "job-file"])
                .unwrap_or_default()
                .to_string(),
            job_title: first_string(fields, &["job-title"])
                .unwrap_or_default()
                .to_string(),
            matches,
        }
    }

    /// Heading shown for the job: its title, else its file, else "Job".
    pub fn heading(&self) -> &str {
        if !self.job_title.is_empty() {
            &self.job_title
        } else if !self.job_file.is_empty() {
            &self.job_file
        } else {
            "Job"
        }
    }
}

impl MatchEntry {
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            candidate_name: first_string(
                fields,
                &["resource-name", "resource_file", "resource-file"],
            )
            .unwrap_or("Unknown")
            .to_string(),
            percent: fields.get("percent").map(parse_percent).unwrap_or(0),
        }
    }
}

/// Integers, floats (truncated) and integer strings, clamped to 0..=100; anything else is 0.
pub fn parse_percent(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .map(|f| f.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
            }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    raw.map(|p| p.clamp(0, 100) as u8).unwrap_or(0)
}

/// True when the payload is a non-empty array led by a job-match object.
pub fn is_job_match_payload(value: &Value) -> bool {
    value
        .as_array()
        .and_then(|items| items.first())
        .and_then(Value::as_object)
        .map(|first| {
            (first.contains_key("job-file") || first.contains_key("job_file"))
                && first.contains_key("matches")
        })
        .unwrap_or(false)
}
