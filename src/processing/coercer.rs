//! Coercing agent results into JSON text
//!
//! Agents answer in whatever shape their SDK produces: bare text with the
//! payload buried in prose or a fenced block, already-decoded lists and maps,
//! or result objects that hide the payload behind one of several accessors.
//! Everything funnels into compact JSON text; when nothing usable is found the
//! caller gets the empty array.

use crate::error::{AgentHelperError, Result};
use crate::processing::agent_result::{AgentResult, ResultAccessor, ACCESSOR_NAMES};
use log::debug;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub const EMPTY_ARRAY: &str = "[]";

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?i)```(?:json)?\s*([\s\S]*?)\s*```").expect("fence pattern is valid")
    })
}

/// Parse and re-serialize, so only the parsed structure survives.
fn reserialize(candidate: &str) -> Option<String> {
    serde_json::from_str::<Value>(candidate)
        .ok()
        .map(|value| value.to_string())
}

/// Slice from the first `open` to the last `close`, inclusive.
fn bracketed<'a>(text: &'a str, open: char, close: char) -> Option<&'a str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Pull a JSON payload out of free text.
///
/// Tried in order: the first fenced code block, the whole trimmed text, the
/// widest `[...]` slice, the widest `{...}` slice.
pub fn extract_json(raw_text: &str) -> Result<String> {
    let candidate = raw_text.trim();

    if let Some(captures) = fence_pattern().captures(candidate) {
        if let Some(dumped) = captures.get(1).and_then(|body| reserialize(body.as_str().trim())) {
            return Ok(dumped);
        }
    }

    if let Some(dumped) = reserialize(candidate) {
        return Ok(dumped);
    }

    [('[', ']'), ('{', '}')]
        .into_iter()
        .filter_map(|(open, close)| bracketed(candidate, open, close))
        .find_map(reserialize)
        .ok_or(AgentHelperError::NoJsonFound)
}

/// [`extract_json`] with the empty-array fallback applied.
pub fn extract_json_text(raw_text: &str) -> String {
    extract_json(raw_text).unwrap_or_else(|_| EMPTY_ARRAY.to_string())
}

pub fn try_coerce(result: &AgentResult) -> Result<String> {
    match result {
        AgentResult::List(items) => Ok(serde_json::to_string(items)?),
        AgentResult::Map(fields) => Ok(serde_json::to_string(fields)?),
        AgentResult::Text(text) => extract_json(text),
        AgentResult::Accessor(accessor) => coerce_accessor(accessor.as_ref()),
    }
}

fn coerce_accessor(accessor: &dyn ResultAccessor) -> Result<String> {
    for name in ACCESSOR_NAMES {
        match accessor.attribute(name) {
            None => continue,
            Some(Err(e)) => {
                debug!("Accessor `{}` failed, trying the next one: {}", name, e);
                continue;
            }
            Some(Ok(value)) => {
                debug!("Coercing {} payload from accessor `{}`", value.kind(), name);
                return try_coerce(&value);
            }
        }
    }

    match accessor.to_json() {
        Some(Ok(text)) => return extract_json(&text),
        Some(Err(e)) => debug!("to_json conversion failed: {}", e),
        None => {}
    }

    let text = accessor.to_string();
    let trimmed = text.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        extract_json(trimmed)
    } else {
        Err(AgentHelperError::NoJsonFound)
    }
}

/// Coerce any agent result into JSON text. Never fails; yields `"[]"` when
/// no payload can be recovered.
pub fn coerce(result: &AgentResult) -> String {
    match try_coerce(result) {
        Ok(text) => text,
        Err(e) => {
            debug!("Coercion of {} result fell back to empty array: {}", result.kind(), e);
            EMPTY_ARRAY.to_string()
        }
    }
}
