//! Results handed back by the agent engine

use crate::error::Result;
use serde_json::{Map, Value};
use std::fmt;

/// Accessor names probed on CrewOutput-style results, in priority order.
pub const ACCESSOR_NAMES: [&str; 5] = ["raw", "raw_output", "output", "final_output", "json"];

/// Whatever the engine returned for a kickoff.
#[derive(Debug)]
pub enum AgentResult {
    Text(String),
    List(Vec<Value>),
    Map(Map<String, Value>),
    Accessor(Box<dyn ResultAccessor>),
}

/// Adapter over an SDK result object that exposes its payload through named accessors.
///
/// `Display` is the last-resort stringification used when no accessor yields anything.
pub trait ResultAccessor: fmt::Debug + fmt::Display + Send + Sync {
    /// `None` when the accessor is absent; `Some(Err(_))` when reading or invoking it failed.
    fn attribute(&self, name: &str) -> Option<Result<AgentResult>>;

    /// Whole-object JSON conversion, when the SDK offers one.
    fn to_json(&self) -> Option<Result<String>> {
        None
    }
}

impl AgentResult {
    /// Classify a decoded JSON payload. Objects carrying any accessor key are
    /// treated as CrewOutput-style results rather than plain maps.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => AgentResult::Text(text),
            Value::Array(items) => AgentResult::List(items),
            Value::Object(fields) => {
                if ACCESSOR_NAMES.iter().any(|name| fields.contains_key(*name)) {
                    AgentResult::Accessor(Box::new(CrewOutput::new(fields)))
                } else {
                    AgentResult::Map(fields)
                }
            }
            scalar => AgentResult::Text(scalar.to_string()),
        }
    }

    /// Decode raw engine output: JSON when it parses, free text otherwise.
    pub fn from_engine_output(output: &str) -> Self {
        match serde_json::from_str::<Value>(output.trim()) {
            Ok(value) => Self::from_value(value),
            Err(_) => AgentResult::Text(output.to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AgentResult::Text(_) => "text",
            AgentResult::List(_) => "list",
            AgentResult::Map(_) => "map",
            AgentResult::Accessor(_) => "accessor",
        }
    }
}

/// CrewOutput as it arrives over the wire: a JSON object whose fields are the accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct CrewOutput {
    fields: Map<String, Value>,
}

impl CrewOutput {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl ResultAccessor for CrewOutput {
    fn attribute(&self, name: &str) -> Option<Result<AgentResult>> {
        match self.fields.get(name)? {
            Value::String(text) => Some(Ok(AgentResult::Text(text.clone()))),
            Value::Array(items) => Some(Ok(AgentResult::List(items.clone()))),
            Value::Object(fields) => Some(Ok(AgentResult::Map(fields.clone()))),
            // null and scalars carry no payload
            _ => None,
        }
    }

    /// The structured `json_dict` payload; the envelope itself is never a payload.
    fn to_json(&self) -> Option<Result<String>> {
        match self.fields.get("json_dict")? {
            payload @ (Value::Array(_) | Value::Object(_)) => {
                Some(serde_json::to_string(payload).map_err(Into::into))
            }
            _ => None,
        }
    }
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fields.get("raw") {
            Some(Value::String(raw)) => f.write_str(raw),
            _ => Ok(()),
        }
    }
}
