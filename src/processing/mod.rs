//! Agent result processing
//! Coerces whatever the crew returned into JSON and normalizes it into report records

pub mod agent_result;
pub mod coercer;
pub mod normalizer;
pub mod records;

pub use agent_result::{AgentResult, CrewOutput, ResultAccessor};
pub use coercer::{coerce, extract_json_text, EMPTY_ARRAY};
pub use normalizer::normalize;
pub use records::{CandidateRecord, JobMatchRecord, MatchEntry};
