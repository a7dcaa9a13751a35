//! Agent helper library: coerces crew output into candidate and job-match reports

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod server;

pub use config::Config;
pub use error::{AgentHelperError, Result};
pub use pipeline::Pipeline;
