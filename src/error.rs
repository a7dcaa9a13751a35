//! Error handling for the agent helper

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentHelperError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Agent engine error: {0}")]
    Engine(String),

    #[error("Agent engine timed out after {0}s")]
    EngineTimeout(u64),

    #[error("No JSON payload found in agent result")]
    NoJsonFound,

    #[error("Expected a JSON array, found {0}")]
    NotAnArray(&'static str),

    #[error("Rendering error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, AgentHelperError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for AgentHelperError {
    fn from(err: anyhow::Error) -> Self {
        AgentHelperError::Engine(err.to_string())
    }
}

impl From<askama::Error> for AgentHelperError {
    fn from(err: askama::Error) -> Self {
        AgentHelperError::Render(err.to_string())
    }
}

impl From<reqwest::Error> for AgentHelperError {
    fn from(err: reqwest::Error) -> Self {
        AgentHelperError::Engine(err.to_string())
    }
}
