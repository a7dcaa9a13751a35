//! Configuration management for the agent helper

use crate::error::{AgentHelperError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub engine: EngineConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Flat directory of resume-like documents
    pub resume_dir: PathBuf,
    /// Flat directory of job-profile documents
    pub job_dir: PathBuf,
    /// Where JSON and HTML reports are written
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub kind: EngineKind,
    /// Program launched by the command engine
    pub program: String,
    pub args: Vec<String>,
    /// Base URL used by the HTTP engine
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Command,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                resume_dir: PathBuf::from("knowledge").join("resource-resume"),
                job_dir: PathBuf::from("knowledge").join("job-profiles"),
                output_dir: PathBuf::from("output"),
            },
            engine: EngineConfig {
                kind: EngineKind::Command,
                program: "crewai".to_string(),
                args: vec!["run".to_string()],
                endpoint: "http://127.0.0.1:8100/crew".to_string(),
                timeout_secs: 600,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
        }
    }
}

/// File names of the four artifacts a report generation can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub candidate_json: PathBuf,
    pub candidate_html: PathBuf,
    pub job_match_json: PathBuf,
    pub job_match_html: PathBuf,
}

impl ReportPaths {
    pub fn in_dir(output_dir: &Path) -> Self {
        Self {
            candidate_json: output_dir.join("resource_report.json"),
            candidate_html: output_dir.join("resource_report.html"),
            job_match_json: output_dir.join("job_match_report.json"),
            job_match_html: output_dir.join("job_match_report.html"),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location (created on first use).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AgentHelperError::Configuration(format!(
                        "Config file does not exist: {}",
                        path.display()
                    )));
                }
                Self::load_from(path)
            }
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::load_from(&config_path)
                } else {
                    let config = Self::default();
                    config.save_to(&config_path)?;
                    Ok(config)
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| AgentHelperError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            AgentHelperError::Configuration(format!("Failed to serialize config: {}", e))
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("rm-agent-helper")
            .join("config.toml")
    }

    pub fn report_paths(&self) -> ReportPaths {
        ReportPaths::in_dir(&self.paths.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.engine.kind, EngineKind::Command);
        assert_eq!(parsed.server.port, 8000);
        assert_eq!(parsed.paths.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_engine_kind_is_lowercase_in_toml() {
        let mut config = Config::default();
        config.engine.kind = EngineKind::Http;
        let text = config.to_toml().unwrap();
        assert!(text.contains("kind = \"http\""));
    }

    #[test]
    fn test_report_paths_live_in_output_dir() {
        let paths = ReportPaths::in_dir(Path::new("out"));
        assert_eq!(paths.candidate_json, PathBuf::from("out/resource_report.json"));
        assert_eq!(paths.job_match_html, PathBuf::from("out/job_match_report.html"));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let result = Config::load(Some(Path::new("definitely/not/here.toml")));
        assert!(matches!(result, Err(AgentHelperError::Configuration(_))));
    }
}
