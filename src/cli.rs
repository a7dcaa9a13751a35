//! CLI interface for the agent helper

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rm-agent-helper")]
#[command(about = "Resume and job-profile reports driven by an external agent crew")]
#[command(long_about = "Kick off the agent crew, coerce its answer into JSON, and render candidate and job-match reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full report pipeline once
    Run,

    /// Serve the kickoff and health endpoints
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Forward a training run to the agent engine
    Train {
        /// Number of training iterations
        iterations: u32,

        /// File the engine stores training data in
        filename: String,
    },

    /// Replay the crew from a given task
    Replay {
        task_id: String,
    },

    /// Forward an evaluation run to the agent engine
    Test {
        /// Number of evaluation iterations
        iterations: u32,

        /// LLM used by the engine to grade the runs
        eval_llm: String,
    },

    /// Print the documents the analyzer tool would hand to the agent
    Documents {
        #[arg(value_enum)]
        kind: DocumentKind,
    },

    /// Re-render the HTML reports from the JSON already on disk
    Render,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DocumentKind {
    Resumes,
    Jobs,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}
