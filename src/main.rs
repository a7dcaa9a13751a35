//! rm-agent-helper: resume and job-profile reports from an external agent crew

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use rm_agent_helper::cli::{Cli, Commands, ConfigAction, DocumentKind};
use rm_agent_helper::engine::{build_engine, dated_inputs};
use rm_agent_helper::input::document::{documents_to_json, load_documents, DocumentType};
use rm_agent_helper::output::report::{CandidateAction, ReportOutcome};
use rm_agent_helper::output::{render_report_file, CandidateReportRenderer, JobMatchReportRenderer};
use rm_agent_helper::{server, Config, Pipeline, Result};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, cli.config, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(
    command: Commands,
    config_path: Option<PathBuf>,
    config: Config,
) -> Result<()> {
    match command {
        Commands::Run => {
            let engine = build_engine(&config.engine)?;
            let pipeline = Pipeline::from_config(&config, engine);

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner:.yellow} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("Waiting for the agent crew...");
            spinner.enable_steady_tick(Duration::from_millis(120));

            let outcome = pipeline.generate().await;
            spinner.finish_and_clear();

            print_outcome(&pipeline, &outcome);
        }

        Commands::Serve { port } => {
            let engine = build_engine(&config.engine)?;
            let pipeline = Pipeline::from_config(&config, engine);
            let port = port.unwrap_or(config.server.port);
            server::serve(pipeline, &config.server.host, port).await?;
        }

        Commands::Train { iterations, filename } => {
            let engine = build_engine(&config.engine)?;
            engine.train(iterations, &filename, &dated_inputs()).await?;
        }

        Commands::Replay { task_id } => {
            let engine = build_engine(&config.engine)?;
            engine.replay(&task_id).await?;
        }

        Commands::Test { iterations, eval_llm } => {
            let engine = build_engine(&config.engine)?;
            engine.test(iterations, &eval_llm, &dated_inputs()).await?;
        }

        Commands::Documents { kind } => {
            let (dir, document_type) = match kind {
                DocumentKind::Resumes => (&config.paths.resume_dir, DocumentType::Resume),
                DocumentKind::Jobs => (&config.paths.job_dir, DocumentType::JobProfile),
            };
            let documents = load_documents(dir, document_type).await;
            println!("{}", documents_to_json(&documents)?);
        }

        Commands::Render => {
            let paths = config.report_paths();
            render_report_file(
                &CandidateReportRenderer,
                &paths.candidate_json,
                &paths.candidate_html,
            )?;
            println!("{} {}", "Rendered".green().bold(), paths.candidate_html.display());

            if paths.job_match_json.exists() {
                render_report_file(
                    &JobMatchReportRenderer,
                    &paths.job_match_json,
                    &paths.job_match_html,
                )?;
                println!("{} {}", "Rendered".green().bold(), paths.job_match_html.display());
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => {
                    println!("{}", format!("# {}", path.display()).dimmed());
                    println!("{}", config.to_toml()?);
                }
                ConfigAction::Reset => {
                    Config::default().save_to(&path)?;
                    info!("Configuration reset to defaults at {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn print_outcome(pipeline: &Pipeline, outcome: &ReportOutcome) {
    let paths = pipeline.paths();
    match &outcome.candidate {
        CandidateAction::Written { records } => println!(
            "{} {} candidate(s) to {}",
            "Saved".green().bold(),
            records,
            paths.candidate_json.display()
        ),
        CandidateAction::Preserved => println!(
            "{} agent returned nothing, kept {}",
            "Unchanged".yellow().bold(),
            paths.candidate_json.display()
        ),
        CandidateAction::Skipped => {}
        CandidateAction::Failed(reason) => println!(
            "{} could not write {}: {}",
            "Failed".red().bold(),
            paths.candidate_json.display(),
            reason
        ),
    }

    if outcome.job_match_written {
        println!(
            "{} job matches to {}",
            "Saved".green().bold(),
            paths.job_match_json.display()
        );
    }

    for html in &outcome.rendered {
        println!("{} {}", "Rendered".green().bold(), html.display());
    }
}
