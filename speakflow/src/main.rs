//! speakflow - presentation practice analysis from the command line
//!
//! Normalizes analysis results, browses stored presentations and shows skill
//! progress, and talks to the analysis backend.

mod output;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{json, Value};
use speakflow_core::{normalize, AnalysisClient, Config, DocumentStore, UserStats};

#[derive(Parser)]
#[command(name = "speakflow")]
#[command(about = "Presentation practice analysis")]
#[command(version)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Config file (default: ~/.config/speakflow/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Document store root (overrides `store.root`)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Echo debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize a raw analysis payload and print the canonical result
    Normalize {
        /// JSON file to read ("-" or omitted for stdin)
        input: Option<PathBuf>,
    },

    /// Show one stored presentation
    Show {
        /// User id
        #[arg(short, long)]
        user: String,

        /// Project id (searches all projects if omitted or not found)
        #[arg(short, long)]
        project: Option<String>,

        /// Presentation id
        presentation: String,
    },

    /// List recent presentations, newest first
    History {
        #[arg(short, long)]
        user: String,

        /// Maximum number of presentations (default: progress.history_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show dashboard statistics and skill progress
    Progress {
        #[arg(short, long)]
        user: String,

        /// Number of recent presentations for skill progress
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Upload a recording for analysis and store the result
    Analyze {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        project: String,

        /// Presentation id to store under (default: a new UUID)
        #[arg(long)]
        id: Option<String>,

        /// Recording file (webm)
        recording: PathBuf,
    },

    /// Fetch a presentation summary from the backend
    Summary {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        project: Option<String>,

        /// Presentation id
        presentation: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    // Logs go to the log file and stderr; stdout is for results
    let _log_guard = speakflow_core::logging::init(&config.logging, cli.verbose)
        .context("failed to initialize logging")?;

    let store = match &cli.store {
        Some(root) => DocumentStore::new(root),
        None => DocumentStore::open(&config.store),
    };
    tracing::debug!(store = %store.root().display(), "Using document store");

    match cli.command {
        Command::Normalize { input } => {
            let raw = read_input(input.as_deref())?;
            let result = normalize(&raw);
            match cli.format {
                OutputFormat::Json => output::print_json(&result.to_value())?,
                OutputFormat::Text => output::print_result(&result),
            }
        }

        Command::Show {
            user,
            project,
            presentation,
        } => {
            let (project_id, raw) = store
                .require_presentation(&user, project.as_deref(), &presentation)
                .with_context(|| format!("failed to load presentation '{}'", presentation))?;
            let result = normalize(&raw);
            match cli.format {
                OutputFormat::Json => output::print_json(&result.to_value())?,
                OutputFormat::Text => {
                    println!("Presentation: {} (project {})", presentation, project_id);
                    output::print_result(&result);
                }
            }
        }

        Command::History { user, limit } => {
            let limit = limit.unwrap_or(config.progress.history_limit);
            let history = store
                .list_presentations(&user, limit)
                .context("failed to list presentations")?;
            match cli.format {
                OutputFormat::Json => output::print_json(&serde_json::to_value(&history)?)?,
                OutputFormat::Text => output::print_history(&history),
            }
        }

        Command::Progress { user, window } => {
            let window = window.unwrap_or(config.progress.window);
            if window == 0 {
                anyhow::bail!("--window must be greater than 0");
            }
            let history = store
                .list_presentations(&user, config.progress.history_limit)
                .context("failed to list presentations")?;
            let stats = UserStats::from_history(&history, window);
            match cli.format {
                OutputFormat::Json => output::print_json(&serde_json::to_value(&stats)?)?,
                OutputFormat::Text => output::print_stats(&stats, window),
            }
        }

        Command::Analyze {
            user,
            project,
            id,
            recording,
        } => {
            let client = AnalysisClient::new(&config.api).context("invalid api configuration")?;
            let presentation_id = id.unwrap_or_else(DocumentStore::new_presentation_id);

            let spinner = spinner(&format!("Analyzing {}...", recording.display()))?;
            let analyzed = client.analyze_video(&user, &project, &recording).await;
            spinner.finish_and_clear();
            let raw = analyzed.context("analysis request failed")?;

            let path = store
                .save_presentation(&user, &project, &presentation_id, &raw)
                .context("failed to save analysis result")?;
            tracing::info!(presentation_id = %presentation_id, "Analysis stored");

            let result = normalize(&raw);
            match cli.format {
                OutputFormat::Json => output::print_json(&json!({
                    "presentation_id": presentation_id,
                    "project_id": project,
                    "result": result.to_value(),
                }))?,
                OutputFormat::Text => {
                    println!("Saved as {} ({})", presentation_id, path.display());
                    output::print_result(&result);
                }
            }
        }

        Command::Summary {
            user,
            project,
            presentation,
        } => {
            let client = AnalysisClient::new(&config.api).context("invalid api configuration")?;
            let raw = client
                .fetch_summary(&user, project.as_deref(), &presentation)
                .await
                .context("summary request failed")?;
            let result = normalize(&raw);
            match cli.format {
                OutputFormat::Json => output::print_json(&result.to_value())?,
                OutputFormat::Text => output::print_result(&result),
            }
        }
    }

    Ok(())
}

/// Read a JSON payload from a file or stdin. Blank input is `null`.
fn read_input(input: Option<&Path>) -> Result<Value> {
    let content = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&content).context("input is not valid JSON")
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {elapsed} {msg}")
            .context("invalid progress template")?,
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}
