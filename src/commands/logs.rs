//! Logs query command
//!
//! Reads the prediction log database directly, the server does not need to
//! be running.

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use language_detector::config::Config;
use language_detector::storage::{PredictionLogEntry, PredictionLogStore, SqlitePredictionLog};

/// Show recent prediction log entries
#[derive(Debug, Clone, Parser)]
pub struct LogsArgs {
    /// Maximum number of results
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    pub format: String,

    /// Include the stored request and response payloads
    #[arg(long)]
    pub payloads: bool,
}

/// Execute the logs command
pub async fn execute(cfg: &Config, args: LogsArgs) -> Result<()> {
    if !std::path::Path::new(&cfg.database.path).exists() {
        eprintln!(
            "{} {}",
            "No prediction database at".red(),
            cfg.database.path
        );
        return Ok(());
    }

    let store = SqlitePredictionLog::open(&cfg.database.path, 1)
        .await
        .context("Failed to open prediction log database")?;

    let entries = store.recent(args.limit).await?;
    let total = store.count().await?;
    store.close().await;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&entries)?),
        "text" => print_text(&entries, total, args.payloads),
        other => bail!("Unknown output format '{}', expected 'text' or 'json'", other),
    }

    Ok(())
}

fn print_text(entries: &[PredictionLogEntry], total: u64, payloads: bool) {
    if entries.is_empty() {
        println!("{}", "No predictions logged yet".yellow());
        return;
    }

    println!(
        "{}",
        format!("Showing {} of {} predictions (newest first)", entries.len(), total).bold()
    );
    println!();

    for entry in entries {
        println!(
            "{:>6}  {}  {:<12} {}",
            entry.id.to_string().dimmed(),
            entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            entry.language.cyan(),
            entry.confidence.green()
        );
        if payloads {
            println!("        request:  {}", entry.request_payload);
            println!("        response: {}", entry.response_payload);
        }
    }
}
