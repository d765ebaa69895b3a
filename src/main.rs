mod enrich;
mod error;
mod fetch;
mod parser;
mod record;
mod session;
mod settings;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing::info;

use crate::error::PipelineError;
use crate::settings::{Overrides, Settings};

#[derive(Parser)]
#[command(name = "quest_enricher", about = "Enrich a gameplay session log with quest page metadata")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the session log, fetch every quest page and print the enriched log
    Run {
        #[command(flatten)]
        overrides: Overrides,
        /// Write the enriched JSONL here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the distinct quest ids found in the session log
    Ids {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Fetch and parse a single quest page
    Fetch {
        /// Quest id appended to the base URL
        id: String,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Parse saved quest pages, one JSON line per file
    Parse {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { overrides, output } => {
            let settings = load_settings(overrides)?;
            let content = session::read_session(&settings)?;
            let events = session::parse_events(&content);
            let ids = enrich::collect_quest_ids(&events);
            info!("{} events, {} distinct quests", events.len(), ids.len());

            let client = reqwest::Client::new();
            let quests = fetch::fetch_quests(&client, &settings, &ids).await?;
            let enriched = enrich::attach_quest_context(events, &quests)?;
            let jsonl = session::to_jsonl(&enriched)?;
            write_output(output.as_deref(), &jsonl)?;
        }
        Commands::Ids { overrides } => {
            let settings = load_settings(overrides)?;
            let content = session::read_session(&settings)?;
            let events = session::parse_events(&content);
            for id in enrich::collect_quest_ids(&events) {
                println!("{}", id);
            }
        }
        Commands::Fetch { id, overrides } => {
            let settings = load_settings(overrides)?;
            let client = reqwest::Client::new();
            let quest = fetch::fetch_quest(&client, &settings, &id).await?;
            println!("{}", serde_json::to_string_pretty(&quest)?);
        }
        Commands::Parse { files } => {
            // Read failures are fatal; parse misses are not.
            let results: Vec<_> = files
                .par_iter()
                .map(|path| {
                    std::fs::read(path)
                        .map(|body| parser::parse_quest_bytes(&body))
                        .map_err(|source| PipelineError::ReadPage {
                            path: path.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let mut out = String::new();
            for quest in &results {
                out.push_str(&serde_json::to_string(quest)?);
                out.push('\n');
            }
            write_output(None, &out)?;
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("Done in {}", format_duration(elapsed));
    }
    Ok(())
}

fn load_settings(overrides: Overrides) -> anyhow::Result<Settings> {
    let settings = Settings::from_env()
        .context("loading settings from environment")?
        .with_overrides(overrides)
        .validate()?;
    Ok(settings)
}

/// Output is written in one go, only after every stage has succeeded.
fn write_output(path: Option<&Path>, contents: &str) -> Result<(), PipelineError> {
    match path {
        Some(path) => {
            std::fs::write(path, contents)?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Runs are short, so minutes are the largest unit.
fn format_duration(d: std::time::Duration) -> String {
    match d.as_secs() {
        s if s < 60 => format!("{:.1}s", d.as_secs_f64()),
        s => format!("{}m {:02}s", s / 60, s % 60),
    }
}
