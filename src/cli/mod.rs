//! CLI commands for quickrank.
//!
//! Lets the ranking engine be driven from scripts or a native-messaging
//! shim: candidates go in as JSON, ranked JSON comes out.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::core::candidate::{parse_candidates, Candidate};
use crate::core::rank::RankingEngine;

#[derive(Parser)]
#[command(name = "quickrank")]
#[command(about = "Rank quick launcher candidates for a query", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: <config dir>/quickrank/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Adaptive store file (overrides the config)
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank a JSON array of candidates
    Rank {
        /// The query typed by the user
        #[arg(long, short)]
        query: String,

        /// Read candidates from a file instead of stdin
        #[arg(long, short, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Fixed current time in epoch milliseconds
        #[arg(long, value_name = "MS")]
        now: Option<f64>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Record which candidate the user picked
    Select {
        /// The query the candidate was picked for
        #[arg(long, short)]
        query: String,

        /// Read the candidate from a file instead of stdin
        #[arg(long, short, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Show adaptive store statistics
    Stats,

    /// Print the effective configuration as TOML
    Config,
}

/// Parse arguments and run the requested command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(),
    };
    if let Some(store) = cli.store {
        config.storage.adaptive_path = Some(store);
    }

    match cli.command {
        Commands::Rank {
            query,
            input,
            now,
            pretty,
        } => {
            let engine = RankingEngine::from_config(&config);
            let candidates = parse_candidates(&read_input(input.as_deref())?)
                .context("Candidates must be a JSON array")?;

            let ranked = match now {
                Some(now) => engine.rank_at(&candidates, &query, now),
                None => engine.rank(&candidates, &query),
            };

            let out = if pretty {
                serde_json::to_string_pretty(&ranked)?
            } else {
                serde_json::to_string(&ranked)?
            };
            println!("{}", out);
        }
        Commands::Select { query, input } => {
            let mut engine = RankingEngine::from_config(&config);
            let candidate: Candidate = serde_json::from_str(&read_input(input.as_deref())?)
                .context("Candidate must be a JSON object")?;

            engine.record_selection(&candidate, &query);
        }
        Commands::Stats => {
            let engine = RankingEngine::from_config(&config);
            let stats = engine.store().stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
