//! Command-line interface for seqstatus.
//!
//! Reads sequence events from a file or stdin, derives badge and
//! classification state, and prints it as JSON on stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::config::{self, ResolvedConfig};
use crate::core::{
    classify, parse_events, BadgeState, BadgeStateBuilder, Classification, EvaluationResult,
    FillState,
};
use crate::domain::{EventResult, Trace};

/// seqstatus - Status derivation for delivery sequence event trees
#[derive(Parser, Debug)]
#[command(name = "seqstatus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Badge state for the evaluation in each sequence tree
    Badge {
        /// Events JSON (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Fill variant (defaults to configuration)
        #[arg(short, long, value_enum)]
        fill: Option<FillArg>,

        /// Decimal places kept in the score
        #[arg(short, long)]
        decimals: Option<u32>,
    },

    /// Badge state for an already summarised evaluation
    Evaluation {
        /// Evaluation result
        #[arg(short, long, value_enum)]
        result: ResultArg,

        /// Evaluation score
        #[arg(short, long)]
        score: Option<f64>,

        /// Fill variant (defaults to configuration)
        #[arg(short, long, value_enum)]
        fill: Option<FillArg>,

        /// Decimal places kept in the score
        #[arg(short, long)]
        decimals: Option<u32>,
    },

    /// All classifier flags for each sequence tree
    Inspect {
        /// Events JSON (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Only report outcomes for trees in this stage
        #[arg(short, long)]
        stage: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Fill variant for CLI (maps to FillState)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FillArg {
    Fill,
    Border,
    None,
}

impl From<FillArg> for FillState {
    fn from(f: FillArg) -> Self {
        match f {
            FillArg::Fill => FillState::Fill,
            FillArg::Border => FillState::Border,
            FillArg::None => FillState::None,
        }
    }
}

/// Evaluation result for CLI (maps to EventResult)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResultArg {
    Pass,
    Warning,
    Fail,
}

impl From<ResultArg> for EventResult {
    fn from(r: ResultArg) -> Self {
        match r {
            ResultArg::Pass => EventResult::Pass,
            ResultArg::Warning => EventResult::Warning,
            ResultArg::Fail => EventResult::Fail,
        }
    }
}

/// Badge for one root trace
#[derive(Debug, Clone, Serialize)]
pub struct BadgeReport {
    pub id: String,
    pub label: String,
    pub stage: Option<String>,
    pub badge: BadgeState,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let cfg = config::config()?;

        match self.command {
            Commands::Badge {
                input,
                fill,
                decimals,
            } => {
                let trees = load_traces(input).await?;
                let builder = builder_for(cfg, decimals);
                let fill_state = fill.map(FillState::from).unwrap_or(cfg.fill_state);
                print_json(&badge_reports(&trees, &builder, fill_state))
            }
            Commands::Evaluation {
                result,
                score,
                fill,
                decimals,
            } => {
                let summary = EvaluationResult {
                    result: result.into(),
                    score,
                };
                let fill_state = fill.map(FillState::from).unwrap_or(cfg.fill_state);
                let badge = builder_for(cfg, decimals).from_evaluation_result(Some(&summary), fill_state);
                print_json(&badge)
            }
            Commands::Inspect { input, stage } => {
                let trees = load_traces(input).await?;
                let stage = stage.or_else(|| cfg.stage.clone());
                print_json(&inspect_reports(&trees, stage.as_deref()))
            }
            Commands::Config => show_config(cfg),
        }
    }
}

/// Badge state for each root trace
pub fn badge_reports(
    trees: &[Trace],
    builder: &BadgeStateBuilder,
    fill_state: FillState,
) -> Vec<BadgeReport> {
    trees
        .iter()
        .map(|trace| BadgeReport {
            id: trace.id.clone(),
            label: trace.label().to_string(),
            stage: trace.stage().map(str::to_string),
            badge: builder.from_evaluation_node(trace, fill_state),
        })
        .collect()
}

/// Classification of each root trace
pub fn inspect_reports(trees: &[Trace], stage: Option<&str>) -> Vec<Classification> {
    trees.iter().map(|trace| classify(trace, stage)).collect()
}

fn builder_for(cfg: &ResolvedConfig, decimals: Option<u32>) -> BadgeStateBuilder {
    match decimals {
        Some(decimals) => BadgeStateBuilder::new().with_decimals(decimals),
        None => cfg.badge_builder(),
    }
}

/// Read events from a file, or stdin when no file is given
pub async fn load_traces(input: Option<PathBuf>) -> Result<Vec<Trace>> {
    let content = match input {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read input file: {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read from stdin")?;
            buffer
        }
    };

    if content.trim().is_empty() {
        anyhow::bail!("Input is empty");
    }

    let trees = parse_events(&content).context("Failed to load sequence events")?;
    debug!(trees = trees.len(), "loaded sequence events");
    Ok(trees)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn show_config(cfg: &ResolvedConfig) -> Result<()> {
    println!("seqstatus configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Badge:");
    println!("  Score decimals: {}", cfg.score_decimals);
    println!("  Fill state:     {:?}", cfg.fill_state);
    println!();
    println!("Classification:");
    println!("  Stage filter:   {}", cfg.stage.as_deref().unwrap_or("(none)"));

    Ok(())
}
