//! CLI command definitions and handlers

mod analyze;
mod compare;
mod info;
mod init;

use crate::ai::NarrativeBackend;
use crate::config::MAX_WORKERS;
use crate::landmarks::{LandmarkSet, EXPECTED_LANDMARKS};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Parse and validate workers count (1-16)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > MAX_WORKERS {
        Err(format!("workers cannot exceed {}", MAX_WORKERS))
    } else {
        Ok(n)
    }
}

/// adamscore - facial aesthetics scoring from face-mesh landmarks
#[derive(Parser, Debug)]
#[command(name = "adamscore")]
#[command(
    version,
    about = "Facial aesthetics scoring from face-mesh landmarks",
    long_about = "adamscore turns the 478 face-mesh landmarks of a front photo (and optionally \
a side profile) into geometric measurements, a 1-10 score, a tier and a written analysis.\n\n\
The written analysis comes from Claude or Gemini when an API key is configured; \
otherwise a deterministic rule-based scorer is used.",
    after_help = "\
Examples:
  adamscore measure front.json                   Print measurements as JSON
  adamscore analyze front.json --side side.json  Full analysis with a side profile
  adamscore analyze front.json --offline         Rule-based scoring only
  adamscore compare front.json --models gemini-2.0-flash,gemini-1.5-pro
  adamscore models                               List the comparison models
  adamscore tiers                                Show the tier table"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: ~/.config/adamscore/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Parallel workers for model comparison (1-16)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute geometric measurements from a landmark file
    Measure {
        /// Front-view landmarks (JSON array of [x, y, z] points)
        front: PathBuf,

        /// Side-profile landmarks
        #[arg(long)]
        side: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Measure, score and describe a face
    #[command(after_help = "\
Examples:
  adamscore analyze front.json                       Uses the configured provider
  adamscore analyze front.json --provider claude     Use Claude for this run
  adamscore analyze front.json --format json -o out.json")]
    Analyze {
        /// Front-view landmarks (JSON array of [x, y, z] points)
        front: PathBuf,

        /// Side-profile landmarks
        #[arg(long)]
        side: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Skip the narrative call and use rule-based scoring
        #[arg(long)]
        offline: bool,

        /// Narrative provider: claude, gemini
        #[arg(long)]
        provider: Option<NarrativeBackend>,

        /// Model override for the provider
        #[arg(long)]
        model: Option<String>,
    },

    /// Run the same measurements past several models
    Compare {
        /// Front-view landmarks (JSON array of [x, y, z] points)
        front: PathBuf,

        /// Side-profile landmarks
        #[arg(long)]
        side: Option<PathBuf>,

        /// Comma-separated model ids (default: configured compare_models)
        #[arg(long, value_delimiter = ',')]
        models: Vec<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show the tier table
    Tiers {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Show the named landmark indices and ideal measurement bands
    Landmarks {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// List the models used by `compare`
    Models {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Create an example user config file
    Init {
        /// Where to write it (default: ~/.config/adamscore/config.toml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Measure {
            front,
            side,
            output,
        } => analyze::measure(&front, side.as_deref(), output.as_deref()),

        Commands::Analyze {
            front,
            side,
            format,
            output,
            offline,
            provider,
            model,
        } => analyze::run(analyze::AnalyzeArgs {
            front: &front,
            side: side.as_deref(),
            format: &format,
            output: output.as_deref(),
            offline,
            provider,
            model: model.as_deref(),
            config: cli.config.as_deref(),
        }),

        Commands::Compare {
            front,
            side,
            models,
            output,
        } => compare::run(
            &front,
            side.as_deref(),
            models,
            output.as_deref(),
            cli.workers,
            cli.config.as_deref(),
        ),

        Commands::Tiers { format } => info::tiers(&format),
        Commands::Landmarks { format } => info::landmarks(&format),
        Commands::Models { format } => info::models(&format, cli.config.as_deref()),
        Commands::Init { path } => init::run(path.as_deref()),
    }
}

/// Read a landmark file, warning when it is not a full mesh
pub(crate) fn load_landmarks(path: &Path) -> Result<LandmarkSet> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read landmarks from {}", path.display()))?;
    let set = LandmarkSet::from_json(&raw)
        .with_context(|| format!("Invalid landmark file {}", path.display()))?;
    if !set.is_complete() {
        warn!(
            "{} has {} landmarks, expected {}; affected measurements use defaults",
            path.display(),
            set.points().len(),
            EXPECTED_LANDMARKS
        );
    }
    Ok(set)
}

/// Print to stdout or write to `output`
pub(crate) fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
