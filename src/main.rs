//! sbom-scorecard: quality scorecard for SBOMs
//!
//! Scores `CycloneDX` and SPDX documents on package identification,
//! versions, licenses, digests, and provenance.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sbom_scorecard::{
    cli,
    config::{OutputFormat, SbomType, ScorecardConfig},
    pipeline::{self, exit_codes},
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported SBOM Formats:",
        "\n  CycloneDX: 1.4, 1.5, 1.6 (JSON, XML)",
        "\n  SPDX:      2.2, 2.3 (JSON, tag-value, RDF/XML)",
        "\n\nOutput Formats:",
        "\n  text, json"
    )
}

#[derive(Parser)]
#[command(name = "sbom-scorecard")]
#[command(author = "Binarly.io")]
#[command(version, long_version = build_long_version())]
#[command(about = "Quality scorecard for SPDX and CycloneDX SBOMs", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Score below --min-score
    3  Error occurred

EXAMPLES:
    # Score an SBOM, auto-detecting its format
    sbom-scorecard score sbom.spdx.json

    # Fail a CI job when the grade drops below 70
    sbom-scorecard score bom.cdx.xml --sbom-type cdx --min-score 70

    # Compare two SBOMs of the same product
    sbom-scorecard compare syft.spdx.json trivy.cdx.json -o json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "SBOM_SCORECARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by `score` and `compare`
#[derive(clap::Args)]
struct ScoringArgs {
    /// Restrict decoding to one SBOM family
    #[arg(long)]
    sbom_type: Option<SbomType>,

    /// Output format
    #[arg(short, long)]
    output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

/// Arguments for the `score` subcommand
#[derive(Parser)]
struct ScoreArgs {
    /// Path to the SBOM
    sbom: PathBuf,

    #[command(flatten)]
    scoring: ScoringArgs,

    /// Exit with code 1 if the grade is below this score (0-100)
    #[arg(long)]
    min_score: Option<f32>,
}

/// Arguments for the `compare` subcommand
#[derive(Parser)]
struct CompareArgs {
    /// Path to the first SBOM
    left: PathBuf,

    /// Path to the second SBOM
    right: PathBuf,

    #[command(flatten)]
    scoring: ScoringArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an SBOM
    Score(ScoreArgs),

    /// Score two SBOMs side by side
    Compare(CompareArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the JSON Schema of the configuration file
    ConfigSchema {
        /// Write the schema to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print an example configuration file
    Example,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Score(args) => {
            let mut config = effective_config(cli.config.as_deref(), cli.no_color, &args.scoring)?;
            if args.min_score.is_some() {
                config.scoring.min_score = args.min_score;
            }
            cli::run_score(args.sbom, &config, cli.quiet)
        }

        Commands::Compare(args) => {
            let config = effective_config(cli.config.as_deref(), cli.no_color, &args.scoring)?;
            cli::run_compare(args.left, args.right, &config, cli.quiet)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sbom-scorecard", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = sbom_scorecard::config::generate_json_schema()
                .context("failed to serialize schema")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = pipeline::load_config(cli.config.as_deref())?;
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Example => {
                print!("{}", sbom_scorecard::config::generate_example_config());
                Ok(exit_codes::SUCCESS)
            }
        },
    }
}

/// Config file values overridden by CLI flags
fn effective_config(
    config_path: Option<&Path>,
    no_color: bool,
    args: &ScoringArgs,
) -> Result<ScorecardConfig> {
    let (mut config, loaded_from) = pipeline::load_config(config_path)?;
    if let Some(path) = loaded_from {
        tracing::debug!("using config from {}", path.display());
    }

    if let Some(sbom_type) = args.sbom_type {
        config.ingestion.sbom_type = sbom_type;
    }
    if let Some(format) = args.output {
        config.output.format = format;
    }
    if args.output_file.is_some() {
        config.output.file.clone_from(&args.output_file);
    }
    if no_color {
        config.output.no_color = true;
    }

    Ok(config)
}
