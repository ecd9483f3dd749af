//! Streamlyne - field-mapping client for water infrastructure
//!
//! Loads borewell, pumping-station and valve layers, finds the sources
//! nearest to a point, and files reviews and outbreak reports against them.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use streamlyne_cli::OutputFormat;
use streamlyne_core::config::Config;
use streamlyne_telemetry::{TelemetryConfig, TelemetryGuard};

mod commands;

use commands::{annotate, layers, navigate, nearest, reviews, Context, PointArgs};

/// Field-mapping client for water infrastructure
#[derive(Parser)]
#[command(name = "streamlyne")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to streamlyne.toml in the usual places)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show layers and their load status
    Layers {
        /// Layers to switch on before reporting (borewells, pumpingStations, valves)
        #[arg(short, long = "show", value_name = "LAYER")]
        show: Vec<streamlyne_engine::LayerKey>,
    },

    /// Rank the visible sources nearest to a point
    Nearest {
        #[command(flatten)]
        point: PointArgs,

        /// Layers to search (all layers if not specified)
        #[arg(short, long = "layer", value_name = "LAYER")]
        layers: Vec<streamlyne_engine::LayerKey>,

        /// Number of sources to return (defaults to [proximity] k)
        #[arg(short, value_parser = clap::value_parser!(u16).range(1..=100))]
        k: Option<u16>,
    },

    /// List the reviews stored for the source nearest to a point
    Reviews {
        #[command(flatten)]
        point: PointArgs,
    },

    /// Review the source nearest to a point
    Review {
        #[command(flatten)]
        point: PointArgs,

        /// Review text
        #[arg(short, long)]
        text: String,

        /// Account email
        #[arg(long, env = "STREAMLYNE_EMAIL")]
        email: Option<String>,

        /// Account password
        #[arg(long, env = "STREAMLYNE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Report a disease outbreak at the source nearest to a point
    Outbreak {
        #[command(flatten)]
        point: PointArgs,

        /// Disease name
        #[arg(long)]
        disease: String,

        /// What was observed
        #[arg(long)]
        description: String,
    },

    /// Print the directions destination for the source nearest to a point
    Navigate {
        #[command(flatten)]
        point: PointArgs,
    },
}

fn init_logging(config: &Config, verbose: bool) -> anyhow::Result<TelemetryGuard> {
    let logging = &config.schema.logging;
    streamlyne_telemetry::init_with_config(TelemetryConfig {
        log_level: if verbose { "debug".to_string() } else { logging.level.clone() },
        json: logging.json,
        log_dir: logging.file.as_deref().map(|dir| config.resolve(dir)),
        ..TelemetryConfig::default()
    })
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let _guard = init_logging(&config, cli.verbose)?;
    let ctx = Context::new(config, cli.format);

    match cli.command {
        Commands::Layers { show } => layers::run(&ctx, &show).await,
        Commands::Nearest { point, layers, k } => {
            nearest::run(&ctx, point, &layers, k.map(usize::from)).await
        }
        Commands::Reviews { point } => reviews::run(&ctx, point).await,
        Commands::Review { point, text, email, password } => {
            let credentials = annotate::Credentials { email, password };
            annotate::review(&ctx, point, &text, credentials).await
        }
        Commands::Outbreak { point, disease, description } => {
            annotate::outbreak(&ctx, point, &disease, &description).await
        }
        Commands::Navigate { point } => navigate::run(&ctx, point).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
