mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodmix_core::{load_config, validate_config, Config, SanitizedConfig};

/// Default config file, overridable with `MOODMIX_CONFIG` or `--config`.
const DEFAULT_CONFIG_PATH: &str = "moodmix.toml";

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "MOODMIX_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists the available moods.
    Moods,

    /// Searches videos for a mood.
    Search {
        mood: String,
        /// Number of results to request (1-50)
        #[arg(short = 'n', long, default_value_t = 10)]
        max_results: u32,
        /// Skip the result cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Shows details of a single video.
    Details { video_id: String },

    /// Selects a mood and keeps playing, printing every video.
    Play {
        mood: String,
        /// How many finished videos to chain after the first one
        #[arg(short, long, default_value_t = 0)]
        tracks: u32,
    },

    /// Prints the streaming service authorization URL.
    AuthUrl,

    /// Prints the loaded configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,moodmix_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Moods => commands::list_moods(&mut out, cli.json),
        Command::Search {
            mood,
            max_results,
            no_cache,
        } => {
            let source = commands::build_source(&load(&cli.config)?)?;
            commands::search(&mut out, &source, &mood, max_results, no_cache, cli.json).await
        }
        Command::Details { video_id } => {
            let source = commands::build_source(&load(&cli.config)?)?;
            commands::details(&mut out, &source, &video_id, cli.json).await
        }
        Command::Play { mood, tracks } => {
            let engine = commands::build_engine(&load(&cli.config)?)?;
            commands::play(&mut out, &engine, &mood, tracks, cli.json).await
        }
        Command::AuthUrl => {
            let config = load(&cli.config)?;
            commands::auth_url(&mut out, config.streaming.as_ref())
        }
        Command::Config => {
            let config = load(&cli.config)?;
            commands::print_json(&mut out, &SanitizedConfig::from(&config))
        }
    }
}

fn load(path: &Path) -> Result<Config> {
    info!("Loading configuration from {:?}", path);
    let config =
        load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?;
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}
