//! killcam command-line entry point.

mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use killcam_settings::{JsonFileStore, ProfileStore};
use tracing_subscriber::EnvFilter;

use crate::commands::profile::ProfileAction;
use crate::commands::upload::UploadArgs;
use crate::commands::videos::VideosArgs;
use crate::config::{API_URL_ENV, CliConfig, default_config_path};

#[derive(Parser, Debug)]
#[clap(name = "killcam", version, about = "Submit gameplay clips for processing")]
struct Cli {
    /// Service URL; overrides the config file and KILLCAM_API_URL.
    #[clap(long, global = true)]
    base_url: Option<String>,
    /// Path to cli.toml; preferences are kept next to it.
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a clip (and optional music), then start processing.
    Upload(UploadArgs),
    /// List processed videos.
    Videos(VideosArgs),
    /// Show or clear the stored form defaults.
    Profile {
        #[clap(subcommand)]
        action: Option<ProfileAction>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries progress and results.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", render_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = match CliConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            CliConfig::default()
        }
    }
    .with_env_override(std::env::var(API_URL_ENV).ok());
    let base_url = cli.base_url.unwrap_or_else(|| config.base_url.clone());

    match cli.command {
        Command::Upload(args) => {
            let profiles = open_profiles(&config_path)?;
            commands::upload::run(args, &base_url, config.upload_options(), &profiles).await
        }
        Command::Videos(args) => {
            commands::videos::run(args, &base_url, config.poll_interval()).await
        }
        Command::Profile { action } => {
            let profiles = open_profiles(&config_path)?;
            commands::profile::run(action, &profiles)
        }
    }
}

/// Preferences live next to the config file, so the default config path
/// resolves to the default preferences path.
fn open_profiles(config_path: &Path) -> anyhow::Result<ProfileStore<JsonFileStore>> {
    let path = config_path.with_file_name("preferences.json");
    let store = JsonFileStore::open(path.clone())
        .with_context(|| format!("opening {}", path.display()))?;
    Ok(ProfileStore::new(store))
}

/// Error chain on one line, skipping causes already quoted by their parent.
fn render_error(e: &anyhow::Error) -> String {
    let mut out = e.to_string();
    for cause in e.chain().skip(1) {
        let msg = cause.to_string();
        if !out.contains(&msg) {
            out.push_str(": ");
            out.push_str(&msg);
        }
    }
    out
}
