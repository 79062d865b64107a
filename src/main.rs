mod client;
mod commands;
mod config;
mod content;
mod context;
mod error;
mod importer;
mod output;
mod postprocess;
mod screenshots;
mod terraform;
mod traits;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand};
use commands::{DiscoverCommand, ImportCommand, ScreenshotsCommand};

use crate::client::ReqwestClient;
use crate::config::{Settings, SettingsOverrides};
use crate::context::Context;
use crate::traits::RealFileSystem;

#[derive(Parser)]
#[command(name = "app-packager")]
#[command(about = "App Packager - Export a Sumo Logic content folder as a Terraform module", long_about = None)]
#[command(version)]
struct Cli {
    /// Deployment name (us1, us2, eu, stag, ...)
    #[arg(long, env = "SUMOLOGIC_DEPLOYMENT", global = true)]
    deployment: Option<String>,

    /// Access id used for API calls and the importer
    #[arg(long, env = "SUMOLOGIC_ACCESS_ID", global = true)]
    access_id: Option<String>,

    /// Access key used for API calls and the importer
    #[arg(long, env = "SUMOLOGIC_ACCESS_KEY", global = true, hide_env_values = true)]
    access_key: Option<String>,

    /// Path to the terraformer binary
    #[arg(long, env = "TERRAFORMER_PATH", global = true)]
    terraformer_path: Option<String>,

    /// Settings file (defaults to ~/.app-packager/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a folder and generate the Terraform module
    Import(ImportCommand),

    /// Show the folder tree and content below a folder
    Discover(DiscoverCommand),

    /// Capture dashboard preview screenshots into an app directory
    Screenshots(ScreenshotsCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = SettingsOverrides {
        deployment: cli.deployment,
        access_id: cli.access_id,
        access_key: cli.access_key,
        terraformer_path: cli.terraformer_path,
    };
    let settings = Settings::load(&RealFileSystem, cli.config.as_deref(), overrides)
        .context("Failed to load settings")?;

    let http = ReqwestClient::new(settings.credentials())?;
    let ctx = Context::new(Arc::new(http));

    match cli.command {
        Commands::Import(command) => {
            command.execute(&ctx, &settings)?;
        }
        Commands::Discover(command) => {
            command.execute(&ctx, &settings)?;
        }
        Commands::Screenshots(command) => {
            command.execute(&ctx, &settings)?;
        }
    }

    Ok(())
}
