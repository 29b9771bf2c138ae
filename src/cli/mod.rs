//! Command line interface.

mod commands;
mod helpers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use iminsight::config::{load_settings_with_options, LoadOptions};

/// Naval image intelligence: upload an image and read the analysis report.
#[derive(Debug, Parser)]
#[command(name = "iminsight", version, about)]
pub struct Cli {
    /// Configuration file (JSON). Auto-discovered when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Analysis service base URL.
    #[arg(long, global = true, env = "IMINSIGHT_SERVER_URL")]
    pub server: Option<String>,

    /// Label-set context sent with uploads (ground, naval, aerial).
    #[arg(long, global = true, env = "IMINSIGHT_CONTEXT")]
    pub context: Option<String>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload an image and print the intelligence report.
    Analyze {
        /// Image to analyze (.jpg, .jpeg, .png, .tiff, .geotiff).
        file: PathBuf,
    },
    /// Interactive session: open files, zoom, analyze, close reports.
    Console,
    /// Print the report for a saved analysis response (JSON).
    Report {
        /// Response document saved from the service.
        file: PathBuf,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let options = LoadOptions {
        config_path: cli.config,
        server_url: cli.server,
        context: cli.context,
    };

    match cli.command {
        Commands::Report { file } => commands::cmd_report(&file).await,
        Commands::Analyze { file } => {
            let settings = load_settings_with_options(options).await?;
            commands::cmd_analyze(&settings, &file).await
        }
        Commands::Console => {
            let settings = load_settings_with_options(options).await?;
            commands::cmd_console(&settings).await
        }
    }
}
