//! figsync CLI - Figma icon sync pipeline.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "figsync")]
#[command(about = "Sync icons from a Figma file into local lookup tables")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to figsync.toml config file
    #[arg(short, long, default_value = "figsync.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default figsync.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },

    /// List, fetch and merge the icons under a node
    Sync(commands::sync::SyncArgs),

    /// Merge existing batch files into the final artifacts
    Merge {
        /// Artifact directory (defaults to config or "figma-icons")
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Batch size used by the sync that wrote the batches
        #[arg(short, long)]
        batch: Option<usize>,

        /// Also emit icons.ts
        #[arg(long)]
        generate_ts: bool,
    },

    /// Serve rendered icons and logos over HTTP
    Serve {
        /// Port to listen on (defaults to config or 4100)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Merged geometry table to serve under /icons
        #[arg(short, long)]
        library: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Sync(args) => {
            let config = config::load(&cli.config)?;
            commands::sync::run(config, args).await?;
        }
        Commands::Merge {
            out_dir,
            batch,
            generate_ts,
        } => {
            let config = config::load(&cli.config)?;
            commands::merge::run(config, out_dir, batch, generate_ts).await?;
        }
        Commands::Serve {
            port,
            host,
            library,
        } => {
            let config = config::load(&cli.config)?;
            commands::serve::run(config, port, host, library).await?;
        }
    }

    Ok(())
}
