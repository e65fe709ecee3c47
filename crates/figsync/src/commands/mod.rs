//! CLI command implementations.

pub mod init;
pub mod merge;
pub mod serve;
pub mod sync;

use std::time::Duration;

use anyhow::{Context, Result};
use figsync_api::{FigmaClient, FigmaClientConfig};

use crate::config::FigmaConfig;

/// Build a Figma client from the environment token and `[figma]` settings.
fn figma_client(config: &FigmaConfig) -> Result<FigmaClient> {
    let client_config = FigmaClientConfig {
        timeout: config.timeout_secs.map(Duration::from_secs),
        ..FigmaClientConfig::from_env()
    };

    FigmaClient::new(client_config).context("Failed to create Figma client")
}
