//! Asset server command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use figsync_api::TOKEN_ENV;
use figsync_pipeline::{ArtifactStore, IconLibrary};
use figsync_server::{AssetServer, AssetServerConfig};

use crate::config::ConfigFile;

/// Run the asset server.
pub async fn run(
    config: ConfigFile,
    port: Option<u16>,
    host: Option<String>,
    library: Option<PathBuf>,
) -> Result<()> {
    let library_path = library
        .unwrap_or_else(|| ArtifactStore::new(&config.sync.out_dir).svg_table_path());

    let library = if library_path.exists() {
        IconLibrary::load(&library_path)
            .with_context(|| format!("Failed to load {}", library_path.display()))?
    } else {
        tracing::warn!(
            "No icon library at {}, /icons will serve placeholders",
            library_path.display()
        );
        IconLibrary::default()
    };

    let client = super::figma_client(&config.figma)?;
    if !client.is_authenticated() {
        tracing::warn!("{} is not set, only public files can be rendered", TOKEN_ENV);
    }

    let server_config = AssetServerConfig {
        host: host.unwrap_or(config.server.host),
        port: port.unwrap_or(config.server.port),
        file_key: config.figma.file_key,
    };

    tracing::info!("Starting asset server on port {}", server_config.port);

    AssetServer::new(server_config, Arc::new(client), library)
        .start()
        .await?;

    Ok(())
}
