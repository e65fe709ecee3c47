//! Write a default configuration file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing figsync...");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    tracing::info!(
        "Set FIGMA_ACCESS_TOKEN and fill in [figma].file_key, then run 'figsync sync <NODE_ID>'."
    );

    Ok(())
}

pub(crate) const DEFAULT_CONFIG: &str = r#"# figsync configuration

[figma]
# Key of the design file (the segment after /design/ in its URL)
# file_key = "..."

# How deep to list below the root node
depth = 10

# Per-request timeout in seconds
# timeout_secs = 30

[sync]
# Where manifest, batches and merged tables are written
out_dir = "figma-icons"

# Icons per image request
batch = 50

# Pause between batches, in milliseconds
delay_ms = 500

# Emit icons.ts after merging
generate_ts = false

[server]
host = "127.0.0.1"
port = 4100
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_default_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("figsync.toml");

        run(&path, false).await.unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }

    #[tokio::test]
    async fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("figsync.toml");
        fs::write(&path, "# mine\n").unwrap();

        run(&path, false).await.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        run(&path, true).await.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
