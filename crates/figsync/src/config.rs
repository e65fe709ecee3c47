//! Configuration file structure (figsync.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use figsync_pipeline::DEFAULT_DEPTH;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub figma: FigmaConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize)]
pub struct FigmaConfig {
    /// Design file key
    pub file_key: Option<String>,
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            file_key: None,
            depth: default_depth(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_batch")]
    pub batch: usize,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default)]
    pub generate_ts: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            batch: default_batch(),
            delay_ms: default_delay_ms(),
            generate_ts: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_depth() -> u32 {
    DEFAULT_DEPTH
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("figma-icons")
}
fn default_batch() -> usize {
    50
}
fn default_delay_ms() -> u64 {
    500
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    4100
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = load(&temp.path().join("figsync.toml")).unwrap();

        assert_eq!(config.figma.file_key, None);
        assert_eq!(config.figma.depth, DEFAULT_DEPTH);
        assert_eq!(config.sync.out_dir, PathBuf::from("figma-icons"));
        assert_eq!(config.sync.batch, 50);
        assert_eq!(config.server.port, 4100);
    }

    #[test]
    fn partial_file_keeps_field_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("figsync.toml");
        fs::write(
            &path,
            "[figma]\nfile_key = \"abc\"\n\n[sync]\nbatch = 20\n",
        )
        .unwrap();

        let config = load(&path).unwrap();

        assert_eq!(config.figma.file_key.as_deref(), Some("abc"));
        assert_eq!(config.figma.depth, DEFAULT_DEPTH);
        assert_eq!(config.sync.batch, 20);
        assert_eq!(config.sync.delay_ms, 500);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("figsync.toml");
        fs::write(&path, "[sync\nbatch = ").unwrap();

        assert!(load(&path).is_err());
    }

    #[test]
    fn default_config_parses() {
        let config: ConfigFile = toml::from_str(crate::commands::init::DEFAULT_CONFIG).unwrap();

        assert_eq!(config.sync.batch, 50);
        assert_eq!(config.sync.delay_ms, 500);
    }
}
