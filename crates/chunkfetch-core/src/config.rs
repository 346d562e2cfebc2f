use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default size of the single receive used to read the server's file listing.
pub const DEFAULT_HANDSHAKE_BUFFER_BYTES: usize = 1024;

/// How ledger entries suppress requested lines when building the work queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerMatch {
    /// A ledger entry suppresses any requested line that contains it
    /// (`foo` also suppresses `foo2.txt`).
    #[default]
    Substring,
    /// A ledger entry suppresses only the requested line with exactly that filename.
    Exact,
}

/// Global configuration loaded from `~/.config/chunkfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkfetchConfig {
    /// Server host name or address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Requested-files list: one `<filename> <priority>` per line.
    pub input_file: PathBuf,
    /// Append-only ledger of completed downloads.
    pub ledger_file: PathBuf,
    /// Directory that receives downloaded files.
    pub output_dir: PathBuf,
    /// Ledger filtering mode; substring when missing.
    #[serde(default)]
    pub ledger_match: Option<LedgerMatch>,
    /// Receive buffer for the server's file listing (None = 1024 bytes).
    #[serde(default)]
    pub handshake_buffer_bytes: Option<usize>,
}

impl Default for ChunkfetchConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1234,
            input_file: PathBuf::from("input.txt"),
            ledger_file: PathBuf::from("downloaded_files.txt"),
            output_dir: PathBuf::from("output"),
            ledger_match: None,
            handshake_buffer_bytes: None,
        }
    }
}

impl ChunkfetchConfig {
    /// `host:port` string suitable for `TcpStream::connect`.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn ledger_match(&self) -> LedgerMatch {
        self.ledger_match.unwrap_or_default()
    }

    pub fn handshake_buffer_bytes(&self) -> usize {
        self.handshake_buffer_bytes
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_HANDSHAKE_BUFFER_BYTES)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("chunkfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ChunkfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ChunkfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(&path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ChunkfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
