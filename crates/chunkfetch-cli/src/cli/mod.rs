//! CLI for the chunkfetch client.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use chunkfetch_core::config::{self, ChunkfetchConfig};
use std::path::PathBuf;

use commands::{run_ledger, run_pending, run_session};

/// Top-level CLI for the chunkfetch client.
#[derive(Debug, Parser)]
#[command(name = "chunkfetch")]
#[command(about = "chunkfetch: prioritized framed file-transfer client", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Per-invocation overrides for values in config.toml.
#[derive(Debug, Default, Args)]
pub struct ConfigOverrides {
    /// Server host.
    #[arg(long, global = true)]
    pub host: Option<String>,
    /// Server port.
    #[arg(long, global = true)]
    pub port: Option<u16>,
    /// Requested-files list (`<filename> <priority>` per line).
    #[arg(long, global = true, value_name = "PATH")]
    pub input: Option<PathBuf>,
    /// Ledger of completed downloads.
    #[arg(long, global = true, value_name = "PATH")]
    pub ledger: Option<PathBuf>,
    /// Directory for downloaded files.
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn apply(&self, cfg: &mut ChunkfetchConfig) {
        if let Some(host) = &self.host {
            cfg.host = host.clone();
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(p) = &self.input {
            cfg.input_file = p.clone();
        }
        if let Some(p) = &self.ledger {
            cfg.ledger_file = p.clone();
        }
        if let Some(p) = &self.output_dir {
            cfg.output_dir = p.clone();
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Connect and download pending files until Ctrl-C or the server hangs up.
    Run,

    /// Show files still to download (requested list minus ledger). No network.
    Pending,

    /// List files recorded as downloaded.
    Ledger,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        cli.overrides.apply(&mut cfg);
        tracing::debug!("effective config: {:?}", cfg);

        match cli.command {
            CliCommand::Run => run_session(&cfg).await?,
            CliCommand::Pending => run_pending(&cfg)?,
            CliCommand::Ledger => run_ledger(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
