//! `chunkfetch ledger` – list completed downloads.

use anyhow::Result;
use chunkfetch_core::config::ChunkfetchConfig;
use chunkfetch_core::ledger::Ledger;

pub fn run_ledger(cfg: &ChunkfetchConfig) -> Result<()> {
    let ledger = Ledger::new(&cfg.ledger_file);
    let entries = ledger.entries()?;
    if entries.is_empty() {
        println!("No completed downloads in {}.", ledger.path().display());
        return Ok(());
    }
    for name in &entries {
        println!("{name}");
    }
    let unique = ledger.load()?.len();
    if unique != entries.len() {
        println!("({} entries, {} unique)", entries.len(), unique);
    }
    Ok(())
}
