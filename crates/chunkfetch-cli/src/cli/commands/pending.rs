//! `chunkfetch pending` – show the work queue without connecting.

use anyhow::Result;
use chunkfetch_core::config::ChunkfetchConfig;
use chunkfetch_core::session;

pub fn run_pending(cfg: &ChunkfetchConfig) -> Result<()> {
    let pending = session::plan(cfg)?;
    if pending.is_empty() {
        println!("Nothing to download.");
        return Ok(());
    }
    println!("{:<4} {:<10} {:<5} {}", "#", "PRIORITY", "HINT", "FILE");
    for (i, item) in pending.iter().enumerate() {
        println!(
            "{:<4} {:<10} {:<5} {}",
            i,
            item.priority.as_str(),
            item.priority.hint(),
            item.filename
        );
    }
    Ok(())
}
