//! `chunkfetch run` – connect, handshake, and run the download worker.

use anyhow::{Context, Result};
use chunkfetch_core::config::ChunkfetchConfig;
use chunkfetch_core::connection::TcpConnection;
use chunkfetch_core::control::CancelToken;
use chunkfetch_core::ledger::Ledger;
use chunkfetch_core::scheduler::{ProgressEvent, ProgressStats, Scheduler, SessionEnd, SessionReport};
use chunkfetch_core::session;
use chunkfetch_core::transfer::TransferTracker;
use std::io::Write;
use tokio::sync::mpsc::UnboundedReceiver;

pub async fn run_session(cfg: &ChunkfetchConfig) -> Result<()> {
    let addr = cfg.server_addr();
    let conn = match session::connect(&addr) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = %e, "connect failed");
            println!("Unable to connect to server {addr}");
            println!("Client closed!");
            return Err(e.into());
        }
    };
    println!("Connected to server successfully!!\n");

    let result = download(conn, cfg).await;
    println!("Client closed!");
    match &result {
        Ok(report) => tracing::info!(
            completed = report.completed,
            failed = report.failed,
            "client closed"
        ),
        Err(e) => tracing::error!(error = %e, "session ended with error"),
    }
    result.map(|_| ())
}

/// Handshake, queue build and the worker, on an established connection.
async fn download(mut conn: TcpConnection, cfg: &ChunkfetchConfig) -> Result<SessionReport> {
    let listing = session::read_listing(&mut conn, cfg.handshake_buffer_bytes())?;
    println!("Available files from server: \n{listing}");

    let pending = session::plan(cfg)?;
    if pending.is_empty() {
        println!("Nothing left to download; press Ctrl-C to exit.");
    }
    std::fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("create output dir: {}", cfg.output_dir.display()))?;

    let cancel = CancelToken::new();
    let signal_task = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                println!("\nInterrupt signal received. Shutting down client...");
                cancel.cancel();
            }
        }
    });

    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    let printer = tokio::spawn(print_events(events_rx));

    let mut scheduler = Scheduler::new(
        conn,
        pending,
        TransferTracker::new(&cfg.output_dir),
        Ledger::new(&cfg.ledger_file),
        cancel,
    )
    .with_events(events_tx);

    // The worker owns the connection; it only observes cancellation between files.
    let result = tokio::task::spawn_blocking(move || scheduler.run()).await;
    signal_task.abort();
    let _ = printer.await;

    let report = result.context("download worker join")??;
    if report.end == SessionEnd::ConnectionClosed {
        println!("\nServer closed the connection.");
    }
    Ok(report)
}

async fn print_events(mut rx: UnboundedReceiver<ProgressEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            ProgressEvent::Started { filename, size } => {
                println!("Starting download of {filename} ({size} bytes)");
            }
            ProgressEvent::Progress(stats) => {
                print!("\r{}", progress_line(&stats));
                let _ = std::io::stdout().flush();
            }
            ProgressEvent::Finished { filename, .. } => {
                println!("\nFinished downloading {filename}");
            }
            ProgressEvent::Failed { filename, reason } => {
                eprintln!("\nError: {filename}: {reason}");
            }
        }
    }
}

fn progress_line(stats: &ProgressStats) -> String {
    let eta = match stats.eta_secs() {
        Some(secs) => format!("{}s", secs.ceil() as u64),
        None => "--".to_string(),
    };
    format!(
        "Downloading {} .... {} %  {:.1} KiB/s  ETA {eta}",
        stats.filename,
        stats.percent(),
        stats.bytes_per_sec() / 1024.0
    )
}
