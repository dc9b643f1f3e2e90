//! isamstore Server Binary
//!
//! Opens the record store and starts the TCP server.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use isamstore::network::Server;
use isamstore::{Config, RecordStore, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// isamstore Server
#[derive(Parser, Debug)]
#[command(name = "isamstore-server")]
#[command(about = "ISAM-style record store server")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./isam_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    listen: String,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// When to fsync the data file
    #[arg(short, long, value_enum, default_value = "batched")]
    sync: SyncMode,

    /// Appends between fsyncs in batched mode
    #[arg(long, default_value = "64")]
    sync_every: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SyncMode {
    Always,
    Batched,
    Never,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,isamstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("isamstore Server v{}", isamstore::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    let sync_strategy = match args.sync {
        SyncMode::Always => SyncStrategy::EveryWrite,
        SyncMode::Batched => SyncStrategy::EveryNWrites {
            count: args.sync_every,
        },
        SyncMode::Never => SyncStrategy::Never,
    };

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .max_connections(args.max_connections)
        .sync_strategy(sync_strategy)
        .build();

    let store = match RecordStore::open(config.clone()) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open record store: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Record store ready with {} record(s)", store.len());

    let mut server = Server::new(config, Arc::clone(&store));
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = store.sync() {
        tracing::error!("Failed to sync data file: {}", e);
    }
    tracing::info!("Server stopped");
}
