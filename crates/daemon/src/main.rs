// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herdctld`: the fleet daemon binary. Loads the root config, starts
//! the Fleet Manager, and serves the IPC socket until a shutdown signal
//! arrives.
//!
//! Not meant to be run directly day-to-day; `herdctl` starts and stops
//! it as a background process.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use herdctl_adapters::{CliAdapter, ContainerAdapter, SdkAdapter};
use herdctl_daemon::{manager::FleetManager, EventBus};
use herdctl_engine::AdapterResolver;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UnixListener;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("herdctld {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                println!("herdctld {}", env!("CARGO_PKG_VERSION"));
                println!("Fleet daemon for autonomous agents. Started by `herdctl`, not run directly.");
                return Ok(());
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                std::process::exit(2);
            }
        }
    }

    init_tracing();

    let state_dir = herdctl_daemon::env::state_dir().map_err(|e| format!("cannot resolve state dir: {e}"))?;
    std::fs::create_dir_all(&state_dir)?;

    let root_path = config_path();
    let store = herdctl_storage::StateStore::new(state_dir.clone());

    let adapters = Arc::new(AdapterResolver::new(
        Arc::new(SdkAdapter::new(claude_binary())),
        Arc::new(CliAdapter::new(claude_binary())),
        Arc::new(ContainerAdapter::default()),
    ));
    let bus = Arc::new(EventBus::new());

    let manager = Arc::new(FleetManager::new(
        root_path,
        store,
        adapters,
        bus,
        herdctl_daemon::env::cancel_timeout(),
        herdctl_daemon::env::tick_interval(),
        herdctl_daemon::env::idle_timeout(),
        herdctl_daemon::env::max_duration(),
    ));

    manager.initialize()?;
    manager.start()?;
    info!("fleet manager initialized and started");

    let socket_path = state_dir.join("herdctld.sock");
    if socket_path.exists() {
        std::fs::remove_file(&socket_path)?;
    }
    let listener = UnixListener::bind(&socket_path)?;
    info!(socket = %socket_path.display(), "listening");

    let server_manager = manager.clone();
    tokio::spawn(async move {
        if let Err(e) = herdctl_daemon::server::serve(listener, server_manager).await {
            error!("ipc server stopped: {e}");
        }
    });

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    manager.stop()?;
    let _ = std::fs::remove_file(&socket_path);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
}

fn config_path() -> PathBuf {
    std::env::var("HERDCTL_CONFIG").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("herd.yaml"))
}

fn claude_binary() -> PathBuf {
    std::env::var("HERDCTL_CLAUDE_BIN").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("claude"))
}
