//! Record service entry point.
//!
//! # Responsibility
//! - Read configuration, start logging, open the store once.
//! - Serve the HTTP API until interrupted.

mod config;

use clap::Parser;
use config::Config;
use log::{error, info};
use recordkeep_api::AppState;
use recordkeep_core::db::{open_db, open_db_in_memory};
use recordkeep_core::init_logging;
use std::error::Error;
use std::future::Future;
use std::io;
use std::process::ExitCode;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("recordkeep: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    init_logging(config.effective_log_level(), config.log_dir.as_deref())?;

    let conn = if config.in_memory {
        open_db_in_memory()?
    } else {
        open_db(&config.db_path)?
    };

    let listener = TcpListener::bind(config.bind).await?;
    info!(
        "event=server_start module=server status=ok bind={} in_memory={}",
        listener.local_addr()?,
        config.in_memory
    );

    recordkeep_api::serve(listener, AppState::new(conn), shutdown_signal()).await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires. Never resolves when the signal handler
/// cannot be installed, so the server keeps running until killed.
async fn wait_for_shutdown(signal: impl Future<Output = io::Result<()>>) {
    if let Err(err) = signal.await {
        error!("event=shutdown_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
    info!("event=shutdown_signal module=server status=ok");
}
