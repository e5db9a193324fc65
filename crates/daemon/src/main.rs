// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit logger daemon (auditd)
//!
//! Accepts audit events over TCP and appends them to the log database.

use std::path::Path;
use std::process::ExitCode;

use audit_daemon::lifecycle::{self, LifecycleError, Phase};
use audit_daemon::shutdown::create_shutdown_token;
use audit_daemon::Config;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("auditd: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let log_guard = match setup_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("auditd: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        phase = %Phase::Init,
        version = env!("CARGO_PKG_VERSION"),
        env = %config.env,
        "starting auditd"
    );

    let daemon = match lifecycle::startup(&config).await {
        Ok(daemon) => daemon,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            // Tracing is non-blocking; make sure the operator sees the cause
            if config.log_path.is_some() {
                eprintln!("auditd: Failed to start daemon: {}", e);
            }
            drop(log_guard);
            return ExitCode::FAILURE;
        }
    };

    let shutdown = create_shutdown_token();
    daemon.run(shutdown).await;

    drop(log_guard);
    ExitCode::SUCCESS
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (non_blocking, guard) = match &config.log_path {
        Some(log_path) => {
            let file_name = log_path
                .file_name()
                .ok_or_else(|| LifecycleError::LogPath(log_path.clone()))?;
            let dir = match log_path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            std::fs::create_dir_all(dir)?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}
