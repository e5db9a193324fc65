// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, serving, shutdown.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use audit_engine::IngestService;
use audit_storage::{AuditStore, MongoStore, StorageError, StoreConnection, TracedAuditStore};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{Config, ConfigError};
use crate::server::{RpcServer, ServerError};

/// Store used by the running daemon (wrapped with tracing)
pub type DaemonStore = TracedAuditStore<MongoStore>;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage connection failed: {0}")]
    Connection(#[source] StorageError),

    #[error("Listener error: {0}")]
    Listen(#[from] ServerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid log path: {0}")]
    LogPath(std::path::PathBuf),
}

/// Daemon lifecycle phase, reported in lifecycle logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Connecting,
    Serving,
    Draining,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Connecting => "connecting",
            Phase::Serving => "serving",
            Phase::Draining => "draining",
            Phase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Connect to storage and bind the listener.
///
/// The storage probe runs first and is bounded by `startup_timeout`; no
/// listener exists unless it succeeds.
pub async fn startup(config: &Config) -> Result<Daemon<DaemonStore>, LifecycleError> {
    info!(
        phase = %Phase::Connecting,
        env = %config.env,
        database = %config.db_conn.database,
        "connecting to storage"
    );

    let connect = MongoStore::connect(&config.db_conn, config.startup_timeout);
    let store = match tokio::time::timeout(config.startup_timeout, connect).await {
        Ok(Ok(store)) => TracedAuditStore::new(store),
        Ok(Err(e)) => return Err(LifecycleError::Connection(e)),
        Err(_) => {
            return Err(LifecycleError::Connection(StorageError::Timeout(
                config.startup_timeout,
            )))
        }
    };
    info!("storage reachable");

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    Daemon::bind(store, addr, config.shutdown_timeout).await
}

/// A connected store plus a bound, not yet serving, endpoint
pub struct Daemon<S> {
    store: S,
    server: RpcServer<S>,
    shutdown_timeout: Duration,
    start_time: Instant,
}

impl<S: AuditStore + StoreConnection> Daemon<S> {
    /// Bind the endpoint over an already connected store.
    ///
    /// If binding fails the store is closed before the error is returned.
    pub async fn bind(
        store: S,
        addr: SocketAddr,
        shutdown_timeout: Duration,
    ) -> Result<Self, LifecycleError> {
        match RpcServer::bind(addr, IngestService::new(store.clone())).await {
            Ok(server) => Ok(Self {
                store,
                server,
                shutdown_timeout,
                start_time: Instant::now(),
            }),
            Err(e) => {
                close_store(&store, shutdown_timeout).await;
                Err(e.into())
            }
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, LifecycleError> {
        Ok(self.server.local_addr()?)
    }

    /// Serve until `shutdown` is cancelled, drain, then close the store.
    ///
    /// Failing or slow store closes are logged and do not make shutdown
    /// unclean.
    pub async fn run(self, shutdown: CancellationToken) {
        let Self {
            store,
            server,
            shutdown_timeout,
            start_time,
        } = self;

        match server.local_addr() {
            Ok(addr) => info!(phase = %Phase::Serving, %addr, "daemon ready"),
            Err(e) => warn!(phase = %Phase::Serving, "daemon ready, address unknown: {}", e),
        }

        let serving = tokio::spawn(server.serve(shutdown.clone()));

        shutdown.cancelled().await;
        info!(phase = %Phase::Draining, "shutting down");

        if let Err(e) = serving.await {
            error!("server task failed: {}", e);
        }

        close_store(&store, shutdown_timeout).await;

        info!(
            phase = %Phase::Stopped,
            uptime_secs = start_time.elapsed().as_secs(),
            "daemon stopped"
        );
    }
}

/// Close the store, giving up after `timeout`
async fn close_store<S: StoreConnection>(store: &S, timeout: Duration) {
    match tokio::time::timeout(timeout, store.close()).await {
        Ok(Ok(())) => info!("storage connection closed"),
        Ok(Err(e)) => warn!("failed to close storage connection: {}", e),
        Err(_) => warn!(?timeout, "timed out closing storage connection"),
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
