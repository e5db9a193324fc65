// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP server and connection handling.

use std::net::SocketAddr;

use audit_engine::{IngestError, IngestService};
use audit_storage::AuditStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::protocol::{self, ProtocolError, Request, Response};

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {0}: {1}")]
    Bind(SocketAddr, #[source] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepts connections and answers `Log` requests through an
/// [`IngestService`].
pub struct RpcServer<S> {
    listener: TcpListener,
    service: IngestService<S>,
}

impl<S: AuditStore> RpcServer<S> {
    /// Bind the listener. Nothing is accepted until [`RpcServer::serve`].
    pub async fn bind(addr: SocketAddr, service: IngestService<S>) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e))?;
        Ok(Self { listener, service })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` is cancelled, then drain.
    ///
    /// On cancellation the listener is dropped so new connections are
    /// refused. Idle connections close; a request already read is still
    /// handled and answered. Returns once every connection task has ended.
    pub async fn serve(self, shutdown: CancellationToken) {
        let Self { listener, service } = self;
        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "accepted connection");
                        let service = service.clone();
                        let shutdown = shutdown.clone();
                        connections.spawn(
                            async move {
                                if let Err(e) = handle_connection(&service, stream, &shutdown).await {
                                    warn!("connection error: {}", e);
                                }
                            }
                            .instrument(info_span!("connection", %peer)),
                        );
                    }
                    Err(e) => warn!("accept failed: {}", e),
                },
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = joined {
                        error!("connection task failed: {}", e);
                    }
                }
            }
        }

        drop(listener);
        info!(connections = connections.len(), "listener closed, draining");

        while let Some(joined) = connections.join_next().await {
            if let Err(e) = joined {
                error!("connection task failed: {}", e);
            }
        }
        info!("drained");
    }
}

/// Serve one connection until the peer hangs up or shutdown finds it idle
pub async fn handle_connection<S: AuditStore>(
    service: &IngestService<S>,
    stream: TcpStream,
    shutdown: &CancellationToken,
) -> Result<(), ServerError> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    loop {
        // Wait for the first byte of the next frame
        let eof = tokio::select! {
            biased;
            ready = async { reader.fill_buf().await.map(|buf| buf.is_empty()) } => ready?,
            _ = shutdown.cancelled() => {
                debug!("closing idle connection");
                return Ok(());
            }
        };
        if eof {
            debug!("client disconnected");
            return Ok(());
        }

        let body = match protocol::read_message(&mut reader).await {
            Ok(body) => body,
            Err(ProtocolError::ConnectionClosed) => return Ok(()),
            Err(e @ ProtocolError::MessageTooLarge { .. }) => {
                // The oversized body is still on the wire, so the stream
                // cannot be resynchronized
                protocol::write_response(&mut writer, &Response::invalid_argument(e.to_string()))
                    .await?;
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        let response = match protocol::decode::<Request>(&body) {
            Ok(request) => handle_request(service, request).await,
            Err(e) => {
                warn!("malformed request: {}", e);
                Response::invalid_argument(format!("malformed request: {}", e))
            }
        };

        protocol::write_response(&mut writer, &response).await?;

        if shutdown.is_cancelled() {
            return Ok(());
        }
    }
}

/// Handle a single request and return a response
async fn handle_request<S: AuditStore>(service: &IngestService<S>, request: Request) -> Response {
    match request {
        Request::Log { event } => match service.handle(&event).await {
            Ok(()) => Response::Ok,
            Err(e @ IngestError::UnknownEnumValue(_)) => {
                error!(
                    action = event.action,
                    entity = event.entity,
                    "rejected event: {}",
                    e
                );
                Response::invalid_argument(e.to_string())
            }
            Err(e @ IngestError::Storage(_)) => {
                error!(entity_id = event.entity_id, "failed to record event: {}", e);
                Response::internal(e.to_string())
            }
        },
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
