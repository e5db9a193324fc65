// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for sending audit events to a running daemon

use std::time::Duration;

use audit_core::LogEvent;
use thiserror::Error;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::protocol::{self, ErrorCode, ProtocolError, Request, Response};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Event rejected ({code}): {message}")]
    Rejected { code: ErrorCode, message: String },
}

/// A single connection to the daemon. Calls on one client are sequential;
/// open several clients to log concurrently.
pub struct AuditClient {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
    timeout: Duration,
}

impl AuditClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader,
            writer,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Per-call read and write timeout (default 5s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send one event and wait for its acknowledgment
    pub async fn log(&mut self, event: &LogEvent) -> Result<(), ClientError> {
        let request = Request::Log {
            event: event.clone(),
        };
        match self.send(&request).await? {
            Response::Ok => Ok(()),
            Response::Error { code, message } => Err(ClientError::Rejected { code, message }),
        }
    }

    async fn send(&mut self, request: &Request) -> Result<Response, ClientError> {
        let data = protocol::encode(request)?;
        tokio::time::timeout(self.timeout, protocol::write_message(&mut self.writer, &data))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        let response_bytes =
            tokio::time::timeout(self.timeout, protocol::read_message(&mut self.reader))
                .await
                .map_err(|_| ProtocolError::Timeout)??;

        Ok(protocol::decode(&response_bytes)?)
    }
}
