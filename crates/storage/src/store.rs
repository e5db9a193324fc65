// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage contract

use std::time::Duration;

use async_trait::async_trait;
use audit_core::AuditRecord;
use thiserror::Error;

/// Errors from the log store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("write failed: {0}")]
    Write(String),
    #[error("disconnect failed: {0}")]
    Disconnect(String),
}

/// Append-only audit log.
///
/// No read, update or delete. Each `insert` is exactly one durable write
/// attempt and never retries. Implementations must be safe to call
/// concurrently through `&self`.
#[async_trait]
pub trait AuditStore: Clone + Send + Sync + 'static {
    /// Append one record to the log
    async fn insert(&self, record: &AuditRecord) -> Result<(), StorageError>;
}

/// Connection-level control, used only when the service shuts down
#[async_trait]
pub trait StoreConnection: Send + Sync {
    /// Release the underlying connection
    async fn close(&self) -> Result<(), StorageError>;
}
