// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use async_trait::async_trait;
use audit_core::AuditRecord;
use tracing::Instrument;

use crate::store::{AuditStore, StorageError, StoreConnection};

/// Wrapper that adds tracing to any AuditStore
#[derive(Clone)]
pub struct TracedAuditStore<S> {
    inner: S,
}

impl<S> TracedAuditStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: AuditStore> AuditStore for TracedAuditStore<S> {
    async fn insert(&self, record: &AuditRecord) -> Result<(), StorageError> {
        let span = tracing::info_span!(
            "store.insert",
            entity = record.entity().as_str(),
            action = record.action().as_str(),
            entity_id = record.entity_id(),
        );

        let start = std::time::Instant::now();
        let result = self.inner.insert(record).instrument(span.clone()).await;
        let elapsed = start.elapsed();

        let _guard = span.enter();
        match &result {
            Ok(()) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "appended"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "append failed"
            ),
        }

        result
    }
}

#[async_trait]
impl<S: StoreConnection> StoreConnection for TracedAuditStore<S> {
    async fn close(&self) -> Result<(), StorageError> {
        let span = tracing::info_span!("store.close");

        let result = self.inner.close().instrument(span.clone()).await;

        let _guard = span.enter();
        match &result {
            Ok(()) => tracing::info!("connection closed"),
            Err(e) => tracing::warn!(error = %e, "close failed"),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
