// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ingestion service

use audit_core::{AuditRecord, LogEvent};
use audit_storage::AuditStore;
use tracing::debug;

use crate::error::IngestError;

/// Turns inbound events into appended audit records.
///
/// Holds nothing but the store handle, so one instance can be shared across
/// any number of concurrent calls.
#[derive(Clone)]
pub struct IngestService<S> {
    store: S,
}

impl<S: AuditStore> IngestService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate `event`, build its record and append it.
    ///
    /// Mapping and storage errors come back as-is; nothing is retried and
    /// an invalid event never reaches the store.
    pub async fn handle(&self, event: &LogEvent) -> Result<(), IngestError> {
        let record = AuditRecord::build(event)?;
        debug!(
            entity = record.entity().as_str(),
            action = record.action().as_str(),
            entity_id = record.entity_id(),
            "ingesting"
        );
        self.store.insert(&record).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
