// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake log store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use audit_core::AuditRecord;
use tokio::sync::Semaphore;

use crate::store::{AuditStore, StorageError, StoreConnection};

/// Recorded store call
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Insert(AuditRecord),
    Close,
}

#[derive(Default)]
struct FakeBehavior {
    insert_error: Option<StorageError>,
    close_error: Option<StorageError>,
    close_delay: Option<Duration>,
}

/// Fake log store for testing
#[derive(Clone, Default)]
pub struct FakeAuditStore {
    calls: Arc<Mutex<Vec<StoreCall>>>,
    records: Arc<Mutex<Vec<AuditRecord>>>,
    behavior: Arc<Mutex<FakeBehavior>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose inserts wait for a permit on the returned semaphore.
    ///
    /// The insert call is recorded before waiting, so tests can observe a
    /// write that is in flight.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let store = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (store, gate)
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Records that were durably appended
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of insert attempts, successful or not
    pub fn insert_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::Insert(_)))
            .count()
    }

    /// Make every subsequent insert fail with `error`
    pub fn fail_inserts(&self, error: StorageError) {
        self.behavior
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert_error = Some(error);
    }

    /// Make close fail with `error`
    pub fn fail_close(&self, error: StorageError) {
        self.behavior
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .close_error = Some(error);
    }

    /// Make close take `delay` before returning
    pub fn delay_close(&self, delay: Duration) {
        self.behavior
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .close_delay = Some(delay);
    }

    fn record_call(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl AuditStore for FakeAuditStore {
    async fn insert(&self, record: &AuditRecord) -> Result<(), StorageError> {
        self.record_call(StoreCall::Insert(record.clone()));

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| StorageError::Write(e.to_string()))?
                .forget();
        }

        let error = self
            .behavior
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert_error
            .clone();
        if let Some(error) = error {
            return Err(error);
        }

        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl StoreConnection for FakeAuditStore {
    async fn close(&self) -> Result<(), StorageError> {
        self.record_call(StoreCall::Close);

        let (delay, error) = {
            let behavior = self.behavior.lock().unwrap_or_else(|e| e.into_inner());
            (behavior.close_delay, behavior.close_error.clone())
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
