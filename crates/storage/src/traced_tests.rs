// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::fake::FakeAuditStore;
use audit_core::{Action, Entity};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn record() -> AuditRecord {
    AuditRecord::new(Entity::User, Action::Login, 9, chrono::Utc::now())
}

#[test]
fn traced_insert_logs_span_fields() {
    let fake = FakeAuditStore::new();
    let traced = TracedAuditStore::new(fake.clone());

    let (logs, result) = with_tracing(|| async move { traced.insert(&record()).await });

    assert!(result.is_ok());
    assert_eq!(fake.records().len(), 1);
    assert!(logs.contains("store.insert"), "logs: {}", logs);
    assert!(logs.contains("entity=\"USER\""), "logs: {}", logs);
    assert!(logs.contains("action=\"LOGIN\""), "logs: {}", logs);
    assert!(logs.contains("entity_id=9"), "logs: {}", logs);
    assert!(logs.contains("appended"), "logs: {}", logs);
}

#[test]
fn traced_insert_passes_error_through() {
    let fake = FakeAuditStore::new();
    fake.fail_inserts(StorageError::Write("replica set down".to_string()));
    let traced = TracedAuditStore::new(fake);

    let (logs, result) = with_tracing(|| async move { traced.insert(&record()).await });

    assert_eq!(
        result,
        Err(StorageError::Write("replica set down".to_string()))
    );
    assert!(logs.contains("append failed"), "logs: {}", logs);
    assert!(logs.contains("replica set down"), "logs: {}", logs);
}

#[test]
fn traced_close_logs_failure() {
    let fake = FakeAuditStore::new();
    fake.fail_close(StorageError::Disconnect("socket reset".to_string()));
    let traced = TracedAuditStore::new(fake);

    let (logs, result) = with_tracing(|| async move { traced.close().await });

    assert!(result.is_err());
    assert!(logs.contains("close failed"), "logs: {}", logs);
}
