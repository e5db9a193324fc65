// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::client::AuditClient;
use crate::config::Environment;
use audit_core::{Action, Entity, LogEvent};
use audit_storage::{FakeAuditStore, MongoConfig, StoreCall};
use chrono::Utc;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const LOCALHOST: &str = "127.0.0.1:0";

fn event(entity_id: i64) -> LogEvent {
    LogEvent::new(Action::Update, Entity::Book, entity_id, Utc::now())
}

async fn bound(store: FakeAuditStore, shutdown_timeout: Duration) -> Daemon<FakeAuditStore> {
    Daemon::bind(store, LOCALHOST.parse().unwrap(), shutdown_timeout)
        .await
        .unwrap()
}

fn run(daemon: Daemon<FakeAuditStore>) -> (CancellationToken, JoinHandle<()>) {
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(daemon.run(shutdown.clone()));
    (shutdown, handle)
}

async fn join(handle: JoinHandle<()>) {
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("daemon did not stop")
        .unwrap();
}

/// Port that nothing is listening on
async fn free_port() -> u16 {
    let listener = TcpListener::bind(LOCALHOST).await.unwrap();
    listener.local_addr().unwrap().port()
}

fn config(uri: String, port: u16) -> Config {
    Config {
        env: Environment::Local,
        port,
        db_conn: MongoConfig {
            uri,
            username: "audit".to_string(),
            password: "secret".to_string(),
            database: "audit".to_string(),
        },
        startup_timeout: Duration::from_millis(300),
        shutdown_timeout: Duration::from_millis(300),
        log_path: None,
    }
}

#[test]
fn phase_display() {
    let names: Vec<String> = [
        Phase::Init,
        Phase::Connecting,
        Phase::Serving,
        Phase::Draining,
        Phase::Stopped,
    ]
    .iter()
    .map(ToString::to_string)
    .collect();
    assert_eq!(
        names,
        vec!["init", "connecting", "serving", "draining", "stopped"]
    );
}

#[tokio::test]
async fn shutdown_waits_for_in_flight_call_then_closes_store() {
    let (store, gate) = FakeAuditStore::gated();
    let daemon = bound(store.clone(), Duration::from_secs(1)).await;
    let addr = daemon.local_addr().unwrap();
    let (shutdown, handle) = run(daemon);

    let in_flight = tokio::spawn(async move {
        let mut client = AuditClient::connect(addr).await.unwrap();
        client.log(&event(5)).await
    });
    tokio::time::timeout(Duration::from_secs(5), async {
        while store.insert_count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("insert never started");

    shutdown.cancel();

    // New calls are refused once draining starts
    tokio::time::timeout(Duration::from_secs(5), async {
        while TcpStream::connect(addr).await.is_ok() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("listener still accepting");
    assert!(!store.calls().contains(&StoreCall::Close));

    gate.add_permits(1);
    in_flight.await.unwrap().unwrap();
    join(handle).await;

    let calls = store.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], StoreCall::Insert(_)));
    assert_eq!(calls[1], StoreCall::Close);
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn idle_shutdown_closes_store() {
    let store = FakeAuditStore::new();
    let (shutdown, handle) = run(bound(store.clone(), Duration::from_secs(1)).await);

    shutdown.cancel();
    join(handle).await;

    assert_eq!(store.calls(), vec![StoreCall::Close]);
}

#[tokio::test]
async fn slow_close_does_not_block_shutdown() {
    let store = FakeAuditStore::new();
    store.delay_close(Duration::from_secs(30));
    let (shutdown, handle) = run(bound(store.clone(), Duration::from_millis(50)).await);

    shutdown.cancel();
    join(handle).await;

    assert_eq!(store.calls(), vec![StoreCall::Close]);
}

#[tokio::test]
async fn failed_close_does_not_fail_shutdown() {
    let store = FakeAuditStore::new();
    store.fail_close(StorageError::Disconnect("socket reset".to_string()));
    let (shutdown, handle) = run(bound(store.clone(), Duration::from_secs(1)).await);

    shutdown.cancel();
    join(handle).await;

    assert_eq!(store.calls(), vec![StoreCall::Close]);
}

#[tokio::test]
async fn bind_failure_closes_store() {
    let taken = TcpListener::bind(LOCALHOST).await.unwrap();
    let addr = taken.local_addr().unwrap();
    let store = FakeAuditStore::new();

    let result = Daemon::bind(store.clone(), addr, Duration::from_secs(1)).await;

    assert!(matches!(
        result,
        Err(LifecycleError::Listen(ServerError::Bind(..)))
    ));
    assert_eq!(store.calls(), vec![StoreCall::Close]);
}

#[tokio::test]
async fn startup_fails_when_storage_unreachable() {
    let port = free_port().await;
    let uri = "mongodb://127.0.0.1:1/?directConnection=true".to_string();

    let result = startup(&config(uri, port)).await;

    assert!(matches!(result, Err(LifecycleError::Connection(_))));
    assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
}

#[tokio::test]
async fn startup_fails_when_storage_never_answers() {
    // Accepts connections but never speaks the wire protocol
    let blackhole = TcpListener::bind(LOCALHOST).await.unwrap();
    let db_addr = blackhole.local_addr().unwrap();
    let _hold = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = blackhole.accept().await {
            held.push(stream);
        }
    });
    let port = free_port().await;
    let uri = format!("mongodb://{}/?directConnection=true", db_addr);

    let started = Instant::now();
    let result = startup(&config(uri, port)).await;

    assert!(matches!(result, Err(LifecycleError::Connection(_))));
    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
}

#[test]
fn connection_error_message() {
    let err = LifecycleError::Connection(StorageError::Timeout(Duration::from_secs(3)));
    assert_eq!(
        err.to_string(),
        "Storage connection failed: timed out after 3s"
    );
}
