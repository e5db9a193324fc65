// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MongoDB-backed log store

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use audit_core::AuditRecord;
use mongodb::bson::{doc, DateTime as BsonDateTime};
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Collection};
use serde::Serialize;

use crate::store::{AuditStore, StorageError, StoreConnection};

/// Collection that receives every audit record
pub const LOG_COLLECTION: &str = "logs";

/// Connection settings for the log database
#[derive(Clone, Default)]
pub struct MongoConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Log store backed by a MongoDB collection.
///
/// The driver's client is internally pooled and cheap to clone, so clones
/// share one set of connections.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    logs: Collection<LogDocument>,
}

impl MongoStore {
    /// Connect and verify the server answers a `ping`.
    ///
    /// `timeout` bounds the driver's connect and server selection; callers
    /// should still wrap the whole call in their own deadline.
    pub async fn connect(config: &MongoConfig, timeout: Duration) -> Result<Self, StorageError> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| StorageError::Connect(e.to_string()))?;
        options.credential = Some(
            Credential::builder()
                .username(config.username.clone())
                .password(config.password.clone())
                .build(),
        );
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client =
            Client::with_options(options).map_err(|e| StorageError::Connect(e.to_string()))?;
        let database = client.database(&config.database);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::Connect(e.to_string()))?;

        Ok(Self {
            logs: database.collection(LOG_COLLECTION),
            client,
        })
    }
}

#[async_trait]
impl AuditStore for MongoStore {
    async fn insert(&self, record: &AuditRecord) -> Result<(), StorageError> {
        self.logs
            .insert_one(LogDocument::from(record))
            .await
            .map(|_| ())
            .map_err(|e| StorageError::Write(e.to_string()))
    }
}

#[async_trait]
impl StoreConnection for MongoStore {
    async fn close(&self) -> Result<(), StorageError> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}

/// Stored layout: names instead of wire codes, BSON datetime for the timestamp
#[derive(Debug, Serialize)]
struct LogDocument {
    entity: &'static str,
    action: &'static str,
    entity_id: i64,
    timestamp: BsonDateTime,
}

impl From<&AuditRecord> for LogDocument {
    fn from(record: &AuditRecord) -> Self {
        Self {
            entity: record.entity().as_str(),
            action: record.action().as_str(),
            entity_id: record.entity_id(),
            timestamp: BsonDateTime::from_millis(record.timestamp().timestamp_millis()),
        }
    }
}

#[cfg(test)]
#[path = "mongo_tests.rs"]
mod tests;
