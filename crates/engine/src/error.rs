// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ingestion

use audit_core::MappingError;
use audit_storage::StorageError;
use thiserror::Error;

/// Errors returned for a single ingested event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error(transparent)]
    UnknownEnumValue(#[from] MappingError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
