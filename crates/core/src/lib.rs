// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! audit-core: domain types for the audit logger
//!
//! This crate provides:
//! - The fixed action/entity enumerations and their name/wire-value mappings
//! - The inbound event shape received per call
//! - The immutable record shape appended to the audit log

pub mod error;
pub mod event;
pub mod kind;
pub mod record;

pub use error::MappingError;
pub use event::LogEvent;
pub use kind::{to_name, to_value, Action, EnumKind, Entity};
pub use record::AuditRecord;
