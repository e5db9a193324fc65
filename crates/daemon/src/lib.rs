// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! audit-daemon: network endpoint and process lifecycle for the audit logger
//!
//! The `auditd` binary wires these together; the library exposes them so the
//! endpoint can be embedded or exercised directly, and so callers can use
//! [`AuditClient`].

pub mod client;
pub mod config;
pub mod lifecycle;
pub mod protocol;
pub mod server;
pub mod shutdown;

pub use client::{AuditClient, ClientError};
pub use config::{Config, ConfigError, Environment};
pub use lifecycle::{Daemon, LifecycleError};
pub use protocol::{ErrorCode, Request, Response};
pub use server::{RpcServer, ServerError};
