// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound audit event

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::{Action, Entity};

/// An event as received from a caller.
///
/// `action` and `entity` carry raw wire values and are not trusted until
/// they have been mapped through [`Action`] and [`Entity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub action: i32,
    pub entity: i32,
    pub entity_id: i64,
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(action: Action, entity: Entity, entity_id: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            action: action.into(),
            entity: entity.into(),
            entity_id,
            timestamp,
        }
    }
}
