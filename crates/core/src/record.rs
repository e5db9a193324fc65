// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted audit record

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::MappingError;
use crate::event::LogEvent;
use crate::kind::{Action, Entity};

/// One entry in the audit log.
///
/// Fields are private: a record cannot change after it is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    entity: Entity,
    action: Action,
    entity_id: i64,
    timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(entity: Entity, action: Action, entity_id: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            entity,
            action,
            entity_id,
            timestamp,
        }
    }

    /// Build a record from an inbound event.
    ///
    /// `entity_id` and `timestamp` are copied verbatim. The action is
    /// validated before the entity, so an event with both out of range
    /// reports the action.
    pub fn build(event: &LogEvent) -> Result<Self, MappingError> {
        let action = Action::try_from(event.action)?;
        let entity = Entity::try_from(event.entity)?;
        Ok(Self::new(entity, action, event.entity_id, event.timestamp))
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn entity_id(&self) -> i64 {
        self.entity_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
