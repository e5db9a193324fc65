// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action and entity enumerations
//!
//! Each member has a stable name (what gets persisted) and a wire value
//! (what callers send). Both directions are lookups that fail with
//! [`MappingError::UnknownEnumValue`] for anything outside the fixed sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MappingError;

/// Which enumeration a name or value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    Action,
    Entity,
}

impl EnumKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EnumKind::Action => "action",
            EnumKind::Entity => "entity",
        }
    }
}

impl fmt::Display for EnumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What was done to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Register = 0,
    Login = 1,
    Create = 2,
    Update = 3,
    Get = 4,
    Delete = 5,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Register,
        Action::Login,
        Action::Create,
        Action::Update,
        Action::Get,
        Action::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Register => "REGISTER",
            Action::Login => "LOGIN",
            Action::Create => "CREATE",
            Action::Update => "UPDATE",
            Action::Get => "GET",
            Action::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTER" => Ok(Action::Register),
            "LOGIN" => Ok(Action::Login),
            "CREATE" => Ok(Action::Create),
            "UPDATE" => Ok(Action::Update),
            "GET" => Ok(Action::Get),
            "DELETE" => Ok(Action::Delete),
            other => Err(MappingError::unknown(EnumKind::Action, other)),
        }
    }
}

impl TryFrom<i32> for Action {
    type Error = MappingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::Register),
            1 => Ok(Action::Login),
            2 => Ok(Action::Create),
            3 => Ok(Action::Update),
            4 => Ok(Action::Get),
            5 => Ok(Action::Delete),
            other => Err(MappingError::unknown(EnumKind::Action, other)),
        }
    }
}

impl From<Action> for i32 {
    fn from(action: Action) -> Self {
        action as i32
    }
}

/// Kind of object an action was performed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Entity {
    User = 0,
    Book = 1,
}

impl Entity {
    pub const ALL: [Entity; 2] = [Entity::User, Entity::Book];

    pub fn as_str(self) -> &'static str {
        match self {
            Entity::User => "USER",
            Entity::Book => "BOOK",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Entity::User),
            "BOOK" => Ok(Entity::Book),
            other => Err(MappingError::unknown(EnumKind::Entity, other)),
        }
    }
}

impl TryFrom<i32> for Entity {
    type Error = MappingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Entity::User),
            1 => Ok(Entity::Book),
            other => Err(MappingError::unknown(EnumKind::Entity, other)),
        }
    }
}

impl From<Entity> for i32 {
    fn from(entity: Entity) -> Self {
        entity as i32
    }
}

/// Wire value to member name
pub fn to_name(kind: EnumKind, value: i32) -> Result<&'static str, MappingError> {
    match kind {
        EnumKind::Action => Action::try_from(value).map(Action::as_str),
        EnumKind::Entity => Entity::try_from(value).map(Entity::as_str),
    }
}

/// Member name to wire value
pub fn to_value(kind: EnumKind, name: &str) -> Result<i32, MappingError> {
    match kind {
        EnumKind::Action => name.parse::<Action>().map(i32::from),
        EnumKind::Entity => name.parse::<Entity>().map(i32::from),
    }
}

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;
