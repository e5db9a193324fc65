// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain errors

use crate::kind::EnumKind;
use thiserror::Error;

/// Errors from translating between enum names and wire values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("unknown {kind} value: {value}")]
    UnknownEnumValue { kind: EnumKind, value: String },
}

impl MappingError {
    pub(crate) fn unknown(kind: EnumKind, value: impl ToString) -> Self {
        MappingError::UnknownEnumValue {
            kind,
            value: value.to_string(),
        }
    }
}
