// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

#[parameterized(
    register = { Action::Register, "REGISTER", 0 },
    login = { Action::Login, "LOGIN", 1 },
    create = { Action::Create, "CREATE", 2 },
    update = { Action::Update, "UPDATE", 3 },
    get = { Action::Get, "GET", 4 },
    delete = { Action::Delete, "DELETE", 5 },
)]
fn action_mapping(action: Action, name: &str, value: i32) {
    assert_eq!(action.as_str(), name);
    assert_eq!(i32::from(action), value);
    assert_eq!(Action::try_from(value), Ok(action));
    assert_eq!(name.parse::<Action>(), Ok(action));
    assert_eq!(to_name(EnumKind::Action, value), Ok(name));
    assert_eq!(to_value(EnumKind::Action, name), Ok(value));
}

#[parameterized(
    user = { Entity::User, "USER", 0 },
    book = { Entity::Book, "BOOK", 1 },
)]
fn entity_mapping(entity: Entity, name: &str, value: i32) {
    assert_eq!(entity.as_str(), name);
    assert_eq!(i32::from(entity), value);
    assert_eq!(Entity::try_from(value), Ok(entity));
    assert_eq!(name.parse::<Entity>(), Ok(entity));
    assert_eq!(to_name(EnumKind::Entity, value), Ok(name));
    assert_eq!(to_value(EnumKind::Entity, name), Ok(value));
}

#[parameterized(
    negative = { -1 },
    just_past_end = { 6 },
    far_out = { 1000 },
)]
fn unknown_action_value_is_rejected(value: i32) {
    assert_eq!(
        Action::try_from(value),
        Err(MappingError::UnknownEnumValue {
            kind: EnumKind::Action,
            value: value.to_string(),
        })
    );
}

#[parameterized(
    negative = { -1 },
    just_past_end = { 2 },
)]
fn unknown_entity_value_is_rejected(value: i32) {
    assert!(matches!(
        Entity::try_from(value),
        Err(MappingError::UnknownEnumValue { kind: EnumKind::Entity, .. })
    ));
}

#[parameterized(
    lowercase = { "create" },
    empty = { "" },
    entity_name = { "USER" },
    padded = { " CREATE" },
)]
fn unknown_action_name_is_rejected(name: &str) {
    assert!(name.parse::<Action>().is_err());
    assert!(to_value(EnumKind::Action, name).is_err());
}

#[test]
fn unknown_entity_name_is_rejected() {
    let err = "MEDICAMENT".parse::<Entity>().unwrap_err();
    assert_eq!(err.to_string(), "unknown entity value: MEDICAMENT");
}

#[test]
fn serde_uses_member_names() {
    assert_eq!(serde_json::to_string(&Action::Delete).unwrap(), "\"DELETE\"");
    assert_eq!(serde_json::to_string(&Entity::Book).unwrap(), "\"BOOK\"");

    let action: Action = serde_json::from_str("\"LOGIN\"").unwrap();
    assert_eq!(action, Action::Login);
}

#[test]
fn display_matches_name() {
    for action in Action::ALL {
        assert_eq!(action.to_string(), action.as_str());
    }
    for entity in Entity::ALL {
        assert_eq!(entity.to_string(), entity.as_str());
    }
}

proptest! {
    #[test]
    fn action_value_roundtrip(value in any::<i32>()) {
        match Action::try_from(value) {
            Ok(action) => prop_assert_eq!(i32::from(action), value),
            Err(_) => prop_assert!(!(0..=5).contains(&value)),
        }
    }

    #[test]
    fn entity_value_roundtrip(value in any::<i32>()) {
        match to_name(EnumKind::Entity, value) {
            Ok(name) => prop_assert_eq!(to_value(EnumKind::Entity, name), Ok(value)),
            Err(_) => prop_assert!(!(0..=1).contains(&value)),
        }
    }
}
