use std::sync::Arc;

use chrono::{TimeZone, Utc};
use docmig::serial::{deserialize, serialize};
use docmig::{Change, Command, Fields, MemoryStore, RichValue};
use proptest::prelude::*;

fn arb_leaf() -> impl Strategy<Value = RichValue> {
    prop_oneof![
        Just(RichValue::Null),
        any::<bool>().prop_map(RichValue::Bool),
        any::<i64>().prop_map(RichValue::from),
        "[a-z ]{0,8}".prop_map(RichValue::String),
        (0i64..253_402_300_799, 0u32..1_000_000_000).prop_map(|(secs, nanos)| {
            RichValue::Timestamp(Utc.timestamp_opt(secs, nanos).single().unwrap())
        }),
        "[a-z]{1,6}(/[a-z0-9]{1,6}){0,3}".prop_map(RichValue::Reference),
        Just(RichValue::Delete),
    ]
}

fn arb_value() -> impl Strategy<Value = RichValue> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(RichValue::Array),
            arb_fields_of(inner).prop_map(RichValue::Map),
        ]
    })
}

fn arb_fields_of(value: impl Strategy<Value = RichValue>) -> impl Strategy<Value = Fields> {
    prop::collection::vec(("[a-c~/]{0,3}", value), 0..4).prop_map(|pairs| pairs.into_iter().collect())
}

fn arb_fields() -> impl Strategy<Value = Fields> {
    arb_fields_of(arb_value())
}

fn arb_patch() -> impl Strategy<Value = Fields> {
    prop::collection::vec(("[a-c~/]{0,3}", arb_value()), 1..4).prop_map(|pairs| pairs.into_iter().collect())
}

fn resolved(before: Fields, patch: Fields) -> Change {
    let mut c = Change::new("col/doc", Some(before), Some(patch), Command::Unknown, "", Arc::new(MemoryStore::new()))
        .unwrap();
    c.resolve().expect("field patches always apply");
    c
}

proptest! {
    #[test]
    fn serialization_roundtrips(value in arb_value()) {
        prop_assert_eq!(deserialize(serialize(&value)), value);
    }

    #[test]
    fn rollback_restores_before(before in arb_fields(), patch in arb_patch()) {
        let c = resolved(before.clone(), patch);
        let mut inverse = c.rollback_change().unwrap();
        inverse.resolve().unwrap();
        prop_assert_eq!(inverse.after(), Some(&before));
    }

    #[test]
    fn inferred_command_tracks_emptiness(before in arb_fields(), patch in arb_patch()) {
        let c = resolved(before, patch);
        let after = c.after().unwrap();
        let expected = if after.is_empty() { Command::Delete } else { Command::Set };
        prop_assert_eq!(c.command(), expected);
    }

    #[test]
    fn set_and_add_take_patch_verbatim(before in arb_fields(), patch in arb_fields(), add in any::<bool>()) {
        let command = if add { Command::Add } else { Command::Set };
        let mut c = Change::new("col/doc", Some(before), Some(patch.clone()), command, "", Arc::new(MemoryStore::new()))
            .unwrap();
        c.resolve().unwrap();
        prop_assert_eq!(c.after(), Some(&patch));
        prop_assert_eq!(c.patch(), Some(&patch));
    }

    #[test]
    fn empty_patch_is_filled_from_after(before in arb_fields()) {
        let mut c = Change::new("col/doc", Some(before.clone()), None, Command::Update, "[]", Arc::new(MemoryStore::new()))
            .unwrap();
        c.resolve().unwrap();
        prop_assert_eq!(c.after(), Some(&before));
        prop_assert_eq!(c.patch(), c.after());
    }
}
