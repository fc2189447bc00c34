use docmig_json_patch::json_patch::{from_patch_text, to_patch_text};
use docmig_json_patch::{apply_patch, diff, pretty_diff};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[a-z~/]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec(("[a-c~/]{0,3}", inner), 0..5).prop_map(|pairs| {
                let mut map = Map::new();
                for (k, v) in pairs {
                    map.insert(k, v);
                }
                Value::Object(map)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn diff_then_apply_reaches_destination(src in arb_json(), dst in arb_json()) {
        let ops = diff(&src, &dst);
        let patched = apply_patch(src, &ops).expect("generated patch must apply");
        prop_assert_eq!(patched, dst);
    }

    #[test]
    fn patch_text_survives_storage(src in arb_json(), dst in arb_json()) {
        let text = to_patch_text(&diff(&src, &dst));
        let ops = from_patch_text(&text).expect("stored patch must decode");
        prop_assert_eq!(apply_patch(src, &ops).expect("decoded patch must apply"), dst);
    }

    #[test]
    fn pretty_diff_is_empty_only_for_equal_values(src in arb_json(), dst in arb_json()) {
        prop_assert_eq!(pretty_diff(&src, &dst).is_empty(), src == dst);
    }
}

#[test]
fn reverse_diff_restores_source() {
    let before = json!({"foo": "bar", "tags": ["a", "b"], "meta": {"v": 1}});
    let after = json!({"foo": "baz", "tags": ["b"], "extra": null});
    let rollback = diff(&after, &before);
    assert_eq!(apply_patch(after, &rollback).unwrap(), before);
}
