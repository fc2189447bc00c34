use std::sync::{Arc, Mutex};

use docmig::serial::deserialize_fields;
use docmig::{
    Change, ChangeError, Command, DocumentStore, ExecuteError, Fields, MemoryStore, RichValue, StoreError,
};
use serde_json::{json, Value};

fn doc(value: Value) -> Fields {
    deserialize_fields(value).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Update(String, Fields),
    Set(String, Fields),
    Delete(String),
}

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<Call>>,
    fail_with: Option<&'static str>,
}

impl Recorder {
    fn record(&self, call: Call) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with {
            Some(msg) => Err(msg.into()),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl DocumentStore for Recorder {
    fn update_doc(&self, path: &str, fields: &Fields) -> Result<(), StoreError> {
        self.record(Call::Update(path.into(), fields.clone()))
    }

    fn set_doc(&self, path: &str, fields: &Fields) -> Result<(), StoreError> {
        self.record(Call::Set(path.into(), fields.clone()))
    }

    fn delete_doc(&self, path: &str) -> Result<(), StoreError> {
        self.record(Call::Delete(path.into()))
    }
}

fn resolved(store: Arc<Recorder>, before: Value, patch: Option<Value>, command: Command) -> Change {
    let mut c = Change::new("items/7", Some(doc(before)), patch.map(doc), command, "", store).unwrap();
    c.resolve().unwrap();
    c
}

#[test]
fn each_command_makes_exactly_one_call() {
    let store = Arc::new(Recorder::default());
    resolved(store.clone(), json!({"a": 1}), Some(json!({"a": 2})), Command::Update).execute().unwrap();
    resolved(store.clone(), json!({}), Some(json!({"b": 1})), Command::Add).execute().unwrap();
    resolved(store.clone(), json!({"b": 1}), Some(json!({"c": 1})), Command::Set).execute().unwrap();
    resolved(store.clone(), json!({"c": 1}), None, Command::Delete).execute().unwrap();

    assert_eq!(
        store.calls(),
        vec![
            Call::Update("items/7".into(), doc(json!({"a": 2}))),
            Call::Set("items/7".into(), doc(json!({"b": 1}))),
            Call::Set("items/7".into(), doc(json!({"c": 1}))),
            Call::Delete("items/7".into()),
        ]
    );
}

#[test]
fn inferred_set_writes_the_filled_in_patch() {
    let store = Arc::new(Recorder::default());
    let mut c = Change::new(
        "items/7",
        Some(doc(json!({"a": 1}))),
        None,
        Command::Unknown,
        r#"[{"op":"add","path":"/b","value":true}]"#,
        store.clone(),
    )
    .unwrap();
    c.resolve().unwrap();
    c.execute().unwrap();
    assert_eq!(store.calls(), vec![Call::Set("items/7".into(), doc(json!({"a": 1, "b": true})))]);
}

#[test]
fn transformer_runs_before_dispatch() {
    let store = Arc::new(Recorder::default());
    let c = resolved(store.clone(), json!({}), Some(json!({"x": 1})), Command::Add);
    c.execute_with(|mut fields| {
        fields.insert("migrated".into(), RichValue::Bool(true));
        fields
    })
    .unwrap();

    assert_eq!(store.calls(), vec![Call::Set("items/7".into(), doc(json!({"x": 1, "migrated": true})))]);
    // the change itself is untouched
    assert_eq!(c.patch(), Some(&doc(json!({"x": 1}))));
}

#[test]
fn unresolved_change_never_reaches_the_store() {
    let store = Arc::new(Recorder::default());
    let mut c = Change::new("items/7", None, Some(doc(json!({"x": 1}))), Command::Unknown, "", store.clone()).unwrap();
    assert!(c.execute().is_err());
    let _ = c.resolve();

    match c.execute() {
        Err(ExecuteError::Unresolved { path, source }) => {
            assert_eq!(path, "items/7");
            assert_eq!(source, ChangeError::MissingBefore("after"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(store.calls().is_empty());
}

#[test]
fn store_errors_are_passed_through() {
    let store = Arc::new(Recorder { fail_with: Some("quota exceeded"), ..Default::default() });
    let c = resolved(store, json!({"a": 1}), None, Command::Delete);
    let err = c.execute().unwrap_err();
    assert!(matches!(err, ExecuteError::Store(_)));
    assert_eq!(err.to_string(), "quota exceeded");
}

#[test]
fn memory_store_sees_update_with_delete_markers() {
    let store = Arc::new(MemoryStore::new().with_doc("items/7", doc(json!({"a": 1, "b": 2}))));
    let before = store.get("items/7");
    let mut c = Change::new(
        "items/7",
        before,
        Some(doc(json!({"a": "<delete>!delete<delete>", "c": 3}))),
        Command::Update,
        "",
        store.clone(),
    )
    .unwrap();
    c.resolve().unwrap();
    c.execute().unwrap();

    assert_eq!(store.get("items/7").as_ref(), c.after());

    let mut undo = c.rollback_change().unwrap();
    undo.resolve().unwrap();
    undo.execute().unwrap();
    assert_eq!(store.get("items/7"), Some(doc(json!({"a": 1, "b": 2}))));
}
