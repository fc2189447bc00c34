//! JSON Pointer (RFC 6901) helpers used to address patch targets.
//!
//! ```
//! use docmig_json_patch::pointer::{format_pointer, parse_pointer};
//!
//! let path = parse_pointer("/profile/a~1b");
//! assert_eq!(path, vec!["profile".to_string(), "a/b".to_string()]);
//! assert_eq!(format_pointer(&path), "/profile/a~1b");
//! ```

use serde_json::Value;

/// A parsed pointer: one unescaped component per step.
pub type Path = Vec<String>;

/// Replaces `~1` with `/` and `~0` with `~`.
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 first, otherwise "~01" would decode to "/" instead of "~1"
    component.replace("~1", "/").replace("~0", "~")
}

/// Replaces `~` with `~0` and `/` with `~1`.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parses a pointer string. The empty string is the root.
///
/// Returns `None` when a non-empty pointer does not start with `/`.
pub fn try_parse_pointer(pointer: &str) -> Option<Path> {
    if pointer.is_empty() {
        return Some(Vec::new());
    }
    let rest = pointer.strip_prefix('/')?;
    Some(rest.split('/').map(unescape_component).collect())
}

/// Lenient variant of [`try_parse_pointer`]: a missing leading `/` is
/// tolerated.
pub fn parse_pointer(pointer: &str) -> Path {
    match try_parse_pointer(pointer) {
        Some(path) => path,
        None => pointer.split('/').map(unescape_component).collect(),
    }
}

pub fn format_pointer(path: &[String]) -> String {
    let mut out = String::with_capacity(path.len() * 8);
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// True when `child` lies strictly below `parent`.
pub fn is_child(parent: &[String], child: &[String]) -> bool {
    child.len() > parent.len() && child[..parent.len()] == parent[..]
}

/// Looks up the value at `path`. Array steps must be decimal indices; `-`
/// never resolves.
pub fn get<'a>(val: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = val;
    for step in path {
        current = match current {
            Value::Object(map) => map.get(step)?,
            Value::Array(arr) => arr.get(parse_index(step)?)?,
            _ => return None,
        };
    }
    Some(current)
}

pub fn get_mut<'a>(val: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = val;
    for step in path {
        current = match current {
            Value::Object(map) => map.get_mut(step)?,
            Value::Array(arr) => {
                let idx = parse_index(step)?;
                arr.get_mut(idx)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Parses an array index step. Leading zeros and signs are rejected.
pub fn parse_index(step: &str) -> Option<usize> {
    if step.is_empty() || (step.len() > 1 && step.starts_with('0')) {
        return None;
    }
    if !step.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    step.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_root_and_escapes() {
        assert_eq!(try_parse_pointer(""), Some(vec![]));
        assert_eq!(try_parse_pointer("/"), Some(vec![String::new()]));
        assert_eq!(
            try_parse_pointer("/a~0b/c~1d"),
            Some(vec!["a~b".to_string(), "c/d".to_string()])
        );
        assert_eq!(try_parse_pointer("foo"), None);
        assert_eq!(parse_pointer("foo/bar"), vec!["foo", "bar"]);
    }

    #[test]
    fn tilde_one_is_decoded_before_tilde_zero() {
        assert_eq!(unescape_component("~01"), "~1");
    }

    #[test]
    fn format_escapes_components() {
        assert_eq!(format_pointer(&[]), "");
        assert_eq!(format_pointer(&["a/b".to_string(), "~".to_string()]), "/a~1b/~0");
    }

    #[test]
    fn get_walks_objects_and_arrays() {
        let doc = json!({"list": [{"x": 1}, {"x": 2}]});
        let path = parse_pointer("/list/1/x");
        assert_eq!(get(&doc, &path), Some(&json!(2)));
        assert_eq!(get(&doc, &parse_pointer("/list/01/x")), None);
        assert_eq!(get(&doc, &parse_pointer("/list/-")), None);
    }

    #[test]
    fn child_relationship() {
        let parent = parse_pointer("/a");
        assert!(is_child(&parent, &parse_pointer("/a/b")));
        assert!(!is_child(&parent, &parse_pointer("/a")));
        assert!(!is_child(&parent, &parse_pointer("/ab")));
    }
}
