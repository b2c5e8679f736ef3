//! Safe traversal of arbitrarily nested event bodies.
//!
//! Bus events carry no fixed schema — shapes drift between upstream schema
//! versions, and fields go missing. Every multi-level read in a classifier
//! goes through `nested_get` so that absence of any kind collapses to `None`
//! instead of panicking.

use serde_json::Value;

/// Walk `root` one key at a time, returning the value at the end of `path`.
///
/// Returns `None` as soon as a step is missing, the current value is not an
/// object, or the path tries to index into a scalar.
pub fn nested_get<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = root;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// String at `path`, or `None` if absent or not a string.
pub fn nested_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    nested_get(root, path)?.as_str()
}

/// Boolean truthiness at `path`; absent, `null`, or non-bool are `false`.
pub fn nested_bool(root: &Value, path: &[&str]) -> bool {
    nested_get(root, path)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walks_nested_objects() {
        let body = json!({"pullrequest": {"project": {"fullname": "rpms/buildah"}}});
        assert_eq!(
            nested_str(&body, &["pullrequest", "project", "fullname"]),
            Some("rpms/buildah")
        );
    }

    #[test]
    fn missing_key_returns_none() {
        let body = json!({"pullrequest": {"project": {}}});
        assert_eq!(nested_get(&body, &["pullrequest", "project", "fullname"]), None);
    }

    #[test]
    fn indexing_into_scalar_returns_none() {
        let body = json!({"pullrequest": "not-an-object"});
        assert_eq!(nested_get(&body, &["pullrequest", "project"]), None);
    }

    #[test]
    fn indexing_into_array_returns_none() {
        let body = json!({"comments": [{"user": "alice"}]});
        assert_eq!(nested_get(&body, &["comments", "user"]), None);
    }

    #[test]
    fn empty_path_returns_root() {
        let body = json!({"a": 1});
        assert_eq!(nested_get(&body, &[]), Some(&body));
    }

    #[test]
    fn wrong_type_string_accessor_returns_none() {
        let body = json!({"id": 42});
        assert_eq!(nested_str(&body, &["id"]), None);
    }

    #[test]
    fn bool_accessor_collapses_absence_to_false() {
        let body = json!({"pullrequest": {"merged": true}});
        assert!(nested_bool(&body, &["pullrequest", "merged"]));
        assert!(!nested_bool(&body, &["pullrequest", "closed"]));
        assert!(!nested_bool(&json!({"merged": "yes"}), &["merged"]));
    }
}
