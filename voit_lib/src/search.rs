//! Key-directed search through nested JSON objects.
//!
//! The election API wraps each payload at a depth that differs per endpoint
//! (and sometimes per municipality), so callers look a payload up by the key
//! it lives under instead of by a fixed path.

use serde_json::{Map, Value};

use crate::error::CrawlError;

/// Returns the first value stored under `key` in `doc`.
///
/// A top-level hit wins outright. Otherwise the top-level values are visited
/// in document order and every object among them is searched the same way;
/// the first non-null hit is returned. Arrays are never descended into.
///
/// `Ok(None)` means the key is absent (or only holds `null`). A `doc` that is
/// not an object is a caller bug and yields [`CrawlError::InvalidInput`].
pub fn find_by_key<'a>(doc: &'a Value, key: &str) -> Result<Option<&'a Value>, CrawlError> {
    match doc {
        Value::Object(map) => Ok(find_in_map(map, key)),
        other => Err(CrawlError::InvalidInput(format!(
            "cannot search for key {:?} in a JSON {}",
            key,
            kind(other)
        ))),
    }
}

fn find_in_map<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(key) {
        // A null hit ends the search at this level, siblings included.
        return (!value.is_null()).then_some(value);
    }
    map.values()
        .filter_map(Value::as_object)
        .find_map(|child| find_in_map(child, key))
}

/// Short name of a JSON value's type, for messages.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_key_wins_over_nested() {
        let doc = json!({"a": {"G": "nested"}, "G": "top"});
        assert_eq!(find_by_key(&doc, "G").unwrap(), Some(&json!("top")));
    }

    #[test]
    fn finds_key_two_levels_deep() {
        let doc = json!({"lv": {"11001": {"G": {"L1": {"nr": 1}}}}});
        assert_eq!(
            find_by_key(&doc, "G").unwrap(),
            Some(&json!({"L1": {"nr": 1}}))
        );
    }

    #[test]
    fn missing_key_is_not_found() {
        let doc = json!({"lv": {"11001": {"nm": "Aartselaar"}}});
        assert_eq!(find_by_key(&doc, "G").unwrap(), None);
    }

    #[test]
    fn does_not_descend_into_arrays() {
        let doc = json!({"items": [{"kd": [1, 2]}]});
        assert_eq!(find_by_key(&doc, "kd").unwrap(), None);
    }

    #[test]
    fn first_branch_in_document_order_wins() {
        let doc = json!({"b": {"x": {"kd": "first"}}, "a": {"kd": "second"}});
        assert_eq!(find_by_key(&doc, "kd").unwrap(), Some(&json!("first")));
    }

    #[test]
    fn nested_null_does_not_stop_sibling_search() {
        let doc = json!({"a": {"kd": null}, "b": {"kd": [1]}});
        assert_eq!(find_by_key(&doc, "kd").unwrap(), Some(&json!([1])));
    }

    #[test]
    fn top_level_null_is_not_found() {
        let doc = json!({"kd": null, "a": {"kd": [1]}});
        assert_eq!(find_by_key(&doc, "kd").unwrap(), None);
    }

    #[test]
    fn non_object_document_is_invalid_input() {
        let doc = json!([{"G": {}}]);
        let err = find_by_key(&doc, "G").unwrap_err();
        assert!(matches!(err, CrawlError::InvalidInput(_)));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn scalar_document_is_invalid_input() {
        assert!(find_by_key(&json!("G"), "G").is_err());
        assert!(find_by_key(&Value::Null, "G").is_err());
    }
}
