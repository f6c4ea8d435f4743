//! Case-insensitive JSON decoding.
//!
//! The backend does not guarantee the casing of field names (`fullName`,
//! `FullName` and `FULLNAME` all occur). Object keys are folded to lowercase
//! with `_` and `-` removed before decoding, and the models name their
//! multi-word fields in that folded form for deserialization.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

/// Fold an object key: lowercase, separators removed
pub fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Recursively fold every object key in `value`.
///
/// Keys that fold to the same name (`userId` and `user_id`) collide. Keys
/// are visited in map order and the last one visited wins; the collision is
/// logged.
pub fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut folded = Map::with_capacity(map.len());
            for (key, value) in map {
                let folded_key = fold_key(&key);
                if folded.insert(folded_key.clone(), fold_keys(value)).is_some() {
                    warn!(key = %key, folded = %folded_key, "Duplicate JSON key after folding");
                }
            }
            Value::Object(folded)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys).collect()),
        other => other,
    }
}

/// Deserialize `body` matching field names case-insensitively
pub fn from_str_ci<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    let value: Value = serde_json::from_str(body)?;
    serde_json::from_value(fold_keys(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(rename = "fullname")]
        full_name: String,
        #[serde(rename = "items", default)]
        items: Vec<Inner>,
    }

    #[derive(Debug, Deserialize)]
    struct Inner {
        #[serde(rename = "sampleid")]
        sample_id: i64,
    }

    #[test]
    fn test_fold_key() {
        assert_eq!(fold_key("fullName"), "fullname");
        assert_eq!(fold_key("FullName"), "fullname");
        assert_eq!(fold_key("FULL_NAME"), "fullname");
        assert_eq!(fold_key("full-name"), "fullname");
    }

    #[test]
    fn test_nested_keys_are_folded() {
        for body in [
            r#"{"fullName": "Jane", "items": [{"sampleId": 7}]}"#,
            r#"{"FullName": "Jane", "Items": [{"SampleId": 7}]}"#,
            r#"{"FULLNAME": "Jane", "ITEMS": [{"SAMPLE_ID": 7}]}"#,
        ] {
            let probe: Probe = from_str_ci(body).unwrap();
            assert_eq!(probe.full_name, "Jane");
            assert_eq!(probe.items[0].sample_id, 7);
        }
    }

    #[test]
    fn test_values_are_untouched() {
        let value = fold_keys(serde_json::json!({"Note": "Keep CASE_as-is"}));
        assert_eq!(value["note"], "Keep CASE_as-is");
    }

    #[test]
    fn test_colliding_keys_keep_last_value() {
        let value = fold_keys(serde_json::json!({"userId": 1, "user_id": 2}));
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(value["userid"], 2);
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(from_str_ci::<Probe>("not json").is_err());
        assert!(from_str_ci::<Vec<Inner>>(r#"{"sampleId": 1}"#).is_err());
    }
}
