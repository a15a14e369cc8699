//! Codec Module
//!
//! JSON encoding of cache values to the string form kept in the store.

use serde_json::Value;

use crate::error::{CacheError, Result};

/// Serializes a value to its stored representation.
pub fn encode(value: &Value) -> Result<String> {
    serde_json::to_string(value).map_err(|e| CacheError::Codec(e.to_string()))
}

/// Parses a stored representation back into a value.
///
/// Returns the raw `serde_json` error so the engine can decide how to react
/// to corrupt data.
pub fn decode(raw: &str) -> std::result::Result<Value, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_is_deterministic() {
        let value = json!({"b": 1, "a": [true, null, "x"]});
        assert_eq!(encode(&value).unwrap(), encode(&value).unwrap());
    }

    #[test]
    fn test_decode_nested() {
        let value = decode(r#"{"ansible_facts":{"os":"linux","cpus":[0,1]}}"#).unwrap();
        assert_eq!(value["ansible_facts"]["cpus"][1], 1);
    }

    #[test]
    fn test_unicode_survives() {
        let value = json!("héllo wörld ✓ 日本");
        let encoded = encode(&value).unwrap();
        assert_eq!(decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_decode_malformed() {
        assert!(decode("{not json").is_err());
        assert!(decode("").is_err());
    }
}
