use serde_json::Value;
use thiserror::Error;

/// Why a model reply could not be used as a planner result.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("reply has the wrong shape: {0}")]
    UnexpectedShape(String),
}

/// Remove markdown code fences models like to wrap JSON in.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Decode a model reply as JSON after stripping code fences.
pub fn parse(raw: &str) -> Result<Value, ParseError> {
    Ok(serde_json::from_str(&strip_code_fences(raw))?)
}

/// Expected structure of a planner's decoded reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// An object carrying at least one of the listed keys.
    Mapping { any_of: &'static [&'static str] },
    /// An array, or an object holding the array under `key`.
    Listing { key: &'static str },
    /// A non-empty object or a non-empty array of hotels.
    Lodging,
}

impl ResultShape {
    /// Accept `value` as-is, unwrap it, or reject it.
    pub fn accept(&self, value: Value) -> Result<Value, ParseError> {
        match self {
            ResultShape::Mapping { any_of } => match &value {
                Value::Object(map) if any_of.iter().any(|key| map.contains_key(*key)) => Ok(value),
                _ => Err(ParseError::UnexpectedShape(format!(
                    "expected an object with one of {any_of:?}"
                ))),
            },
            ResultShape::Listing { key } => match value {
                Value::Array(_) => Ok(value),
                Value::Object(mut map) => match map.remove(*key) {
                    Some(list @ Value::Array(_)) => Ok(list),
                    _ => Err(ParseError::UnexpectedShape(format!(
                        "expected an array or an object with `{key}` array"
                    ))),
                },
                _ => Err(ParseError::UnexpectedShape(format!(
                    "expected an array or an object with `{key}` array"
                ))),
            },
            ResultShape::Lodging => match &value {
                Value::Object(map) if !map.is_empty() => Ok(value),
                Value::Array(items) if !items.is_empty() => Ok(value),
                _ => Err(ParseError::UnexpectedShape(
                    "expected hotel details".to_string(),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TRANSPORT: ResultShape = ResultShape::Mapping {
        any_of: &["flights", "carRental"],
    };
    const TIPS: ResultShape = ResultShape::Listing { key: "localTips" };

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fences("  plain  "), "plain");
    }

    #[test]
    fn test_parse_fenced_json() {
        let value = parse("```json\n{\"flights\": \"direct\"}\n```").unwrap();
        assert_eq!(value, json!({"flights": "direct"}));
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse("```json\nSorry, I cannot help with that.\n```").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
    }

    #[test]
    fn test_mapping_shape() {
        let value = json!({"flights": {"outbound": "x"}});
        assert_eq!(TRANSPORT.accept(value.clone()).unwrap(), value);
        assert!(TRANSPORT.accept(json!({})).is_err());
        assert!(TRANSPORT.accept(json!(["flights"])).is_err());
    }

    #[test]
    fn test_listing_shape() {
        assert_eq!(TIPS.accept(json!(["a", "b"])).unwrap(), json!(["a", "b"]));
        assert_eq!(
            TIPS.accept(json!({"localTips": ["a"], "extra": 1})).unwrap(),
            json!(["a"])
        );
        assert!(TIPS.accept(json!({"tips": ["a"]})).is_err());
        assert!(TIPS.accept(json!({"localTips": "a"})).is_err());
        assert!(TIPS.accept(json!("a")).is_err());
    }

    #[test]
    fn test_lodging_shape() {
        let shape = ResultShape::Lodging;
        assert!(shape.accept(json!({"hotel": "Ritz"})).is_ok());
        assert!(shape.accept(json!([{"hotel": "Ritz"}])).is_ok());
        assert!(shape.accept(json!({})).is_err());
        assert!(shape.accept(json!([])).is_err());
    }
}
