// Serde helpers for response fields the backend may omit, null out, or send with
// the wrong shape. Anything that does not fit the target type becomes "absent"
// instead of failing the whole response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Optional field: wrong type reads as None
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| serde_json::from_value(v).ok()))
}

// Optional string: wrong type or empty/blank reads as None
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

// List field: non-arrays read as empty, elements that do not fit are dropped
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

// Boolean flag: anything but `true` reads as false
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(raw, Some(Value::Bool(true))))
}

/// A value the backend sends either as a JSON number or as a string
/// (costs, subscores).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    // Numeric reading, accepting "1,500" and " 42 " style strings
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) if n.is_finite() => Some(*n),
            NumberOrText::Number(_) => None,
            NumberOrText::Text(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, NumberOrText::Text(s) if s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "optional")]
        count: Option<u32>,
        #[serde(default, deserialize_with = "text")]
        note: Option<String>,
        #[serde(default, deserialize_with = "list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "flag")]
        on: bool,
    }

    #[test]
    fn wrong_shapes_become_absent() {
        let probe: Probe = serde_json::from_value(json!({
            "count": "seven",
            "note": 12,
            "tags": "not-a-list",
            "on": "yes"
        }))
        .unwrap();
        assert_eq!(probe.count, None);
        assert_eq!(probe.note, None);
        assert!(probe.tags.is_empty());
        assert!(!probe.on);
    }

    #[test]
    fn missing_and_null_fields_default() {
        let probe: Probe = serde_json::from_value(json!({ "note": null })).unwrap();
        assert_eq!(probe.count, None);
        assert_eq!(probe.note, None);
        assert!(probe.tags.is_empty());
    }

    #[test]
    fn list_drops_only_bad_elements() {
        let probe: Probe = serde_json::from_value(json!({ "tags": ["a", null, 3, "b"], "note": "  " })).unwrap();
        assert_eq!(probe.tags, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(probe.note, None);
    }

    #[test]
    fn number_or_text_parses_loosely() {
        assert_eq!(NumberOrText::Number(3.0).as_f64(), Some(3.0));
        assert_eq!(NumberOrText::Text("1,500".into()).as_f64(), Some(1500.0));
        assert_eq!(NumberOrText::Text(" 8 ".into()).as_f64(), Some(8.0));
        assert_eq!(NumberOrText::Text("unknown".into()).as_f64(), None);
        assert!(NumberOrText::Text(" ".into()).is_blank());
    }
}
