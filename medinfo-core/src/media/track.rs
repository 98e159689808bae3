// ============================================================================
// medinfo-core/src/media/track.rs
// ============================================================================
//
// TRACK: One Normalized Attribute Record
//
// A track is a kind tag plus a map of normalized attribute names to values,
// kept in report order.
// Names that never occurred are simply absent from the map, so lookups
// return `None` while a present-but-empty attribute is `Some(Text(""))`.
//
// KEY COMPONENTS:
// - AttributeValue: Integer, text or the `other_<name>` list
// - Track: The record, with typed accessors and flattening to plain data
// - coerce_int: Integer coercion used by disambiguation and `get_int`

// ---- External crate imports ----
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---- Standard library imports ----
use std::fmt;

// ---- Internal crate imports ----
use crate::error::CoreResult;

/// Name of the track-kind key in the flattened form.
pub const TRACK_TYPE_KEY: &str = "track_type";

/// Prefix of the companion list holding repeated values.
pub const OTHER_PREFIX: &str = "other_";

/// Value stored under one attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A scalar promoted by disambiguation.
    Integer(i64),
    /// A scalar exactly as the library wrote it.
    Text(String),
    /// Every non-selected occurrence of a repeated attribute.
    List(Vec<String>),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integer value, coercing text the same way disambiguation does.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(value) => Some(*value),
            AttributeValue::Text(text) => coerce_int(text),
            AttributeValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::List(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(value) => write!(f, "{}", value),
            AttributeValue::Text(text) => f.write_str(text),
            AttributeValue::List(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(values: Vec<String>) -> Self {
        AttributeValue::List(values)
    }
}

/// Parses a base-10 integer the way a report value is read.
///
/// Surrounding whitespace is ignored and a leading sign is allowed. Single
/// underscores may separate digits. Anything else, including values that
/// overflow `i64`, is not an integer.
///
/// # Examples
///
/// ```rust
/// use medinfo_core::media::coerce_int;
///
/// assert_eq!(coerce_int(" 1_000 "), Some(1000));
/// assert_eq!(coerce_int("-42"), Some(-42));
/// assert_eq!(coerce_int("1 min 2 s"), None);
/// ```
pub fn coerce_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let bytes = digits.as_bytes();
    if bytes.is_empty() || !bytes[0].is_ascii_digit() || !bytes[bytes.len() - 1].is_ascii_digit() {
        return None;
    }

    let mut cleaned = String::with_capacity(bytes.len() + 1);
    if negative {
        cleaned.push('-');
    }
    let mut previous_underscore = false;
    for &b in bytes {
        match b {
            b'0'..=b'9' => {
                cleaned.push(b as char);
                previous_underscore = false;
            }
            b'_' if !previous_underscore => previous_underscore = true,
            _ => return None,
        }
    }
    cleaned.parse().ok()
}

/// One track of a report.
///
/// Serializes to a flat map: `track_type` plus every attribute in report
/// order. Equality ignores attribute order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(rename = "track_type")]
    kind: String,
    #[serde(flatten)]
    attributes: IndexMap<String, AttributeValue>,
}

impl Track {
    pub fn new(kind: impl Into<String>, attributes: IndexMap<String, AttributeValue>) -> Self {
        Self {
            kind: kind.into(),
            attributes,
        }
    }

    /// The `type` attribute of the track element, e.g. `"Video"`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn attributes(&self) -> &IndexMap<String, AttributeValue> {
        &self.attributes
    }

    /// Value for a normalized name; `None` when it never occurred.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttributeValue::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(AttributeValue::as_int)
    }

    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(AttributeValue::as_list)
    }

    /// Companion list of a repeated attribute.
    pub fn others(&self, name: &str) -> Option<&[String]> {
        self.get_list(&format!("{}{}", OTHER_PREFIX, name))
    }

    pub fn track_id(&self) -> Option<&AttributeValue> {
        self.get("track_id")
    }

    /// Flat map with `track_type` and every attribute.
    pub fn to_data(&self) -> CoreResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuilds a track from [`Track::to_data`] output.
    pub fn from_data(data: Value) -> CoreResult<Self> {
        Ok(serde_json::from_value(data)?)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.track_id() {
            Some(id) => write!(f, "<Track track_id='{}', track_type='{}'>", id, self.kind),
            None => write!(f, "<Track track_id='None', track_type='{}'>", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Track {
        let mut attributes = IndexMap::new();
        attributes.insert("track_id".to_string(), AttributeValue::from("1"));
        attributes.insert("duration".to_string(), AttributeValue::from(4_000));
        attributes.insert(
            "other_duration".to_string(),
            AttributeValue::from(vec!["4 s 0 ms".to_string(), "4 s".to_string()]),
        );
        attributes.insert("title".to_string(), AttributeValue::from(""));
        Track::new("Video", attributes)
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int("42"), Some(42));
        assert_eq!(coerce_int("  7\n"), Some(7));
        assert_eq!(coerce_int("+3"), Some(3));
        assert_eq!(coerce_int("1_000_000"), Some(1_000_000));
        assert_eq!(coerce_int("1__0"), None);
        assert_eq!(coerce_int("_1"), None);
        assert_eq!(coerce_int("1_"), None);
        assert_eq!(coerce_int("-"), None);
        assert_eq!(coerce_int(""), None);
        assert_eq!(coerce_int("4.5"), None);
        assert_eq!(coerce_int("99999999999999999999"), None);
    }

    #[test]
    fn test_absent_is_distinct_from_empty() {
        let track = sample();
        assert_eq!(track.get("missing"), None);
        assert_eq!(track.get_str("title"), Some(""));
        assert!(track.contains("title"));
        assert!(!track.contains("missing"));
    }

    #[test]
    fn test_typed_accessors() {
        let track = sample();
        assert_eq!(track.kind(), "Video");
        assert_eq!(track.get_int("duration"), Some(4000));
        assert_eq!(track.get_int("track_id"), Some(1));
        assert_eq!(track.get_str("duration"), None);
        assert_eq!(track.others("duration").map(|o| o.len()), Some(2));
        assert_eq!(track.get_list("title"), None);
    }

    #[test]
    fn test_to_json_keeps_insertion_order() {
        let json = sample().to_data().unwrap().to_string();
        assert_eq!(
            json,
            r#"{"track_type":"Video","track_id":"1","duration":4000,"other_duration":["4 s 0 ms","4 s"],"title":""}"#
        );

        let mut reordered = IndexMap::new();
        for (name, value) in sample().attributes().iter().rev() {
            reordered.insert(name.clone(), value.clone());
        }
        assert_eq!(Track::new("Video", reordered), sample());
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "<Track track_id='1', track_type='Video'>");
        let menu = Track::new("Menu", IndexMap::new());
        assert_eq!(menu.to_string(), "<Track track_id='None', track_type='Menu'>");
    }

    #[test]
    fn test_to_data_is_flat() {
        let data = sample().to_data().unwrap();
        assert_eq!(
            data,
            json!({
                "track_type": "Video",
                "track_id": "1",
                "duration": 4000,
                "other_duration": ["4 s 0 ms", "4 s"],
                "title": ""
            })
        );
        assert_eq!(Track::from_data(data).unwrap(), sample());
    }

    #[test]
    fn test_from_data_requires_track_type() {
        assert!(Track::from_data(json!({"duration": 1})).is_err());
    }
}
