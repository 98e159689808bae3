// ============================================================================
// medinfo-core/src/media/builder.rs
// ============================================================================
//
// MODEL BUILDER: From Report XML to Tracks
//
// Building happens in two phases. Collection walks the XML and groups raw
// values by normalized attribute name, in encounter order. Disambiguation
// is a pure function from those groups to the final Track: single values
// stay text, repeated values get one scalar (integer when any occurrence
// is one) and an `other_<name>` list with the rest.
//
// Two report layouts are accepted: `<File><track/>…</File>` and
// `<Mediainfo><File><track/>…</File></Mediainfo>`.

// ---- External crate imports ----
use indexmap::IndexMap;
use roxmltree::{Document, Node, ParsingOptions};

// ---- Standard library imports ----
use std::collections::{HashMap, HashSet};

// ---- Internal crate imports ----
use super::track::{AttributeValue, OTHER_PREFIX, TRACK_TYPE_KEY, Track, coerce_int};
use crate::error::{CoreError, CoreResult};

/// Raw values of one track element, grouped by normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTrack {
    pub kind: String,
    /// `(name, values)` in order of first occurrence.
    pub fields: Vec<(String, Vec<String>)>,
}

impl RawTrack {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Vec::new(),
        }
    }

    /// Appends one occurrence, grouping it with earlier ones of the same name.
    pub fn push(&mut self, name: String, value: String) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((name, vec![value])),
        }
    }
}

/// Lower-cases a tag, trims whitespace then underscores; `id` becomes `track_id`.
pub fn normalize_name(tag: &str) -> String {
    let name = tag.to_lowercase();
    let name = name.trim().trim_matches('_');
    if name == "id" {
        "track_id".to_string()
    } else {
        name.to_string()
    }
}

/// Parses a complete XML report into tracks, in document order.
pub fn parse_report(xml: &str) -> CoreResult<Vec<Track>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)?;
    let root = doc.root_element();

    let track_nodes: Vec<Node> = if root.has_tag_name("File") {
        child_elements(root, "track").collect()
    } else {
        child_elements(root, "File")
            .flat_map(|file| child_elements(file, "track"))
            .collect()
    };

    log::debug!("Report contains {} tracks", track_nodes.len());

    track_nodes
        .into_iter()
        .map(|node| collect_track(&doc, node).map(disambiguate))
        .collect()
}

fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.has_tag_name(name))
}

fn collect_track(doc: &Document, node: Node) -> CoreResult<RawTrack> {
    let kind = node.attribute("type").ok_or_else(|| {
        let pos = doc.text_pos_at(node.range().start);
        CoreError::XmlParse {
            message: "track element has no type attribute".to_string(),
            line: pos.row,
            column: pos.col,
        }
    })?;

    let mut raw = RawTrack::new(kind);
    for child in node.children().filter(Node::is_element) {
        let name = normalize_name(child.tag_name().name());
        let value = child.text().unwrap_or_default().to_string();
        raw.push(name, value);
    }
    Ok(raw)
}

/// Picks the scalar for a repeated attribute.
///
/// The first value wins when it is an integer. Otherwise the first integer
/// among the rest is promoted and the first value moves to the end of the
/// list. With no integer at all the first value stays as text.
fn select_scalar(mut values: Vec<String>) -> (AttributeValue, Vec<String>) {
    let first = values.remove(0);
    if let Some(value) = coerce_int(&first) {
        return (AttributeValue::Integer(value), values);
    }

    match values.iter().enumerate().find_map(|(i, v)| coerce_int(v).map(|n| (i, n))) {
        Some((index, value)) => {
            values.remove(index);
            values.push(first);
            (AttributeValue::Integer(value), values)
        }
        None => (AttributeValue::Text(first), values),
    }
}

/// Turns collected raw values into the final record.
///
/// Attributes keep the order of first occurrence; each generated
/// `other_<name>` list follows its scalar.
pub fn disambiguate(raw: RawTrack) -> Track {
    let RawTrack { kind, fields } = raw;

    let companions: HashSet<String> = fields
        .iter()
        .filter(|(name, values)| values.len() > 1 || name == TRACK_TYPE_KEY)
        .map(|(name, _)| format!("{}{}", OTHER_PREFIX, name))
        .collect();

    // Literal elements named like a generated list are merged into it.
    let (literal, fields): (Vec<_>, Vec<_>) = fields
        .into_iter()
        .partition(|(name, _)| companions.contains(name));
    let mut literal: HashMap<String, Vec<String>> = literal.into_iter().collect();

    let mut attributes = IndexMap::new();
    for (name, values) in fields {
        let other_name = format!("{}{}", OTHER_PREFIX, name);
        let mut others = if name == TRACK_TYPE_KEY {
            // The kind already occupies this name.
            let mut others = vec![kind.clone()];
            others.extend(values);
            others
        } else if values.len() == 1 {
            let value = values.into_iter().next().unwrap_or_default();
            attributes.insert(name, AttributeValue::Text(value));
            continue;
        } else {
            let (scalar, others) = select_scalar(values);
            attributes.insert(name, scalar);
            others
        };
        if let Some(extra) = literal.remove(&other_name) {
            others.extend(extra);
        }
        attributes.insert(other_name, AttributeValue::List(others));
    }

    Track::new(kind, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Format_Version"), "format_version");
        assert_eq!(normalize_name("_Title_"), "title");
        assert_eq!(normalize_name(" __Id "), "track_id");
        assert_eq!(normalize_name("ID"), "track_id");
        assert_eq!(normalize_name("Id_String"), "id_string");
    }

    #[test]
    fn test_select_scalar_first_integer_wins() {
        let (scalar, others) = select_scalar(strings(&["3000", "3 s", "3s 0ms"]));
        assert_eq!(scalar, AttributeValue::Integer(3000));
        assert_eq!(others, strings(&["3 s", "3s 0ms"]));
    }

    #[test]
    fn test_select_scalar_promotes_later_integer() {
        let (scalar, others) = select_scalar(strings(&["1 024 kb/s", "x", "1024000", "42"]));
        assert_eq!(scalar, AttributeValue::Integer(1_024_000));
        assert_eq!(others, strings(&["x", "42", "1 024 kb/s"]));
    }

    #[test]
    fn test_select_scalar_without_integer() {
        let (scalar, others) = select_scalar(strings(&["AVC", "Advanced Video Codec"]));
        assert_eq!(scalar, AttributeValue::Text("AVC".to_string()));
        assert_eq!(others, strings(&["Advanced Video Codec"]));
    }

    #[test]
    fn test_disambiguate_single_values_stay_text() {
        let mut raw = RawTrack::new("General");
        raw.push("file_size".to_string(), "5988".to_string());
        let track = disambiguate(raw);
        assert_eq!(track.get("file_size"), Some(&AttributeValue::from("5988")));
        assert!(!track.contains("other_file_size"));
    }

    #[test]
    fn test_disambiguate_track_type_element() {
        let mut raw = RawTrack::new("Video");
        raw.push("track_type".to_string(), "7".to_string());
        let track = disambiguate(raw);
        assert_eq!(track.kind(), "Video");
        assert_eq!(track.others("track_type"), Some(strings(&["Video", "7"]).as_slice()));
    }

    #[test]
    fn test_disambiguate_literal_other_element_merges_into_companion() {
        let mut raw = RawTrack::new("Audio");
        raw.push("other_bit_rate".to_string(), "literal".to_string());
        raw.push("bit_rate".to_string(), "128000".to_string());
        raw.push("bit_rate".to_string(), "128 kb/s".to_string());
        let track = disambiguate(raw);
        assert_eq!(track.get_int("bit_rate"), Some(128_000));
        assert_eq!(
            track.others("bit_rate"),
            Some(strings(&["128 kb/s", "literal"]).as_slice())
        );

        let mut raw = RawTrack::new("Audio");
        raw.push("other_language".to_string(), "en".to_string());
        let track = disambiguate(raw);
        assert_eq!(track.get_str("other_language"), Some("en"));
    }

    #[test]
    fn test_disambiguate_keeps_report_order() {
        let mut raw = RawTrack::new("General");
        raw.push("format".to_string(), "MPEG-4".to_string());
        raw.push("file_size".to_string(), "5988".to_string());
        raw.push("file_size".to_string(), "5.85 KiB".to_string());
        raw.push("duration".to_string(), "4000".to_string());
        let track = disambiguate(raw);
        let names: Vec<&str> = track.attributes().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["format", "file_size", "other_file_size", "duration"]);
    }

    #[test]
    fn test_parse_report_layouts() {
        let modern = r#"<?xml version="1.0" encoding="UTF-8"?>
<Mediainfo version="24.06">
  <File>
    <track type="General"><Format>Matroska</Format></track>
    <track type="Video"><ID>1</ID></track>
  </File>
</Mediainfo>"#;
        let legacy = r#"<File>
  <track type="General"><Format>Matroska</Format></track>
  <track type="Video"><ID>1</ID></track>
</File>"#;

        let a = parse_report(modern).unwrap();
        let b = parse_report(legacy).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a, b);
        assert_eq!(a[1].get_str("track_id"), Some("1"));
    }

    #[test]
    fn test_parse_report_empty_element_is_present() {
        let tracks =
            parse_report(r#"<File><track type="General"><Title/></track></File>"#).unwrap();
        assert_eq!(tracks[0].get_str("title"), Some(""));
        assert_eq!(tracks[0].get("comment"), None);
    }

    #[test]
    fn test_parse_report_errors_carry_position() {
        match parse_report("<File>\n<track type=\"General\">\n</File>") {
            Err(CoreError::XmlParse { line, .. }) => assert!(line >= 2),
            other => panic!("Unexpected result: {:?}", other),
        }

        match parse_report("<File>\n  <track><A>1</A></track>\n</File>") {
            Err(CoreError::XmlParse { line, column, .. }) => {
                assert_eq!((line, column), (2, 3));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
