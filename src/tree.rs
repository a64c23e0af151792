//! Report tree intermediate representation.
//!
//! This module normalizes a stored task result (JSON text, or arbitrary raw
//! text) into a tagged tree that every renderer consumes:
//! - Scalar / Sequence / Mapping mirror the JSON shapes, with mapping keys
//!   kept in insertion order
//! - a root mapping whose first key is a recognized section name becomes a
//!   `Section`, which the Markdown renderer lays out with a specialized
//!   template
//!
//! Normalization is total: text that fails JSON parsing becomes a raw text
//! scalar, and a recognized key with a non-mapping value is demoted to a
//! plain mapping. The tree is built once and traversed read-only.

use serde_json::Value;

/// Leaf value of the report tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Null,
}

impl Scalar {
    /// Render the scalar the way it appears in report bodies.
    pub fn display(&self) -> String {
        match self {
            Scalar::Text(text) => text.clone(),
            Scalar::Number(number) => number.to_string(),
            Scalar::Bool(value) => value.to_string(),
            Scalar::Null => "null".to_string(),
        }
    }
}

/// Mapping entries in original key order.
pub type Fields = Vec<(String, ReportNode)>;

/// Domain sections the Markdown renderer knows a dedicated layout for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Competitor analysis produced by the research agent.
    CompetitorAnalysis,
}

impl SectionKind {
    /// The root key that identifies this section in a task result.
    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::CompetitorAnalysis => "analise_concorrentes",
        }
    }

    /// Look up a section kind by root key.
    pub fn from_key(key: &str) -> Option<SectionKind> {
        match key {
            "analise_concorrentes" => Some(SectionKind::CompetitorAnalysis),
            _ => None,
        }
    }
}

/// A recognized root section and its (already normalized) fields.
#[derive(Debug, Clone, PartialEq)]
pub struct KnownSection {
    pub kind: SectionKind,
    pub fields: Fields,
}

impl KnownSection {
    /// Look up a direct field by key.
    pub fn field(&self, key: &str) -> Option<&ReportNode> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// One node of the normalized report tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportNode {
    Scalar(Scalar),
    Sequence(Vec<ReportNode>),
    Mapping(Fields),
    /// Root-level only; never produced below the root.
    Section(KnownSection),
}

/// What the office exporters walk after the single-key unwrap:
/// raw text, named fields, or a bare sequence of items.
#[derive(Debug, Clone, Copy)]
pub enum ReportContent<'a> {
    Raw(&'a Scalar),
    Fields(&'a [(String, ReportNode)]),
    Items(&'a [ReportNode]),
}

/// Layout class of a sequence, decided by its first item: mappings render
/// as a table, anything else as a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceShape {
    Empty,
    Mappings,
    Scalars,
}

impl SequenceShape {
    pub fn of(items: &[ReportNode]) -> SequenceShape {
        match items.first() {
            None => SequenceShape::Empty,
            Some(ReportNode::Mapping(_)) => SequenceShape::Mappings,
            Some(_) => SequenceShape::Scalars,
        }
    }
}

impl ReportNode {
    /// Normalize stored result text. Text that does not parse as JSON is
    /// carried through verbatim as a raw text scalar.
    pub fn from_result_text(text: &str) -> ReportNode {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => ReportNode::from_root_value(&value),
            Err(err) => {
                log::debug!("result is not JSON ({}), keeping raw text", err);
                ReportNode::Scalar(Scalar::Text(text.to_string()))
            }
        }
    }

    /// Normalize a parsed root value, detecting recognized sections.
    pub fn from_root_value(value: &Value) -> ReportNode {
        if let Value::Object(map) = value {
            if let Some(section) = ReportNode::detect_section(map) {
                return section;
            }
        }
        ReportNode::from_value(value)
    }

    /// A root object becomes a `Section` when its first key is a recognized
    /// section name holding an object.
    fn detect_section(map: &serde_json::Map<String, Value>) -> Option<ReportNode> {
        if let Some((first_key, first_value)) = map.iter().next() {
            if let Some(kind) = SectionKind::from_key(first_key) {
                if let Value::Object(inner) = first_value {
                    return Some(ReportNode::Section(KnownSection {
                        kind,
                        fields: mapping_fields(inner),
                    }));
                }
            }
        }
        None
    }

    /// Normalize a value below the root (no section detection).
    pub fn from_value(value: &Value) -> ReportNode {
        match value {
            Value::Null => ReportNode::Scalar(Scalar::Null),
            Value::Bool(b) => ReportNode::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => ReportNode::Scalar(Scalar::Number(n.clone())),
            Value::String(s) => ReportNode::Scalar(Scalar::Text(s.clone())),
            Value::Array(items) => {
                ReportNode::Sequence(items.iter().map(ReportNode::from_value).collect())
            }
            Value::Object(map) => ReportNode::Mapping(mapping_fields(map)),
        }
    }

    /// The content the office exporters walk. A root mapping with exactly
    /// one key unwraps to that key's value; a recognized section unwraps to
    /// its fields.
    pub fn content(&self) -> ReportContent<'_> {
        match self {
            ReportNode::Scalar(scalar) => ReportContent::Raw(scalar),
            ReportNode::Sequence(items) => ReportContent::Items(items),
            ReportNode::Section(section) => ReportContent::Fields(&section.fields),
            ReportNode::Mapping(fields) if fields.len() == 1 => match &fields[0].1 {
                ReportNode::Scalar(scalar) => ReportContent::Raw(scalar),
                ReportNode::Sequence(items) => ReportContent::Items(items),
                ReportNode::Mapping(inner) => ReportContent::Fields(inner),
                ReportNode::Section(section) => ReportContent::Fields(&section.fields),
            },
            ReportNode::Mapping(fields) => ReportContent::Fields(fields),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ReportNode::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Look up a direct field by key on mappings and sections.
    pub fn field(&self, key: &str) -> Option<&ReportNode> {
        match self {
            ReportNode::Mapping(fields) => {
                fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            ReportNode::Section(section) => section.field(key),
            _ => None,
        }
    }

    /// Displayable text of a direct scalar field, if present.
    pub fn field_display(&self, key: &str) -> Option<String> {
        self.field(key).and_then(ReportNode::as_scalar).map(Scalar::display)
    }

    /// Scalars display as themselves, anything deeper as compact JSON.
    pub fn display_or_json(&self) -> String {
        match self {
            ReportNode::Scalar(scalar) => scalar.display(),
            other => other.to_value().to_string(),
        }
    }

    /// Convert back to a JSON value (sections re-wrap under their key).
    pub fn to_value(&self) -> Value {
        match self {
            ReportNode::Scalar(Scalar::Text(text)) => Value::String(text.clone()),
            ReportNode::Scalar(Scalar::Number(n)) => Value::Number(n.clone()),
            ReportNode::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            ReportNode::Scalar(Scalar::Null) => Value::Null,
            ReportNode::Sequence(items) => {
                Value::Array(items.iter().map(ReportNode::to_value).collect())
            }
            ReportNode::Mapping(fields) => Value::Object(
                fields.iter().map(|(k, v)| (k.clone(), v.to_value())).collect(),
            ),
            ReportNode::Section(section) => {
                let inner = Value::Object(
                    section.fields.iter().map(|(k, v)| (k.clone(), v.to_value())).collect(),
                );
                let mut map = serde_json::Map::new();
                map.insert(section.kind.key().to_string(), inner);
                Value::Object(map)
            }
        }
    }

    /// Pretty-printed JSON of this subtree.
    pub fn to_pretty_json(&self) -> String {
        let value = self.to_value();
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }
}

fn mapping_fields(map: &serde_json::Map<String, Value>) -> Fields {
    map.iter().map(|(k, v)| (k.clone(), ReportNode::from_value(v))).collect()
}

/// Header keys for a tabular sequence: the first mapping item's keys in
/// original order. Later items align to these, whatever keys they carry.
pub fn table_headers(items: &[ReportNode]) -> Vec<String> {
    match items.first() {
        Some(ReportNode::Mapping(fields)) => fields.iter().map(|(k, _)| k.clone()).collect(),
        _ => Vec::new(),
    }
}

/// Turn a result key into a display label: underscores become spaces and
/// every word is capitalized ("faixa_preco" -> "Faixa Preco").
pub fn display_key(key: &str) -> String {
    key.replace('_', " ").split_whitespace().map(capitalize).collect::<Vec<_>>().join(" ")
}

/// Capitalize the first character and lowercase the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
        }
        None => String::new(),
    }
}
