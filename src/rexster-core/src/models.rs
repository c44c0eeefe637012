use crate::error::MisuseError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Prefix that marks a key as a server-managed system field
pub const SYSTEM_FIELD_MARKER: char = '_';

/// Returns true for keys such as `_id` that never belong in a property mapping
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with(SYSTEM_FIELD_MARKER)
}

/// ElementId is the server-assigned identifier of a vertex or edge.
///
/// Servers hand out either strings or numbers depending on the storage
/// engine; the value is kept exactly as received so it can be sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementId {
    Number(Number),
    String(String),
}

impl ElementId {
    /// Reads an identifier out of a JSON scalar. Anything else is not an id.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(ElementId::Number(n.clone())),
            Value::String(s) => Some(ElementId::String(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ElementId::Number(n) => Value::Number(n.clone()),
            ElementId::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Number(n) => write!(f, "{}", n),
            ElementId::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        ElementId::String(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        ElementId::String(id)
    }
}

impl From<u64> for ElementId {
    fn from(id: u64) -> Self {
        ElementId::Number(id.into())
    }
}

impl From<i64> for ElementId {
    fn from(id: i64) -> Self {
        ElementId::Number(id.into())
    }
}

/// Properties is the user-visible key/value bag of an element.
///
/// Keys starting with `_` are rejected on insertion, so a Properties value
/// never carries system fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Properties {
    entries: Map<String, Value>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the user properties of a raw server object, dropping system fields.
    pub fn from_payload(object: &Map<String, Value>) -> Self {
        let entries = object
            .iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self { entries }
    }

    /// Sets `key`, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, MisuseError> {
        let key = key.into();
        if is_reserved_key(&key) {
            return Err(MisuseError::ReservedKey(key));
        }
        Ok(self.entries.insert(key, value.into()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }
}

impl TryFrom<Map<String, Value>> for Properties {
    type Error = MisuseError;

    fn try_from(entries: Map<String, Value>) -> Result<Self, Self::Error> {
        if let Some(key) = entries.keys().find(|key| is_reserved_key(key)) {
            return Err(MisuseError::ReservedKey(key.clone()));
        }
        Ok(Self { entries })
    }
}

impl TryFrom<Value> for Properties {
    type Error = MisuseError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(entries) => Self::try_from(entries),
            _ => Err(MisuseError::NotAnObject),
        }
    }
}

/// GraphInfo is the server's description of one configured graph
#[derive(Debug, Clone, Deserialize)]
pub struct GraphInfo {
    pub name: String,
    /// Storage engine reported by the server
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub extensions: Value,
}

/// IndexClass is the kind of element an index holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum IndexClass {
    Vertex,
    Edge,
}

impl IndexClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexClass::Vertex => "vertex",
            IndexClass::Edge => "edge",
        }
    }
}

impl TryFrom<String> for IndexClass {
    type Error = String;

    // Some servers report the fully-qualified element class, e.g. `...pgm.Vertex`
    fn try_from(class: String) -> Result<Self, Self::Error> {
        let lower = class.to_ascii_lowercase();
        if lower.ends_with("vertex") {
            Ok(IndexClass::Vertex)
        } else if lower.ends_with("edge") {
            Ok(IndexClass::Edge)
        } else {
            Err(format!("unknown index class `{}`", class))
        }
    }
}

/// IndexType tells who maintains the index entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    Automatic,
    #[default]
    Manual,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::Automatic => "automatic",
            IndexType::Manual => "manual",
        }
    }
}

/// IndexInfo describes one named index as reported by the server
#[derive(Debug, Clone, Deserialize)]
pub struct IndexInfo {
    pub name: String,
    pub class: IndexClass,
    #[serde(rename = "type")]
    pub kind: IndexType,
}

/// Direction selects which incident edges of a vertex to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Out,
    In,
    Both,
}

impl Direction {
    /// Final path segment of the vertex edge listing, e.g. `outE`
    pub fn edges_segment(&self) -> &'static str {
        match self {
            Direction::Out => "outE",
            Direction::In => "inE",
            Direction::Both => "bothE",
        }
    }
}
