//! Decoding of element payloads returned by the server.
//!
//! Elements arrive as flat JSON objects where system fields (`_id`,
//! `_type`, `_outV`, `_inV`, `_label`) sit next to user properties. The
//! `_type` tag is resolved once here; callers decide what to do with
//! payloads they do not recognize.

use crate::error::MisuseError;
use crate::models::{ElementId, Properties};
use serde_json::{Map, Value};

pub const ID: &str = "_id";
pub const TYPE: &str = "_type";
pub const OUT_V: &str = "_outV";
pub const IN_V: &str = "_inV";
pub const LABEL: &str = "_label";

/// ElementPayload is a server element resolved by its `_type` tag
#[derive(Debug, Clone, PartialEq)]
pub enum ElementPayload {
    Vertex(VertexData),
    Edge(EdgeData),
    /// A result whose `_type` is missing or not an element type
    Unrecognized(Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexData {
    pub id: ElementId,
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    pub id: ElementId,
    pub properties: Properties,
    pub out_id: ElementId,
    pub in_id: ElementId,
    pub label: String,
}

impl ElementPayload {
    pub fn decode(value: &Value) -> Result<Self, MisuseError> {
        let tag = value.get(TYPE).and_then(Value::as_str);
        match tag {
            Some("vertex") => VertexData::decode(value).map(ElementPayload::Vertex),
            Some("edge") => EdgeData::decode(value).map(ElementPayload::Edge),
            other => Ok(ElementPayload::Unrecognized(other.map(str::to_string))),
        }
    }
}

impl VertexData {
    pub fn decode(value: &Value) -> Result<Self, MisuseError> {
        let object = as_object(value)?;
        Ok(Self {
            id: id_field(object, ID)?,
            properties: Properties::from_payload(object),
        })
    }
}

impl EdgeData {
    pub fn decode(value: &Value) -> Result<Self, MisuseError> {
        let object = as_object(value)?;
        let label = object
            .get(LABEL)
            .and_then(Value::as_str)
            .ok_or(MisuseError::MissingField(LABEL))?;

        Ok(Self {
            id: id_field(object, ID)?,
            properties: Properties::from_payload(object),
            out_id: id_field(object, OUT_V)?,
            in_id: id_field(object, IN_V)?,
            label: label.to_string(),
        })
    }
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, MisuseError> {
    value.as_object().ok_or(MisuseError::MissingField(ID))
}

fn id_field(object: &Map<String, Value>, field: &'static str) -> Result<ElementId, MisuseError> {
    object
        .get(field)
        .and_then(ElementId::from_value)
        .ok_or(MisuseError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_vertex() {
        let payload = ElementPayload::decode(&json!({
            "_id": 1, "_type": "vertex", "name": "Fred"
        }))
        .unwrap();

        match payload {
            ElementPayload::Vertex(v) => {
                assert_eq!(v.id, ElementId::from(1u64));
                assert_eq!(v.properties.get("name"), Some(&json!("Fred")));
                assert_eq!(v.properties.len(), 1);
            }
            other => panic!("expected vertex, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_edge_moves_endpoints_out_of_properties() {
        let payload = ElementPayload::decode(&json!({
            "_id": "e7", "_type": "edge", "_outV": "1", "_inV": "2",
            "_label": "married_to", "since": 1960
        }))
        .unwrap();

        let ElementPayload::Edge(e) = payload else {
            panic!("expected edge");
        };
        assert_eq!(e.id, ElementId::from("e7"));
        assert_eq!(e.out_id, ElementId::from("1"));
        assert_eq!(e.in_id, ElementId::from("2"));
        assert_eq!(e.label, "married_to");
        assert_eq!(e.properties.get("since"), Some(&json!(1960)));
        assert!(!e.properties.contains_key("_label"));
        assert!(!e.properties.contains_key("_outV"));
        assert!(!e.properties.contains_key("_inV"));
    }

    #[test]
    fn test_decode_unrecognized_tags() {
        assert_eq!(
            ElementPayload::decode(&json!({"_id": 1, "_type": "path"})).unwrap(),
            ElementPayload::Unrecognized(Some("path".to_string()))
        );
        assert_eq!(
            ElementPayload::decode(&json!({"_id": 1})).unwrap(),
            ElementPayload::Unrecognized(None)
        );
        assert_eq!(
            ElementPayload::decode(&json!(42)).unwrap(),
            ElementPayload::Unrecognized(None)
        );
    }

    #[test]
    fn test_missing_id_is_misuse() {
        assert_eq!(
            VertexData::decode(&json!({"name": "nobody"})),
            Err(MisuseError::MissingField(ID))
        );
        assert_eq!(
            ElementPayload::decode(&json!({"_type": "vertex"})),
            Err(MisuseError::MissingField(ID))
        );
    }

    #[test]
    fn test_edge_without_endpoints_is_misuse() {
        assert_eq!(
            EdgeData::decode(&json!({"_id": 3, "_inV": 2, "_label": "knows"})),
            Err(MisuseError::MissingField(OUT_V))
        );
        assert_eq!(
            EdgeData::decode(&json!({"_id": 3, "_outV": 1, "_inV": 2})),
            Err(MisuseError::MissingField(LABEL))
        );
    }
}
