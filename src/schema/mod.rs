//! Schema model: a simplified, recursive view of an Avro schema.
//!
//! Only the distinctions the annotation pass needs survive: is a node a
//! union with a null alternative, is it a container (array/map), and what
//! are a record's named fields. Enums, fixeds and references to previously
//! declared named types all collapse into `Named` - opaque leaves that are
//! never nullable and never containers.

pub mod embed;

use std::collections::HashMap;
use std::path::Path;

use crate::errors::{AvromarkError, ErrorKind, Result};

// ============================================================================
// MODEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Null,
    Primitive(PrimitiveKind),
    /// Enum, fixed, or a reference to a named type declared earlier.
    Named(String),
    Record(RecordSchema),
    Array(Box<SchemaNode>),
    Map(Box<SchemaNode>),
    Union(Vec<SchemaNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub schema: SchemaNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub name: String,
    pub fields: Vec<SchemaField>,
    index: HashMap<String, usize>,
}

impl RecordSchema {
    pub fn new(name: String, fields: Vec<SchemaField>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        Self {
            name,
            fields,
            index,
        }
    }

    /// Case-sensitive field lookup by name.
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }
}

impl SchemaNode {
    /// Schema-nullability: true iff this is a union with a null alternative.
    pub fn is_nullable(&self) -> bool {
        match self {
            SchemaNode::Union(alts) => alts.iter().any(|a| matches!(a, SchemaNode::Null)),
            _ => false,
        }
    }

    /// The "true field schema": a two-alternative optional-value union
    /// collapses to its non-null alternative. Wider unions, unions without a
    /// null, and non-unions are returned unchanged. This is the only door to
    /// container detection - every call site reduces the same way.
    pub fn reduced(&self) -> &SchemaNode {
        let SchemaNode::Union(alts) = self else {
            return self;
        };
        if alts.len() != 2 {
            return self;
        }
        match (&alts[0], &alts[1]) {
            (SchemaNode::Null, other) if !matches!(other, SchemaNode::Null) => other,
            (other, SchemaNode::Null) if !matches!(other, SchemaNode::Null) => other,
            _ => self,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, SchemaNode::Array(_) | SchemaNode::Map(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaNode::Null => "null",
            SchemaNode::Primitive(_) => "a primitive",
            SchemaNode::Named(_) => "a named type",
            SchemaNode::Record(_) => "a record",
            SchemaNode::Array(_) => "an array",
            SchemaNode::Map(_) => "a map",
            SchemaNode::Union(_) => "a union",
        }
    }

    pub fn into_record(self) -> Result<RecordSchema> {
        match self {
            SchemaNode::Record(record) => Ok(record),
            other => Err(AvromarkError::new(ErrorKind::SchemaNotRecord {
                actual: other.kind_name().to_string(),
            })),
        }
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parses Avro schema JSON text into the simplified model.
pub fn parse_schema_text(text: &str) -> Result<SchemaNode> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        AvromarkError::new(ErrorKind::SchemaInvalid {
            message: format!("not valid JSON: {e}"),
        })
    })?;
    parse_value(&value)
}

/// Loads and parses an external schema file; the top-level schema must be a
/// record.
pub fn load_schema_file(path: &Path) -> Result<RecordSchema> {
    let text =
        std::fs::read_to_string(path).map_err(|e| AvromarkError::read_failure(path, &e))?;
    parse_schema_text(&text)?.into_record()
}

fn parse_value(value: &serde_json::Value) -> Result<SchemaNode> {
    match value {
        serde_json::Value::String(name) => Ok(parse_type_name(name)),
        serde_json::Value::Array(alternatives) => {
            let alts = alternatives.iter().map(parse_value).collect::<Result<_>>()?;
            Ok(SchemaNode::Union(alts))
        }
        serde_json::Value::Object(obj) => {
            let ty = obj.get("type").and_then(|t| t.as_str()).ok_or_else(|| {
                schema_invalid("schema object is missing a string 'type' key")
            })?;
            match ty {
                "record" | "error" => parse_record(obj),
                "enum" | "fixed" => {
                    let name = required_name(obj)?;
                    Ok(SchemaNode::Named(name))
                }
                "array" => {
                    let items = obj
                        .get("items")
                        .ok_or_else(|| schema_invalid("array schema is missing 'items'"))?;
                    Ok(SchemaNode::Array(Box::new(parse_value(items)?)))
                }
                "map" => {
                    let values = obj
                        .get("values")
                        .ok_or_else(|| schema_invalid("map schema is missing 'values'"))?;
                    Ok(SchemaNode::Map(Box::new(parse_value(values)?)))
                }
                other => Ok(parse_type_name(other)),
            }
        }
        other => Err(schema_invalid(&format!(
            "unexpected JSON value in schema: {other}"
        ))),
    }
}

fn parse_record(obj: &serde_json::Map<String, serde_json::Value>) -> Result<SchemaNode> {
    let name = required_name(obj)?;
    let raw_fields = obj
        .get("fields")
        .and_then(|f| f.as_array())
        .ok_or_else(|| schema_invalid("record schema is missing a 'fields' array"))?;
    let mut fields = Vec::with_capacity(raw_fields.len());
    for raw in raw_fields {
        let field_name = raw
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| schema_invalid("record field is missing a string 'name'"))?;
        let field_type = raw
            .get("type")
            .ok_or_else(|| schema_invalid("record field is missing 'type'"))?;
        fields.push(SchemaField {
            name: field_name.to_string(),
            schema: parse_value(field_type)?,
        });
    }
    Ok(SchemaNode::Record(RecordSchema::new(name, fields)))
}

fn parse_type_name(name: &str) -> SchemaNode {
    match name {
        "null" => SchemaNode::Null,
        "boolean" => SchemaNode::Primitive(PrimitiveKind::Boolean),
        "int" => SchemaNode::Primitive(PrimitiveKind::Int),
        "long" => SchemaNode::Primitive(PrimitiveKind::Long),
        "float" => SchemaNode::Primitive(PrimitiveKind::Float),
        "double" => SchemaNode::Primitive(PrimitiveKind::Double),
        "bytes" => SchemaNode::Primitive(PrimitiveKind::Bytes),
        "string" => SchemaNode::Primitive(PrimitiveKind::String),
        // A reference to a named type declared elsewhere in the schema.
        other => SchemaNode::Named(other.to_string()),
    }
}

fn required_name(obj: &serde_json::Map<String, serde_json::Value>) -> Result<String> {
    obj.get("name")
        .and_then(|n| n.as_str())
        .map(str::to_string)
        .ok_or_else(|| schema_invalid("named schema is missing a string 'name'"))
}

fn schema_invalid(message: &str) -> AvromarkError {
    AvromarkError::new(ErrorKind::SchemaInvalid {
        message: message.to_string(),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> RecordSchema {
        parse_schema_text(text)
            .expect("schema parses")
            .into_record()
            .expect("schema is a record")
    }

    const PERSON: &str = r#"{
        "type": "record",
        "name": "Person",
        "fields": [
            {"name": "id", "type": "string"},
            {"name": "nickname", "type": ["null", "string"]},
            {"name": "tags", "type": {"type": "array", "items": "string"}},
            {"name": "scores", "type": {"type": "map", "values": ["null", "int"]}},
            {"name": "status", "type": {"type": "enum", "name": "Status", "symbols": ["A"]}}
        ]
    }"#;

    #[test]
    fn nullability_is_union_with_null() {
        let person = record(PERSON);
        assert!(!person.field("id").unwrap().schema.is_nullable());
        assert!(person.field("nickname").unwrap().schema.is_nullable());
        assert!(!person.field("tags").unwrap().schema.is_nullable());
        assert!(!person.field("status").unwrap().schema.is_nullable());
    }

    #[test]
    fn two_way_optional_union_reduces() {
        let person = record(PERSON);
        let nickname = &person.field("nickname").unwrap().schema;
        assert_eq!(
            nickname.reduced(),
            &SchemaNode::Primitive(PrimitiveKind::String)
        );
    }

    #[test]
    fn wide_union_does_not_reduce() {
        let node = parse_schema_text(r#"["null", "string", "int"]"#).unwrap();
        assert!(node.is_nullable());
        assert_eq!(node.reduced(), &node);
        assert!(!node.reduced().is_container());
    }

    #[test]
    fn union_without_null_does_not_reduce() {
        let node = parse_schema_text(r#"["string", "int"]"#).unwrap();
        assert!(!node.is_nullable());
        assert_eq!(node.reduced(), &node);
    }

    #[test]
    fn nullable_container_reduces_to_container() {
        let node =
            parse_schema_text(r#"["null", {"type": "array", "items": "string"}]"#).unwrap();
        assert!(node.is_nullable());
        assert!(node.reduced().is_container());
    }

    #[test]
    fn map_values_are_reachable() {
        let person = record(PERSON);
        let scores = &person.field("scores").unwrap().schema;
        let SchemaNode::Map(values) = scores.reduced() else {
            panic!("expected map");
        };
        assert!(values.is_nullable());
    }

    #[test]
    fn field_lookup_is_case_sensitive() {
        let person = record(PERSON);
        assert!(person.field("id").is_some());
        assert!(person.field("Id").is_none());
    }

    #[test]
    fn non_record_top_level_is_rejected() {
        let err = parse_schema_text(r#""string""#)
            .unwrap()
            .into_record()
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::SchemaNotRecord { .. }));
    }

    #[test]
    fn nested_records_parse() {
        let outer = record(
            r#"{
                "type": "record", "name": "Outer",
                "fields": [
                    {"name": "inner", "type": {
                        "type": "record", "name": "Inner",
                        "fields": [{"name": "x", "type": "int"}]
                    }},
                    {"name": "again", "type": "Inner"}
                ]
            }"#,
        );
        assert!(matches!(
            outer.field("inner").unwrap().schema,
            SchemaNode::Record(_)
        ));
        assert!(matches!(
            outer.field("again").unwrap().schema,
            SchemaNode::Named(_)
        ));
    }
}
