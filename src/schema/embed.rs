//! Schema source locator for the embedded-schema mode.
//!
//! Avro codegen bakes the writer schema into every generated class as a
//! static field whose initializer passes a (possibly concatenated) string
//! literal to the schema parser. This module digs that literal back out,
//! strips the escape backslashes, and re-parses it.

use crate::errors::{AvromarkError, ErrorKind, Result};
use crate::syntax::CompilationUnit;

use super::{parse_schema_text, RecordSchema};

/// The generated static field holding the schema literal.
pub const DEFAULT_SENTINEL: &str = "SCHEMA$";

/// Extracts and parses the schema embedded in a generated class.
///
/// Fails with a schema-extraction error when the sentinel field is absent or
/// its initializer carries no string literal; fails with a schema error when
/// the recovered text is not a record schema.
pub fn extract_embedded_schema(unit: &CompilationUnit, sentinel: &str) -> Result<RecordSchema> {
    let field = unit
        .all_fields()
        .find(|f| f.is_static && f.name == sentinel)
        .ok_or_else(|| {
            AvromarkError::new(ErrorKind::SentinelMissing {
                sentinel: sentinel.to_string(),
            })
            .with_help("pass an explicit schema file for classes that do not embed one")
        })?;

    if field.initializer_literals.is_empty() {
        return Err(AvromarkError::new(ErrorKind::SentinelNotLiteral {
            sentinel: sentinel.to_string(),
        }));
    }

    // The literal chunks concatenate into escaped JSON; dropping every
    // backslash recovers the raw schema text.
    let joined: String = field.initializer_literals.concat();
    let schema_text = joined.replace('\\', "");

    parse_schema_text(&schema_text)?.into_record()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceContext;
    use crate::syntax;

    fn parse_unit(source: &str) -> CompilationUnit {
        let ctx = SourceContext::from_file("Test.java", source);
        syntax::parse(source, &ctx).expect("parse failed")
    }

    #[test]
    fn recovers_schema_from_escaped_literal() {
        let source = r#"
public class Person {
  public static final org.apache.avro.Schema SCHEMA$ =
      new org.apache.avro.Schema.Parser().parse("{\"type\":\"record\",\"name\":\"Person\",\"fields\":[{\"name\":\"id\",\"type\":\"string\"}]}");
}
"#;
        let unit = parse_unit(source);
        let record = extract_embedded_schema(&unit, DEFAULT_SENTINEL).expect("schema");
        assert_eq!(record.name, "Person");
        assert!(record.field("id").is_some());
    }

    #[test]
    fn concatenated_chunks_are_joined_in_order() {
        let source = r#"
public class Person {
  public static final org.apache.avro.Schema SCHEMA$ =
      new org.apache.avro.Schema.Parser().parse(
          "{\"type\":\"record\",\"name\":\"Person\"," + "\"fields\":[]}");
}
"#;
        let unit = parse_unit(source);
        let record = extract_embedded_schema(&unit, DEFAULT_SENTINEL).expect("schema");
        assert_eq!(record.name, "Person");
        assert!(record.fields.is_empty());
    }

    #[test]
    fn missing_sentinel_is_reported() {
        let unit = parse_unit("public class Person { private int x; }");
        let err = extract_embedded_schema(&unit, DEFAULT_SENTINEL).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::SentinelMissing { .. }));
    }

    #[test]
    fn non_literal_initializer_is_reported() {
        let source = "public class Person { public static final org.apache.avro.Schema SCHEMA$ = OTHER; }";
        let unit = parse_unit(source);
        let err = extract_embedded_schema(&unit, DEFAULT_SENTINEL).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::SentinelNotLiteral { .. }));
    }
}
