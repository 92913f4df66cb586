// End-to-end library tests: parse a generated class, extract its schema,
// run the annotation pass, and check the rewritten source.

use avromark::annotate::{annotate_unit, InjectorConfig};
use avromark::edit::apply_edits;
use avromark::errors::SourceContext;
use avromark::schema::embed::extract_embedded_schema;
use avromark::schema::{parse_schema_text, RecordSchema};
use avromark::syntax;

/// A trimmed-down Avro-generated class with an embedded schema, a builder,
/// and the usual accessor conventions.
const PERSON_JAVA: &str = r#"/**
 * Autogenerated by Avro
 */
package org.example;

import java.util.List;

public class Person {
  public static final org.apache.avro.Schema SCHEMA$ =
      new org.apache.avro.Schema.Parser().parse("{\"type\":\"record\",\"name\":\"Person\",\"fields\":[{\"name\":\"id\",\"type\":\"long\"},{\"name\":\"nickname\",\"type\":[\"null\",\"string\"]},{\"name\":\"tags\",\"type\":{\"type\":\"array\",\"items\":\"string\"}},{\"name\":\"props\",\"type\":{\"type\":\"map\",\"values\":[\"null\",\"string\"]}}]}");

  public long id;
  public java.lang.CharSequence nickname;
  public java.util.List<java.lang.CharSequence> tags;
  public java.util.Map<java.lang.CharSequence, java.lang.CharSequence> props;

  /**
   * Default constructor.
   */
  public Person() {}

  public Person(java.lang.Long id, java.lang.CharSequence nickname) {
    this.id = id;
    this.nickname = nickname;
  }

  public long getId() {
    return id;
  }

  public void setId(long value) {
    this.id = value;
  }

  public java.lang.CharSequence getNickname() {
    return nickname;
  }

  public void setNickname(java.lang.CharSequence value) {
    this.nickname = value;
  }

  public java.util.List<java.lang.CharSequence> getTags() {
    return tags;
  }

  public void setTags(java.util.List<java.lang.CharSequence> value) {
    this.tags = value;
  }

  public java.util.Map<java.lang.CharSequence, java.lang.CharSequence> getProps() {
    return props;
  }

  public static org.example.Person.Builder newBuilder() {
    return new org.example.Person.Builder();
  }

  public static org.example.Person.Builder newBuilder(org.example.Person other) {
    return new org.example.Person.Builder(other);
  }

  public static class Builder {
    private long id;
    private java.lang.CharSequence nickname;
    private org.example.Person.Builder siblingBuilder;

    public long getId() {
      return id;
    }

    public org.example.Person.Builder setId(long value) {
      this.id = value;
      return this;
    }

    public org.example.Person.Builder clearId() {
      return this;
    }

    public java.lang.CharSequence getNickname() {
      return nickname;
    }

    public org.example.Person.Builder setNickname(java.lang.CharSequence value) {
      this.nickname = value;
      return this;
    }

    public org.example.Person.Builder clearNickname() {
      return this;
    }

    public org.example.Person.Builder getSiblingBuilder() {
      return siblingBuilder;
    }

    public org.example.Person.Builder setSiblingBuilder(org.example.Person.Builder value) {
      this.siblingBuilder = value;
      return this;
    }

    public org.example.Person.Builder clearSiblingBuilder() {
      return this;
    }

    public Person build() {
      return new Person();
    }
  }
}
"#;

fn annotate_source(source: &str, schema: Option<&RecordSchema>) -> String {
    let config = InjectorConfig::default();
    let ctx = SourceContext::from_file("Person.java", source);
    let unit = syntax::parse(source, &ctx).expect("parse failed");
    let embedded;
    let schema = match schema {
        Some(s) => s,
        None => {
            embedded = extract_embedded_schema(&unit, &config.sentinel).expect("no schema");
            &embedded
        }
    };
    let outcome = annotate_unit(&unit, schema, &config, source);
    assert!(outcome.mismatches.is_empty(), "{:?}", outcome.mismatches);
    apply_edits(source, &outcome.edits)
}

// ============================================================================
// TOP-LEVEL VERDICTS
// ============================================================================

#[test]
fn marker_imports_are_inserted_once() {
    let out = annotate_source(PERSON_JAVA, None);
    assert_eq!(out.matches("import org.jetbrains.annotations.NotNull;").count(), 1);
    assert_eq!(out.matches("import org.jetbrains.annotations.Nullable;").count(), 1);
    assert_eq!(out.matches("import java.lang.Deprecated;").count(), 1);
}

#[test]
fn non_nullable_schema_field_gets_nonnull_markers() {
    let out = annotate_source(PERSON_JAVA, None);
    assert!(out.contains("@NotNull\n  public long id;"));
    assert!(out.contains("@NotNull\n  public long getId()"));
    assert!(out.contains("public void setId(@NotNull long value)"));
}

#[test]
fn nullable_union_field_gets_nullable_markers() {
    let out = annotate_source(PERSON_JAVA, None);
    assert!(out.contains("@Nullable\n  public java.lang.CharSequence nickname;"));
    assert!(out.contains("@Nullable\n  public java.lang.CharSequence getNickname()"));
    assert!(out.contains("public void setNickname(@Nullable java.lang.CharSequence value)"));
}

#[test]
fn array_elements_are_annotated_recursively() {
    let out = annotate_source(PERSON_JAVA, None);
    assert!(out.contains("@NotNull\n  public java.util.List<@NotNull java.lang.CharSequence> tags;"));
    assert!(out.contains("public java.util.List<@NotNull java.lang.CharSequence> getTags()"));
    assert!(out.contains("setTags(@NotNull java.util.List<@NotNull java.lang.CharSequence> value)"));
}

#[test]
fn map_keys_are_nonnull_and_values_follow_the_schema() {
    let out = annotate_source(PERSON_JAVA, None);
    assert!(out.contains(
        "java.util.Map<@NotNull java.lang.CharSequence, @Nullable java.lang.CharSequence> props;"
    ));
    assert!(out.contains(
        "java.util.Map<@NotNull java.lang.CharSequence, @Nullable java.lang.CharSequence> getProps()"
    ));
}

// ============================================================================
// CONSTRUCTOR DEPRECATION
// ============================================================================

#[test]
fn public_constructors_are_deprecated_with_a_javadoc_tag() {
    let out = annotate_source(PERSON_JAVA, None);
    assert!(out.contains("@Deprecated\n  public Person()"));
    assert!(out.contains("@Deprecated\n  public Person(java.lang.Long id"));
    assert_eq!(
        out.matches("@deprecated Do not use this constructor, use .newBuilder() instead")
            .count(),
        2
    );
    // The documented constructor keeps its existing block.
    assert!(out.contains(" * Default constructor.\n"));
}

// ============================================================================
// BUILDER VERDICTS
// ============================================================================

#[test]
fn builder_fields_are_structurally_nullable() {
    let out = annotate_source(PERSON_JAVA, None);
    // Primitive slot: never null.
    assert!(out.contains("@NotNull\n    private long id;"));
    // Reference slot: optional until set, even though the schema is non-null.
    assert!(out.contains("@Nullable\n    private java.lang.CharSequence nickname;"));
    assert!(out.contains("@Nullable\n    public java.lang.CharSequence getNickname()"));
}

#[test]
fn builder_setters_take_schema_verdicts_and_return_the_builder() {
    let out = annotate_source(PERSON_JAVA, None);
    assert!(out.contains(
        "@NotNull\n    public org.example.Person.Builder setId(@NotNull long value)"
    ));
    assert!(out.contains(
        "@NotNull\n    public org.example.Person.Builder setNickname(@Nullable java.lang.CharSequence value)"
    ));
}

#[test]
fn builder_clearers_for_schema_fields_return_nonnull() {
    let out = annotate_source(PERSON_JAVA, None);
    assert!(out.contains("@NotNull\n    public org.example.Person.Builder clearId()"));
    assert!(out.contains("@NotNull\n    public org.example.Person.Builder clearNickname()"));
}

#[test]
fn builder_only_fields_default_to_nullable() {
    let out = annotate_source(PERSON_JAVA, None);
    assert!(out.contains("@Nullable\n    private org.example.Person.Builder siblingBuilder;"));
    assert!(out.contains("@Nullable\n    public org.example.Person.Builder getSiblingBuilder()"));
    assert!(out.contains("@Nullable\n    public org.example.Person.Builder clearSiblingBuilder()"));
    // The setter still returns the builder itself, so only its parameter
    // takes the nullable default.
    assert!(out.contains(
        "@NotNull\n    public org.example.Person.Builder setSiblingBuilder(@Nullable org.example.Person.Builder value)"
    ));
}

#[test]
fn nullable_array_elements_are_marked_nullable() {
    let schema = parse_schema_text(
        r#"{"type":"record","name":"Notes","fields":[{"name":"lines","type":{"type":"array","items":["null","string"]}}]}"#,
    )
    .unwrap()
    .into_record()
    .unwrap();

    let source = "package p;\n\npublic class Notes {\n  public java.util.List<java.lang.CharSequence> lines;\n\n  public java.util.List<java.lang.CharSequence> getLines() {\n    return lines;\n  }\n\n  public void setLines(java.util.List<java.lang.CharSequence> value) {\n    this.lines = value;\n  }\n}\n";
    let out = annotate_source(source, Some(&schema));
    assert!(out.contains("public java.util.List<@Nullable java.lang.CharSequence> lines;"));
    assert!(out.contains("java.util.List<@Nullable java.lang.CharSequence> getLines()"));
    assert!(out.contains("setLines(@NotNull java.util.List<@Nullable java.lang.CharSequence> value)"));
}

#[test]
fn nested_containers_are_annotated_all_the_way_down() {
    let schema = parse_schema_text(
        r#"{"type":"record","name":"Index","fields":[{"name":"index","type":{"type":"map","values":{"type":"array","items":["null","string"]}}}]}"#,
    )
    .unwrap()
    .into_record()
    .unwrap();

    let source = "package p;\n\npublic class Index {\n  public java.util.Map<java.lang.CharSequence, java.util.List<java.lang.CharSequence>> index;\n\n  public java.util.Map<java.lang.CharSequence, java.util.List<java.lang.CharSequence>> getIndex() {\n    return index;\n  }\n\n  public void setIndex(java.util.Map<java.lang.CharSequence, java.util.List<java.lang.CharSequence>> value) {\n    this.index = value;\n  }\n}\n";
    let out = annotate_source(source, Some(&schema));
    // Map key, then the array value, then the array's own elements.
    let annotated = "java.util.Map<@NotNull java.lang.CharSequence, @NotNull java.util.List<@Nullable java.lang.CharSequence>>";
    assert!(out.contains(&format!("{annotated} index;")));
    assert!(out.contains(&format!("{annotated} getIndex()")));
    assert!(out.contains(&format!("setIndex(@NotNull {annotated} value)")));
}

#[test]
fn factory_methods_are_marked_nonnull() {
    let out = annotate_source(PERSON_JAVA, None);
    assert!(out.contains("@NotNull\n  public static org.example.Person.Builder newBuilder()"));
    assert!(out.contains("newBuilder(@Nullable org.example.Person other)"));
    assert!(out.contains("@NotNull\n    public Person build()"));
}

// ============================================================================
// STABILITY PROPERTIES
// ============================================================================

#[test]
fn untouched_text_is_preserved_byte_for_byte() {
    let out = annotate_source(PERSON_JAVA, None);
    // Removing every inserted token must recover the original exactly.
    // Whole generated blocks strip before single lines, and deeper-indented
    // markers before shallower ones, so no replacement eats a partial match.
    let note = "@deprecated Do not use this constructor, use .newBuilder() instead";
    let stripped = out
        .replace("import org.jetbrains.annotations.NotNull;\n", "")
        .replace("import org.jetbrains.annotations.Nullable;\n", "")
        .replace("import java.lang.Deprecated;\n", "")
        .replace(&format!("/**\n   * {note}\n   */\n  "), "")
        .replace(&format!("   * {note}\n"), "")
        .replace("@Deprecated\n  ", "")
        .replace("@NotNull\n    ", "")
        .replace("@NotNull\n  ", "")
        .replace("@Nullable\n    ", "")
        .replace("@Nullable\n  ", "")
        .replace("@NotNull ", "")
        .replace("@Nullable ", "");
    assert_eq!(stripped, PERSON_JAVA);
}

#[test]
fn a_second_pass_is_a_fixed_point() {
    let config = InjectorConfig::default();
    let first = annotate_source(PERSON_JAVA, None);

    let ctx = SourceContext::from_file("Person.java", first.as_str());
    let unit = syntax::parse(&first, &ctx).expect("reparse failed");
    let schema = extract_embedded_schema(&unit, &config.sentinel).expect("no schema");
    let outcome = annotate_unit(&unit, &schema, &config, &first);
    assert!(outcome.edits.is_empty(), "second pass added {:?}", outcome.edits);
    assert!(outcome.mismatches.is_empty());
}

// ============================================================================
// EXTERNAL SCHEMA AND MISMATCHES
// ============================================================================

#[test]
fn an_external_schema_covers_classes_without_a_sentinel() {
    let schema = parse_schema_text(
        r#"{"type":"record","name":"Pair","fields":[{"name":"left","type":["null","string"]}]}"#,
    )
    .unwrap()
    .into_record()
    .unwrap();

    let source = "package p;\n\npublic class Pair {\n  public java.lang.CharSequence left;\n}\n";
    let out = annotate_source(source, Some(&schema));
    assert!(out.contains("@Nullable\n  public java.lang.CharSequence left;"));
}

#[test]
fn a_container_schema_over_a_bare_type_is_reported_not_fatal() {
    let schema = parse_schema_text(
        r#"{"type":"record","name":"Box","fields":[{"name":"tags","type":{"type":"array","items":"string"}},{"name":"id","type":"long"}]}"#,
    )
    .unwrap()
    .into_record()
    .unwrap();

    let source =
        "package p;\n\npublic class Box {\n  public java.lang.Object tags;\n  public long id;\n}\n";
    let config = InjectorConfig::default();
    let ctx = SourceContext::from_file("Box.java", source);
    let unit = syntax::parse(source, &ctx).unwrap();
    let outcome = annotate_unit(&unit, &schema, &config, source);

    assert_eq!(outcome.mismatches.len(), 1);
    assert!(outcome.mismatches[0].to_string().contains("tags"));
    // The other field and the container's own member marker still land.
    let out = apply_edits(source, &outcome.edits);
    assert!(out.contains("@NotNull\n  public java.lang.Object tags;"));
    assert!(out.contains("@NotNull\n  public long id;"));
}

#[test]
fn a_mismatched_accessor_rolls_back_the_field_container_edits() {
    let schema = parse_schema_text(
        r#"{"type":"record","name":"Box","fields":[{"name":"tags","type":{"type":"array","items":"string"}}]}"#,
    )
    .unwrap()
    .into_record()
    .unwrap();

    // The field declares the expected generic shape but the getter erases it,
    // so the container step mismatches only after the field's element edit
    // was already produced.
    let source = "package p;\n\npublic class Box {\n  public java.util.List<java.lang.CharSequence> tags;\n\n  public java.lang.Object getTags() {\n    return tags;\n  }\n}\n";
    let config = InjectorConfig::default();
    let ctx = SourceContext::from_file("Box.java", source);
    let unit = syntax::parse(source, &ctx).unwrap();
    let outcome = annotate_unit(&unit, &schema, &config, source);

    assert_eq!(outcome.mismatches.len(), 1);
    let out = apply_edits(source, &outcome.edits);
    // Member markers stay; the element annotation is withdrawn with the rest
    // of the container step, so the trio is consistently unrecursed.
    assert!(out.contains("@NotNull\n  public java.util.List<java.lang.CharSequence> tags;"));
    assert!(out.contains("@NotNull\n  public java.lang.Object getTags()"));
    assert!(!out.contains("@NotNull java.lang.CharSequence"));
}

#[test]
fn enum_units_are_recognized_for_skipping() {
    let source = "package p;\n\npublic enum Suit {\n  SPADES, HEARTS, DIAMONDS, CLUBS\n}\n";
    let ctx = SourceContext::from_file("Suit.java", source);
    let unit = syntax::parse(source, &ctx).unwrap();
    assert!(unit.first_type_is_enum());
}
