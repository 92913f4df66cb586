//! The schema-driven annotation pass.
//!
//! Joins the role classifier, the nullability resolver and the container
//! recursion engine: walks every declaration of a parsed unit, matches it to
//! a schema field by structural role and naming convention, computes a
//! NonNull/Nullable verdict, and emits the corresponding text insertions.
//! The pass is a pure function over (unit, schema, config, source) - it
//! returns the edit list and any field-scoped structural mismatches instead
//! of mutating anything.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::edit::{line_indent, Edit};
use crate::errors::{AvromarkError, ErrorKind, Result};
use crate::schema::{RecordSchema, SchemaField, SchemaNode};
use crate::syntax::{AnnotationUse, CompilationUnit, FieldDecl, MethodDecl, TypeUse};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Marker names and naming conventions. Process-wide configuration carried
/// as a value, not free-floating constants.
#[derive(Debug, Clone)]
pub struct InjectorConfig {
    pub nonnull: String,
    pub nullable: String,
    pub deprecated: String,
    /// Static field holding the embedded schema literal.
    pub sentinel: String,
    pub getter_prefix: String,
    pub setter_prefix: String,
    pub clearer_prefix: String,
    pub build_method: String,
    pub new_builder_method: String,
    /// Body of the `@deprecated` Javadoc tag added to public constructors.
    pub deprecation_note: String,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            nonnull: "org.jetbrains.annotations.NotNull".to_string(),
            nullable: "org.jetbrains.annotations.Nullable".to_string(),
            deprecated: "java.lang.Deprecated".to_string(),
            sentinel: crate::schema::embed::DEFAULT_SENTINEL.to_string(),
            getter_prefix: "get".to_string(),
            setter_prefix: "set".to_string(),
            clearer_prefix: "clear".to_string(),
            build_method: "build".to_string(),
            new_builder_method: "newBuilder".to_string(),
            deprecation_note: "Do not use this constructor, use .newBuilder() instead"
                .to_string(),
        }
    }
}

pub static DEFAULT_CONFIG: Lazy<InjectorConfig> = Lazy::new(InjectorConfig::default);

impl InjectorConfig {
    fn marker(&self, verdict: Verdict) -> &str {
        match verdict {
            Verdict::NonNull => &self.nonnull,
            Verdict::Nullable => &self.nullable,
        }
    }

    /// Accessor name for a field: prefix + capitalized field name.
    /// This string convention is the public matching contract.
    pub fn accessor_name(prefix: &str, field: &str) -> String {
        let mut name = String::with_capacity(prefix.len() + field.len());
        name.push_str(prefix);
        let mut chars = field.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
        name
    }
}

/// The nullability decision for one declaration or type-use node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    NonNull,
    Nullable,
}

impl Verdict {
    pub fn from_schema(schema: &SchemaNode) -> Self {
        if schema.is_nullable() {
            Verdict::Nullable
        } else {
            Verdict::NonNull
        }
    }
}

/// Result of one pass: insertions to apply plus any structural mismatches,
/// which are field-scoped and do not fail the file.
#[derive(Debug, Default)]
pub struct AnnotateOutcome {
    pub edits: Vec<Edit>,
    pub mismatches: Vec<AvromarkError>,
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Runs the full annotation pass over one parsed unit.
pub fn annotate_unit(
    unit: &CompilationUnit,
    schema: &RecordSchema,
    config: &InjectorConfig,
    source: &str,
) -> AnnotateOutcome {
    let mut pass = Pass {
        unit,
        schema,
        config,
        source,
        index: MethodIndex::build(unit),
        out: AnnotateOutcome::default(),
    };
    pass.run();
    pass.out
}

// ============================================================================
// PASS
// ============================================================================

/// Method lookup split by structural role, built once per unit so field
/// matching never rescans the tree.
struct MethodIndex<'a> {
    top_level: HashMap<&'a str, Vec<&'a MethodDecl>>,
    nested: HashMap<&'a str, Vec<&'a MethodDecl>>,
}

impl<'a> MethodIndex<'a> {
    fn build(unit: &'a CompilationUnit) -> Self {
        let mut top_level: HashMap<&str, Vec<&MethodDecl>> = HashMap::new();
        let mut nested: HashMap<&str, Vec<&MethodDecl>> = HashMap::new();
        for method in unit.all_methods() {
            let bucket = if method.top_level {
                &mut top_level
            } else {
                &mut nested
            };
            bucket.entry(method.name.as_str()).or_default().push(method);
        }
        Self { top_level, nested }
    }

    fn lookup(&self, top_level: bool, name: &str) -> &[&'a MethodDecl] {
        let map = if top_level { &self.top_level } else { &self.nested };
        map.get(name).map_or(&[], |v| v.as_slice())
    }
}

struct Pass<'a> {
    unit: &'a CompilationUnit,
    schema: &'a RecordSchema,
    config: &'a InjectorConfig,
    source: &'a str,
    index: MethodIndex<'a>,
    out: AnnotateOutcome,
}

impl<'a> Pass<'a> {
    fn run(&mut self) {
        self.insert_imports();
        self.deprecate_public_ctors();
        let fields: Vec<&FieldDecl> = self.unit.all_fields().collect();
        for field in fields {
            match (field.top_level, self.schema.field(&field.name)) {
                (true, Some(schema_field)) => self.annotate_top_level_field(field, schema_field),
                (true, None) => {} // SCHEMA$, MODEL$, serialVersionUID, ...
                (false, Some(schema_field)) => self.annotate_builder_field(field, schema_field),
                (false, None) => self.annotate_builder_only_field(field),
            }
        }
        self.mark_factory_methods();
    }

    // ========================================================================
    // IMPORTS
    // ========================================================================

    fn insert_imports(&mut self) {
        let at = self.unit.import_insert_at;
        for marker in [
            self.config.nonnull.clone(),
            self.config.nullable.clone(),
            self.config.deprecated.clone(),
        ] {
            if !self.unit.has_import(&marker) {
                self.out.edits.push(Edit::new(at, format!("import {marker};\n")));
            }
        }
    }

    // ========================================================================
    // CONSTRUCTOR DEPRECATION
    // ========================================================================

    fn deprecate_public_ctors(&mut self) {
        let ctors: Vec<_> = self.unit.all_ctors().collect();
        for ctor in ctors {
            if !ctor.is_public || has_marker(&ctor.annotations, &self.config.deprecated) {
                continue;
            }
            let indent = line_indent(self.source, ctor.insert_at).to_string();
            let note = &self.config.deprecation_note;
            match ctor.doc {
                Some(doc) => {
                    let doc_text = &self.source[doc.start..doc.end];
                    let close = doc.start + doc_text.rfind("*/").unwrap_or(doc_text.len());
                    if doc_text.contains('\n') {
                        // Multi-line block: give the tag its own line above
                        // the closing delimiter.
                        let line_start =
                            self.source[..close].rfind('\n').map_or(close, |i| i + 1);
                        self.out.edits.push(Edit::new(
                            line_start,
                            format!("{indent} * @deprecated {note}\n"),
                        ));
                    } else {
                        self.out
                            .edits
                            .push(Edit::new(close, format!("@deprecated {note} ")));
                    }
                }
                None => {
                    self.out.edits.push(Edit::new(
                        ctor.insert_at,
                        format!("/**\n{indent} * @deprecated {note}\n{indent} */\n{indent}"),
                    ));
                }
            }
            self.out.edits.push(Edit::new(
                ctor.insert_at,
                format!("@{}\n{indent}", simple_name(&self.config.deprecated)),
            ));
        }
    }

    // ========================================================================
    // TOP-LEVEL FIELDS - verdicts come from the schema alone
    // ========================================================================

    fn annotate_top_level_field(&mut self, field: &FieldDecl, schema_field: &SchemaField) {
        let verdict = Verdict::from_schema(&schema_field.schema);
        self.member_edit(field.insert_at, &field.annotations, verdict);

        let getter = InjectorConfig::accessor_name(&self.config.getter_prefix, &field.name);
        for method in self.index.lookup(true, &getter).to_vec() {
            if method.params.is_empty() {
                self.member_edit(method.insert_at, &method.annotations, verdict);
            }
        }

        let setter = InjectorConfig::accessor_name(&self.config.setter_prefix, &field.name);
        for method in self.index.lookup(true, &setter).to_vec() {
            if let [param] = method.params.as_slice() {
                self.inline_edit(param.insert_at, &param.annotations, verdict);
            }
        }

        self.annotate_field_containers(field, schema_field, true, &getter, &setter);
    }

    // ========================================================================
    // BUILDER FIELDS - structural nullability plus schema-driven setters
    // ========================================================================

    fn annotate_builder_field(&mut self, field: &FieldDecl, schema_field: &SchemaField) {
        // A builder field mirroring a schema field is reference-typed and
        // optional until set, whatever the schema's union shape says.
        let structural = if field.ty.primitive {
            Verdict::NonNull
        } else {
            Verdict::Nullable
        };
        self.member_edit(field.insert_at, &field.annotations, structural);

        let getter = InjectorConfig::accessor_name(&self.config.getter_prefix, &field.name);
        for method in self.index.lookup(false, &getter).to_vec() {
            if method.params.is_empty() {
                self.member_edit(method.insert_at, &method.annotations, structural);
            }
        }

        let clearer = InjectorConfig::accessor_name(&self.config.clearer_prefix, &field.name);
        for method in self.index.lookup(false, &clearer).to_vec() {
            if method.params.is_empty() {
                self.member_edit(method.insert_at, &method.annotations, Verdict::NonNull);
            }
        }

        let setter = InjectorConfig::accessor_name(&self.config.setter_prefix, &field.name);
        let schema_verdict = Verdict::from_schema(&schema_field.schema);
        for method in self.index.lookup(false, &setter).to_vec() {
            if let [param] = method.params.as_slice() {
                self.inline_edit(param.insert_at, &param.annotations, schema_verdict);
                // The setter itself returns the builder; absent values go
                // through the clearer, not a null return.
                self.member_edit(method.insert_at, &method.annotations, Verdict::NonNull);
            }
        }

        self.annotate_field_containers(field, schema_field, false, &getter, &setter);
    }

    fn annotate_builder_only_field(&mut self, field: &FieldDecl) {
        // Pure builder bookkeeping (nested-record builders and the like):
        // nullable until explicitly set.
        self.member_edit(field.insert_at, &field.annotations, Verdict::Nullable);

        let getter = InjectorConfig::accessor_name(&self.config.getter_prefix, &field.name);
        for method in self.index.lookup(false, &getter).to_vec() {
            if method.params.is_empty() {
                self.member_edit(method.insert_at, &method.annotations, Verdict::Nullable);
            }
        }

        let clearer = InjectorConfig::accessor_name(&self.config.clearer_prefix, &field.name);
        for method in self.index.lookup(false, &clearer).to_vec() {
            if method.params.is_empty() {
                self.member_edit(method.insert_at, &method.annotations, Verdict::Nullable);
            }
        }

        let setter = InjectorConfig::accessor_name(&self.config.setter_prefix, &field.name);
        for method in self.index.lookup(false, &setter).to_vec() {
            if let [param] = method.params.as_slice() {
                self.inline_edit(param.insert_at, &param.annotations, Verdict::Nullable);
                self.member_edit(method.insert_at, &method.annotations, Verdict::NonNull);
            }
        }
    }

    // ========================================================================
    // CONTAINER RECURSION - schema and generic-argument trees in lock-step
    // ========================================================================

    /// Applies the container recursion to the field's own type, the matched
    /// getter's return type, and the matched setter's parameter type. A
    /// structural mismatch aborts this field's container step only, and the
    /// step commits as a unit: edits already emitted for one of the three
    /// declarations are discarded when a later one mismatches, so the trio
    /// is never annotated half-way.
    fn annotate_field_containers(
        &mut self,
        field: &FieldDecl,
        schema_field: &SchemaField,
        top_level: bool,
        getter: &str,
        setter: &str,
    ) {
        if !schema_field.schema.reduced().is_container() {
            return;
        }
        let committed = self.out.edits.len();
        let result = (|| -> Result<()> {
            self.annotate_type_args(&field.name, &schema_field.schema, &field.ty.args)?;
            for method in self.index.lookup(top_level, getter).to_vec() {
                if !method.params.is_empty() {
                    continue;
                }
                let args: &[TypeUse] = match &method.return_type {
                    Some(ty) => &ty.args,
                    None => &[],
                };
                self.annotate_type_args(&field.name, &schema_field.schema, args)?;
            }
            for method in self.index.lookup(top_level, setter).to_vec() {
                if let [param] = method.params.as_slice() {
                    self.annotate_type_args(&field.name, &schema_field.schema, &param.ty.args)?;
                }
            }
            Ok(())
        })();
        if let Err(mismatch) = result {
            self.out.edits.truncate(committed);
            self.out.mismatches.push(mismatch);
        }
    }

    /// Walks one schema node and one generic-argument list positionally.
    /// Array: one argument, verdict from the element schema. Map: two
    /// arguments, key always NonNull, value verdict from the value schema.
    /// Recursion depth is bounded by the declared generic nesting.
    fn annotate_type_args(
        &mut self,
        field_name: &str,
        schema: &SchemaNode,
        args: &[TypeUse],
    ) -> Result<()> {
        match schema.reduced() {
            SchemaNode::Array(element) => {
                let Some(item) = args.first() else {
                    return Err(self.mismatch(field_name, "an array", 1, args.len()));
                };
                self.type_use_edit(item, Verdict::from_schema(element));
                if !item.args.is_empty() {
                    self.annotate_type_args(field_name, element, &item.args)?;
                }
            }
            SchemaNode::Map(value) => {
                let [key, val, ..] = args else {
                    return Err(self.mismatch(field_name, "a map", 2, args.len()));
                };
                self.type_use_edit(key, Verdict::NonNull);
                self.type_use_edit(val, Verdict::from_schema(value));
                if !val.args.is_empty() {
                    self.annotate_type_args(field_name, value, &val.args)?;
                }
            }
            // Leaves and unreduced wide unions stop the recursion; only the
            // container-level verdicts already emitted apply.
            _ => {}
        }
        Ok(())
    }

    fn mismatch(
        &self,
        field: &str,
        container: &str,
        expected: usize,
        found: usize,
    ) -> AvromarkError {
        AvromarkError::new(ErrorKind::StructuralMismatch {
            field: field.to_string(),
            container: container.to_string(),
            expected_args: expected,
            found_args: found,
        })
    }

    // ========================================================================
    // FACTORY / BUILDER ENTRY POINTS
    // ========================================================================

    fn mark_factory_methods(&mut self) {
        let methods: Vec<&MethodDecl> = self.unit.all_methods().collect();
        for method in methods {
            if method.name == self.config.build_method && method.params.is_empty() {
                self.member_edit(method.insert_at, &method.annotations, Verdict::NonNull);
            }
            if method.name == self.config.new_builder_method {
                self.member_edit(method.insert_at, &method.annotations, Verdict::NonNull);
                // The copy-constructor overload accepts an absent original.
                if let Some(param) = method.params.first() {
                    self.inline_edit(param.insert_at, &param.annotations, Verdict::Nullable);
                }
            }
        }
    }

    // ========================================================================
    // EDIT EMISSION - every injection is idempotent
    // ========================================================================

    /// Member-level marker on its own line above the declaration. The
    /// injected name is the simple one; the import edit covers resolution.
    fn member_edit(&mut self, insert_at: usize, existing: &[AnnotationUse], verdict: Verdict) {
        let marker = self.config.marker(verdict);
        if has_marker(existing, marker) {
            return;
        }
        let indent = line_indent(self.source, insert_at);
        self.out
            .edits
            .push(Edit::new(insert_at, format!("@{}\n{indent}", simple_name(marker))));
    }

    /// Inline marker for parameters.
    fn inline_edit(&mut self, insert_at: usize, existing: &[AnnotationUse], verdict: Verdict) {
        let marker = self.config.marker(verdict);
        if has_marker(existing, marker) {
            return;
        }
        self.out
            .edits
            .push(Edit::new(insert_at, format!("@{} ", simple_name(marker))));
    }

    /// Inline marker directly before a generic type argument.
    fn type_use_edit(&mut self, ty: &TypeUse, verdict: Verdict) {
        let marker = self.config.marker(verdict);
        if has_marker(&ty.annotations, marker) {
            return;
        }
        self.out
            .edits
            .push(Edit::new(ty.span.start, format!("@{} ", simple_name(marker))));
    }
}

fn simple_name(marker: &str) -> &str {
    marker.rsplit('.').next().unwrap_or(marker)
}

/// True when an annotation semantically equivalent to the marker is already
/// written: either the full qualified name or its final segment.
fn has_marker(existing: &[AnnotationUse], marker: &str) -> bool {
    let simple = simple_name(marker);
    existing.iter().any(|a| a.name == marker || a.name == simple)
}

// ============================================================================
// TESTS
// ============================================================================
