//! Declaration tree for generated Java sources.
//!
//! This module provides the minimal query surface the annotation pass needs
//! over a generated class: field/method/constructor declarations with their
//! names, types, generic type arguments, annotation lists and nesting role.
//! Every node carries byte-exact spans into the original source so that the
//! rewriter can splice insertions without reprinting anything.

pub mod lexer;
pub mod parser;

pub use parser::parse;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// An annotation already written on a declaration, as it appears in source.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationUse {
    /// The written name, which may be simple (`NotNull`) or qualified
    /// (`org.jetbrains.annotations.NotNull`).
    pub name: String,
    pub span: Span,
}

/// A (possibly generic) type as written in source.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeUse {
    /// The written name: qualified (`java.util.List`), simple (`Builder`),
    /// a primitive (`int`), or `?` for a wildcard.
    pub name: String,
    /// Ordered generic type arguments, empty for non-generic uses.
    pub args: Vec<TypeUse>,
    /// Span of the name token(s); insertions for type-use markers land at
    /// `span.start`.
    pub span: Span,
    /// Type-use annotations already written directly before the type.
    pub annotations: Vec<AnnotationUse>,
    /// True for Java primitive (non-reference) types.
    pub primitive: bool,
    /// Trailing array dimensions (`[]` pairs).
    pub array_dims: usize,
}

impl TypeUse {
    /// Last segment of the written name (`List` for `java.util.List`).
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// A field declaration. Multi-declarator fields keep the first name, the
/// shape Avro codegen emits.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeUse,
    /// True when the enclosing type is not nested inside another type.
    pub top_level: bool,
    pub is_static: bool,
    pub annotations: Vec<AnnotationUse>,
    /// Offset of the first annotation/modifier/type token; member-level
    /// markers are inserted here.
    pub insert_at: usize,
    /// Raw inner text of every string literal in the initializer, in order,
    /// escapes untouched. Used by the embedded-schema locator.
    pub initializer_literals: Vec<String>,
    /// True when the declaration carries any initializer at all.
    pub has_initializer: bool,
}

/// A single method parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeUse,
    pub annotations: Vec<AnnotationUse>,
    pub insert_at: usize,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<Param>,
    /// None for `void`.
    pub return_type: Option<TypeUse>,
    pub top_level: bool,
    pub annotations: Vec<AnnotationUse>,
    pub insert_at: usize,
}

#[derive(Debug, Clone)]
pub struct CtorDecl {
    pub name: String,
    pub param_count: usize,
    pub is_public: bool,
    pub top_level: bool,
    pub annotations: Vec<AnnotationUse>,
    pub insert_at: usize,
    /// Span of the attached Javadoc block, when one exists.
    pub doc: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    /// True when declared inside another type declaration.
    pub nested: bool,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub ctors: Vec<CtorDecl>,
    pub nested_types: Vec<TypeDecl>,
}

/// One parsed source file. Owned by a single processing pass and discarded
/// after the rewritten text is produced.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub package: Option<String>,
    /// Written import paths, without the `import` keyword or semicolon.
    pub imports: Vec<String>,
    /// Offset where new `import` lines are spliced in.
    pub import_insert_at: usize,
    pub types: Vec<TypeDecl>,
}

// ============================================================================
// QUERIES
// ============================================================================

impl CompilationUnit {
    /// True when the first declared type is an enum; such files are skipped
    /// wholesale by the annotation pass.
    pub fn first_type_is_enum(&self) -> bool {
        self.types
            .first()
            .is_some_and(|t| t.kind == TypeKind::Enum)
    }

    pub fn has_import(&self, path: &str) -> bool {
        self.imports.iter().any(|i| i == path)
    }

    /// Every type declaration in the unit, outer before nested.
    pub fn all_types(&self) -> Vec<&TypeDecl> {
        let mut out = Vec::new();
        for ty in &self.types {
            collect_types(ty, &mut out);
        }
        out
    }

    pub fn all_fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.all_types()
            .into_iter()
            .flat_map(|t| t.fields.iter())
            .collect::<Vec<_>>()
            .into_iter()
    }

    pub fn all_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.all_types()
            .into_iter()
            .flat_map(|t| t.methods.iter())
            .collect::<Vec<_>>()
            .into_iter()
    }

    pub fn all_ctors(&self) -> impl Iterator<Item = &CtorDecl> {
        self.all_types()
            .into_iter()
            .flat_map(|t| t.ctors.iter())
            .collect::<Vec<_>>()
            .into_iter()
    }
}

fn collect_types<'a>(ty: &'a TypeDecl, out: &mut Vec<&'a TypeDecl>) {
    out.push(ty);
    for nested in &ty.nested_types {
        collect_types(nested, out);
    }
}
