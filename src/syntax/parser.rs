//! Declaration parser for generated Java sources.
//!
//! This parser is purely structural: it recovers the declaration skeleton
//! (types, fields, methods, constructors, parameters, generic arguments)
//! with byte-exact spans, and skips over everything the annotation pass has
//! no interest in - method bodies, initializer expressions, throws clauses -
//! using balanced-delimiter scanning. It makes no attempt to validate the
//! Java beyond what it needs to walk it.

use crate::errors::{AvromarkError, ErrorKind, Result, SourceContext};

use super::lexer::{Lexer, Token, TokenKind};
use super::{
    AnnotationUse, CompilationUnit, CtorDecl, FieldDecl, MethodDecl, Param, Span, TypeDecl,
    TypeKind, TypeUse,
};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse one Java source file into a declaration tree.
pub fn parse(source: &str, context: &SourceContext) -> Result<CompilationUnit> {
    Parser::new(source, context).parse_unit()
}

// ============================================================================
// PARSER
// ============================================================================

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    context: &'src SourceContext,
    /// Javadoc block most recently passed over; cleared at each member start.
    pending_doc: Option<Span>,
}

/// Annotations and modifiers collected before a member or type declaration.
struct Prelude {
    annotations: Vec<AnnotationUse>,
    modifiers: Vec<String>,
    insert_at: Option<usize>,
}

impl Prelude {
    fn has(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, context: &'src SourceContext) -> Self {
        Self {
            source,
            tokens: Lexer::tokenize(source),
            pos: 0,
            context,
            pending_doc: None,
        }
    }

    // ========================================================================
    // COMPILATION UNIT
    // ========================================================================

    fn parse_unit(mut self) -> Result<CompilationUnit> {
        let mut package = None;
        let mut imports = Vec::new();
        let mut import_insert_at = 0;

        if self.peek_is_keyword("package") {
            self.bump();
            let (name, semi_end) = self.read_dotted_until_semi("package name")?;
            package = Some(name);
            import_insert_at = self.after_line(semi_end);
        }

        while self.peek_is_keyword("import") {
            self.bump();
            let (path, semi_end) = self.read_dotted_until_semi("import path")?;
            imports.push(path);
            import_insert_at = self.after_line(semi_end);
        }

        let mut types = Vec::new();
        while self.peek().kind != TokenKind::Eof {
            let prelude = self.parse_prelude()?;
            types.push(self.parse_type_decl(prelude, false)?);
        }

        Ok(CompilationUnit {
            package,
            imports,
            import_insert_at,
            types,
        })
    }

    /// Reads a dotted name (`com.example.Thing`, `java.util.*`, or
    /// `static a.b.c`) up to and including the terminating semicolon.
    fn read_dotted_until_semi(&mut self, expected: &str) -> Result<(String, usize)> {
        let mut name = String::new();
        loop {
            let t = self.bump();
            match t.kind {
                TokenKind::Ident => {
                    let text = self.text(t);
                    // `import static ...` - the static keyword is not part of
                    // the path we compare against.
                    if !(name.is_empty() && text == "static") {
                        name.push_str(text);
                    }
                }
                TokenKind::Punct('.') => name.push('.'),
                TokenKind::Punct('*') => name.push('*'),
                TokenKind::Punct(';') => return Ok((name, t.span.end)),
                _ => return Err(self.err_unexpected(expected, t)),
            }
        }
    }

    /// Offset of the start of the line after the given offset.
    fn after_line(&self, offset: usize) -> usize {
        match self.source[offset..].find('\n') {
            Some(idx) => offset + idx + 1,
            None => self.source.len(),
        }
    }

    // ========================================================================
    // TYPE DECLARATIONS
    // ========================================================================

    fn parse_type_decl(&mut self, _prelude: Prelude, nested: bool) -> Result<TypeDecl> {
        let t = self.peek();
        let kind = match t.kind {
            TokenKind::Punct('@') => {
                self.bump();
                self.expect_keyword("interface")?;
                TypeKind::Annotation
            }
            TokenKind::Ident => match self.text(t) {
                "class" => {
                    self.bump();
                    TypeKind::Class
                }
                "interface" => {
                    self.bump();
                    TypeKind::Interface
                }
                "enum" => {
                    self.bump();
                    TypeKind::Enum
                }
                _ => return Err(self.err_unexpected("type declaration", t)),
            },
            _ => return Err(self.err_unexpected("type declaration", t)),
        };

        let name_tok = self.expect_ident("type name")?;
        let name = self.text(name_tok).to_string();

        // Type parameters, extends/implements: nothing in there matters to
        // the annotation pass, scan forward to the body.
        if self.peek_punct('<') {
            self.skip_balanced('<', '>')?;
        }
        loop {
            let t = self.peek();
            match t.kind {
                TokenKind::Punct('{') => break,
                TokenKind::Eof => return Err(self.err_unexpected("'{'", t)),
                _ => {
                    self.bump();
                }
            }
        }

        let mut decl = TypeDecl {
            kind,
            name,
            nested,
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
            nested_types: Vec::new(),
        };

        // Enum and annotation-type bodies use member grammars of their own;
        // the pass never looks inside them.
        if matches!(kind, TypeKind::Enum | TypeKind::Annotation) {
            self.skip_balanced('{', '}')?;
            return Ok(decl);
        }

        self.expect_punct('{')?;
        // Any doc seen so far belongs to the type, not its first member.
        self.pending_doc = None;
        loop {
            let t = self.peek();
            match t.kind {
                TokenKind::Punct('}') => {
                    self.bump();
                    return Ok(decl);
                }
                TokenKind::Eof => return Err(self.err_unexpected("'}'", t)),
                _ => {
                    self.parse_member(&mut decl)?;
                    // A doc block not claimed by this member must not leak
                    // onto the next one.
                    self.pending_doc = None;
                }
            }
        }
    }

    // ========================================================================
    // MEMBERS
    // ========================================================================

    fn parse_member(&mut self, owner: &mut TypeDecl) -> Result<()> {
        let prelude = self.parse_prelude()?;
        let top_level = !owner.nested;

        let t = self.peek();
        match t.kind {
            // Nested type declaration.
            TokenKind::Ident if matches!(self.text(t), "class" | "interface" | "enum") => {
                let inner = self.parse_type_decl(prelude, true)?;
                owner.nested_types.push(inner);
                return Ok(());
            }
            TokenKind::Punct('@') => {
                // Only `@interface` survives the prelude with '@' current.
                let inner = self.parse_type_decl(prelude, true)?;
                owner.nested_types.push(inner);
                return Ok(());
            }
            // Static or instance initializer block.
            TokenKind::Punct('{') => {
                self.skip_balanced('{', '}')?;
                return Ok(());
            }
            TokenKind::Punct(';') => {
                self.bump();
                return Ok(());
            }
            // Generic method: type parameters precede the return type.
            TokenKind::Punct('<') => {
                self.skip_balanced('<', '>')?;
            }
            _ => {}
        }

        let t = self.peek();
        if t.kind != TokenKind::Ident {
            return Err(self.err_unexpected("member declaration", t));
        }
        let insert_at = prelude.insert_at.unwrap_or(t.span.start);

        let ty = self.parse_type(Vec::new())?;

        // A '(' directly after the type name means the "type" was really a
        // constructor name.
        if self.peek_punct('(') {
            let params = self.parse_params()?;
            self.skip_throws_and_body()?;
            owner.ctors.push(CtorDecl {
                name: ty.name,
                param_count: params.len(),
                is_public: prelude.has("public"),
                top_level,
                annotations: prelude.annotations,
                insert_at,
                doc: self.pending_doc.take(),
            });
            return Ok(());
        }

        let name_tok = self.expect_ident("member name")?;
        let name = self.text(name_tok).to_string();

        if self.peek_punct('(') {
            let params = self.parse_params()?;
            self.skip_throws_and_body()?;
            let return_type = (ty.name != "void").then_some(ty);
            owner.methods.push(MethodDecl {
                name,
                params,
                return_type,
                top_level,
                annotations: prelude.annotations,
                insert_at,
            });
            return Ok(());
        }

        let (initializer_literals, has_initializer) = self.finish_field_statement()?;
        owner.fields.push(FieldDecl {
            name,
            ty,
            top_level,
            is_static: prelude.has("static"),
            annotations: prelude.annotations,
            insert_at,
            initializer_literals,
            has_initializer,
        });
        Ok(())
    }

    fn parse_prelude(&mut self) -> Result<Prelude> {
        let mut prelude = Prelude {
            annotations: Vec::new(),
            modifiers: Vec::new(),
            insert_at: None,
        };
        loop {
            let t = self.peek();
            match t.kind {
                TokenKind::Punct('@') => {
                    // `@interface` starts a type declaration, not an
                    // annotation use.
                    if self.peek_nth_is_keyword(1, "interface") {
                        return Ok(prelude);
                    }
                    prelude.insert_at.get_or_insert(t.span.start);
                    prelude.annotations.push(self.parse_annotation()?);
                }
                TokenKind::Ident if is_modifier(self.text(t)) => {
                    prelude.insert_at.get_or_insert(t.span.start);
                    prelude.modifiers.push(self.text(t).to_string());
                    self.bump();
                }
                _ => return Ok(prelude),
            }
        }
    }

    fn parse_annotation(&mut self) -> Result<AnnotationUse> {
        let at = self.expect_punct('@')?;
        let first = self.expect_ident("annotation name")?;
        let mut name = self.text(first).to_string();
        let mut end = first.span.end;
        while self.peek_punct('.') {
            self.bump();
            let seg = self.expect_ident("annotation name segment")?;
            name.push('.');
            name.push_str(self.text(seg));
            end = seg.span.end;
        }
        if self.peek_punct('(') {
            end = self.skip_balanced('(', ')')?;
        }
        Ok(AnnotationUse {
            name,
            span: Span::new(at.span.start, end),
        })
    }

    // ========================================================================
    // TYPES
    // ========================================================================

    fn parse_type(&mut self, annotations: Vec<AnnotationUse>) -> Result<TypeUse> {
        let t = self.peek();

        // Wildcard type argument, possibly bounded.
        if t.kind == TokenKind::Punct('?') {
            self.bump();
            if self.peek_is_keyword("extends") || self.peek_is_keyword("super") {
                self.bump();
                self.parse_type(Vec::new())?;
            }
            return Ok(TypeUse {
                name: "?".to_string(),
                args: Vec::new(),
                span: t.span,
                annotations,
                primitive: false,
                array_dims: 0,
            });
        }

        let first = self.expect_ident("type name")?;
        let start = first.span.start;
        let mut end = first.span.end;
        let mut name = self.text(first).to_string();
        let primitive = is_primitive(&name);

        if !primitive {
            // Qualified name; stop before `...` so varargs stay intact.
            while self.peek_punct('.') && !self.peek_nth_punct(1, '.') {
                self.bump();
                let seg = self.expect_ident("type name segment")?;
                name.push('.');
                name.push_str(self.text(seg));
                end = seg.span.end;
            }
        }

        let mut args = Vec::new();
        if self.peek_punct('<') {
            let open = self.bump();
            end = open.span.end;
            if self.peek_punct('>') {
                end = self.bump().span.end; // diamond
            } else {
                loop {
                    let mut arg_annotations = Vec::new();
                    while self.peek_punct('@') {
                        arg_annotations.push(self.parse_annotation()?);
                    }
                    args.push(self.parse_type(arg_annotations)?);
                    let t = self.peek();
                    match t.kind {
                        TokenKind::Punct(',') => {
                            self.bump();
                        }
                        TokenKind::Punct('>') => {
                            end = self.bump().span.end;
                            break;
                        }
                        _ => return Err(self.err_unexpected("',' or '>'", t)),
                    }
                }
            }
        }

        let mut array_dims = 0;
        while self.peek_punct('[') {
            self.bump();
            let close = self.expect_punct(']')?;
            end = close.span.end;
            array_dims += 1;
        }

        Ok(TypeUse {
            name,
            args,
            span: Span::new(start, end),
            annotations,
            primitive,
            array_dims,
        })
    }

    // ========================================================================
    // PARAMETERS, BODIES, INITIALIZERS
    // ========================================================================

    fn parse_params(&mut self) -> Result<Vec<Param>> {
        self.expect_punct('(')?;
        let mut params = Vec::new();
        if self.peek_punct(')') {
            self.bump();
            return Ok(params);
        }
        loop {
            let mut annotations = Vec::new();
            let mut insert_at = None;
            loop {
                let t = self.peek();
                match t.kind {
                    TokenKind::Punct('@') => {
                        insert_at.get_or_insert(t.span.start);
                        annotations.push(self.parse_annotation()?);
                    }
                    TokenKind::Ident if self.text(t) == "final" => {
                        insert_at.get_or_insert(t.span.start);
                        self.bump();
                    }
                    _ => break,
                }
            }
            let t = self.peek();
            let insert_at = insert_at.unwrap_or(t.span.start);
            let ty = self.parse_type(Vec::new())?;
            // Varargs.
            if self.peek_punct('.') {
                self.expect_punct('.')?;
                self.expect_punct('.')?;
                self.expect_punct('.')?;
            }
            let name_tok = self.expect_ident("parameter name")?;
            let name = self.text(name_tok).to_string();
            while self.peek_punct('[') {
                self.bump();
                self.expect_punct(']')?;
            }
            params.push(Param {
                name,
                ty,
                annotations,
                insert_at,
            });
            let t = self.peek();
            match t.kind {
                TokenKind::Punct(',') => {
                    self.bump();
                }
                TokenKind::Punct(')') => {
                    self.bump();
                    return Ok(params);
                }
                _ => return Err(self.err_unexpected("',' or ')'", t)),
            }
        }
    }

    /// After a parameter list: step over an optional throws clause, then
    /// either a `{...}` body or a terminating semicolon.
    fn skip_throws_and_body(&mut self) -> Result<()> {
        loop {
            let t = self.peek();
            match t.kind {
                TokenKind::Punct('{') => {
                    self.skip_balanced('{', '}')?;
                    return Ok(());
                }
                TokenKind::Punct(';') => {
                    self.bump();
                    return Ok(());
                }
                TokenKind::Eof => return Err(self.err_unexpected("method body or ';'", t)),
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Consumes the rest of a field statement through its semicolon,
    /// collecting the raw inner text of every string literal on the way.
    fn finish_field_statement(&mut self) -> Result<(Vec<String>, bool)> {
        let mut literals = Vec::new();
        let mut has_initializer = false;
        let mut depth: usize = 0;
        loop {
            let t = self.bump();
            match t.kind {
                TokenKind::Punct(';') if depth == 0 => return Ok((literals, has_initializer)),
                TokenKind::Punct('(' | '{' | '[') => depth += 1,
                TokenKind::Punct(')' | '}' | ']') => depth = depth.saturating_sub(1),
                TokenKind::Punct('=') if depth == 0 => has_initializer = true,
                TokenKind::Str => {
                    let inner = &self.source[t.span.start + 1..t.span.end - 1];
                    literals.push(inner.to_string());
                }
                TokenKind::Eof => return Err(self.err_unexpected("';'", t)),
                _ => {}
            }
        }
    }

    /// Skips a balanced delimiter pair, returning the closing offset.
    /// The current token must be the opening delimiter.
    fn skip_balanced(&mut self, open: char, close: char) -> Result<usize> {
        self.expect_punct(open)?;
        let mut depth = 1;
        loop {
            let t = self.bump();
            match t.kind {
                TokenKind::Punct(c) if c == open => depth += 1,
                TokenKind::Punct(c) if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(t.span.end);
                    }
                }
                TokenKind::Eof => {
                    return Err(self.err_unexpected(&format!("'{close}'"), t));
                }
                _ => {}
            }
        }
    }

    // ========================================================================
    // CURSOR
    // ========================================================================

    /// Advances past trivia, remembering the last Javadoc block seen.
    fn skip_trivia(&mut self) {
        while let Some(t) = self.tokens.get(self.pos) {
            if !t.is_trivia() {
                break;
            }
            if t.kind == TokenKind::BlockComment
                && self.source[t.span.start..t.span.end].starts_with("/**")
            {
                self.pending_doc = Some(t.span);
            }
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Token {
        self.skip_trivia();
        self.tokens[self.pos]
    }

    /// The nth non-trivia token ahead of the cursor (0 = next).
    fn peek_nth(&mut self, n: usize) -> Token {
        self.skip_trivia();
        let mut seen = 0;
        for t in &self.tokens[self.pos..] {
            if t.is_trivia() {
                continue;
            }
            if seen == n {
                return *t;
            }
            seen += 1;
        }
        *self.tokens.last().expect("token stream ends with Eof")
    }

    fn bump(&mut self) -> Token {
        let t = self.peek();
        if t.kind != TokenKind::Eof {
            self.pos += 1;
        }
        t
    }

    fn peek_punct(&mut self, c: char) -> bool {
        self.peek().kind == TokenKind::Punct(c)
    }

    fn peek_nth_punct(&mut self, n: usize, c: char) -> bool {
        self.peek_nth(n).kind == TokenKind::Punct(c)
    }

    fn peek_is_keyword(&mut self, keyword: &str) -> bool {
        let t = self.peek();
        t.kind == TokenKind::Ident && self.text(t) == keyword
    }

    fn peek_nth_is_keyword(&mut self, n: usize, keyword: &str) -> bool {
        let t = self.peek_nth(n);
        t.kind == TokenKind::Ident && self.text(t) == keyword
    }

    fn expect_punct(&mut self, c: char) -> Result<Token> {
        let t = self.peek();
        if t.kind == TokenKind::Punct(c) {
            Ok(self.bump())
        } else {
            Err(self.err_unexpected(&format!("'{c}'"), t))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<Token> {
        let t = self.peek();
        if t.kind == TokenKind::Ident {
            Ok(self.bump())
        } else {
            Err(self.err_unexpected(expected, t))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<Token> {
        let t = self.peek();
        if t.kind == TokenKind::Ident && self.text(t) == keyword {
            Ok(self.bump())
        } else {
            Err(self.err_unexpected(&format!("'{keyword}'"), t))
        }
    }

    fn text(&self, t: Token) -> &str {
        &self.source[t.span.start..t.span.end]
    }

    fn err_unexpected(&self, expected: &str, t: Token) -> AvromarkError {
        let kind = if t.kind == TokenKind::Eof {
            ErrorKind::UnexpectedEof {
                expected: expected.to_string(),
            }
        } else {
            ErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("'{}'", self.text(t)),
            }
        };
        AvromarkError::new(kind).with_span(self.context, t.span.start, t.span.end)
    }
}

fn is_modifier(text: &str) -> bool {
    matches!(
        text,
        "public"
            | "private"
            | "protected"
            | "static"
            | "final"
            | "abstract"
            | "native"
            | "synchronized"
            | "transient"
            | "volatile"
            | "strictfp"
            | "default"
    )
}

fn is_primitive(name: &str) -> bool {
    matches!(
        name,
        "boolean" | "byte" | "short" | "int" | "long" | "char" | "float" | "double" | "void"
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> CompilationUnit {
        let ctx = SourceContext::from_file("Test.java", source);
        parse(source, &ctx).expect("parse failed")
    }

    const SMALL_CLASS: &str = r#"package com.example;

import java.util.List;

public class Person {
  private static final String SCHEMA$ = parse("{\"type\":\"record\"}");
  private java.lang.String id;
  private java.util.List<java.lang.String> tags;

  /** Creates everything. */
  public Person(java.lang.String id) {
    this.id = id;
  }

  public java.lang.String getId() {
    return id;
  }

  public void setId(java.lang.String value) {
    this.id = value;
  }

  public static class Builder {
    private java.lang.String id;

    public Builder clearId() {
      id = null;
      return this;
    }
  }
}
"#;

    #[test]
    fn parses_package_and_imports() {
        let unit = parse_ok(SMALL_CLASS);
        assert_eq!(unit.package.as_deref(), Some("com.example"));
        assert_eq!(unit.imports, vec!["java.util.List".to_string()]);
        // New imports land at the start of the line after the last import.
        let head = &SMALL_CLASS[..unit.import_insert_at];
        assert!(head.ends_with("import java.util.List;\n"));
    }

    #[test]
    fn records_nesting_roles() {
        let unit = parse_ok(SMALL_CLASS);
        let types = unit.all_types();
        assert_eq!(types.len(), 2);
        assert!(!types[0].nested);
        assert!(types[1].nested);
        assert_eq!(types[1].name, "Builder");

        let outer_id = &types[0].fields[1];
        assert!(outer_id.top_level);
        let builder_id = &types[1].fields[0];
        assert!(!builder_id.top_level);
    }

    #[test]
    fn captures_static_initializer_literal() {
        let unit = parse_ok(SMALL_CLASS);
        let schema_field = unit
            .all_fields()
            .find(|f| f.name == "SCHEMA$")
            .expect("sentinel field");
        assert!(schema_field.is_static);
        assert_eq!(
            schema_field.initializer_literals,
            vec![r#"{\"type\":\"record\"}"#.to_string()]
        );
    }

    #[test]
    fn parses_generic_field_types() {
        let unit = parse_ok(SMALL_CLASS);
        let tags = unit.all_fields().find(|f| f.name == "tags").expect("tags");
        assert_eq!(tags.ty.name, "java.util.List");
        assert_eq!(tags.ty.args.len(), 1);
        assert_eq!(tags.ty.args[0].name, "java.lang.String");
        let span = tags.ty.args[0].span;
        assert_eq!(&SMALL_CLASS[span.start..span.end], "java.lang.String");
    }

    #[test]
    fn attaches_javadoc_to_constructor() {
        let unit = parse_ok(SMALL_CLASS);
        let ctor = unit.all_ctors().next().expect("ctor");
        assert!(ctor.is_public);
        assert_eq!(ctor.param_count, 1);
        let doc = ctor.doc.expect("doc span");
        assert_eq!(
            &SMALL_CLASS[doc.start..doc.end],
            "/** Creates everything. */"
        );
        // The marker insertion point is the `public` keyword, not the doc.
        assert_eq!(&SMALL_CLASS[ctor.insert_at..ctor.insert_at + 6], "public");
    }

    #[test]
    fn void_methods_have_no_return_type() {
        let unit = parse_ok(SMALL_CLASS);
        let setter = unit
            .all_methods()
            .find(|m| m.name == "setId")
            .expect("setter");
        assert!(setter.return_type.is_none());
        assert_eq!(setter.params.len(), 1);
        assert_eq!(setter.params[0].name, "value");
    }

    #[test]
    fn enum_declarations_are_opaque() {
        let unit = parse_ok("package p;\npublic enum Status { ACTIVE, INACTIVE }\n");
        assert!(unit.first_type_is_enum());
        assert!(unit.types[0].fields.is_empty());
    }

    #[test]
    fn nested_generics_parse_in_lockstep_order() {
        let unit = parse_ok(
            "class C { private java.util.Map<java.lang.String, java.util.Map<java.lang.String, java.lang.Integer>> m; }",
        );
        let field = unit.all_fields().next().expect("field");
        assert_eq!(field.ty.args.len(), 2);
        assert_eq!(field.ty.args[1].name, "java.util.Map");
        assert_eq!(field.ty.args[1].args.len(), 2);
        assert_eq!(field.ty.args[1].args[1].name, "java.lang.Integer");
    }

    #[test]
    fn existing_type_use_annotations_are_recorded() {
        let unit = parse_ok(
            "class C { private java.util.List<@org.jetbrains.annotations.NotNull java.lang.String> l; }",
        );
        let field = unit.all_fields().next().expect("field");
        assert_eq!(
            field.ty.args[0].annotations[0].name,
            "org.jetbrains.annotations.NotNull"
        );
    }

    #[test]
    fn unbalanced_brace_is_a_parse_error() {
        let ctx = SourceContext::from_file("Bad.java", "class C {");
        let err = parse("class C {", &ctx).unwrap_err();
        assert_eq!(
            err.category(),
            crate::errors::ErrorCategory::Parse
        );
    }

    #[test]
    fn array_types_record_their_dimensions() {
        let unit = parse_ok("class C { private byte[] payload; }");
        let field = unit.all_fields().next().expect("field");
        assert_eq!(field.ty.name, "byte");
        assert!(field.ty.primitive);
        assert_eq!(field.ty.array_dims, 1);
        assert_eq!(field.ty.simple_name(), "byte");
        assert!(!field.has_initializer);
    }

    #[test]
    fn generic_methods_and_varargs_parse() {
        let unit = parse_ok(
            "class C { public static <T> T pick(java.lang.String... names) { return null; } }",
        );
        let m = unit.all_methods().next().expect("method");
        assert_eq!(m.name, "pick");
        assert_eq!(m.params[0].name, "names");
        assert_eq!(m.return_type.as_ref().expect("return").name, "T");
    }
}
