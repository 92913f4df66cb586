//! Avromark Error Handling - Unified Encapsulated API
//!
//! Every failure mode in the crate is an `AvromarkError`: one struct carrying
//! a kind, optional source context for labeled diagnostics, and an error code.
//! Parse failures render as full miette reports against the offending Java
//! source; everything else degrades to a plain message.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Source context for error reporting: the file name and full content of the
/// Java source a diagnostic points into.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to a NamedSource for miette error reporting.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

/// Converts a byte range into a miette SourceSpan.
pub fn to_source_span(start: usize, end: usize) -> SourceSpan {
    let len = end.saturating_sub(start).max(1);
    (start, len).into()
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// The single error type - kind plus optional labeled source location.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct AvromarkError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Where it happened, when a source span is available.
    pub source_info: Option<SourceInfo>,
    /// An optional help message surfaced through the diagnostic.
    pub help: Option<String>,
}

/// Labeled location inside a source file.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

/// All failure modes as a clean enum.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    // Parse errors - the input is not a Java source we can scan
    UnexpectedToken {
        expected: String,
        found: String,
    },
    UnexpectedEof {
        expected: String,
    },

    // Schema errors
    SentinelMissing {
        sentinel: String,
    },
    SentinelNotLiteral {
        sentinel: String,
    },
    SchemaInvalid {
        message: String,
    },
    SchemaNotRecord {
        actual: String,
    },

    // Field-scoped container arity disagreement
    StructuralMismatch {
        field: String,
        container: String,
        expected_args: usize,
        found_args: usize,
    },

    // I/O
    ReadFailure {
        path: PathBuf,
        message: String,
    },
    WriteFailure {
        path: PathBuf,
        message: String,
    },
    WalkFailure {
        message: String,
    },

    // Configuration-level - fatal to the whole run
    Usage {
        message: String,
    },
}

/// Coarse classification used by the pipeline's propagation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Schema,
    Structural,
    Io,
    Config,
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl AvromarkError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            source_info: None,
            help: None,
        }
    }

    /// Attach a labeled span inside the given source context.
    pub fn with_span(mut self, context: &SourceContext, start: usize, end: usize) -> Self {
        self.source_info = Some(SourceInfo {
            source: context.to_named_source(),
            primary_span: to_source_span(start, end),
        });
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage {
            message: message.into(),
        })
    }

    pub fn read_failure(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::new(ErrorKind::ReadFailure {
            path: path.into(),
            message: error.to_string(),
        })
    }

    pub fn write_failure(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::new(ErrorKind::WriteFailure {
            path: path.into(),
            message: error.to_string(),
        })
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnexpectedToken { .. } | Self::UnexpectedEof { .. } => ErrorCategory::Parse,

            Self::SentinelMissing { .. }
            | Self::SentinelNotLiteral { .. }
            | Self::SchemaInvalid { .. }
            | Self::SchemaNotRecord { .. } => ErrorCategory::Schema,

            Self::StructuralMismatch { .. } => ErrorCategory::Structural,

            Self::ReadFailure { .. } | Self::WriteFailure { .. } | Self::WalkFailure { .. } => {
                ErrorCategory::Io
            }

            Self::Usage { .. } => ErrorCategory::Config,
        }
    }

    /// Error code suffix for diagnostic codes.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::UnexpectedEof { .. } => "unexpected_eof",
            Self::SentinelMissing { .. } => "sentinel_missing",
            Self::SentinelNotLiteral { .. } => "sentinel_not_literal",
            Self::SchemaInvalid { .. } => "schema_invalid",
            Self::SchemaNotRecord { .. } => "schema_not_record",
            Self::StructuralMismatch { .. } => "structural_mismatch",
            Self::ReadFailure { .. } => "read_failure",
            Self::WriteFailure { .. } => "write_failure",
            Self::WalkFailure { .. } => "walk_failure",
            Self::Usage { .. } => "usage",
        }
    }
}

// ============================================================================
// DISPLAY + DIAGNOSTIC
// ============================================================================

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { expected, found } => {
                write!(f, "Parse error: expected {expected}, found {found}")
            }
            Self::UnexpectedEof { expected } => {
                write!(f, "Parse error: expected {expected}, found end of file")
            }
            Self::SentinelMissing { sentinel } => {
                write!(f, "Schema extraction error: no static '{sentinel}' field")
            }
            Self::SentinelNotLiteral { sentinel } => {
                write!(
                    f,
                    "Schema extraction error: '{sentinel}' initializer carries no string literal"
                )
            }
            Self::SchemaInvalid { message } => {
                write!(f, "Schema error: {message}")
            }
            Self::SchemaNotRecord { actual } => {
                write!(
                    f,
                    "Schema error: top-level schema is {actual}, expected a record"
                )
            }
            Self::StructuralMismatch {
                field,
                container,
                expected_args,
                found_args,
            } => {
                write!(
                    f,
                    "Structural mismatch on field '{field}': schema is {container} \
                     ({expected_args} type argument(s)) but declared type carries {found_args}"
                )
            }
            Self::ReadFailure { path, message } => {
                write!(f, "Failed to read {}: {message}", path.display())
            }
            Self::WriteFailure { path, message } => {
                write!(f, "Failed to write {}: {message}", path.display())
            }
            Self::WalkFailure { message } => {
                write!(f, "Failed to walk directory: {message}")
            }
            Self::Usage { message } => {
                write!(f, "{message}")
            }
        }
    }
}

impl Diagnostic for AvromarkError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.kind.category() {
            ErrorCategory::Parse => "avromark::parse",
            ErrorCategory::Schema => "avromark::schema",
            ErrorCategory::Structural => "avromark::structure",
            ErrorCategory::Io => "avromark::io",
            ErrorCategory::Config => "avromark::usage",
        };
        Some(Box::new(format!("{code}::{}", self.kind.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let info = self.source_info.as_ref()?;
        let label = LabeledSpan::new_with_span(Some(self.primary_label()), info.primary_span);
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_info
            .as_ref()
            .map(|info| &*info.source as &dyn miette::SourceCode)
    }
}

impl AvromarkError {
    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::UnexpectedToken { .. } => "unexpected token".into(),
            ErrorKind::UnexpectedEof { .. } => "input ends here".into(),
            ErrorKind::SentinelMissing { .. } => "sentinel field missing".into(),
            ErrorKind::SentinelNotLiteral { .. } => "initializer is not a literal".into(),
            ErrorKind::SchemaInvalid { .. } => "invalid schema".into(),
            ErrorKind::SchemaNotRecord { .. } => "not a record schema".into(),
            ErrorKind::StructuralMismatch { .. } => "arity mismatch".into(),
            _ => "error here".into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AvromarkError>;
