pub use crate::annotate::{annotate_unit, AnnotateOutcome, InjectorConfig, Verdict};
pub use crate::errors::{AvromarkError, ErrorKind, Result, SourceContext};
pub use crate::pipeline::{run_batch, BatchSummary, FileReport, FileStatus, PipelineOptions};

pub mod annotate;
pub mod cli;
pub mod edit;
pub mod errors;
pub mod pipeline;
pub mod schema;
pub mod syntax;
