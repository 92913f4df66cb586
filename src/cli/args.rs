//! Defines the command-line arguments for the avromark CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::Parser;
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "avromark",
    version,
    about = "Injects nullability and deprecation annotations into Avro-generated Java classes."
)]
pub struct AvromarkArgs {
    /// Directory tree of generated Java sources to annotate.
    #[arg(required = true)]
    pub generated_dir: PathBuf,

    /// Avro schema file (.avsc) applied to every class. When omitted, each
    /// class's embedded SCHEMA$ literal is used instead.
    pub schema_file: Option<PathBuf>,

    /// Write annotated files under this directory, mirroring the input
    /// layout, instead of rewriting files in place.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Stop at the first file that fails instead of continuing the batch.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress per-file progress lines; only errors and the summary print.
    #[arg(long, short)]
    pub quiet: bool,
}
