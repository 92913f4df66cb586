//! Batch orchestration: source discovery, per-file processing, and the
//! run summary.
//!
//! Each file is processed in isolation. A failure is recorded in that file's
//! report and never aborts the batch unless fail-fast is requested. Files
//! are discovered in sorted order so reports are deterministic; without
//! fail-fast the per-file work itself runs in parallel.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::annotate::{annotate_unit, InjectorConfig};
use crate::edit::apply_edits;
use crate::errors::{AvromarkError, ErrorKind, Result, SourceContext};
use crate::schema::embed::extract_embedded_schema;
use crate::schema::{load_schema_file, RecordSchema};
use crate::syntax;

// ============================================================================
// OPTIONS AND REPORTS
// ============================================================================

/// Everything one batch run needs, resolved from the CLI surface.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory tree of generated Java sources.
    pub generated_dir: PathBuf,
    /// External schema applied to every file; when absent, each file's
    /// embedded schema literal is used instead.
    pub schema_file: Option<PathBuf>,
    /// Mirror annotated output under this root instead of rewriting in place.
    pub out_dir: Option<PathBuf>,
    pub fail_fast: bool,
    pub config: InjectorConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Annotated,
    /// Enum definitions carry no nullability and pass through untouched.
    SkippedEnum,
    Failed,
}

/// The outcome for a single source file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub edits_applied: usize,
    /// Field-scoped container mismatches. The file still succeeds; the
    /// affected fields keep only their member-level markers.
    pub mismatches: Vec<AvromarkError>,
    pub error: Option<AvromarkError>,
}

impl FileReport {
    fn failed(path: PathBuf, error: AvromarkError) -> Self {
        Self {
            path,
            status: FileStatus::Failed,
            edits_applied: 0,
            mismatches: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    pub fn annotated(&self) -> usize {
        self.count(FileStatus::Annotated)
    }

    pub fn skipped(&self) -> usize {
        self.count(FileStatus::SkippedEnum)
    }

    pub fn failed(&self) -> usize {
        self.count(FileStatus::Failed)
    }

    pub fn mismatches(&self) -> usize {
        self.reports.iter().map(|r| r.mismatches.len()).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, status: FileStatus) -> usize {
        self.reports.iter().filter(|r| r.status == status).count()
    }
}

// ============================================================================
// BATCH DRIVER
// ============================================================================

/// Processes every `.java` file under the generated directory.
///
/// Returns `Err` only for run-level failures (unreadable schema file,
/// unwalkable directory). Per-file problems land in the summary.
pub fn run_batch(options: &PipelineOptions) -> Result<BatchSummary> {
    let external = match &options.schema_file {
        Some(path) => Some(load_schema_file(path)?),
        None => None,
    };
    let sources = discover_sources(&options.generated_dir)?;

    let reports = if options.fail_fast {
        let mut reports = Vec::with_capacity(sources.len());
        for path in &sources {
            let report = process_file(path, options, external.as_ref());
            let stop = report.status == FileStatus::Failed;
            reports.push(report);
            if stop {
                break;
            }
        }
        reports
    } else {
        sources
            .par_iter()
            .map(|path| process_file(path, options, external.as_ref()))
            .collect()
    };

    Ok(BatchSummary { reports })
}

/// All `.java` files under `root`, sorted by path.
pub fn discover_sources(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(AvromarkError::usage(format!(
            "Generated directory not found: {}",
            root.display()
        )));
    }
    let mut sources = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| {
            AvromarkError::new(ErrorKind::WalkFailure {
                message: e.to_string(),
            })
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "java") {
            sources.push(path.to_path_buf());
        }
    }
    sources.sort();
    Ok(sources)
}

// ============================================================================
// PER-FILE PROCESSING
// ============================================================================

/// Parse, match, annotate, and write back one file.
pub fn process_file(
    path: &Path,
    options: &PipelineOptions,
    external: Option<&RecordSchema>,
) -> FileReport {
    match process_file_inner(path, options, external) {
        Ok(report) => report,
        Err(error) => FileReport::failed(path.to_path_buf(), error),
    }
}

fn process_file_inner(
    path: &Path,
    options: &PipelineOptions,
    external: Option<&RecordSchema>,
) -> Result<FileReport> {
    let source =
        fs::read_to_string(path).map_err(|e| AvromarkError::read_failure(path, &e))?;
    let context = SourceContext::from_file(path.display().to_string(), source.clone());
    let unit = syntax::parse(&source, &context)?;

    if unit.first_type_is_enum() {
        // Enums have no fields to annotate. With an output directory the
        // file is still mirrored so the output tree stays complete.
        if options.out_dir.is_some() {
            let target = output_path(path, options)?;
            write_output(&target, &source)?;
        }
        return Ok(FileReport {
            path: path.to_path_buf(),
            status: FileStatus::SkippedEnum,
            edits_applied: 0,
            mismatches: Vec::new(),
            error: None,
        });
    }

    let embedded;
    let schema = match external {
        Some(schema) => schema,
        None => {
            embedded = extract_embedded_schema(&unit, &options.config.sentinel)?;
            &embedded
        }
    };

    let outcome = annotate_unit(&unit, schema, &options.config, &source);
    let edits_applied = outcome.edits.len();
    let annotated = apply_edits(&source, &outcome.edits);

    let target = output_path(path, options)?;
    write_output(&target, &annotated)?;

    Ok(FileReport {
        path: path.to_path_buf(),
        status: FileStatus::Annotated,
        edits_applied,
        mismatches: outcome.mismatches,
        error: None,
    })
}

/// Destination for one file: in place, or the same relative path mirrored
/// under the output root.
fn output_path(path: &Path, options: &PipelineOptions) -> Result<PathBuf> {
    match &options.out_dir {
        None => Ok(path.to_path_buf()),
        Some(out_root) => {
            let relative = path
                .strip_prefix(&options.generated_dir)
                .unwrap_or(path);
            Ok(out_root.join(relative))
        }
    }
}

fn write_output(target: &Path, content: &str) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| AvromarkError::write_failure(target, &e))?;
    }
    fs::write(target, content).map_err(|e| AvromarkError::write_failure(target, &e))
}

// ============================================================================
// TESTS
// ============================================================================
