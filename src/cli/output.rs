//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for the per-file progress lines, the batch
//! summary, and error rendering. Centralizing output logic here keeps the
//! pipeline free of printing concerns.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::AvromarkError;
use crate::pipeline::{BatchSummary, FileReport, FileStatus};

// ============================================================================
// PROGRESS LINES
// ============================================================================

/// Prints one progress line for a processed file.
pub fn print_report(report: &FileReport, quiet: bool) {
    match report.status {
        FileStatus::Annotated if !quiet => {
            let mut stdout = StandardStream::stdout(ColorChoice::Auto);
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
            print!("annotated");
            let _ = stdout.reset();
            println!(
                " {} ({} insertions)",
                report.path.display(),
                report.edits_applied
            );
        }
        FileStatus::SkippedEnum if !quiet => {
            let mut stdout = StandardStream::stdout(ColorChoice::Auto);
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
            print!("skipped");
            let _ = stdout.reset();
            println!("   {} (enum)", report.path.display());
        }
        FileStatus::Failed => {
            let mut stderr = StandardStream::stderr(ColorChoice::Auto);
            let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
            eprint!("failed");
            let _ = stderr.reset();
            eprintln!("    {}", report.path.display());
            if let Some(error) = &report.error {
                print_error(error);
            }
        }
        _ => {}
    }
    // Mismatches do not fail the file but always print.
    for mismatch in &report.mismatches {
        let mut stderr = StandardStream::stderr(ColorChoice::Auto);
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        eprint!("warning");
        let _ = stderr.reset();
        eprintln!("   {}: {}", report.path.display(), mismatch);
    }
}

/// Renders one error through miette's fancy report handler.
pub fn print_error(error: &AvromarkError) {
    eprintln!("{:?}", miette::Report::new(error.clone()));
}

// ============================================================================
// BATCH SUMMARY
// ============================================================================

/// Prints the end-of-run summary line.
pub fn print_summary(summary: &BatchSummary) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if summary.is_success() {
        Color::Green
    } else {
        Color::Red
    };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    print!("{} annotated", summary.annotated());
    let _ = stdout.reset();
    println!(
        ", {} skipped, {} failed, {} structural warnings",
        summary.skipped(),
        summary.failed(),
        summary.mismatches()
    );
}
