//! The avromark command-line interface.
//!
//! This module is the main entry point for the CLI and orchestrates the core
//! library pipeline.

use clap::Parser;
use std::process;

use crate::annotate::DEFAULT_CONFIG;
use crate::cli::args::AvromarkArgs;
use crate::pipeline::{self, PipelineOptions};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = AvromarkArgs::parse();

    let options = PipelineOptions {
        generated_dir: args.generated_dir,
        schema_file: args.schema_file,
        out_dir: args.out_dir,
        fail_fast: args.fail_fast,
        config: DEFAULT_CONFIG.clone(),
    };

    let summary = match pipeline::run_batch(&options) {
        Ok(summary) => summary,
        Err(error) => {
            output::print_error(&error);
            process::exit(2);
        }
    };

    for report in &summary.reports {
        output::print_report(report, args.quiet);
    }
    if !args.quiet {
        output::print_summary(&summary);
    }

    if !summary.is_success() {
        process::exit(1);
    }
}
