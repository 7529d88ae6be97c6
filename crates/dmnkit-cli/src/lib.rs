//! CLI logic for the dmnkit document tool.
//!
//! This module contains the core CLI logic: read a DMN document, run it
//! through the graph and write the normalized document.

pub mod error_adapter;
pub mod imports;

mod args;
mod config;

pub use args::Args;

use std::fs;

use futures::executor::block_on;
use log::info;

use dmnkit::{DmnBuilder, DmnError, marshaller::Metadata};

use imports::FsImportResolver;

/// Run the dmnkit CLI application
///
/// This function reads the input file, builds its graph, marshalls the
/// graph back and writes the resulting DMN XML to the output file.
///
/// # Errors
///
/// Returns `DmnError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Import resolution errors
/// - Marshalling errors
pub fn run(args: &Args) -> Result<(), DmnError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing document"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let mut builder = DmnBuilder::new(app_config);
    if args.resolve_imports {
        builder = builder.with_import_resolver(FsImportResolver);
    }
    let metadata = Metadata::new().with_location(&args.input);
    let xml = block_on(builder.normalize(&metadata, &source))?;

    fs::write(&args.output, xml)?;

    info!(output_file = args.output; "DMN document written successfully");

    Ok(())
}
