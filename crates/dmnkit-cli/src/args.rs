//! Command-line argument definitions for the dmnkit CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the dmnkit document tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input DMN file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the normalized output DMN file
    #[arg(short, long, default_value = "out.dmn")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Resolve `import` elements against files next to the input
    #[arg(long)]
    pub resolve_imports: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
