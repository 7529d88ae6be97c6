//! dmnkit CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use dmnkit_cli::{Args, error_adapter::to_reportables};

fn main() -> ExitCode {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = args.log_level.parse().unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting dmnkit");
    debug!(args:?; "Parsed arguments");

    let Err(err) = dmnkit_cli::run(&args) else {
        info!("Completed successfully");
        return ExitCode::SUCCESS;
    };

    let reporter = miette::GraphicalReportHandler::new();
    let reportables = to_reportables(&err);
    for reportable in &reportables {
        let mut rendered = String::new();
        if reporter.render_report(&mut rendered, reportable).is_err() {
            rendered = reportable.to_string();
        }
        error!("{rendered}");
    }
    error!(diagnostics_count = reportables.len(); "Failed to process {}", args.input);

    ExitCode::FAILURE
}
