//! Command-line renderer: reads a diagram snapshot and writes it as SVG.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use semcanvas_cli::{Args, CliError, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);

    info!(input = args.input.as_str(), output = args.output.as_str(); "Rendering snapshot");
    debug!(args:?; "Command line");

    if let Err(err) = semcanvas_cli::run(&args) {
        report(&err);
        process::exit(1);
    }

    info!(output = args.output.as_str(); "SVG written");
}

/// Sets up env_logger; an unparsable level falls back to `warn`.
fn init_logging(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("semcanvas: unknown log level `{level}`, falling back to `warn`");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .init();
}

/// Logs every diagnostic carried by `err` as its own graphical report.
fn report(err: &CliError) {
    let handler = miette::GraphicalReportHandler::new();
    for reportable in to_reportables(err) {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, &reportable) {
            Ok(()) => error!("{rendered}"),
            Err(_) => error!("{err}"),
        }
    }
}
