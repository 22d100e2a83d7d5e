//! CLI logic for the semcanvas diagram renderer.
//!
//! Reads a JSON diagram snapshot, loads it into a
//! [`DiagramController`](semcanvas::DiagramController) and writes the
//! static SVG export.

pub mod error_adapter;

mod args;
mod config;
mod error;
mod snapshot;

pub use args::Args;
pub use config::ConfigError;
pub use error::CliError;
pub use snapshot::Snapshot;

use std::fs;

use log::info;

/// Run the semcanvas CLI application
///
/// This function loads the snapshot named by `args.input` into a controller
/// and writes the resulting SVG to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed snapshots
/// - Export errors, including empty diagrams
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let controller = Snapshot::parse(&source)?.into_controller(app_config, ());
    let svg = controller.export_svg()?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
