//! iotflow - load IoT JSON exports into DuckDB and export analytical results

use anyhow::Result;
use clap::Parser;
use std::path::Path;

mod cli;
mod logging;
mod pipeline;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    // No log file exists until the logger is up; these errors reach stderr
    // through main's Result only.
    let config = pipeline::load_config(&cli)?;
    let logger = logging::init(Path::new(&config.log_file), cli.verbose)?;

    let outcome = pipeline::run(&cli, &config);
    match &outcome {
        Ok(path) => println!("Results exported to {}", path.display()),
        Err(e) => log::error!("Pipeline failed: {e:#}"),
    }

    logger.flush();
    outcome.map(|_| ())
}
