//! End-to-end run: import the three input files, run the query catalog and
//! export the results.

use crate::cli::Cli;
use anyhow::{Context, Result};
use iot_core::{read_records, Config, EntityKind};
use iot_db::DuckDbGateway;
use iot_import::import_entities;
use iot_query::{run_queries, QUERIES};
use std::path::{Path, PathBuf};

/// Load `iotflow.yml` (or defaults) and apply command-line overrides.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_from_dir_or_default(Path::new("."))
            .context("Failed to load config")?,
    };

    if let Some(database) = &cli.database {
        config.database.path = database.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(log_file) = &cli.log_file {
        config.log_file = log_file.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run the pipeline and return the path of the exported results.
///
/// The database connection is released whether or not the run succeeds.
pub fn run(cli: &Cli, config: &Config) -> Result<PathBuf> {
    let mut gateway = DuckDbGateway::new(config.database.clone());
    let outcome = execute(&mut gateway, cli, config);
    if let Err(e) = gateway.close() {
        log::warn!("Failed to close database: {e}");
    }
    outcome
}

fn execute(gateway: &mut DuckDbGateway, cli: &Cli, config: &Config) -> Result<PathBuf> {
    gateway.connect().context("Failed to connect to database")?;

    let inputs = [
        (EntityKind::Location, &cli.locations),
        (EntityKind::Device, &cli.devices),
        (EntityKind::Event, &cli.events),
    ];
    for (kind, path) in inputs {
        let records = read_records(path);
        import_entities(gateway, kind, &records)
            .with_context(|| format!("Failed to import {kind}s from {}", path.display()))?;
    }
    log::info!("All ETL processes finished successfully.");

    let results = run_queries(gateway, QUERIES).context("Failed to run queries")?;

    let exporter = cli.format.exporter();
    let path = config.output_path(exporter.extension());
    exporter
        .export(&results, &path)
        .with_context(|| format!("Failed to export results to {}", path.display()))?;
    Ok(path)
}
