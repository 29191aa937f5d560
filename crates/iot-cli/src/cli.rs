//! CLI argument definitions using clap derive API

use clap::Parser;
use iot_query::ExportFormat;
use std::path::PathBuf;

/// iotflow - IoT location, device and event ETL with analytical exports
#[derive(Parser, Debug)]
#[command(name = "iotflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to locations JSON file
    #[arg(long)]
    pub locations: PathBuf,

    /// Path to devices JSON file
    #[arg(long)]
    pub devices: PathBuf,

    /// Path to events JSON file
    #[arg(long)]
    pub events: PathBuf,

    /// Output format for query results
    #[arg(short, long, default_value = "xml")]
    pub format: ExportFormat,

    /// Config file path (default: ./iotflow.yml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override database path (DuckDB file or :memory:)
    #[arg(long, env = "IOTFLOW_DATABASE")]
    pub database: Option<String>,

    /// Override output directory
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Override log file path
    #[arg(long)]
    pub log_file: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
