//! AsyncAPI Docgen - Command-line tool for generating AsyncAPI documentation.
//!
//! This binary reads a descriptor file (document metadata plus the denormalized
//! publish/subscribe descriptors collected by an upstream scanner) and produces
//! a complete AsyncAPI 3.0 document in YAML or JSON.
//!
//! # Usage
//!
//! ```bash
//! asyncapi-docgen [OPTIONS] <DESCRIPTOR_FILE>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! asyncapi-docgen descriptors.yaml -o asyncapi.yaml
//! ```
//!
//! Generate JSON documentation:
//! ```bash
//! asyncapi-docgen descriptors.yaml -f json -o asyncapi.json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! asyncapi-docgen descriptors.yaml -v
//! ```

mod builder;
mod cli;
mod descriptor;
mod document;
mod error;
mod generator;
mod serializer;
mod transformer;

use anyhow::Result;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // We need to parse args twice: once to get verbose flag, then again after logger init
    // First, do a quick parse just to check for verbose flag
    let args_for_verbose = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("AsyncAPI Docgen starting...");

    // Now do the full parse with validation
    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    // Run the main workflow
    cli::run(args)?;

    info!("AsyncAPI document generation completed successfully");

    Ok(())
}
