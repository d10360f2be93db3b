//! REST Swagger - command-line documentation generator.
//!
//! Reads a route manifest (or a directory of them), declares its routes and
//! prints the generated Swagger documentation.
//!
//! # Usage
//!
//! ```bash
//! rest-swagger [OPTIONS] <MANIFEST_PATH>
//! ```
//!
//! # Examples
//!
//! Generate JSON documentation:
//! ```bash
//! rest-swagger ./routes.yaml -o api-docs.json
//! ```
//!
//! Document only the `widgets` resource, as YAML:
//! ```bash
//! rest-swagger ./routes -p widgets -f yaml
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use rest_swagger::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("REST Swagger starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Documentation generation completed successfully");

    Ok(())
}
