//! migrate-settings
//!
//! Resolves migration settings from defaults, host parameters and a
//! properties file, and prints the result.

use anyhow::Result;
use clap::Parser;
use migrate_settings::cli::{Cli, Command, resolve};
use migrate_settings::config::ConfigLoader;
use migrate_settings::error::{ConfigError, ErrorReport};
use migrate_settings::format::{OutputFormat, format_fields};
use migrate_settings::logging::{self, LogTarget};
use migrate_settings::registry::Registry;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    match cli.command {
        Command::Resolve(args) => {
            // Only resolution reads host parameters.
            let loader = match &cli.config {
                Some(path) => ConfigLoader::load_explicit(path)?,
                None => ConfigLoader::load()?,
            };
            debug!(sources = loader.sources().len(), "Host parameters loaded");

            let format: OutputFormat = args.format.into();
            match resolve::run_resolve(&args, &loader) {
                Ok(output) => print!("{}", output),
                Err(e) => {
                    // Structured failure for tools consuming JSON output
                    if format == OutputFormat::Json {
                        if let Some(config_err) = e.downcast_ref::<ConfigError>() {
                            let report = ErrorReport::from(config_err);
                            println!("{}", serde_json::to_string_pretty(&report)?);
                            std::process::exit(1);
                        }
                    }
                    return Err(e);
                }
            }
        }
        Command::Fields(args) => {
            print!("{}", format_fields(&Registry::standard(), args.format.into())?);
        }
    }

    Ok(())
}
