//! Core library entry for the `projgen` CLI.
//!
//! Generation runs in four stages: a model file is ingested into a
//! [`model::GenerationModel`], each requested backend in [`emit`] renders
//! its files from that model, and [`writer`] writes only the files whose
//! content changed.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod emit;
pub mod model;
pub mod naming;
pub mod paths;
pub mod ports;
pub mod tree;
pub mod writer;

#[cfg(test)]
mod test_support;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;

    let log_level = if cli.verbose { "debug" } else { "info" };
    // A second run in the same process keeps the first logger.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();

    commands::dispatch(&cli.command)
}
