//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::model::platform::HostPlatform;

/// Formats generated when none are requested.
pub const DEFAULT_FORMATS: &str = "CodeLite+Eddie+VisualStudioCode";

/// Top-level CLI parser for `projgen`.
#[derive(Debug, Parser)]
#[command(name = "projgen", version, about = "Generate IDE project files from a build target model")]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate project files for the requested formats.
    Generate {
        /// Model file describing projects and targets.
        #[arg(long, env = "PROJGEN_MODEL")]
        model: PathBuf,

        /// `+`-separated list of formats (CodeLite, Eddie, VisualStudioCode).
        #[arg(long, env = "PROJGEN_FORMAT", default_value = DEFAULT_FORMATS)]
        format: String,

        /// Host the files are generated for; defaults to the current OS.
        #[arg(long, value_enum)]
        host: Option<HostPlatform>,

        /// Report what would be written without touching the disk.
        #[arg(long)]
        dry_run: bool,

        /// Compare existing files byte for byte instead of ignoring
        /// whitespace and case.
        #[arg(long)]
        exact_compare: bool,
    },
    /// List ingested targets and their build product counts.
    Targets {
        /// Model file describing projects and targets.
        #[arg(long, env = "PROJGEN_MODEL")]
        model: PathBuf,

        /// Host the model is ingested for; defaults to the current OS.
        #[arg(long, value_enum)]
        host: Option<HostPlatform>,
    },
    /// List the available project file formats.
    Formats,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, DEFAULT_FORMATS};
    use crate::model::platform::HostPlatform;
    use clap::Parser;

    #[test]
    fn parses_generate_with_defaults() {
        let cli = Cli::try_parse_from(["projgen", "generate", "--model", "model.yaml"]).unwrap();
        match cli.command {
            Command::Generate { model, format, host, dry_run, exact_compare } => {
                assert_eq!(model.to_str(), Some("model.yaml"));
                // PROJGEN_FORMAT may override the default in a developer shell.
                if std::env::var_os("PROJGEN_FORMAT").is_none() {
                    assert_eq!(format, DEFAULT_FORMATS);
                }
                assert!(host.is_none());
                assert!(!dry_run);
                assert!(!exact_compare);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_generate_options() {
        let cli = Cli::try_parse_from([
            "projgen",
            "-v",
            "generate",
            "--model",
            "m.yaml",
            "--format",
            "Eddie",
            "--host",
            "windows",
            "--dry-run",
            "--exact-compare",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Generate { format, host, dry_run, exact_compare, .. } => {
                assert_eq!(format, "Eddie");
                assert_eq!(host, Some(HostPlatform::Windows));
                assert!(dry_run);
                assert!(exact_compare);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_formats_subcommand() {
        let cli = Cli::parse_from(["projgen", "formats", "--verbose"]);
        assert!(matches!(cli.command, Command::Formats));
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_unknown_host() {
        let result = Cli::try_parse_from(["projgen", "targets", "--model", "m.yaml", "--host", "amiga"]);
        assert!(result.is_err());
    }
}
