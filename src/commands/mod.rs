//! Command dispatch and handlers.

pub mod formats;
pub mod generate;
pub mod targets;

use crate::cli::Command;
use crate::context::ServiceContext;
use crate::writer::Comparison;

use self::generate::GenerateOptions;

/// Dispatch a parsed command to its handler.
///
/// `generate --dry-run` swaps in a context whose writes are swallowed.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Generate { model, format, host, dry_run, exact_compare } => {
            let (ctx, capture) = if *dry_run {
                let (ctx, capture) = ServiceContext::dry_run();
                (ctx, Some(capture))
            } else {
                (ServiceContext::live(), None)
            };
            let options = GenerateOptions {
                model: model.clone(),
                formats: format.clone(),
                host: *host,
                comparison: if *exact_compare {
                    Comparison::Exact
                } else {
                    Comparison::IgnoreWhitespaceAndCase
                },
            };
            generate::run(&ctx, &options, capture.as_ref())
        }
        Command::Targets { model, host } => targets::run(&ServiceContext::live(), model, *host),
        Command::Formats => {
            formats::run();
            Ok(())
        }
    }
}
