//! Service context bundling the port trait objects.

use crate::adapters::dry_run::DryRunFileSystem;
use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;

/// Bundles all port trait objects into a single context.
///
/// Constructed once per run and passed by reference to ingestion and to
/// every emitter; nothing in the pipeline reaches for global state.
pub struct ServiceContext {
    /// Clock for stamping generation runs.
    pub clock: Box<dyn Clock>,
    /// Filesystem for reading inputs and writing generated files.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a live context backed by the real disk and system clock.
    #[must_use]
    pub fn live() -> Self {
        Self { clock: Box::new(LiveClock), fs: Box::new(LiveFileSystem) }
    }

    /// Creates a context that reads from disk but never writes.
    ///
    /// The returned handle shares the context's record of swallowed writes.
    #[must_use]
    pub fn dry_run() -> (Self, DryRunFileSystem) {
        let fs = DryRunFileSystem::new(Box::new(LiveFileSystem));
        (Self { clock: Box::new(LiveClock), fs: Box::new(fs.clone()) }, fs)
    }

    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(fs: Box<dyn FileSystem>, clock: Box<dyn Clock>) -> Self {
        Self { clock, fs }
    }
}
