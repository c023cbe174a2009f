//! Clock port for stamping generation runs.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Only the generation timestamp file depends on it, so tests substitute
/// a fixed clock to keep that file reproducible.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
