//! Change-detecting file writes.
//!
//! Generated files are only rewritten when their content actually changed,
//! so IDEs watching them do not reload after every generation run.

use std::path::Path;

use log::{debug, info, warn};

use crate::ports::FileSystem;

/// How existing content is compared with newly generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    /// Case-insensitive; runs of spaces and tabs compare equal and
    /// indentation at the start of a line is ignored.
    #[default]
    IgnoreWhitespaceAndCase,
    /// Byte-for-byte.
    Exact,
}

/// Result of a [`IncrementalWriter::write_if_changed`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was (re)written.
    Written,
    /// The existing file already matched; nothing was touched.
    Unchanged,
}

/// Writes files through a [`FileSystem`] only when their content changed.
pub struct IncrementalWriter<'a> {
    fs: &'a dyn FileSystem,
    comparison: Comparison,
}

impl<'a> IncrementalWriter<'a> {
    /// Creates a writer over `fs`.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, comparison: Comparison) -> Self {
        Self { fs, comparison }
    }

    /// Writes `contents` to `path` unless the existing file already matches.
    ///
    /// An existing file that cannot be read is rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error string if the write fails.
    pub fn write_if_changed(&self, path: &Path, contents: &str) -> Result<WriteOutcome, String> {
        if self.fs.exists(path) {
            match self.fs.read_to_string(path) {
                Ok(existing) if contents_match(&existing, contents, self.comparison) => {
                    debug!("skipped saving {} because contents haven't changed", path.display());
                    return Ok(WriteOutcome::Unchanged);
                }
                Ok(_) => {}
                Err(e) => warn!("error while trying to load existing file {}: {e}; ignored", path.display()),
            }
        }

        self.fs.write(path, contents).map_err(|e| {
            format!("error while trying to write file {}, the file is probably read-only: {e}", path.display())
        })?;
        info!("saved {}", path.display());
        Ok(WriteOutcome::Written)
    }
}

/// Whether `existing` and `generated` are equal under `comparison`.
#[must_use]
pub fn contents_match(existing: &str, generated: &str, comparison: Comparison) -> bool {
    match comparison {
        Comparison::Exact => existing == generated,
        Comparison::IgnoreWhitespaceAndCase => equal_ignoring_whitespace_and_case(existing, generated),
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Advances past whitespace starting at `i + 1`.
fn skip_whitespace(chars: &[char], i: usize) -> usize {
    let mut j = i + 1;
    while j < chars.len() && chars[j].is_whitespace() {
        j += 1;
    }
    j
}

fn equal_ignoring_whitespace_and_case(a: &str, b: &str) -> bool {
    let a: Vec<char> = a.chars().flat_map(char::to_lowercase).collect();
    let b: Vec<char> = b.chars().flat_map(char::to_lowercase).collect();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let (x, y) = (a[i], b[j]);
        if is_blank(x) && is_blank(y) {
            i = skip_whitespace(&a, i);
            j = skip_whitespace(&b, j);
        } else if x.is_whitespace() && i > 0 && a[i - 1] == '\n' {
            i = skip_whitespace(&a, i);
        } else if y.is_whitespace() && j > 0 && b[j - 1] == '\n' {
            j = skip_whitespace(&b, j);
        } else if x != y {
            return false;
        } else {
            i += 1;
            j += 1;
        }
    }

    a.len() - i == b.len() - j
}
