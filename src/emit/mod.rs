//! Project file emitters and the registry that selects them.
//!
//! Each emitter is a pure function from the [`GenerationModel`] to an
//! [`Outputs`] set; writing happens afterwards through the
//! [`IncrementalWriter`]. Backends write disjoint file sets.

pub mod codelite;
pub mod eddie;
pub mod vscode;
pub mod xml;

use std::fmt;
use std::path::{Path, PathBuf};

use log::error;

use crate::context::ServiceContext;
use crate::model::GenerationModel;
use crate::writer::{Comparison, IncrementalWriter, WriteOutcome};

/// A project file format the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectFileFormat {
    /// CodeLite workspace and projects.
    CodeLite,
    /// Eddie worksets.
    Eddie,
    /// Visual Studio Code `.vscode` folder.
    VisualStudioCode,
}

impl ProjectFileFormat {
    /// Every format in registry order.
    pub const ALL: [ProjectFileFormat; 3] = [
        ProjectFileFormat::CodeLite,
        ProjectFileFormat::Eddie,
        ProjectFileFormat::VisualStudioCode,
    ];

    /// Canonical name of the format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectFileFormat::CodeLite => "CodeLite",
            ProjectFileFormat::Eddie => "Eddie",
            ProjectFileFormat::VisualStudioCode => "VisualStudioCode",
        }
    }

    /// Parses one format name, ignoring case. `VSCode` is accepted as an alias.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("vscode") {
            return Some(ProjectFileFormat::VisualStudioCode);
        }
        Self::ALL.into_iter().find(|f| f.as_str().eq_ignore_ascii_case(name))
    }

    /// Parses a `+`-separated list of format names.
    ///
    /// Unknown names are logged and skipped; duplicates are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error string if no valid format remains.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, String> {
        let mut formats = Vec::new();
        for name in list.split('+').map(str::trim).filter(|n| !n.is_empty()) {
            match Self::parse(name) {
                Some(format) if !formats.contains(&format) => formats.push(format),
                Some(_) => {}
                None => error!("invalid project file format '{name}'"),
            }
        }
        if formats.is_empty() {
            return Err(format!("no valid project file format in '{list}'"));
        }
        Ok(formats)
    }
}

impl fmt::Display for ProjectFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated file awaiting the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Destination path.
    pub path: PathBuf,
    /// Full file content.
    pub contents: String,
}

/// Files produced by one emitter run, in generation order.
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    files: Vec<GeneratedFile>,
}

/// What happened when an emitter's outputs were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSummary {
    /// The backend that produced the files.
    pub format: ProjectFileFormat,
    /// Paths that were (re)written.
    pub written: Vec<PathBuf>,
    /// Paths whose content was already up to date.
    pub unchanged: Vec<PathBuf>,
}

impl Outputs {
    /// Creates an empty output set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a file for writing.
    ///
    /// # Errors
    ///
    /// Returns an error string if `path` is already queued.
    pub fn add_file(
        &mut self,
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
    ) -> Result<(), String> {
        let path = path.into();
        if self.files.iter().any(|f| f.path == path) {
            return Err(format!("{} would be generated twice", path.display()));
        }
        self.files.push(GeneratedFile { path, contents: contents.into() });
        Ok(())
    }

    /// The queued files.
    #[must_use]
    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    /// Content queued for `path`, if any.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.iter().find(|f| f.path == path).map(|f| f.contents.as_str())
    }

    /// Writes every queued file through an [`IncrementalWriter`].
    ///
    /// # Errors
    ///
    /// Returns the first write error; later files are not attempted.
    pub fn write(
        &self,
        ctx: &ServiceContext,
        format: ProjectFileFormat,
        comparison: Comparison,
    ) -> Result<EmitSummary, String> {
        let writer = IncrementalWriter::new(ctx.fs.as_ref(), comparison);
        let mut summary = EmitSummary { format, written: Vec::new(), unchanged: Vec::new() };
        for file in &self.files {
            match writer.write_if_changed(&file.path, &file.contents)? {
                WriteOutcome::Written => summary.written.push(file.path.clone()),
                WriteOutcome::Unchanged => summary.unchanged.push(file.path.clone()),
            }
        }
        Ok(summary)
    }
}

/// A project file backend.
pub trait Emitter {
    /// The format this emitter produces.
    fn format(&self) -> ProjectFileFormat;

    /// Generates every file of this format for `model`.
    ///
    /// The context is read-only here; it is consulted for directory
    /// listings some formats need.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    fn generate(&self, ctx: &ServiceContext, model: &GenerationModel) -> Result<Outputs, String>;
}

/// Explicit mapping from format to emitter, built once per run.
pub struct EmitterRegistry {
    emitters: Vec<Box<dyn Emitter>>,
}

impl EmitterRegistry {
    /// Creates a registry with every built-in backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            emitters: vec![
                Box::new(codelite::CodeLiteEmitter),
                Box::new(eddie::EddieEmitter),
                Box::new(vscode::VsCodeEmitter),
            ],
        }
    }

    /// The emitter for `format`, if registered.
    #[must_use]
    pub fn get(&self, format: ProjectFileFormat) -> Option<&dyn Emitter> {
        self.emitters.iter().find(|e| e.format() == format).map(|e| &**e)
    }

    /// Registered formats in registry order.
    #[must_use]
    pub fn formats(&self) -> Vec<ProjectFileFormat> {
        self.emitters.iter().map(|e| e.format()).collect()
    }
}

impl Default for EmitterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{FixedClock, MemoryFileSystem};
    use chrono::Utc;

    #[test]
    fn format_list_parsing() {
        assert_eq!(
            ProjectFileFormat::parse_list("codelite+VSCode").unwrap(),
            vec![ProjectFileFormat::CodeLite, ProjectFileFormat::VisualStudioCode]
        );
        assert_eq!(
            ProjectFileFormat::parse_list("Eddie + bogus + eddie").unwrap(),
            vec![ProjectFileFormat::Eddie]
        );
        assert!(ProjectFileFormat::parse_list("bogus").is_err());
        assert!(ProjectFileFormat::parse_list("").is_err());
    }

    #[test]
    fn registry_has_every_format() {
        let registry = EmitterRegistry::new();
        assert_eq!(registry.formats(), ProjectFileFormat::ALL.to_vec());
        for format in ProjectFileFormat::ALL {
            assert_eq!(registry.get(format).map(|e| e.format()), Some(format));
        }
    }

    #[test]
    fn outputs_report_written_and_unchanged() {
        let fs = MemoryFileSystem::new().with_file("/out/same.txt", "same");
        let ctx = ServiceContext::new(Box::new(fs.clone()), Box::new(FixedClock::at(Utc::now())));

        let mut outputs = Outputs::new();
        outputs.add_file("/out/same.txt", "same").unwrap();
        outputs.add_file("/out/new.txt", "new").unwrap();
        assert_eq!(outputs.get(Path::new("/out/new.txt")), Some("new"));

        let summary = outputs.write(&ctx, ProjectFileFormat::Eddie, Comparison::default()).unwrap();
        assert_eq!(summary.written, vec![PathBuf::from("/out/new.txt")]);
        assert_eq!(summary.unchanged, vec![PathBuf::from("/out/same.txt")]);
        assert_eq!(fs.write_count(), 1);
    }

    #[test]
    fn write_failure_aborts() {
        let fs = MemoryFileSystem::new().read_only();
        let ctx = ServiceContext::new(Box::new(fs), Box::new(FixedClock::at(Utc::now())));
        let mut outputs = Outputs::new();
        outputs.add_file("/out/a.txt", "a").unwrap();
        assert!(outputs.write(&ctx, ProjectFileFormat::CodeLite, Comparison::default()).is_err());
    }

    #[test]
    fn duplicate_output_paths_are_rejected() {
        let mut outputs = Outputs::new();
        outputs.add_file("/out/UE4.Core.wkst", "first").unwrap();
        let err = outputs.add_file("/out/UE4.Core.wkst", "second").unwrap_err();
        assert!(err.contains("/out/UE4.Core.wkst"));
        assert_eq!(outputs.files().len(), 1);
        assert_eq!(outputs.get(Path::new("/out/UE4.Core.wkst")), Some("first"));
    }
}
