//! The normalized generation model.
//!
//! [`ingest::ingest`] turns a [`descriptor::ModelDescriptor`] into a
//! [`GenerationModel`]; emitters only ever read the result.

pub mod descriptor;
pub mod ingest;
pub mod platform;

use std::path::{Path, PathBuf};

use crate::model::descriptor::ProjectKind;
use crate::model::platform::{Configuration, HostPlatform, Platform, TargetType};

/// Everything an emitter needs for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationModel {
    /// Overall project root.
    pub root_dir: PathBuf,
    /// Engine directory.
    pub engine_dir: PathBuf,
    /// Directory receiving per-target project files.
    pub intermediate_dir: PathBuf,
    /// Base name of the master project.
    pub master_project_name: String,
    /// Host the generated files are for.
    pub host: HostPlatform,
    /// Whether build command lines pass `-useprecompiled`.
    pub use_precompiled: bool,
    /// Projects sorted by descriptor file name.
    pub projects: Vec<Project>,
    /// Union of every project's include set, in first-seen order.
    pub combined_include_paths: Vec<PathBuf>,
}

impl GenerationModel {
    /// Native (C++) projects in model order.
    pub fn native_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.kind == ProjectKind::Native)
    }

    /// C# projects in model order.
    pub fn csharp_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.kind == ProjectKind::Csharp)
    }

    /// Union of the defines of every native target, in first-seen order.
    #[must_use]
    pub fn combined_defines(&self) -> Vec<String> {
        let mut defines: Vec<String> = Vec::new();
        for target in self.native_projects().flat_map(|p| &p.targets) {
            for define in &target.defines {
                if !defines.contains(define) {
                    defines.push(define.clone());
                }
            }
        }
        defines
    }
}

/// A compilation unit keyed by its descriptor path.
#[derive(Debug, Clone)]
pub struct Project {
    /// Descriptor path; the project's identity.
    pub path: PathBuf,
    /// Display name.
    pub name: String,
    /// Language of the project.
    pub kind: ProjectKind,
    /// Directory the project's files are grouped relative to.
    pub base_dir: PathBuf,
    /// Whether the project belongs to the engine.
    pub is_engine: bool,
    /// Filtered source files in discovery order.
    pub source_files: Vec<SourceFile>,
    /// Targets declared by the project.
    pub targets: Vec<Target>,
    /// Own, system and host include directories that exist, deduplicated.
    pub include_paths: Vec<PathBuf>,
    /// Build outputs of a C# project.
    pub csharp: Option<CSharpOutput>,
}

/// One buildable target of a project.
#[derive(Debug, Clone)]
pub struct Target {
    /// Target name.
    pub name: String,
    /// Target type.
    pub target_type: TargetType,
    /// Owning `.uproject` when the target lives outside the engine.
    pub project_file: Option<PathBuf>,
    /// At most one product per (platform, configuration), canonical order.
    pub build_products: Vec<BuildProduct>,
    /// Preprocessor definitions for IntelliSense.
    pub defines: Vec<String>,
}

impl Target {
    /// Whether the target belongs to a game project outside the engine.
    #[must_use]
    pub fn is_foreign(&self) -> bool {
        self.project_file.is_some()
    }

    /// The product for a (platform, configuration) pair, if supported.
    #[must_use]
    pub fn product_for(
        &self,
        platform: Platform,
        configuration: Configuration,
    ) -> Option<&BuildProduct> {
        self.build_products
            .iter()
            .find(|p| p.platform == platform && p.configuration == configuration)
    }

    /// Platforms with at least one product, in canonical order.
    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = self.build_products.iter().map(|p| p.platform).collect();
        platforms.dedup();
        platforms
    }
}

/// What kind of file a build product is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// A runnable program.
    Executable,
    /// A dynamic library.
    Library,
}

/// A resolved (platform, configuration) output of a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProduct {
    /// Platform built for.
    pub platform: Platform,
    /// Configuration built in.
    pub configuration: Configuration,
    /// Path of the produced binary.
    pub output: PathBuf,
    /// Owning `.uproject` for foreign targets.
    pub project_file: Option<PathBuf>,
    /// Executable or library.
    pub kind: OutputKind,
}

/// A source file retained for the IDE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Folder the file is grouped relative to, overriding the project's.
    pub base_folder: Option<PathBuf>,
}

impl SourceFile {
    /// The file name, lossily converted.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Whether the file's extension (with dot, any case) is in `extensions`.
    #[must_use]
    pub fn has_extension(&self, extensions: &[&str]) -> bool {
        has_extension(&self.path, extensions)
    }
}

/// Whether the extension of `path` (with dot, any case) is in `extensions`.
#[must_use]
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .is_some_and(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(&ext)))
}

/// Build outputs of a C# project.
#[derive(Debug, Clone)]
pub struct CSharpOutput {
    /// Assembly produced by the project.
    pub output_file: PathBuf,
    /// Configurations the project builds in.
    pub configurations: Vec<Configuration>,
}
