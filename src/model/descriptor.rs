//! Model file: the resolved build description handed to the generator.
//!
//! The descriptor loader only checks that the YAML is well formed and
//! matches these types; anything semantic (platform filtering, naming,
//! source filtering) happens during ingestion.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::platform::{Configuration, Platform, TargetType};
use crate::ports::FileSystem;

/// Top-level model file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Overall project root; relative paths and the workspace live here.
    pub root_dir: PathBuf,
    /// Engine directory (holds `Binaries/`, `Build/` and `Intermediate/`).
    pub engine_dir: PathBuf,
    /// Base name of the master project (workspace, workset).
    #[serde(default = "default_master_project_name")]
    pub master_project_name: String,
    /// Directory for per-target project files; defaults to
    /// `<engine_dir>/Intermediate/ProjectFiles`.
    #[serde(default)]
    pub intermediate_dir: Option<PathBuf>,
    /// Platforms configured for this generation run.
    #[serde(default)]
    pub platforms: Vec<Platform>,
    /// SDK availability per platform; a missing entry means unavailable.
    #[serde(default)]
    pub sdks: BTreeMap<Platform, bool>,
    /// Whether projects flagged `is_engine` are included.
    #[serde(default = "default_true")]
    pub include_engine_projects: bool,
    /// Whether build command lines pass `-useprecompiled`.
    #[serde(default)]
    pub use_precompiled: bool,
    /// Compiler-default include directories of the host.
    #[serde(default)]
    pub host_include_paths: Vec<PathBuf>,
    /// Projects to generate files for.
    #[serde(default)]
    pub projects: Vec<ProjectDescriptor>,
}

/// Language of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// C++ project built by the build tool.
    #[default]
    Native,
    /// C#/.NET project built by MSBuild/xbuild.
    #[serde(alias = "c#", alias = "dotnet")]
    Csharp,
}

/// One project as discovered by the build tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    /// Path of the project descriptor; the project's identity.
    pub path: PathBuf,
    /// Display name; defaults to the descriptor file stem.
    #[serde(default)]
    pub name: Option<String>,
    /// Language of the project.
    #[serde(default)]
    pub kind: ProjectKind,
    /// Directory the project's files are grouped relative to.
    pub base_dir: PathBuf,
    /// Whether this project belongs to the engine rather than a game.
    #[serde(default)]
    pub is_engine: bool,
    /// Declared include search paths.
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,
    /// Declared system include search paths.
    #[serde(default)]
    pub system_include_paths: Vec<PathBuf>,
    /// Source files discovered for the project (unfiltered).
    #[serde(default)]
    pub source_files: Vec<SourceFileDescriptor>,
    /// Target rules declared by the project.
    #[serde(default)]
    pub targets: Vec<TargetRules>,
    /// Build outputs of a C# project.
    #[serde(default)]
    pub csharp: Option<CSharpDescriptor>,
}

/// A discovered source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFileDescriptor {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Folder the file is grouped relative to, overriding the project's.
    #[serde(default)]
    pub base_folder: Option<PathBuf>,
}

/// How a target's modules are linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Chosen from the target type.
    #[default]
    Default,
    /// One binary per module.
    Modular,
    /// Everything in one binary.
    Monolithic,
}

/// Whether a target shares the engine's build environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildEnvironment {
    /// Shares engine binaries and settings.
    #[default]
    Shared,
    /// Has its own build environment.
    Unique,
}

/// A (platform, configuration) pair the platform toolchain rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfiguration {
    /// Platform half of the pair.
    pub platform: Platform,
    /// Configuration half of the pair.
    pub configuration: Configuration,
}

/// Resolved rules of one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRules {
    /// Target name (`UE4Editor`, `ShooterGame`, ...).
    pub name: String,
    /// Target type.
    #[serde(rename = "type")]
    pub target_type: TargetType,
    /// Platforms the target declares support for.
    #[serde(default)]
    pub platforms: Vec<Platform>,
    /// Declared link type.
    #[serde(default)]
    pub link_type: LinkType,
    /// Declared build environment.
    #[serde(default)]
    pub build_environment: BuildEnvironment,
    /// Forces binaries into the engine's `Binaries/` directory.
    #[serde(default)]
    pub output_to_engine_binaries: bool,
    /// Owning `.uproject` for targets that live outside the engine.
    #[serde(default)]
    pub project_file: Option<PathBuf>,
    /// Architecture suffix appended to binary names.
    #[serde(default)]
    pub architecture: String,
    /// Sub-folder of `Binaries/<Platform>/` for executables.
    #[serde(default)]
    pub exe_subfolder: Option<String>,
    /// Configuration whose binaries carry no platform/configuration suffix.
    #[serde(default = "default_undecorated_configuration")]
    pub undecorated_configuration: Configuration,
    /// Override of the engine default application name.
    #[serde(default)]
    pub engine_app_name: Option<String>,
    /// Whether the link environment produces a console application.
    #[serde(default)]
    pub console_application: bool,
    /// Whether the target builds a dynamic library instead of an executable.
    #[serde(default)]
    pub compile_as_dll: bool,
    /// Combinations the platform toolchain reports invalid for this target.
    #[serde(default)]
    pub invalid_combinations: Vec<PlatformConfiguration>,
    /// Preprocessor definitions of the target's compile environment.
    #[serde(default)]
    pub defines: Vec<String>,
}

impl TargetRules {
    /// The link type after resolving `Default` from the target type.
    #[must_use]
    pub fn resolved_link_type(&self) -> LinkType {
        match self.link_type {
            LinkType::Default if self.target_type == TargetType::Editor => LinkType::Modular,
            LinkType::Default => LinkType::Monolithic,
            explicit => explicit,
        }
    }

    /// Name of the shared engine executable for modular targets of this type.
    #[must_use]
    pub fn engine_app_name(&self) -> String {
        self.engine_app_name.clone().unwrap_or_else(|| format!("UE4{}", self.target_type))
    }
}

/// Outputs of a C# project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CSharpDescriptor {
    /// Assembly produced by the project.
    pub output_file: PathBuf,
    /// Configurations the project builds in.
    #[serde(default = "default_csharp_configurations")]
    pub configurations: Vec<Configuration>,
}

/// Answers the platform questions ingestion asks of the build tool.
pub trait PlatformSupport {
    /// Whether the SDK for `platform` is installed.
    fn is_sdk_available(&self, platform: Platform) -> bool;

    /// Whether the toolchain accepts this target/platform/configuration.
    fn is_valid_combination(
        &self,
        target: &TargetRules,
        platform: Platform,
        configuration: Configuration,
    ) -> bool;
}

impl PlatformSupport for ModelDescriptor {
    fn is_sdk_available(&self, platform: Platform) -> bool {
        self.sdks.get(&platform).copied().unwrap_or(false)
    }

    fn is_valid_combination(
        &self,
        target: &TargetRules,
        platform: Platform,
        configuration: Configuration,
    ) -> bool {
        !target
            .invalid_combinations
            .iter()
            .any(|c| c.platform == platform && c.configuration == configuration)
    }
}

impl ModelDescriptor {
    /// Parses a model from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error string if the YAML is malformed or does not match
    /// the model schema.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("failed to parse model: {e}"))
    }

    /// Loads a model file through the filesystem port.
    ///
    /// # Errors
    ///
    /// Returns an error string if the file cannot be read or parsed.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, String> {
        let yaml = fs
            .read_to_string(path)
            .map_err(|e| format!("failed to read model file {}: {e}", path.display()))?;
        Self::from_yaml(&yaml).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Directory that receives per-target project files and worksets.
    #[must_use]
    pub fn intermediate_dir(&self) -> PathBuf {
        self.intermediate_dir
            .clone()
            .unwrap_or_else(|| self.engine_dir.join("Intermediate").join("ProjectFiles"))
    }
}

fn default_master_project_name() -> String {
    "UE4".to_string()
}

fn default_true() -> bool {
    true
}

fn default_undecorated_configuration() -> Configuration {
    Configuration::Development
}

fn default_csharp_configurations() -> Vec<Configuration> {
    vec![Configuration::Debug, Configuration::Development]
}
