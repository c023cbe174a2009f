//! `launch.json`: debugger configurations for runnable targets on the host.

use serde::Serialize;

use crate::emit::vscode::data::ProjectData;
use crate::emit::vscode::tasks::{csharp_label, native_label, TaskAction};
use crate::model::platform::TargetType;
use crate::model::{GenerationModel, OutputKind};
use crate::paths::{PathMode, PathResolver};

/// The `launch.json` document.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchFile {
    /// Schema version.
    pub version: &'static str,
    /// Every debug configuration.
    pub configurations: Vec<LaunchConfiguration>,
}

/// One debugger configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfiguration {
    /// Display name, `<Target> (<Configuration>)`.
    pub name: String,
    /// Always `launch`.
    pub request: &'static str,
    /// Build task run before launching.
    pub pre_launch_task: String,
    /// Executable to debug.
    pub program: String,
    /// Program arguments.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: String,
    /// Debugger type.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Debugger back-end for `cppdbg`.
    #[serde(rename = "MIMode", skip_serializing_if = "Option::is_none")]
    pub mi_mode: Option<&'static str>,
    /// Whether to stop at the program entry point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_at_entry: Option<bool>,
    /// Whether to run in an external console.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_console: Option<bool>,
}

/// Builds the launch document.
///
/// Only products for the host's own platform are launchable; libraries and
/// targets without such a product are skipped.
#[must_use]
pub fn build(model: &GenerationModel, data: &ProjectData<'_>, resolver: &PathResolver) -> LaunchFile {
    let host = resolver.host();
    let cwd = resolver.resolve(&model.root_dir, PathMode::Absolute);
    let mut configurations = Vec::new();

    for native in &data.native {
        let target = native.target;
        let products = target
            .build_products
            .iter()
            .filter(|p| p.platform == host.target_platform && p.kind == OutputKind::Executable);
        for product in products {
            let mut args = Vec::new();
            if target.target_type == TargetType::Editor {
                if let Some(uproject) = &target.project_file {
                    args.push(resolver.resolve(uproject, PathMode::Absolute));
                }
                if product.configuration.is_debug() {
                    args.push("-debug".to_string());
                }
            }

            configurations.push(LaunchConfiguration {
                name: format!("{} ({})", target.name, product.configuration),
                request: "launch",
                pre_launch_task: native_label(
                    &target.name,
                    product.platform,
                    product.configuration,
                    TaskAction::Build,
                ),
                program: resolver.resolve(&product.output, PathMode::Absolute),
                args,
                cwd: cwd.clone(),
                kind: host.native_debugger,
                mi_mode: host.mi_mode,
                stop_at_entry: Some(false),
                external_console: Some(false),
            });
        }
    }

    for csharp in &data.csharp {
        let program = resolver.resolve(&csharp.output.output_file, PathMode::Absolute);
        for &configuration in csharp.configurations() {
            configurations.push(LaunchConfiguration {
                name: format!("{} ({configuration})", csharp.project.name),
                request: "launch",
                pre_launch_task: csharp_label(&csharp.project.name, configuration, TaskAction::Build),
                program: program.clone(),
                args: Vec::new(),
                cwd: cwd.clone(),
                kind: host.managed_debugger,
                mi_mode: None,
                stop_at_entry: None,
                external_console: None,
            });
        }
    }

    LaunchFile { version: "0.2.0", configurations }
}
