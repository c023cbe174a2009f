//! `tasks.json`: build and clean tasks for every target and C# project.

use serde::Serialize;

use crate::emit::vscode::data::{CSharpProject, NativeTarget, ProjectData};
use crate::model::platform::{Configuration, Platform, TargetType};
use crate::model::{BuildProduct, GenerationModel, Target};
use crate::paths::{PathMode, PathResolver};

/// Problem matcher for MSBuild/xbuild output.
const CSHARP_PROBLEM_MATCHER: &str = "$msCompile";

const SHADER_COMPILE_WORKER: &str = "ShaderCompileWorker";

/// Which build tool action a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Incremental build.
    Build,
    /// Remove build products.
    Clean,
}

impl TaskAction {
    fn as_str(self) -> &'static str {
        match self {
            TaskAction::Build => "Build",
            TaskAction::Clean => "Clean",
        }
    }
}

/// Label of a native task: `<Target> <Platform> <Configuration> <Action>`.
#[must_use]
pub fn native_label(target: &str, platform: Platform, configuration: Configuration, action: TaskAction) -> String {
    format!("{target} {platform} {configuration} {}", action.as_str())
}

/// Label of a C# task: `<Project> <Configuration> <Action>`.
#[must_use]
pub fn csharp_label(project: &str, configuration: Configuration, action: TaskAction) -> String {
    format!("{project} {configuration} {}", action.as_str())
}

/// The `tasks.json` document.
#[derive(Debug, Clone, Serialize)]
pub struct TasksFile {
    /// Schema version.
    pub version: &'static str,
    /// Every task, native first.
    pub tasks: Vec<Task>,
}

/// One task entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task name referenced by `preLaunchTask` and `dependsOn`.
    pub label: String,
    /// Task group.
    pub group: &'static str,
    /// Script invoked.
    pub command: String,
    /// Script arguments.
    pub args: Vec<String>,
    /// Compiler diagnostics matcher.
    pub problem_matcher: &'static str,
    /// Task runner type.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Working directory.
    pub options: TaskOptions,
    /// Tasks that must run first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

/// Task execution options.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOptions {
    /// Working directory of the task.
    pub cwd: String,
}

/// Builds the tasks document.
#[must_use]
pub fn build(model: &GenerationModel, data: &ProjectData<'_>, resolver: &PathResolver) -> TasksFile {
    let builder = TaskBuilder { model, resolver };
    let build_labels: Vec<String> = data
        .native
        .iter()
        .flat_map(|native| {
            native.target.build_products.iter().map(move |p| {
                native_label(&native.target.name, p.platform, p.configuration, TaskAction::Build)
            })
        })
        .collect();

    let mut tasks: Vec<Task> = Vec::new();
    for native in &data.native {
        for product in &native.target.build_products {
            for action in [TaskAction::Build, TaskAction::Clean] {
                let mut task = builder.native_task(native, product, action);
                // Editor builds first build the shader compiler worker they launch.
                if native.target.target_type == TargetType::Editor && action == TaskAction::Build {
                    let dependency = native_label(
                        SHADER_COMPILE_WORKER,
                        product.platform,
                        Configuration::Development,
                        TaskAction::Build,
                    );
                    if build_labels.contains(&dependency) {
                        task.depends_on.push(dependency);
                    }
                }
                tasks.push(task);
            }
        }
    }

    for csharp in &data.csharp {
        for &configuration in csharp.configurations() {
            for action in [TaskAction::Build, TaskAction::Clean] {
                tasks.push(builder.csharp_task(csharp, configuration, action));
            }
        }
    }

    TasksFile { version: "2.0.0", tasks }
}

struct TaskBuilder<'a> {
    model: &'a GenerationModel,
    resolver: &'a PathResolver,
}

impl TaskBuilder<'_> {
    fn script(&self, name: &str) -> String {
        let host = self.resolver.host();
        let path = self.model.engine_dir.join(host.batch_files_dir).join(name);
        self.resolver.resolve(&path, PathMode::Absolute)
    }

    fn cwd(&self) -> TaskOptions {
        TaskOptions { cwd: self.resolver.resolve(&self.model.root_dir, PathMode::Absolute) }
    }

    fn native_task(&self, native: &NativeTarget<'_>, product: &BuildProduct, action: TaskAction) -> Task {
        let host = self.resolver.host();
        Task {
            label: native_label(&native.target.name, product.platform, product.configuration, action),
            group: "build",
            command: self.script(&format!("Build{}", host.script_extension)),
            args: self.native_args(native.target, product, action),
            problem_matcher: host.problem_matcher,
            kind: "shell",
            options: self.cwd(),
            depends_on: Vec::new(),
        }
    }

    fn native_args(&self, target: &Target, product: &BuildProduct, action: TaskAction) -> Vec<String> {
        let mut args = vec![
            target.name.clone(),
            product.platform.to_string(),
            product.configuration.to_string(),
        ];
        if let Some(uproject) = &product.project_file {
            args.push(self.resolver.resolve(uproject, PathMode::Absolute));
        }
        if self.model.use_precompiled {
            args.push("-useprecompiled".to_string());
        }
        args.push("-waitmutex".to_string());
        if action == TaskAction::Clean {
            args.push("-clean".to_string());
        }
        args
    }

    fn csharp_task(&self, csharp: &CSharpProject<'_>, configuration: Configuration, action: TaskAction) -> Task {
        let target = match action {
            TaskAction::Build => "/t:build",
            TaskAction::Clean => "/t:clean",
        };
        Task {
            label: csharp_label(&csharp.project.name, configuration, action),
            group: "build",
            command: self.script(self.resolver.host().csharp_build_script),
            args: vec![
                target.to_string(),
                format!("/p:Configuration={configuration}"),
                "/v:quiet".to_string(),
                "/nologo".to_string(),
                self.resolver.resolve(&csharp.project.path, PathMode::Absolute),
            ],
            problem_matcher: CSHARP_PROBLEM_MATCHER,
            kind: "shell",
            options: self.cwd(),
            depends_on: Vec::new(),
        }
    }
}
