//! CodeLite workspace, per-target projects and code completion helpers.
//!
//! Layout:
//! - `<root>/<Master>.workspace` lists every target project and a build
//!   matrix mapping workspace configurations to project configurations.
//! - `<intermediate>/<Target>.project` holds the file tree, one
//!   configuration per build product and the build tool command lines.
//! - `<root>/<Master>CodeCompletionFolders.txt` and
//!   `<root>/<Master>CodeLitePreProcessor.txt` list include directories and
//!   defines one per line, since CodeLite cannot read them from projects.

use std::path::{Path, PathBuf};

use log::debug;

use crate::context::ServiceContext;
use crate::emit::xml::XmlDocument;
use crate::emit::{Emitter, Outputs, ProjectFileFormat};
use crate::model::platform::{Configuration, HostPlatform, TargetType};
use crate::model::{BuildProduct, GenerationModel, OutputKind, Project, Target};
use crate::paths::{PathMode, PathResolver};
use crate::tree::{build_tree, VirtualFolder};

/// Extensions shown in CodeLite projects.
pub const CODELITE_EXTENSIONS: &[&str] = &[".h", ".cpp", ".cs", ".uproject", ".ini", ".usf", ".ush"];

/// Emits CodeLite files for native projects.
pub struct CodeLiteEmitter;

impl Emitter for CodeLiteEmitter {
    fn format(&self) -> ProjectFileFormat {
        ProjectFileFormat::CodeLite
    }

    fn generate(&self, _ctx: &ServiceContext, model: &GenerationModel) -> Result<Outputs, String> {
        let generator = CodeLiteGenerator::new(model);
        let mut outputs = Outputs::new();

        let mut entries = Vec::new();
        for project in model.native_projects() {
            for target in &project.targets {
                if target.build_products.is_empty() {
                    debug!("codelite: skipping {} without build products", target.name);
                    continue;
                }
                let path = model.intermediate_dir.join(format!("{}.project", target.name));
                outputs.add_file(&path, generator.project_file(project, target)?)?;
                entries.push((target, path));
            }
        }

        let master = &model.master_project_name;
        outputs.add_file(
            model.root_dir.join(format!("{master}.workspace")),
            generator.workspace_file(&entries)?,
        )?;
        outputs.add_file(
            model.root_dir.join(format!("{master}CodeCompletionFolders.txt")),
            lines(model.combined_include_paths.iter().map(|p| generator.absolute(p))),
        )?;
        outputs.add_file(
            model.root_dir.join(format!("{master}CodeLitePreProcessor.txt")),
            lines(model.combined_defines()),
        )?;
        Ok(outputs)
    }
}

struct CodeLiteGenerator<'a> {
    model: &'a GenerationModel,
    resolver: PathResolver,
}

impl<'a> CodeLiteGenerator<'a> {
    fn new(model: &'a GenerationModel) -> Self {
        Self { model, resolver: PathResolver::new(model.host, &model.root_dir) }
    }

    fn absolute(&self, path: &Path) -> String {
        self.resolver.resolve(path, PathMode::Absolute)
    }

    fn quoted(&self, path: &Path) -> String {
        self.resolver.quoted(path, PathMode::Absolute)
    }

    fn workspace_file(&self, entries: &[(&Target, PathBuf)]) -> Result<String, String> {
        let master = &self.model.master_project_name;
        let database = format!("./{master}.tags");

        let mut doc = XmlDocument::new()?;
        doc.open(
            "CodeLite_Workspace",
            &[("Name", master.as_str()), ("Database", database.as_str())],
        )?;
        for (target, path) in entries {
            let relative = self.resolver.resolve(path, PathMode::Relative);
            doc.empty(
                "Project",
                &[("Name", target.name.as_str()), ("Path", relative.as_str()), ("Active", "No")],
            )?;
        }

        doc.open("BuildMatrix", &[])?;
        for configuration in Configuration::ALL {
            let members: Vec<(&Target, &BuildProduct)> = entries
                .iter()
                .filter_map(|(target, _)| {
                    self.matrix_product(target, configuration).map(|p| (*target, p))
                })
                .collect();
            if members.is_empty() {
                continue;
            }
            let selected = if configuration == Configuration::Development { "yes" } else { "no" };
            doc.open(
                "WorkspaceConfiguration",
                &[("Name", configuration.as_str()), ("Selected", selected)],
            )?;
            for (target, product) in members {
                let config_name = config_name(product);
                doc.empty(
                    "Project",
                    &[("Name", target.name.as_str()), ("ConfigName", config_name.as_str())],
                )?;
            }
            doc.close("WorkspaceConfiguration")?;
        }
        doc.close("BuildMatrix")?;
        doc.close("CodeLite_Workspace")?;
        doc.finish()
    }

    /// The product a workspace configuration selects: the host's native
    /// platform when available, else the first platform in canonical order.
    fn matrix_product<'t>(
        &self,
        target: &'t Target,
        configuration: Configuration,
    ) -> Option<&'t BuildProduct> {
        let host_platform = self.model.host.descriptor().target_platform;
        target
            .product_for(host_platform, configuration)
            .or_else(|| target.build_products.iter().find(|p| p.configuration == configuration))
    }

    fn project_file(&self, project: &Project, target: &Target) -> Result<String, String> {
        let base_dir = self.tree_base(project, target);
        let files = project.source_files.iter().filter(|f| f.has_extension(CODELITE_EXTENSIONS));
        let tree = build_tree(files, &base_dir);
        let base_name = base_dir
            .file_name()
            .map_or_else(|| project.name.clone(), |n| n.to_string_lossy().into_owned());

        let mut doc = XmlDocument::new()?;
        doc.open("CodeLite_Project", &[("Name", target.name.as_str()), ("InternalType", "")])?;
        doc.open("VirtualDirectory", &[("Name", base_name.as_str())])?;
        self.write_folder(&mut doc, &tree)?;
        doc.close("VirtualDirectory")?;

        let project_type = match target.build_products.first().map(|p| p.kind) {
            Some(OutputKind::Library) => "Dynamic Library",
            _ => "Executable",
        };
        doc.open("Settings", &[("Type", project_type)])?;
        write_global_settings(&mut doc)?;
        for product in &target.build_products {
            self.write_configuration(&mut doc, target, product, project_type)?;
        }
        doc.close("Settings")?;
        doc.close("CodeLite_Project")?;
        doc.finish()
    }

    fn tree_base(&self, project: &Project, target: &Target) -> PathBuf {
        if let Some(dir) = target.project_file.as_deref().and_then(Path::parent) {
            return dir.to_path_buf();
        }
        if target.target_type == TargetType::Program {
            return project.base_dir.clone();
        }
        self.model.engine_dir.clone()
    }

    fn write_folder(&self, doc: &mut XmlDocument, folder: &VirtualFolder) -> Result<(), String> {
        for file in &folder.files {
            let path = self.absolute(&file.path);
            doc.empty("File", &[("Name", path.as_str())])?;
        }
        for child in folder.children.values().filter(|c| !c.is_empty()) {
            doc.open("VirtualDirectory", &[("Name", child.name.as_str())])?;
            self.write_folder(doc, child)?;
            doc.close("VirtualDirectory")?;
        }
        Ok(())
    }

    fn write_configuration(
        &self,
        doc: &mut XmlDocument,
        target: &Target,
        product: &BuildProduct,
        project_type: &str,
    ) -> Result<(), String> {
        let name = config_name(product);
        doc.open(
            "Configuration",
            &[
                ("Name", name.as_str()),
                ("CompilerType", ""),
                ("DebuggerType", debugger_type(self.model.host)),
                ("Type", project_type),
                ("BuildCmpWithGlobalSettings", "append"),
                ("BuildLnkWithGlobalSettings", "append"),
                ("BuildResWithGlobalSettings", "append"),
            ],
        )?;

        let command = self.absolute(&product.output);
        let arguments = self.command_arguments(target, product);
        let working_dir = product.output.parent().map(|d| self.absolute(d)).unwrap_or_default();
        doc.empty(
            "General",
            &[
                ("OutputFile", ""),
                ("IntermediateDirectory", ""),
                ("Command", command.as_str()),
                ("CommandArguments", arguments.as_str()),
                ("UseSeparateDebugArgs", "no"),
                ("DebugArguments", ""),
                ("WorkingDirectory", working_dir.as_str()),
                ("PauseExecWhenProcTerminates", "yes"),
                ("IsGUIProgram", "no"),
                ("IsEnabled", "yes"),
            ],
        )?;

        let build = self.build_command(target, product, false);
        let clean = self.build_command(target, product, true);
        doc.open("CustomBuild", &[("Enabled", "yes")])?;
        doc.text_element("RebuildCommand", &[], &format!("{clean} && {build}"))?;
        doc.text_element("CleanCommand", &[], &clean)?;
        doc.text_element("BuildCommand", &[], &build)?;
        for (cook_name, extra) in COOK_TARGETS {
            let cook = self.cook_command(target, product, extra);
            doc.text_element("Target", &[("Name", cook_name)], &cook)?;
        }
        doc.text_element("WorkingDirectory", &[], &self.absolute(&self.model.engine_dir))?;
        doc.close("CustomBuild")?;
        doc.close("Configuration")
    }

    fn command_arguments(&self, target: &Target, product: &BuildProduct) -> String {
        match target.target_type {
            TargetType::Game if product.configuration.is_debug() => "-debug".to_string(),
            TargetType::Editor => match &target.project_file {
                Some(uproject) => format!("{} -game", self.quoted(uproject)),
                None => String::new(),
            },
            _ => String::new(),
        }
    }

    fn build_command(&self, target: &Target, product: &BuildProduct, clean: bool) -> String {
        let tool = self.model.engine_dir.join("Binaries").join("DotNET").join("UnrealBuildTool.exe");
        let mut command = String::new();
        if let Some(launcher) = self.resolver.host().tool_launcher {
            command.push_str(launcher);
            command.push(' ');
        }
        command.push_str(&self.quoted(&tool));
        command.push_str(&format!(" {} {} {}", target.name, product.platform, product.configuration));
        if let Some(uproject) = &product.project_file {
            command.push_str(&format!(" -project={}", self.quoted(uproject)));
        }
        if self.model.use_precompiled {
            command.push_str(" -useprecompiled");
        }
        if clean {
            command.push_str(" -clean");
        }
        command
    }

    fn cook_command(&self, target: &Target, product: &BuildProduct, extra: &str) -> String {
        let host = self.resolver.host();
        let uat = self
            .model
            .engine_dir
            .join("Build")
            .join("BatchFiles")
            .join(format!("RunUAT{}", host.script_extension));
        let mut command = format!("{} BuildCookRun", self.quoted(&uat));
        if let Some(uproject) = &target.project_file {
            command.push_str(&format!(" -project={}", self.quoted(uproject)));
        }
        let configuration = product.configuration;
        command.push_str(&format!(
            " -platform={} -clientconfig={configuration} -serverconfig={configuration} -cook -allmaps -noP4",
            product.platform
        ));
        command.push_str(extra);
        command
    }
}

const COOK_TARGETS: [(&str, &str); 3] = [
    ("Cook Game", ""),
    ("Cook Game (Iterative)", " -iterate"),
    ("Cook and Package Game", " -stage -pak -archive"),
];

fn config_name(product: &BuildProduct) -> String {
    format!("{}_{}", product.configuration, product.platform)
}

fn debugger_type(host: HostPlatform) -> &'static str {
    match host {
        HostPlatform::Mac => "LLDB Debugger",
        HostPlatform::Windows | HostPlatform::Linux => "GNU gdb debugger",
    }
}

fn write_global_settings(doc: &mut XmlDocument) -> Result<(), String> {
    doc.open("GlobalSettings", &[])?;
    doc.open("Compiler", &[("Options", ""), ("C_Options", ""), ("Assembler", "")])?;
    doc.empty("IncludePath", &[("Value", ".")])?;
    doc.close("Compiler")?;
    doc.open("Linker", &[("Options", "")])?;
    doc.empty("LibraryPath", &[("Value", ".")])?;
    doc.close("Linker")?;
    doc.empty("ResourceCompiler", &[("Options", "")])?;
    doc.close("GlobalSettings")
}

fn lines(items: impl IntoIterator<Item = String>) -> String {
    items.into_iter().map(|line| line + "\n").collect()
}
