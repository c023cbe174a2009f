//! Eddie worksets.
//!
//! The master workset `<intermediate>/<Master>.wkst` holds one file group
//! per project. Module folders (those holding a `.Build.cs`) are written to
//! their own `<Project>.<Module>.wkst` and referenced with `AddFile`.

use std::path::{Path, PathBuf};

use log::debug;

use crate::context::ServiceContext;
use crate::emit::{Emitter, Outputs, ProjectFileFormat};
use crate::model::GenerationModel;
use crate::paths::{PathMode, PathResolver};
use crate::tree::{build_tree, VirtualFolder};

/// Extensions shown in Eddie worksets.
pub const EDDIE_EXTENSIONS: &[&str] = &[".h", ".hpp", ".inl", ".c", ".cc", ".cpp", ".cs"];

const HEADER: &str = "# @Eddie Workset@";

/// Emits Eddie worksets for every project.
pub struct EddieEmitter;

impl Emitter for EddieEmitter {
    fn format(&self) -> ProjectFileFormat {
        ProjectFileFormat::Eddie
    }

    fn generate(&self, _ctx: &ServiceContext, model: &GenerationModel) -> Result<Outputs, String> {
        let generator = Worksets {
            model,
            resolver: PathResolver::new(model.host, &model.root_dir),
        };
        let mut outputs = Outputs::new();

        let master_name = format!("{}.wkst", model.master_project_name);
        let master_path = model.intermediate_dir.join(&master_name);
        let mut text = generator.header(&master_name, &master_path);

        for project in &model.projects {
            let files = project.source_files.iter().filter(|f| f.has_extension(EDDIE_EXTENSIONS));
            let tree = build_tree(files, &project.base_dir);
            if tree.is_empty() {
                debug!("eddie: skipping {} without source files", project.name);
                continue;
            }
            generator.group(&mut text, 1, &project.name, &project.base_dir, &tree, &project.name, &mut outputs)?;
        }

        outputs.add_file(master_path, text)?;
        Ok(outputs)
    }
}

struct Worksets<'a> {
    model: &'a GenerationModel,
    resolver: PathResolver,
}

impl Worksets<'_> {
    fn header(&self, name: &str, path: &Path) -> String {
        format!("{HEADER}\nAddWorkset \"{name}\" \"{}\"\n", self.absolute(path))
    }

    fn absolute(&self, path: &Path) -> String {
        self.resolver.resolve(path, PathMode::Absolute)
    }

    /// Writes `AddFileGroup`, the folder's contents and `EndFileGroup`.
    #[allow(clippy::too_many_arguments)]
    fn group(
        &self,
        out: &mut String,
        depth: usize,
        name: &str,
        path: &Path,
        folder: &VirtualFolder,
        project: &str,
        outputs: &mut Outputs,
    ) -> Result<(), String> {
        let indent = "\t".repeat(depth);
        out.push_str(&format!("{indent}AddFileGroup \"{name}\" \"{}\"\n", self.absolute(path)));
        self.contents(out, depth + 1, folder, project, outputs)?;
        out.push_str(&format!("{indent}EndFileGroup \"{name}\"\n"));
        Ok(())
    }

    fn contents(
        &self,
        out: &mut String,
        depth: usize,
        folder: &VirtualFolder,
        project: &str,
        outputs: &mut Outputs,
    ) -> Result<(), String> {
        let indent = "\t".repeat(depth);
        for file in &folder.files {
            out.push_str(&format!(
                "{indent}AddFile \"{}\" \"{}\"\n",
                file.file_name(),
                self.absolute(&file.path)
            ));
        }

        for child in folder.children.values() {
            if child.is_documentation() || child.is_empty() {
                continue;
            }
            let child_path = child.full_path.clone().unwrap_or_else(|| PathBuf::from(&child.path));
            if child.is_separable_module {
                let module = child.workset_name.as_deref().unwrap_or(&child.name);
                let file_name = format!("{project}.{module}.wkst");
                let nested_path = self.model.intermediate_dir.join(&file_name);

                let mut nested = self.header(&file_name, &nested_path);
                self.group(&mut nested, 1, &child.name, &child_path, child, project, outputs)?;
                outputs.add_file(&nested_path, nested)?;

                out.push_str(&format!(
                    "{indent}AddFile \"{file_name}\" \"{}\"\n",
                    self.absolute(&nested_path)
                ));
            } else {
                self.group(out, depth, &child.name, &child_path, child, project, outputs)?;
            }
        }
        Ok(())
    }
}
