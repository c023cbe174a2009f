//! Visual Studio Code `.vscode` folder.
//!
//! Four independent JSON documents are written: `tasks.json`,
//! `launch.json`, `c_cpp_properties.json` and `settings.json`. Each is
//! built as typed data and serialized once.

pub mod data;
pub mod launch;
pub mod properties;
pub mod settings;
pub mod tasks;

use serde::Serialize;

use crate::context::ServiceContext;
use crate::emit::{Emitter, Outputs, ProjectFileFormat};
use crate::model::GenerationModel;
use crate::paths::PathResolver;

use self::data::ProjectData;

/// Emits the `.vscode` folder.
pub struct VsCodeEmitter;

impl Emitter for VsCodeEmitter {
    fn format(&self) -> ProjectFileFormat {
        ProjectFileFormat::VisualStudioCode
    }

    fn generate(&self, ctx: &ServiceContext, model: &GenerationModel) -> Result<Outputs, String> {
        let data = ProjectData::from_model(model);
        let resolver = PathResolver::new(model.host, &model.root_dir);
        let dir = model.root_dir.join(".vscode");

        let mut outputs = Outputs::new();
        outputs.add_file(dir.join("tasks.json"), to_json(&tasks::build(model, &data, &resolver))?)?;
        outputs
            .add_file(dir.join("launch.json"), to_json(&launch::build(model, &data, &resolver))?)?;
        outputs.add_file(
            dir.join("c_cpp_properties.json"),
            to_json(&properties::build(model, &resolver))?,
        )?;
        outputs.add_file(dir.join("settings.json"), to_json(&settings::build(ctx, model, &data))?)?;
        Ok(outputs)
    }
}

/// Pretty-prints `value` with a trailing newline.
fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    let mut text =
        serde_json::to_string_pretty(value).map_err(|e| format!("failed to serialize JSON: {e}"))?;
    text.push('\n');
    Ok(text)
}
