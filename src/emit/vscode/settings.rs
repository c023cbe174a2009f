//! `settings.json`: hides build output and content folders from the
//! explorer.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::context::ServiceContext;
use crate::emit::vscode::data::ProjectData;
use crate::model::GenerationModel;

/// Top-level project folders that stay visible.
pub const VISIBLE_FOLDERS: &[&str] = &[
    "Binaries", "Build", "Config", "Plugins", "Source", "Private", "Public", "Classes", "Resources",
];

/// Folder under the root that receives the generated JSON files.
const VSCODE_DIR: &str = ".vscode";

/// Build output folders of C# projects.
const CSHARP_OUTPUT_FOLDERS: &[&str] = &["obj", "bin"];

/// The `settings.json` document.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsFile {
    /// Glob patterns hidden from the explorer.
    #[serde(rename = "files.exclude")]
    pub files_exclude: BTreeMap<String, bool>,
}

/// Builds the settings document by listing each native project's
/// directory.
///
/// Directories that cannot be listed contribute nothing. Folders that
/// generation itself creates are excluded whether or not they exist yet,
/// so a second run produces the same document. C# projects only hide
/// their build output.
#[must_use]
pub fn build(ctx: &ServiceContext, model: &GenerationModel, data: &ProjectData<'_>) -> SettingsFile {
    let mut files_exclude = BTreeMap::new();
    let generated = [model.intermediate_dir.clone(), model.root_dir.join(VSCODE_DIR)];

    for project in model.native_projects() {
        for path in generated.iter().filter_map(|dir| top_level(&project.base_dir, dir)) {
            files_exclude.insert(glob(&model.root_dir, &path), true);
        }

        let entries = match ctx.fs.list_dir(&project.base_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("cannot list {}: {e}", project.base_dir.display());
                continue;
            }
        };
        for name in entries {
            let path = project.base_dir.join(&name);
            if ctx.fs.is_dir(&path) && !VISIBLE_FOLDERS.contains(&name.as_str()) {
                files_exclude.insert(glob(&model.root_dir, &path), true);
            }
        }
    }

    for csharp in &data.csharp {
        for folder in CSHARP_OUTPUT_FOLDERS {
            let path = csharp.project.base_dir.join(folder);
            files_exclude.insert(glob(&model.root_dir, &path), true);
        }
    }

    SettingsFile { files_exclude }
}

/// The child of `base` that contains `dir`, unless it is allow-listed.
fn top_level(base: &Path, dir: &Path) -> Option<PathBuf> {
    let first = match dir.strip_prefix(base).ok()?.components().next()? {
        Component::Normal(name) => name.to_string_lossy().into_owned(),
        _ => return None,
    };
    (!VISIBLE_FOLDERS.contains(&first.as_str())).then(|| base.join(first))
}

/// Exclusion globs are `/`-separated and relative to the workspace root
/// when possible.
fn glob(root: &Path, path: &Path) -> String {
    let (relative, rooted) = match path.strip_prefix(root) {
        Ok(rest) => (rest, false),
        Err(_) => (path, true),
    };
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if rooted {
        format!("/{}", parts.join("/"))
    } else {
        parts.join("/")
    }
}
