//! Virtual folder trees mirroring the on-disk layout of source files.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::model::SourceFile;

/// Folder name skipped by emitters that honor it.
pub const DOCUMENTATION_FOLDER: &str = "Documentation";

/// Suffix of module build descriptors; a folder holding one is a module.
const MODULE_DESCRIPTOR_SUFFIX: &str = ".build.cs";

/// A folder in the virtual tree.
///
/// Children keep first-seen order, not lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualFolder {
    /// Last path segment; empty for the root.
    pub name: String,
    /// Cumulative `/`-separated path from the root; empty for the root.
    pub path: String,
    /// On-disk directory this folder mirrors, when known.
    pub full_path: Option<PathBuf>,
    /// Set when the folder directly contains a module build descriptor.
    pub is_separable_module: bool,
    /// Name of the nested workset spawned for a separable module.
    pub workset_name: Option<String>,
    /// Child folders keyed by segment name.
    pub children: IndexMap<String, VirtualFolder>,
    /// Files directly in this folder, in insertion order.
    pub files: Vec<SourceFile>,
}

impl VirtualFolder {
    fn child(parent_path: &str, name: &str, full_path: Option<PathBuf>) -> Self {
        let path = if parent_path.is_empty() {
            name.to_string()
        } else {
            format!("{parent_path}/{name}")
        };
        Self { name: name.to_string(), path, full_path, ..Self::default() }
    }

    /// Whether this is the fixed documentation folder.
    #[must_use]
    pub fn is_documentation(&self) -> bool {
        self.name == DOCUMENTATION_FOLDER
    }

    /// Whether this folder and all its descendants hold no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.children.values().all(VirtualFolder::is_empty)
    }

    /// Every file in the subtree, depth first, in emission order.
    #[must_use]
    pub fn all_files(&self) -> Vec<&SourceFile> {
        let mut files: Vec<&SourceFile> = self.files.iter().collect();
        for child in self.children.values() {
            files.extend(child.all_files());
        }
        files
    }
}

/// Groups `files` into a folder tree relative to `base_dir`.
///
/// A file's own `base_folder` overrides `base_dir`. Files outside their base
/// are attached to the root.
#[must_use]
pub fn build_tree<'a>(files: impl IntoIterator<Item = &'a SourceFile>, base_dir: &Path) -> VirtualFolder {
    let mut root = VirtualFolder { full_path: Some(base_dir.to_path_buf()), ..VirtualFolder::default() };

    for file in files {
        let base = file.base_folder.as_deref().unwrap_or(base_dir);
        let relative_dir = file
            .path
            .parent()
            .and_then(|dir| dir.strip_prefix(base).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut folder = &mut root;
        let mut full_path = base.to_path_buf();
        for segment in relative_dir.iter() {
            let segment = segment.to_string_lossy();
            full_path.push(segment.as_ref());
            let parent_path = folder.path.clone();
            folder = folder
                .children
                .entry(segment.to_string())
                .or_insert_with(|| VirtualFolder::child(&parent_path, &segment, Some(full_path.clone())));
        }

        if file.file_name().to_ascii_lowercase().ends_with(MODULE_DESCRIPTOR_SUFFIX) {
            folder.is_separable_module = true;
            if folder.workset_name.is_none() {
                folder.workset_name = Some(folder.name.clone());
            }
        }
        folder.files.push(file.clone());
    }

    root
}
