//! Path rendering for generated files.
//!
//! Paths are written in the host's grammar: backslashes and drive letters on
//! Windows, forward slashes elsewhere. Escaping for a particular file format
//! (doubled backslashes in JSON, entities in XML) is left to that format's
//! serializer.

use std::path::{Component, Path, PathBuf};

use crate::model::platform::{HostDescriptor, HostPlatform};

/// How a path is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMode {
    /// The full path.
    Absolute,
    /// Relative to a root, when the path is nested under it.
    Relative,
}

/// Renders paths for one host, relative to a default root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    host: HostDescriptor,
    windows: bool,
    root: PathBuf,
}

impl PathResolver {
    /// Creates a resolver for `host` with `root` as the default relative root.
    #[must_use]
    pub fn new(host: HostPlatform, root: impl Into<PathBuf>) -> Self {
        Self {
            host: host.descriptor(),
            windows: host == HostPlatform::Windows,
            root: root.into(),
        }
    }

    /// Renders `path` relative to the default root.
    #[must_use]
    pub fn resolve(&self, path: &Path, mode: PathMode) -> String {
        self.resolve_from(path, mode, &self.root)
    }

    /// Renders `path` relative to `relative_root`.
    ///
    /// Relative mode falls back to the absolute form when `path` is not
    /// nested under `relative_root`.
    #[must_use]
    pub fn resolve_from(&self, path: &Path, mode: PathMode, relative_root: &Path) -> String {
        if mode == PathMode::Relative {
            if let Ok(relative) = path.strip_prefix(relative_root) {
                if relative.as_os_str().is_empty() {
                    return ".".to_string();
                }
                return self.join(relative.components(), false);
            }
        }
        self.join(path.components(), true)
    }

    /// Like [`resolve`](Self::resolve), quoted if the result contains a space.
    #[must_use]
    pub fn quoted(&self, path: &Path, mode: PathMode) -> String {
        self.quote(&self.resolve(path, mode))
    }

    /// Wraps `text` in the host's quote character if it contains a space.
    #[must_use]
    pub fn quote(&self, text: &str) -> String {
        if text.contains(' ') {
            format!("{q}{text}{q}", q = self.host.quote)
        } else {
            text.to_string()
        }
    }

    /// The host conventions this resolver renders for.
    #[must_use]
    pub fn host(&self) -> &HostDescriptor {
        &self.host
    }

    fn join<'a>(&self, components: impl Iterator<Item = Component<'a>>, absolute: bool) -> String {
        let separator = self.host.separator.to_string();
        let mut rooted = false;
        let mut prefix = String::new();
        let mut parts: Vec<String> = Vec::new();
        for component in components {
            match component {
                Component::RootDir => rooted = true,
                Component::Prefix(p) => prefix = p.as_os_str().to_string_lossy().into_owned(),
                Component::CurDir => {}
                Component::ParentDir => parts.push("..".to_string()),
                Component::Normal(part) => {
                    // Components may still hold the other host's separator.
                    let part = part.to_string_lossy();
                    parts.extend(
                        part.split(['/', '\\'])
                            .filter(|s| !s.is_empty())
                            .map(str::to_string),
                    );
                }
            }
        }

        if self.windows && absolute && rooted && prefix.is_empty() {
            if let Some(drive) = drive_letter(&parts) {
                parts.remove(0);
                return format!("{drive}:\\{}", parts.join(&separator));
            }
        }

        let body = parts.join(&separator);
        if rooted {
            format!("{prefix}{separator}{body}")
        } else {
            format!("{prefix}{body}")
        }
    }
}

/// `/c/...` style POSIX drive mounts map back to `C:\...`.
fn drive_letter(parts: &[String]) -> Option<char> {
    let first = parts.first()?;
    let mut chars = first.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() && parts.len() > 1 => {
            Some(letter.to_ascii_uppercase())
        }
        _ => None,
    }
}
