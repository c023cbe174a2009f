//! `c_cpp_properties.json`: IntelliSense configuration for the C/C++
//! extension.

use serde::Serialize;

use crate::model::GenerationModel;
use crate::paths::{PathMode, PathResolver};

/// Schema version of the properties file.
const PROPERTIES_VERSION: u32 = 4;

/// The `c_cpp_properties.json` document.
#[derive(Debug, Clone, Serialize)]
pub struct PropertiesFile {
    /// A single configuration for the host.
    pub configurations: Vec<PropertiesConfiguration>,
    /// Schema version.
    pub version: u32,
}

/// One IntelliSense configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesConfiguration {
    /// Configuration name, keyed to the host.
    pub name: &'static str,
    /// Combined include directories of every project.
    pub include_path: Vec<String>,
    /// Framework search paths (macOS only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mac_framework_path: Vec<String>,
    /// Combined preprocessor definitions.
    pub defines: Vec<String>,
    /// IntelliSense engine mode.
    pub intelli_sense_mode: &'static str,
    /// Tag parser settings.
    pub browse: Browse,
}

/// Tag parser settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Browse {
    /// Directories the tag parser indexes.
    pub path: Vec<String>,
    /// Restrict symbols to included headers.
    pub limit_symbols_to_included_headers: bool,
    /// Symbol database location; empty uses the extension default.
    pub database_filename: String,
}

/// Builds the properties document.
#[must_use]
pub fn build(model: &GenerationModel, resolver: &PathResolver) -> PropertiesFile {
    let host = resolver.host();
    let include_path: Vec<String> = model
        .combined_include_paths
        .iter()
        .map(|p| resolver.resolve(p, PathMode::Absolute))
        .collect();

    PropertiesFile {
        configurations: vec![PropertiesConfiguration {
            name: host.cpp_properties_name,
            include_path: include_path.clone(),
            mac_framework_path: host.framework_paths.iter().map(ToString::to_string).collect(),
            defines: model.combined_defines(),
            intelli_sense_mode: host.intellisense_mode,
            browse: Browse {
                path: include_path,
                limit_symbols_to_included_headers: true,
                database_filename: String::new(),
            },
        }],
        version: PROPERTIES_VERSION,
    }
}
