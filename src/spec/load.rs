use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::types::ResourceSpec;
use crate::error::{GenError, Result};

/// Formatter command as written in a spec document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterSettings {
    /// Executable name or path
    pub command: String,
    /// Arguments passed before the rendered text is piped to stdin
    #[serde(default)]
    pub args: Vec<String>,
}

/// Generator settings that may accompany the resource list in a document
///
/// Every field is optional; [`GeneratorConfig`](crate::config::GeneratorConfig)
/// fills in defaults and applies environment and command-line overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecosystem_root: Option<String>,
    /// Template directory, relative to the document when not absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<FormatterSettings>,
}

/// A deserialized spec document: settings plus the ordered resource list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecDocument {
    #[serde(flatten)]
    pub settings: DocumentSettings,
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,
}

/// Serialization format of a spec document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick a format from a file extension; anything unknown is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            Some("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Parse a spec document from text.
pub fn parse_document(content: &str, format: DocumentFormat) -> std::result::Result<SpecDocument, String> {
    match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}

/// Load a spec document from disk.
///
/// A relative `templates` directory is resolved against the document's own
/// directory so a document can ship next to its templates.
pub fn load_document(path: &Path) -> Result<SpecDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| GenError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut document =
        parse_document(&content, DocumentFormat::from_path(path)).map_err(|message| {
            GenError::Load {
                path: path.to_path_buf(),
                message,
            }
        })?;
    if let Some(templates) = document.settings.templates.as_mut() {
        if templates.is_relative() {
            if let Some(parent) = path.parent() {
                *templates = parent.join(&*templates);
            }
        }
    }
    Ok(document)
}
