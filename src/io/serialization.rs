// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project data serialization and deserialization.
//!
//! This module handles exporting and importing projects (outline plus
//! beats) in YAML and JSON formats.

use crate::models::project::ProjectData;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Supported project file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            other => bail!("Unsupported file extension: {:?}", other),
        }
    }
}

/// Export project data to YAML format.
pub fn export_yaml(data: &ProjectData, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export project data to JSON format.
pub fn export_json(data: &ProjectData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import project data from YAML format.
pub fn import_yaml(path: &Path) -> Result<ProjectData> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import project data from JSON format.
pub fn import_json(path: &Path) -> Result<ProjectData> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Export in the format implied by the file extension.
pub fn export(data: &ProjectData, path: &Path) -> Result<()> {
    match Format::from_path(path)? {
        Format::Yaml => export_yaml(data, path),
        Format::Json => export_json(data, path),
    }
    .with_context(|| format!("Failed to export project to {}", path.display()))
}

/// Import in the format implied by the file extension.
pub fn import(path: &Path) -> Result<ProjectData> {
    match Format::from_path(path)? {
        Format::Yaml => import_yaml(path),
        Format::Json => import_json(path),
    }
    .with_context(|| format!("Failed to import project from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::beat::Anchor;
    use crate::models::outline::Outline;
    use crate::models::template::instantiate;

    fn project() -> ProjectData {
        let mut data = ProjectData::new("Heist".into(), Outline::sample());
        data.beats = instantiate("seven-point", 1.0, 2.0);
        data.beats[0].anchors.from = Anchor::scene("scene-1");
        data.beats[0].notes = "Open on the vault".into();
        data
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("beatline-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.yml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert!(Format::from_path(Path::new("a.txt")).is_err());
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_yaml_file_preserves_anchors() {
        let path = temp_path("project.yaml");
        let data = project();
        export(&data, &path).unwrap();
        let loaded = import(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.beats[0].anchors.from.scene.as_deref(), Some("scene-1"));
        assert_eq!(loaded.beats[0].notes, "Open on the vault");
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_json_file() {
        let path = temp_path("project.json");
        let data = project();
        export(&data, &path).unwrap();
        let loaded = import(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.outline, data.outline);
        assert_eq!(loaded.beats.len(), 7);
    }

    #[test]
    fn test_minimal_json_defaults() {
        let path = temp_path("minimal.json");
        std::fs::write(&path, r#"{"name": "Empty"}"#).unwrap();
        let loaded = import(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.template_id, "save-the-cat");
        assert!(loaded.beats.is_empty());
        assert!(loaded.outline.acts.is_empty());
    }
}
