//! Declared state loading
//!
//! Reads IaC state files (Terraform JSON state, format version 4) and turns
//! their managed resources into [`Resource`] values.

use crate::error::{CoreError, Result};
use crate::resource::Resource;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

const STATE_VERSION: u32 = 4;
const STATE_EXTENSION: &str = "tfstate";

/// Source of the IaC-declared inventory
#[async_trait]
pub trait StateProvider: Send + Sync {
    /// Every resource declared by the IaC description
    async fn declared_resources(&self) -> Result<Vec<Resource>>;
}

/// Lists state files under a path
///
/// - a file yields itself
/// - a directory yields every `*.tfstate` beneath it
/// - a path containing glob meta characters is expanded
#[derive(Debug, Clone)]
pub struct FileEnumerator {
    path: String,
}

impl FileEnumerator {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn enumerate(&self) -> Result<Vec<PathBuf>> {
        let pattern = if has_meta(&self.path) {
            self.path.clone()
        } else {
            let path = Path::new(&self.path);
            if path.is_file() {
                return Ok(vec![path.to_path_buf()]);
            }
            if !path.is_dir() {
                return Err(CoreError::NoStateFiles(self.path.clone()));
            }
            path.join("**")
                .join(format!("*.{}", STATE_EXTENSION))
                .to_string_lossy()
                .into_owned()
        };

        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Unreadable path while listing state files"),
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(CoreError::NoStateFiles(self.path.clone()));
        }
        tracing::debug!(pattern = %pattern, count = files.len(), "Enumerated state files");
        Ok(files)
    }
}

fn has_meta(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Reads declared resources from Terraform state files
pub struct TerraformStateReader {
    files: Vec<PathBuf>,
}

impl TerraformStateReader {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Build a reader from a path, directory or glob pattern
    pub fn from_path(path: impl Into<String>) -> Result<Self> {
        Ok(Self::new(FileEnumerator::new(path).enumerate()?))
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<Resource>> {
        let content = fs::read_to_string(path).await?;
        let state: StateFile = serde_json::from_str(&content).map_err(|e| CoreError::StateError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if state.version > STATE_VERSION {
            return Err(CoreError::UnsupportedStateVersion {
                path: path.to_path_buf(),
                version: state.version,
                supported: STATE_VERSION,
            });
        }

        let mut resources = Vec::new();
        for entry in state.resources {
            if entry.mode != "managed" {
                tracing::trace!(resource_type = %entry.resource_type, "Skipping data source");
                continue;
            }
            for instance in entry.instances {
                let id = match instance.attributes.get("id").and_then(id_string) {
                    Some(id) => id,
                    None => {
                        tracing::warn!(
                            resource_type = %entry.resource_type,
                            name = %entry.name,
                            "State instance has no id, skipping"
                        );
                        continue;
                    }
                };
                resources.push(Resource::new(
                    entry.resource_type.clone(),
                    id,
                    instance.attributes,
                ));
            }
        }

        tracing::debug!(
            path = %path.display(),
            count = resources.len(),
            "Loaded declared resources"
        );
        Ok(resources)
    }
}

fn id_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl StateProvider for TerraformStateReader {
    async fn declared_resources(&self) -> Result<Vec<Resource>> {
        let mut resources = Vec::new();
        for file in &self.files {
            resources.extend(self.read_file(file).await?);
        }
        Ok(resources)
    }
}

#[derive(Debug, Deserialize)]
struct StateFile {
    version: u32,
    #[serde(default)]
    resources: Vec<StateResource>,
}

#[derive(Debug, Deserialize)]
struct StateResource {
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    instances: Vec<StateInstance>,
}

fn default_mode() -> String {
    "managed".to_string()
}

#[derive(Debug, Deserialize)]
struct StateInstance {
    #[serde(default)]
    attributes: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const STATE: &str = r#"{
        "version": 4,
        "resources": [
            {
                "mode": "managed",
                "type": "aws_s3_bucket",
                "name": "assets",
                "instances": [{"attributes": {"id": "assets-bucket", "acl": "private"}}]
            },
            {
                "mode": "data",
                "type": "aws_caller_identity",
                "name": "current",
                "instances": [{"attributes": {"id": "123"}}]
            },
            {
                "mode": "managed",
                "type": "github_team",
                "name": "core",
                "instances": [{"attributes": {"id": 42}}, {"attributes": {}}]
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_read_managed_resources() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terraform.tfstate");
        std::fs::write(&path, STATE).unwrap();

        let reader = TerraformStateReader::new(vec![path]);
        let resources = reader.declared_resources().await.unwrap();

        let keys: Vec<String> = resources.iter().map(Resource::key).collect();
        assert_eq!(keys, vec!["aws_s3_bucket.assets-bucket", "github_team.42"]);
        assert_eq!(resources[0].get_attribute::<String>("acl").as_deref(), Some("private"));
    }

    #[tokio::test]
    async fn test_rejects_newer_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terraform.tfstate");
        std::fs::write(&path, r#"{"version": 5, "resources": []}"#).unwrap();

        let reader = TerraformStateReader::new(vec![path]);
        let err = reader.declared_resources().await.unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedStateVersion { version: 5, .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_names_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.tfstate");
        std::fs::write(&path, "{not json").unwrap();

        let reader = TerraformStateReader::new(vec![path.clone()]);
        match reader.declared_resources().await {
            Err(CoreError::StateError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected state error, got {:?}", other),
        }
    }

    #[test]
    fn test_enumerate_directory_recursively() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("env/prod")).unwrap();
        std::fs::write(dir.path().join("a.tfstate"), "{}").unwrap();
        std::fs::write(dir.path().join("env/prod/b.tfstate"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = FileEnumerator::new(dir.path().to_string_lossy())
            .enumerate()
            .unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "tfstate"));
    }

    #[test]
    fn test_enumerate_glob_and_single_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("one.json"), "{}").unwrap();
        std::fs::write(dir.path().join("two.json"), "{}").unwrap();

        let pattern = dir.path().join("*.json").to_string_lossy().into_owned();
        assert_eq!(FileEnumerator::new(pattern).enumerate().unwrap().len(), 2);

        let single = dir.path().join("one.json").to_string_lossy().into_owned();
        assert_eq!(FileEnumerator::new(single).enumerate().unwrap().len(), 1);
    }

    #[test]
    fn test_enumerate_nothing_found() {
        let dir = tempdir().unwrap();
        let pattern = dir.path().join("*.tfstate").to_string_lossy().into_owned();
        assert!(matches!(
            FileEnumerator::new(pattern).enumerate(),
            Err(CoreError::NoStateFiles(_))
        ));
        assert!(matches!(
            FileEnumerator::new("/definitely/not/here").enumerate(),
            Err(CoreError::NoStateFiles(_))
        ));
    }
}
