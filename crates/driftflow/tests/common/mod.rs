#![allow(deprecated)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    /// Write a Terraform v4 state from `(type, attributes)` pairs
    pub fn write_state(&self, name: &str, resources: &[(&str, serde_json::Value)]) -> PathBuf {
        let resources: Vec<serde_json::Value> = resources
            .iter()
            .enumerate()
            .map(|(i, (ty, attributes))| {
                serde_json::json!({
                    "mode": "managed",
                    "type": ty,
                    "name": format!("r{}", i),
                    "instances": [{"attributes": attributes}],
                })
            })
            .collect();
        let state = serde_json::json!({"version": 4, "resources": resources});
        self.write_file(name, &state.to_string())
    }

    pub fn write_snapshot(&self, snapshot: serde_json::Value) -> PathBuf {
        self.write_file("live.json", &snapshot.to_string())
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    /// `drift` running inside the project, isolated from the caller's environment
    pub fn drift(&self) -> Command {
        let mut cmd = Command::cargo_bin("drift").unwrap();
        cmd.current_dir(self.path())
            .env_remove("DRIFTIGNORE_PATH")
            .env_remove("DRIFT_STATE")
            .env_remove("DRIFT_PARALLELISM")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}
