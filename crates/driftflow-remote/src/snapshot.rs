//! Live inventory recorded as a JSON file
//!
//! A snapshot maps each resource type to the raw objects read from the
//! provider, or to an error recorded for that type:
//!
//! ```json
//! {
//!   "aws_s3_bucket": [{"id": "logs", "acl": "private"}],
//!   "aws_iam_user": {"error": "AccessDenied"}
//! }
//! ```

use crate::error::{RemoteError, Result};
use crate::reader::{Enumerator, JsonDeserializer, ReadResourceArgs, ResourceReader};
use crate::supplier::{ResourceSupplier, Supplier};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Resources(Vec<serde_json::Value>),
    Failed { error: String },
}

/// Objects of one type, indexed by id at load
#[derive(Debug, Clone, Default)]
struct TypeEntries {
    ids: Vec<String>,
    by_id: HashMap<String, serde_json::Value>,
}

impl TypeEntries {
    fn index(resource_type: &str, values: Vec<serde_json::Value>) -> Self {
        let mut entries = Self::default();
        for value in values {
            let id = match value.get("id") {
                Some(serde_json::Value::String(id)) => id.clone(),
                Some(serde_json::Value::Number(id)) => id.to_string(),
                _ => {
                    tracing::warn!(
                        resource_type = %resource_type,
                        "Skipping snapshot entry without id"
                    );
                    continue;
                }
            };
            // First occurrence wins
            if let Entry::Vacant(slot) = entries.by_id.entry(id.clone()) {
                slot.insert(value);
                entries.ids.push(id);
            }
        }
        entries
    }
}

#[derive(Debug, Clone)]
enum SnapshotEntry {
    Resources(TypeEntries),
    Failed { error: String },
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: BTreeMap<String, SnapshotEntry>,
}

impl Snapshot {
    /// Load a snapshot file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let snapshot = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            types = snapshot.entries.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, RawEntry> = serde_json::from_str(content)?;
        let entries = raw
            .into_iter()
            .map(|(resource_type, entry)| {
                let entry = match entry {
                    RawEntry::Resources(values) => {
                        SnapshotEntry::Resources(TypeEntries::index(&resource_type, values))
                    }
                    RawEntry::Failed { error } => SnapshotEntry::Failed { error },
                };
                (resource_type, entry)
            })
            .collect();
        Ok(Self { entries })
    }

    /// Recorded resource types, sorted
    pub fn resource_types(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Ids of one type, in file order
    fn ids(&self, resource_type: &str) -> Result<Vec<String>> {
        match self.entries.get(resource_type) {
            None => Ok(Vec::new()),
            Some(SnapshotEntry::Failed { error }) => {
                Err(RemoteError::enumeration(resource_type, error.clone()))
            }
            Some(SnapshotEntry::Resources(entries)) => Ok(entries.ids.clone()),
        }
    }

    fn get(&self, resource_type: &str, id: &str) -> Option<&serde_json::Value> {
        match self.entries.get(resource_type) {
            Some(SnapshotEntry::Resources(entries)) => entries.by_id.get(id),
            _ => None,
        }
    }
}

/// Lists ids of one type from a snapshot
pub struct SnapshotEnumerator {
    snapshot: Arc<Snapshot>,
    resource_type: String,
}

impl SnapshotEnumerator {
    pub fn new(snapshot: Arc<Snapshot>, resource_type: impl Into<String>) -> Self {
        Self {
            snapshot,
            resource_type: resource_type.into(),
        }
    }
}

#[async_trait]
impl Enumerator for SnapshotEnumerator {
    async fn enumerate(&self) -> Result<Vec<String>> {
        self.snapshot.ids(&self.resource_type)
    }
}

/// Reads raw objects from a snapshot
pub struct SnapshotReader {
    snapshot: Arc<Snapshot>,
}

impl SnapshotReader {
    pub fn new(snapshot: Arc<Snapshot>) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl ResourceReader for SnapshotReader {
    async fn read_resource(&self, args: &ReadResourceArgs) -> Result<serde_json::Value> {
        self.snapshot
            .get(&args.resource_type, &args.id)
            .cloned()
            .ok_or_else(|| RemoteError::fetch(&args.resource_type, &args.id, "not found"))
    }
}

/// One supplier per recorded type
///
/// When `only_types` is given, other types are left out.
pub fn snapshot_suppliers(
    snapshot: Arc<Snapshot>,
    parallelism: usize,
    only_types: Option<&[String]>,
) -> Vec<Box<dyn Supplier>> {
    let reader = Arc::new(SnapshotReader::new(Arc::clone(&snapshot)));

    snapshot
        .resource_types()
        .into_iter()
        .filter(|ty| only_types.is_none_or(|only| only.iter().any(|o| o == ty)))
        .map(|ty| {
            Box::new(
                ResourceSupplier::new(
                    ty,
                    SnapshotEnumerator::new(Arc::clone(&snapshot), ty),
                    Arc::clone(&reader),
                    Arc::new(JsonDeserializer::new(ty)),
                )
                .with_parallelism(parallelism),
            ) as Box<dyn Supplier>
        })
        .collect()
}
