//! Per-resource-type field metadata
//!
//! Schemas are data, not code: a JSON document maps a resource type to the
//! metadata of its top-level fields.
//!
//! ```json
//! {
//!   "github_team_membership": {
//!     "etag": { "computed": true, "skip_diff": true },
//!     "id": { "computed": true }
//!   }
//! }
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Metadata for a single top-level field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Value is assigned by the provider, not the user
    #[serde(default)]
    pub computed: bool,

    /// Changes under this field are never reported
    #[serde(default)]
    pub skip_diff: bool,
}

/// Field metadata for one resource type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceSchema {
    fields: HashMap<String, FieldMeta>,
}

impl ResourceSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, meta: FieldMeta) -> Self {
        self.fields.insert(name.into(), meta);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.get(name)
    }
}

/// Registry of resource schemas keyed by resource type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRepository {
    schemas: HashMap<String, ResourceSchema>,
}

impl SchemaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load schemas from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let repo: SchemaRepository = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            types = repo.schemas.len(),
            "Loaded resource schemas"
        );
        Ok(repo)
    }

    pub fn register(&mut self, resource_type: impl Into<String>, schema: ResourceSchema) {
        self.schemas.insert(resource_type.into(), schema);
    }

    pub fn get(&self, resource_type: &str) -> Option<&ResourceSchema> {
        self.schemas.get(resource_type)
    }

    /// Metadata of the top-level field a change path falls under
    pub fn field_meta(&self, resource_type: &str, path: &[String]) -> FieldMeta {
        path.first()
            .and_then(|name| self.get(resource_type).and_then(|s| s.field(name)))
            .copied()
            .unwrap_or_default()
    }
}
