//! Resource identity model
//!
//! A [`Resource`] is identified by its type and id. Attributes are an opaque
//! JSON value and never take part in identity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A declared or live infrastructure resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource type (e.g., "aws_s3_bucket")
    #[serde(rename = "type")]
    resource_type: String,

    /// Provider-specific resource ID
    id: String,

    /// Observed or declared configuration
    #[serde(default)]
    attributes: serde_json::Value,
}

impl Resource {
    /// Create a resource. Type and id must be non-empty.
    pub fn new(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        attributes: serde_json::Value,
    ) -> Self {
        let resource_type = resource_type.into();
        let id = id.into();
        debug_assert!(!resource_type.is_empty(), "resource type must not be empty");
        debug_assert!(!id.is_empty(), "resource id must not be empty");
        Self {
            resource_type,
            id,
            attributes,
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attributes(&self) -> &serde_json::Value {
        &self.attributes
    }

    /// Canonical identity key (`type.id`)
    pub fn key(&self) -> String {
        format!("{}.{}", self.resource_type, self.id)
    }

    /// Whether both resources name the same logical entity
    pub fn same_identity(&self, other: &Resource) -> bool {
        self.resource_type == other.resource_type && self.id == other.id
    }

    /// Get an attribute value as a specific type
    pub fn get_attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.id)
    }
}

/// Resources indexed by identity key
///
/// When the same key is inserted twice the first resource is kept.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    resources: BTreeMap<String, Resource>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, returning `false` if its key was already present
    pub fn add(&mut self, resource: Resource) -> bool {
        let key = resource.key();
        if self.resources.contains_key(&key) {
            tracing::warn!(resource = %key, "Duplicate resource identity, keeping first");
            return false;
        }
        self.resources.insert(key, resource);
        true
    }

    pub fn get(&self, key: &str) -> Option<&Resource> {
        self.resources.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.resources.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterate in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Resource)> {
        self.resources.iter()
    }

    pub fn by_type(&self, resource_type: &str) -> Vec<&Resource> {
        self.resources
            .values()
            .filter(|r| r.resource_type == resource_type)
            .collect()
    }
}

impl FromIterator<Resource> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        let mut set = Self::new();
        for resource in iter {
            set.add(resource);
        }
        set
    }
}
