//! Collaborator traits for retrieving live resources

use crate::error::{RemoteError, Result};
use async_trait::async_trait;
use driftflow_core::Resource;

/// Arguments of a single resource read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResourceArgs {
    pub resource_type: String,
    pub id: String,
}

impl ReadResourceArgs {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

/// Lists the identifiers of remote resources of one type
#[async_trait]
pub trait Enumerator: Send + Sync {
    async fn enumerate(&self) -> Result<Vec<String>>;
}

/// Reads the raw state of one remote resource
///
/// Retry and timeout policies belong to implementations.
#[async_trait]
pub trait ResourceReader: Send + Sync {
    async fn read_resource(&self, args: &ReadResourceArgs) -> Result<serde_json::Value>;
}

/// Maps a raw remote value to a [`Resource`]
pub trait Deserializer: Send + Sync {
    fn deserialize(&self, raw: serde_json::Value) -> Result<Resource>;
}

/// Deserializer for raw JSON objects carrying their identifier in `id`
#[derive(Debug, Clone)]
pub struct JsonDeserializer {
    resource_type: String,
}

impl JsonDeserializer {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
        }
    }
}

impl Deserializer for JsonDeserializer {
    fn deserialize(&self, raw: serde_json::Value) -> Result<Resource> {
        if !raw.is_object() {
            return Err(RemoteError::Deserialize {
                resource_type: self.resource_type.clone(),
                message: format!("expected an object, got {}", raw),
            });
        }
        let id = match raw.get("id") {
            Some(serde_json::Value::String(id)) if !id.is_empty() => id.clone(),
            Some(serde_json::Value::Number(id)) => id.to_string(),
            _ => {
                return Err(RemoteError::Deserialize {
                    resource_type: self.resource_type.clone(),
                    message: "missing id attribute".to_string(),
                });
            }
        };
        Ok(Resource::new(self.resource_type.clone(), id, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_deserializer() {
        let deserializer = JsonDeserializer::new("aws_sqs_queue");
        let resource = deserializer
            .deserialize(json!({"id": "https://sqs/queue", "delay_seconds": 0}))
            .unwrap();
        assert_eq!(resource.key(), "aws_sqs_queue.https://sqs/queue");
        assert_eq!(resource.get_attribute::<u32>("delay_seconds"), Some(0));

        let numeric = deserializer.deserialize(json!({"id": 7})).unwrap();
        assert_eq!(numeric.id(), "7");
    }

    #[test]
    fn test_json_deserializer_rejects_invalid_values() {
        let deserializer = JsonDeserializer::new("aws_sqs_queue");
        assert!(matches!(
            deserializer.deserialize(json!({"name": "no id"})),
            Err(RemoteError::Deserialize { .. })
        ));
        assert!(matches!(
            deserializer.deserialize(json!("scalar")),
            Err(RemoteError::Deserialize { .. })
        ));
    }
}
