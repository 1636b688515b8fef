//! Run every supplier and gather the live inventory

use crate::error::RemoteError;
use crate::supplier::Supplier;
use driftflow_core::{Alert, Resource};
use futures_util::future::join_all;

/// A resource type whose retrieval failed
#[derive(Debug)]
pub struct ScanFailure {
    pub resource_type: String,
    pub error: RemoteError,
}

/// Outcome of a scan
///
/// A failing type does not abort the scan: its error is kept and the other
/// types' resources are still returned.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub resources: Vec<Resource>,
    pub failures: Vec<ScanFailure>,
}

impl ScanResult {
    /// Types whose retrieval failed
    pub fn failed_types(&self) -> Vec<&str> {
        self.failures
            .iter()
            .map(|f| f.resource_type.as_str())
            .collect()
    }

    /// One alert per failure
    pub fn alerts(&self) -> Vec<Alert> {
        self.failures
            .iter()
            .map(|f| Alert::new(&f.resource_type, f.error.detail()))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Default)]
pub struct Scanner {
    suppliers: Vec<Box<dyn Supplier>>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_supplier(&mut self, supplier: Box<dyn Supplier>) {
        self.suppliers.push(supplier);
    }

    pub fn with_suppliers(
        mut self,
        suppliers: impl IntoIterator<Item = Box<dyn Supplier>>,
    ) -> Self {
        self.suppliers.extend(suppliers);
        self
    }

    /// Resource types covered by this scanner
    pub fn resource_types(&self) -> Vec<&str> {
        self.suppliers.iter().map(|s| s.resource_type()).collect()
    }

    /// Run all suppliers concurrently
    pub async fn scan(&self) -> ScanResult {
        let outcomes = join_all(
            self.suppliers
                .iter()
                .map(|s| async move { (s.resource_type(), s.resources().await) }),
        )
        .await;

        let mut result = ScanResult::default();
        for (resource_type, outcome) in outcomes {
            match outcome {
                Ok(resources) => {
                    tracing::info!(
                        resource_type = %resource_type,
                        count = resources.len(),
                        "Scanned resources"
                    );
                    result.resources.extend(resources);
                }
                Err(error) => {
                    tracing::warn!(
                        resource_type = %resource_type,
                        error = %error.detail(),
                        "Scan failed"
                    );
                    result.failures.push(ScanFailure {
                        resource_type: resource_type.to_string(),
                        error,
                    });
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::reader::{Enumerator, JsonDeserializer, ReadResourceArgs, ResourceReader};
    use crate::supplier::ResourceSupplier;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct Fixed {
        resource_type: &'static str,
        outcome: std::result::Result<usize, &'static str>,
    }

    #[async_trait]
    impl Supplier for Fixed {
        fn resource_type(&self) -> &str {
            self.resource_type
        }

        async fn resources(&self) -> Result<Vec<Resource>> {
            match self.outcome {
                Ok(n) => Ok((0..n)
                    .map(|i| Resource::new(self.resource_type, format!("r{}", i), json!({})))
                    .collect()),
                Err(message) => Err(RemoteError::fetch(self.resource_type, "r0", message)),
            }
        }
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_types() {
        let scanner = Scanner::new().with_suppliers([
            Box::new(Fixed {
                resource_type: "aws_s3_bucket",
                outcome: Ok(3),
            }) as Box<dyn Supplier>,
            Box::new(Fixed {
                resource_type: "aws_iam_user",
                outcome: Err("AccessDenied"),
            }),
        ]);
        assert_eq!(scanner.resource_types(), vec!["aws_s3_bucket", "aws_iam_user"]);

        let result = scanner.scan().await;
        assert_eq!(result.resources.len(), 3);
        assert!(!result.is_complete());
        assert_eq!(result.failed_types(), vec!["aws_iam_user"]);

        let alerts = result.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].resource_type, "aws_iam_user");
        assert!(alerts[0].message.contains("AccessDenied"));
    }

    struct CorruptReader;

    #[async_trait]
    impl ResourceReader for CorruptReader {
        async fn read_resource(&self, _args: &ReadResourceArgs) -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{not json")?)
        }
    }

    struct OneId;

    #[async_trait]
    impl Enumerator for OneId {
        async fn enumerate(&self) -> Result<Vec<String>> {
            Ok(vec!["alice".to_string()])
        }
    }

    #[tokio::test]
    async fn test_untyped_error_is_attributed_to_its_supplier() {
        let mut scanner = Scanner::new();
        scanner.add_supplier(Box::new(ResourceSupplier::new(
            "aws_iam_user",
            OneId,
            Arc::new(CorruptReader),
            Arc::new(JsonDeserializer::new("aws_iam_user")),
        )));

        let result = scanner.scan().await;
        assert!(matches!(result.failures[0].error, RemoteError::Json(_)));
        assert_eq!(result.failed_types(), vec!["aws_iam_user"]);
        assert_eq!(result.alerts()[0].resource_type, "aws_iam_user");
    }

    #[tokio::test]
    async fn test_empty_scanner() {
        let result = Scanner::new().scan().await;
        assert!(result.resources.is_empty());
        assert!(result.is_complete());

        let mut scanner = Scanner::new();
        scanner.add_supplier(Box::new(Fixed {
            resource_type: "aws_vpc",
            outcome: Ok(0),
        }));
        let result = scanner.scan().await;
        assert!(result.resources.is_empty());
        assert!(result.is_complete());
    }
}
