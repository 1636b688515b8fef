//! Per-type live resource suppliers

use crate::error::{RemoteError, Result};
use crate::parallel::{DEFAULT_PARALLELISM, ParallelResourceReader};
use crate::reader::{Deserializer, Enumerator, ReadResourceArgs, ResourceReader};
use async_trait::async_trait;
use driftflow_core::Resource;
use std::sync::Arc;

/// Produces every live resource of one type
#[async_trait]
pub trait Supplier: Send + Sync {
    fn resource_type(&self) -> &str;

    async fn resources(&self) -> Result<Vec<Resource>>;
}

/// Supplier that enumerates ids, then reads each one concurrently
pub struct ResourceSupplier<E, R, D: ?Sized> {
    resource_type: String,
    enumerator: E,
    reader: Arc<R>,
    deserializer: Arc<D>,
    parallelism: usize,
}

impl<E, R, D> ResourceSupplier<E, R, D>
where
    E: Enumerator,
    R: ResourceReader + 'static,
    D: Deserializer + ?Sized,
{
    pub fn new(
        resource_type: impl Into<String>,
        enumerator: E,
        reader: Arc<R>,
        deserializer: Arc<D>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            enumerator,
            reader,
            deserializer,
            parallelism: DEFAULT_PARALLELISM,
        }
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }
}

#[async_trait]
impl<E, R, D> Supplier for ResourceSupplier<E, R, D>
where
    E: Enumerator,
    R: ResourceReader + 'static,
    D: Deserializer + ?Sized,
{
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    async fn resources(&self) -> Result<Vec<Resource>> {
        let ids = self.enumerator.enumerate().await.map_err(|e| match e {
            e @ RemoteError::Enumeration { .. } => e,
            other => RemoteError::enumeration(&self.resource_type, other),
        })?;
        tracing::debug!(
            resource_type = %self.resource_type,
            count = ids.len(),
            "Enumerated resources"
        );

        let mut runner =
            ParallelResourceReader::new(self.parallelism, Arc::clone(&self.deserializer));
        for id in ids {
            let reader = Arc::clone(&self.reader);
            let args = ReadResourceArgs::new(&self.resource_type, id);
            runner.run(move || async move {
                reader.read_resource(&args).await.inspect_err(|e| {
                    tracing::error!(
                        resource_type = %args.resource_type,
                        id = %args.id,
                        error = %e,
                        "Unable to read resource"
                    )
                })
            });
        }

        runner.wait().await
    }
}
