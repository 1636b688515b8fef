//! Filter abstraction consulted during reconciliation

use crate::resource::Resource;

/// Decides which resources and field changes are excluded from drift reporting
///
/// Implementations are loaded once and only read afterwards, so they must be
/// shareable across threads.
pub trait Filter: Send + Sync {
    /// Whether the whole resource is excluded from unmanaged/deleted reporting
    fn is_resource_ignored(&self, resource: &Resource) -> bool;

    /// Whether a change at `path` on `resource` is excluded
    fn is_field_ignored(&self, resource: &Resource, path: &[String]) -> bool;
}

/// Filter that ignores nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFilter;

impl Filter for NoopFilter {
    fn is_resource_ignored(&self, _resource: &Resource) -> bool {
        false
    }

    fn is_field_ignored(&self, _resource: &Resource, _path: &[String]) -> bool {
        false
    }
}
