//! Drift reconciliation
//!
//! [`Analyzer`] classifies every declared and live resource into exactly one
//! of unmanaged, deleted, drifted or managed, and computes field-level
//! differences for resources present on both sides.

use crate::diff::{FieldChange, diff};
use crate::filter::Filter;
use crate::resource::{Resource, ResourceSet};
use crate::schema::SchemaRepository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// A live resource that diverged from its declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    /// Live version of the resource
    #[serde(rename = "res")]
    pub resource: Resource,

    /// Remaining changes after filtering, never empty
    pub changes: Vec<FieldChange>,
}

/// A resource type whose live state could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub resource_type: String,
    pub message: String,
}

impl Alert {
    pub fn new(resource_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            message: message.into(),
        }
    }
}

/// Result of reconciling declared and live resources
#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
    #[serde(default = "Utc::now")]
    date: DateTime<Utc>,
    #[serde(default)]
    unmanaged: Vec<Resource>,
    #[serde(default)]
    deleted: Vec<Resource>,
    #[serde(default)]
    differences: Vec<Difference>,
    #[serde(default)]
    managed: Vec<Resource>,
    #[serde(default)]
    alerts: Vec<Alert>,
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            date: Utc::now(),
            unmanaged: Vec::new(),
            deleted: Vec::new(),
            differences: Vec::new(),
            managed: Vec::new(),
            alerts: Vec::new(),
        }
    }
}

impl Analysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Live resources with no declared counterpart
    pub fn unmanaged(&self) -> &[Resource] {
        &self.unmanaged
    }

    /// Declared resources with no live counterpart
    pub fn deleted(&self) -> &[Resource] {
        &self.deleted
    }

    /// Resources present on both sides that diverged
    pub fn differences(&self) -> &[Difference] {
        &self.differences
    }

    /// Resources present on both sides with no remaining differences
    pub fn managed(&self) -> &[Resource] {
        &self.managed
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn add_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    /// Counts derived from the collections
    pub fn summary(&self) -> Summary {
        Summary {
            total_resources: self.managed.len() + self.unmanaged.len() + self.differences.len(),
            total_unmanaged: self.unmanaged.len(),
            total_deleted: self.deleted.len(),
            total_drifted: self.differences.len(),
            total_managed: self.managed.len(),
            total_alerts: self.alerts.len(),
        }
    }

    /// Percentage of live resources covered by IaC
    pub fn coverage(&self) -> u32 {
        let summary = self.summary();
        if summary.total_resources == 0 {
            return 0;
        }
        let covered = summary.total_managed + summary.total_drifted;
        (covered * 100 / summary.total_resources) as u32
    }

    /// Whether no unmanaged, deleted or drifted resource remains
    pub fn is_sync(&self) -> bool {
        self.unmanaged.is_empty() && self.deleted.is_empty() && self.differences.is_empty()
    }

    /// Reapply a filter to this analysis
    ///
    /// Differences whose changes are all ignored become managed. Applying the
    /// same filter again yields the same analysis.
    pub fn filtered(&self, filter: &dyn Filter) -> Analysis {
        let mut managed = self.managed.clone();
        let mut differences = Vec::with_capacity(self.differences.len());

        for difference in &self.differences {
            let changes: Vec<FieldChange> = difference
                .changes
                .iter()
                .filter(|c| !filter.is_field_ignored(&difference.resource, &c.path))
                .cloned()
                .collect();
            if changes.is_empty() {
                managed.push(difference.resource.clone());
            } else {
                differences.push(Difference {
                    resource: difference.resource.clone(),
                    changes,
                });
            }
        }
        managed.sort_by_key(Resource::key);

        Analysis {
            date: self.date,
            unmanaged: retain_not_ignored(&self.unmanaged, filter),
            deleted: retain_not_ignored(&self.deleted, filter),
            differences,
            managed,
            alerts: self.alerts.clone(),
        }
    }
}

fn retain_not_ignored(resources: &[Resource], filter: &dyn Filter) -> Vec<Resource> {
    resources
        .iter()
        .filter(|r| !filter.is_resource_ignored(r))
        .cloned()
        .collect()
}

impl Serialize for Analysis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct View<'a> {
            summary: Summary,
            coverage: u32,
            date: &'a DateTime<Utc>,
            unmanaged: &'a [Resource],
            deleted: &'a [Resource],
            differences: &'a [Difference],
            managed: &'a [Resource],
            alerts: &'a [Alert],
        }

        View {
            summary: self.summary(),
            coverage: self.coverage(),
            date: &self.date,
            unmanaged: &self.unmanaged,
            deleted: &self.deleted,
            differences: &self.differences,
            managed: &self.managed,
            alerts: &self.alerts,
        }
        .serialize(serializer)
    }
}

/// Counts of an analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Live resources (managed + unmanaged + drifted)
    pub total_resources: usize,
    pub total_unmanaged: usize,
    pub total_deleted: usize,
    pub total_drifted: usize,
    pub total_managed: usize,
    pub total_alerts: usize,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} managed, {} drifted, {} unmanaged, {} missing",
            self.total_managed, self.total_drifted, self.total_unmanaged, self.total_deleted
        )
    }
}

/// Reconciles declared resources against live resources
pub struct Analyzer<'a> {
    filter: &'a dyn Filter,
    schemas: Option<&'a SchemaRepository>,
}

impl<'a> Analyzer<'a> {
    pub fn new(filter: &'a dyn Filter) -> Self {
        Self {
            filter,
            schemas: None,
        }
    }

    /// Use field metadata to skip or flag changes
    pub fn with_schemas(mut self, schemas: &'a SchemaRepository) -> Self {
        self.schemas = Some(schemas);
        self
    }

    /// Classify every resource of both sides
    ///
    /// The result depends only on the two inventories and the filter, not on
    /// their iteration order. Output collections are sorted by identity key.
    pub fn analyze(&self, declared: &[Resource], live: &[Resource]) -> Analysis {
        let declared: ResourceSet = declared.iter().cloned().collect();
        let live: ResourceSet = live.iter().cloned().collect();
        let mut analysis = Analysis::new();

        for (key, live_res) in live.iter() {
            match declared.get(key) {
                Some(declared_res) => {
                    let changes = self.changes(declared_res, live_res);
                    if changes.is_empty() {
                        analysis.managed.push(live_res.clone());
                    } else {
                        tracing::debug!(resource = %key, changes = changes.len(), "Resource drifted");
                        analysis.differences.push(Difference {
                            resource: live_res.clone(),
                            changes,
                        });
                    }
                }
                None => {
                    if !self.filter.is_resource_ignored(live_res) {
                        analysis.unmanaged.push(live_res.clone());
                    }
                }
            }
        }

        for (key, declared_res) in declared.iter() {
            if !live.contains(key) && !self.filter.is_resource_ignored(declared_res) {
                analysis.deleted.push(declared_res.clone());
            }
        }

        tracing::debug!(summary = %analysis.summary(), "Analysis complete");
        analysis
    }

    fn changes(&self, declared: &Resource, live: &Resource) -> Vec<FieldChange> {
        diff(declared.attributes(), live.attributes())
            .into_iter()
            .filter_map(|mut change| {
                if let Some(schemas) = self.schemas {
                    let meta = schemas.field_meta(live.resource_type(), &change.path);
                    if meta.skip_diff {
                        return None;
                    }
                    change.computed = meta.computed;
                }
                (!self.filter.is_field_ignored(live, &change.path)).then_some(change)
            })
            .collect()
    }
}
