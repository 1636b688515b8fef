//! Field-level comparison of resource attributes

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Kind of a field change, seen from declared towards live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// Field exists only in the live resource
    Create,
    /// Field exists on both sides with different values
    Update,
    /// Field exists only in the declared resource
    Delete,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::Create => write!(f, "create"),
            ChangeType::Update => write!(f, "update"),
            ChangeType::Delete => write!(f, "delete"),
        }
    }
}

/// One leaf-level divergence between a declared and a live resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,

    /// Segments of the field path; array elements use their index
    pub path: Vec<String>,

    /// Declared value, `None` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,

    /// Live value, `None` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,

    /// Field is assigned by the provider
    #[serde(default)]
    pub computed: bool,
}

impl FieldChange {
    /// Dotted representation of the path
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }
}

/// Compare declared attributes with live attributes
///
/// Null values and empty objects or arrays are treated as absent. Object keys
/// are visited in sorted order so the result is deterministic.
pub fn diff(declared: &Value, live: &Value) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    let mut path = Vec::new();
    walk(&mut path, present(declared), present(live), &mut changes);
    changes
}

fn present(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        other => Some(other),
    }
}

fn walk(
    path: &mut Vec<String>,
    from: Option<&Value>,
    to: Option<&Value>,
    changes: &mut Vec<FieldChange>,
) {
    match (from, to) {
        (None, None) => {}
        (Some(Value::Object(a)), Some(Value::Object(b))) => {
            let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
            for key in keys {
                path.push(key.clone());
                walk(
                    path,
                    a.get(key).and_then(present),
                    b.get(key).and_then(present),
                    changes,
                );
                path.pop();
            }
        }
        (Some(Value::Array(a)), Some(Value::Array(b))) => {
            for i in 0..a.len().max(b.len()) {
                path.push(i.to_string());
                walk(
                    path,
                    a.get(i).and_then(present),
                    b.get(i).and_then(present),
                    changes,
                );
                path.pop();
            }
        }
        (Some(a), Some(b)) => {
            if a != b {
                changes.push(leaf(path, ChangeType::Update, Some(a), Some(b)));
            }
        }
        (Some(a), None) => one_sided(path, a, ChangeType::Delete, changes),
        (None, Some(b)) => one_sided(path, b, ChangeType::Create, changes),
    }
}

/// Emit one change per leaf of a subtree that exists on a single side
fn one_sided(
    path: &mut Vec<String>,
    value: &Value,
    change_type: ChangeType,
    changes: &mut Vec<FieldChange>,
) {
    let children: Vec<(String, &Value)> = match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, &Value)> =
                map.iter().map(|(k, v)| (k.clone(), v)).collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            entries
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    };

    match value {
        Value::Object(_) | Value::Array(_) => {
            for (segment, child) in children {
                if let Some(child) = present(child) {
                    path.push(segment);
                    one_sided(path, child, change_type, changes);
                    path.pop();
                }
            }
        }
        scalar => {
            let change = match change_type {
                ChangeType::Delete => leaf(path, change_type, Some(scalar), None),
                _ => leaf(path, change_type, None, Some(scalar)),
            };
            changes.push(change);
        }
    }
}

fn leaf(
    path: &[String],
    change_type: ChangeType,
    from: Option<&Value>,
    to: Option<&Value>,
) -> FieldChange {
    FieldChange {
        change_type,
        path: path.to_vec(),
        from: from.cloned(),
        to: to.cloned(),
        computed: false,
    }
}
