//! `.driftignore` rule loading and matching
//!
//! Each non-empty, non-comment line is one rule:
//!
//! ```text
//! # ignore one resource
//! aws_s3_bucket.my-bucket
//! # ignore every IAM user
//! aws_iam_user.*
//! # ignore a field on one resource, or on every resource of a type
//! aws_instance.i-0123.tags.LastScanned
//! aws_iam_user.*.tags.*
//! ```

use crate::discovery::find_ignore_file;
use crate::error::{FilterError, Result};
use crate::line::read_line;
use crate::wildcard::wildcard_match;
use driftflow_core::{Filter, Resource};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

/// One parsed ignore rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreRule {
    /// `type.id`
    ExactResource { resource_type: String, id: String },
    /// `type.id` where type or id contains `*`
    WildcardResource { resource_type: String, id: String },
    /// `type.id.path.to.field`, `*` allowed in any segment
    FieldPath {
        resource_type: String,
        id: String,
        path: Vec<String>,
    },
}

impl IgnoreRule {
    /// Parse one line of an ignore file
    ///
    /// Returns `Ok(None)` for blank and comment lines.
    pub fn parse(line_number: usize, line: &str) -> Result<Option<IgnoreRule>> {
        // Surrounding spaces belong to the rule, ids may carry them
        if line.trim().is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut segments = read_line(line);
        if segments.len() < 2 {
            return Err(FilterError::RuleParse {
                line: line_number,
                content: line.to_string(),
                segments: segments.len(),
            });
        }

        let path = segments.split_off(2);
        let id = segments.pop().unwrap_or_default();
        let resource_type = segments.pop().unwrap_or_default();

        let rule = if !path.is_empty() {
            IgnoreRule::FieldPath {
                resource_type,
                id,
                path,
            }
        } else if resource_type.contains('*') || id.contains('*') {
            IgnoreRule::WildcardResource { resource_type, id }
        } else {
            IgnoreRule::ExactResource { resource_type, id }
        };
        Ok(Some(rule))
    }

    fn resource_key(resource_type: &str, id: &str) -> String {
        format!("{}.{}", resource_type, id)
    }
}

/// Immutable set of ignore rules
#[derive(Debug, Clone, Default)]
pub struct DriftIgnore {
    /// `type.id` keys ignored as a whole
    resources: HashSet<String>,
    /// `type.id` patterns containing `*`
    wildcard_resources: BTreeSet<String>,
    /// field paths ignored per `type.id` (id may be `*`)
    fields: HashMap<String, Vec<Vec<String>>>,
}

impl DriftIgnore {
    /// An empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse rules from the content of an ignore file
    ///
    /// Invalid lines are skipped with a warning.
    pub fn parse(content: &str) -> Self {
        let mut ignore = Self::new();
        for (index, line) in content.lines().enumerate() {
            match IgnoreRule::parse(index + 1, line) {
                Ok(Some(rule)) => ignore.add_rule(rule),
                Ok(None) => {
                    tracing::debug!(line = %line, "Skipped comment or empty line");
                }
                Err(e) => {
                    tracing::warn!(line = index + 1, content = %line, "{}", e);
                }
            }
        }
        ignore
    }

    /// Load rules from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ignore = Self::parse(&content);
        tracing::debug!(
            path = %path.as_ref().display(),
            rules = ignore.len(),
            "Loaded ignore rules"
        );
        Ok(ignore)
    }

    /// Load the discovered ignore file, or an empty filter if there is none
    ///
    /// Never fails: read errors are logged and yield an empty filter.
    pub fn load_default() -> Self {
        let Some(path) = find_ignore_file() else {
            tracing::debug!("No ignore file found, nothing will be ignored");
            return Self::new();
        };
        match Self::load(&path) {
            Ok(ignore) => ignore,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Unable to read ignore file");
                Self::new()
            }
        }
    }

    pub fn add_rule(&mut self, rule: IgnoreRule) {
        match rule {
            IgnoreRule::ExactResource { resource_type, id } => {
                tracing::debug!(resource_type = %resource_type, id = %id, "Found ignore resource rule");
                self.resources
                    .insert(IgnoreRule::resource_key(&resource_type, &id));
            }
            IgnoreRule::WildcardResource { resource_type, id } => {
                tracing::debug!(resource_type = %resource_type, id = %id, "Found wildcard ignore resource rule");
                self.wildcard_resources
                    .insert(IgnoreRule::resource_key(&resource_type, &id));
            }
            IgnoreRule::FieldPath {
                resource_type,
                id,
                path,
            } => {
                tracing::debug!(
                    resource_type = %resource_type,
                    id = %id,
                    path = %path.join("."),
                    "Found ignore resource field rule"
                );
                self.fields
                    .entry(IgnoreRule::resource_key(&resource_type, &id))
                    .or_default()
                    .push(path);
            }
        }
    }

    /// Total number of loaded rules
    pub fn len(&self) -> usize {
        self.resources.len()
            + self.wildcard_resources.len()
            + self.fields.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Filter for DriftIgnore {
    fn is_resource_ignored(&self, resource: &Resource) -> bool {
        let key = resource.key();
        self.resources.contains(&key)
            || self
                .wildcard_resources
                .iter()
                .any(|pattern| wildcard_match(&key, pattern))
    }

    fn is_field_ignored(&self, resource: &Resource, path: &[String]) -> bool {
        // Rules for the exact resource shadow the `type.*` rules entirely
        let rules = self.fields.get(&resource.key()).or_else(|| {
            self.fields
                .get(&IgnoreRule::resource_key(resource.resource_type(), "*"))
        });

        rules.is_some_and(|rules| rules.iter().any(|rule| path_matches(rule, path)))
    }
}

/// A rule matches a change path it is a prefix of, segment by segment
fn path_matches(rule: &[String], path: &[String]) -> bool {
    rule.len() <= path.len()
        && rule
            .iter()
            .zip(path)
            .all(|(r, p)| r == "*" || r.to_lowercase() == p.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn res(resource_type: &str, id: &str) -> Resource {
        Resource::new(resource_type, id, json!({}))
    }

    fn path(p: &[&str]) -> Vec<String> {
        p.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_rule_kinds() {
        assert_eq!(
            IgnoreRule::parse(1, "aws_s3_bucket.foo").unwrap(),
            Some(IgnoreRule::ExactResource {
                resource_type: "aws_s3_bucket".into(),
                id: "foo".into()
            })
        );
        assert_eq!(
            IgnoreRule::parse(1, "aws_iam_*.**").unwrap(),
            Some(IgnoreRule::WildcardResource {
                resource_type: "aws_iam_*".into(),
                id: "*".into()
            })
        );
        assert_eq!(
            IgnoreRule::parse(1, r"aws_instance.*.tags.kubernetes\.io/name").unwrap(),
            Some(IgnoreRule::FieldPath {
                resource_type: "aws_instance".into(),
                id: "*".into(),
                path: path(&["tags", "kubernetes.io/name"]),
            })
        );
        assert_eq!(IgnoreRule::parse(1, "# comment").unwrap(), None);
        assert_eq!(IgnoreRule::parse(1, "   ").unwrap(), None);
    }

    #[test]
    fn test_parse_invalid_line() {
        let err = IgnoreRule::parse(7, "lonely").unwrap_err();
        assert!(matches!(
            err,
            FilterError::RuleParse {
                line: 7,
                segments: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_lines_are_skipped() {
        let ignore = DriftIgnore::parse("lonely\naws_s3_bucket.foo\n\n# note\n");
        assert_eq!(ignore.len(), 1);
        assert!(ignore.is_resource_ignored(&res("aws_s3_bucket", "foo")));
    }

    #[test]
    fn test_exact_and_wildcard_resources() {
        let ignore = DriftIgnore::parse(
            "aws_s3_bucket.foo\naws_iam_*.*\n*.shared-*\naws_route53_zone.example\\.com\n",
        );

        assert!(ignore.is_resource_ignored(&res("aws_s3_bucket", "foo")));
        assert!(!ignore.is_resource_ignored(&res("aws_s3_bucket", "bar")));
        assert!(ignore.is_resource_ignored(&res("aws_iam_user", "alice")));
        assert!(ignore.is_resource_ignored(&res("aws_iam_role", "deployer")));
        assert!(ignore.is_resource_ignored(&res("aws_sqs_queue", "shared-jobs")));
        assert!(ignore.is_resource_ignored(&res("aws_route53_zone", "example.com")));
        assert!(!ignore.is_resource_ignored(&res("aws_sqs_queue", "jobs")));
    }

    #[test]
    fn test_field_wildcard_segment() {
        let ignore = DriftIgnore::parse("aws_instance.i-1.tags.*\n");
        let instance = res("aws_instance", "i-1");

        assert!(ignore.is_field_ignored(&instance, &path(&["tags", "Name"])));
        assert!(ignore.is_field_ignored(&instance, &path(&["tags", "Env"])));
        assert!(!ignore.is_field_ignored(&instance, &path(&["tags"])));
        assert!(!ignore.is_field_ignored(&instance, &path(&["metadata", "tags", "Name"])));
    }

    #[test]
    fn test_field_match_is_case_insensitive_prefix() {
        let ignore = DriftIgnore::parse("aws_instance.i-1.Tags\n");
        let instance = res("aws_instance", "i-1");

        assert!(ignore.is_field_ignored(&instance, &path(&["tags"])));
        assert!(ignore.is_field_ignored(&instance, &path(&["TAGS", "Owner"])));
        assert!(!ignore.is_field_ignored(&instance, &path(&["ami"])));
        assert!(!ignore.is_field_ignored(&res("aws_instance", "i-2"), &path(&["tags"])));
    }

    #[test]
    fn test_exact_field_rules_shadow_type_wildcard() {
        let ignore = DriftIgnore::parse("aws_iam_user.*.tags\naws_iam_user.alice.path\n");

        let alice = res("aws_iam_user", "alice");
        assert!(ignore.is_field_ignored(&alice, &path(&["path"])));
        assert!(!ignore.is_field_ignored(&alice, &path(&["tags", "Owner"])));

        let bob = res("aws_iam_user", "bob");
        assert!(ignore.is_field_ignored(&bob, &path(&["tags", "Owner"])));
        assert!(!ignore.is_field_ignored(&bob, &path(&["path"])));
    }

    #[test]
    fn test_multiple_field_rules_per_resource() {
        let ignore = DriftIgnore::parse("aws_sqs_queue.q.policy\naws_sqs_queue.q.tags.Env\n");
        let queue = res("aws_sqs_queue", "q");

        assert_eq!(ignore.len(), 2);
        assert!(ignore.is_field_ignored(&queue, &path(&["policy"])));
        assert!(ignore.is_field_ignored(&queue, &path(&["tags", "Env"])));
        assert!(!ignore.is_field_ignored(&queue, &path(&["tags", "Name"])));
    }

    #[test]
    fn test_spaces_are_part_of_the_rule() {
        let padded = res("aws_sqs_queue", " jobs ");
        let line = crate::list::resource_line(&padded);
        let ignore = DriftIgnore::parse(&format!("{}\n", line));

        assert!(ignore.is_resource_ignored(&padded));
        assert!(!ignore.is_resource_ignored(&res("aws_sqs_queue", "jobs")));
        assert_eq!(
            IgnoreRule::parse(1, "aws_s3_bucket. logs").unwrap(),
            Some(IgnoreRule::ExactResource {
                resource_type: "aws_s3_bucket".into(),
                id: " logs".into()
            })
        );
    }

    #[test]
    fn test_field_rule_does_not_ignore_resource() {
        let ignore = DriftIgnore::parse("aws_iam_user.alice.tags\n");
        assert!(!ignore.is_resource_ignored(&res("aws_iam_user", "alice")));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(".driftignore");
        std::fs::write(&file, "# rules\r\naws_s3_bucket.foo\r\n").unwrap();

        let ignore = DriftIgnore::load(&file).unwrap();
        assert!(ignore.is_resource_ignored(&res("aws_s3_bucket", "foo")));

        assert!(matches!(
            DriftIgnore::load(dir.path().join("missing")),
            Err(FilterError::Io(_))
        ));
    }
}
