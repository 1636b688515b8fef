//! Turn an analysis into `.driftignore` lines

use crate::line::escape;
use driftflow_core::{Analysis, Resource};

pub const UNMANAGED_HEADER: &str = "# Resources not covered by IaC";
pub const DELETED_HEADER: &str = "# Missing resources";
pub const DRIFTED_HEADER: &str = "# Changed resources";

/// Sections to include in the generated list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisListOptions {
    pub include_unmanaged: bool,
    pub include_deleted: bool,
    pub include_drifted: bool,
}

impl Default for AnalysisListOptions {
    fn default() -> Self {
        Self {
            include_unmanaged: true,
            include_deleted: true,
            include_drifted: true,
        }
    }
}

/// Generated ignore lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    /// Number of listed resources, headers excluded
    pub count: usize,
    pub lines: Vec<String>,
}

impl std::fmt::Display for IgnoreList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

/// Escaped `type.id` line for a resource
pub fn resource_line(resource: &Resource) -> String {
    format!(
        "{}.{}",
        escape(resource.resource_type()),
        escape(resource.id())
    )
}

/// List the resources of an analysis in `.driftignore` format
///
/// Each enabled, non-empty section gets a comment header followed by one
/// sorted line per resource.
pub fn analysis_to_list(analysis: &Analysis, opts: AnalysisListOptions) -> IgnoreList {
    let mut list = IgnoreList::default();

    if opts.include_unmanaged {
        push_section(&mut list, UNMANAGED_HEADER, analysis.unmanaged().iter());
    }
    if opts.include_deleted {
        push_section(&mut list, DELETED_HEADER, analysis.deleted().iter());
    }
    if opts.include_drifted {
        push_section(
            &mut list,
            DRIFTED_HEADER,
            analysis.differences().iter().map(|d| &d.resource),
        );
    }

    list
}

fn push_section<'a>(
    list: &mut IgnoreList,
    header: &str,
    resources: impl Iterator<Item = &'a Resource>,
) {
    let mut lines: Vec<String> = resources.map(resource_line).collect();
    if lines.is_empty() {
        return;
    }
    lines.sort();
    list.count += lines.len();
    list.lines.push(header.to_string());
    list.lines.extend(lines);
}
