//! Console rendering of an analysis

use colored::Colorize;
use driftflow_core::{Analysis, ChangeType, FieldChange, Resource};
use std::collections::BTreeMap;

pub fn print_analysis(analysis: &Analysis) {
    for alert in analysis.alerts() {
        eprintln!(
            "{} {}: {}",
            "⚠ Unable to scan".yellow().bold(),
            alert.resource_type.cyan(),
            alert.message
        );
    }

    if !analysis.unmanaged().is_empty() {
        println!("{}", "Found resources not covered by IaC:".bold());
        print_grouped(analysis.unmanaged());
    }

    if !analysis.deleted().is_empty() {
        println!("{}", "Found missing resources:".bold());
        print_grouped(analysis.deleted());
    }

    if !analysis.differences().is_empty() {
        println!("{}", "Found changed resources:".bold());
        for difference in analysis.differences() {
            println!("  - {}:", difference.resource.key().cyan());
            for change in &difference.changes {
                println!("      {}", format_change(change));
            }
        }
    }

    let summary = analysis.summary();
    println!("Found {} resource(s)", summary.total_resources);
    println!(" - {}% coverage", analysis.coverage());
    println!(
        " - {} resource(s) managed by IaC",
        summary.total_managed + summary.total_drifted
    );
    println!(
        "     - {}/{} resource(s) out of sync",
        summary.total_drifted,
        summary.total_managed + summary.total_drifted
    );
    println!(" - {} resource(s) not managed by IaC", summary.total_unmanaged);
    println!(
        " - {} resource(s) found in a state but missing on the provider",
        summary.total_deleted
    );

    if analysis.is_sync() {
        println!("{}", "✓ Your infrastructure is fully in sync.".green().bold());
    }
}

fn print_grouped(resources: &[Resource]) {
    let mut by_type: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for resource in resources {
        by_type
            .entry(resource.resource_type())
            .or_default()
            .push(resource.id());
    }
    for (resource_type, ids) in by_type {
        println!("  {}:", resource_type.cyan());
        for id in ids {
            println!("    - {}", id);
        }
    }
}

fn format_change(change: &FieldChange) -> String {
    let path = change.path_string();
    let computed = if change.computed { " (computed)" } else { "" };
    match change.change_type {
        ChangeType::Create => format!(
            "{} {}: {}{}",
            "+".green(),
            path,
            render(change.to.as_ref()),
            computed
        ),
        ChangeType::Delete => format!(
            "{} {}: {}{}",
            "-".red(),
            path,
            render(change.from.as_ref()),
            computed
        ),
        ChangeType::Update => format!(
            "{} {}: {} => {}{}",
            "~".yellow(),
            path,
            render(change.from.as_ref()),
            render(change.to.as_ref()),
            computed
        ),
    }
}

fn render(value: Option<&serde_json::Value>) -> String {
    value.map_or_else(|| "<null>".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_change() {
        colored::control::set_override(false);

        let update = FieldChange {
            change_type: ChangeType::Update,
            path: vec!["tags".into(), "Env".into()],
            from: Some(json!("dev")),
            to: Some(json!("prd")),
            computed: false,
        };
        assert_eq!(format_change(&update), r#"~ tags.Env: "dev" => "prd""#);

        let created = FieldChange {
            change_type: ChangeType::Create,
            path: vec!["arn".into()],
            from: None,
            to: Some(json!("arn:aws:iam::1")),
            computed: true,
        };
        assert_eq!(
            format_change(&created),
            r#"+ arn: "arn:aws:iam::1" (computed)"#
        );
    }
}
