use crate::OutputFormat;
use crate::output;
use anyhow::Context;
use driftflow_core::{Analyzer, SchemaRepository, StateProvider, TerraformStateReader};
use driftflow_filter::DriftIgnore;
use driftflow_remote::{Scanner, Snapshot, snapshot_suppliers};
use std::path::PathBuf;
use std::sync::Arc;

pub struct ScanOptions {
    pub from: String,
    pub snapshot: PathBuf,
    pub driftignore: Option<PathBuf>,
    pub parallelism: usize,
    pub output: OutputFormat,
    pub only_types: Vec<String>,
    pub schema: Option<PathBuf>,
    pub strict: bool,
}

pub async fn handle(opts: ScanOptions) -> anyhow::Result<bool> {
    let state = TerraformStateReader::from_path(opts.from.clone())
        .with_context(|| format!("Unable to find state files from {}", opts.from))?;
    let mut declared = state
        .declared_resources()
        .await
        .context("Unable to read declared resources")?;

    let snapshot = Snapshot::load(&opts.snapshot)
        .await
        .with_context(|| format!("Unable to load snapshot {}", opts.snapshot.display()))?;
    let only_types = (!opts.only_types.is_empty()).then_some(opts.only_types.as_slice());
    let scanner = Scanner::new().with_suppliers(snapshot_suppliers(
        Arc::new(snapshot),
        opts.parallelism,
        only_types,
    ));
    let scan = scanner.scan().await;

    if opts.strict && !scan.is_complete() {
        anyhow::bail!(
            "Unable to scan resource types: {}",
            scan.failed_types().join(", ")
        );
    }

    // Declared resources of unscanned types would all look deleted
    let failed_types = scan.failed_types();
    declared.retain(|resource| {
        let ty = resource.resource_type();
        !failed_types.contains(&ty) && only_types.is_none_or(|only| only.iter().any(|o| o == ty))
    });

    let ignore = match &opts.driftignore {
        Some(path) => DriftIgnore::load(path).unwrap_or_else(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Unable to read ignore file, falling back to discovery"
            );
            DriftIgnore::load_default()
        }),
        None => DriftIgnore::load_default(),
    };
    let schemas = match &opts.schema {
        Some(path) => Some(
            SchemaRepository::load(path)
                .with_context(|| format!("Unable to read schema file {}", path.display()))?,
        ),
        None => None,
    };

    let mut analyzer = Analyzer::new(&ignore);
    if let Some(schemas) = &schemas {
        analyzer = analyzer.with_schemas(schemas);
    }
    let mut analysis = analyzer.analyze(&declared, &scan.resources);
    for alert in scan.alerts() {
        analysis.add_alert(alert);
    }

    tracing::info!(summary = %analysis.summary(), "Scan complete");

    match opts.output {
        OutputFormat::Console => output::print_analysis(&analysis),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
    }

    Ok(analysis.is_sync())
}
