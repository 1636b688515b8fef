use anyhow::Context;
use driftflow_core::Analysis;
use driftflow_filter::{AnalysisListOptions, analysis_to_list};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

pub async fn handle(input: Option<PathBuf>, opts: AnalysisListOptions) -> anyhow::Result<()> {
    let content = match &input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Unable to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Unable to read analysis from stdin")?;
            buf
        }
    };

    let analysis: Analysis =
        serde_json::from_str(&content).context("Input is not a valid JSON analysis")?;
    let list = analysis_to_list(&analysis, opts);
    tracing::info!(count = list.count, "Generated ignore rules");

    if !list.lines.is_empty() {
        println!("{}", list);
    }
    Ok(())
}
