use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// One row of the helpdesk CSV export. Column headers are the ones the
/// export ships with; any extra columns are ignored on deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Responsável da conversa")]
    pub owner: String,
    #[serde(rename = "Data e hora de entrada")]
    pub entered_at: String,
    #[serde(rename = "Tempo de espera após atribuição", default)]
    pub wait_after_assignment: Option<String>,
}

pub fn load_rows(path: &Path) -> anyhow::Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open export at {}", path.display()))?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawRow>() {
        let row = result.with_context(|| {
            format!(
                "export at {} is missing a required column or has a malformed row",
                path.display()
            )
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Picks the largest CSV file in `dir`, the same heuristic the export
/// drop-folder workflow uses. Returns None when there is nothing to analyze.
pub fn find_export_file(dir: &Path) -> anyhow::Result<Option<PathBuf>> {
    let mut best: Option<(u64, PathBuf)> = None;

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to scan {} for exports", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }

        let size = entry.metadata()?.len();
        if best.as_ref().is_none_or(|(largest, _)| size > *largest) {
            best = Some((size, path));
        }
    }

    Ok(best.map(|(_, path)| path))
}
