use analytics::ViewResult;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Writes a view as CSV: one column per group key, then one per metric.
///
/// For `ExportAggregate` this yields `channel,country,revenue,cost,margin`.
pub fn write_view<W: Write>(view: &ViewResult, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let header: Vec<&str> = view
        .group_keys
        .iter()
        .map(|d| d.name())
        .chain(view.metrics.iter().map(|m| m.name()))
        .collect();
    csv.write_record(&header)?;

    for row in &view.rows {
        let fields: Vec<String> = row
            .keys
            .iter()
            .map(|k| k.to_string())
            .chain(row.values.iter().map(|v| v.normalize().to_string()))
            .collect();
        csv.write_record(&fields)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_to_path(view: &ViewResult, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file {}", path.display()))?;
    write_view(view, file)?;
    tracing::info!(view = %view.name, rows = view.len(), path = %path.display(), "View exported.");
    Ok(())
}
