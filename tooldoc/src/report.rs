//! JSON validation report writer.

use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use log::info;
use serde::Serialize;
use tooldoc_validate::{CrossDocumentResult, DocumentReport};

#[derive(Serialize)]
struct Report<'a> {
  generated_at:   String,
  documents:      &'a [DocumentReport],
  cross_document: &'a CrossDocumentResult,
}

/// Write the machine-readable validation report.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized or written.
pub fn write(
  path: &Path,
  documents: &[DocumentReport],
  cross: &CrossDocumentResult,
) -> Result<()> {
  let report = Report {
    generated_at: jiff::Timestamp::now().to_string(),
    documents,
    cross_document: cross,
  };
  let json = serde_json::to_string_pretty(&report)
    .wrap_err("Failed to serialize validation report")?;

  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent).wrap_err_with(|| {
        format!("Failed to create directory: {}", parent.display())
      })?;
    }
  }
  fs::write(path, json).wrap_err_with(|| {
    format!("Failed to write report: {}", path.display())
  })?;

  info!("Wrote validation report to {}", path.display());
  Ok(())
}
