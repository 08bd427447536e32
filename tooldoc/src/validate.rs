//! The `validate` subcommand: corpus validation over a directory tree.
//!
//! Wires filesystem discovery and parallelism around the pure engine:
//! the catalog is loaded first (its failure aborts the run before any
//! document is read), phase-1 analysis fans out over a rayon pool, and
//! phase-2 corpus checks run once on the collected analyses.

use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result, eyre};
use log::debug;
use rayon::prelude::*;
use tooldoc_config::Config;
use tooldoc_validate::{
  CommandCatalog,
  DocumentAnalysis,
  DocumentSource,
  ValidationEngine,
};

use crate::{discover, report};

/// What the exit-code decision upstream needs to know about a run.
pub struct ValidationSummary {
  pub document_count: usize,
  pub error_count:    usize,
  pub warning_count:  usize,
}

/// Validate every markdown file under the input directory.
///
/// # Errors
///
/// Returns an error if the catalog is missing or malformed, a file
/// cannot be read, or the report cannot be written. Validation findings
/// themselves are never errors here; they land in the summary.
pub fn validate_corpus(
  config: &Config,
  input_dir: Option<&Path>,
  catalog_path: Option<&Path>,
  report_path: Option<&Path>,
  jobs: Option<usize>,
) -> Result<ValidationSummary> {
  let input_dir = input_dir
    .or(config.input_dir.as_deref())
    .ok_or_else(|| {
      eyre!("no input directory given; pass --input-dir or set `input_dir`")
    })?;
  let catalog_path = catalog_path
    .or(config.catalog_path.as_deref())
    .ok_or_else(|| {
      eyre!("no command catalog given; pass --catalog or set `catalog_path`")
    })?;

  // The catalog is the run's precondition: fail here, before any
  // document is read, so a bad catalog is never attributed to a page.
  let content = fs::read_to_string(catalog_path).wrap_err_with(|| {
    format!("Failed to read catalog: {}", catalog_path.display())
  })?;
  let catalog = CommandCatalog::from_json_str(&content).wrap_err_with(|| {
    format!("Invalid command catalog: {}", catalog_path.display())
  })?;
  debug!(
    "Loaded catalog with {} command(s) from {}",
    catalog.len(),
    catalog_path.display()
  );

  let engine = ValidationEngine::new(config.validation_options(), catalog);

  let sources: Vec<DocumentSource> = discover::collect_markdown_files(
    input_dir,
  )
  .iter()
  .map(|file| {
    let content = fs::read_to_string(file).wrap_err_with(|| {
      format!("Failed to read document: {}", file.display())
    })?;
    Ok(DocumentSource::new(
      discover::document_id(input_dir, file),
      content,
    ))
  })
  .collect::<Result<_>>()?;

  let jobs = jobs.or(config.jobs).unwrap_or_else(num_cpus::get);
  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(jobs)
    .build()
    .wrap_err("Failed to build worker thread pool")?;
  debug!("Analyzing {} document(s) on {jobs} thread(s)", sources.len());

  // Phase 1 is pure and per-document, so it parallelizes freely; phase 2
  // runs once over the collected analyses.
  let analyses: Vec<DocumentAnalysis> = pool.install(|| {
    sources
      .par_iter()
      .map(|source| engine.analyze(source))
      .collect()
  });
  let cross = engine.validate_corpus(&analyses);

  let mut documents: Vec<_> =
    analyses.iter().map(DocumentAnalysis::merged).collect();
  documents.sort_by(|a, b| a.id.cmp(&b.id));

  if let Some(path) = report_path.or(config.report_path.as_deref()) {
    report::write(path, &documents, &cross)?;
  }

  let error_count = cross.errors.len()
    + documents.iter().map(|doc| doc.errors.len()).sum::<usize>();
  let warning_count = cross.warnings.len()
    + documents.iter().map(|doc| doc.warnings.len()).sum::<usize>();

  Ok(ValidationSummary {
    document_count: documents.len(),
    error_count,
    warning_count,
  })
}
