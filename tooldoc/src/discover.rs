//! Markdown file discovery.

use std::path::{Path, PathBuf};

use log::trace;
use walkdir::WalkDir;

/// Collect all markdown files from the input directory
#[must_use]
pub fn collect_markdown_files(input_dir: &Path) -> Vec<PathBuf> {
  let mut files = Vec::with_capacity(100);

  for entry in WalkDir::new(input_dir)
    .follow_links(true)
    .into_iter()
    .filter_map(Result::ok)
  {
    let path = entry.path();
    if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
      files.push(path.to_owned());
    }
  }

  // Discovery order is filesystem dependent; sort so document ids enter
  // the pipeline deterministically.
  files.sort();

  trace!("Found {} markdown files to validate", files.len());
  files
}

/// Derive the document id for a discovered file: its path relative to the
/// input directory, with `/` separators.
#[must_use]
pub fn document_id(input_dir: &Path, file: &Path) -> String {
  file
    .strip_prefix(input_dir)
    .unwrap_or(file)
    .to_string_lossy()
    .replace('\\', "/")
}
