//! The `prompts` subcommand: prompt bank extraction.
//!
//! Walks the documented operations of every page and collects their
//! example prompts into one JSON object keyed by command name. Only
//! operations the catalog knows about contribute; prompt text is
//! deduplicated per command but kept in document order.

use std::{collections::BTreeMap, fs, path::Path};

use color_eyre::eyre::{Context, Result, eyre};
use log::{debug, info};
use tooldoc_config::Config;
use tooldoc_validate::{CommandCatalog, outline, parser};

use crate::discover;

/// Extract example prompts per catalog command into a JSON file.
///
/// # Errors
///
/// Returns an error if the catalog is missing or malformed, a document
/// cannot be read, or the output cannot be written.
pub fn extract_prompt_bank(
  config: &Config,
  input_dir: Option<&Path>,
  catalog_path: Option<&Path>,
  output: &Path,
) -> Result<()> {
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

  let content = fs::read_to_string(catalog_path).wrap_err_with(|| {
    format!("Failed to read catalog: {}", catalog_path.display())
  })?;
  let catalog = CommandCatalog::from_json_str(&content).wrap_err_with(|| {
    format!("Invalid command catalog: {}", catalog_path.display())
  })?;

  let options = config.validation_options();
  let mut bank: BTreeMap<String, Vec<String>> = BTreeMap::new();

  for file in discover::collect_markdown_files(input_dir) {
    let content = fs::read_to_string(&file).wrap_err_with(|| {
      format!("Failed to read document: {}", file.display())
    })?;
    let doc =
      parser::parse(&discover::document_id(input_dir, &file), &content);

    for operation in outline::operation_sections(&doc, &options) {
      let name = operation.heading.text.trim();
      if !catalog.contains(name) {
        debug!(
          "skipping prompts for unknown operation `{name}` in {}",
          doc.id
        );
        continue;
      }
      let Some(list) = outline::example_prompt_list(&doc, &operation, &options)
      else {
        continue;
      };

      let prompts = bank.entry(name.to_string()).or_default();
      for item in &list.items {
        let text = item.text.trim();
        if !text.is_empty() && !prompts.iter().any(|known| known == text) {
          prompts.push(text.to_string());
        }
      }
    }
  }

  let json = serde_json::to_string_pretty(&bank)
    .wrap_err("Failed to serialize prompt bank")?;
  if let Some(parent) = output.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent).wrap_err_with(|| {
        format!("Failed to create directory: {}", parent.display())
      })?;
    }
  }
  fs::write(output, json).wrap_err_with(|| {
    format!("Failed to write prompt bank: {}", output.display())
  })?;

  info!(
    "Extracted prompts for {} command(s) to {}",
    bank.len(),
    output.display()
  );
  Ok(())
}
