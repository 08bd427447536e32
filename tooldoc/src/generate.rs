//! Page generation from a command catalog.
//!
//! Commands are grouped by their leading namespace segment into one page
//! per service, rendered through a Tera template. The built-in template
//! emits pages that pass validation with the default options, so a
//! generate/validate round trip on an unchanged catalog is clean.

use std::{collections::BTreeMap, fs, path::Path};

use color_eyre::eyre::{Context, Result, eyre};
use log::{debug, info};
use serde::Serialize;
use tera::Tera;
use tooldoc_config::Config;
use tooldoc_validate::{CatalogEntry, CommandCatalog};

const SERVICE_TEMPLATE: &str = include_str!("../templates/service.md");

/// Template context for one command on a service page.
#[derive(Serialize)]
struct CommandContext {
  name:       String,
  short:      String,
  parameters: Vec<String>,
}

impl CommandContext {
  fn from_entry(entry: &CatalogEntry) -> Self {
    // `storage.accounts-list` reads as "accounts list" in prose.
    let short = entry
      .name
      .split_once('.')
      .map_or_else(|| entry.name.clone(), |(_, tail)| {
        tail.replace(['.', '-'], " ")
      });

    Self {
      name: entry.name.clone(),
      short,
      parameters: entry.parameters.iter().cloned().collect(),
    }
  }
}

/// Generate one Markdown page per service from the catalog.
///
/// # Errors
///
/// Returns an error if the catalog is missing or malformed, the template
/// fails to parse or render, or a page cannot be written.
pub fn generate_pages(
  config: &Config,
  catalog_path: Option<&Path>,
  output_dir: Option<&Path>,
  template_path: Option<&Path>,
) -> Result<()> {
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

  let output_dir = output_dir.unwrap_or(&config.output_dir);
  fs::create_dir_all(output_dir).wrap_err_with(|| {
    format!("Failed to create output directory: {}", output_dir.display())
  })?;

  let template = match template_path {
    Some(path) => {
      fs::read_to_string(path).wrap_err_with(|| {
        format!("Failed to read template: {}", path.display())
      })?
    },
    None => SERVICE_TEMPLATE.to_string(),
  };
  let mut tera = Tera::default();
  tera
    .add_raw_template("service.md", &template)
    .wrap_err("Failed to parse page template")?;

  let mut services: BTreeMap<&str, Vec<&CatalogEntry>> = BTreeMap::new();
  for entry in catalog.iter() {
    let root = entry.name.split('.').next().unwrap_or(&entry.name);
    services.entry(root).or_default().push(entry);
  }

  let date = jiff::Zoned::now().strftime("%Y-%m-%d").to_string();

  for (service, entries) in &services {
    let commands: Vec<CommandContext> = entries
      .iter()
      .map(|entry| CommandContext::from_entry(entry))
      .collect();

    let mut context = tera::Context::new();
    context.insert("service", service);
    context.insert("title", &format!("{} operations", title_case(service)));
    context.insert(
      "description",
      &format!(
        "Reference for the {service} service operations available in the \
         tool catalog, with parameters and example prompts."
      ),
    );
    context.insert("date", &date);
    context.insert("commands", &commands);

    let page = tera
      .render("service.md", &context)
      .wrap_err_with(|| format!("Failed to render page for `{service}`"))?;

    let path = output_dir.join(format!("{service}.md"));
    fs::write(&path, page).wrap_err_with(|| {
      format!("Failed to write page: {}", path.display())
    })?;
    debug!(
      "Generated {} with {} operation(s)",
      path.display(),
      entries.len()
    );
  }

  info!(
    "Generated {} service page(s) in {}",
    services.len(),
    output_dir.display()
  );
  Ok(())
}

fn title_case(word: &str) -> String {
  let mut chars = word.chars();
  chars.next().map_or_else(String::new, |first| {
    first.to_uppercase().collect::<String>() + chars.as_str()
  })
}
