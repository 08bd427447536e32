use std::{
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tooldoc_validate::ValidationOptions;

use crate::error::ConfigError;

/// Configuration for the tooldoc generator and validator.
///
/// [`Config`] holds the paths and knobs controlling page generation and
/// corpus validation. Fields are typically loaded from a TOML or JSON
/// config file, but can also be set via CLI arguments; CLI values win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Input directory containing markdown files to validate.
  pub input_dir: Option<PathBuf>,

  /// Output directory for generated documentation pages.
  pub output_dir: PathBuf,

  /// Path to the command catalog JSON file.
  pub catalog_path: Option<PathBuf>,

  /// Path the validation report is written to.
  pub report_path: Option<PathBuf>,

  /// Number of threads to use for parallel processing.
  pub jobs: Option<usize>,

  /// Title prefix for generated pages.
  pub title: String,

  /// Validation engine knobs, passed through to the core unchanged.
  /// Scoring weights live here so they are configuration, not code.
  pub validation: ValidationOptions,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      input_dir:    None,
      output_dir:   PathBuf::from("docs"),
      catalog_path: None,
      report_path:  None,
      jobs:         None,
      title:        "tooldoc reference".to_string(),
      validation:   ValidationOptions::default(),
    }
  }
}

/// Default configuration file written by `tooldoc init`.
const DEFAULT_CONFIG_TOML: &str = r##"# tooldoc configuration

# input_dir = "docs"
# catalog_path = "catalog.json"
# report_path = "tooldoc-report.json"
output_dir = "docs"
title = "tooldoc reference"

[validation]
required_front_matter = ["title", "description", "topic", "date", "service"]
description_min = 40
description_max = 160
required_sections = ["Available operations"]
operation_heading_level = 3
example_prompts_heading = "Example prompts"
parameters_heading = "Parameters"
min_example_prompts = 5
min_prompt_styles = 2
parameter_table_columns = ["Parameter", "Required", "Description"]
forbidden_subheadings = ["Parameters", "Example prompts"]
bullet_char = "-"
unique_sections = ["See also"]
# Domain terms scanned for capitalization/terminology drift.
terms = []

# Disallowed branding substitutions: `"wrong spelling" = "Required Spelling"`.
[validation.branding]

[validation.quality_weights]
structure = 0.30
content = 0.30
examples = 0.20
metadata = 0.20

[validation.compliance_weights]
front_matter = 0.30
heading_structure = 0.30
template_format = 0.20
standards = 0.20
"##;

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the
  /// format is unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    match path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase)
      .as_deref()
    {
      Some("json") => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some(_) => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, merging them in order with
  /// later files overriding earlier ones. With no files given, a config
  /// file is discovered in the working directory, falling back to
  /// defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if any named file cannot be loaded.
  pub fn load(config_files: &[PathBuf]) -> Result<Self, ConfigError> {
    if config_files.is_empty() {
      return Self::find_config_file().map_or_else(
        || Ok(Self::default()),
        |discovered| {
          log::info!(
            "Using discovered config file: {}",
            discovered.display()
          );
          Self::from_file(&discovered)
        },
      );
    }

    let mut merged = Self::from_file(&config_files[0])?;
    for path in &config_files[1..] {
      merged.merge(Self::from_file(path)?);
    }
    if config_files.len() > 1 {
      log::info!("Loaded and merged {} config files", config_files.len());
    }
    Ok(merged)
  }

  /// Merge another configuration into this one. Fields of `other` that
  /// differ from the defaults win.
  pub fn merge(&mut self, other: Self) {
    let defaults = Self::default();

    if other.input_dir.is_some() {
      self.input_dir = other.input_dir;
    }
    if other.output_dir != defaults.output_dir {
      self.output_dir = other.output_dir;
    }
    if other.catalog_path.is_some() {
      self.catalog_path = other.catalog_path;
    }
    if other.report_path.is_some() {
      self.report_path = other.report_path;
    }
    if other.jobs.is_some() {
      self.jobs = other.jobs;
    }
    if other.title != defaults.title {
      self.title = other.title;
    }
    if other.validation != defaults.validation {
      self.validation = other.validation;
    }
  }

  /// Look for a config file in the standard locations.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    ["tooldoc.toml", ".tooldoc.toml", "tooldoc.json"]
      .iter()
      .map(PathBuf::from)
      .find(|candidate| candidate.is_file())
  }

  /// Write the default configuration file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be written.
  pub fn generate_default_config(path: &Path) -> Result<(), ConfigError> {
    fs::write(path, DEFAULT_CONFIG_TOML)?;
    log::info!("Wrote default configuration to {}", path.display());
    Ok(())
  }

  /// The validation options for this run.
  #[must_use]
  pub fn validation_options(&self) -> ValidationOptions {
    self.validation.clone()
  }
}

#[cfg(test)]
#[allow(clippy::expect_used, reason = "Fine in tests")]
mod tests {
  use super::*;

  #[test]
  fn default_config_template_parses_back() {
    let config: Config =
      toml::from_str(DEFAULT_CONFIG_TOML).expect("template parses");
    assert_eq!(config.validation, ValidationOptions::default());
    assert_eq!(config.output_dir, PathBuf::from("docs"));
  }

  #[test]
  fn later_files_override_earlier_ones() {
    let mut base = Config::default();
    let mut over = Config::default();
    over.input_dir = Some(PathBuf::from("pages"));
    over.title = "Custom".to_string();
    base.merge(over);

    assert_eq!(base.input_dir, Some(PathBuf::from("pages")));
    assert_eq!(base.title, "Custom");
    assert_eq!(base.output_dir, PathBuf::from("docs"));
  }

  #[test]
  fn toml_and_json_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let toml_path = dir.path().join("tooldoc.toml");
    fs::write(&toml_path, "title = \"From TOML\"\n").expect("write");
    let from_toml = Config::from_file(&toml_path).expect("load toml");
    assert_eq!(from_toml.title, "From TOML");

    let json_path = dir.path().join("tooldoc.json");
    fs::write(&json_path, "{\"title\": \"From JSON\"}").expect("write");
    let from_json = Config::from_file(&json_path).expect("load json");
    assert_eq!(from_json.title, "From JSON");
  }
}
