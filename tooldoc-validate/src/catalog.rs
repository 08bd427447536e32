//! Command catalog.
//!
//! The catalog is the authoritative registry of known commands and their
//! valid parameters, built once per run from JSON supplied by the caller
//! and shared read-only across all validators. A structurally invalid
//! catalog is the engine's only hard failure: it is raised before any
//! document is processed, since it is not attributable to any single
//! document.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Error raised for a structurally invalid catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("catalog root must be a JSON object mapping command names")]
  NotAMapping,

  #[error("catalog entry `{0}` must be an object or a parameter array")]
  InvalidEntry(String),

  #[error("catalog entry `{0}` has a non-string parameter")]
  InvalidParameter(String),

  #[error("catalog term entry `{0}` must map to a string")]
  InvalidTerm(String),

  #[error("failed to parse catalog JSON: {0}")]
  Parse(#[from] serde_json::Error),
}

/// A known command and the set of parameters it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
  pub name:       String,
  pub parameters: BTreeSet<String>,
}

/// The command registry: a sorted mapping from command name to entry,
/// plus optional canonical spellings for domain terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandCatalog {
  commands:        BTreeMap<String, CatalogEntry>,
  canonical_terms: BTreeMap<String, String>,
  roots:           BTreeSet<String>,
}

impl CommandCatalog {
  /// Build a catalog from `(name, parameters)` pairs.
  pub fn from_entries<I, S, P>(entries: I) -> Self
  where
    I: IntoIterator<Item = (S, P)>,
    S: Into<String>,
    P: IntoIterator<Item = S>,
  {
    let mut catalog = Self::default();
    for (name, parameters) in entries {
      let name = name.into();
      catalog.insert(CatalogEntry {
        name,
        parameters: parameters.into_iter().map(Into::into).collect(),
      });
    }
    catalog
  }

  /// Parse a catalog from a JSON string.
  ///
  /// # Errors
  ///
  /// Returns [`CatalogError`] if the JSON does not parse or is not a
  /// valid catalog shape.
  pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
    let value: Value = serde_json::from_str(content)?;
    Self::from_json(&value)
  }

  /// Build a catalog from a parsed JSON value.
  ///
  /// Two shapes are accepted: a flat object mapping command names to
  /// entries, or an object with a `commands` mapping and an optional
  /// `terms` mapping of canonical spellings. An entry may be an object
  /// with a `parameters` array or a bare parameter array.
  ///
  /// # Errors
  ///
  /// Returns [`CatalogError`] if the value is not a mapping or any entry
  /// is malformed. This is the engine's fatal precondition: callers must
  /// construct the catalog before processing any document.
  pub fn from_json(value: &Value) -> Result<Self, CatalogError> {
    let root = value.as_object().ok_or(CatalogError::NotAMapping)?;

    let (commands, terms) = match root.get("commands") {
      Some(commands) => {
        let commands =
          commands.as_object().ok_or(CatalogError::NotAMapping)?;
        (commands, root.get("terms"))
      },
      None => (root, None),
    };

    let mut catalog = Self::default();
    for (name, entry) in commands {
      catalog.insert(parse_entry(name, entry)?);
    }

    if let Some(terms) = terms {
      let terms = terms.as_object().ok_or(CatalogError::NotAMapping)?;
      for (key, spelling) in terms {
        let spelling = spelling
          .as_str()
          .ok_or_else(|| CatalogError::InvalidTerm(key.clone()))?;
        catalog
          .canonical_terms
          .insert(key.trim().to_lowercase(), spelling.to_string());
      }
    }

    Ok(catalog)
  }

  fn insert(&mut self, entry: CatalogEntry) {
    if let Some((root, _)) = entry.name.split_once('.') {
      self.roots.insert(root.to_string());
    }
    self.commands.insert(entry.name.clone(), entry);
  }

  /// Look up a command by exact name.
  #[must_use]
  pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
    self.commands.get(name)
  }

  /// Whether `name` is a known command.
  #[must_use]
  pub fn contains(&self, name: &str) -> bool {
    self.commands.contains_key(name)
  }

  /// Whether any known command uses `root` as its leading namespace
  /// segment. Used to decide the confidence of an unresolved token.
  #[must_use]
  pub fn has_root(&self, root: &str) -> bool {
    self.roots.contains(root)
  }

  /// The catalog's canonical spelling for a normalized term key, if any.
  #[must_use]
  pub fn canonical_term(&self, key: &str) -> Option<&str> {
    self.canonical_terms.get(key).map(String::as_str)
  }

  /// Iterate commands in sorted name order.
  pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
    self.commands.values()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.commands.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.commands.is_empty()
  }
}

fn parse_entry(name: &str, value: &Value) -> Result<CatalogEntry, CatalogError> {
  let parameters = match value {
    Value::Object(fields) => {
      match fields.get("parameters") {
        Some(Value::Array(items)) => collect_parameters(name, items)?,
        Some(_) => return Err(CatalogError::InvalidEntry(name.to_string())),
        None => BTreeSet::new(),
      }
    },
    Value::Array(items) => collect_parameters(name, items)?,
    _ => return Err(CatalogError::InvalidEntry(name.to_string())),
  };

  Ok(CatalogEntry {
    name: name.to_string(),
    parameters,
  })
}

fn collect_parameters(
  name: &str,
  items: &[Value],
) -> Result<BTreeSet<String>, CatalogError> {
  items
    .iter()
    .map(|item| {
      item
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| CatalogError::InvalidParameter(name.to_string()))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn flat_mapping_parses() {
    let catalog = CommandCatalog::from_json(&json!({
      "storage.accounts-list": { "parameters": ["subscription"] },
      "compute.vm-start": ["name", "resource-group"],
    }))
    .expect("valid catalog");

    assert_eq!(catalog.len(), 2);
    assert!(catalog.contains("storage.accounts-list"));
    assert!(catalog.has_root("compute"));
    assert!(!catalog.has_root("network"));
  }

  #[test]
  fn wrapped_mapping_with_terms_parses() {
    let catalog = CommandCatalog::from_json(&json!({
      "commands": { "tool.op": { "parameters": ["subscription"] } },
      "terms": { "storage account": "Storage account" },
    }))
    .expect("valid catalog");

    assert_eq!(
      catalog.canonical_term("storage account"),
      Some("Storage account")
    );
  }

  #[test]
  fn non_mapping_root_is_a_precondition_failure() {
    let err = CommandCatalog::from_json(&json!(["not", "a", "mapping"]))
      .expect_err("must fail");
    assert!(matches!(err, CatalogError::NotAMapping));
  }

  #[test]
  fn malformed_entry_is_a_precondition_failure() {
    let err = CommandCatalog::from_json(&json!({ "tool.op": 42 }))
      .expect_err("must fail");
    assert!(matches!(err, CatalogError::InvalidEntry(_)));
  }

  #[test]
  fn non_string_parameter_is_a_precondition_failure() {
    let err =
      CommandCatalog::from_json(&json!({ "tool.op": ["ok", 1] }))
        .expect_err("must fail");
    assert!(matches!(err, CatalogError::InvalidParameter(_)));
  }
}
