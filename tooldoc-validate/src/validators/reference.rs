//! Reference validator.
//!
//! Resolves internal anchors, embedded command and parameter tokens, and
//! cross-document links. Doc-local mode checks one document against its
//! own anchors and the catalog; cross-document mode merges per-document
//! reference indices and resolves `other-doc.md#slug` links against the
//! target document's anchor set.
//!
//! Confidence split for unresolved commands: a token whose leading
//! namespace segment is known to the catalog exactly matches the naming
//! convention and is a guaranteed-wrong reference (error); a token with
//! an unknown root merely looks command-shaped (warning).

use std::{
  collections::{BTreeSet, HashMap},
  sync::LazyLock,
};

use regex::Regex;
use serde::Serialize;

use super::{ValidationContext, Validator};
use crate::{
  issue::{Issue, IssueCode, ValidationResult},
  outline,
  types::{Document, Location},
  utils,
};

static COMMAND_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[a-z][a-z0-9]*(\.[a-z][a-z0-9-]*)+$").unwrap_or_else(|e| {
    log::error!("Failed to compile COMMAND_TOKEN_RE regex: {e}");
    utils::never_matching_regex()
  })
});

static PARAM_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[a-z][a-z0-9-]*$").unwrap_or_else(|e| {
    log::error!("Failed to compile PARAM_TOKEN_RE regex: {e}");
    utils::never_matching_regex()
  })
});

static FENCED_COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b[a-z][a-z0-9]*(\.[a-z][a-z0-9-]*)+\b").unwrap_or_else(|e| {
    log::error!("Failed to compile FENCED_COMMAND_RE regex: {e}");
    utils::never_matching_regex()
  })
});

/// A link from one document into another, kept for phase-2 resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossDocLink {
  pub target_doc: String,
  pub anchor:     Option<String>,
  pub location:   Location,
}

/// Per-document reference index; merged for corpus runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceIndex {
  pub doc_id:  String,
  pub anchors: BTreeSet<String>,

  /// Commands referenced by this document and resolved in the catalog.
  pub commands_referenced: BTreeSet<String>,

  /// `(command, parameter)` pairs resolved in the catalog.
  pub parameters_referenced: BTreeSet<(String, String)>,

  /// Outbound links into other documents.
  pub cross_links: Vec<CrossDocLink>,
}

/// Reference validator output for one document.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceReport {
  #[serde(flatten)]
  pub result: ValidationResult,
  pub index:  ReferenceIndex,
}

/// Cross-document reference outcome, before the engine folds it into the
/// corpus summary.
#[derive(Debug, Clone, Serialize)]
pub struct CrossReferenceResult {
  #[serde(flatten)]
  pub result: ValidationResult,

  pub validated_documents:  usize,
  pub validated_commands:   usize,
  pub validated_parameters: usize,
}

pub struct ReferenceValidator;

impl ReferenceValidator {
  /// Doc-local mode: resolve anchors and embedded tokens against the
  /// document and the catalog, and build the reference index.
  #[must_use]
  pub fn report(
    &self,
    doc: &Document,
    ctx: &ValidationContext<'_>,
  ) -> ReferenceReport {
    let catalog = ctx.catalog;
    let mut issues = Vec::new();
    let mut index = ReferenceIndex {
      doc_id: doc.id.clone(),
      ..ReferenceIndex::default()
    };

    for heading in doc.flat_headings() {
      index.anchors.insert(heading.anchor_slug.clone());
    }

    // Command context: the last resolved command seen before a given
    // line, from operation headings and inline command tokens.
    let mut command_events: Vec<(usize, String)> = Vec::new();
    let mut parameter_candidates: Vec<(usize, String, Location)> = Vec::new();

    for heading in doc.flat_headings() {
      let token = heading.text.trim();
      if COMMAND_TOKEN_RE.is_match(token) && catalog.contains(token) {
        index.commands_referenced.insert(token.to_string());
        command_events.push((heading.location.line, token.to_string()));
      }
    }

    for span in &doc.code_spans {
      if span.is_fenced {
        for matched in FENCED_COMMAND_RE.find_iter(&span.text) {
          resolve_command(
            matched.as_str(),
            span.location,
            ctx,
            &mut index,
            &mut command_events,
            &mut issues,
          );
        }
        continue;
      }

      let token = span.text.trim();
      if COMMAND_TOKEN_RE.is_match(token) {
        resolve_command(
          token,
          span.location,
          ctx,
          &mut index,
          &mut command_events,
          &mut issues,
        );
      } else if PARAM_TOKEN_RE.is_match(token) {
        parameter_candidates.push((
          span.location.line,
          token.to_string(),
          span.location,
        ));
      }
    }

    // Parameter rows of operation tables are references too.
    for operation in outline::operation_sections(doc, ctx.options) {
      let command = operation.heading.text.trim();
      if !catalog.contains(command) {
        continue;
      }
      if let Some(table) = outline::parameter_table(doc, &operation, ctx.options)
      {
        for row in &table.rows {
          if let Some(cell) = row.first() {
            let token = cell.trim().trim_matches('`');
            if PARAM_TOKEN_RE.is_match(token) {
              parameter_candidates.push((
                table.location.line,
                token.to_string(),
                table.location,
              ));
            }
          }
        }
      }
    }

    command_events.sort_by(|a, b| a.0.cmp(&b.0));

    for (line, token, location) in parameter_candidates {
      let Some((_, command)) = command_events
        .iter()
        .rev()
        .find(|(event_line, _)| *event_line <= line)
      else {
        // No command context; a bare token proves nothing.
        continue;
      };
      let Some(entry) = catalog.get(command) else {
        continue;
      };
      if entry.parameters.contains(&token) {
        index
          .parameters_referenced
          .insert((command.clone(), token));
      } else {
        issues.push(
          Issue::new(
            IssueCode::UnknownParameter,
            format!("`{token}` is not a parameter of `{command}`"),
          )
          .at(location),
        );
      }
    }

    for link in &doc.links {
      if link.is_anchor {
        let slug = link.target.trim_start_matches('#');
        if !doc.has_anchor(slug) {
          issues.push(
            Issue::new(
              IssueCode::UnresolvedAnchor,
              format!("internal anchor `#{slug}` does not resolve"),
            )
            .at(link.location),
          );
        }
      } else if let Some(cross) = parse_cross_link(link) {
        index.cross_links.push(cross);
      }
    }

    ReferenceReport {
      result: ValidationResult::from_issues(issues),
      index,
    }
  }

  /// Cross-document mode: resolve inter-document links against the merged
  /// index and produce the aggregate counts.
  ///
  /// `indices` must be sorted by document id; the engine guarantees this.
  #[must_use]
  pub fn check_corpus(
    &self,
    indices: &[ReferenceIndex],
  ) -> CrossReferenceResult {
    let mut by_name: HashMap<&str, &ReferenceIndex> = HashMap::new();
    for index in indices {
      by_name.insert(index.doc_id.as_str(), index);
      if let Some(file_name) = std::path::Path::new(&index.doc_id)
        .file_name()
        .and_then(|name| name.to_str())
      {
        by_name.entry(file_name).or_insert(index);
      }
    }

    let mut issues = Vec::new();
    let mut commands: BTreeSet<&str> = BTreeSet::new();
    let mut parameters: BTreeSet<&(String, String)> = BTreeSet::new();

    for index in indices {
      commands.extend(index.commands_referenced.iter().map(String::as_str));
      parameters.extend(&index.parameters_referenced);

      for link in &index.cross_links {
        let target = by_name.get(link.target_doc.as_str()).or_else(|| {
          std::path::Path::new(&link.target_doc)
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| by_name.get(name))
        });

        match target {
          None => {
            issues.push(
              Issue::new(
                IssueCode::UnknownTargetDocument,
                format!(
                  "link target document `{}` is not in the corpus",
                  link.target_doc
                ),
              )
              .in_doc(index.doc_id.clone())
              .at(link.location),
            );
          },
          Some(target) => {
            if let Some(anchor) = &link.anchor {
              if !target.anchors.contains(anchor) {
                issues.push(
                  Issue::new(
                    IssueCode::UnresolvedCrossAnchor,
                    format!(
                      "anchor `#{anchor}` does not resolve in `{}`",
                      target.doc_id
                    ),
                  )
                  .in_doc(index.doc_id.clone())
                  .at(link.location),
                );
              }
            }
          },
        }
      }
    }

    CrossReferenceResult {
      result:               ValidationResult::from_issues(issues),
      validated_documents:  indices.len(),
      validated_commands:   commands.len(),
      validated_parameters: parameters.len(),
    }
  }
}

impl Validator for ReferenceValidator {
  fn name(&self) -> &'static str {
    "references"
  }

  fn validate(
    &self,
    doc: &Document,
    ctx: &ValidationContext<'_>,
  ) -> ValidationResult {
    self.report(doc, ctx).result
  }
}

fn resolve_command(
  token: &str,
  location: Location,
  ctx: &ValidationContext<'_>,
  index: &mut ReferenceIndex,
  command_events: &mut Vec<(usize, String)>,
  issues: &mut Vec<Issue>,
) {
  let catalog = ctx.catalog;
  if catalog.contains(token) {
    index.commands_referenced.insert(token.to_string());
    command_events.push((location.line, token.to_string()));
    return;
  }

  let root = token.split('.').next().unwrap_or(token);
  if catalog.has_root(root) {
    issues.push(
      Issue::new(
        IssueCode::UnknownCommand,
        format!("`{token}` is not a command in the catalog"),
      )
      .at(location),
    );
  } else {
    issues.push(
      Issue::new(
        IssueCode::CommandLikeToken,
        format!("`{token}` looks like a command but has an unknown root"),
      )
      .at(location),
    );
  }
}

/// Interpret a non-anchor link as a cross-document reference when it
/// targets a Markdown file without a URL scheme.
fn parse_cross_link(link: &crate::types::Link) -> Option<CrossDocLink> {
  let target = link.target.as_str();
  if target.contains("://") || target.starts_with("mailto:") {
    return None;
  }

  let (path, anchor) = match target.split_once('#') {
    Some((path, anchor)) => (path, Some(anchor.to_string())),
    None => (target, None),
  };

  if !path.ends_with(".md") {
    return None;
  }

  Some(CrossDocLink {
    target_doc: path.to_string(),
    anchor,
    location: link.location,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    catalog::CommandCatalog,
    options::ValidationOptions,
    parser,
  };

  fn ctx<'a>(
    catalog: &'a CommandCatalog,
    options: &'a ValidationOptions,
  ) -> ValidationContext<'a> {
    ValidationContext { catalog, options }
  }

  #[test]
  fn command_token_convention_is_strict() {
    assert!(COMMAND_TOKEN_RE.is_match("tool.op"));
    assert!(COMMAND_TOKEN_RE.is_match("storage.accounts-list"));
    assert!(!COMMAND_TOKEN_RE.is_match("Tool.op"));
    assert!(!COMMAND_TOKEN_RE.is_match("tool"));
    assert!(!COMMAND_TOKEN_RE.is_match("tool..op"));
  }

  #[test]
  fn unknown_command_with_known_root_is_an_error() {
    let catalog =
      CommandCatalog::from_entries([("tool.op", vec!["subscription"])]);
    let options = ValidationOptions::default();
    let doc = parser::parse("a.md", "Run `tool.unknown` now.\n");

    let report =
      ReferenceValidator.report(&doc, &ctx(&catalog, &options));
    assert_eq!(report.result.errors.len(), 1);
    assert_eq!(report.result.errors[0].code, IssueCode::UnknownCommand);
  }

  #[test]
  fn unknown_root_is_a_low_confidence_warning() {
    let catalog =
      CommandCatalog::from_entries([("tool.op", vec!["subscription"])]);
    let options = ValidationOptions::default();
    let doc = parser::parse("a.md", "Run `other.thing` now.\n");

    let report =
      ReferenceValidator.report(&doc, &ctx(&catalog, &options));
    assert!(report.result.is_valid);
    assert_eq!(report.result.warnings[0].code, IssueCode::CommandLikeToken);
  }

  #[test]
  fn cross_links_are_indexed_not_resolved_locally() {
    let catalog = CommandCatalog::default();
    let options = ValidationOptions::default();
    let doc = parser::parse(
      "a.md",
      "[other](other.md#usage) and [site](https://example.com/x.md)\n",
    );

    let report =
      ReferenceValidator.report(&doc, &ctx(&catalog, &options));
    assert!(report.result.is_valid);
    assert_eq!(report.index.cross_links.len(), 1);
    assert_eq!(report.index.cross_links[0].target_doc, "other.md");
    assert_eq!(
      report.index.cross_links[0].anchor.as_deref(),
      Some("usage")
    );
  }
}
