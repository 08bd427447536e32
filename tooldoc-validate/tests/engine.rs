#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
//! End-to-end properties of the validation engine: parse determinism,
//! validity invariants, anchor resolution, canonicalization order, and
//! fault isolation across a corpus.

use tooldoc_validate::{
  CommandCatalog,
  DocumentSource,
  IssueCode,
  ValidationEngine,
  ValidationOptionsBuilder,
  parser,
};

fn engine_with_terms(terms: &[&str]) -> ValidationEngine {
  let catalog =
    CommandCatalog::from_entries([("tool.op", vec!["subscription"])]);
  let options = ValidationOptionsBuilder::new()
    .terms(terms.iter().copied())
    .build();
  ValidationEngine::new(options, catalog)
}

#[test]
fn parsing_is_deterministic() {
  let text = "---\ntitle: T\n---\n\n# Top\n\n## List Storage Accounts\n\n\
              Some `tool.op` prose with [a link](#top).\n\n| A | B |\n| - \
              | - |\n| 1 | 2 |\n";
  assert_eq!(parser::parse("x.md", text), parser::parse("x.md", text));
}

#[test]
fn validity_tracks_errors_for_every_validator() {
  let engine = engine_with_terms(&[]);
  let source = DocumentSource::new(
    "bad.md",
    "# One\n\n# Two\n\nRun `tool.unknown` and see [gone](#nowhere).\n",
  );
  let analysis = engine.analyze(&source);

  for result in [
    &analysis.content.result,
    &analysis.format.result,
    &analysis.consistency.result,
    &analysis.references.result,
  ] {
    assert_eq!(result.is_valid, result.errors.is_empty());
  }

  let merged = analysis.merged();
  assert_eq!(merged.is_valid, merged.errors.is_empty());
  assert!(!merged.is_valid);
}

#[test]
fn warnings_never_invalidate() {
  let engine = engine_with_terms(&["storage account"]);
  // Capitalization drift only: no errors, several warnings.
  let source = DocumentSource::new(
    "drift.md",
    "---\ntitle: T\ndescription: A description long enough to pass the \
     configured lower bound here.\ntopic: catalog\ndate: 2026-08-28\n\
     service: tool\n---\n\n# Storage\n\n## Available operations\n\nThe \
     Storage account helper. Later the storage account again.\n",
  );
  let analysis = engine.analyze(&source);
  let merged = analysis.merged();

  assert!(merged.errors.is_empty());
  assert!(!merged.warnings.is_empty());
  assert!(merged.is_valid);
}

#[test]
fn anchor_round_trip_resolves() {
  let engine = engine_with_terms(&[]);
  let source = DocumentSource::new(
    "anchors.md",
    "## List Storage Accounts\n\nJump [here](#list-storage-accounts).\n",
  );
  let analysis = engine.analyze(&source);

  assert!(
    analysis
      .references
      .index
      .anchors
      .contains("list-storage-accounts")
  );
  assert!(analysis.references.result.is_valid);
}

#[test]
fn missing_front_matter_is_a_content_error() {
  let engine = engine_with_terms(&[]);
  let source =
    DocumentSource::new("bare.md", "# Title only\n\nNo front matter.\n");
  let analysis = engine.analyze(&source);

  let cited: Vec<&str> = analysis
    .content
    .result
    .errors
    .iter()
    .filter(|issue| issue.code == IssueCode::MissingFrontMatterKey)
    .map(|issue| issue.message.as_str())
    .collect();
  assert!(cited.iter().any(|message| message.contains("title")));
  assert!(cited.iter().any(|message| message.contains("description")));
}

#[test]
fn in_document_drift_is_a_warning() {
  let engine = engine_with_terms(&["storage accounts"]);
  let source = DocumentSource::new(
    "drift.md",
    "# T\n\nYour Storage accounts are listed. All storage accounts \
     appear.\n",
  );
  let analysis = engine.analyze(&source);

  assert!(
    analysis
      .consistency
      .result
      .warnings
      .iter()
      .any(|issue| issue.code == IssueCode::TermVariance)
  );
}

#[test]
fn corpus_canonical_form_comes_from_first_document_by_id() {
  let engine = engine_with_terms(&["storage account"]);
  // Supply b.md first to prove ordering is by id, not arrival.
  let sources = vec![
    DocumentSource::new("b.md", "# B\n\nThe storage account here.\n"),
    DocumentSource::new("a.md", "# A\n\nThe Storage account here.\n"),
  ];
  let (_, cross) = engine.run(&sources);

  let variance: Vec<_> = cross
    .warnings
    .iter()
    .filter(|issue| issue.code == IssueCode::CrossDocumentTermVariance)
    .collect();
  assert_eq!(variance.len(), 1);
  assert_eq!(variance[0].doc_id.as_deref(), Some("b.md"));
  assert!(variance[0].message.contains("Storage account"));
}

#[test]
fn catalog_canonical_spelling_always_wins() {
  let catalog = CommandCatalog::from_json(&serde_json::json!({
    "commands": { "tool.op": { "parameters": ["subscription"] } },
    "terms": { "storage account": "Storage Account" },
  }))
  .expect("valid catalog");
  let options = ValidationOptionsBuilder::new()
    .terms(["storage account"])
    .build();
  let engine = ValidationEngine::new(options, catalog);

  let sources = vec![DocumentSource::new(
    "a.md",
    "# A\n\nThe storage account here.\n",
  )];
  let (_, cross) = engine.run(&sources);

  assert!(
    cross
      .warnings
      .iter()
      .any(|issue| issue.message.contains("Storage Account"))
  );
}

#[test]
fn unknown_command_is_an_error_unknown_parameter_a_warning() {
  let engine = engine_with_terms(&[]);

  let unknown_command =
    engine.analyze(&DocumentSource::new("c.md", "See `tool.unknown`.\n"));
  assert!(
    unknown_command
      .references
      .result
      .errors
      .iter()
      .any(|issue| issue.code == IssueCode::UnknownCommand)
  );

  let unknown_parameter = engine.analyze(&DocumentSource::new(
    "p.md",
    "Use `tool.op` with `tenant`.\n",
  ));
  assert!(unknown_parameter.references.result.errors.is_empty());
  assert!(
    unknown_parameter
      .references
      .result
      .warnings
      .iter()
      .any(|issue| issue.code == IssueCode::UnknownParameter)
  );

  let known_parameter = engine.analyze(&DocumentSource::new(
    "k.md",
    "Use `tool.op` with `subscription`.\n",
  ));
  assert!(known_parameter.references.result.warnings.is_empty());
  assert!(
    known_parameter
      .references
      .index
      .parameters_referenced
      .contains(&("tool.op".to_string(), "subscription".to_string()))
  );
}

#[test]
fn one_malformed_document_never_blocks_the_rest() {
  let engine = engine_with_terms(&[]);
  let sources = vec![
    DocumentSource::new(
      "broken.md",
      "---\n:::: this is not front matter at all\n%%%\n---\n# Broken\n",
    ),
    DocumentSource::new(
      "fine.md",
      "## List Storage Accounts\n\nJump [here](#list-storage-accounts).\n",
    ),
  ];
  let (analyses, cross) = engine.run(&sources);

  assert_eq!(analyses.len(), 2);
  assert_eq!(cross.summary.validated_documents, 2);

  let fine = analyses
    .iter()
    .find(|analysis| analysis.document.id == "fine.md")
    .expect("fine.md analyzed");
  assert!(fine.references.result.is_valid);
}

#[test]
fn cross_document_links_resolve_against_target_anchors() {
  let engine = engine_with_terms(&[]);
  let sources = vec![
    DocumentSource::new(
      "a.md",
      "# A\n\nSee [ops](b.md#usage), [bad anchor](b.md#missing), and \
       [gone](c.md#usage).\n",
    ),
    DocumentSource::new("b.md", "# B\n\n## Usage\n"),
  ];
  let (_, cross) = engine.run(&sources);

  assert!(
    cross
      .errors
      .iter()
      .any(|issue| issue.code == IssueCode::UnknownTargetDocument)
  );
  assert!(
    cross
      .warnings
      .iter()
      .any(|issue| issue.code == IssueCode::UnresolvedCrossAnchor)
  );
  assert_eq!(cross.summary.error_count, cross.errors.len());
  assert_eq!(
    cross.summary.total_issues,
    cross.errors.len() + cross.warnings.len()
  );
}

#[test]
fn more_passed_checks_never_lower_a_score() {
  let engine = engine_with_terms(&[]);

  let sparse = engine.analyze(&DocumentSource::new(
    "sparse.md",
    "# Title only\n",
  ));
  let fuller = engine.analyze(&DocumentSource::new(
    "fuller.md",
    "---\ntitle: Tool pages\ndescription: Reference pages for the tool \
     catalog, long enough for the bound.\ntopic: catalog\ndate: \
     2026-08-28\nservice: tool\n---\n\n# Tool pages\n\n## Available \
     operations\n",
  ));

  assert!(
    fuller.content.metrics.metadata >= sparse.content.metrics.metadata
  );
  assert!(
    fuller.content.metrics.structure >= sparse.content.metrics.structure
  );
  assert!(fuller.content.metrics.overall >= sparse.content.metrics.overall);
  assert!(
    fuller.format.compliance.front_matter
      >= sparse.format.compliance.front_matter
  );
}
