//! Validation engine: aggregation and the two-phase corpus pipeline.
//!
//! Phase 1 parses and validates each document independently; every
//! document gets a [`DocumentAnalysis`] no matter how malformed its
//! content is, which isolates faults to the offending document's own
//! result entry. Phase 2 runs only once phase 1 has completed for the
//! whole corpus: per-document indices and profiles are merged in sorted
//! document-id order and the cross-document branches of the consistency
//! and reference checkers run over the merged view.
//!
//! Cross-document results are never written back into per-document
//! results; single-document validation stays a pure, corpus-independent
//! operation.

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::{
  catalog::CommandCatalog,
  issue::{ComplianceMetrics, Issue, QualityMetrics, ValidationResult},
  options::ValidationOptions,
  parser,
  types::Document,
  validators::{
    ValidationContext,
    consistency::{ConsistencyChecker, ConsistencyReport},
    content::{ContentReport, ContentValidator},
    format::{FormatChecker, FormatReport},
    reference::{ReferenceReport, ReferenceValidator},
  },
};

/// One document as supplied by the caller.
#[derive(Debug, Clone)]
pub struct DocumentSource {
  pub id:      String,
  pub content: String,

  /// Optional substitute for the front matter found in the content.
  pub front_matter_override: Option<IndexMap<String, String>>,
}

impl DocumentSource {
  #[must_use]
  pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      content: content.into(),
      front_matter_override: None,
    }
  }
}

/// Phase-1 output for one document: the parsed model plus every
/// validator's report.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
  pub document:    Document,
  pub content:     ContentReport,
  pub format:      FormatReport,
  pub consistency: ConsistencyReport,
  pub references:  ReferenceReport,
}

impl DocumentAnalysis {
  /// The aggregated per-document view: errors and warnings unioned
  /// across the four validators, each validator's metrics block kept
  /// under its own key.
  #[must_use]
  pub fn merged(&self) -> DocumentReport {
    let mut result = ValidationResult::clean();
    result.absorb(self.content.result.clone());
    result.absorb(self.format.result.clone());
    result.absorb(self.consistency.result.clone());
    result.absorb(self.references.result.clone());

    let stamp = |mut issue: Issue| {
      if issue.doc_id.is_none() {
        issue.doc_id = Some(self.document.id.clone());
      }
      issue
    };
    result.errors = result.errors.into_iter().map(stamp).collect();
    result.warnings = result.warnings.into_iter().map(stamp).collect();

    DocumentReport {
      id: self.document.id.clone(),
      is_valid: result.is_valid,
      errors: result.errors,
      warnings: result.warnings,
      quality: self.content.metrics,
      compliance: self.format.compliance,
    }
  }
}

/// Aggregated per-document view across all four validators.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
  pub id:         String,
  pub is_valid:   bool,
  pub errors:     Vec<Issue>,
  pub warnings:   Vec<Issue>,
  pub quality:    QualityMetrics,
  pub compliance: ComplianceMetrics,
}

/// Aggregate counts for a corpus run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CrossDocumentSummary {
  pub total_issues:         usize,
  pub error_count:          usize,
  pub warning_count:        usize,
  pub validated_documents:  usize,
  pub validated_commands:   usize,
  pub validated_parameters: usize,
}

/// Outcome of the phase-2 cross-document checks, kept separate from the
/// per-document results.
#[derive(Debug, Clone, Serialize)]
pub struct CrossDocumentResult {
  pub is_valid: bool,
  pub errors:   Vec<Issue>,
  pub warnings: Vec<Issue>,
  pub summary:  CrossDocumentSummary,
}

/// The validation engine: an immutable catalog and options value plus the
/// statically-known set of validators.
pub struct ValidationEngine {
  options: ValidationOptions,
  catalog: CommandCatalog,

  content:     ContentValidator,
  format:      FormatChecker,
  consistency: ConsistencyChecker,
  references:  ReferenceValidator,
}

impl ValidationEngine {
  /// Create an engine for one run. The catalog must already have passed
  /// its structural precondition (see [`CommandCatalog::from_json`]).
  #[must_use]
  pub fn new(options: ValidationOptions, catalog: CommandCatalog) -> Self {
    Self {
      options,
      catalog,
      content: ContentValidator,
      format: FormatChecker,
      consistency: ConsistencyChecker,
      references: ReferenceValidator,
    }
  }

  #[must_use]
  pub const fn options(&self) -> &ValidationOptions {
    &self.options
  }

  #[must_use]
  pub const fn catalog(&self) -> &CommandCatalog {
    &self.catalog
  }

  /// Phase 1 for one document: parse and run every doc-local validator.
  ///
  /// This is a pure function over immutable inputs and never fails;
  /// malformed content degrades to issues inside the returned analysis.
  /// Callers may run it in parallel across documents.
  #[must_use]
  pub fn analyze(&self, source: &DocumentSource) -> DocumentAnalysis {
    let document = parser::parse_with_front_matter(
      &source.id,
      &source.content,
      source.front_matter_override.as_ref(),
    );
    let ctx = ValidationContext {
      catalog: &self.catalog,
      options: &self.options,
    };

    let analysis = DocumentAnalysis {
      content: self.content.report(&document, &ctx),
      format: self.format.report(&document, &ctx),
      consistency: self.consistency.report(&document, &ctx),
      references: self.references.report(&document, &ctx),
      document,
    };

    debug!(
      "analyzed {}: {} errors, {} warnings",
      analysis.document.id,
      analysis.merged().errors.len(),
      analysis.merged().warnings.len()
    );
    analysis
  }

  /// Phase 2: merge per-document indices and run the cross-document
  /// branches of the consistency and reference checkers.
  ///
  /// Analyses are sorted by document id internally, so merge order (and
  /// with it canonical-term tie-breaking) is deterministic regardless of
  /// the order phase 1 completed in.
  #[must_use]
  pub fn validate_corpus(
    &self,
    analyses: &[DocumentAnalysis],
  ) -> CrossDocumentResult {
    let mut sorted: Vec<&DocumentAnalysis> = analyses.iter().collect();
    sorted.sort_by(|a, b| a.document.id.cmp(&b.document.id));

    let profiles: Vec<_> = sorted
      .iter()
      .map(|analysis| analysis.consistency.profile.clone())
      .collect();
    let indices: Vec<_> = sorted
      .iter()
      .map(|analysis| analysis.references.index.clone())
      .collect();

    let cross_consistency =
      self.consistency.check_corpus(&profiles, &self.catalog);
    let cross_references = self.references.check_corpus(&indices);

    let mut result = ValidationResult::clean();
    result.absorb(cross_consistency.result);
    result.absorb(cross_references.result);

    let summary = CrossDocumentSummary {
      total_issues:         result.errors.len() + result.warnings.len(),
      error_count:          result.errors.len(),
      warning_count:        result.warnings.len(),
      validated_documents:  cross_references.validated_documents,
      validated_commands:   cross_references.validated_commands,
      validated_parameters: cross_references.validated_parameters,
    };

    debug!(
      "corpus validation: {} documents, {} commands, {} parameters, {} \
       issues",
      summary.validated_documents,
      summary.validated_commands,
      summary.validated_parameters,
      summary.total_issues
    );

    CrossDocumentResult {
      is_valid: result.is_valid,
      errors: result.errors,
      warnings: result.warnings,
      summary,
    }
  }

  /// Convenience for callers that do not manage the phases themselves:
  /// analyze every source, then run the corpus checks.
  #[must_use]
  pub fn run(
    &self,
    sources: &[DocumentSource],
  ) -> (Vec<DocumentAnalysis>, CrossDocumentResult) {
    let analyses: Vec<_> =
      sources.iter().map(|source| self.analyze(source)).collect();
    let cross = self.validate_corpus(&analyses);
    (analyses, cross)
  }
}
