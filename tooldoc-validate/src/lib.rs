//! tooldoc-validate: documentation quality validation engine.
//!
//! Parses Markdown reference pages for a tool catalog into a structural
//! model and checks them with four cooperating validators:
//!
//! - **content**: structural/metadata completeness and quality scoring
//! - **format**: template and Markdown style compliance
//! - **consistency**: terminology and capitalization drift
//! - **references**: anchors, command and parameter tokens, cross-links
//!
//! Single-document validation is a pure function over immutable inputs.
//! Corpus validation is a two-phase pipeline: per-document analysis first,
//! then cross-document checks over indices merged in sorted document-id
//! order. The core performs no I/O; callers supply raw text and the
//! command catalog and consume the result objects.
//!
//! # Examples
//!
//! ```
//! use tooldoc_validate::{
//!   CommandCatalog,
//!   DocumentSource,
//!   ValidationEngine,
//!   ValidationOptions,
//! };
//!
//! let catalog =
//!   CommandCatalog::from_entries([("tool.op", vec!["subscription"])]);
//! let engine = ValidationEngine::new(ValidationOptions::default(), catalog);
//!
//! let source = DocumentSource::new("tool.md", "# Tool\n\nSee `tool.op`.\n");
//! let analysis = engine.analyze(&source);
//! assert!(analysis.references.result.is_valid);
//! ```

pub mod catalog;
pub mod engine;
pub mod issue;
pub mod options;
pub mod outline;
pub mod parser;
pub mod types;
pub mod utils;
pub mod validators;

pub use catalog::{CatalogEntry, CatalogError, CommandCatalog};
pub use engine::{
  CrossDocumentResult,
  CrossDocumentSummary,
  DocumentAnalysis,
  DocumentReport,
  DocumentSource,
  ValidationEngine,
};
pub use issue::{
  ComplianceMetrics,
  Issue,
  IssueCode,
  QualityMetrics,
  Severity,
  ValidationResult,
};
pub use options::{
  ComplianceWeights,
  QualityWeights,
  ValidationOptions,
  ValidationOptionsBuilder,
};
pub use types::Document;
pub use validators::{ValidationContext, Validator};
