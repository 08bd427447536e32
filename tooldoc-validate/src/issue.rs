//! Issues, severities, and validation results.
//!
//! Every check failure anywhere in the engine is captured as an [`Issue`]
//! inside the offending document's result; nothing throws across document
//! boundaries. Severity is a fixed property of the issue code, so the
//! taxonomy (structural errors, reference errors, format warnings,
//! consistency warnings) cannot drift between validators.

use serde::{Deserialize, Serialize};

use crate::types::Location;

/// Issue severity. Errors invalidate a result; warnings never do.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
  Warning,
  Error,
}

/// Stable machine-readable codes for every check the validators perform.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
  // Structural (content validator)
  MissingFrontMatterKey,
  DescriptionTooShort,
  DescriptionTooLong,
  MissingRequiredSection,
  MissingExamplePrompts,
  InsufficientExamplePrompts,
  PromptVarietyLow,

  // Template format (format checker)
  MissingFrontMatter,
  FrontMatterKeyAbsent,
  FrontMatterKeyOrder,
  MultipleH1,
  HeadingLevelSkip,
  ForbiddenSubheading,
  MissingParameterTable,
  ParameterTableSchema,
  BulletStyle,
  DuplicateSection,
  FenceLanguage,
  HardTab,
  FrontMatterSyntax,
  EmptyHeading,

  // Terminology (consistency checker)
  TermVariance,
  CrossDocumentTermVariance,
  DisallowedBranding,

  // References (reference validator)
  UnknownCommand,
  CommandLikeToken,
  UnresolvedAnchor,
  UnknownParameter,
  UnknownTargetDocument,
  UnresolvedCrossAnchor,
}

impl IssueCode {
  /// The fixed severity of this code.
  #[must_use]
  pub const fn severity(self) -> Severity {
    match self {
      Self::MissingFrontMatterKey
      | Self::MissingRequiredSection
      | Self::MissingExamplePrompts
      | Self::InsufficientExamplePrompts
      | Self::MissingFrontMatter
      | Self::MultipleH1
      | Self::MissingParameterTable
      | Self::DisallowedBranding
      | Self::UnknownCommand
      | Self::UnresolvedAnchor
      | Self::UnknownTargetDocument => Severity::Error,
      _ => Severity::Warning,
    }
  }
}

/// A single check failure, attributed to a document and location where
/// known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
  pub severity: Severity,
  pub code:     IssueCode,
  pub message:  String,

  /// Set for cross-document issues and aggregated per-document views;
  /// doc-local validators leave this empty.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub doc_id: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<Location>,
}

impl Issue {
  /// Create an issue; severity is derived from the code.
  #[must_use]
  pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
    Self {
      severity: code.severity(),
      code,
      message: message.into(),
      doc_id: None,
      location: None,
    }
  }

  /// Attach a source location.
  #[must_use]
  pub const fn at(mut self, location: Location) -> Self {
    self.location = Some(location);
    self
  }

  /// Attribute the issue to a document.
  #[must_use]
  pub fn in_doc(mut self, doc_id: impl Into<String>) -> Self {
    self.doc_id = Some(doc_id.into());
    self
  }
}

/// Outcome of a single validator run over one document.
///
/// Constructed through [`ValidationResult::from_issues`], which partitions
/// issues by severity, so `is_valid == errors.is_empty()` holds by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ValidationResult {
  pub is_valid: bool,
  pub errors:   Vec<Issue>,
  pub warnings: Vec<Issue>,
}

impl ValidationResult {
  /// Partition collected issues into a result.
  #[must_use]
  pub fn from_issues(issues: Vec<Issue>) -> Self {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for issue in issues {
      match issue.severity {
        Severity::Error => errors.push(issue),
        Severity::Warning => warnings.push(issue),
      }
    }

    Self {
      is_valid: errors.is_empty(),
      errors,
      warnings,
    }
  }

  /// A result with no issues.
  #[must_use]
  pub fn clean() -> Self {
    Self::from_issues(Vec::new())
  }

  /// Union another result into this one, preserving the validity
  /// invariant.
  pub fn absorb(&mut self, other: Self) {
    self.errors.extend(other.errors);
    self.warnings.extend(other.warnings);
    self.is_valid = self.errors.is_empty();
  }

  #[must_use]
  pub fn error_count(&self) -> usize {
    self.errors.len()
  }

  #[must_use]
  pub fn warning_count(&self) -> usize {
    self.warnings.len()
  }
}

/// Quality score breakdown produced by the content validator. All scores
/// are 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct QualityMetrics {
  pub structure: f64,
  pub content:   f64,
  pub examples:  f64,
  pub metadata:  f64,
  pub overall:   f64,
}

/// Compliance score breakdown produced by the format checker. All scores
/// are 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct ComplianceMetrics {
  pub front_matter:      f64,
  pub heading_structure: f64,
  pub template_format:   f64,
  pub standards:         f64,
  pub overall:           f64,
}
