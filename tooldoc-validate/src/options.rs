//! Validation options.
//!
//! An immutable [`ValidationOptions`] value is constructed once per run by
//! the caller and passed into every validator; there is no process-wide
//! configuration state. Scoring weights are part of the options rather
//! than hardcoded constants, and stay stable for the run's duration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Weights for the content validator's overall quality score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
  pub structure: f64,
  pub content:   f64,
  pub examples:  f64,
  pub metadata:  f64,
}

impl Default for QualityWeights {
  fn default() -> Self {
    Self {
      structure: 0.30,
      content:   0.30,
      examples:  0.20,
      metadata:  0.20,
    }
  }
}

impl QualityWeights {
  /// Weighted average of the four category scores, normalized by the
  /// weight sum so degenerate weight sets still land in 0-100.
  #[must_use]
  pub fn overall(
    &self,
    structure: f64,
    content: f64,
    examples: f64,
    metadata: f64,
  ) -> f64 {
    let sum =
      self.structure + self.content + self.examples + self.metadata;
    if sum <= f64::EPSILON {
      return 0.0;
    }
    (structure * self.structure
      + content * self.content
      + examples * self.examples
      + metadata * self.metadata)
      / sum
  }
}

/// Weights for the format checker's overall compliance score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceWeights {
  pub front_matter:      f64,
  pub heading_structure: f64,
  pub template_format:   f64,
  pub standards:         f64,
}

impl Default for ComplianceWeights {
  fn default() -> Self {
    Self {
      front_matter:      0.30,
      heading_structure: 0.30,
      template_format:   0.20,
      standards:         0.20,
    }
  }
}

impl ComplianceWeights {
  /// Weighted average of the four category scores.
  #[must_use]
  pub fn overall(
    &self,
    front_matter: f64,
    heading_structure: f64,
    template_format: f64,
    standards: f64,
  ) -> f64 {
    let sum = self.front_matter
      + self.heading_structure
      + self.template_format
      + self.standards;
    if sum <= f64::EPSILON {
      return 0.0;
    }
    (front_matter * self.front_matter
      + heading_structure * self.heading_structure
      + template_format * self.template_format
      + standards * self.standards)
      / sum
  }
}

/// Options controlling what the validators check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
  /// Required front matter keys, in the order the template emits them.
  pub required_front_matter: Vec<String>,

  /// Inclusive character bounds for the `description` front matter value.
  pub description_min: usize,
  pub description_max: usize,

  /// Top-level section headings that must exist.
  pub required_sections: Vec<String>,

  /// Heading level of operation subsections.
  pub operation_heading_level: u8,

  /// Heading text that introduces an operation's example prompts.
  pub example_prompts_heading: String,

  /// Heading text that introduces an operation's parameter table.
  pub parameters_heading: String,

  /// Minimum number of example prompts per operation.
  pub min_example_prompts: usize,

  /// Minimum number of distinct prompt styles per operation.
  pub min_prompt_styles: usize,

  /// Required parameter table column schema, in order.
  pub parameter_table_columns: Vec<String>,

  /// Heading titles that must not appear at the operation heading level.
  pub forbidden_subheadings: Vec<String>,

  /// Required bullet list marker character.
  pub bullet_char: char,

  /// Section headings that must appear at most once per document.
  pub unique_sections: Vec<String>,

  /// Domain terms to scan for terminology drift, given in any casing;
  /// matching is case-insensitive.
  pub terms: Vec<String>,

  /// Disallowed branding substitutions: the key (matched
  /// case-insensitively) must never appear, the value names the required
  /// spelling.
  pub branding: IndexMap<String, String>,

  pub quality_weights:    QualityWeights,
  pub compliance_weights: ComplianceWeights,
}

impl Default for ValidationOptions {
  fn default() -> Self {
    Self {
      required_front_matter: vec![
        "title".into(),
        "description".into(),
        "topic".into(),
        "date".into(),
        "service".into(),
      ],
      description_min: 40,
      description_max: 160,
      required_sections: vec!["Available operations".into()],
      operation_heading_level: 3,
      example_prompts_heading: "Example prompts".into(),
      parameters_heading: "Parameters".into(),
      min_example_prompts: 5,
      min_prompt_styles: 2,
      parameter_table_columns: vec![
        "Parameter".into(),
        "Required".into(),
        "Description".into(),
      ],
      forbidden_subheadings: vec![
        "Parameters".into(),
        "Example prompts".into(),
      ],
      bullet_char: '-',
      unique_sections: vec!["See also".into()],
      terms: Vec::new(),
      branding: IndexMap::new(),
      quality_weights: QualityWeights::default(),
      compliance_weights: ComplianceWeights::default(),
    }
  }
}

/// Builder for constructing [`ValidationOptions`] with method chaining.
#[derive(Debug, Clone, Default)]
pub struct ValidationOptionsBuilder {
  options: ValidationOptions,
}

impl ValidationOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the required front matter keys.
  #[must_use]
  pub fn required_front_matter<I, S>(mut self, keys: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.options.required_front_matter =
      keys.into_iter().map(Into::into).collect();
    self
  }

  /// Set the description length bounds.
  #[must_use]
  pub const fn description_bounds(mut self, min: usize, max: usize) -> Self {
    self.options.description_min = min;
    self.options.description_max = max;
    self
  }

  /// Set the required top-level sections.
  #[must_use]
  pub fn required_sections<I, S>(mut self, sections: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.options.required_sections =
      sections.into_iter().map(Into::into).collect();
    self
  }

  /// Set the minimum example prompt count.
  #[must_use]
  pub const fn min_example_prompts(mut self, count: usize) -> Self {
    self.options.min_example_prompts = count;
    self
  }

  /// Set the minimum number of distinct prompt styles.
  #[must_use]
  pub const fn min_prompt_styles(mut self, count: usize) -> Self {
    self.options.min_prompt_styles = count;
    self
  }

  /// Set the domain terms scanned for drift.
  #[must_use]
  pub fn terms<I, S>(mut self, terms: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.options.terms = terms.into_iter().map(Into::into).collect();
    self
  }

  /// Add a disallowed branding substitution.
  #[must_use]
  pub fn branding(
    mut self,
    disallowed: impl Into<String>,
    required: impl Into<String>,
  ) -> Self {
    self
      .options
      .branding
      .insert(disallowed.into(), required.into());
    self
  }

  /// Set the quality score weights.
  #[must_use]
  pub const fn quality_weights(mut self, weights: QualityWeights) -> Self {
    self.options.quality_weights = weights;
    self
  }

  /// Set the compliance score weights.
  #[must_use]
  pub const fn compliance_weights(
    mut self,
    weights: ComplianceWeights,
  ) -> Self {
    self.options.compliance_weights = weights;
    self
  }

  /// Build the final [`ValidationOptions`].
  #[must_use]
  pub fn build(self) -> ValidationOptions {
    self.options
  }
}
