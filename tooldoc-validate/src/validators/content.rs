//! Content validator.
//!
//! Checks structural and metadata completeness of one document against
//! the catalog-driven template contract: required front matter, required
//! sections, and per-operation example prompts with enough count and
//! stylistic variety. Produces the weighted quality score; a low score
//! alone never invalidates a document, only errors do.

use serde::Serialize;

use super::{Tally, ValidationContext, Validator};
use crate::{
  issue::{Issue, IssueCode, QualityMetrics, ValidationResult},
  outline,
  types::Document,
};

/// Content validator output: the result plus the quality breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct ContentReport {
  #[serde(flatten)]
  pub result:  ValidationResult,
  pub metrics: QualityMetrics,
}

/// Stylistic class of one example prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PromptStyle {
  Question,
  Statement,
  Incomplete,
  Verbose,
}

const QUESTION_OPENERS: &[&str] = &[
  "what", "which", "how", "why", "where", "when", "who", "can", "could",
  "is", "are", "do", "does", "will",
];

fn classify_prompt(text: &str) -> PromptStyle {
  let trimmed = text.trim();
  let words = trimmed.split_whitespace().count();
  let first_word = trimmed
    .split_whitespace()
    .next()
    .map(str::to_lowercase)
    .unwrap_or_default();

  if trimmed.ends_with('?') || QUESTION_OPENERS.contains(&first_word.as_str())
  {
    PromptStyle::Question
  } else if words >= 12 {
    PromptStyle::Verbose
  } else if words <= 4 && !trimmed.ends_with('.') {
    PromptStyle::Incomplete
  } else {
    PromptStyle::Statement
  }
}

pub struct ContentValidator;

impl ContentValidator {
  /// Run all content checks and compute the quality metrics.
  #[must_use]
  pub fn report(
    &self,
    doc: &Document,
    ctx: &ValidationContext<'_>,
  ) -> ContentReport {
    let options = ctx.options;
    let mut issues = Vec::new();

    let mut metadata = Tally::default();
    for key in &options.required_front_matter {
      let present = doc
        .front_matter
        .get(key)
        .is_some_and(|value| !value.trim().is_empty());
      metadata.record(present);
      if !present {
        issues.push(Issue::new(
          IssueCode::MissingFrontMatterKey,
          format!("required front matter key `{key}` is missing or empty"),
        ));
      }
    }

    let mut content = Tally::default();
    if let Some(description) = doc
      .front_matter
      .get("description")
      .filter(|value| !value.trim().is_empty())
    {
      let length = description.trim().chars().count();
      if length < options.description_min {
        content.record(false);
        issues.push(Issue::new(
          IssueCode::DescriptionTooShort,
          format!(
            "description is {length} characters, expected at least {}",
            options.description_min
          ),
        ));
      } else if length > options.description_max {
        content.record(false);
        issues.push(Issue::new(
          IssueCode::DescriptionTooLong,
          format!(
            "description is {length} characters, expected at most {}",
            options.description_max
          ),
        ));
      } else {
        content.record(true);
      }
    }

    let mut structure = Tally::default();
    let all = outline::sections(doc);
    for title in &options.required_sections {
      let present = outline::find_section(&all, title).is_some();
      structure.record(present);
      if !present {
        issues.push(Issue::new(
          IssueCode::MissingRequiredSection,
          format!("required section `{title}` is missing"),
        ));
      }
    }

    let mut examples = Tally::default();
    for operation in outline::operation_sections(doc, options) {
      // An operation body should say something beyond its subheadings.
      content.record(doc.prose.iter().any(|span| {
        span.location.line > operation.span.start
          && operation.span.contains(span.location.line)
      }));

      match outline::example_prompt_list(doc, &operation, options) {
        None => {
          examples.record(false);
          issues.push(
            Issue::new(
              IssueCode::MissingExamplePrompts,
              format!(
                "operation `{}` has no example prompts block",
                operation.heading.text
              ),
            )
            .at(operation.heading.location),
          );
        },
        Some(list) => {
          let enough = list.items.len() >= options.min_example_prompts;
          examples.record(enough);
          if !enough {
            issues.push(
              Issue::new(
                IssueCode::InsufficientExamplePrompts,
                format!(
                  "operation `{}` lists {} example prompts, expected at \
                   least {}",
                  operation.heading.text,
                  list.items.len(),
                  options.min_example_prompts
                ),
              )
              .at(list.location),
            );
          }

          let mut styles: Vec<PromptStyle> = list
            .items
            .iter()
            .map(|item| classify_prompt(&item.text))
            .collect();
          styles.sort_unstable();
          styles.dedup();
          let varied = styles.len() >= options.min_prompt_styles;
          examples.record(varied);
          if !varied {
            issues.push(
              Issue::new(
                IssueCode::PromptVarietyLow,
                format!(
                  "operation `{}` uses {} prompt style(s), expected at \
                   least {} of question/statement/incomplete/verbose",
                  operation.heading.text,
                  styles.len(),
                  options.min_prompt_styles
                ),
              )
              .at(list.location),
            );
          }
        },
      }
    }

    let structure_score = structure.score();
    let content_score = content.score();
    let examples_score = examples.score();
    let metadata_score = metadata.score();

    ContentReport {
      result:  ValidationResult::from_issues(issues),
      metrics: QualityMetrics {
        structure: structure_score,
        content:   content_score,
        examples:  examples_score,
        metadata:  metadata_score,
        overall:   options.quality_weights.overall(
          structure_score,
          content_score,
          examples_score,
          metadata_score,
        ),
      },
    }
  }
}

impl Validator for ContentValidator {
  fn name(&self) -> &'static str {
    "content"
  }

  fn validate(
    &self,
    doc: &Document,
    ctx: &ValidationContext<'_>,
  ) -> ValidationResult {
    self.report(doc, ctx).result
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    catalog::CommandCatalog,
    options::ValidationOptions,
    parser,
  };

  fn report_for(content: &str) -> ContentReport {
    let catalog = CommandCatalog::from_entries([(
      "storage.accounts-list",
      vec!["subscription"],
    )]);
    let options = ValidationOptions::default();
    let ctx = ValidationContext {
      catalog: &catalog,
      options: &options,
    };
    ContentValidator.report(&parser::parse("a.md", content), &ctx)
  }

  #[test]
  fn operation_without_a_prompts_block_is_an_error() {
    let report = report_for(
      "# Storage\n\n## Available operations\n\n### storage.accounts-list\
       \n\nLists accounts.\n",
    );
    assert!(
      report
        .result
        .errors
        .iter()
        .any(|issue| issue.code == IssueCode::MissingExamplePrompts)
    );
    assert!(report.metrics.examples < 100.0);
  }

  #[test]
  fn sparse_single_style_prompt_list_fails_count_and_variety() {
    let report = report_for(
      "# Storage\n\n## Available operations\n\n### storage.accounts-list\
       \n\n#### Example prompts\n\n- List the accounts in my subscription \
       now.\n- Show the accounts in the subscription now.\n",
    );
    assert!(
      report
        .result
        .errors
        .iter()
        .any(|issue| issue.code == IssueCode::InsufficientExamplePrompts)
    );
    assert!(
      report
        .result
        .warnings
        .iter()
        .any(|issue| issue.code == IssueCode::PromptVarietyLow)
    );
  }

  #[test]
  fn full_varied_prompt_list_passes() {
    let report = report_for(
      "# Storage\n\n## Available operations\n\n### storage.accounts-list\
       \n\nLists accounts.\n\n#### Example prompts\n\n- What accounts \
       exist?\n- List every account in the subscription.\n- storage \
       accounts\n- Please enumerate every storage account provisioned \
       under the production subscription and include region\n- Can you \
       show the accounts?\n",
    );
    assert!(
      !report.result.errors.iter().any(|issue| {
        matches!(
          issue.code,
          IssueCode::MissingExamplePrompts
            | IssueCode::InsufficientExamplePrompts
        )
      })
    );
    assert!(
      !report
        .result
        .warnings
        .iter()
        .any(|issue| issue.code == IssueCode::PromptVarietyLow)
    );
  }

  #[test]
  fn prompt_styles_cover_the_configured_axes() {
    assert_eq!(
      classify_prompt("What accounts exist?"),
      PromptStyle::Question
    );
    assert_eq!(
      classify_prompt("List the storage accounts in my subscription."),
      PromptStyle::Statement
    );
    assert_eq!(classify_prompt("storage accounts"), PromptStyle::Incomplete);
    assert_eq!(
      classify_prompt(
        "Please enumerate every storage account currently provisioned \
         under the production subscription and include its region"
      ),
      PromptStyle::Verbose
    );
  }
}
