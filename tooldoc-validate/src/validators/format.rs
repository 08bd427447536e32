//! Format checker.
//!
//! Checks template and style compliance of one document: front matter key
//! presence and order, heading structure, parameter table schema, and
//! Markdown conventions. Hard rule violations (missing front matter
//! block, more than one H1, missing parameter table) are errors; style
//! deviations are warnings feeding the compliance breakdown.

use serde::Serialize;

use super::{Tally, ValidationContext, Validator};
use crate::{
  issue::{ComplianceMetrics, Issue, IssueCode, ValidationResult},
  outline,
  types::{AnomalyKind, Document},
};

/// Format checker output: the result plus the compliance breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct FormatReport {
  #[serde(flatten)]
  pub result:     ValidationResult,
  pub compliance: ComplianceMetrics,
}

pub struct FormatChecker;

impl FormatChecker {
  /// Run all format checks and compute the compliance metrics.
  #[must_use]
  pub fn report(
    &self,
    doc: &Document,
    ctx: &ValidationContext<'_>,
  ) -> FormatReport {
    let options = ctx.options;
    let mut issues = Vec::new();

    let mut front_matter = Tally::default();
    if doc.front_matter.is_empty() {
      front_matter.record(false);
      issues.push(Issue::new(
        IssueCode::MissingFrontMatter,
        "document has no front matter block",
      ));
    } else {
      for key in &options.required_front_matter {
        let present = doc.front_matter.contains_key(key);
        front_matter.record(present);
        if !present {
          issues.push(Issue::new(
            IssueCode::FrontMatterKeyAbsent,
            format!("front matter key `{key}` is absent"),
          ));
        }
      }

      // Required keys must appear in template order; extra keys may sit
      // anywhere.
      let actual: Vec<&String> = doc
        .front_matter
        .keys()
        .filter(|key| options.required_front_matter.contains(key))
        .collect();
      let expected: Vec<&String> = options
        .required_front_matter
        .iter()
        .filter(|key| doc.front_matter.contains_key(*key))
        .collect();
      let ordered = actual == expected;
      front_matter.record(ordered);
      if !ordered {
        issues.push(Issue::new(
          IssueCode::FrontMatterKeyOrder,
          format!(
            "front matter keys are out of template order, expected {}",
            options.required_front_matter.join(", ")
          ),
        ));
      }
    }

    for anomaly in &doc.anomalies {
      if anomaly.kind == AnomalyKind::FrontMatterSyntax {
        issues.push(
          Issue::new(IssueCode::FrontMatterSyntax, anomaly.message.clone())
            .at(anomaly.location),
        );
      }
    }

    let mut heading_structure = Tally::default();
    let flat = doc.flat_headings();

    let h1: Vec<_> =
      flat.iter().filter(|heading| heading.level == 1).collect();
    heading_structure.record(h1.len() <= 1);
    if h1.len() > 1 {
      issues.push(
        Issue::new(
          IssueCode::MultipleH1,
          format!("document has {} H1 headings, expected one", h1.len()),
        )
        .at(h1[1].location),
      );
    }

    let mut skipped = false;
    for anomaly in &doc.anomalies {
      match anomaly.kind {
        AnomalyKind::SkippedHeadingLevel => {
          skipped = true;
          issues.push(
            Issue::new(
              IssueCode::HeadingLevelSkip,
              anomaly.message.clone(),
            )
            .at(anomaly.location),
          );
        },
        AnomalyKind::EmptyHeading => {
          issues.push(
            Issue::new(IssueCode::EmptyHeading, anomaly.message.clone())
              .at(anomaly.location),
          );
        },
        AnomalyKind::FrontMatterSyntax => {},
      }
    }
    heading_structure.record(!skipped);

    let mut forbidden_found = false;
    for heading in &flat {
      if heading.level == options.operation_heading_level
        && options
          .forbidden_subheadings
          .iter()
          .any(|title| heading.text.eq_ignore_ascii_case(title))
      {
        forbidden_found = true;
        issues.push(
          Issue::new(
            IssueCode::ForbiddenSubheading,
            format!(
              "`{}` must not be a level-{} heading",
              heading.text, options.operation_heading_level
            ),
          )
          .at(heading.location),
        );
      }
    }
    heading_structure.record(!forbidden_found);

    let mut template_format = Tally::default();
    for operation in outline::operation_sections(doc, options) {
      match outline::parameter_table(doc, &operation, options) {
        None => {
          template_format.record(false);
          issues.push(
            Issue::new(
              IssueCode::MissingParameterTable,
              format!(
                "operation `{}` has no parameter table",
                operation.heading.text
              ),
            )
            .at(operation.heading.location),
          );
        },
        Some(table) => {
          let schema_ok = table.header_row.len()
            == options.parameter_table_columns.len()
            && table
              .header_row
              .iter()
              .zip(&options.parameter_table_columns)
              .all(|(actual, expected)| {
                actual.trim().eq_ignore_ascii_case(expected)
              });
          template_format.record(schema_ok);
          if !schema_ok {
            issues.push(
              Issue::new(
                IssueCode::ParameterTableSchema,
                format!(
                  "parameter table of `{}` deviates from the column \
                   schema {}",
                  operation.heading.text,
                  options.parameter_table_columns.join(" | ")
                ),
              )
              .at(table.location),
            );
          }
        },
      }
    }

    for title in &options.unique_sections {
      let occurrences: Vec<_> = flat
        .iter()
        .filter(|heading| heading.text.eq_ignore_ascii_case(title))
        .collect();
      template_format.record(occurrences.len() <= 1);
      if occurrences.len() > 1 {
        issues.push(
          Issue::new(
            IssueCode::DuplicateSection,
            format!("section `{title}` appears {} times", occurrences.len()),
          )
          .at(occurrences[1].location),
        );
      }
    }

    let mut standards = Tally::default();
    for list in &doc.lists {
      if list.ordered {
        continue;
      }
      let marker_ok =
        list.marker.is_none_or(|marker| marker == options.bullet_char);
      standards.record(marker_ok);
      if !marker_ok {
        issues.push(
          Issue::new(
            IssueCode::BulletStyle,
            format!(
              "bullet list uses `{}`, expected `{}`",
              list.marker.unwrap_or('?'),
              options.bullet_char
            ),
          )
          .at(list.location),
        );
      }
    }

    for span in &doc.code_spans {
      if span.is_fenced {
        let tagged = !span.info.is_empty();
        standards.record(tagged);
        if !tagged {
          issues.push(
            Issue::new(
              IssueCode::FenceLanguage,
              "fenced code block has no language tag",
            )
            .at(span.location),
          );
        }
      }
    }

    let tab_line = doc
      .raw_text
      .lines()
      .position(|line| line.contains('\t'))
      .map(|index| index + 1);
    standards.record(tab_line.is_none());
    if let Some(line) = tab_line {
      issues.push(
        Issue::new(IssueCode::HardTab, "document contains hard tabs")
          .at(crate::types::Location::new(line, 1)),
      );
    }

    let front_matter_score = front_matter.score();
    let heading_score = heading_structure.score();
    let template_score = template_format.score();
    let standards_score = standards.score();

    FormatReport {
      result:     ValidationResult::from_issues(issues),
      compliance: ComplianceMetrics {
        front_matter:      front_matter_score,
        heading_structure: heading_score,
        template_format:   template_score,
        standards:         standards_score,
        overall:           options.compliance_weights.overall(
          front_matter_score,
          heading_score,
          template_score,
          standards_score,
        ),
      },
    }
  }
}

impl Validator for FormatChecker {
  fn name(&self) -> &'static str {
    "format"
  }

  fn validate(
    &self,
    doc: &Document,
    ctx: &ValidationContext<'_>,
  ) -> ValidationResult {
    self.report(doc, ctx).result
  }
}
