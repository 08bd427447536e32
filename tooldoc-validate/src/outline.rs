//! Section outline helpers.
//!
//! Validators and the prompt extractor both need to reason about the
//! document in terms of sections: the line span a heading governs, the
//! operation subsections under a required section, and the example-prompt
//! list attached to an operation. Deriving these once from the heading
//! tree keeps every consumer on the structural model instead of re-scanning
//! raw text.

use crate::{
  options::ValidationOptions,
  types::{Document, Heading, ListBlock, Table},
};

/// An inclusive line span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
  pub start: usize,
  pub end:   usize,
}

impl LineSpan {
  #[must_use]
  pub const fn contains(&self, line: usize) -> bool {
    line >= self.start && line <= self.end
  }
}

/// A heading together with the line span of the section it opens.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
  pub heading: &'a Heading,
  pub span:    LineSpan,
}

/// Compute the section span of every heading in source order. A section
/// runs from its heading to the line before the next heading of the same
/// or a shallower level, or the end of the document.
#[must_use]
pub fn sections(doc: &Document) -> Vec<Section<'_>> {
  let flat = doc.flat_headings();
  let last_line = doc.line_count().max(1);

  flat
    .iter()
    .enumerate()
    .map(|(index, heading)| {
      let end = flat[index + 1..]
        .iter()
        .find(|later| later.level <= heading.level)
        .map_or(last_line, |later| {
          later.location.line.saturating_sub(1)
        });
      Section {
        heading,
        span: LineSpan {
          start: heading.location.line,
          end:   end.max(heading.location.line),
        },
      }
    })
    .collect()
}

/// Find the section for a required top-level heading, matched
/// case-insensitively against the heading text.
#[must_use]
pub fn find_section<'a>(
  all: &[Section<'a>],
  title: &str,
) -> Option<Section<'a>> {
  all
    .iter()
    .find(|section| section.heading.text.eq_ignore_ascii_case(title))
    .copied()
}

/// Operation subsections: headings at the configured operation level that
/// fall inside the first required section's span.
#[must_use]
pub fn operation_sections<'a>(
  doc: &'a Document,
  options: &ValidationOptions,
) -> Vec<Section<'a>> {
  let all = sections(doc);
  let Some(parent) = options
    .required_sections
    .first()
    .and_then(|title| find_section(&all, title))
  else {
    return Vec::new();
  };

  all
    .iter()
    .filter(|section| {
      section.heading.level == options.operation_heading_level
        && section.heading.location.line > parent.span.start
        && parent.span.contains(section.heading.location.line)
    })
    .copied()
    .collect()
}

/// The example-prompt list of an operation section: the first list block
/// after the configured prompts heading within the section span.
#[must_use]
pub fn example_prompt_list<'a>(
  doc: &'a Document,
  operation: &Section<'_>,
  options: &ValidationOptions,
) -> Option<&'a ListBlock> {
  let prompts_heading = doc.flat_headings().into_iter().find(|heading| {
    heading.level > operation.heading.level
      && operation.span.contains(heading.location.line)
      && heading
        .text
        .eq_ignore_ascii_case(&options.example_prompts_heading)
  })?;

  doc
    .lists
    .iter()
    .filter(|list| {
      list.location.line > prompts_heading.location.line
        && operation.span.contains(list.location.line)
    })
    .min_by_key(|list| list.location.line)
}

/// The parameter table of an operation section: the first table after the
/// configured parameters heading within the section span. Sections without
/// that heading fall back to the first table in the span, so hand-written
/// pages that skip the subheading still resolve.
#[must_use]
pub fn parameter_table<'a>(
  doc: &'a Document,
  operation: &Section<'_>,
  options: &ValidationOptions,
) -> Option<&'a Table> {
  let after = doc
    .flat_headings()
    .into_iter()
    .find(|heading| {
      heading.level > operation.heading.level
        && operation.span.contains(heading.location.line)
        && heading.text.eq_ignore_ascii_case(&options.parameters_heading)
    })
    .map_or(operation.span.start, |heading| heading.location.line);

  doc
    .tables
    .iter()
    .filter(|table| {
      table.location.line > after
        && operation.span.contains(table.location.line)
    })
    .min_by_key(|table| table.location.line)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser;

  fn sample() -> Document {
    parser::parse(
      "a.md",
      "# Storage\n\n## Available operations\n\n### storage.accounts-list\
       \n\nLists accounts.\n\n#### Parameters\n\n| Parameter | Required | \
       Description |\n| - | - | - |\n| subscription | yes | Sub. |\n\n#### \
       Example prompts\n\n- What accounts exist?\n- List all accounts\n\n\
       ### storage.accounts-create\n\nCreates.\n\n## See also\n",
    )
  }

  #[test]
  fn spans_close_at_same_or_shallower_level() {
    let doc = sample();
    let all = sections(&doc);
    let ops = find_section(&all, "Available operations")
      .expect("section exists");
    let see_also =
      find_section(&all, "See also").expect("section exists");
    assert!(ops.span.end < see_also.span.start);
  }

  #[test]
  fn operations_are_found_under_required_section() {
    let doc = sample();
    let ops = operation_sections(&doc, &ValidationOptions::default());
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].heading.text, "storage.accounts-list");
  }

  #[test]
  fn prompt_list_and_parameter_table_are_attached_to_operation() {
    let doc = sample();
    let options = ValidationOptions::default();
    let ops = operation_sections(&doc, &options);

    let prompts = example_prompt_list(&doc, &ops[0], &options)
      .expect("prompt list exists");
    assert_eq!(prompts.items.len(), 2);

    let table =
      parameter_table(&doc, &ops[0], &options).expect("table exists");
    assert_eq!(table.header_row[0], "Parameter");

    assert!(example_prompt_list(&doc, &ops[1], &options).is_none());
    assert!(parameter_table(&doc, &ops[1], &options).is_none());
  }

  #[test]
  fn parameter_table_prefers_the_table_after_the_parameters_heading() {
    let doc = parser::parse(
      "a.md",
      "# Storage\n\n## Available operations\n\n### storage.accounts-list\
       \n\n| Alias | Target |\n| - | - |\n| ls | accounts-list |\n\n#### \
       Parameters\n\n| Parameter | Required | Description |\n| - | - | - \
       |\n| subscription | yes | Sub. |\n",
    );
    let options = ValidationOptions::default();
    let ops = operation_sections(&doc, &options);

    let table =
      parameter_table(&doc, &ops[0], &options).expect("table exists");
    assert_eq!(table.header_row[0], "Parameter");
  }
}
