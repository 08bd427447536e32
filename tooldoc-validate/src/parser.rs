//! Markdown document parser.
//!
//! Turns raw Markdown plus optional front matter into the structural
//! [`Document`] model. The parser never fails: malformed constructs
//! degrade to best-effort partial structure and a recorded
//! [`ParseAnomaly`] that the format checker surfaces as a warning.
//!
//! Parsing is a pure function over the input text. Re-parsing identical
//! text always yields a structurally identical `Document`, which the
//! corpus pipeline relies on for reproducible cross-document results.

use std::collections::HashMap;

use comrak::{
  Arena,
  nodes::{AstNode, ListType, NodeValue},
  options::Options,
  parse_document,
};
use indexmap::IndexMap;
use log::trace;

use crate::{
  types::{
    AnomalyKind,
    CodeSpan,
    Document,
    Heading,
    Link,
    ListBlock,
    ListItem,
    Location,
    ParseAnomaly,
    Table,
    TextSpan,
  },
  utils,
};

/// Parse raw Markdown into a [`Document`].
#[must_use]
pub fn parse(id: &str, raw_text: &str) -> Document {
  parse_with_front_matter(id, raw_text, None)
}

/// Parse raw Markdown, optionally substituting the front matter mapping
/// instead of the one found in the text.
#[must_use]
pub fn parse_with_front_matter(
  id: &str,
  raw_text: &str,
  front_matter_override: Option<&IndexMap<String, String>>,
) -> Document {
  let arena = Arena::new();
  let options = comrak_options();
  let root = parse_document(&arena, raw_text, &options);

  let mut collector = Collector::default();
  collector.walk(root);

  let front_matter = front_matter_override.map_or_else(
    || {
      collector.front_matter_literal.as_deref().map_or_else(
        IndexMap::new,
        |literal| {
          parse_front_matter(
            literal,
            collector.front_matter_line,
            &mut collector.anomalies,
          )
        },
      )
    },
    Clone::clone,
  );

  let headings =
    build_heading_tree(collector.flat_headings, &mut collector.anomalies);

  trace!(
    "parsed document {id}: {} headings, {} tables, {} code spans, {} links, \
     {} anomalies",
    count_headings(&headings),
    collector.tables.len(),
    collector.code_spans.len(),
    collector.links.len(),
    collector.anomalies.len()
  );

  Document {
    id: id.to_string(),
    raw_text: raw_text.to_string(),
    front_matter,
    headings,
    tables: collector.tables,
    code_spans: collector.code_spans,
    links: collector.links,
    lists: collector.lists,
    prose: collector.prose,
    anomalies: collector.anomalies,
  }
}

/// Comrak options for the structural parse. Tables and front matter are
/// the only extensions the model needs.
fn comrak_options() -> Options<'static> {
  let mut options = Options::default();
  options.extension.table = true;
  options.extension.front_matter_delimiter = Some("---".to_string());
  options
}

#[derive(Default)]
struct Collector {
  front_matter_literal: Option<String>,
  front_matter_line:    usize,
  flat_headings:        Vec<Heading>,
  tables:               Vec<Table>,
  code_spans:           Vec<CodeSpan>,
  links:                Vec<Link>,
  lists:                Vec<ListBlock>,
  prose:                Vec<TextSpan>,
  anomalies:            Vec<ParseAnomaly>,
}

impl Collector {
  fn walk<'a>(&mut self, node: &'a AstNode<'a>) {
    let location = node_location(node);

    match &node.data.borrow().value {
      NodeValue::FrontMatter(literal) => {
        self.front_matter_literal = Some(literal.clone());
        self.front_matter_line = location.line;
      },
      NodeValue::Heading(heading) => {
        let text = inline_text(node, true);
        if text.trim().is_empty() {
          self.anomalies.push(ParseAnomaly {
            kind: AnomalyKind::EmptyHeading,
            message: format!(
              "heading at line {} has no extractable text",
              location.line
            ),
            location,
          });
        }
        self.flat_headings.push(Heading {
          level: heading.level,
          text: text.trim().to_string(),
          // Slugs are deduplicated once all headings are known.
          anchor_slug: String::new(),
          location,
          children: Vec::new(),
        });
        let prose = inline_text(node, false);
        if !prose.trim().is_empty() {
          self.prose.push(TextSpan {
            text: prose.trim().to_string(),
            location,
          });
        }
      },
      NodeValue::Table(_) => {
        self.tables.push(extract_table(node, location));
      },
      NodeValue::CodeBlock(block) => {
        self.code_spans.push(CodeSpan {
          text: block.literal.clone(),
          is_fenced: true,
          info: block.info.trim().to_string(),
          location,
        });
      },
      NodeValue::Code(code) => {
        self.code_spans.push(CodeSpan {
          text:      code.literal.clone(),
          is_fenced: false,
          info:      String::new(),
          location,
        });
      },
      NodeValue::Link(link) => {
        let target = link.url.clone();
        self.links.push(Link {
          display_text: inline_text(node, true),
          is_anchor: target.starts_with('#'),
          target,
          location,
        });
      },
      NodeValue::List(list) => {
        self.lists.push(extract_list(node, list.list_type, location));
      },
      NodeValue::Paragraph => {
        let text = inline_text(node, false);
        if !text.trim().is_empty() {
          self.prose.push(TextSpan {
            text: text.trim().to_string(),
            location,
          });
        }
      },
      _ => {},
    }

    for child in node.children() {
      self.walk(child);
    }
  }
}

fn node_location<'a>(node: &'a AstNode<'a>) -> Location {
  let sourcepos = node.data.borrow().sourcepos;
  Location::new(sourcepos.start.line, sourcepos.start.column)
}

/// Extract the flattened inline text of a node. When `include_code` is
/// false, inline code literals are skipped so the result is prose surface
/// text only.
fn inline_text<'a>(node: &'a AstNode<'a>, include_code: bool) -> String {
  let mut text = String::new();
  collect_inline_text(node, include_code, &mut text);
  text
}

fn collect_inline_text<'a>(
  node: &'a AstNode<'a>,
  include_code: bool,
  out: &mut String,
) {
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => out.push_str(t),
      NodeValue::Code(code) => {
        if include_code {
          out.push_str(&code.literal);
        }
      },
      NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
      NodeValue::Link(..)
      | NodeValue::Emph
      | NodeValue::Strong
      | NodeValue::Strikethrough
      | NodeValue::Superscript => {
        collect_inline_text(child, include_code, out);
      },
      NodeValue::HtmlInline(_) | NodeValue::Image(..) => {},
      _ => collect_inline_text(child, include_code, out),
    }
  }
}

fn extract_table<'a>(node: &'a AstNode<'a>, location: Location) -> Table {
  let mut header_row = Vec::new();
  let mut rows = Vec::new();

  for row in node.children() {
    if let NodeValue::TableRow(is_header) = &row.data.borrow().value {
      let cells: Vec<String> = row
        .children()
        .map(|cell| inline_text(cell, true).trim().to_string())
        .collect();
      if *is_header && header_row.is_empty() {
        header_row = cells;
      } else {
        rows.push(cells);
      }
    }
  }

  Table {
    header_row,
    rows,
    location,
  }
}

fn extract_list<'a>(
  node: &'a AstNode<'a>,
  list_type: ListType,
  location: Location,
) -> ListBlock {
  let ordered = list_type == ListType::Ordered;
  let mut marker = None;
  let mut items = Vec::new();

  for item in node.children() {
    let item_location = node_location(item);
    if let NodeValue::Item(item_list) = &item.data.borrow().value {
      if !ordered && marker.is_none() && item_list.bullet_char != 0 {
        marker = Some(char::from(item_list.bullet_char));
      }
    }

    // Item text is the text of its direct paragraphs; nested lists are
    // collected as their own blocks by the walker.
    let mut text = String::new();
    for child in item.children() {
      if matches!(child.data.borrow().value, NodeValue::Paragraph) {
        if !text.is_empty() {
          text.push(' ');
        }
        text.push_str(inline_text(child, true).trim());
      }
    }

    items.push(ListItem {
      text,
      location: item_location,
    });
  }

  ListBlock {
    ordered,
    marker,
    items,
    location,
  }
}

/// Parse the front matter literal (including its `---` delimiters) into an
/// ordered mapping of flat `key: value` lines. Lines that are not a
/// key/value pair are recorded as anomalies rather than failing the parse.
fn parse_front_matter(
  literal: &str,
  start_line: usize,
  anomalies: &mut Vec<ParseAnomaly>,
) -> IndexMap<String, String> {
  let mut mapping = IndexMap::new();

  for (offset, line) in literal.lines().enumerate() {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed == "---" {
      continue;
    }

    let location = Location::new(start_line + offset, 1);
    match trimmed.split_once(':') {
      Some((key, value)) if !key.trim().is_empty() => {
        mapping
          .insert(key.trim().to_string(), value.trim().to_string());
      },
      _ => {
        anomalies.push(ParseAnomaly {
          kind: AnomalyKind::FrontMatterSyntax,
          message: format!(
            "front matter line {} is not a `key: value` pair",
            location.line
          ),
          location,
        });
      },
    }
  }

  mapping
}

/// Assign deduplicated anchor slugs and fold the flat heading list into a
/// tree. A heading level that jumps deeper by more than one relative to
/// its nearest open ancestor is recorded as an anomaly, never rejected.
fn build_heading_tree(
  mut flat: Vec<Heading>,
  anomalies: &mut Vec<ParseAnomaly>,
) -> Vec<Heading> {
  let mut seen: HashMap<String, usize> = HashMap::new();
  for heading in &mut flat {
    let base = utils::slugify(&heading.text);
    let count = seen.entry(base.clone()).or_insert(0);
    heading.anchor_slug = if *count == 0 {
      base.clone()
    } else {
      format!("{base}-{count}")
    };
    *count += 1;
  }

  let mut roots: Vec<Heading> = Vec::new();
  let mut stack: Vec<Heading> = Vec::new();

  for heading in flat {
    while stack.last().is_some_and(|open| open.level >= heading.level) {
      if let Some(done) = stack.pop() {
        attach(&mut roots, &mut stack, done);
      }
    }

    let ancestor_level = stack.last().map_or(0, |open| open.level);
    if heading.level > ancestor_level + 1 {
      anomalies.push(ParseAnomaly {
        kind: AnomalyKind::SkippedHeadingLevel,
        message: format!(
          "heading level {} at line {} skips levels below its nearest \
           ancestor (level {ancestor_level})",
          heading.level, heading.location.line
        ),
        location: heading.location,
      });
    }

    stack.push(heading);
  }

  while let Some(done) = stack.pop() {
    attach(&mut roots, &mut stack, done);
  }

  roots
}

fn attach(roots: &mut Vec<Heading>, stack: &mut [Heading], done: Heading) {
  if let Some(parent) = stack.last_mut() {
    parent.children.push(done);
  } else {
    roots.push(done);
  }
}

fn count_headings(headings: &[Heading]) -> usize {
  headings
    .iter()
    .map(|heading| 1 + count_headings(&heading.children))
    .sum()
}
