//! Structural document model.
//!
//! A [`Document`] is produced once by the parser from raw Markdown and is
//! immutable afterwards. Every validator queries this structure instead of
//! re-scanning the raw text, so the model carries everything the validators
//! need: the heading tree, tables, code spans, links, list blocks, prose
//! spans, and any anomalies the parser recorded while degrading gracefully
//! on malformed input.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A position in the source text. Lines and columns are 1-based, matching
/// comrak's source positions.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Location {
  pub line:   usize,
  pub column: usize,
}

impl Location {
  #[must_use]
  pub const fn new(line: usize, column: usize) -> Self {
    Self { line, column }
  }
}

impl std::fmt::Display for Location {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}", self.line, self.column)
  }
}

/// A parsed Markdown document.
///
/// All structural fields are derived purely from `raw_text`; re-parsing
/// identical text yields a structurally identical `Document`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
  /// Caller-supplied identifier, typically the file name.
  pub id: String,

  /// The raw Markdown source the document was parsed from.
  pub raw_text: String,

  /// Front matter key/value pairs in source order. Empty when the document
  /// has no front matter block.
  pub front_matter: IndexMap<String, String>,

  /// Root headings of the heading tree, in source order.
  pub headings: Vec<Heading>,

  /// All tables in source order.
  pub tables: Vec<Table>,

  /// Inline and fenced code spans in source order.
  pub code_spans: Vec<CodeSpan>,

  /// All links in source order.
  pub links: Vec<Link>,

  /// Bullet and ordered list blocks in source order.
  pub lists: Vec<ListBlock>,

  /// Prose surface text (headings and paragraphs, inline code excluded),
  /// used for terminology scanning.
  pub prose: Vec<TextSpan>,

  /// Degradations recorded while parsing malformed constructs.
  pub anomalies: Vec<ParseAnomaly>,
}

impl Document {
  /// All headings flattened in source order.
  #[must_use]
  pub fn flat_headings(&self) -> Vec<&Heading> {
    fn collect<'a>(headings: &'a [Heading], out: &mut Vec<&'a Heading>) {
      for heading in headings {
        out.push(heading);
        collect(&heading.children, out);
      }
    }

    let mut out = Vec::new();
    collect(&self.headings, &mut out);
    out
  }

  /// Whether `slug` names a heading anchor in this document.
  #[must_use]
  pub fn has_anchor(&self, slug: &str) -> bool {
    self
      .flat_headings()
      .iter()
      .any(|heading| heading.anchor_slug == slug)
  }

  /// Number of lines in the raw source.
  #[must_use]
  pub fn line_count(&self) -> usize {
    self.raw_text.lines().count()
  }
}

/// A heading and the subtree of deeper headings it opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
  /// Heading level, 1 through 6.
  pub level: u8,

  /// Inline text of the heading, with formatting stripped.
  pub text: String,

  /// Deterministic anchor slug, unique within the document. Duplicate
  /// heading texts get `-1`, `-2` suffixes, matching common renderer
  /// behavior.
  pub anchor_slug: String,

  pub location: Location,

  /// Headings nested under this one.
  pub children: Vec<Heading>,
}

/// A Markdown table. The first source row is the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
  pub header_row: Vec<String>,
  pub rows:       Vec<Vec<String>>,
  pub location:   Location,
}

/// An inline code span or fenced code block, extracted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSpan {
  pub text:      String,
  pub is_fenced: bool,

  /// Info string of a fenced block (the language tag), empty for inline
  /// spans and untagged fences.
  pub info: String,

  pub location: Location,
}

/// A Markdown link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
  pub display_text: String,
  pub target:       String,

  /// Whether the target is a same-document anchor (`#slug`).
  pub is_anchor: bool,

  pub location: Location,
}

/// A bullet or ordered list block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListBlock {
  pub ordered: bool,

  /// Bullet marker character (`-`, `*`, or `+`); `None` for ordered lists.
  pub marker: Option<char>,

  pub items:    Vec<ListItem>,
  pub location: Location,
}

/// A single list item with its inline text flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
  pub text:     String,
  pub location: Location,
}

/// A span of prose surface text (one heading or paragraph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSpan {
  pub text:     String,
  pub location: Location,
}

/// Kinds of parse degradation the parser records instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
  /// A heading level jumped deeper by more than one relative to its
  /// nearest open ancestor.
  SkippedHeadingLevel,

  /// A front matter line was not a `key: value` pair.
  FrontMatterSyntax,

  /// A heading with no extractable text.
  EmptyHeading,
}

/// A recorded parse degradation. Downstream validators may surface these
/// as warnings; the parser itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseAnomaly {
  pub kind:     AnomalyKind,
  pub message:  String,
  pub location: Location,
}
