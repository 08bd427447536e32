//! Consistency checker.
//!
//! Scans prose surface text for configured domain terms and detects
//! terminology and capitalization drift, both within one document and
//! across a corpus. Terminology variance alone is advisory (warnings),
//! since natural language varies legitimately; only disallowed branding
//! substitutions are promoted to errors.
//!
//! Cross-document canonicalization is deterministic: profiles are merged
//! in sorted document-id order, and the first document to use a term
//! establishes the corpus canonical form unless the catalog supplies a
//! canonical spelling, which always wins.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{ValidationContext, Validator};
use crate::{
  catalog::CommandCatalog,
  issue::{Issue, IssueCode, ValidationResult},
  types::{Document, Location},
  utils,
};

/// One observed surface form of a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermOccurrence {
  pub variant:  String,
  pub location: Location,
}

/// Per-document terminology profile: normalized term key to the observed
/// surface variants, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyProfile {
  pub doc_id: String,
  pub terms:  BTreeMap<String, Vec<TermOccurrence>>,
}

impl ConsistencyProfile {
  /// The first-seen surface form of a term in this document.
  #[must_use]
  pub fn first_variant(&self, key: &str) -> Option<&str> {
    self
      .terms
      .get(key)
      .and_then(|occurrences| occurrences.first())
      .map(|occurrence| occurrence.variant.as_str())
  }
}

/// Consistency checker output for one document.
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
  #[serde(flatten)]
  pub result:  ValidationResult,
  pub profile: ConsistencyProfile,
}

/// Cross-document consistency outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CrossConsistencyResult {
  #[serde(flatten)]
  pub result: ValidationResult,

  /// The canonical surface form chosen for each term key.
  pub canonical: BTreeMap<String, String>,
}

pub struct ConsistencyChecker;

impl ConsistencyChecker {
  /// Doc-local mode: build the terminology profile and flag in-document
  /// drift and branding violations.
  #[must_use]
  pub fn report(
    &self,
    doc: &Document,
    ctx: &ValidationContext<'_>,
  ) -> ConsistencyReport {
    let profile = build_profile(doc, &ctx.options.terms);
    let mut issues = Vec::new();

    for occurrences in profile.terms.values() {
      let Some(first) = occurrences.first() else {
        continue;
      };
      let mut flagged: Vec<&str> = Vec::new();
      for occurrence in &occurrences[1..] {
        if occurrence.variant != first.variant
          && !flagged.contains(&occurrence.variant.as_str())
        {
          flagged.push(&occurrence.variant);
          issues.push(
            Issue::new(
              IssueCode::TermVariance,
              format!(
                "`{}` varies from `{}` used first at {}",
                occurrence.variant, first.variant, first.location
              ),
            )
            .at(occurrence.location),
          );
        }
      }
    }

    issues.extend(branding_issues(doc, ctx));

    ConsistencyReport {
      result: ValidationResult::from_issues(issues),
      profile,
    }
  }

  /// Cross-document mode: merge profiles in sorted document-id order and
  /// flag every document whose variants differ from the corpus canonical
  /// form.
  ///
  /// `profiles` must already be sorted by document id; the engine
  /// guarantees this so repeated runs over the same corpus produce
  /// identical canonical choices.
  #[must_use]
  pub fn check_corpus(
    &self,
    profiles: &[ConsistencyProfile],
    catalog: &CommandCatalog,
  ) -> CrossConsistencyResult {
    let mut canonical: BTreeMap<String, String> = BTreeMap::new();
    for profile in profiles {
      for key in profile.terms.keys() {
        if canonical.contains_key(key) {
          continue;
        }
        let form = catalog.canonical_term(key).map_or_else(
          || profile.first_variant(key).unwrap_or_default().to_string(),
          ToString::to_string,
        );
        canonical.insert(key.clone(), form);
      }
    }

    let mut issues = Vec::new();
    for profile in profiles {
      for (key, occurrences) in &profile.terms {
        let Some(expected) = canonical.get(key) else {
          continue;
        };
        let mut flagged: Vec<&str> = Vec::new();
        for occurrence in occurrences {
          if occurrence.variant != *expected
            && !flagged.contains(&occurrence.variant.as_str())
          {
            flagged.push(&occurrence.variant);
            issues.push(
              Issue::new(
                IssueCode::CrossDocumentTermVariance,
                format!(
                  "`{}` differs from the corpus canonical form `{expected}`",
                  occurrence.variant
                ),
              )
              .in_doc(profile.doc_id.clone())
              .at(occurrence.location),
            );
          }
        }
      }
    }

    CrossConsistencyResult {
      result: ValidationResult::from_issues(issues),
      canonical,
    }
  }
}

impl Validator for ConsistencyChecker {
  fn name(&self) -> &'static str {
    "consistency"
  }

  fn validate(
    &self,
    doc: &Document,
    ctx: &ValidationContext<'_>,
  ) -> ValidationResult {
    self.report(doc, ctx).result
  }
}

/// Build the terminology profile for one document by scanning prose spans
/// for each configured term, case-insensitively and on word boundaries.
#[must_use]
pub fn build_profile(doc: &Document, terms: &[String]) -> ConsistencyProfile {
  let mut profile = ConsistencyProfile {
    doc_id: doc.id.clone(),
    terms:  BTreeMap::new(),
  };

  for term in terms {
    let key = utils::term_key(term);
    if key.is_empty() {
      continue;
    }
    for span in &doc.prose {
      for variant in find_variants(&span.text, &key) {
        profile
          .terms
          .entry(key.clone())
          .or_default()
          .push(TermOccurrence {
            variant,
            location: span.location,
          });
      }
    }
  }

  profile
}

/// Find all surface forms of `needle` (already lowercased) in `text`,
/// matching case-insensitively on word boundaries.
fn find_variants(text: &str, needle: &str) -> Vec<String> {
  let lowered = text.to_lowercase();
  // Case mapping can change byte lengths outside ASCII; slicing the
  // original text is guarded below so a mismatch degrades to a skip.
  let mut variants = Vec::new();

  for (start, matched) in lowered.match_indices(needle) {
    let end = start + matched.len();
    let bounded = !lowered[..start]
      .chars()
      .next_back()
      .is_some_and(char::is_alphanumeric)
      && !lowered[end..].chars().next().is_some_and(char::is_alphanumeric);
    if !bounded {
      continue;
    }
    if let Some(variant) = text.get(start..end) {
      variants.push(variant.to_string());
    }
  }

  variants
}

fn branding_issues(
  doc: &Document,
  ctx: &ValidationContext<'_>,
) -> Vec<Issue> {
  let mut issues = Vec::new();
  for (disallowed, required) in &ctx.options.branding {
    let needle = utils::term_key(disallowed);
    if needle.is_empty() {
      continue;
    }
    for span in &doc.prose {
      for variant in find_variants(&span.text, &needle) {
        issues.push(
          Issue::new(
            IssueCode::DisallowedBranding,
            format!("`{variant}` must be written as `{required}`"),
          )
          .at(span.location),
        );
      }
    }
  }
  issues
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{options::ValidationOptionsBuilder, parser};

  #[test]
  fn variants_are_found_on_word_boundaries() {
    assert_eq!(
      find_variants("Storage Account and storage account", "storage account"),
      vec!["Storage Account", "storage account"]
    );
    assert!(find_variants("restorage accounting", "storage account")
      .is_empty());
  }

  #[test]
  fn branding_violation_is_an_error() {
    let doc = parser::parse("a.md", "Use the Acme cloud for this.\n");
    let options = ValidationOptionsBuilder::new()
      .branding("acme cloud", "Acme Stack")
      .build();
    let catalog = CommandCatalog::default();
    let ctx = ValidationContext {
      catalog: &catalog,
      options: &options,
    };

    let report = ConsistencyChecker.report(&doc, &ctx);
    assert!(!report.result.is_valid);
    assert_eq!(
      report.result.errors[0].code,
      IssueCode::DisallowedBranding
    );
  }
}
