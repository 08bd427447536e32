//! Small shared helpers.

use regex::Regex;

/// Slugify a heading for use as an anchor ID.
/// Converts to lowercase, replaces non-alphanumeric characters with dashes,
/// and trims leading/trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
  text
    .to_lowercase()
    .replace(|c: char| !c.is_alphanumeric() && c != '-' && c != '_', "-")
    .trim_matches('-')
    .to_string()
}

/// Normalize a term to its case-insensitive comparison key.
#[must_use]
pub fn term_key(term: &str) -> String {
  term.trim().to_lowercase()
}

/// Create a regex that never matches anything.
///
/// Used as a fallback pattern when a static regex fails to compile. The
/// pattern asserts something impossible, which is safer than a trivial
/// pattern like `^$` that would match empty strings.
///
/// # Panics
///
/// Panics if the fallback pattern `r"^\b$"` fails to compile, which should
/// never happen.
#[must_use]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| {
    #[allow(
      clippy::unwrap_used,
      reason = "Both fallback patterns are statically valid"
    )]
    Regex::new(r"^\b$").unwrap()
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slugify_strips_punctuation_and_lowers() {
    assert_eq!(slugify("List Storage Accounts"), "list-storage-accounts");
    assert_eq!(slugify("  Weird -- Heading! "), "weird----heading");
    assert_eq!(slugify("already-slugged"), "already-slugged");
  }

  #[test]
  fn never_matching_regex_matches_nothing() {
    let re = never_matching_regex();
    assert!(!re.is_match(""));
    assert!(!re.is_match("anything at all"));
  }
}
