//! The four cooperating validators.
//!
//! Each validator implements the fixed [`Validator`] capability interface
//! over the structural document model. The engine holds a statically-known
//! set of them; there is no runtime plugin registry. Validators are pure
//! functions over `(document, context)` and never mutate shared state, so
//! callers may run them in parallel across documents.

pub mod consistency;
pub mod content;
pub mod format;
pub mod reference;

use crate::{
  catalog::CommandCatalog,
  issue::ValidationResult,
  options::ValidationOptions,
  types::Document,
};

/// Shared read-only context passed into every validator call.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
  pub catalog: &'a CommandCatalog,
  pub options: &'a ValidationOptions,
}

/// Uniform capability interface implemented by all four validators.
pub trait Validator {
  /// Short name used to key this validator's block in aggregated output.
  fn name(&self) -> &'static str;

  /// Run all doc-local checks and return the result.
  fn validate(
    &self,
    doc: &Document,
    ctx: &ValidationContext<'_>,
  ) -> ValidationResult;
}

/// Pass/fail bookkeeping for one score category. The score is the
/// fraction of checks passed, scaled to 0-100; a category with no
/// applicable checks scores 100.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Tally {
  passed: u32,
  total:  u32,
}

impl Tally {
  pub(crate) const fn record(&mut self, passed: bool) {
    self.total += 1;
    if passed {
      self.passed += 1;
    }
  }

  pub(crate) fn score(self) -> f64 {
    if self.total == 0 {
      100.0
    } else {
      f64::from(self.passed) / f64::from(self.total) * 100.0
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tally_score_is_monotone_in_passed_checks() {
    let mut fewer = Tally::default();
    let mut more = Tally::default();
    for i in 0..10 {
      fewer.record(i < 4);
      more.record(i < 7);
    }
    assert!(more.score() > fewer.score());
    assert_eq!(Tally::default().score(), 100.0);
  }
}
