//! Calendar-date intervals with open endpoints.
//!
//! `start = None` means unbounded in the past (rare, but legal); `end = None`
//! means ongoing, and sorts *greater* than any finite date everywhere on the
//! end side. The two sides therefore need separate min/max/cmp helpers — a
//! plain `Option` comparison would put `None` first on both.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A half-specified span of calendar days, inclusive on both ends.
///
/// Degenerate intervals (`start > end`) are representable and pass through
/// the engine uncorrected; they are a data-quality signal for the caller,
/// not something to silently repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
  pub start: Option<NaiveDate>,
  pub end:   Option<NaiveDate>,
}

impl Interval {
  pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
    Self { start, end }
  }

  /// Fully unbounded on both sides. Used as the parent when splitting
  /// histories that are not scoped to any document (invoice accounts).
  pub fn open() -> Self {
    Self { start: None, end: None }
  }

  /// Clamp both endpoints into `parent`. The result may be degenerate when
  /// the two intervals do not overlap; see [`Interval::is_disjoint`].
  pub fn clip(&self, parent: &Interval) -> Interval {
    Interval {
      start: max_start(self.start, parent.start),
      end:   min_end(self.end, parent.end),
    }
  }

  /// True when no day lies in both `self` and `other`.
  pub fn is_disjoint(&self, other: &Interval) -> bool {
    let start = max_start(self.start, other.start);
    let end = min_end(self.end, other.end);
    matches!((start, end), (Some(s), Some(e)) if s > e)
  }
}

// ─── End-side helpers (None = ongoing, later than anything) ──────────────────

/// The later of two end dates; ongoing (`None`) beats any finite date.
pub fn max_end(
  a: Option<NaiveDate>,
  b: Option<NaiveDate>,
) -> Option<NaiveDate> {
  match (a, b) {
    (None, _) | (_, None) => None,
    (Some(a), Some(b)) => Some(a.max(b)),
  }
}

/// The earlier of two end dates; any finite date beats ongoing (`None`).
pub fn min_end(
  a: Option<NaiveDate>,
  b: Option<NaiveDate>,
) -> Option<NaiveDate> {
  match (a, b) {
    (None, b) => b,
    (a, None) => a,
    (Some(a), Some(b)) => Some(a.min(b)),
  }
}

// ─── Start-side helpers (None = unbounded past, earlier than anything) ───────

/// The later of two start dates; any finite date beats unbounded (`None`).
pub fn max_start(
  a: Option<NaiveDate>,
  b: Option<NaiveDate>,
) -> Option<NaiveDate> {
  match (a, b) {
    (None, b) => b,
    (a, None) => a,
    (Some(a), Some(b)) => Some(a.max(b)),
  }
}

/// Order two start dates; unbounded-past (`None`) sorts first.
pub fn cmp_start(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
  match (a, b) {
    (None, None) => Ordering::Equal,
    (None, Some(_)) => Ordering::Less,
    (Some(_), None) => Ordering::Greater,
    (Some(a), Some(b)) => a.cmp(&b),
  }
}
