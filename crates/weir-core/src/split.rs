//! Partitioning a parent interval by a set of runs.
//!
//! [`split`] walks the runs in order with a coverage cursor, clipping each to
//! the parent and synthesising gap segments where nothing covers a sub-span.
//! The returned segments, taken in order, exactly cover the parent — no
//! overlap, no omission — for *any* run set, including overlapping ones.
//! Callers that only want real coverage (the usual case for roles) drop the
//! gap segments afterwards.

use chrono::NaiveDate;

use crate::{
  interval::{Interval, cmp_start, max_start},
  merge::Run,
};

/// A clipped, parent-bounded slice of a run — or a gap, when `payload` is
/// `None`.
#[derive(Debug, Clone)]
pub struct Segment<P> {
  pub interval: Interval,
  pub payload:  Option<P>,
}

/// Partition `parent` by `runs` (already merged and ordered by the caller).
///
/// Runs disjoint from the parent contribute nothing. Where consecutive runs
/// overlap, the later run is clipped forward past the cursor, so earlier
/// runs win the overlapping days. Identity keys are no longer relevant at
/// this stage and are dropped.
pub fn split<K, P>(parent: &Interval, runs: Vec<Run<K, P>>) -> Vec<Segment<P>> {
  let mut segments: Vec<Segment<P>> = Vec::new();
  // The first uncovered day of the parent; `None` only while the parent's
  // unbounded-past side is still uncovered.
  let mut cursor = parent.start;
  let mut exhausted = false;

  for run in runs {
    if exhausted || run.interval.is_disjoint(parent) {
      continue;
    }
    let clipped = run.interval.clip(parent);
    let start = max_start(clipped.start, cursor);
    // Entirely behind the cursor: a previous run already covered it.
    if let (Some(s), Some(e)) = (start, clipped.end)
      && e < s
    {
      continue;
    }
    // Synthesise a gap for any uncovered span before this run.
    if cmp_start(cursor, start).is_lt()
      && let Some(gap_end) = start.and_then(|s| s.pred_opt())
    {
      segments.push(Segment {
        interval: Interval::new(cursor, Some(gap_end)),
        payload:  None,
      });
    }
    segments.push(Segment {
      interval: Interval::new(start, clipped.end),
      payload:  Some(run.payload),
    });
    match clipped.end {
      None => exhausted = true,
      Some(end) if parent.end == Some(end) => exhausted = true,
      Some(end) => match end.succ_opt() {
        Some(next) => cursor = Some(next),
        None => exhausted = true,
      },
    }
  }

  // Trailing gap out to the parent's end.
  if !exhausted && !trailing_gap_is_empty(cursor, parent.end) {
    segments.push(Segment {
      interval: Interval::new(cursor, parent.end),
      payload:  None,
    });
  }
  segments
}

fn trailing_gap_is_empty(
  cursor: Option<NaiveDate>,
  parent_end: Option<NaiveDate>,
) -> bool {
  matches!((cursor, parent_end), (Some(c), Some(e)) if c > e)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  fn run(start: &str, end: Option<&str>, payload: &str) -> Run<u8, String> {
    Run {
      interval: Interval::new(Some(d(start)), end.map(d)),
      key:      0,
      payload:  payload.to_string(),
    }
  }

  fn iv(start: Option<&str>, end: Option<&str>) -> Interval {
    Interval::new(start.map(d), end.map(d))
  }

  // ── Clipping against the parent ─────────────────────────────────────────

  #[test]
  fn billing_runs_clip_to_the_document_interval() {
    let parent = iv(Some("2016-04-01"), None);
    let segments = split(&parent, vec![
      run("2015-04-02", Some("2016-05-14"), "account-a"),
      run("2016-05-15", None, "account-b"),
    ]);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].interval, iv(Some("2016-04-01"), Some("2016-05-14")));
    assert_eq!(segments[0].payload.as_deref(), Some("account-a"));
    assert_eq!(segments[1].interval, iv(Some("2016-05-15"), None));
    assert_eq!(segments[1].payload.as_deref(), Some("account-b"));
  }

  #[test]
  fn disjoint_run_contributes_nothing() {
    let parent = iv(Some("2016-04-01"), Some("2016-12-31"));
    let segments = split(&parent, vec![
      run("2010-01-01", Some("2010-12-31"), "old"),
      run("2016-04-01", Some("2016-12-31"), "live"),
    ]);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].payload.as_deref(), Some("live"));
  }

  // ── Gap synthesis and partition completeness ────────────────────────────

  #[test]
  fn uncovered_spans_become_gap_segments() {
    let parent = iv(Some("2015-01-01"), Some("2015-12-31"));
    let segments = split(&parent, vec![
      run("2015-03-01", Some("2015-06-30"), "mid"),
    ]);
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].interval, iv(Some("2015-01-01"), Some("2015-02-28")));
    assert!(segments[0].payload.is_none());
    assert_eq!(segments[1].interval, iv(Some("2015-03-01"), Some("2015-06-30")));
    assert_eq!(segments[2].interval, iv(Some("2015-07-01"), Some("2015-12-31")));
    assert!(segments[2].payload.is_none());
  }

  #[test]
  fn no_runs_yields_one_gap_covering_the_parent() {
    let parent = iv(Some("2015-01-01"), None);
    let segments = split::<u8, String>(&parent, Vec::new());
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].interval, parent);
    assert!(segments[0].payload.is_none());
  }

  #[test]
  fn partition_is_contiguous_and_complete() {
    let parent = iv(Some("2015-01-01"), Some("2016-12-31"));
    let segments = split(&parent, vec![
      run("2015-02-01", Some("2015-05-31"), "a"),
      run("2015-09-01", Some("2016-03-31"), "b"),
    ]);
    // First segment starts at the parent start, last ends at the parent end,
    // and each segment starts the day after its predecessor ends.
    assert_eq!(segments.first().map(|s| s.interval.start), Some(parent.start));
    assert_eq!(segments.last().map(|s| s.interval.end), Some(parent.end));
    for pair in segments.windows(2) {
      let end = pair[0].interval.end.and_then(|e| e.succ_opt());
      assert_eq!(pair[1].interval.start, end);
    }
  }

  // ── Overlap handling ────────────────────────────────────────────────────

  #[test]
  fn overlapping_runs_are_clipped_forward() {
    let parent = iv(Some("2015-01-01"), None);
    let segments = split(&parent, vec![
      run("2015-01-01", Some("2015-06-30"), "a"),
      run("2015-04-01", Some("2015-12-31"), "b"),
    ]);
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].interval, iv(Some("2015-01-01"), Some("2015-06-30")));
    assert_eq!(segments[1].interval, iv(Some("2015-07-01"), Some("2015-12-31")));
    assert_eq!(segments[1].payload.as_deref(), Some("b"));
    assert!(segments[2].payload.is_none());
  }

  #[test]
  fn run_swallowed_by_an_earlier_run_is_dropped() {
    let parent = iv(Some("2015-01-01"), Some("2015-12-31"));
    let segments = split(&parent, vec![
      run("2015-01-01", None, "a"),
      run("2015-04-01", Some("2015-06-30"), "b"),
    ]);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].payload.as_deref(), Some("a"));
    assert_eq!(segments[0].interval, iv(Some("2015-01-01"), None));
  }

  // ── Open parent ─────────────────────────────────────────────────────────

  #[test]
  fn open_parent_passes_runs_through() {
    let segments = split(&Interval::open(), vec![
      run("2015-01-01", Some("2015-06-30"), "a"),
    ]);
    // Unbounded-past lead-in gap, the run, then an ongoing trailing gap.
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].interval, Interval::new(None, Some(d("2014-12-31"))));
    assert_eq!(segments[1].interval, iv(Some("2015-01-01"), Some("2015-06-30")));
    assert_eq!(segments[2].interval, Interval::new(Some(d("2015-07-01")), None));
  }
}
