//! Folding point-in-time facts into maximal runs.
//!
//! A fact carries the interval over which it was recorded, a typed identity
//! key deciding whether two facts are "the same thing", and an opaque payload
//! that survives into the run. Identity keys are ordinary structs with
//! derived `PartialEq`, so exactly the fields that participate in the
//! comparison are visible at the type.

use chrono::NaiveDate;

use crate::interval::{Interval, cmp_start, max_end};

/// A point-in-time legacy fact, ready to merge.
#[derive(Debug, Clone)]
pub struct TemporalFact<K, P> {
  pub interval: Interval,
  pub key:      K,
  pub payload:  P,
}

/// A maximal span over which the identity key stayed constant. The payload is
/// the first merged fact's payload.
#[derive(Debug, Clone)]
pub struct Run<K, P> {
  pub interval: Interval,
  pub key:      K,
  pub payload:  P,
}

/// Merge facts into runs: sort by interval start (stable, so ties keep input
/// order), then extend the last run whenever the next fact carries an equal
/// key, pushing its end out via [`max_end`] — never narrowing it.
///
/// A temporal gap between two same-key facts does *not* break the run; the
/// legacy register behaves this way and the behavior is preserved
/// deliberately. Use [`merge_contiguous`] where gaps must survive.
pub fn merge<K: PartialEq, P>(
  mut facts: Vec<TemporalFact<K, P>>,
) -> Vec<Run<K, P>> {
  facts.sort_by(|a, b| cmp_start(a.interval.start, b.interval.start));
  let mut runs: Vec<Run<K, P>> = Vec::new();
  for fact in facts {
    match runs.last_mut() {
      Some(last) if last.key == fact.key => {
        last.interval.end = max_end(last.interval.end, fact.interval.end);
      }
      _ => runs.push(Run {
        interval: fact.interval,
        key:      fact.key,
        payload:  fact.payload,
      }),
    }
  }
  runs
}

/// [`merge`], but a run only absorbs a same-key fact that starts on or before
/// the day after the run's current end. Same-key facts separated by a gap
/// stay separate runs. Agreements need this; role histories do not.
pub fn merge_contiguous<K: PartialEq, P>(
  mut facts: Vec<TemporalFact<K, P>>,
) -> Vec<Run<K, P>> {
  facts.sort_by(|a, b| cmp_start(a.interval.start, b.interval.start));
  let mut runs: Vec<Run<K, P>> = Vec::new();
  for fact in facts {
    match runs.last_mut() {
      Some(last)
        if last.key == fact.key
          && is_contiguous(last.interval.end, fact.interval.start) =>
      {
        last.interval.end = max_end(last.interval.end, fact.interval.end);
      }
      _ => runs.push(Run {
        interval: fact.interval,
        key:      fact.key,
        payload:  fact.payload,
      }),
    }
  }
  runs
}

/// True when a fact starting at `next_start` touches or overlaps a run ending
/// at `last_end`. An ongoing end absorbs everything after it; an unbounded
/// start precedes everything.
fn is_contiguous(
  last_end: Option<NaiveDate>,
  next_start: Option<NaiveDate>,
) -> bool {
  match (last_end, next_start) {
    (None, _) | (_, None) => true,
    (Some(end), Some(start)) => match end.succ_opt() {
      Some(next_day) => start <= next_day,
      // End of representable time; nothing can start later.
      None => true,
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  fn fact(
    start: &str,
    end: Option<&str>,
    key: &str,
  ) -> TemporalFact<String, String> {
    TemporalFact {
      interval: Interval::new(Some(d(start)), end.map(d)),
      key:      key.to_string(),
      payload:  key.to_string(),
    }
  }

  // ── Identity preservation ───────────────────────────────────────────────

  #[test]
  fn single_fact_is_a_single_run() {
    let runs = merge(vec![fact("2015-04-02", Some("2015-07-05"), "a")]);
    assert_eq!(runs.len(), 1);
    assert_eq!(
      runs[0].interval,
      Interval::new(Some(d("2015-04-02")), Some(d("2015-07-05")))
    );
    assert_eq!(runs[0].payload, "a");
  }

  // ── Adjacent merging ────────────────────────────────────────────────────

  #[test]
  fn adjacent_same_key_facts_merge_to_one_run() {
    let runs = merge(vec![
      fact("2015-04-02", Some("2015-07-05"), "a"),
      fact("2015-07-06", Some("2015-08-12"), "a"),
    ]);
    assert_eq!(runs.len(), 1);
    assert_eq!(
      runs[0].interval,
      Interval::new(Some(d("2015-04-02")), Some(d("2015-08-12")))
    );
  }

  #[test]
  fn key_change_starts_a_new_run() {
    let runs = merge(vec![
      fact("2015-04-02", Some("2016-05-14"), "a"),
      fact("2016-05-15", None, "b"),
    ]);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].key, "a");
    assert_eq!(runs[1].key, "b");
    assert_eq!(runs[1].interval.end, None);
  }

  #[test]
  fn merge_never_narrows_the_end() {
    // Second fact ends earlier than the run already does.
    let runs = merge(vec![
      fact("2015-01-01", Some("2015-12-31"), "a"),
      fact("2015-03-01", Some("2015-06-30"), "a"),
    ]);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].interval.end, Some(d("2015-12-31")));
  }

  #[test]
  fn ongoing_end_dominates_when_extending() {
    let runs = merge(vec![
      fact("2015-01-01", None, "a"),
      fact("2015-03-01", Some("2015-06-30"), "a"),
    ]);
    assert_eq!(runs[0].interval.end, None);
  }

  // ── Gap behavior ────────────────────────────────────────────────────────

  #[test]
  fn same_key_facts_merge_across_a_gap() {
    // Legacy quirk, preserved: merging is driven by key equality and sort
    // order alone, not contiguity.
    let runs = merge(vec![
      fact("2015-04-02", Some("2015-08-12"), "a"),
      fact("2017-07-01", None, "a"),
    ]);
    assert_eq!(runs.len(), 1);
    assert_eq!(
      runs[0].interval,
      Interval::new(Some(d("2015-04-02")), None)
    );
  }

  #[test]
  fn contiguous_merge_preserves_gaps() {
    let runs = merge_contiguous(vec![
      fact("2015-04-02", Some("2015-07-05"), "a"),
      fact("2015-07-06", Some("2015-08-12"), "a"),
      fact("2017-07-01", None, "a"),
    ]);
    assert_eq!(runs.len(), 2);
    assert_eq!(
      runs[0].interval,
      Interval::new(Some(d("2015-04-02")), Some(d("2015-08-12")))
    );
    assert_eq!(runs[1].interval, Interval::new(Some(d("2017-07-01")), None));
  }

  // ── Determinism ─────────────────────────────────────────────────────────

  #[test]
  fn equal_starts_keep_input_order() {
    let runs = merge(vec![
      fact("2015-04-02", Some("2015-07-05"), "first"),
      fact("2015-04-02", Some("2015-07-05"), "second"),
    ]);
    assert_eq!(runs[0].key, "first");
    assert_eq!(runs[1].key, "second");
  }

  #[test]
  fn merge_is_idempotent() {
    let facts = vec![
      fact("2015-04-02", Some("2015-07-05"), "a"),
      fact("2015-07-06", Some("2015-08-12"), "a"),
      fact("2016-01-01", None, "b"),
    ];
    let once = merge(facts);
    let again = merge(
      once
        .iter()
        .map(|r| TemporalFact {
          interval: r.interval,
          key:      r.key.clone(),
          payload:  r.payload.clone(),
        })
        .collect(),
    );
    assert_eq!(once.len(), again.len());
    for (a, b) in once.iter().zip(again.iter()) {
      assert_eq!(a.interval, b.interval);
      assert_eq!(a.key, b.key);
    }
  }
}
