//! Financial-agreement history for a licence.
//!
//! Charge-linked agreements are clipped to their parent charge record
//! *before* merging (an agreement cannot outlive the charge record that
//! carries it); statutory licence-level agreements come in with their own
//! dates. Identical `{code, start, end}` triples — the same agreement
//! surfacing through several charge records — are deduplicated before the
//! merge. Unlike role histories, a temporal gap keeps two same-code
//! agreements separate.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  dates,
  interval::Interval,
  legacy::{ChargeAgreementRow, LicenceAgreementRow},
  merge::{TemporalFact, merge_contiguous},
};

/// A financial agreement in force over an interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
  /// Agreement code, e.g. `S127`.
  pub code:     String,
  pub interval: Interval,
}

type Triple = (String, Option<NaiveDate>, Option<NaiveDate>);

/// Build the agreement history from both sources.
pub fn agreement_history(
  charge_agreements: &[ChargeAgreementRow],
  licence_agreements: &[LicenceAgreementRow],
) -> Vec<Agreement> {
  let mut triples: Vec<Triple> = Vec::new();
  for row in charge_agreements {
    let own = Interval::new(
      dates::parse_lenient(&row.start_date),
      dates::parse_lenient(&row.end_date),
    );
    let parent = Interval::new(
      dates::parse_lenient(&row.charge_start_date),
      dates::parse_lenient(&row.charge_end_date),
    );
    let clipped = own.clip(&parent);
    triples.push((row.code.clone(), clipped.start, clipped.end));
  }
  for row in licence_agreements {
    triples.push((
      row.code.clone(),
      dates::parse_lenient(&row.start_date),
      dates::parse_lenient(&row.end_date),
    ));
  }

  // Dedupe identical triples, keeping first-seen order.
  let mut seen: HashSet<Triple> = HashSet::new();
  triples.retain(|t| seen.insert(t.clone()));

  let facts = triples
    .into_iter()
    .map(|(code, start, end)| TemporalFact {
      interval: Interval::new(start, end),
      key:      code,
      payload:  (),
    })
    .collect();
  merge_contiguous(facts)
    .into_iter()
    .map(|run| Agreement { code: run.key, interval: run.interval })
    .collect()
}
