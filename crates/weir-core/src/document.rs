//! Grouping version snapshots into documents.
//!
//! One document exists per distinct issue number; its increments are
//! corrections within the issue. Draft snapshots are excluded before
//! grouping and never influence a document's interval or status.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
  context::LookupContext,
  dates,
  error::Result,
  interval::{Interval, min_end},
  legacy::{LicenceRecords, LicenceRow, VersionRow, VersionStatus},
  roles::{Role, document_roles},
};

/// Lifecycle state of a document, taken from its latest increment.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentStatus {
  Current,
  Superseded,
}

/// One continuously-identified issue of a licence over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub external_id: String,
  pub issue:       u32,
  pub interval:    Interval,
  pub status:      DocumentStatus,
  pub roles:       Vec<Role>,
}

/// Assemble every document for the licence, ordered by issue number.
pub fn assemble_documents(
  licence: &LicenceRow,
  licence_interval: &Interval,
  records: &LicenceRecords,
  ctx: &LookupContext,
) -> Result<Vec<Document>> {
  // Group non-draft snapshots by issue; BTreeMap keeps issue order stable.
  let mut by_issue: BTreeMap<u32, Vec<&VersionRow>> = BTreeMap::new();
  for version in records.versions.iter().filter(|v| !v.is_draft()) {
    by_issue.entry(version.issue).or_default().push(version);
  }

  let mut documents = Vec::with_capacity(by_issue.len());
  for (issue, mut group) in by_issue {
    group.sort_by_key(|v| v.increment);
    let (Some(first), Some(last)) = (group.first(), group.last()) else {
      continue;
    };

    // A document cannot outlive its parent licence.
    let interval = Interval::new(
      dates::parse_lenient(&first.start_date),
      min_end(dates::parse_lenient(&last.end_date), licence_interval.end),
    );
    let status = match last.status {
      VersionStatus::Current => DocumentStatus::Current,
      VersionStatus::Superseded => DocumentStatus::Superseded,
      // Drafts are filtered out before grouping; a draft-led group must
      // never surface as a document.
      VersionStatus::Draft => continue,
    };
    let roles = document_roles(
      &interval,
      &group,
      &records.charge_versions,
      &records.roles,
      ctx,
    )?;
    documents.push(Document {
      external_id: format!(
        "{}:{}:{}",
        licence.region, licence.licence_id, issue
      ),
      issue,
      interval,
      status,
      roles,
    });
  }
  Ok(documents)
}
