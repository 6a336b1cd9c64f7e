//! Role histories for a document: holder, billing, returns contact.
//!
//! Three pipelines share the merge/split machinery but are deliberately kept
//! as separate named functions, because their ordering differs and must stay
//! different:
//!
//! - holder facts are clipped to the document interval *before* merging and
//!   never split afterwards;
//! - billing and returns-contact facts merge over their full legacy
//!   intervals first and are split against the document interval afterwards,
//!   with gap segments dropped.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
  context::{Address, Company, Contact, LookupContext},
  dates,
  error::Result,
  interval::Interval,
  legacy::{ChargeVersionRow, RETURNS_TO_ROLE, RoleRow, VersionRow},
  merge::{TemporalFact, merge},
  split::split,
};

// ─── Output type ─────────────────────────────────────────────────────────────

/// The kind of relationship a [`Role`] records.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoleKind {
  Holder,
  Billing,
  ReturnsContact,
}

/// A typed relationship between a document and a party/address/account,
/// valid over an interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
  pub kind:     RoleKind,
  pub interval: Interval,
  pub company:  Company,
  pub contact:  Option<Contact>,
  pub address:  Option<Address>,
  /// Invoice account number; only set on billing roles.
  pub invoice_account: Option<String>,
}

/// All three role histories for one document, concatenated in the fixed
/// order holder, billing, returns-contact.
pub fn document_roles(
  document: &Interval,
  versions: &[&VersionRow],
  charge_versions: &[ChargeVersionRow],
  role_rows: &[RoleRow],
  ctx: &LookupContext,
) -> Result<Vec<Role>> {
  let mut roles = holder_roles(document, versions, ctx)?;
  roles.extend(billing_roles(document, charge_versions, ctx)?);
  roles.extend(returns_contact_roles(document, role_rows, ctx)?);
  Ok(roles)
}

// ─── Holder (clip, then merge) ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct HolderKey {
  company: String,
  contact: Option<String>,
  address: String,
}

struct HolderPayload {
  company: Company,
  contact: Option<Contact>,
  address: Address,
}

/// One fact per version snapshot, clipped to the document interval at
/// construction time. Merged runs are the final history — no split pass.
pub fn holder_roles(
  document: &Interval,
  versions: &[&VersionRow],
  ctx: &LookupContext,
) -> Result<Vec<Role>> {
  let mut facts = Vec::with_capacity(versions.len());
  for version in versions {
    let party = ctx.party(&version.region, &version.holder_party_id)?;
    let address = ctx.address(&version.region, &version.holder_address_id)?;
    let interval = Interval::new(
      dates::parse_lenient(&version.start_date),
      dates::parse_lenient(&version.end_date),
    )
    .clip(document);
    facts.push(TemporalFact {
      interval,
      key: HolderKey {
        company: party.company.external_id.clone(),
        contact: party.contact.as_ref().map(|c| c.external_id.clone()),
        address: address.external_id.clone(),
      },
      payload: HolderPayload {
        company: party.company.clone(),
        contact: party.contact.clone(),
        address: address.clone(),
      },
    });
  }
  Ok(
    merge(facts)
      .into_iter()
      .map(|run| Role {
        kind:     RoleKind::Holder,
        interval: run.interval,
        company:  run.payload.company,
        contact:  run.payload.contact,
        address:  Some(run.payload.address),
        invoice_account: None,
      })
      .collect(),
  )
}

// ─── Billing (merge, then split) ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct BillingKey {
  account: String,
}

struct BillingPayload {
  account: String,
  company: Company,
}

/// One fact per charge version over its full legacy interval. Runs are split
/// against the document interval and gap segments dropped, so the history
/// covers exactly the billed part of the document's lifetime.
pub fn billing_roles(
  document: &Interval,
  charge_versions: &[ChargeVersionRow],
  ctx: &LookupContext,
) -> Result<Vec<Role>> {
  let mut facts = Vec::with_capacity(charge_versions.len());
  for cv in charge_versions {
    let party = ctx.party(&cv.region, &cv.billing_party_id)?;
    facts.push(TemporalFact {
      interval: Interval::new(
        dates::parse_lenient(&cv.start_date),
        dates::parse_lenient(&cv.end_date),
      ),
      key:      BillingKey { account: cv.invoice_account_number.clone() },
      payload:  BillingPayload {
        account: cv.invoice_account_number.clone(),
        company: party.company.clone(),
      },
    });
  }
  let segments = split(document, merge(facts));
  Ok(
    segments
      .into_iter()
      .filter_map(|segment| {
        segment.payload.map(|payload| Role {
          kind:     RoleKind::Billing,
          interval: segment.interval,
          company:  payload.company,
          contact:  None,
          address:  None,
          invoice_account: Some(payload.account),
        })
      })
      .collect(),
  )
}

// ─── Returns contact (filter, merge, then split) ─────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReturnsKey {
  party:   String,
  address: String,
}

struct ReturnsPayload {
  company: Company,
  contact: Option<Contact>,
  address: Address,
}

/// Role rows filtered to [`RETURNS_TO_ROLE`], then the same merge-then-split
/// pipeline as billing.
pub fn returns_contact_roles(
  document: &Interval,
  role_rows: &[RoleRow],
  ctx: &LookupContext,
) -> Result<Vec<Role>> {
  let mut facts = Vec::new();
  for row in role_rows.iter().filter(|r| r.role_code == RETURNS_TO_ROLE) {
    let party = ctx.party(&row.region, &row.party_id)?;
    let address = ctx.address(&row.region, &row.address_id)?;
    facts.push(TemporalFact {
      interval: Interval::new(
        dates::parse_lenient(&row.start_date),
        dates::parse_lenient(&row.end_date),
      ),
      key:      ReturnsKey {
        party:   party.company.external_id.clone(),
        address: address.external_id.clone(),
      },
      payload:  ReturnsPayload {
        company: party.company.clone(),
        contact: party.contact.clone(),
        address: address.clone(),
      },
    });
  }
  let segments = split(document, merge(facts));
  Ok(
    segments
      .into_iter()
      .filter_map(|segment| {
        segment.payload.map(|payload| Role {
          kind:     RoleKind::ReturnsContact,
          interval: segment.interval,
          company:  payload.company,
          contact:  payload.contact,
          address:  Some(payload.address),
          invoice_account: None,
        })
      })
      .collect(),
  )
}
