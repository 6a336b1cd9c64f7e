//! Company address history for a licence.
//!
//! Three narrower appliers of the merge machinery, concatenated in a fixed
//! order and never merged with each other:
//!
//! 1. licence-holder service addresses (one fact per version snapshot,
//!    identity = address, clipped to the licence interval);
//! 2. one ongoing segment per distinct billing-account address;
//! 3. returns-to addresses from the filtered role rows.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
  context::{Address, Company, LookupContext},
  dates,
  error::Result,
  interval::Interval,
  legacy::{LicenceRecords, RETURNS_TO_ROLE},
  merge::{TemporalFact, merge},
};

/// What a company used an address for.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AddressPurpose {
  LicenceHolder,
  Billing,
  ReturnsTo,
}

/// One span of a company's address history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAddress {
  pub purpose:  AddressPurpose,
  pub company:  Company,
  pub address:  Address,
  pub interval: Interval,
}

struct AddressPayload {
  company: Company,
  address: Address,
}

/// Build the full address history for one licence.
pub fn address_history(
  licence: &Interval,
  records: &LicenceRecords,
  ctx: &LookupContext,
) -> Result<Vec<CompanyAddress>> {
  let mut history = holder_addresses(licence, records, ctx)?;
  history.extend(billing_addresses(records, ctx)?);
  history.extend(returns_addresses(licence, records, ctx)?);
  Ok(history)
}

/// Holder service addresses: merge by address identity, intervals clipped to
/// the licence.
fn holder_addresses(
  licence: &Interval,
  records: &LicenceRecords,
  ctx: &LookupContext,
) -> Result<Vec<CompanyAddress>> {
  let mut facts = Vec::new();
  for version in records.versions.iter().filter(|v| !v.is_draft()) {
    let party = ctx.party(&version.region, &version.holder_party_id)?;
    let address = ctx.address(&version.region, &version.holder_address_id)?;
    let interval = Interval::new(
      dates::parse_lenient(&version.start_date),
      dates::parse_lenient(&version.end_date),
    )
    .clip(licence);
    facts.push(TemporalFact {
      interval,
      key: address.external_id.clone(),
      payload: AddressPayload {
        company: party.company.clone(),
        address: address.clone(),
      },
    });
  }
  Ok(
    merge(facts)
      .into_iter()
      .map(|run| CompanyAddress {
        purpose:  AddressPurpose::LicenceHolder,
        company:  run.payload.company,
        address:  run.payload.address,
        interval: run.interval,
      })
      .collect(),
  )
}

/// One ongoing segment per distinct billing-account address. The segment
/// starts when the account was first charged against — the earliest linked
/// charge version start — not when the address happened to be assigned.
fn billing_addresses(
  records: &LicenceRecords,
  ctx: &LookupContext,
) -> Result<Vec<CompanyAddress>> {
  let mut history = Vec::new();
  for account in &records.invoice_accounts {
    let party = ctx.party(&account.region, &account.party_id)?;
    let start = dates::earliest(
      records
        .charge_versions
        .iter()
        .filter(|cv| {
          cv.region == account.region
            && cv.invoice_account_number == account.account_number
        })
        .map(|cv| cv.start_date.as_str()),
    );
    let mut seen: HashSet<&str> = HashSet::new();
    for row in records
      .account_addresses
      .iter()
      .filter(|r| {
        r.region == account.region && r.account_number == account.account_number
      })
    {
      if !seen.insert(&row.address_id) {
        continue;
      }
      let address = ctx.address(&row.region, &row.address_id)?;
      history.push(CompanyAddress {
        purpose:  AddressPurpose::Billing,
        company:  party.company.clone(),
        address:  address.clone(),
        interval: Interval::new(start, None),
      });
    }
  }
  Ok(history)
}

/// Returns-to addresses: filtered role rows, merged by address identity,
/// clipped to the licence.
fn returns_addresses(
  licence: &Interval,
  records: &LicenceRecords,
  ctx: &LookupContext,
) -> Result<Vec<CompanyAddress>> {
  let mut facts = Vec::new();
  for row in records.roles.iter().filter(|r| r.role_code == RETURNS_TO_ROLE) {
    let party = ctx.party(&row.region, &row.party_id)?;
    let address = ctx.address(&row.region, &row.address_id)?;
    let interval = Interval::new(
      dates::parse_lenient(&row.start_date),
      dates::parse_lenient(&row.end_date),
    )
    .clip(licence);
    facts.push(TemporalFact {
      interval,
      key: address.external_id.clone(),
      payload: AddressPayload {
        company: party.company.clone(),
        address: address.clone(),
      },
    });
  }
  Ok(
    merge(facts)
      .into_iter()
      .map(|run| CompanyAddress {
        purpose:  AddressPurpose::ReturnsTo,
        company:  run.payload.company,
        address:  run.payload.address,
        interval: run.interval,
      })
      .collect(),
  )
}
