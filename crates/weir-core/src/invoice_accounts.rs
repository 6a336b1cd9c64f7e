//! Billing-address history per invoice account.
//!
//! Accounts are a hard partition by account number, independent of any date:
//! each account's address assignments are merged and then split against a
//! fully open parent, because invoice accounts are not scoped to a single
//! document (or even a single licence). Gap segments are dropped — an
//! account simply has no billing address over an uncovered span.

use serde::{Deserialize, Serialize};

use crate::{
  context::{Address, Company, LookupContext},
  dates,
  error::Result,
  interval::Interval,
  legacy::LicenceRecords,
  merge::{TemporalFact, merge},
  split::split,
};

/// One span of an account's billing-address history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceAccountAddress {
  pub address:  Address,
  pub interval: Interval,
}

/// An invoice account with its owning company and address history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceAccount {
  pub account_number: String,
  pub company:        Company,
  pub addresses:      Vec<InvoiceAccountAddress>,
}

/// Build every invoice account referenced by the licence, in input order.
pub fn invoice_account_history(
  records: &LicenceRecords,
  ctx: &LookupContext,
) -> Result<Vec<InvoiceAccount>> {
  let mut accounts = Vec::with_capacity(records.invoice_accounts.len());
  for account in &records.invoice_accounts {
    let party = ctx.party(&account.region, &account.party_id)?;
    let mut facts = Vec::new();
    for row in records.account_addresses.iter().filter(|r| {
      r.region == account.region && r.account_number == account.account_number
    }) {
      let address = ctx.address(&row.region, &row.address_id)?;
      facts.push(TemporalFact {
        interval: Interval::new(
          dates::parse_lenient(&row.start_date),
          dates::parse_lenient(&row.end_date),
        ),
        key:      address.external_id.clone(),
        payload:  address.clone(),
      });
    }
    let segments = split(&Interval::open(), merge(facts));
    accounts.push(InvoiceAccount {
      account_number: account.account_number.clone(),
      company:        party.company.clone(),
      addresses:      segments
        .into_iter()
        .filter_map(|segment| {
          segment.payload.map(|address| InvoiceAccountAddress {
            address,
            interval: segment.interval,
          })
        })
        .collect(),
    });
  }
  Ok(accounts)
}
