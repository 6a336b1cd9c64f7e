//! The licence aggregate and its assembler — the engine's sole entry point.

use serde::{Deserialize, Serialize};

use crate::{
  addresses::{CompanyAddress, address_history},
  agreements::{Agreement, agreement_history},
  context::LookupContext,
  dates,
  document::{Document, assemble_documents},
  error::{Error, Result},
  interval::Interval,
  invoice_accounts::{InvoiceAccount, invoice_account_history},
  legacy::LicenceRecords,
};

/// The fully-assembled target aggregate for one licence. A pure computation
/// output: built fresh on every invocation, owned top-down, never mutated
/// after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Licence {
  /// The public licence number.
  pub number:      String,
  pub external_id: String,
  pub interval:    Interval,
  pub documents:   Vec<Document>,
  pub agreements:  Vec<Agreement>,
  pub addresses:   Vec<CompanyAddress>,
  pub invoice_accounts: Vec<InvoiceAccount>,
}

/// Assemble the aggregate for one licence from its legacy rows and the
/// caller-supplied lookup context.
///
/// The licence interval starts at the original effective date, falling back
/// to the earliest version start when that field is absent or malformed, and
/// ends at the earliest of the expiry, revocation and lapse dates (ongoing
/// when none is set). A licence with no usable start date at all cannot be
/// assembled.
pub fn assemble(
  records: &LicenceRecords,
  ctx: &LookupContext,
) -> Result<Licence> {
  let row = &records.licence;

  let start = dates::parse_lenient(&row.original_effective_date).or_else(|| {
    dates::earliest(
      records
        .versions
        .iter()
        .filter(|v| !v.is_draft())
        .map(|v| v.start_date.as_str()),
    )
  });
  let Some(start) = start else {
    return Err(Error::MissingStartDate {
      licence: row.licence_number.clone(),
    });
  };
  let end = dates::earliest([
    row.expiry_date.as_str(),
    row.revoked_date.as_str(),
    row.lapsed_date.as_str(),
  ]);
  let interval = Interval::new(Some(start), end);

  Ok(Licence {
    number: row.licence_number.clone(),
    external_id: format!("{}:{}", row.region, row.licence_id),
    interval,
    documents: assemble_documents(row, &interval, records, ctx)?,
    agreements: agreement_history(
      &records.charge_agreements,
      &records.licence_agreements,
    ),
    addresses: address_history(&interval, records, ctx)?,
    invoice_accounts: invoice_account_history(records, ctx)?,
  })
}
