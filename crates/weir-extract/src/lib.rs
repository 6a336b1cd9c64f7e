//! Legacy extract codec.
//!
//! The register is exported as one JSON document of flat row tables, raw
//! date strings preserved verbatim. This crate deserialises that document,
//! groups the rows into one [`LicenceRecords`] bundle per licence, and
//! resolves the party and address tables into the [`LookupContext`] the
//! engine wants. It performs no temporal logic of its own.

pub mod error;
mod group;

use serde::Deserialize;
use weir_core::legacy::{
  AccountAddressRow, ChargeAgreementRow, ChargeVersionRow, InvoiceAccountRow,
  LicenceAgreementRow, LicenceRecords, LicenceRow, RoleRow, VersionRow,
};

pub use error::{Error, Result};
pub use group::GroupedExtract;

// ─── Raw party / address tables ──────────────────────────────────────────────

/// Raw party row. Text fields use the same `"null"` sentinel as dates;
/// [`group`] maps it to absent during resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct PartyRow {
  pub region:   String,
  pub party_id: String,
  pub kind:     PartyRowKind,
  /// Surname for persons, registered name for organisations.
  pub name:       String,
  pub forename:   String,
  pub salutation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRowKind {
  Person,
  Organisation,
}

/// Raw address row, sentinel-laden like [`PartyRow`].
#[derive(Debug, Clone, Deserialize)]
pub struct AddressRow {
  pub region:     String,
  pub address_id: String,
  pub line_1:     String,
  pub line_2:     String,
  pub town:       String,
  pub county:     String,
  pub postcode:   String,
  pub country:    String,
}

// ─── The extract document ────────────────────────────────────────────────────

/// The deserialised extract: every table, still flat and unlinked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Extract {
  pub licences:           Vec<LicenceRow>,
  pub versions:           Vec<VersionRow>,
  pub charge_versions:    Vec<ChargeVersionRow>,
  pub roles:              Vec<RoleRow>,
  pub charge_agreements:  Vec<ChargeAgreementRow>,
  pub licence_agreements: Vec<LicenceAgreementRow>,
  pub invoice_accounts:   Vec<InvoiceAccountRow>,
  pub account_addresses:  Vec<AccountAddressRow>,
  pub parties:            Vec<PartyRow>,
  pub addresses:          Vec<AddressRow>,
}

/// Parse an extract document and group it per licence.
pub fn parse(input: &str) -> Result<GroupedExtract> {
  let extract: Extract = serde_json::from_str(input)?;
  group::group(extract)
}

/// Group an already-deserialised [`Extract`].
pub fn group(extract: Extract) -> Result<GroupedExtract> {
  group::group(extract)
}
