//! Typed rows from the legacy register, as supplied by the caller.
//!
//! These are immutable inputs: the engine never mutates them, and every date
//! field stays a raw `String` in the register's own encoding until
//! [`crate::dates`] sees it. Each row carries the region code it was
//! extracted from, because identifiers are only unique per region.

use serde::{Deserialize, Serialize};

/// Role-type code on [`RoleRow`] meaning "send returns to this contact".
/// Other role codes exist in the register but are not migrated.
pub const RETURNS_TO_ROLE: &str = "RT";

/// The licence header row: identity plus the dates that bound its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenceRow {
  pub region:     String,
  pub licence_id: String,
  /// The public licence number, unique across regions.
  pub licence_number: String,
  pub original_effective_date: String,
  pub expiry_date: String,
  pub revoked_date: String,
  pub lapsed_date: String,
}

/// Review state of a version snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
  Current,
  Superseded,
  Draft,
}

/// One point-in-time snapshot of a licence. A new issue number is a new
/// document; a new increment is a correction within the same issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRow {
  pub region:     String,
  pub licence_id: String,
  pub issue:      u32,
  pub increment:  u32,
  pub status:     VersionStatus,
  pub start_date: String,
  pub end_date:   String,
  /// The party holding the licence over this snapshot.
  pub holder_party_id: String,
  /// The holder's service address over this snapshot.
  pub holder_address_id: String,
}

impl VersionRow {
  /// Draft snapshots never reach the target model.
  pub fn is_draft(&self) -> bool {
    self.status == VersionStatus::Draft
  }
}

/// One point-in-time snapshot of who is billed for the licence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeVersionRow {
  pub region:     String,
  pub licence_id: String,
  pub version:    u32,
  pub start_date: String,
  pub end_date:   String,
  pub invoice_account_number: String,
  /// The party the invoice account belongs to.
  pub billing_party_id: String,
}

/// A generic licence-role assignment. Only rows whose `role_code` is
/// [`RETURNS_TO_ROLE`] feed the returns-contact history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRow {
  pub region:     String,
  pub licence_id: String,
  pub role_code:  String,
  pub party_id:   String,
  pub address_id: String,
  pub start_date: String,
  pub end_date:   String,
}

/// A financial agreement attached to a charge record, pre-joined with its
/// parent's dates by the extraction query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeAgreementRow {
  pub region:     String,
  pub licence_id: String,
  /// Agreement code, e.g. `S127` (two-part tariff).
  pub code:       String,
  pub start_date: String,
  pub end_date:   String,
  /// Lifetime of the owning charge record; the agreement cannot outlive it.
  pub charge_start_date: String,
  pub charge_end_date:   String,
}

/// A statutory agreement recorded directly against the licence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenceAgreementRow {
  pub region:     String,
  pub licence_id: String,
  pub code:       String,
  pub start_date: String,
  pub end_date:   String,
}

/// An invoice (billing) account referenced by the licence's charge versions.
/// Accounts are not scoped to a single licence or document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceAccountRow {
  pub region:         String,
  pub account_number: String,
  pub party_id:       String,
}

/// One point-in-time billing-address assignment for an invoice account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountAddressRow {
  pub region:         String,
  pub account_number: String,
  pub address_id:     String,
  pub start_date:     String,
  pub end_date:       String,
}

/// Everything the register holds about one licence, fully materialised by
/// the caller before the engine runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenceRecords {
  pub licence:            LicenceRow,
  pub versions:           Vec<VersionRow>,
  pub charge_versions:    Vec<ChargeVersionRow>,
  pub roles:              Vec<RoleRow>,
  pub charge_agreements:  Vec<ChargeAgreementRow>,
  pub licence_agreements: Vec<LicenceAgreementRow>,
  pub invoice_accounts:   Vec<InvoiceAccountRow>,
  pub account_addresses:  Vec<AccountAddressRow>,
}
