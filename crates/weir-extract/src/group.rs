//! Grouping flat extract tables into per-licence bundles.

use std::collections::{HashMap, HashSet};

use weir_core::{
  context::{
    Address, Company, CompanyKind, Contact, LookupContext, Party, RegionId,
  },
  legacy::LicenceRecords,
};

use crate::{
  AddressRow, Extract, PartyRow, PartyRowKind,
  error::{Error, Result},
};

/// The grouped extract: one bundle per licence, the resolved lookup context,
/// and a count of rows that referenced a licence (or account) absent from
/// the extract.
#[derive(Debug)]
pub struct GroupedExtract {
  pub records:     Vec<LicenceRecords>,
  pub context:     LookupContext,
  pub orphan_rows: usize,
}

pub(crate) fn group(extract: Extract) -> Result<GroupedExtract> {
  let mut orphans = 0usize;

  // Index bundles by the licence's region-scoped id, preserving input order.
  let mut order: Vec<RegionId> = Vec::with_capacity(extract.licences.len());
  let mut bundles: HashMap<RegionId, LicenceRecords> = HashMap::new();
  for licence in extract.licences {
    let id = RegionId::new(&licence.region, &licence.licence_id);
    if bundles.contains_key(&id) {
      return Err(Error::DuplicateLicence { external_id: id.to_string() });
    }
    order.push(id.clone());
    bundles.insert(id, LicenceRecords {
      licence,
      versions:           Vec::new(),
      charge_versions:    Vec::new(),
      roles:              Vec::new(),
      charge_agreements:  Vec::new(),
      licence_agreements: Vec::new(),
      invoice_accounts:   Vec::new(),
      account_addresses:  Vec::new(),
    });
  }

  for row in extract.versions {
    match bundles.get_mut(&RegionId::new(&row.region, &row.licence_id)) {
      Some(b) => b.versions.push(row),
      None => orphans += 1,
    }
  }
  for row in extract.charge_versions {
    match bundles.get_mut(&RegionId::new(&row.region, &row.licence_id)) {
      Some(b) => b.charge_versions.push(row),
      None => orphans += 1,
    }
  }
  for row in extract.roles {
    match bundles.get_mut(&RegionId::new(&row.region, &row.licence_id)) {
      Some(b) => b.roles.push(row),
      None => orphans += 1,
    }
  }
  for row in extract.charge_agreements {
    match bundles.get_mut(&RegionId::new(&row.region, &row.licence_id)) {
      Some(b) => b.charge_agreements.push(row),
      None => orphans += 1,
    }
  }
  for row in extract.licence_agreements {
    match bundles.get_mut(&RegionId::new(&row.region, &row.licence_id)) {
      Some(b) => b.licence_agreements.push(row),
      None => orphans += 1,
    }
  }

  // Invoice accounts attach through the charge versions that reference them.
  let mut account_owners: HashMap<RegionId, Vec<RegionId>> = HashMap::new();
  for (licence_id, bundle) in &bundles {
    for cv in &bundle.charge_versions {
      account_owners
        .entry(RegionId::new(&cv.region, &cv.invoice_account_number))
        .or_default()
        .push(licence_id.clone());
    }
  }
  for row in extract.invoice_accounts {
    let key = RegionId::new(&row.region, &row.account_number);
    match account_owners.get(&key) {
      Some(owners) => {
        let mut seen: HashSet<&RegionId> = HashSet::new();
        for owner in owners {
          if seen.insert(owner)
            && let Some(b) = bundles.get_mut(owner)
          {
            b.invoice_accounts.push(row.clone());
          }
        }
      }
      None => orphans += 1,
    }
  }
  for row in extract.account_addresses {
    let key = RegionId::new(&row.region, &row.account_number);
    match account_owners.get(&key) {
      Some(owners) => {
        let mut seen: HashSet<&RegionId> = HashSet::new();
        for owner in owners {
          if seen.insert(owner)
            && let Some(b) = bundles.get_mut(owner)
          {
            b.account_addresses.push(row.clone());
          }
        }
      }
      None => orphans += 1,
    }
  }

  // Resolve the party and address tables into the lookup context.
  let mut context = LookupContext::new();
  for row in extract.parties {
    let id = RegionId::new(&row.region, &row.party_id);
    context.insert_party(id, resolve_party(row));
  }
  for row in extract.addresses {
    let id = RegionId::new(&row.region, &row.address_id);
    context.insert_address(id, resolve_address(row));
  }

  let mut records = Vec::with_capacity(order.len());
  for id in order {
    if let Some(bundle) = bundles.remove(&id) {
      records.push(bundle);
    }
  }
  Ok(GroupedExtract { records, context, orphan_rows: orphans })
}

// ─── Row resolution ──────────────────────────────────────────────────────────

/// Map the register's `"null"` text sentinel (and blanks) to absent.
fn text(raw: &str) -> Option<String> {
  let raw = raw.trim();
  if raw.is_empty() || raw == "null" {
    None
  } else {
    Some(raw.to_string())
  }
}

fn resolve_party(row: PartyRow) -> Party {
  let external_id = RegionId::new(&row.region, &row.party_id).to_string();
  match row.kind {
    PartyRowKind::Organisation => Party {
      company: Company {
        external_id,
        name: row.name,
        kind: CompanyKind::Organisation,
      },
      contact: None,
    },
    PartyRowKind::Person => {
      // Display name is "Forename Surname" when a forename is recorded.
      let forename = text(&row.forename);
      let name = match &forename {
        Some(f) => format!("{f} {}", row.name),
        None => row.name.clone(),
      };
      Party {
        company: Company {
          external_id: external_id.clone(),
          name,
          kind: CompanyKind::Person,
        },
        contact: Some(Contact {
          external_id,
          salutation: text(&row.salutation),
          forename,
          surname: row.name,
        }),
      }
    }
  }
}

fn resolve_address(row: AddressRow) -> Address {
  Address {
    external_id: RegionId::new(&row.region, &row.address_id).to_string(),
    line_1:      row.line_1,
    line_2:      text(&row.line_2),
    town:        text(&row.town),
    county:      text(&row.county),
    postcode:    text(&row.postcode),
    country:     text(&row.country),
  }
}

#[cfg(test)]
mod tests {
  use weir_core::legacy::{LicenceRow, VersionRow, VersionStatus};

  use super::*;

  fn licence(region: &str, id: &str) -> LicenceRow {
    LicenceRow {
      region:     region.to_string(),
      licence_id: id.to_string(),
      licence_number: format!("{region}-{id}"),
      original_effective_date: "02/04/2015".to_string(),
      expiry_date: "null".to_string(),
      revoked_date: "null".to_string(),
      lapsed_date: "null".to_string(),
    }
  }

  fn version(region: &str, licence_id: &str) -> VersionRow {
    VersionRow {
      region:     region.to_string(),
      licence_id: licence_id.to_string(),
      issue:      1,
      increment:  1,
      status:     VersionStatus::Current,
      start_date: "02/04/2015".to_string(),
      end_date:   "null".to_string(),
      holder_party_id: "100".to_string(),
      holder_address_id: "7".to_string(),
    }
  }

  // ── Grouping ────────────────────────────────────────────────────────────

  #[test]
  fn rows_land_on_their_own_licence() {
    let grouped = group(Extract {
      licences: vec![licence("AN", "1"), licence("MD", "1")],
      versions: vec![version("MD", "1"), version("AN", "1")],
      ..Extract::default()
    })
    .unwrap();
    assert_eq!(grouped.records.len(), 2);
    // Same licence_id, different regions — no cross-talk.
    assert_eq!(grouped.records[0].versions.len(), 1);
    assert_eq!(grouped.records[0].versions[0].region, "AN");
    assert_eq!(grouped.records[1].versions[0].region, "MD");
  }

  #[test]
  fn rows_for_unknown_licences_are_counted_as_orphans() {
    let grouped = group(Extract {
      licences: vec![licence("AN", "1")],
      versions: vec![version("AN", "1"), version("AN", "2")],
      ..Extract::default()
    })
    .unwrap();
    assert_eq!(grouped.records[0].versions.len(), 1);
    assert_eq!(grouped.orphan_rows, 1);
  }

  #[test]
  fn duplicate_licence_rows_are_rejected() {
    let err = group(Extract {
      licences: vec![licence("AN", "1"), licence("AN", "1")],
      ..Extract::default()
    })
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateLicence { .. }));
  }

  // ── Party resolution ────────────────────────────────────────────────────

  #[test]
  fn person_party_yields_company_and_contact() {
    let party = resolve_party(PartyRow {
      region:     "AN".to_string(),
      party_id:   "200".to_string(),
      kind:       PartyRowKind::Person,
      name:       "Bloggs".to_string(),
      forename:   "Joe".to_string(),
      salutation: "null".to_string(),
    });
    assert_eq!(party.company.kind, CompanyKind::Person);
    assert_eq!(party.company.name, "Joe Bloggs");
    let contact = party.contact.unwrap();
    assert_eq!(contact.surname, "Bloggs");
    assert_eq!(contact.salutation, None);
  }

  #[test]
  fn organisation_party_has_no_contact() {
    let party = resolve_party(PartyRow {
      region:     "AN".to_string(),
      party_id:   "100".to_string(),
      kind:       PartyRowKind::Organisation,
      name:       "Fenland Farming Ltd".to_string(),
      forename:   "null".to_string(),
      salutation: "null".to_string(),
    });
    assert!(party.contact.is_none());
    assert_eq!(party.company.external_id, "AN:100");
  }

  // ── Address resolution ──────────────────────────────────────────────────

  #[test]
  fn address_sentinel_fields_become_absent() {
    let address = resolve_address(AddressRow {
      region:     "AN".to_string(),
      address_id: "7".to_string(),
      line_1:     "1 Fen Road".to_string(),
      line_2:     "null".to_string(),
      town:       "Ely".to_string(),
      county:     "".to_string(),
      postcode:   "CB6 1AA".to_string(),
      country:    "null".to_string(),
    });
    assert_eq!(address.line_2, None);
    assert_eq!(address.county, None);
    assert_eq!(address.town.as_deref(), Some("Ely"));
  }
}
