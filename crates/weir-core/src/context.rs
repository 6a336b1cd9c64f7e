//! The caller-supplied lookup context.
//!
//! Legacy rows reference parties and addresses by region-scoped id; the
//! caller resolves those tables up front and hands the engine this context.
//! A miss is fatal for the licence under assembly — the engine never issues
//! its own data fetches.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ─── Region-scoped identity ──────────────────────────────────────────────────

/// A legacy identifier qualified by its region code. Identifiers repeat
/// across regions, so the pair is the real key; its display form
/// (`region:id`) doubles as the external id on target entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId {
  pub region: String,
  pub id:     String,
}

impl RegionId {
  pub fn new(region: &str, id: &str) -> Self {
    Self { region: region.to_string(), id: id.to_string() }
  }
}

impl fmt::Display for RegionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.region, self.id)
  }
}

// ─── Resolved target entities ────────────────────────────────────────────────

/// Whether a company stands for a human or an organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyKind {
  Person,
  Organisation,
}

/// The target-model representation of a legacy party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
  pub external_id: String,
  pub name:        String,
  pub kind:        CompanyKind,
}

/// A named individual; only person parties yield one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub external_id: String,
  pub salutation:  Option<String>,
  pub forename:    Option<String>,
  pub surname:     String,
}

/// A postal address from the legacy register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub external_id: String,
  pub line_1:      String,
  pub line_2:      Option<String>,
  pub town:        Option<String>,
  pub county:      Option<String>,
  pub postcode:    Option<String>,
  pub country:     Option<String>,
}

/// A resolved party: always a company, plus a contact when the party is a
/// person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
  pub company: Company,
  pub contact: Option<Contact>,
}

// ─── Lookup context ──────────────────────────────────────────────────────────

/// Pre-populated resolution maps for one engine invocation.
#[derive(Debug, Clone, Default)]
pub struct LookupContext {
  parties:   HashMap<RegionId, Party>,
  addresses: HashMap<RegionId, Address>,
}

impl LookupContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert_party(&mut self, id: RegionId, party: Party) {
    self.parties.insert(id, party);
  }

  pub fn insert_address(&mut self, id: RegionId, address: Address) {
    self.addresses.insert(id, address);
  }

  /// Resolve a party reference; a miss aborts the licence's assembly.
  pub fn party(&self, region: &str, id: &str) -> Result<&Party> {
    self.parties.get(&RegionId::new(region, id)).ok_or_else(|| {
      Error::PartyNotFound { region: region.to_string(), party: id.to_string() }
    })
  }

  /// Resolve an address reference; a miss aborts the licence's assembly.
  pub fn address(&self, region: &str, id: &str) -> Result<&Address> {
    self.addresses.get(&RegionId::new(region, id)).ok_or_else(|| {
      Error::AddressNotFound {
        region:  region.to_string(),
        address: id.to_string(),
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn company() -> Company {
    Company {
      external_id: "AN:100".to_string(),
      name:        "Fenland Farming Ltd".to_string(),
      kind:        CompanyKind::Organisation,
    }
  }

  #[test]
  fn region_scopes_the_lookup() {
    let mut ctx = LookupContext::new();
    ctx.insert_party(
      RegionId::new("AN", "100"),
      Party { company: company(), contact: None },
    );
    assert!(ctx.party("AN", "100").is_ok());
    assert_eq!(
      ctx.party("MD", "100"),
      Err(Error::PartyNotFound {
        region: "MD".to_string(),
        party:  "100".to_string(),
      })
    );
  }

  #[test]
  fn external_id_form_is_region_qualified() {
    assert_eq!(RegionId::new("AN", "42").to_string(), "AN:42");
  }
}
