//! Error types for `weir-core`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// A fact referenced a party the caller-supplied context does not hold.
  /// Fatal for the licence being assembled; a role with an unresolved party
  /// would corrupt downstream aggregation.
  #[error("party {party} not found in region {region}")]
  PartyNotFound { region: String, party: String },

  /// A fact referenced an address missing from the context. Fatal, as above.
  #[error("address {address} not found in region {region}")]
  AddressNotFound { region: String, address: String },

  /// Neither the licence row nor any of its versions yielded a usable start
  /// date, so the licence has no interval to clip anything against.
  #[error("licence {licence} has no usable start date")]
  MissingStartDate { licence: String },

  /// A raw date field that is neither the legacy "no value" sentinel nor a
  /// parseable `DD/MM/YYYY` value. Recoverable: fact builders treat the
  /// field as absent.
  #[error("invalid legacy date: {value:?}")]
  InvalidDate { value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
