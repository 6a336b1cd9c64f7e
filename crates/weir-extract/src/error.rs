//! Error types for the weir-extract codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed extract JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("duplicate licence row for {external_id}")]
  DuplicateLicence { external_id: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
