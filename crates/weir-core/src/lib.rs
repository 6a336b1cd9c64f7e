//! Core temporal-consolidation engine for the Weir licence migration.
//!
//! The legacy register records licence facts as independent point-in-time
//! snapshots; the target model wants continuous, non-overlapping interval
//! histories clipped to the lifetime of the owning document. This crate holds
//! the machinery that gets from one to the other: date normalisation, run
//! merging, parent-interval partitioning, and the builders that apply them to
//! roles, addresses, agreements and invoice accounts.
//!
//! This crate is deliberately free of I/O, logging, and async. Callers supply
//! fully-materialised legacy rows and a lookup context; the engine returns a
//! [`licence::Licence`] aggregate or an error for that one licence.

pub mod addresses;
pub mod agreements;
pub mod context;
pub mod dates;
pub mod document;
pub mod error;
pub mod interval;
pub mod invoice_accounts;
pub mod legacy;
pub mod licence;
pub mod merge;
pub mod roles;
pub mod split;


pub use error::{Error, Result};
pub use interval::Interval;
