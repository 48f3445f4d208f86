//! Foundation types for the Verified Election Ledger (VEL).
//!
//! This crate provides the identity, temporal, and value types shared by
//! every other VEL crate. Nothing here touches election state; these are
//! the vocabulary types the contract speaks in.
//!
//! # Key Types
//!
//! - [`VoterId`] — Opaque voter identity derived from authenticated address material
//! - [`Timestamp`] / [`TimeWindow`] — Ledger time and the validated voting window
//! - [`Candidate`] — The two ballot options with their fixed wire ids
//! - [`ReportHash`] — Opaque, externally computed tally digest

pub mod candidate;
pub mod error;
pub mod identity;
pub mod report;
pub mod temporal;

pub use candidate::Candidate;
pub use error::TypeError;
pub use identity::VoterId;
pub use report::ReportHash;
pub use temporal::{TimeWindow, Timestamp};
