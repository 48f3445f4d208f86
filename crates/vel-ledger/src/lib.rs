//! Core election ledger for the Verified Election Ledger (VEL).
//!
//! This crate is the heart of VEL. It provides:
//! - The singleton [`Election`] aggregate and its lifecycle state machine
//! - The per-identity [`VoterRecord`] registry
//! - [`ElectionContract`], the only operation surface over both
//! - A [`Clock`] trait boundary (system and manual implementations)
//! - Injected [`ContractConfig`] for rehearsal and seeded-tally runs
//! - [`TallyAuditor`] invariant checks over state snapshots
//! - [`SerialExecutor`], the total-order harness with deterministic replay
//!
//! Operations execute under a total-order model: the surrounding system
//! (a ledger, or the executor here) applies them one at a time, each to
//! completion. The contract's guarantee is that no matter which order the
//! system picks, every invariant — one vote per identity, conserved
//! tallies, a write-once report hash — holds after every step.

pub mod audit;
pub mod clock;
pub mod config;
pub mod contract;
pub mod election;
pub mod error;
pub mod executor;
pub mod registry;

pub use audit::{AuditReport, TallyAuditor, Violation, ViolationKind};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ContractConfig;
pub use contract::{ContractSnapshot, ElectionContract};
pub use election::{Election, ElectionPhase, TallySnapshot};
pub use error::ContractError;
pub use executor::{AppliedRequest, ReplayReport, Request, SerialExecutor};
pub use registry::{VoterRecord, VoterRegistry, VoterStatus};
