use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vel_types::{Timestamp, VoterId};

use crate::clock::ManualClock;
use crate::config::ContractConfig;
use crate::contract::ElectionContract;
use crate::error::ContractError;

/// An operation request as delivered by the caller adapter: what to do,
/// stripped of who and when (those travel alongside).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    CreateElection { start: Timestamp, end: Timestamp },
    OptInVoter,
    CastVote { candidate_id: u64 },
    CloseElection { report_hash: Vec<u8> },
}

/// One entry in the executor's log: a request, the total-order position
/// and effective time it was applied at, and what came of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedRequest {
    pub seq: u64,
    pub at: Timestamp,
    pub caller: VoterId,
    pub request: Request,
    pub outcome: Result<(), ContractError>,
}

/// Result of replaying an executor's log against a fresh contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: u64,
    /// Sequence numbers whose replayed outcome differed from the recorded
    /// one. Always empty for a deterministic contract.
    pub diverged_steps: Vec<u64>,
    pub snapshot_matches: bool,
}

impl ReplayReport {
    pub fn is_deterministic(&self) -> bool {
        self.diverged_steps.is_empty() && self.snapshot_matches
    }
}

/// The total-order model, reified: requests are applied one at a time,
/// each to completion, at an explicitly supplied time.
///
/// The executor owns the contract's [`ManualClock`] and clamps submitted
/// times monotonically — a request stamped earlier than the clock applies
/// at the clock's current reading, the way a ledger clamps a lagging
/// block timestamp. Every application is logged with its outcome, and
/// [`SerialExecutor::replay`] re-runs the log from genesis to verify that
/// the same order produces the same outcomes and the same final state.
pub struct SerialExecutor {
    clock: Arc<ManualClock>,
    contract: ElectionContract,
    config: ContractConfig,
    log: Vec<AppliedRequest>,
}

impl SerialExecutor {
    /// An executor over a fresh contract with the default configuration,
    /// clock at zero.
    pub fn new() -> Self {
        Self::with_config(ContractConfig::default())
    }

    /// An executor over a fresh contract with an explicit configuration.
    pub fn with_config(config: ContractConfig) -> Self {
        let clock = Arc::new(ManualClock::new());
        let contract = ElectionContract::with_config(clock.clone(), config.clone());
        Self {
            clock,
            contract,
            config,
            log: Vec::new(),
        }
    }

    /// Apply one request at time `at` (clamped monotonically), log it,
    /// and return the outcome.
    pub fn submit(
        &mut self,
        at: Timestamp,
        caller: VoterId,
        request: Request,
    ) -> Result<(), ContractError> {
        let effective = self.clock.advance_to(at);
        let outcome = self.apply(caller, &request);
        self.log.push(AppliedRequest {
            seq: self.log.len() as u64 + 1,
            at: effective,
            caller,
            request,
            outcome: outcome.clone(),
        });
        outcome
    }

    fn apply(&self, caller: VoterId, request: &Request) -> Result<(), ContractError> {
        match request {
            Request::CreateElection { start, end } => {
                self.contract.create_election(caller, *start, *end)
            }
            Request::OptInVoter => self.contract.opt_in_voter(caller),
            Request::CastVote { candidate_id } => {
                self.contract.cast_vote(caller, *candidate_id)
            }
            Request::CloseElection { report_hash } => {
                self.contract.close_election(caller, report_hash)
            }
        }
    }

    /// The contract under execution, for queries and snapshots.
    pub fn contract(&self) -> &ElectionContract {
        &self.contract
    }

    /// Everything applied so far, in order.
    pub fn log(&self) -> &[AppliedRequest] {
        &self.log
    }

    /// Re-apply the log to a fresh contract and compare outcomes and
    /// final snapshots.
    pub fn replay(&self) -> Result<ReplayReport, ContractError> {
        let mut fresh = Self::with_config(self.config.clone());
        let mut diverged_steps = Vec::new();

        for entry in &self.log {
            let outcome = fresh.submit(entry.at, entry.caller, entry.request.clone());
            if outcome != entry.outcome {
                diverged_steps.push(entry.seq);
            }
        }

        let snapshot_matches = fresh.contract.snapshot()? == self.contract.snapshot()?;
        Ok(ReplayReport {
            steps: self.log.len() as u64,
            diverged_steps,
            snapshot_matches,
        })
    }
}

impl Default for SerialExecutor {
    fn default() -> Self {
        Self::new()
    }
}
