use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;
use vel_types::{Candidate, ReportHash, TimeWindow, Timestamp, VoterId};

use crate::clock::Clock;
use crate::config::ContractConfig;
use crate::election::{Election, ElectionPhase, TallySnapshot};
use crate::error::ContractError;
use crate::registry::{VoterRecord, VoterRegistry, VoterStatus};

/// Both state namespaces behind one lock, so every operation reads and
/// mutates the election aggregate and the voter registry as a single
/// atomic unit.
#[derive(Default)]
struct ContractState {
    election: Option<Election>,
    voters: VoterRegistry,
}

/// A serializable copy of the full contract state.
///
/// Used for persistence (the CLI state file), invariant audits, and
/// replay comparison. Voters appear in identity order, so equal states
/// produce equal snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    pub election: Option<Election>,
    pub voters: Vec<VoterRecord>,
}

/// The election contract: the only mutation path into the election
/// aggregate and the voter registry.
///
/// The surrounding system delivers authenticated requests in a total
/// order; each operation here runs to completion under one write-lock
/// scope, reads its [`Clock`] exactly once at entry, and either applies
/// all of its effects or none of them. Preconditions are checked in a
/// fixed order, so the first failure is deterministic for a given state
/// and time.
pub struct ElectionContract {
    clock: Arc<dyn Clock>,
    config: ContractConfig,
    inner: RwLock<ContractState>,
}

impl ElectionContract {
    /// A fresh contract with the default (production) configuration.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(clock, ContractConfig::default())
    }

    /// A fresh contract with an explicit configuration.
    pub fn with_config(clock: Arc<dyn Clock>, config: ContractConfig) -> Self {
        Self {
            clock,
            config,
            inner: RwLock::new(ContractState::default()),
        }
    }

    /// Rebuild a contract from a snapshot.
    pub fn restore(
        snapshot: ContractSnapshot,
        clock: Arc<dyn Clock>,
        config: ContractConfig,
    ) -> Self {
        Self {
            clock,
            config,
            inner: RwLock::new(ContractState {
                election: snapshot.election,
                voters: VoterRegistry::from_records(snapshot.voters),
            }),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, ContractState>, ContractError> {
        self.inner.read().map_err(|_| ContractError::StatePoisoned)
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, ContractState>, ContractError> {
        self.inner.write().map_err(|_| ContractError::StatePoisoned)
    }

    /// Create the election. Singleton: the first successful call wins and
    /// records `caller` as the creator; every later call fails.
    ///
    /// The window must satisfy `start < end`, and `end` must still be in
    /// the future (a past `start` is fine — that is an immediate-open
    /// election). The future-`end` check is skipped when the window is
    /// not enforced, so rehearsal runs can replay historical windows.
    pub fn create_election(
        &self,
        caller: VoterId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<(), ContractError> {
        let now = self.clock.now();
        let mut state = self.write_state()?;

        if state.election.is_some() {
            return Err(ContractError::AlreadyCreated);
        }

        let window = TimeWindow::new(start, end).map_err(|_| ContractError::InvalidWindow {
            start: start.secs(),
            end: end.secs(),
        })?;
        if self.config.enforce_time_window && window.has_ended(now) {
            return Err(ContractError::InvalidWindow {
                start: start.secs(),
                end: end.secs(),
            });
        }

        let mut election = Election::new(caller, window);
        if let Some((a, b)) = self.config.seed_tallies {
            election.seed(a, b);
        }

        debug!(creator = %caller, window = %window, "election created");
        state.election = Some(election);
        Ok(())
    }

    /// Register `caller` as a voter. One record per identity, never
    /// destroyed; a second call from the same identity fails.
    pub fn opt_in_voter(&self, caller: VoterId) -> Result<(), ContractError> {
        let mut state = self.write_state()?;

        if state.election.is_none() {
            return Err(ContractError::ElectionNotFound);
        }
        state.voters.register(caller)?;

        debug!(voter = %caller, "voter opted in");
        Ok(())
    }

    /// Cast a vote for the candidate with wire id `candidate_id`.
    ///
    /// Checks run in a fixed order — phase, candidate id, registration,
    /// double-vote — so a call in the wrong phase reports the phase error
    /// even if the caller never opted in. On success the voter record and
    /// both election counters update in one step.
    pub fn cast_vote(&self, caller: VoterId, candidate_id: u64) -> Result<(), ContractError> {
        let now = self.clock.now();
        let mut state = self.write_state()?;
        let ContractState { election, voters } = &mut *state;
        let election = election.as_mut().ok_or(ContractError::ElectionNotFound)?;

        if election.closed() {
            return Err(ContractError::VotingClosed);
        }
        if self.config.enforce_time_window {
            let window = election.window();
            if !window.has_started(now) {
                return Err(ContractError::NotYetStarted {
                    now: now.secs(),
                    start: window.start().secs(),
                });
            }
            if window.has_ended(now) {
                return Err(ContractError::VotingClosed);
            }
        }

        let candidate = Candidate::from_id(candidate_id)
            .ok_or(ContractError::InvalidCandidate { id: candidate_id })?;

        let record = voters.get_mut(&caller).ok_or(ContractError::NotOptedIn)?;
        if record.has_voted() {
            return Err(ContractError::AlreadyVoted);
        }

        record.mark_voted(candidate, now);
        election.record_vote(candidate);

        debug!(voter = %caller, candidate = %candidate, at = %now, "vote recorded");
        Ok(())
    }

    /// Close the election and store the externally computed report hash.
    ///
    /// Creator-only, once the window has ended, exactly once. The hash is
    /// write-once: a second call fails rather than silently succeeding,
    /// which is what keeps the stored hash immutable. The end-of-window
    /// check is skipped when the window is not enforced.
    pub fn close_election(
        &self,
        caller: VoterId,
        report_hash: &[u8],
    ) -> Result<(), ContractError> {
        let now = self.clock.now();
        let mut state = self.write_state()?;
        let election = state
            .election
            .as_mut()
            .ok_or(ContractError::ElectionNotFound)?;

        if election.creator() != &caller {
            return Err(ContractError::Unauthorized);
        }
        if election.closed() {
            return Err(ContractError::AlreadyClosed);
        }
        if self.config.enforce_time_window && !election.window().has_ended(now) {
            return Err(ContractError::TooEarly {
                now: now.secs(),
                end: election.window().end().secs(),
            });
        }

        let hash = ReportHash::from_bytes(report_hash.to_vec())
            .map_err(|e| ContractError::InvalidHash(e.to_string()))?;

        election.close(hash);
        debug!(at = %now, "election closed, report hash stored");
        Ok(())
    }

    /// The current tally. Pure read, any caller, any phase.
    pub fn get_results(&self) -> Result<TallySnapshot, ContractError> {
        let state = self.read_state()?;
        state
            .election
            .as_ref()
            .map(Election::tally)
            .ok_or(ContractError::ElectionNotFound)
    }

    /// Status for `identity`. Pure read; unknown identities report as
    /// unregistered rather than erroring.
    pub fn get_voter_status(&self, identity: &VoterId) -> Result<VoterStatus, ContractError> {
        let state = self.read_state()?;
        Ok(state
            .voters
            .get(identity)
            .map(VoterStatus::from_record)
            .unwrap_or_else(VoterStatus::unregistered))
    }

    /// The election's lifecycle phase at the clock's current time.
    pub fn phase(&self) -> Result<ElectionPhase, ContractError> {
        let now = self.clock.now();
        let state = self.read_state()?;
        state
            .election
            .as_ref()
            .map(|e| e.phase(now))
            .ok_or(ContractError::ElectionNotFound)
    }

    /// A serializable copy of the full state.
    pub fn snapshot(&self) -> Result<ContractSnapshot, ContractError> {
        let state = self.read_state()?;
        Ok(ContractSnapshot {
            election: state.election.clone(),
            voters: state.voters.iter().cloned().collect(),
        })
    }
}
