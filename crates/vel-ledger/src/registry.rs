use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vel_types::{Candidate, Timestamp, VoterId};

use crate::error::ContractError;

/// Per-identity voter state.
///
/// A record exists from the moment an identity opts in and is never
/// destroyed. The three vote fields (`has_voted`, `vote_timestamp`,
/// `chosen_candidate`) are set together, exactly once, by
/// [`VoterRecord::mark_voted`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    identity: VoterId,
    opted_in: bool,
    has_voted: bool,
    vote_timestamp: Option<Timestamp>,
    chosen_candidate: Option<Candidate>,
}

impl VoterRecord {
    pub(crate) fn new(identity: VoterId) -> Self {
        Self {
            identity,
            opted_in: true,
            has_voted: false,
            vote_timestamp: None,
            chosen_candidate: None,
        }
    }

    pub(crate) fn mark_voted(&mut self, candidate: Candidate, now: Timestamp) {
        self.has_voted = true;
        self.vote_timestamp = Some(now);
        self.chosen_candidate = Some(candidate);
    }

    pub fn identity(&self) -> &VoterId {
        &self.identity
    }

    pub fn opted_in(&self) -> bool {
        self.opted_in
    }

    pub fn has_voted(&self) -> bool {
        self.has_voted
    }

    pub fn vote_timestamp(&self) -> Option<Timestamp> {
        self.vote_timestamp
    }

    pub fn chosen_candidate(&self) -> Option<Candidate> {
        self.chosen_candidate
    }
}

/// The local-state namespace: one [`VoterRecord`] per opted-in identity.
///
/// Backed by a `BTreeMap` so iteration (and therefore snapshots) is
/// deterministic. The registry has no lock of its own; atomicity across
/// the election aggregate and the registry is the contract's job.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRegistry {
    records: BTreeMap<VoterId, VoterRecord>,
}

impl VoterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record for `identity`. Re-registration is rejected.
    pub(crate) fn register(&mut self, identity: VoterId) -> Result<(), ContractError> {
        if self.records.contains_key(&identity) {
            return Err(ContractError::AlreadyOptedIn);
        }
        self.records.insert(identity, VoterRecord::new(identity));
        Ok(())
    }

    pub fn get(&self, identity: &VoterId) -> Option<&VoterRecord> {
        self.records.get(identity)
    }

    pub(crate) fn get_mut(&mut self, identity: &VoterId) -> Option<&mut VoterRecord> {
        self.records.get_mut(identity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &VoterRecord> {
        self.records.values()
    }

    pub(crate) fn from_records(records: Vec<VoterRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.identity, r)).collect(),
        }
    }
}

/// The `get_voter_status` return value.
///
/// Unknown identities get the `unregistered` form rather than an error:
/// asking about a voter is always answerable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterStatus {
    pub opted_in: bool,
    pub has_voted: bool,
    pub vote_timestamp: Option<Timestamp>,
}

impl VoterStatus {
    /// Status for an identity with no record.
    pub fn unregistered() -> Self {
        Self {
            opted_in: false,
            has_voted: false,
            vote_timestamp: None,
        }
    }

    pub(crate) fn from_record(record: &VoterRecord) -> Self {
        Self {
            opted_in: record.opted_in(),
            has_voted: record.has_voted(),
            vote_timestamp: record.vote_timestamp(),
        }
    }
}
