use serde::{Deserialize, Serialize};
use vel_types::{Candidate, ReportHash, TimeWindow, Timestamp, VoterId};

/// Lifecycle phase of an election relative to a point in time.
///
/// `Closed` is terminal and wins over anything the window would say.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionPhase {
    /// Created, voting not yet open.
    Pending,
    /// Voting window is open and the election is not closed.
    Active,
    /// Voting window has passed; closure has not happened yet.
    Ended,
    /// Closed by the creator; the report hash is stored.
    Closed,
}

impl std::fmt::Display for ElectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Ended => write!(f, "ended"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// The singleton election aggregate: candidate tallies, voting window,
/// closure flag, and the write-once report hash.
///
/// Mutation is confined to this module's crate-internal methods; the
/// contract validates preconditions and then calls exactly one mutator,
/// so `total_voters == candidate_a_votes + candidate_b_votes` holds after
/// every transition. The aggregate is never deleted — it is the permanent
/// record of the election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    creator: VoterId,
    window: TimeWindow,
    candidate_a_votes: u64,
    candidate_b_votes: u64,
    total_voters: u64,
    closed: bool,
    report_hash: Option<ReportHash>,
}

impl Election {
    pub(crate) fn new(creator: VoterId, window: TimeWindow) -> Self {
        Self {
            creator,
            window,
            candidate_a_votes: 0,
            candidate_b_votes: 0,
            total_voters: 0,
            closed: false,
            report_hash: None,
        }
    }

    /// Pre-load tallies at creation (rehearsal/demo configurations).
    /// `total_voters` is the sum, so conservation holds from the start.
    pub(crate) fn seed(&mut self, a: u64, b: u64) {
        self.candidate_a_votes = a;
        self.candidate_b_votes = b;
        self.total_voters = a + b;
    }

    pub(crate) fn record_vote(&mut self, candidate: Candidate) {
        match candidate {
            Candidate::A => self.candidate_a_votes += 1,
            Candidate::B => self.candidate_b_votes += 1,
        }
        self.total_voters += 1;
    }

    pub(crate) fn close(&mut self, report_hash: ReportHash) {
        self.report_hash = Some(report_hash);
        self.closed = true;
    }

    /// The identity that created the election.
    pub fn creator(&self) -> &VoterId {
        &self.creator
    }

    /// The voting window.
    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn candidate_a_votes(&self) -> u64 {
        self.candidate_a_votes
    }

    pub fn candidate_b_votes(&self) -> u64 {
        self.candidate_b_votes
    }

    pub fn total_voters(&self) -> u64 {
        self.total_voters
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn report_hash(&self) -> Option<&ReportHash> {
        self.report_hash.as_ref()
    }

    /// The lifecycle phase at time `now`.
    pub fn phase(&self, now: Timestamp) -> ElectionPhase {
        if self.closed {
            ElectionPhase::Closed
        } else if !self.window.has_started(now) {
            ElectionPhase::Pending
        } else if self.window.contains(now) {
            ElectionPhase::Active
        } else {
            ElectionPhase::Ended
        }
    }

    /// A read-only tally snapshot of this aggregate.
    pub fn tally(&self) -> TallySnapshot {
        TallySnapshot {
            candidate_a_votes: self.candidate_a_votes,
            candidate_b_votes: self.candidate_b_votes,
            total_voters: self.total_voters,
            election_start: self.window.start(),
            election_end: self.window.end(),
            closed: self.closed,
            report_hash: self.report_hash.clone(),
        }
    }
}

/// The `get_results` return value: everything a presentation layer or the
/// report service needs, with no authority to mutate anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallySnapshot {
    pub candidate_a_votes: u64,
    pub candidate_b_votes: u64,
    pub total_voters: u64,
    pub election_start: Timestamp,
    pub election_end: Timestamp,
    pub closed: bool,
    pub report_hash: Option<ReportHash>,
}

impl TallySnapshot {
    /// The candidate currently ahead, or `None` on a tie.
    pub fn leader(&self) -> Option<Candidate> {
        match self.candidate_a_votes.cmp(&self.candidate_b_votes) {
            std::cmp::Ordering::Greater => Some(Candidate::A),
            std::cmp::Ordering::Less => Some(Candidate::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}
