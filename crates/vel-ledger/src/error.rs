/// Errors produced by contract operations.
///
/// Every variant is terminal for the call that produced it: the operation
/// aborts with zero state mutation, and the caller decides whether to
/// resubmit. Nothing here is ever coerced into a default result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error("election already created")]
    AlreadyCreated,

    #[error("no election exists")]
    ElectionNotFound,

    #[error("invalid voting window: start {start}, end {end}")]
    InvalidWindow { start: u64, end: u64 },

    #[error("caller is not the election creator")]
    Unauthorized,

    #[error("cannot close at {now}: voting runs until {end}")]
    TooEarly { now: u64, end: u64 },

    #[error("election already closed")]
    AlreadyClosed,

    #[error("voting has not started: now {now}, opens at {start}")]
    NotYetStarted { now: u64, start: u64 },

    #[error("voting is closed")]
    VotingClosed,

    #[error("caller has not opted in")]
    NotOptedIn,

    #[error("caller has already voted")]
    AlreadyVoted,

    #[error("caller has already opted in")]
    AlreadyOptedIn,

    #[error("invalid candidate id {id} (must be 1 or 2)")]
    InvalidCandidate { id: u64 },

    #[error("invalid report hash: {0}")]
    InvalidHash(String),

    #[error("contract state lock poisoned")]
    StatePoisoned,
}
