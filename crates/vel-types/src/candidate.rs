use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two ballot options.
///
/// Candidates carry fixed wire ids (A = 1, B = 2). Requests arrive with a
/// raw id; [`Candidate::from_id`] is the only way an id becomes a
/// `Candidate`, so anything the contract holds is already valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Candidate {
    A,
    B,
}

impl Candidate {
    /// Resolve a wire id. Anything other than 1 or 2 is `None`.
    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            1 => Some(Self::A),
            2 => Some(Self::B),
            _ => None,
        }
    }

    /// The wire id for this candidate.
    pub const fn id(self) -> u64 {
        match self {
            Self::A => 1,
            Self::B => 2,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_ids_roundtrip() {
        assert_eq!(Candidate::from_id(1), Some(Candidate::A));
        assert_eq!(Candidate::from_id(2), Some(Candidate::B));
        assert_eq!(Candidate::A.id(), 1);
        assert_eq!(Candidate::B.id(), 2);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert_eq!(Candidate::from_id(0), None);
        assert_eq!(Candidate::from_id(3), None);
        assert_eq!(Candidate::from_id(u64::MAX), None);
    }
}
