use serde::{Deserialize, Serialize};

/// Configuration for an election contract.
///
/// Injected at construction; there are no global flags and no
/// compile-time modes. Tests and rehearsal deployments pick the
/// configuration they need, production takes the default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Whether votes and closure are held to the election's time window.
    /// When `false`, votes are accepted before `start` and after `end`,
    /// and the creator may close at any time. A closed election rejects
    /// votes regardless of this flag.
    pub enforce_time_window: bool,

    /// Initial `(candidate_a, candidate_b)` tallies, applied at creation.
    /// `total_voters` is seeded to their sum so tally conservation holds
    /// from the first transition.
    pub seed_tallies: Option<(u64, u64)>,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            enforce_time_window: true,
            seed_tallies: None,
        }
    }
}

impl ContractConfig {
    /// Configuration for rehearsal runs and demos: the time window is not
    /// enforced, so an operator can walk the whole lifecycle without
    /// waiting out the window.
    pub fn rehearsal() -> Self {
        Self {
            enforce_time_window: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enforces_window_and_seeds_nothing() {
        let config = ContractConfig::default();
        assert!(config.enforce_time_window);
        assert_eq!(config.seed_tallies, None);
    }

    #[test]
    fn rehearsal_disables_window_enforcement_only() {
        let config = ContractConfig::rehearsal();
        assert!(!config.enforce_time_window);
        assert_eq!(config.seed_tallies, None);
    }
}
