use vel_types::Candidate;

use crate::config::ContractConfig;
use crate::contract::ContractSnapshot;

/// Result of auditing a contract snapshot against the ledger invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditReport {
    pub voter_count: u64,
    pub tally_conserved: bool,
    pub votes_attributed: bool,
    pub window_sane: bool,
    pub closure_consistent: bool,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// Returns `true` if every check passed.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific invariant violation found in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// `candidate_a_votes + candidate_b_votes != total_voters`.
    TallyDrift,
    /// A candidate counter disagrees with the voter records behind it.
    UnattributedVote,
    /// A voter record's vote fields contradict each other.
    VoteFieldMismatch,
    /// The stored window has `start >= end`.
    WindowInverted,
    /// `closed` and the stored report hash disagree.
    ClosureMismatch,
    /// Voter records exist with no election.
    OrphanedVoter,
}

/// Whole-state invariant checker.
///
/// The auditor sees a snapshot, not history: it can prove the counters,
/// records, and flags are mutually consistent right now, but not that
/// every past transition was legal — that is what [`crate::SerialExecutor`]
/// replay is for. Snapshots may arrive from disk, so nothing the type
/// system normally guarantees is taken on faith here.
pub struct TallyAuditor;

impl TallyAuditor {
    /// Audit `snapshot` under `config`.
    ///
    /// Seeded tallies are part of the configured baseline, not
    /// unattributed votes, so the attribution check subtracts them.
    pub fn audit(snapshot: &ContractSnapshot, config: &ContractConfig) -> AuditReport {
        let mut violations = Vec::new();
        let mut tally_conserved = true;
        let mut votes_attributed = true;
        let mut window_sane = true;
        let mut closure_consistent = true;

        let Some(election) = &snapshot.election else {
            if !snapshot.voters.is_empty() {
                violations.push(Violation {
                    kind: ViolationKind::OrphanedVoter,
                    description: format!(
                        "{} voter record(s) exist but no election does",
                        snapshot.voters.len()
                    ),
                });
            }
            return AuditReport {
                voter_count: snapshot.voters.len() as u64,
                tally_conserved,
                votes_attributed,
                window_sane,
                closure_consistent,
                violations,
            };
        };

        if election.window().start() >= election.window().end() {
            window_sane = false;
            violations.push(Violation {
                kind: ViolationKind::WindowInverted,
                description: format!("window {} has no interior", election.window()),
            });
        }

        let total = election.candidate_a_votes() + election.candidate_b_votes();
        if total != election.total_voters() {
            tally_conserved = false;
            violations.push(Violation {
                kind: ViolationKind::TallyDrift,
                description: format!(
                    "counters sum to {total} but total_voters is {}",
                    election.total_voters()
                ),
            });
        }

        let (seed_a, seed_b) = config.seed_tallies.unwrap_or((0, 0));
        let mut recorded_a = 0u64;
        let mut recorded_b = 0u64;
        for record in &snapshot.voters {
            if !record.opted_in() {
                votes_attributed = false;
                violations.push(Violation {
                    kind: ViolationKind::VoteFieldMismatch,
                    description: format!("{} has a record but opted_in is false", record.identity()),
                });
            }
            match (
                record.has_voted(),
                record.chosen_candidate(),
                record.vote_timestamp(),
            ) {
                (true, Some(Candidate::A), Some(_)) => recorded_a += 1,
                (true, Some(Candidate::B), Some(_)) => recorded_b += 1,
                (false, None, None) => {}
                _ => {
                    votes_attributed = false;
                    violations.push(Violation {
                        kind: ViolationKind::VoteFieldMismatch,
                        description: format!(
                            "{} vote fields are inconsistent (has_voted = {})",
                            record.identity(),
                            record.has_voted()
                        ),
                    });
                }
            }
        }

        if recorded_a + seed_a != election.candidate_a_votes() {
            votes_attributed = false;
            violations.push(Violation {
                kind: ViolationKind::UnattributedVote,
                description: format!(
                    "candidate A counter is {} but {} record(s) + {} seeded account for it",
                    election.candidate_a_votes(),
                    recorded_a,
                    seed_a
                ),
            });
        }
        if recorded_b + seed_b != election.candidate_b_votes() {
            votes_attributed = false;
            violations.push(Violation {
                kind: ViolationKind::UnattributedVote,
                description: format!(
                    "candidate B counter is {} but {} record(s) + {} seeded account for it",
                    election.candidate_b_votes(),
                    recorded_b,
                    seed_b
                ),
            });
        }

        if election.closed() != election.report_hash().is_some() {
            closure_consistent = false;
            violations.push(Violation {
                kind: ViolationKind::ClosureMismatch,
                description: format!(
                    "closed is {} but report hash is {}",
                    election.closed(),
                    if election.report_hash().is_some() {
                        "present"
                    } else {
                        "absent"
                    }
                ),
            });
        }

        AuditReport {
            voter_count: snapshot.voters.len() as u64,
            tally_conserved,
            votes_attributed,
            window_sane,
            closure_consistent,
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vel_types::{ReportHash, Timestamp, VoterId};

    use crate::clock::ManualClock;
    use crate::contract::ElectionContract;

    use super::*;

    fn voter(label: &str) -> VoterId {
        VoterId::from_label(label)
    }

    fn voted_contract() -> ElectionContract {
        let clock = Arc::new(ManualClock::starting_at(Timestamp::from_secs(150)));
        let contract = ElectionContract::new(clock);
        contract
            .create_election(
                voter("alice"),
                Timestamp::from_secs(100),
                Timestamp::from_secs(200),
            )
            .unwrap();
        contract.opt_in_voter(voter("bob")).unwrap();
        contract.cast_vote(voter("bob"), 1).unwrap();
        contract.opt_in_voter(voter("carol")).unwrap();
        contract.cast_vote(voter("carol"), 2).unwrap();
        contract
    }

    /// Serialize a snapshot, patch one field in the JSON, read it back.
    /// The only way to fabricate states the contract itself refuses to
    /// reach.
    fn tampered(
        contract: &ElectionContract,
        patch: impl FnOnce(&mut serde_json::Value),
    ) -> ContractSnapshot {
        let mut value = serde_json::to_value(contract.snapshot().unwrap()).unwrap();
        patch(&mut value);
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn live_contract_state_is_clean() {
        let contract = voted_contract();
        let report =
            TallyAuditor::audit(&contract.snapshot().unwrap(), contract.config());
        assert!(report.is_clean(), "violations: {:?}", report.violations);
        assert_eq!(report.voter_count, 2);
    }

    #[test]
    fn closed_contract_state_is_clean() {
        let contract = voted_contract();
        // The clock inside voted_contract sits at 150; rebuild at 250 to
        // close legally.
        let snapshot = contract.snapshot().unwrap();
        let late = ElectionContract::restore(
            snapshot,
            Arc::new(ManualClock::starting_at(Timestamp::from_secs(250))),
            ContractConfig::default(),
        );
        late.close_election(voter("alice"), ReportHash::digest(b"done").as_bytes())
            .unwrap();
        let report = TallyAuditor::audit(&late.snapshot().unwrap(), late.config());
        assert!(report.is_clean());
    }

    #[test]
    fn empty_state_is_clean() {
        let contract =
            ElectionContract::new(Arc::new(ManualClock::starting_at(Timestamp::zero())));
        let report =
            TallyAuditor::audit(&contract.snapshot().unwrap(), contract.config());
        assert!(report.is_clean());
        assert_eq!(report.voter_count, 0);
    }

    #[test]
    fn detects_tally_drift() {
        let contract = voted_contract();
        let snapshot = tampered(&contract, |v| {
            v["election"]["total_voters"] = serde_json::json!(99);
        });
        let report = TallyAuditor::audit(&snapshot, contract.config());
        assert!(!report.tally_conserved);
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::TallyDrift));
    }

    #[test]
    fn detects_unattributed_counter_bump() {
        let contract = voted_contract();
        let snapshot = tampered(&contract, |v| {
            v["election"]["candidate_a_votes"] = serde_json::json!(5);
            v["election"]["total_voters"] = serde_json::json!(6);
        });
        let report = TallyAuditor::audit(&snapshot, contract.config());
        assert!(!report.votes_attributed);
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::UnattributedVote));
    }

    #[test]
    fn detects_half_written_vote_fields() {
        let contract = voted_contract();
        let snapshot = tampered(&contract, |v| {
            // bob sorts somewhere in the voters array; flip has_voted off
            // on every record while leaving the chosen candidates behind.
            for record in v["voters"].as_array_mut().unwrap() {
                record["has_voted"] = serde_json::json!(false);
            }
        });
        let report = TallyAuditor::audit(&snapshot, contract.config());
        assert!(!report.votes_attributed);
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::VoteFieldMismatch));
    }

    #[test]
    fn detects_inverted_window() {
        let contract = voted_contract();
        let snapshot = tampered(&contract, |v| {
            v["election"]["window"] = serde_json::json!({ "start": 200, "end": 100 });
        });
        let report = TallyAuditor::audit(&snapshot, contract.config());
        assert!(!report.window_sane);
    }

    #[test]
    fn detects_closure_without_hash() {
        let contract = voted_contract();
        let snapshot = tampered(&contract, |v| {
            v["election"]["closed"] = serde_json::json!(true);
        });
        let report = TallyAuditor::audit(&snapshot, contract.config());
        assert!(!report.closure_consistent);
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::ClosureMismatch));
    }

    #[test]
    fn detects_voters_without_an_election() {
        let contract = voted_contract();
        let snapshot = tampered(&contract, |v| {
            v["election"] = serde_json::Value::Null;
        });
        let report = TallyAuditor::audit(&snapshot, contract.config());
        assert!(!report.is_clean());
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::OrphanedVoter));
    }

    #[test]
    fn seeded_tallies_count_as_the_baseline() {
        let config = ContractConfig {
            seed_tallies: Some((3, 4)),
            ..Default::default()
        };
        let clock = Arc::new(ManualClock::starting_at(Timestamp::from_secs(150)));
        let contract = ElectionContract::with_config(clock, config);
        contract
            .create_election(
                voter("alice"),
                Timestamp::from_secs(100),
                Timestamp::from_secs(200),
            )
            .unwrap();
        contract.opt_in_voter(voter("bob")).unwrap();
        contract.cast_vote(voter("bob"), 1).unwrap();

        let report =
            TallyAuditor::audit(&contract.snapshot().unwrap(), contract.config());
        assert!(report.is_clean(), "violations: {:?}", report.violations);
    }
}
