use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vel",
    about = "Verified Election Ledger — two-candidate election contract",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the election state file.
    #[arg(long, global = true, default_value = "election.json")]
    pub state: String,

    /// Identity label the request is made as.
    #[arg(long = "as", global = true, default_value = "creator", value_name = "LABEL")]
    pub caller: String,

    /// Ledger time override (seconds since epoch); wall clock if omitted.
    #[arg(long, global = true, value_name = "SECS")]
    pub now: Option<u64>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the election with a voting window
    Init(InitArgs),
    /// Register the calling identity as a voter
    OptIn(OptInArgs),
    /// Cast a vote for candidate 1 (A) or 2 (B)
    Vote(VoteArgs),
    /// Close the election and store the report hash
    Close(CloseArgs),
    /// Show the current tally
    Results(ResultsArgs),
    /// Show a voter's status
    Status(StatusArgs),
    /// Check the ledger invariants over the stored state
    Audit(AuditArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// When voting opens (seconds since epoch)
    pub start: u64,
    /// When voting closes (seconds since epoch, exclusive)
    pub end: u64,
    /// Do not enforce the time window (rehearsal runs)
    #[arg(long)]
    pub rehearsal: bool,
    /// Seed initial tallies, e.g. --seed 7,5
    #[arg(long, value_name = "A,B")]
    pub seed: Option<String>,
}

#[derive(Args)]
pub struct OptInArgs {}

#[derive(Args)]
pub struct VoteArgs {
    /// Candidate wire id: 1 for A, 2 for B
    pub candidate_id: u64,
}

#[derive(Args)]
pub struct CloseArgs {
    /// Hex-encoded report hash from the report service
    pub hash: Option<String>,
    /// Digest the current results instead of supplying a hash
    #[arg(long, conflicts_with = "hash")]
    pub from_results: bool,
}

#[derive(Args)]
pub struct ResultsArgs {}

#[derive(Args)]
pub struct StatusArgs {
    /// Identity label to query (defaults to --as)
    pub identity: Option<String>,
}

#[derive(Args)]
pub struct AuditArgs {}
