use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vel_ledger::{
    Clock, ContractConfig, ContractSnapshot, ElectionContract, ManualClock, SystemClock,
    TallyAuditor,
};
use vel_types::{Candidate, ReportHash, Timestamp, VoterId};

use crate::cli::*;

/// On-disk form of a contract: the configuration it was created with,
/// plus a state snapshot. The configuration travels with the state so a
/// rehearsal election stays a rehearsal election across invocations.
#[derive(Serialize, Deserialize)]
struct StateFile {
    config: ContractConfig,
    snapshot: ContractSnapshot,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let caller = VoterId::from_label(&cli.caller);
    let clock = make_clock(cli.now);
    match cli.command {
        Command::Init(ref args) => cmd_init(&cli, caller, clock, args),
        Command::OptIn(_) => cmd_opt_in(&cli, caller, clock),
        Command::Vote(ref args) => cmd_vote(&cli, caller, clock, args),
        Command::Close(ref args) => cmd_close(&cli, caller, clock, args),
        Command::Results(_) => cmd_results(&cli, clock),
        Command::Status(ref args) => cmd_status(&cli, clock, args),
        Command::Audit(_) => cmd_audit(&cli, clock),
    }
}

fn make_clock(now: Option<u64>) -> Arc<dyn Clock> {
    match now {
        Some(secs) => Arc::new(ManualClock::starting_at(Timestamp::from_secs(secs))),
        None => Arc::new(SystemClock),
    }
}

fn load_contract(path: &str, clock: Arc<dyn Clock>) -> anyhow::Result<ElectionContract> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("no election state at {path}; run `vel init` first"))?;
    let file: StateFile =
        serde_json::from_str(&raw).with_context(|| format!("corrupt election state at {path}"))?;
    Ok(ElectionContract::restore(file.snapshot, clock, file.config))
}

fn save_contract(path: &str, contract: &ElectionContract) -> anyhow::Result<()> {
    let file = StateFile {
        config: contract.config().clone(),
        snapshot: contract.snapshot()?,
    };
    fs::write(path, serde_json::to_string_pretty(&file)?)
        .with_context(|| format!("cannot write election state to {path}"))?;
    debug!(path, "election state saved");
    Ok(())
}

fn cmd_init(cli: &Cli, caller: VoterId, clock: Arc<dyn Clock>, args: &InitArgs) -> anyhow::Result<()> {
    if Path::new(&cli.state).exists() {
        bail!("election state already exists at {}", cli.state);
    }

    let config = ContractConfig {
        enforce_time_window: !args.rehearsal,
        seed_tallies: args.seed.as_deref().map(parse_seed).transpose()?,
    };
    let contract = ElectionContract::with_config(clock, config);
    contract.create_election(
        caller,
        Timestamp::from_secs(args.start),
        Timestamp::from_secs(args.end),
    )?;
    save_contract(&cli.state, &contract)?;

    println!("{} Election created", "✓".green().bold());
    println!("  Creator: {} ({})", caller.short_id().cyan(), cli.caller.bold());
    println!("  Window: [{}, {})", args.start.to_string().yellow(), args.end.to_string().yellow());
    if args.rehearsal {
        println!("  Mode: {}", "rehearsal (time window not enforced)".yellow());
    }
    Ok(())
}

fn cmd_opt_in(cli: &Cli, caller: VoterId, clock: Arc<dyn Clock>) -> anyhow::Result<()> {
    let contract = load_contract(&cli.state, clock)?;
    contract.opt_in_voter(caller)?;
    save_contract(&cli.state, &contract)?;
    println!("{} {} ({}) opted in", "✓".green().bold(), caller.short_id().cyan(), cli.caller.bold());
    Ok(())
}

fn cmd_vote(cli: &Cli, caller: VoterId, clock: Arc<dyn Clock>, args: &VoteArgs) -> anyhow::Result<()> {
    let contract = load_contract(&cli.state, clock)?;
    contract.cast_vote(caller, args.candidate_id)?;
    save_contract(&cli.state, &contract)?;

    let label = match Candidate::from_id(args.candidate_id) {
        Some(c) => format!("{} ({c})", args.candidate_id),
        None => args.candidate_id.to_string(),
    };
    println!("{} Vote recorded for candidate {}", "✓".green().bold(), label.yellow());
    Ok(())
}

fn cmd_close(cli: &Cli, caller: VoterId, clock: Arc<dyn Clock>, args: &CloseArgs) -> anyhow::Result<()> {
    let contract = load_contract(&cli.state, clock)?;

    let hash = if args.from_results {
        // Stand in for the report service: digest the tally we are about
        // to freeze.
        let results = contract.get_results()?;
        ReportHash::digest(&serde_json::to_vec(&results)?)
    } else {
        let hex = args
            .hash
            .as_deref()
            .ok_or_else(|| anyhow!("supply a hex report hash or pass --from-results"))?;
        ReportHash::from_hex(hex).map_err(|e| anyhow!("invalid report hash: {e}"))?
    };

    contract.close_election(caller, hash.as_bytes())?;
    save_contract(&cli.state, &contract)?;

    println!("{} Election closed", "✓".green().bold());
    println!("  Report hash: {}", hash.to_hex().cyan());
    Ok(())
}

fn cmd_results(cli: &Cli, clock: Arc<dyn Clock>) -> anyhow::Result<()> {
    let contract = load_contract(&cli.state, clock)?;
    let results = contract.get_results()?;
    let phase = contract.phase()?;

    println!("Candidate A: {}", results.candidate_a_votes.to_string().bold());
    println!("Candidate B: {}", results.candidate_b_votes.to_string().bold());
    println!("Total voters: {}", results.total_voters.to_string().bold());
    println!(
        "Window: [{}, {})",
        results.election_start.to_string().yellow(),
        results.election_end.to_string().yellow()
    );
    println!("Phase: {}", phase.to_string().cyan());
    match results.leader() {
        Some(leader) => println!("Leading: {}", leader.to_string().green().bold()),
        None => println!("Leading: {}", "tie".dimmed()),
    }
    match &results.report_hash {
        Some(hash) => println!("Report hash: {}", hash.to_hex().cyan()),
        None => println!("Report hash: {}", "none".dimmed()),
    }
    Ok(())
}

fn cmd_status(cli: &Cli, clock: Arc<dyn Clock>, args: &StatusArgs) -> anyhow::Result<()> {
    let label = args.identity.as_deref().unwrap_or(&cli.caller);
    let identity = VoterId::from_label(label);
    let contract = load_contract(&cli.state, clock)?;
    let status = contract.get_voter_status(&identity)?;

    println!("Voter {} ({})", identity.short_id().cyan(), label.bold());
    if !status.opted_in {
        println!("  {}", "not registered".dimmed());
        return Ok(());
    }
    println!("  Opted in: {}", "yes".green());
    match status.vote_timestamp {
        Some(at) => println!("  Voted: {} at {}", "yes".green(), at.to_string().yellow()),
        None => println!("  Voted: {}", "no".dimmed()),
    }
    Ok(())
}

fn cmd_audit(cli: &Cli, clock: Arc<dyn Clock>) -> anyhow::Result<()> {
    let contract = load_contract(&cli.state, clock)?;
    let report = TallyAuditor::audit(&contract.snapshot()?, contract.config());

    let mark = |ok: bool| {
        if ok {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        }
    };
    println!("{} tally conservation", mark(report.tally_conserved));
    println!("{} vote attribution", mark(report.votes_attributed));
    println!("{} window sanity", mark(report.window_sane));
    println!("{} closure consistency", mark(report.closure_consistent));
    println!("Voters: {}", report.voter_count.to_string().bold());

    if report.is_clean() {
        println!("{} No issues.", "✓".green().bold());
        Ok(())
    } else {
        for violation in &report.violations {
            println!("  {} {}", "violation:".red(), violation.description);
        }
        bail!("{} invariant violation(s) found", report.violations.len());
    }
}

fn parse_seed(raw: &str) -> anyhow::Result<(u64, u64)> {
    let (a, b) = raw
        .split_once(',')
        .ok_or_else(|| anyhow!("seed must look like A,B (e.g. 7,5)"))?;
    Ok((
        a.trim().parse().context("seed for candidate A is not a number")?,
        b.trim().parse().context("seed for candidate B is not a number")?,
    ))
}
