//! Command-line tool for inspecting and driving on-chain multisig accounts.
//!
//! Wraps the `move-multisig` library: decode stored payloads, list pending
//! proposals with vote tallies, cast votes, and resolve the front of the
//! queue by executing or rejecting it.

mod commands;
mod common;
mod output;

use clap::Parser;
use common::GlobalOpts;

/// Inspect and drive on-chain multisig accounts.
#[derive(Parser, Debug)]
#[command(name = "move-multisig", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Decode a stored multisig payload from hex
    Decode(commands::DecodeArgs),

    /// List a multisig account's pending proposals
    Pending(commands::PendingArgs),

    /// Show one proposal by sequence number
    Proposal(commands::ProposalArgs),

    /// Propose a new transaction
    Propose(commands::ProposeArgs),

    /// Vote on a pending proposal
    Vote(commands::VoteArgs),

    /// Execute the front-of-queue proposal
    Execute(commands::ResolveArgs),

    /// Reject (remove) the front-of-queue proposal
    Reject(commands::ResolveArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Decode(args) => commands::decode::run(&args, &cli.global).await,
        Command::Pending(args) => commands::pending::run_listing(&args, &cli.global).await,
        Command::Proposal(args) => commands::pending::run_single(&args, &cli.global).await,
        Command::Propose(args) => commands::propose::run(&args, &cli.global).await,
        Command::Vote(args) => commands::vote::run(&args, &cli.global).await,
        Command::Execute(args) => {
            commands::execute::run(&args, &cli.global, move_multisig::Intent::Execute).await
        }
        Command::Reject(args) => {
            commands::execute::run(&args, &cli.global, move_multisig::Intent::Reject).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
