//! Vote on a pending proposal.

use crate::commands::execute::print_outcome;
use crate::common::GlobalOpts;
use anyhow::{bail, Context, Result};
use clap::Args;
use move_multisig::{submit_vote, AccountAddress};

#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Multisig account address
    #[arg(long)]
    multisig: String,

    /// Sequence number of the proposal to vote on
    #[arg(long)]
    sequence_number: u64,

    /// Vote to approve
    #[arg(long, conflicts_with = "reject")]
    approve: bool,

    /// Vote to reject
    #[arg(long)]
    reject: bool,
}

pub async fn run(args: &VoteArgs, global: &GlobalOpts) -> Result<()> {
    if !args.approve && !args.reject {
        bail!("specify --approve or --reject");
    }
    let multisig = AccountAddress::from_hex(&args.multisig).context("invalid multisig address")?;
    let client = global.build_client()?;
    let signer = global.load_signer()?;

    let outcome = submit_vote(&client, &signer, multisig, args.sequence_number, args.approve)
        .await
        .context("failed to submit vote")?;

    print_outcome(&outcome, global, client.config())
}
