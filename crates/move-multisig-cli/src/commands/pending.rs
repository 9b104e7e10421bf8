//! List pending proposals and show single proposals.

use crate::common::GlobalOpts;
use crate::output;
use anyhow::{Context, Result};
use clap::Args;
use move_multisig::{
    annotate_front_simulation, fetch_pending, AccountAddress, ExplanationRegistry, PayloadState,
    PendingListing, PendingProposal,
};
use std::collections::HashMap;

#[derive(Args, Debug)]
pub struct PendingArgs {
    /// Multisig account address
    #[arg(long)]
    multisig: String,
}

#[derive(Args, Debug)]
pub struct ProposalArgs {
    /// Multisig account address
    #[arg(long)]
    multisig: String,

    /// Sequence number of the proposal to show
    #[arg(long)]
    sequence_number: u64,
}

pub async fn run_listing(args: &PendingArgs, global: &GlobalOpts) -> Result<()> {
    let multisig = AccountAddress::from_hex(&args.multisig).context("invalid multisig address")?;
    let listing = fetch(global, multisig, None).await?;
    print_listing(&listing, global)
}

pub async fn run_single(args: &ProposalArgs, global: &GlobalOpts) -> Result<()> {
    let multisig = AccountAddress::from_hex(&args.multisig).context("invalid multisig address")?;
    let listing = fetch(global, multisig, Some(args.sequence_number)).await?;
    print_listing(&listing, global)
}

async fn fetch(
    global: &GlobalOpts,
    multisig: AccountAddress,
    sequence_number: Option<u64>,
) -> Result<PendingListing> {
    let client = global.build_client()?;
    let registry = ExplanationRegistry::default();
    let mut listing = fetch_pending(&client, &registry, multisig, sequence_number)
        .await
        .context("failed to fetch pending proposals")?;
    // Dry-run the front of the queue when a signing key is around.
    if let Some(signer) = global.try_load_signer()? {
        annotate_front_simulation(&client, &signer, &mut listing).await;
    }
    Ok(listing)
}

fn print_listing(listing: &PendingListing, global: &GlobalOpts) -> Result<()> {
    let aliases = global.load_aliases()?;

    if global.json {
        return output::print_json(&serde_json::json!({
            "multisig": listing.summary.address.to_canonical_string(),
            "signatures_required": listing.summary.signatures_required,
            "owners": listing.summary.owners.len(),
            "ledger_version": listing.ledger_version,
            "proposals": listing
                .proposals
                .iter()
                .map(|p| p.to_json(&aliases))
                .collect::<Vec<_>>(),
        }));
    }

    output::print_header(&format!(
        "Multisig {} ({} of {} owners required)",
        listing.summary.address.to_short_string(),
        listing.summary.signatures_required,
        listing.summary.owners.len(),
    ));
    if listing.proposals.is_empty() {
        println!("  No pending transactions.");
        return Ok(());
    }
    for proposal in &listing.proposals {
        print_proposal(proposal, &aliases);
    }
    Ok(())
}

fn print_proposal(proposal: &PendingProposal, aliases: &HashMap<AccountAddress, String>) {
    output::print_header(&format!("Transaction {}", proposal.sequence_number));
    output::print_kv("Creator", &proposal.creator.to_short_string());
    match &proposal.payload {
        PayloadState::Decoded(decoded) => {
            output::print_kv("Function", &decoded.function_id);
            if !decoded.type_args.is_empty() {
                output::print_kv("Type arguments", &decoded.type_args.join(", "));
            }
            for (i, arg) in decoded.args.iter().enumerate() {
                output::print_kv(&format!("Argument {i}"), &arg.to_string());
            }
            if let Some(explanation) = &decoded.explanation {
                output::print_kv("Effect", explanation);
            }
        }
        PayloadState::HashOnly { hash } => {
            output::print_kv("Payload hash", hash);
        }
        PayloadState::Undecodable { reason } => {
            output::print_warning(&format!(
                "payload of transaction {} could not be decoded: {reason}",
                proposal.sequence_number
            ));
        }
    }
    output::print_kv(
        "Votes",
        &format!("{} approve / {} reject", proposal.approvals(), proposal.rejections()),
    );
    for vote in &proposal.votes {
        println!("    {}", vote.display_line(aliases));
    }
    if let Some(simulation) = &proposal.simulation {
        let verdict = if simulation.success {
            "would succeed".to_string()
        } else {
            format!("would fail: {}", simulation.vm_status)
        };
        output::print_kv("Simulation", &verdict);
    }
}
