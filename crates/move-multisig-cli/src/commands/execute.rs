//! Resolve the front-of-queue proposal.

use crate::common::GlobalOpts;
use crate::output;
use anyhow::{Context, Result};
use clap::Args;
use move_multisig::{resolve_next, AccountAddress, ExecutionOutcome, Intent};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Multisig account address
    #[arg(long)]
    multisig: String,
}

pub async fn run(args: &ResolveArgs, global: &GlobalOpts, intent: Intent) -> Result<()> {
    let multisig = AccountAddress::from_hex(&args.multisig).context("invalid multisig address")?;
    let client = global.build_client()?;
    let signer = global.load_signer()?;
    let confirmation = global.confirmation();

    let outcome = resolve_next(&client, &signer, confirmation.as_ref(), multisig, intent)
        .await
        .context("failed to resolve transaction")?;

    print_outcome(&outcome, global, client.config())
}

/// Shared outcome printer for execute, reject, vote and propose.
pub fn print_outcome(
    outcome: &ExecutionOutcome,
    global: &GlobalOpts,
    config: &move_multisig::NetworkConfig,
) -> Result<()> {
    if global.json {
        return output::print_json(&serde_json::json!({
            "hash": outcome.hash,
            "sequence_number": outcome.sequence_number,
            "success": outcome.logical_success,
            "vm_status": outcome.vm_status,
        }));
    }

    if outcome.logical_success {
        output::print_success(&format!("transaction {} committed", outcome.hash));
    } else {
        output::print_warning(&format!(
            "transaction {} committed but the intended effect did not happen: {}",
            outcome.hash, outcome.vm_status
        ));
    }
    if let Some(seq) = outcome.sequence_number {
        output::print_kv("Sequence number", &seq.to_string());
    }
    output::print_explorer_link(config, &outcome.hash);
    Ok(())
}
