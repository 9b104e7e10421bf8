//! Decode a stored multisig payload from hex.

use crate::common::GlobalOpts;
use crate::output;
use anyhow::{Context, Result};
use clap::Args;
use move_multisig::pending::decode_stored_payload;
use move_multisig::ExplanationRegistry;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Payload envelope bytes as hex (with or without 0x prefix)
    #[arg(long)]
    payload: String,
}

pub async fn run(args: &DecodeArgs, global: &GlobalOpts) -> Result<()> {
    let client = global.build_client()?;
    let registry = ExplanationRegistry::default();

    let decoded = decode_stored_payload(&client, &registry, &args.payload)
        .await
        .context("failed to decode payload")?;

    if global.json {
        return output::print_json(&decoded.to_json());
    }

    output::print_header("Decoded Payload");
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
    Ok(())
}
