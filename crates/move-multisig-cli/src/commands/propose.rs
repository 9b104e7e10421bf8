//! Propose a new transaction.

use crate::commands::execute::print_outcome;
use crate::common::{parse_typed_argument, GlobalOpts};
use anyhow::{bail, Context, Result};
use clap::Args;
use move_multisig::{
    encode_multisig_payload, submit_proposal, AccountAddress, EntryFunctionCall, WireTypeTag,
};

#[derive(Args, Debug)]
pub struct ProposeArgs {
    /// Multisig account address
    #[arg(long)]
    multisig: String,

    /// Function to call (e.g. "0x1::aptos_account::transfer")
    #[arg(long)]
    function: String,

    /// Generic type arguments (e.g. "0x1::aptos_coin::AptosCoin")
    #[arg(long, num_args = 0..)]
    type_args: Vec<String>,

    /// Typed arguments (e.g. "address:0x1", "u64:1000", "vector<u8>:0xab")
    #[arg(long, num_args = 0..)]
    args: Vec<String>,
}

pub async fn run(args: &ProposeArgs, global: &GlobalOpts) -> Result<()> {
    let multisig = AccountAddress::from_hex(&args.multisig).context("invalid multisig address")?;
    let call = build_call(args)?;
    let envelope = encode_multisig_payload(&call);

    let client = global.build_client()?;
    let signer = global.load_signer()?;
    let outcome = submit_proposal(&client, &signer, multisig, envelope)
        .await
        .context("failed to submit proposal")?;

    print_outcome(&outcome, global, client.config())
}

fn build_call(args: &ProposeArgs) -> Result<EntryFunctionCall> {
    let parts: Vec<&str> = args.function.split("::").collect();
    let [address, module, function] = parts.as_slice() else {
        bail!("function must be of the form 0xaddr::module::function");
    };
    let module_address = AccountAddress::from_hex(address).context("invalid module address")?;

    let type_args = args
        .type_args
        .iter()
        .map(|t| WireTypeTag::parse(t).map_err(anyhow::Error::from))
        .collect::<Result<Vec<_>>>()
        .context("invalid type argument")?;
    let encoded_args = args
        .args
        .iter()
        .map(|a| parse_typed_argument(a))
        .collect::<Result<Vec<_>>>()?;

    Ok(EntryFunctionCall {
        module_address,
        module_name: (*module).to_string(),
        function_name: (*function).to_string(),
        type_args,
        args: encoded_args,
    })
}
