//! # move-multisig
//!
//! A library for inspecting and driving on-chain multisig accounts on
//! Move-based chains.
//!
//! The core of the crate is a typed argument codec over the canonical
//! binary serialization, a decoder for stored multisig payload envelopes,
//! an aggregator that turns a multisig account's queue into display-ready
//! proposal records, and an orchestrator that resolves the front-of-queue
//! proposal (execute or reject) end to end: legality checks, confirmation,
//! simulation, signing, submission and finality.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use move_multisig::{
//!     fetch_pending, AccountAddress, ExplanationRegistry, Network, NetworkConfig, RestClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RestClient::new(NetworkConfig::preset(Network::MovementMainnet))?;
//!     let multisig = AccountAddress::from_hex("0xabc")?;
//!
//!     let listing =
//!         fetch_pending(&client, &ExplanationRegistry::default(), multisig, None).await?;
//!     for proposal in &listing.proposals {
//!         println!("#{}: {:?}", proposal.sequence_number, proposal.payload);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Addresses, type tags and decoded values
//! - [`codec`] - The typed argument codec
//! - [`payload`] - Payload envelope codec and explanations
//! - [`client`] - Fullnode REST API client
//! - [`account`] - Multisig account state and readiness views
//! - [`pending`] - Pending-proposal aggregation
//! - [`execute`] - Lifecycle orchestration (execute / reject / vote)
//! - [`signer`] - Transaction signing
//! - [`transaction`] - Outer transaction wire types

#![forbid(unsafe_code)]
#![warn(missing_debug_implementations, rust_2018_idioms)]

pub mod account;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod execute;
pub mod payload;
pub mod pending;
pub mod signer;
pub mod transaction;
pub mod types;

pub use account::{fetch_summary, MultisigAccountSummary};
pub use client::RestClient;
pub use config::{Network, NetworkConfig};
pub use error::{MultisigError, MultisigResult};
pub use execute::{
    annotate_front_simulation, resolve_next, submit_proposal, submit_vote, AutoApprove,
    ConfirmationPolicy, ExecutionOutcome, Intent,
};
pub use payload::{
    decode_multisig_payload, encode_multisig_payload, DecodedPayload, EntryFunctionCall,
    ExplanationRegistry, WireTypeTag,
};
pub use pending::{
    fetch_pending, PayloadState, PendingListing, PendingProposal, SimulationAnnotation, Vote,
};
pub use signer::{LocalSigner, TransactionSigner};
pub use types::{AccountAddress, DecodedValue, TypeTag};
