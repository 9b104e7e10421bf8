//! Pending-transaction aggregator.
//!
//! Collects a multisig account's unresolved proposals into display-ready
//! records. All reads for one listing are pinned to the ledger version the
//! first read was served at, so the queue, the per-proposal records and the
//! vote tallies describe a single consistent snapshot even while the chain
//! advances underneath.

use crate::account::{self, MultisigAccountSummary};
use crate::client::RestClient;
use crate::error::{MultisigError, MultisigResult};
use crate::payload::{decode_call, decode_multisig_payload, DecodedPayload, ExplanationRegistry};
use crate::types::AccountAddress;
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, warn};

/// What we know about a proposal's payload.
#[derive(Clone, Debug, PartialEq)]
pub enum PayloadState {
    /// Fully decoded against the on-chain ABI.
    Decoded(DecodedPayload),
    /// The proposal stores only a payload hash; the bytes live off chain.
    HashOnly { hash: String },
    /// The payload bytes were present but could not be decoded.
    Undecodable { reason: String },
}

/// Best-effort dry-run outcome joined onto a proposal for display.
///
/// This is advisory data, not part of the on-chain record; proposals carry
/// it only when a simulation was actually run (see
/// [`annotate_front_simulation`](crate::execute::annotate_front_simulation)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationAnnotation {
    pub success: bool,
    pub vm_status: String,
}

/// One owner's recorded vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vote {
    pub voter: AccountAddress,
    pub approved: bool,
}

impl Vote {
    /// Renders `<addressOrAlias> <mark>` using the alias map.
    pub fn display_line(&self, aliases: &HashMap<AccountAddress, String>) -> String {
        let who = aliases
            .get(&self.voter)
            .cloned()
            .unwrap_or_else(|| self.voter.to_short_string());
        let mark = if self.approved { "✓" } else { "✗" };
        format!("{who} {mark}")
    }
}

/// A pending proposal, ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingProposal {
    pub sequence_number: u64,
    pub creator: AccountAddress,
    pub creation_time_secs: u64,
    pub votes: Vec<Vote>,
    pub payload: PayloadState,
    /// Advisory dry-run outcome, absent unless a simulation was joined on.
    pub simulation: Option<SimulationAnnotation>,
}

impl PendingProposal {
    /// Count of approving votes.
    pub fn approvals(&self) -> usize {
        self.votes.iter().filter(|v| v.approved).count()
    }

    /// Count of rejecting votes.
    pub fn rejections(&self) -> usize {
        self.votes.iter().filter(|v| !v.approved).count()
    }

    /// JSON projection for machine-readable output.
    pub fn to_json(&self, aliases: &HashMap<AccountAddress, String>) -> serde_json::Value {
        let payload = match &self.payload {
            PayloadState::Decoded(decoded) => decoded.to_json(),
            PayloadState::HashOnly { hash } => serde_json::json!({ "payload_hash": hash }),
            PayloadState::Undecodable { reason } => serde_json::json!({ "undecodable": reason }),
        };
        let mut value = serde_json::json!({
            "sequence_number": self.sequence_number,
            "creator": self.creator.to_canonical_string(),
            "creation_time_secs": self.creation_time_secs,
            "votes": self.votes.iter().map(|v| v.display_line(aliases)).collect::<Vec<_>>(),
            "payload": payload,
        });
        if let Some(simulation) = &self.simulation {
            value["simulation"] = serde_json::json!({
                "success": simulation.success,
                "vm_status": simulation.vm_status,
            });
        }
        value
    }
}

/// A listing plus the account snapshot it was taken against.
#[derive(Clone, Debug)]
pub struct PendingListing {
    pub summary: MultisigAccountSummary,
    pub proposals: Vec<PendingProposal>,
    /// Ledger version every read in this listing was pinned to.
    pub ledger_version: Option<u64>,
}

/// Fetches pending proposals for a multisig account.
///
/// With an explicit sequence number only that record is fetched; otherwise
/// every unresolved proposal is fetched concurrently and returned ascending
/// by sequence number. A proposal whose payload cannot be decoded is
/// reported as [`PayloadState::Undecodable`] without failing its siblings;
/// transport errors still fail the whole listing.
pub async fn fetch_pending(
    client: &RestClient,
    registry: &ExplanationRegistry,
    multisig_address: AccountAddress,
    sequence_number: Option<u64>,
) -> MultisigResult<PendingListing> {
    let summary_response = account::fetch_summary(client, multisig_address, None).await?;
    let ledger_version = summary_response.ledger_version;
    let summary = summary_response.data;

    let targets: Vec<u64> = match sequence_number {
        Some(seq) => vec![seq],
        None => summary.pending_range().collect(),
    };
    debug!(
        multisig = %multisig_address.to_short_string(),
        count = targets.len(),
        ledger_version,
        "fetching pending proposals"
    );

    let fetches = targets.iter().map(|&seq| {
        fetch_proposal(client, registry, multisig_address, seq, ledger_version)
    });
    let mut proposals = Vec::with_capacity(targets.len());
    for result in join_all(fetches).await {
        proposals.push(result?);
    }
    proposals.sort_by_key(|p| p.sequence_number);

    Ok(PendingListing {
        summary,
        proposals,
        ledger_version,
    })
}

/// Fetches and decodes a single proposal record.
pub async fn fetch_proposal(
    client: &RestClient,
    registry: &ExplanationRegistry,
    multisig_address: AccountAddress,
    sequence_number: u64,
    ledger_version: Option<u64>,
) -> MultisigResult<PendingProposal> {
    let response = client
        .view(
            "0x1::multisig_account::get_transaction",
            vec![],
            vec![
                serde_json::json!(multisig_address.to_canonical_string()),
                serde_json::json!(sequence_number.to_string()),
            ],
            ledger_version,
        )
        .await?;
    let record = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| MultisigError::Internal("get_transaction returned no record".into()))?;

    let creator = record
        .get("creator")
        .and_then(|v| v.as_str())
        .ok_or_else(|| MultisigError::Internal("transaction record has no creator".into()))
        .and_then(|s| AccountAddress::from_hex(s))?;
    let creation_time_secs = record
        .get("creation_time_secs")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let votes = parse_votes(&record)?;
    let payload = resolve_payload(client, registry, &record).await?;

    Ok(PendingProposal {
        sequence_number,
        creator,
        creation_time_secs,
        votes,
        payload,
        simulation: None,
    })
}

// Vote maps arrive as `{"data": [{"key": addr, "value": bool}, ...]}`.
fn parse_votes(record: &serde_json::Value) -> MultisigResult<Vec<Vote>> {
    let entries = match record.pointer("/votes/data").and_then(|v| v.as_array()) {
        Some(entries) => entries,
        None => return Ok(Vec::new()),
    };
    let mut votes = Vec::with_capacity(entries.len());
    for entry in entries {
        let voter = entry
            .get("key")
            .and_then(|v| v.as_str())
            .ok_or_else(|| MultisigError::Internal("vote entry has no key".into()))
            .and_then(AccountAddress::from_hex)?;
        let approved = entry
            .get("value")
            .and_then(serde_json::Value::as_bool)
            .ok_or_else(|| MultisigError::Internal("vote entry has no bool value".into()))?;
        votes.push(Vote { voter, approved });
    }
    Ok(votes)
}

// Optional fields arrive as `{"vec": []}` or `{"vec": [value]}`.
fn option_field<'a>(record: &'a serde_json::Value, field: &str) -> Option<&'a str> {
    record
        .pointer(&format!("/{field}/vec/0"))
        .and_then(|v| v.as_str())
}

async fn resolve_payload(
    client: &RestClient,
    registry: &ExplanationRegistry,
    record: &serde_json::Value,
) -> MultisigResult<PayloadState> {
    let Some(payload_hex) = option_field(record, "payload") else {
        if let Some(hash) = option_field(record, "payload_hash") {
            return Ok(PayloadState::HashOnly {
                hash: hash.to_string(),
            });
        }
        return Ok(PayloadState::Undecodable {
            reason: "record carries neither payload nor payload hash".to_string(),
        });
    };

    match decode_stored_payload(client, registry, payload_hex).await {
        Ok(decoded) => Ok(PayloadState::Decoded(decoded)),
        Err(e) if e.is_decode_error() => {
            warn!(error = %e, "payload could not be decoded");
            Ok(PayloadState::Undecodable {
                reason: e.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

/// Decodes stored payload envelope hex into a display-ready payload,
/// resolving parameter types from the on-chain ABI.
pub async fn decode_stored_payload(
    client: &RestClient,
    registry: &ExplanationRegistry,
    payload_hex: &str,
) -> MultisigResult<DecodedPayload> {
    let bytes = hex::decode(payload_hex.strip_prefix("0x").unwrap_or(payload_hex))?;
    let call = decode_multisig_payload(&bytes)?;
    let param_tags = client
        .entry_function_abi(call.module_address, &call.module_name, &call.function_name)
        .await?;
    decode_call(&call, &param_tags, registry)
}
