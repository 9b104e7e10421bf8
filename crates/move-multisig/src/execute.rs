//! Multisig transaction lifecycle orchestration.
//!
//! Drives a pending proposal through resolution: legality checks against
//! the on-chain vote tallies, interactive confirmation, transaction
//! construction, pre-submission simulation, signing, submission and
//! finality. Resolution is strictly first-in first-out; only the proposal
//! directly after the last resolved one can be acted on.

use crate::account;
use crate::client::RestClient;
use crate::error::{MultisigError, MultisigResult};
use crate::payload::decode_multisig_payload;
use crate::pending::{PendingListing, SimulationAnnotation};
use crate::signer::TransactionSigner;
use crate::transaction::{
    approve_transaction_call, create_transaction_call, execute_rejected_transaction_call,
    reject_transaction_call, RawTransaction, SignedTransaction, TransactionAuthenticator,
    TransactionPayload,
};
use crate::types::AccountAddress;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Gas ceiling for every transaction this tool submits.
const MAX_GAS_AMOUNT: u64 = 20_000;
/// How long a built transaction stays valid.
const EXPIRATION_WINDOW_SECS: u64 = 120;

/// Event type marking that a multisig's inner payload ran successfully.
const EXECUTION_SUCCEEDED_EVENT: &str =
    "0x1::multisig_account::TransactionExecutionSucceededEvent";
/// Event type marking removal of a sufficiently-rejected proposal.
const EXECUTE_REJECTED_EVENT: &str =
    "0x1::multisig_account::ExecuteRejectedTransactionEvent";

/// What the caller wants done with the front-of-queue proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Run the approved payload.
    Execute,
    /// Remove the rejected proposal from the queue.
    Reject,
}

impl Intent {
    fn action(self) -> &'static str {
        match self {
            Intent::Execute => "execute",
            Intent::Reject => "reject",
        }
    }
}

/// How logical success of a committed transaction is judged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SuccessCriterion {
    /// The inner payload ran: the execution-succeeded event must appear.
    /// The outer wrapper commits fine even when the inner payload aborts.
    ExecutionEvent,
    /// The rejected proposal left the queue: outer success or the
    /// execute-rejected event.
    RemovalEvent,
    /// Plain entry function with no inner payload; the outer success flag
    /// is the whole story.
    OuterStatus,
}

/// Decides whether a prepared action actually goes ahead.
///
/// The CLI implements this with an interactive prompt; tests and `--yes`
/// runs use [`AutoApprove`].
pub trait ConfirmationPolicy {
    /// Returns false to abort the action.
    fn confirm(&self, prompt: &str) -> MultisigResult<bool>;
}

/// Approves everything without asking.
#[derive(Debug)]
pub struct AutoApprove;

impl ConfirmationPolicy for AutoApprove {
    fn confirm(&self, _prompt: &str) -> MultisigResult<bool> {
        Ok(true)
    }
}

/// The result of a committed lifecycle action.
#[derive(Clone, Debug)]
pub struct ExecutionOutcome {
    /// Committed transaction hash.
    pub hash: String,
    /// Sequence number of the multisig proposal that was resolved, when the
    /// action targeted one.
    pub sequence_number: Option<u64>,
    /// Whether the intended effect actually happened on chain.
    ///
    /// For execution this comes from the framework's execution-succeeded
    /// event, not the outer success flag: the outer transaction commits
    /// successfully even when the inner payload aborts.
    pub logical_success: bool,
    /// VM status string of the committed transaction.
    pub vm_status: String,
}

/// Resolves the front-of-queue proposal of `multisig_address`.
///
/// The target sequence number is always `last_resolved + 1`. An intent the
/// vote tallies do not allow fails with
/// [`InsufficientVotes`](MultisigError::InsufficientVotes), hinting at the
/// action that is available instead.
pub async fn resolve_next(
    client: &RestClient,
    signer: &dyn TransactionSigner,
    confirmation: &dyn ConfirmationPolicy,
    multisig_address: AccountAddress,
    intent: Intent,
) -> MultisigResult<ExecutionOutcome> {
    let summary_response = account::fetch_summary(client, multisig_address, None).await?;
    let ledger_version = summary_response.ledger_version;
    let summary = summary_response.data;
    let target = summary.front_of_queue().ok_or_else(|| {
        MultisigError::NotFound(format!(
            "{} has no pending transactions",
            multisig_address.to_short_string()
        ))
    })?;

    let (executable, rejectable) =
        account::readiness(client, multisig_address, target, ledger_version).await?;
    debug!(target, executable, rejectable, "front-of-queue readiness");

    let legal = match intent {
        Intent::Execute => executable,
        Intent::Reject => rejectable,
    };
    if !legal {
        let hint = match intent {
            Intent::Execute if rejectable => {
                " (it has enough rejections; use reject instead)".to_string()
            }
            Intent::Reject if executable => {
                " (it has enough approvals; use execute instead)".to_string()
            }
            _ => String::new(),
        };
        return Err(MultisigError::InsufficientVotes {
            action: intent.action(),
            sequence_number: target,
            hint,
        });
    }

    let prompt = format!(
        "{} transaction {} of multisig {}?",
        intent.action(),
        target,
        multisig_address.to_short_string()
    );
    if !confirmation.confirm(&prompt)? {
        return Err(MultisigError::UserCancelled {
            action: intent.action(),
            sequence_number: target,
        });
    }

    let (payload, criterion) = match intent {
        Intent::Reject => (
            TransactionPayload::EntryFunction(execute_rejected_transaction_call(multisig_address)),
            SuccessCriterion::RemovalEvent,
        ),
        Intent::Execute => {
            let inner = next_transaction_payload(client, multisig_address, ledger_version).await?;
            (
                TransactionPayload::Multisig {
                    multisig_address,
                    inner_payload: Some(inner),
                },
                SuccessCriterion::ExecutionEvent,
            )
        }
    };

    let outcome = sign_and_submit(client, signer, payload, criterion).await?;
    Ok(ExecutionOutcome {
        sequence_number: Some(target),
        ..outcome
    })
}

/// Casts an approve or reject vote on proposal `sequence_number`.
pub async fn submit_vote(
    client: &RestClient,
    signer: &dyn TransactionSigner,
    multisig_address: AccountAddress,
    sequence_number: u64,
    approve: bool,
) -> MultisigResult<ExecutionOutcome> {
    let call = if approve {
        approve_transaction_call(multisig_address, sequence_number)
    } else {
        reject_transaction_call(multisig_address, sequence_number)
    };
    let outcome = sign_and_submit(
        client,
        signer,
        TransactionPayload::EntryFunction(call),
        SuccessCriterion::OuterStatus,
    )
    .await?;
    Ok(ExecutionOutcome {
        sequence_number: Some(sequence_number),
        ..outcome
    })
}

/// Proposes a new transaction carrying the given payload envelope bytes.
pub async fn submit_proposal(
    client: &RestClient,
    signer: &dyn TransactionSigner,
    multisig_address: AccountAddress,
    payload_envelope: Vec<u8>,
) -> MultisigResult<ExecutionOutcome> {
    let call = create_transaction_call(multisig_address, payload_envelope);
    sign_and_submit(
        client,
        signer,
        TransactionPayload::EntryFunction(call),
        SuccessCriterion::OuterStatus,
    )
    .await
}

// Fetches the front-of-queue payload bytes and decodes them, so execution
// always carries the exact stored payload.
async fn next_transaction_payload(
    client: &RestClient,
    multisig_address: AccountAddress,
    ledger_version: Option<u64>,
) -> MultisigResult<crate::payload::EntryFunctionCall> {
    let response = client
        .view(
            "0x1::multisig_account::get_next_transaction_payload",
            vec![],
            vec![
                serde_json::json!(multisig_address.to_canonical_string()),
                serde_json::json!("0x"),
            ],
            ledger_version,
        )
        .await?;
    let payload_hex = response
        .data
        .first()
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            MultisigError::Internal("get_next_transaction_payload returned no bytes".into())
        })?;
    let bytes = hex::decode(payload_hex.strip_prefix("0x").unwrap_or(payload_hex))?;
    decode_multisig_payload(&bytes)
}

/// Joins a best-effort dry-run outcome onto the front-of-queue proposal.
///
/// Purely advisory: any failure to produce the annotation leaves the
/// proposal unannotated instead of failing the listing.
pub async fn annotate_front_simulation(
    client: &RestClient,
    signer: &dyn TransactionSigner,
    listing: &mut PendingListing,
) {
    let Some(front) = listing.summary.front_of_queue() else {
        return;
    };
    let Some(proposal) = listing
        .proposals
        .iter_mut()
        .find(|p| p.sequence_number == front)
    else {
        return;
    };

    // An empty inner payload makes the node execute the stored one.
    let payload = TransactionPayload::Multisig {
        multisig_address: listing.summary.address,
        inner_payload: None,
    };
    let annotation = match build_raw_transaction(client, signer, payload).await {
        Ok(raw) => run_simulation(client, signer, &raw).await,
        Err(e) => Err(e),
    };
    match annotation {
        Ok(annotation) => proposal.simulation = Some(annotation),
        Err(e) => debug!(error = %e, "skipping simulation annotation"),
    }
}

async fn build_raw_transaction(
    client: &RestClient,
    signer: &dyn TransactionSigner,
    payload: TransactionPayload,
) -> MultisigResult<RawTransaction> {
    let sender = signer.address();
    let (sequence_number, gas_price) = tokio::join!(
        client.get_sequence_number(sender),
        client.estimate_gas_price(),
    );
    let sequence_number = sequence_number?;
    let gas_unit_price = gas_price?.data.gas_estimate;

    let chain_id = match client.config().chain_id {
        0 => client.get_ledger_info().await?.data.chain_id,
        id => id,
    };
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
        + EXPIRATION_WINDOW_SECS;

    Ok(RawTransaction {
        sender,
        sequence_number,
        payload,
        max_gas_amount: MAX_GAS_AMOUNT,
        gas_unit_price,
        expiration_timestamp_secs: expiration,
        chain_id,
    })
}

async fn sign_and_submit(
    client: &RestClient,
    signer: &dyn TransactionSigner,
    payload: TransactionPayload,
    criterion: SuccessCriterion,
) -> MultisigResult<ExecutionOutcome> {
    let raw = build_raw_transaction(client, signer, payload).await?;

    simulate(client, signer, &raw).await?;

    let authenticator = signer.sign_transaction(&raw)?;
    let signed = SignedTransaction::new(raw, authenticator);
    debug!("submitting transaction");
    let pending = client
        .submit_transaction(signed.to_bytes())
        .await
        .map_err(|e| match e {
            MultisigError::Api { message, .. } => MultisigError::SubmissionFailed(message),
            other => other,
        })?;
    let hash = pending.data.hash;
    info!(txn_hash = %hash, "transaction submitted");

    let committed = client.wait_for_transaction(&hash, None).await?;
    let txn_type = committed
        .data
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    if txn_type != "user_transaction" {
        return Err(MultisigError::NonUserTransaction(txn_type.to_string()));
    }

    let vm_status = committed
        .data
        .get("vm_status")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();
    let outer_success = committed
        .data
        .get("success")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);
    let logical_success = match criterion {
        SuccessCriterion::ExecutionEvent => has_event(&committed.data, EXECUTION_SUCCEEDED_EVENT),
        SuccessCriterion::RemovalEvent => {
            outer_success || has_event(&committed.data, EXECUTE_REJECTED_EVENT)
        }
        SuccessCriterion::OuterStatus => outer_success,
    };
    if !logical_success {
        warn!(txn_hash = %hash, vm_status = %vm_status, "transaction committed without its intended effect");
    }

    Ok(ExecutionOutcome {
        hash,
        sequence_number: None,
        logical_success,
        vm_status,
    })
}

fn has_event(committed: &serde_json::Value, event_type: &str) -> bool {
    committed
        .get("events")
        .and_then(|v| v.as_array())
        .map(|events| {
            events
                .iter()
                .any(|e| e.get("type").and_then(|t| t.as_str()) == Some(event_type))
        })
        .unwrap_or(false)
}

// Gate on the dry run, honoring the per-network leniency flag.
async fn simulate(
    client: &RestClient,
    signer: &dyn TransactionSigner,
    raw: &RawTransaction,
) -> MultisigResult<()> {
    let result = run_simulation(client, signer, raw).await?;
    if result.success {
        return Ok(());
    }
    if client.config().lenient_simulation {
        warn!(vm_status = %result.vm_status, "simulation failed; continuing because this network's simulation is advisory");
        Ok(())
    } else {
        Err(MultisigError::SimulationFailed(result.vm_status))
    }
}

// Simulation uses the real public key with a zeroed signature, which nodes
// require for simulated transactions.
async fn run_simulation(
    client: &RestClient,
    signer: &dyn TransactionSigner,
    raw: &RawTransaction,
) -> MultisigResult<SimulationAnnotation> {
    let TransactionAuthenticator::Ed25519 { public_key, .. } = signer.sign_transaction(raw)?;
    let unsigned = SignedTransaction::new(
        raw.clone(),
        TransactionAuthenticator::Ed25519 {
            public_key,
            signature: vec![0u8; 64],
        },
    );

    let results = client.simulate_transaction(unsigned.to_bytes()).await?;
    let result = results
        .data
        .first()
        .ok_or_else(|| MultisigError::Internal("simulation returned no results".into()))?;
    let success = result
        .get("success")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);
    let vm_status = result
        .get("vm_status")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();
    Ok(SimulationAnnotation { success, vm_status })
}
