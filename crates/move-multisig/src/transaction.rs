//! Outer transaction wire types.
//!
//! These are the structures that actually cross the wire to the node:
//! a raw transaction, its payload, and the signed envelope around both.
//! Encoding is canonical binary form throughout, built with the same
//! writer the argument codec uses.

use crate::codec::BcsWriter;
use crate::payload::{encode_multisig_payload, EntryFunctionCall, WireTypeTag};
use crate::types::AccountAddress;
use sha3::{Digest, Sha3_256};

// Outer payload enum variants. 0 (Script) and 1 (ModuleBundle, deprecated)
// exist on the wire but are never produced here.
const PAYLOAD_ENTRY_FUNCTION: u64 = 2;
const PAYLOAD_MULTISIG: u64 = 3;

const AUTHENTICATOR_ED25519: u64 = 0;

/// Domain separator prefixed to a raw transaction's bytes before signing.
const SIGNING_PREFIX: &str = "APTOS::RawTransaction";

/// What a transaction asks the chain to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionPayload {
    /// A direct entry-function call by the sender.
    EntryFunction(EntryFunctionCall),
    /// An execution of a multisig account's approved transaction.
    ///
    /// `inner_payload` carries the stored payload envelope bytes when the
    /// proposal stores the full payload, or nothing when it stores only a
    /// hash and the executor provides the payload out of band.
    Multisig {
        multisig_address: AccountAddress,
        inner_payload: Option<EntryFunctionCall>,
    },
}

impl TransactionPayload {
    fn encode(&self, writer: &mut BcsWriter) {
        match self {
            TransactionPayload::EntryFunction(call) => {
                writer.write_uleb128(PAYLOAD_ENTRY_FUNCTION);
                call.encode_body(writer);
            }
            TransactionPayload::Multisig {
                multisig_address,
                inner_payload,
            } => {
                writer.write_uleb128(PAYLOAD_MULTISIG);
                writer.write_bytes(multisig_address.as_bytes());
                match inner_payload {
                    Some(call) => {
                        writer.write_u8(1);
                        writer.write_bytes(&encode_multisig_payload(call));
                    }
                    None => writer.write_u8(0),
                }
            }
        }
    }
}

/// An unsigned transaction, ready for signing and submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTransaction {
    pub sender: AccountAddress,
    pub sequence_number: u64,
    pub payload: TransactionPayload,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_timestamp_secs: u64,
    pub chain_id: u8,
}

impl RawTransaction {
    /// Canonical bytes of the raw transaction.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BcsWriter::new();
        writer.write_bytes(self.sender.as_bytes());
        writer.write_bytes(&self.sequence_number.to_le_bytes());
        self.payload.encode(&mut writer);
        writer.write_bytes(&self.max_gas_amount.to_le_bytes());
        writer.write_bytes(&self.gas_unit_price.to_le_bytes());
        writer.write_bytes(&self.expiration_timestamp_secs.to_le_bytes());
        writer.write_u8(self.chain_id);
        writer.into_bytes()
    }

    /// The message a signer actually signs: a domain-separation hash
    /// followed by the transaction bytes.
    pub fn signing_message(&self) -> Vec<u8> {
        let mut sha3 = Sha3_256::new();
        sha3.update(SIGNING_PREFIX.as_bytes());
        let mut message = sha3.finalize().to_vec();
        message.extend(self.to_bytes());
        message
    }
}

/// Proof of who authorized a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionAuthenticator {
    /// Single Ed25519 key: 32-byte public key, 64-byte signature.
    Ed25519 {
        public_key: Vec<u8>,
        signature: Vec<u8>,
    },
}

impl TransactionAuthenticator {
    fn encode(&self, writer: &mut BcsWriter) {
        match self {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => {
                writer.write_uleb128(AUTHENTICATOR_ED25519);
                writer.write_prefixed_bytes(public_key);
                writer.write_prefixed_bytes(signature);
            }
        }
    }
}

/// A raw transaction plus its authenticator, ready to submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: RawTransaction,
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// Creates a signed transaction.
    pub fn new(raw: RawTransaction, authenticator: TransactionAuthenticator) -> Self {
        Self { raw, authenticator }
    }

    /// Canonical bytes for submission and simulation.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BcsWriter::new();
        writer.write_bytes(&self.raw.to_bytes());
        self.authenticator.encode(&mut writer);
        writer.into_bytes()
    }
}

fn multisig_module_call(
    function_name: &str,
    args: Vec<Vec<u8>>,
) -> EntryFunctionCall {
    EntryFunctionCall {
        module_address: AccountAddress::ONE,
        module_name: "multisig_account".to_string(),
        function_name: function_name.to_string(),
        type_args: Vec::<WireTypeTag>::new(),
        args,
    }
}

fn encoded_address(address: AccountAddress) -> Vec<u8> {
    address.as_bytes().to_vec()
}

fn encoded_u64(value: u64) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

/// A vote approving pending transaction `sequence_number`.
pub fn approve_transaction_call(
    multisig_address: AccountAddress,
    sequence_number: u64,
) -> EntryFunctionCall {
    multisig_module_call(
        "approve_transaction",
        vec![encoded_address(multisig_address), encoded_u64(sequence_number)],
    )
}

/// A vote rejecting pending transaction `sequence_number`.
pub fn reject_transaction_call(
    multisig_address: AccountAddress,
    sequence_number: u64,
) -> EntryFunctionCall {
    multisig_module_call(
        "reject_transaction",
        vec![encoded_address(multisig_address), encoded_u64(sequence_number)],
    )
}

/// Removes the front-of-queue transaction after sufficient rejections.
pub fn execute_rejected_transaction_call(
    multisig_address: AccountAddress,
) -> EntryFunctionCall {
    multisig_module_call(
        "execute_rejected_transaction",
        vec![encoded_address(multisig_address)],
    )
}

/// Proposes a new transaction carrying the full payload envelope bytes.
pub fn create_transaction_call(
    multisig_address: AccountAddress,
    payload_envelope: Vec<u8>,
) -> EntryFunctionCall {
    let mut encoded_payload = BcsWriter::new();
    encoded_payload.write_prefixed_bytes(&payload_envelope);
    multisig_module_call(
        "create_transaction",
        vec![encoded_address(multisig_address), encoded_payload.into_bytes()],
    )
}
