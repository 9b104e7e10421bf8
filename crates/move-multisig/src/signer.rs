//! Transaction signing.
//!
//! [`TransactionSigner`] is the seam between the orchestrator and key
//! material: the orchestrator hands over a raw transaction and gets back an
//! authenticator, without caring where the key lives. [`LocalSigner`] is the
//! in-process implementation over an Ed25519 keypair; remote or hardware
//! signers can implement the same trait.

use crate::error::{MultisigError, MultisigResult};
use crate::transaction::{RawTransaction, TransactionAuthenticator};
use crate::types::AccountAddress;
use ed25519_dalek::{Keypair, PublicKey, SecretKey, Signer as _};
use sha3::{Digest, Sha3_256};

// Scheme identifier appended to the public key when deriving the
// authentication key for a single Ed25519 key.
const ED25519_SCHEME: u8 = 0;

/// Anything that can authorize a raw transaction.
pub trait TransactionSigner {
    /// The account address this signer acts as.
    fn address(&self) -> AccountAddress;

    /// Produces the authenticator for a raw transaction.
    fn sign_transaction(
        &self,
        transaction: &RawTransaction,
    ) -> MultisigResult<TransactionAuthenticator>;
}

/// An in-process Ed25519 signer.
pub struct LocalSigner {
    keypair: Keypair,
    address: AccountAddress,
}

// Key material stays out of debug output.
impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl LocalSigner {
    /// Creates a signer from a 32-byte private key in hex, with or without a
    /// `0x` prefix.
    ///
    /// The account address is derived from the public key; for accounts that
    /// have rotated their key, use [`with_address`](Self::with_address) to
    /// override it.
    pub fn from_private_key_hex(private_key: &str) -> MultisigResult<Self> {
        let digits = private_key
            .strip_prefix("0x")
            .unwrap_or(private_key)
            .trim();
        let bytes = hex::decode(digits)?;
        let secret = SecretKey::from_bytes(&bytes)
            .map_err(|e| MultisigError::Internal(format!("invalid private key: {e}")))?;
        let public = PublicKey::from(&secret);
        let address = derive_address(&public);
        Ok(Self {
            keypair: Keypair { secret, public },
            address,
        })
    }

    /// Generates a fresh random keypair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let keypair = Keypair::generate(&mut csprng);
        let address = derive_address(&keypair.public);
        Self { keypair, address }
    }

    /// Overrides the derived address, for rotated-key accounts.
    pub fn with_address(mut self, address: AccountAddress) -> Self {
        self.address = address;
        self
    }

    /// The signer's public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.keypair.public.to_bytes()
    }
}

impl TransactionSigner for LocalSigner {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn sign_transaction(
        &self,
        transaction: &RawTransaction,
    ) -> MultisigResult<TransactionAuthenticator> {
        let message = transaction.signing_message();
        let signature = self.keypair.sign(&message);
        Ok(TransactionAuthenticator::Ed25519 {
            public_key: self.keypair.public.to_bytes().to_vec(),
            signature: signature.to_bytes().to_vec(),
        })
    }
}

/// Derives the account address from a public key: the hash of the key bytes
/// followed by the scheme identifier.
fn derive_address(public: &PublicKey) -> AccountAddress {
    let mut sha3 = Sha3_256::new();
    sha3.update(public.as_bytes());
    sha3.update([ED25519_SCHEME]);
    let digest: [u8; 32] = sha3.finalize().into();
    AccountAddress::new(digest)
}
