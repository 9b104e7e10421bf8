//! Account address type.
//!
//! Addresses are 32-byte values. The canonical display form used everywhere
//! in this crate (vote attribution, alias lookup, explorer links) is the
//! zero-padded lowercase hex string with a `0x` prefix.

use crate::error::{MultisigError, MultisigResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte account address on a Move-based chain.
///
/// # Example
///
/// ```rust
/// use move_multisig::AccountAddress;
///
/// let addr = AccountAddress::from_hex("0x1").unwrap();
/// assert_eq!(
///     addr.to_canonical_string(),
///     "0x0000000000000000000000000000000000000000000000000000000000000001"
/// );
/// assert_eq!(addr.to_short_string(), "0x1");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    /// The "zero" address (all zeros).
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    /// The framework address (0x1), home of the multisig account module.
    pub const ONE: Self = {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = 1;
        Self(bytes)
    };

    /// Creates an address from a byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses an address from a hex string, with or without a `0x` prefix.
    ///
    /// Short forms (like `0x1`) are zero-padded on the left. Empty input and
    /// a bare `0x` are rejected.
    pub fn from_hex<T: AsRef<str>>(hex_str: T) -> MultisigResult<Self> {
        let raw = hex_str.as_ref();
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);

        if digits.is_empty() {
            return Err(MultisigError::InvalidAddress(
                "address must contain at least one hex digit".to_string(),
            ));
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(MultisigError::InvalidAddress(format!(
                "address too long: {} characters (max {})",
                digits.len(),
                ADDRESS_LENGTH * 2
            )));
        }

        let padded = format!("{digits:0>64}");
        let bytes = hex::decode(padded.to_lowercase())?;

        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&bytes);
        Ok(Self(address))
    }

    /// Creates an address from a byte slice of exactly 32 bytes.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> MultisigResult<Self> {
        let bytes = bytes.as_ref();
        if bytes.len() != ADDRESS_LENGTH {
            return Err(MultisigError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            )));
        }
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(bytes);
        Ok(Self(address))
    }

    /// Returns the address as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the address as a byte array.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    /// Returns the canonical display form: 64 lowercase hex digits with a
    /// `0x` prefix.
    pub fn to_canonical_string(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Returns a short hex string with leading zeros trimmed.
    pub fn to_short_string(&self) -> String {
        let hex = hex::encode(self.0);
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{trimmed}")
        }
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_short_string())
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for AccountAddress {
    type Err = MultisigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for AccountAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_pads_short_addresses() {
        let addr = AccountAddress::from_hex("0x1").unwrap();
        assert_eq!(addr, AccountAddress::ONE);

        let full = AccountAddress::from_hex(
            "0x0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        assert_eq!(full, AccountAddress::ONE);

        let bare = AccountAddress::from_hex("1").unwrap();
        assert_eq!(bare, AccountAddress::ONE);
    }

    #[test]
    fn from_hex_accepts_uppercase() {
        let addr = AccountAddress::from_hex("0XABC").unwrap();
        assert_eq!(addr.to_short_string(), "0xabc");
    }

    #[test]
    fn from_hex_rejects_empty_and_bare_prefix() {
        assert!(AccountAddress::from_hex("").is_err());
        assert!(AccountAddress::from_hex("0x").is_err());
    }

    #[test]
    fn from_hex_rejects_too_long() {
        let too_long = "0x".to_string() + &"a".repeat(65);
        assert!(AccountAddress::from_hex(too_long).is_err());
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        assert!(AccountAddress::from_hex("not_hex").is_err());
    }

    #[test]
    fn canonical_string_is_fixed_length_lowercase() {
        let addr = AccountAddress::from_hex("0xAbC").unwrap();
        let canonical = addr.to_canonical_string();
        assert_eq!(canonical.len(), 2 + ADDRESS_LENGTH * 2);
        assert_eq!(canonical, canonical.to_lowercase());
        assert!(canonical.starts_with("0x"));
    }

    #[test]
    fn short_string_trims_zeros() {
        assert_eq!(AccountAddress::ONE.to_short_string(), "0x1");
        assert_eq!(AccountAddress::ZERO.to_short_string(), "0x0");
    }

    #[test]
    fn from_bytes_roundtrip() {
        let addr = AccountAddress::new([42u8; ADDRESS_LENGTH]);
        let again = AccountAddress::from_bytes(addr.as_bytes()).unwrap();
        assert_eq!(addr, again);
    }

    #[test]
    fn from_bytes_wrong_length_fails() {
        assert!(AccountAddress::from_bytes([0u8; 16]).is_err());
    }

    #[test]
    fn json_serialization_uses_canonical_form() {
        let addr = AccountAddress::ONE;
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(
            json,
            "\"0x0000000000000000000000000000000000000000000000000000000000000001\""
        );
        let parsed: AccountAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);
    }
}
