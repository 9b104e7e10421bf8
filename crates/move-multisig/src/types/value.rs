//! The semantic result of decoding one argument.

use crate::types::AccountAddress;
use num_bigint::BigUint;
use std::fmt;

/// A decoded argument value.
///
/// The shape is fully determined by the [`TypeTag`] that produced it:
/// widths up to 32 bits use machine integers, widths of 64 bits and above
/// use an arbitrary-precision integer so no value is ever truncated on its
/// way to display or JSON. `Vector(U8)` decodes to [`Bytes`], every other
/// vector to [`Vector`].
///
/// [`TypeTag`]: crate::types::TypeTag
/// [`Bytes`]: DecodedValue::Bytes
/// [`Vector`]: DecodedValue::Vector
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodedValue {
    /// Boolean.
    Bool(bool),
    /// 8-bit unsigned integer.
    U8(u8),
    /// 16-bit unsigned integer.
    U16(u16),
    /// 32-bit unsigned integer.
    U32(u32),
    /// 64-, 128- or 256-bit unsigned integer, arbitrary precision.
    Uint(BigUint),
    /// Canonical 32-byte address.
    Address(AccountAddress),
    /// Raw byte sequence (from `vector<u8>`).
    Bytes(Vec<u8>),
    /// UTF-8 string (from `0x1::string::String`).
    Str(String),
    /// Homogeneous sequence, in encounter order.
    Vector(Vec<DecodedValue>),
    /// Present or absent optional value.
    Option(Option<Box<DecodedValue>>),
}

impl DecodedValue {
    /// Convenience constructor for a big unsigned integer.
    pub fn uint(v: u64) -> Self {
        DecodedValue::Uint(BigUint::from(v))
    }

    /// A short name for this value's shape, used in mismatch errors.
    pub fn shape(&self) -> &'static str {
        match self {
            DecodedValue::Bool(_) => "bool",
            DecodedValue::U8(_) => "u8",
            DecodedValue::U16(_) => "u16",
            DecodedValue::U32(_) => "u32",
            DecodedValue::Uint(_) => "uint",
            DecodedValue::Address(_) => "address",
            DecodedValue::Bytes(_) => "bytes",
            DecodedValue::Str(_) => "string",
            DecodedValue::Vector(_) => "vector",
            DecodedValue::Option(_) => "option",
        }
    }

    /// Projects the value into JSON for machine-readable output.
    ///
    /// Big integers and byte blobs follow the node API conventions: decimal
    /// strings for the former, `0x`-prefixed hex for the latter.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DecodedValue::Bool(b) => serde_json::Value::Bool(*b),
            DecodedValue::U8(v) => serde_json::json!(v),
            DecodedValue::U16(v) => serde_json::json!(v),
            DecodedValue::U32(v) => serde_json::json!(v),
            DecodedValue::Uint(v) => serde_json::Value::String(v.to_string()),
            DecodedValue::Address(a) => serde_json::Value::String(a.to_canonical_string()),
            DecodedValue::Bytes(b) => serde_json::Value::String(format!("0x{}", hex::encode(b))),
            DecodedValue::Str(s) => serde_json::Value::String(s.clone()),
            DecodedValue::Vector(items) => {
                serde_json::Value::Array(items.iter().map(DecodedValue::to_json).collect())
            }
            DecodedValue::Option(inner) => match inner {
                Some(v) => v.to_json(),
                None => serde_json::Value::Null,
            },
        }
    }
}

// Display is the human-readable argument rendering used by the CLI's
// proposal listings.
impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Bool(b) => write!(f, "{b}"),
            DecodedValue::U8(v) => write!(f, "{v}"),
            DecodedValue::U16(v) => write!(f, "{v}"),
            DecodedValue::U32(v) => write!(f, "{v}"),
            DecodedValue::Uint(v) => write!(f, "{v}"),
            DecodedValue::Address(a) => write!(f, "{}", a.to_short_string()),
            DecodedValue::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            DecodedValue::Str(s) => write!(f, "\"{s}\""),
            DecodedValue::Vector(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            DecodedValue::Option(inner) => match inner {
                Some(v) => write!(f, "some({v})"),
                None => write!(f, "none"),
            },
        }
    }
}
