//! The closed set of argument type descriptors.
//!
//! Entry-function ABIs declare each parameter's type as a string like
//! `"u64"`, `"vector<u8>"` or `"0x1::option::Option<address>"`. [`TypeTag`]
//! models the subset of those shapes this tool can decode and encode; every
//! codec routine dispatches on it with an exhaustive match, so an ABI shape
//! outside the set surfaces as [`UnsupportedTypeTag`] at parse time instead
//! of a silent fallthrough deeper down.
//!
//! [`UnsupportedTypeTag`]: crate::error::MultisigError::UnsupportedTypeTag

use crate::error::{MultisigError, MultisigResult};
use crate::types::AccountAddress;
use std::fmt;

/// A closed descriptor of an argument's declared type.
///
/// Recursive: `Vector`, `Option` and `Object` carry an inner tag. Depth is
/// unbounded but finite; the codec handles arbitrary nesting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeTag {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// 128-bit unsigned integer.
    U128,
    /// 256-bit unsigned integer.
    U256,
    /// Boolean.
    Bool,
    /// 32-byte account address.
    Address,
    /// Homogeneous sequence of the inner type.
    Vector(Box<TypeTag>),
    /// Optional value of the inner type (`0x1::option::Option<T>`).
    Option(Box<TypeTag>),
    /// UTF-8 string wrapper (`0x1::string::String`).
    String,
    /// Object pointer (`0x1::object::Object<T>`). Encoded as an address;
    /// the inner tag is decoration only and never consulted during decode.
    Object(Box<TypeTag>),
}

impl TypeTag {
    /// Parses a type tag from the node API's textual form.
    ///
    /// Returns `UnsupportedTypeTag` for anything outside the closed set,
    /// including `signer`/`&signer` (callers filter those out of ABIs before
    /// decoding) and struct types other than the two known wrappers.
    pub fn parse(s: &str) -> MultisigResult<Self> {
        let s = s.trim();
        match s {
            "u8" => return Ok(TypeTag::U8),
            "u16" => return Ok(TypeTag::U16),
            "u32" => return Ok(TypeTag::U32),
            "u64" => return Ok(TypeTag::U64),
            "u128" => return Ok(TypeTag::U128),
            "u256" => return Ok(TypeTag::U256),
            "bool" => return Ok(TypeTag::Bool),
            "address" => return Ok(TypeTag::Address),
            _ => {}
        }

        if let Some(inner) = generic_param(s, "vector") {
            return Ok(TypeTag::Vector(Box::new(Self::parse(inner)?)));
        }

        // Struct forms. Normalize the address part so "0x1" and the padded
        // form compare equal.
        if let Some((addr, module, rest)) = split_struct(s) {
            if addr == AccountAddress::ONE {
                match (module, rest) {
                    ("string", "String") => return Ok(TypeTag::String),
                    ("option", name_and_args) => {
                        if let Some(inner) = generic_param(name_and_args, "Option") {
                            return Ok(TypeTag::Option(Box::new(Self::parse(inner)?)));
                        }
                    }
                    ("object", name_and_args) => {
                        if let Some(inner) = generic_param(name_and_args, "Object") {
                            return Ok(TypeTag::Object(Box::new(Self::parse(inner)?)));
                        }
                    }
                    _ => {}
                }
            }
        }

        Err(MultisigError::UnsupportedTypeTag(s.to_string()))
    }

    /// Returns true if this tag is `vector<u8>`.
    pub fn is_byte_vector(&self) -> bool {
        matches!(self, TypeTag::Vector(inner) if **inner == TypeTag::U8)
    }
}

/// If `s` is `name<...>` with balanced brackets, returns the inner `...`.
fn generic_param<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(name)?;
    let rest = rest.strip_prefix('<')?;
    let rest = rest.strip_suffix('>')?;
    Some(rest)
}

/// Splits `0xADDR::module::Rest` into its three parts. `Rest` keeps any
/// generic suffix attached (e.g. `Option<u64>`).
fn split_struct(s: &str) -> Option<(AccountAddress, &str, &str)> {
    let (addr_str, rest) = s.split_once("::")?;
    let (module, name) = rest.split_once("::")?;
    let addr = AccountAddress::from_hex(addr_str).ok()?;
    Some((addr, module, name))
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::U256 => write!(f, "u256"),
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Vector(inner) => write!(f, "vector<{inner}>"),
            TypeTag::Option(inner) => write!(f, "0x1::option::Option<{inner}>"),
            TypeTag::String => write!(f, "0x1::string::String"),
            TypeTag::Object(inner) => write!(f, "0x1::object::Object<{inner}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_primitives() {
        assert_eq!(TypeTag::parse("u8").unwrap(), TypeTag::U8);
        assert_eq!(TypeTag::parse("u16").unwrap(), TypeTag::U16);
        assert_eq!(TypeTag::parse("u32").unwrap(), TypeTag::U32);
        assert_eq!(TypeTag::parse("u64").unwrap(), TypeTag::U64);
        assert_eq!(TypeTag::parse("u128").unwrap(), TypeTag::U128);
        assert_eq!(TypeTag::parse("u256").unwrap(), TypeTag::U256);
        assert_eq!(TypeTag::parse("bool").unwrap(), TypeTag::Bool);
        assert_eq!(TypeTag::parse("address").unwrap(), TypeTag::Address);
    }

    #[test]
    fn parse_vector_nesting() {
        assert_eq!(
            TypeTag::parse("vector<u8>").unwrap(),
            TypeTag::Vector(Box::new(TypeTag::U8))
        );
        assert_eq!(
            TypeTag::parse("vector<vector<vector<u64>>>").unwrap(),
            TypeTag::Vector(Box::new(TypeTag::Vector(Box::new(TypeTag::Vector(
                Box::new(TypeTag::U64)
            )))))
        );
    }

    #[test]
    fn parse_string_struct() {
        assert_eq!(TypeTag::parse("0x1::string::String").unwrap(), TypeTag::String);
        // Padded framework address is the same tag
        let padded = format!("{}::string::String", AccountAddress::ONE);
        assert_eq!(TypeTag::parse(&padded).unwrap(), TypeTag::String);
    }

    #[test]
    fn parse_option_and_object() {
        assert_eq!(
            TypeTag::parse("0x1::option::Option<u64>").unwrap(),
            TypeTag::Option(Box::new(TypeTag::U64))
        );
        assert_eq!(
            TypeTag::parse("0x1::object::Object<0x1::string::String>").unwrap(),
            TypeTag::Object(Box::new(TypeTag::String))
        );
    }

    #[test]
    fn parse_mixed_composition() {
        assert_eq!(
            TypeTag::parse("vector<0x1::option::Option<address>>").unwrap(),
            TypeTag::Vector(Box::new(TypeTag::Option(Box::new(TypeTag::Address))))
        );
    }

    #[test]
    fn parse_rejects_signer_and_unknown_structs() {
        assert!(matches!(
            TypeTag::parse("signer"),
            Err(MultisigError::UnsupportedTypeTag(_))
        ));
        assert!(matches!(
            TypeTag::parse("&signer"),
            Err(MultisigError::UnsupportedTypeTag(_))
        ));
        assert!(matches!(
            TypeTag::parse("0x1::coin::Coin<0x1::aptos_coin::AptosCoin>"),
            Err(MultisigError::UnsupportedTypeTag(_))
        ));
        // Known wrapper names at a non-framework address are not the wrappers
        assert!(TypeTag::parse("0x2::string::String").is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        let tags = [
            TypeTag::U256,
            TypeTag::Vector(Box::new(TypeTag::Vector(Box::new(TypeTag::Bool)))),
            TypeTag::Option(Box::new(TypeTag::String)),
            TypeTag::Object(Box::new(TypeTag::U8)),
        ];
        for tag in tags {
            assert_eq!(TypeTag::parse(&tag.to_string()).unwrap(), tag);
        }
    }

    #[test]
    fn is_byte_vector() {
        assert!(TypeTag::parse("vector<u8>").unwrap().is_byte_vector());
        assert!(!TypeTag::parse("vector<u16>").unwrap().is_byte_vector());
        assert!(!TypeTag::U8.is_byte_vector());
    }
}
