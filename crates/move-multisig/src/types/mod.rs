//! Core types: addresses, type tags, decoded values.

mod address;
mod type_tag;
mod value;

pub use address::{ADDRESS_LENGTH, AccountAddress};
pub use type_tag::TypeTag;
pub use value::DecodedValue;
