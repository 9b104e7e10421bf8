//! Typed argument codec.
//!
//! Maps a [`TypeTag`] to a decode/encode routine over the canonical binary
//! serialization: little-endian fixed-width integers, ULEB128 length
//! prefixes for variable-length data. Decoding is fully recursive over
//! nested tags; encoding is the exact inverse, so
//! `decode(tag, encode(tag, v)) == v` for every value decode can produce.

use crate::error::{MultisigError, MultisigResult};
use crate::types::{AccountAddress, DecodedValue, TypeTag, ADDRESS_LENGTH};
use num_bigint::BigUint;

/// A read-only cursor over a byte slice.
///
/// Every read checks the remaining length first; underruns surface as
/// [`MalformedArgument`](MultisigError::MalformedArgument) rather than
/// partially-zero values.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor over `bytes`, positioned at the start.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// True once every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> MultisigResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(MultisigError::malformed(format!(
                "needed {n} bytes at offset {}, only {} remain",
                self.pos,
                self.remaining()
            )));
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> MultisigResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a ULEB128-encoded length prefix.
    ///
    /// Lengths are capped at `u32::MAX` and must be minimally encoded, per
    /// the canonical serialization rules.
    pub fn read_uleb128(&mut self) -> MultisigResult<u64> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                if byte == 0 && shift > 0 {
                    return Err(MultisigError::malformed(
                        "non-canonical ULEB128 length prefix".to_string(),
                    ));
                }
                break;
            }
            shift += 7;
            if shift > 28 {
                return Err(MultisigError::malformed(
                    "ULEB128 length prefix exceeds u32 range".to_string(),
                ));
            }
        }
        if value > u64::from(u32::MAX) {
            return Err(MultisigError::malformed(
                "ULEB128 length prefix exceeds u32 range".to_string(),
            ));
        }
        Ok(value)
    }
}

/// An append-only byte buffer with the canonical write primitives.
#[derive(Debug, Default)]
pub struct BcsWriter {
    buf: Vec<u8>,
}

impl BcsWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends a single byte.
    pub fn write_u8(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Appends a ULEB128-encoded length prefix.
    pub fn write_uleb128(&mut self, mut value: u64) {
        loop {
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            self.buf.push(byte);
            if value == 0 {
                break;
            }
        }
    }

    /// Appends a ULEB128 length followed by the bytes themselves.
    pub fn write_prefixed_bytes(&mut self, bytes: &[u8]) {
        self.write_uleb128(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    /// Consumes the writer, returning the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Decodes one complete argument.
///
/// The whole of `bytes` must belong to the argument: trailing bytes after
/// the value are as malformed as a truncated buffer, since each argument
/// blob in the payload envelope is self-delimiting.
pub fn decode_argument(tag: &TypeTag, bytes: &[u8]) -> MultisigResult<DecodedValue> {
    let mut cursor = ByteCursor::new(bytes);
    let value = decode_value(tag, &mut cursor)?;
    if !cursor.is_exhausted() {
        return Err(MultisigError::malformed(format!(
            "{} trailing bytes after {tag} argument",
            cursor.remaining()
        )));
    }
    Ok(value)
}

/// Decodes one value of type `tag` from the cursor, leaving the cursor
/// positioned after it.
pub fn decode_value(tag: &TypeTag, cursor: &mut ByteCursor<'_>) -> MultisigResult<DecodedValue> {
    match tag {
        TypeTag::U8 => Ok(DecodedValue::U8(cursor.read_u8()?)),
        TypeTag::U16 => {
            let bytes = cursor.read_bytes(2)?;
            Ok(DecodedValue::U16(u16::from_le_bytes([bytes[0], bytes[1]])))
        }
        TypeTag::U32 => {
            let bytes = cursor.read_bytes(4)?;
            Ok(DecodedValue::U32(u32::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ])))
        }
        TypeTag::U64 => Ok(DecodedValue::Uint(read_le_uint(cursor, 8)?)),
        TypeTag::U128 => Ok(DecodedValue::Uint(read_le_uint(cursor, 16)?)),
        TypeTag::U256 => Ok(DecodedValue::Uint(read_le_uint(cursor, 32)?)),
        TypeTag::Bool => match cursor.read_u8()? {
            0 => Ok(DecodedValue::Bool(false)),
            1 => Ok(DecodedValue::Bool(true)),
            byte => Err(MultisigError::InvalidBoolEncoding(byte)),
        },
        TypeTag::Address | TypeTag::Object(_) => {
            let bytes = cursor.read_bytes(ADDRESS_LENGTH)?;
            Ok(DecodedValue::Address(AccountAddress::from_bytes(bytes)?))
        }
        TypeTag::Vector(inner) => {
            let len = cursor.read_uleb128()? as usize;
            if tag.is_byte_vector() {
                // Raw byte blobs keep their distinct shape so hashes and
                // bytecode round-trip without boxing every byte.
                return Ok(DecodedValue::Bytes(cursor.read_bytes(len)?.to_vec()));
            }
            let mut items = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                items.push(decode_value(inner, cursor)?);
            }
            Ok(DecodedValue::Vector(items))
        }
        TypeTag::Option(inner) => match cursor.read_u8()? {
            0 => Ok(DecodedValue::Option(None)),
            1 => Ok(DecodedValue::Option(Some(Box::new(decode_value(
                inner, cursor,
            )?)))),
            byte => Err(MultisigError::InvalidOptionTag(byte)),
        },
        TypeTag::String => {
            let len = cursor.read_uleb128()? as usize;
            let bytes = cursor.read_bytes(len)?;
            let s = std::str::from_utf8(bytes)
                .map_err(|e| MultisigError::InvalidStringEncoding(e.to_string()))?;
            Ok(DecodedValue::Str(s.to_string()))
        }
    }
}

fn read_le_uint(cursor: &mut ByteCursor<'_>, width: usize) -> MultisigResult<BigUint> {
    let bytes = cursor.read_bytes(width)?;
    Ok(BigUint::from_bytes_le(bytes))
}

/// Encodes one value back to its canonical bytes.
///
/// The value's shape must match `tag` exactly; any mismatch is a
/// [`TypeMismatch`](MultisigError::TypeMismatch), never a silent truncation
/// or padding. As a convenience for CLI input, a hex string literal is
/// accepted where `vector<u8>` bytes are expected and normalized to raw
/// bytes first.
pub fn encode_argument(tag: &TypeTag, value: &DecodedValue) -> MultisigResult<Vec<u8>> {
    let mut writer = BcsWriter::new();
    encode_value(tag, value, &mut writer)?;
    Ok(writer.into_bytes())
}

/// Encodes one value of type `tag` into the writer.
pub fn encode_value(
    tag: &TypeTag,
    value: &DecodedValue,
    writer: &mut BcsWriter,
) -> MultisigResult<()> {
    match (tag, value) {
        (TypeTag::U8, DecodedValue::U8(v)) => writer.write_u8(*v),
        (TypeTag::U16, DecodedValue::U16(v)) => writer.write_bytes(&v.to_le_bytes()),
        (TypeTag::U32, DecodedValue::U32(v)) => writer.write_bytes(&v.to_le_bytes()),
        (TypeTag::U64, DecodedValue::Uint(v)) => write_le_uint(tag, v, 8, writer)?,
        (TypeTag::U128, DecodedValue::Uint(v)) => write_le_uint(tag, v, 16, writer)?,
        (TypeTag::U256, DecodedValue::Uint(v)) => write_le_uint(tag, v, 32, writer)?,
        (TypeTag::Bool, DecodedValue::Bool(v)) => writer.write_u8(u8::from(*v)),
        (TypeTag::Address, DecodedValue::Address(a))
        | (TypeTag::Object(_), DecodedValue::Address(a)) => writer.write_bytes(a.as_bytes()),
        (TypeTag::Vector(_), DecodedValue::Bytes(bytes)) if tag.is_byte_vector() => {
            writer.write_prefixed_bytes(bytes);
        }
        (TypeTag::Vector(_), DecodedValue::Str(hex_literal)) if tag.is_byte_vector() => {
            // Hex string literal standing in for raw bytes.
            let digits = hex_literal.strip_prefix("0x").unwrap_or(hex_literal);
            let bytes = hex::decode(digits)?;
            writer.write_prefixed_bytes(&bytes);
        }
        (TypeTag::Vector(inner), DecodedValue::Vector(items)) => {
            writer.write_uleb128(items.len() as u64);
            for item in items {
                encode_value(inner, item, writer)?;
            }
        }
        (TypeTag::Option(_), DecodedValue::Option(None)) => writer.write_u8(0),
        (TypeTag::Option(inner), DecodedValue::Option(Some(v))) => {
            writer.write_u8(1);
            encode_value(inner, v, writer)?;
        }
        (TypeTag::String, DecodedValue::Str(s)) => writer.write_prefixed_bytes(s.as_bytes()),
        (tag, value) => {
            return Err(MultisigError::type_mismatch(tag.to_string(), value.shape()));
        }
    }
    Ok(())
}

fn write_le_uint(
    tag: &TypeTag,
    value: &BigUint,
    width: usize,
    writer: &mut BcsWriter,
) -> MultisigResult<()> {
    let mut bytes = value.to_bytes_le();
    if bytes.len() > width {
        return Err(MultisigError::type_mismatch(
            tag.to_string(),
            format!("uint wider than {} bits", width * 8),
        ));
    }
    bytes.resize(width, 0);
    writer.write_bytes(&bytes);
    Ok(())
}
