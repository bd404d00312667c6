//! # Byte Codec
//!
//! Canonical minimal big-endian naturals and RLP list encoding.
//!
//! Every transaction and account key encoding goes through this module so
//! hashes and signatures are reproducible byte-for-byte. The RLP engine is the
//! `rlp` crate; this module adds the natural-number check, exact-length
//! decoding and a positional field reader that maps decoder failures onto
//! [`SdkError::MalformedEncoding`].

use super::entities::{Address, Hash, SignatureData};
use super::errors::{SdkError, SdkResult};
use primitive_types::U256;
use rlp::{Decodable, Rlp, RlpStream};
use sha3::{Digest, Keccak256};

/// Compute Keccak256 hash.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

// =============================================================================
// NATURALS
// =============================================================================

/// Decode a minimal big-endian natural. The empty string is zero.
///
/// Rejects values longer than 32 bytes and non-minimal leading zeros.
pub fn decode_natural(bytes: &[u8]) -> SdkResult<U256> {
    if bytes.len() > 32 {
        return Err(SdkError::MalformedEncoding(format!(
            "natural too large: {} bytes",
            bytes.len()
        )));
    }
    if bytes.first() == Some(&0) {
        return Err(SdkError::MalformedEncoding(
            "natural has leading zero bytes".to_string(),
        ));
    }
    Ok(U256::from_big_endian(bytes))
}

// =============================================================================
// EXACT DECODING
// =============================================================================

/// Decode a single item that must span all of `bytes`.
pub fn decode_exact<T: Decodable>(bytes: &[u8]) -> SdkResult<T> {
    let rlp = Rlp::new(bytes);
    ensure_exact(&rlp, bytes.len())?;
    Ok(rlp.as_val()?)
}

fn ensure_exact(rlp: &Rlp, len: usize) -> SdkResult<()> {
    let total = rlp.payload_info()?.total();
    if total != len {
        return Err(SdkError::MalformedEncoding(format!(
            "expected {total} bytes, got {len}"
        )));
    }
    Ok(())
}

// =============================================================================
// STREAM HELPERS
// =============================================================================

/// Append a signature list as a nested list of `[v, r, s]` triples.
pub fn append_signatures(stream: &mut RlpStream, signatures: &[SignatureData]) {
    if signatures.is_empty() {
        stream.begin_list(1);
        stream.append(&SignatureData::empty());
        return;
    }
    stream.begin_list(signatures.len());
    for sig in signatures {
        stream.append(sig);
    }
}

/// Append an optional address; `None` encodes as the empty string.
pub fn append_optional_address(stream: &mut RlpStream, address: Option<&Address>) {
    match address {
        Some(address) => {
            stream.append(address);
        }
        None => {
            stream.append_empty_data();
        }
    }
}

// =============================================================================
// FIELD READER
// =============================================================================

/// Positional reader over a top-level RLP list of fixed arity.
pub struct FieldReader<'a> {
    rlp: Rlp<'a>,
}

impl<'a> FieldReader<'a> {
    /// Open `bytes` as a list of exactly `expected` fields.
    pub fn new(bytes: &'a [u8], expected: usize) -> SdkResult<Self> {
        let rlp = Rlp::new(bytes);
        if !rlp.is_list() {
            return Err(SdkError::MalformedEncoding(
                "expected an RLP list".to_string(),
            ));
        }
        ensure_exact(&rlp, bytes.len())?;
        let actual = rlp.item_count()?;
        if actual != expected {
            return Err(SdkError::FieldCountMismatch { expected, actual });
        }
        Ok(Self { rlp })
    }

    /// Raw item at `index`, for nested structures.
    pub fn at(&self, index: usize) -> SdkResult<Rlp<'a>> {
        Ok(self.rlp.at(index)?)
    }

    pub fn u64(&self, index: usize) -> SdkResult<u64> {
        Ok(self.rlp.val_at(index)?)
    }

    pub fn u8(&self, index: usize) -> SdkResult<u8> {
        Ok(self.rlp.val_at(index)?)
    }

    pub fn u256(&self, index: usize) -> SdkResult<U256> {
        decode_natural(self.rlp.at(index)?.data()?)
    }

    pub fn bytes(&self, index: usize) -> SdkResult<Vec<u8>> {
        Ok(self.rlp.val_at(index)?)
    }

    pub fn address(&self, index: usize) -> SdkResult<Address> {
        Ok(self.rlp.val_at(index)?)
    }

    /// Empty string decodes as `None`.
    pub fn optional_address(&self, index: usize) -> SdkResult<Option<Address>> {
        let data = self.rlp.at(index)?.data()?;
        if data.is_empty() {
            return Ok(None);
        }
        Address::from_slice(data)
            .map(Some)
            .map_err(|e| SdkError::MalformedEncoding(e.to_string()))
    }

    /// Zero address decodes as `None`.
    pub fn fee_payer(&self, index: usize) -> SdkResult<Option<Address>> {
        Ok(self
            .optional_address(index)?
            .filter(|address| !address.is_zero()))
    }

    pub fn signatures(&self, index: usize) -> SdkResult<Vec<SignatureData>> {
        Ok(self.rlp.list_at(index)?)
    }
}
