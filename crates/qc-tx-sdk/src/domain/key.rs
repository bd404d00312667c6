//! # Keys (secp256k1)
//!
//! Private key wrapper producing replay-protected `(v, r, s)` triples, and the
//! public key forms used by account keys.
//!
//! ## Security Notes
//!
//! - RFC 6979 deterministic nonces: the same hash, key and chain id always
//!   produce the same triple
//! - Low-S normalization (EIP-2) is applied by `k256`
//! - Intermediate secret byte buffers are zeroized

use super::codec::keccak256;
use super::entities::{decode_hex, Address, Hash, SignatureData};
use super::errors::{SdkError, SdkResult};
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::RngCore;
use std::fmt;
use zeroize::Zeroizing;

/// Offset added to `recovery_id + chain_id * 2` (EIP-155).
const REPLAY_PROTECTION_OFFSET: u128 = 35;

// =============================================================================
// PUBLIC KEY
// =============================================================================

/// secp256k1 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Parse SEC1 bytes (33-byte compressed or 65-byte `0x04`-prefixed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> SdkResult<Self> {
        let inner = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| SdkError::InvalidPublicKey(hex::encode(bytes)))?;
        Ok(Self { inner })
    }

    /// Parse a hex public key.
    ///
    /// Accepts 128 hex chars (X‖Y), 130 hex chars (`04`‖X‖Y), or a
    /// 66-char compressed key.
    pub fn from_hex(s: &str) -> SdkResult<Self> {
        let bytes = decode_hex(s)?;
        match bytes.len() {
            64 => {
                let mut point = Vec::with_capacity(65);
                point.push(0x04);
                point.extend_from_slice(&bytes);
                Self::from_sec1_bytes(&point)
            }
            33 | 65 => Self::from_sec1_bytes(&bytes),
            len => Err(SdkError::InvalidPublicKey(format!(
                "unexpected public key length: {len} bytes"
            ))),
        }
    }

    /// Build from affine coordinates.
    ///
    /// Coordinates may carry or omit leading zeros; each is normalized to 32
    /// bytes before the point is validated.
    pub fn from_xy(x: &[u8], y: &[u8]) -> SdkResult<Self> {
        let mut point = [0u8; 65];
        point[0] = 0x04;
        point[1..33].copy_from_slice(&normalize_coordinate(x)?);
        point[33..].copy_from_slice(&normalize_coordinate(y)?);
        Self::from_sec1_bytes(&point)
    }

    /// 33-byte compressed form (`0x02`/`0x03` prefix).
    pub fn to_compressed(&self) -> [u8; 33] {
        let encoded = self.inner.to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// 65-byte uncompressed EC point including the `0x04` prefix.
    pub fn to_uncompressed(&self) -> [u8; 65] {
        let encoded = self.inner.to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// X coordinate.
    pub fn x(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.to_uncompressed()[1..33]);
        out
    }

    /// Y coordinate.
    pub fn y(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.to_uncompressed()[33..]);
        out
    }

    /// Display form: compressed `0x02…`/`0x03…`, or 128 hex chars X‖Y
    /// without the `04` prefix.
    pub fn to_hex(&self, compressed: bool) -> String {
        if compressed {
            format!("0x{}", hex::encode(self.to_compressed()))
        } else {
            format!("0x{}", hex::encode(&self.to_uncompressed()[1..]))
        }
    }

    /// Derive the account address (last 20 bytes of keccak256(X‖Y)).
    pub fn address(&self) -> Address {
        let hash = keccak256(&self.to_uncompressed()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        Address(address)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex(true))
    }
}

fn normalize_coordinate(coordinate: &[u8]) -> SdkResult<[u8; 32]> {
    let start = coordinate
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(coordinate.len());
    let trimmed = &coordinate[start..];
    if trimmed.len() > 32 {
        return Err(SdkError::InvalidPublicKey(format!(
            "coordinate longer than 32 bytes: {}",
            trimmed.len()
        )));
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Ok(out)
}

// =============================================================================
// PRIVATE KEY
// =============================================================================

/// A single secp256k1 private key.
#[derive(Clone)]
pub struct Key {
    signing_key: SigningKey,
}

impl Key {
    /// Parse a 32-byte hex private key (with or without `0x`).
    ///
    /// Fails with [`SdkError::InvalidPrivateKey`] unless the scalar lies in
    /// `(0, n)`.
    pub fn new(raw: &str) -> SdkResult<Self> {
        let bytes = Zeroizing::new(decode_hex(raw).map_err(|_| SdkError::InvalidPrivateKey)?);
        Self::from_bytes(&bytes)
    }

    /// Create from raw 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> SdkResult<Self> {
        if bytes.len() != 32 {
            return Err(SdkError::InvalidPrivateKey);
        }
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| SdkError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Generate a new key.
    ///
    /// Without entropy a secure random scalar is drawn. Supplied entropy is
    /// mixed with a fresh random seed through keccak256.
    pub fn generate(entropy: Option<&[u8]>) -> Self {
        let mut rng = rand::thread_rng();
        let Some(entropy) = entropy else {
            return Self {
                signing_key: SigningKey::random(&mut rng),
            };
        };

        loop {
            let mut material = Zeroizing::new(vec![0u8; 32]);
            rng.fill_bytes(&mut material);
            material.extend_from_slice(entropy);
            let seed = Zeroizing::new(keccak256(&material));
            if let Ok(signing_key) = SigningKey::from_slice(seed.as_slice()) {
                return Self { signing_key };
            }
        }
    }

    /// Replace the private key, re-validating the new scalar.
    ///
    /// On failure the existing key is left untouched.
    pub fn set_private_key(&mut self, raw: &str) -> SdkResult<()> {
        *self = Self::new(raw)?;
        Ok(())
    }

    /// Private key as `0x` hex.
    pub fn private_key_hex(&self) -> String {
        let bytes: Zeroizing<[u8; 32]> = Zeroizing::new(self.signing_key.to_bytes().into());
        format!("0x{}", hex::encode(bytes.as_slice()))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.signing_key.verifying_key().clone(),
        }
    }

    /// Address derived from the public key.
    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    /// Sign a 32-byte message hash.
    ///
    /// `v = recovery_id + chain_id * 2 + 35`; all components are returned in
    /// minimal big-endian form.
    pub fn sign(&self, message_hash: &Hash, chain_id: u64) -> SdkResult<SignatureData> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(message_hash)
            .map_err(|e| SdkError::SigningFailed(e.to_string()))?;

        let v = u128::from(recovery_id.to_byte())
            + u128::from(chain_id) * 2
            + REPLAY_PROTECTION_OFFSET;
        let r = signature.r().to_bytes();
        let s = signature.s().to_bytes();

        Ok(SignatureData::new(&v.to_be_bytes(), &r, &s))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Key {}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
