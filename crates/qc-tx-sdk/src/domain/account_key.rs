//! # Account Keys
//!
//! How an on-chain account authenticates, in its canonical tagged byte form:
//!
//! | Variant | Encoding |
//! |---------|----------|
//! | Legacy | `0x01c0` |
//! | Public | `0x02 ++ RLP(compressedKey)` |
//! | Fail | `0x03c0` |
//! | WeightedMultiSig | `0x04 ++ RLP([threshold, [[weight, compressedKey], ...]])` |
//! | RoleBased | `0x05 ++ ...` (not supported) |

use super::codec::{decode_exact, FieldReader};
use super::entities::{decode_hex, encode_hex};
use super::errors::{SdkError, SdkResult};
use super::key::PublicKey;
use rlp::RlpStream;
use serde::{Deserialize, Serialize};

pub const ACCOUNT_KEY_LEGACY_TAG: u8 = 0x01;
pub const ACCOUNT_KEY_PUBLIC_TAG: u8 = 0x02;
pub const ACCOUNT_KEY_FAIL_TAG: u8 = 0x03;
pub const ACCOUNT_KEY_WEIGHTED_MULTISIG_TAG: u8 = 0x04;
pub const ACCOUNT_KEY_ROLE_BASED_TAG: u8 = 0x05;

/// RLP of an empty list.
const EMPTY_LIST: u8 = 0xc0;

// =============================================================================
// ACCOUNT KEY PUBLIC
// =============================================================================

/// A single public key authenticating the account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountKeyPublic {
    public_key: PublicKey,
}

impl AccountKeyPublic {
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// Build from affine coordinates (leading zeros tolerated).
    pub fn from_xy(x: &[u8], y: &[u8]) -> SdkResult<Self> {
        Ok(Self::new(PublicKey::from_xy(x, y)?))
    }

    pub fn from_hex(public_key: &str) -> SdkResult<Self> {
        Ok(Self::new(PublicKey::from_hex(public_key)?))
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// `TAG_PUBLIC ++ RLP(compressedPublicKey)`.
    pub fn encode(&self) -> Vec<u8> {
        let body = rlp::encode(&self.public_key.to_compressed().to_vec());
        let mut out = Vec::with_capacity(1 + body.len());
        out.push(ACCOUNT_KEY_PUBLIC_TAG);
        out.extend_from_slice(&body);
        out
    }

    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let body = strip_tag(bytes, ACCOUNT_KEY_PUBLIC_TAG)?;
        let compressed: Vec<u8> = decode_exact(body)?;
        Ok(Self::new(PublicKey::from_sec1_bytes(&compressed)?))
    }
}

// =============================================================================
// ACCOUNT KEY WEIGHTED MULTISIG
// =============================================================================

/// A public key with its multisig weight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedPublicKey {
    pub weight: u64,
    pub public_key: PublicKey,
}

impl WeightedPublicKey {
    pub fn new(weight: u64, public_key: PublicKey) -> SdkResult<Self> {
        if weight == 0 {
            return Err(SdkError::InvalidWeights("weight must be positive".to_string()));
        }
        Ok(Self { weight, public_key })
    }
}

/// Threshold and per-key weights used to build a multisig account key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedMultiSigOptions {
    pub threshold: u64,
    pub weights: Vec<u64>,
}

impl WeightedMultiSigOptions {
    pub fn new(threshold: u64, weights: Vec<u64>) -> Self {
        Self { threshold, weights }
    }
}

/// Weighted multisig: signatures must reach `threshold` summed weight.
///
/// Key order is significant; the index of a key matches the index of its
/// signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountKeyWeightedMultiSig {
    threshold: u64,
    weighted_public_keys: Vec<WeightedPublicKey>,
}

impl AccountKeyWeightedMultiSig {
    /// Fails with [`SdkError::InvalidThreshold`] unless
    /// `1 <= threshold <= Σweight`.
    pub fn new(threshold: u64, weighted_public_keys: Vec<WeightedPublicKey>) -> SdkResult<Self> {
        if weighted_public_keys.is_empty() {
            return Err(SdkError::InvalidWeights(
                "multisig requires at least one key".to_string(),
            ));
        }
        let total_weight = weighted_public_keys
            .iter()
            .try_fold(0u64, |acc, key| acc.checked_add(key.weight))
            .ok_or_else(|| SdkError::InvalidWeights("total weight overflows".to_string()))?;
        if threshold == 0 || threshold > total_weight {
            return Err(SdkError::InvalidThreshold {
                threshold,
                total_weight,
            });
        }
        Ok(Self {
            threshold,
            weighted_public_keys,
        })
    }

    /// Pair `options.weights` positionally with `public_keys`.
    pub fn from_public_keys(
        public_keys: &[PublicKey],
        options: &WeightedMultiSigOptions,
    ) -> SdkResult<Self> {
        if options.weights.len() != public_keys.len() {
            return Err(SdkError::InvalidWeights(format!(
                "{} weights for {} keys",
                options.weights.len(),
                public_keys.len()
            )));
        }
        let weighted = public_keys
            .iter()
            .zip(&options.weights)
            .map(|(key, weight)| WeightedPublicKey::new(*weight, key.clone()))
            .collect::<SdkResult<Vec<_>>>()?;
        Self::new(options.threshold, weighted)
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn weighted_public_keys(&self) -> &[WeightedPublicKey] {
        &self.weighted_public_keys
    }

    /// `TAG ++ RLP([threshold, [[weight, compressedKey], ...]])`.
    pub fn encode(&self) -> Vec<u8> {
        let mut stream = RlpStream::new_list(2);
        stream.append(&self.threshold);
        stream.begin_list(self.weighted_public_keys.len());
        for weighted in &self.weighted_public_keys {
            stream.begin_list(2);
            stream.append(&weighted.weight);
            stream.append(&weighted.public_key.to_compressed().to_vec());
        }
        let body = stream.out();

        let mut out = Vec::with_capacity(1 + body.len());
        out.push(ACCOUNT_KEY_WEIGHTED_MULTISIG_TAG);
        out.extend_from_slice(&body);
        out
    }

    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let body = strip_tag(bytes, ACCOUNT_KEY_WEIGHTED_MULTISIG_TAG)?;
        let reader = FieldReader::new(body, 2)?;
        let threshold = reader.u64(0)?;

        let mut weighted_public_keys = Vec::new();
        for entry in reader.at(1)?.iter() {
            if entry.item_count()? != 2 {
                return Err(SdkError::MalformedEncoding(
                    "weighted key entry must be [weight, key]".to_string(),
                ));
            }
            let weight: u64 = entry.val_at(0)?;
            let compressed: Vec<u8> = entry.val_at(1)?;
            weighted_public_keys.push(WeightedPublicKey::new(
                weight,
                PublicKey::from_sec1_bytes(&compressed)?,
            )?);
        }
        Self::new(threshold, weighted_public_keys)
    }
}

// =============================================================================
// ACCOUNT KEY (tagged dispatch)
// =============================================================================

/// Closed set of account key variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountKey {
    /// Address is derived from the key pair (default account behaviour)
    Legacy,
    Public(AccountKeyPublic),
    /// All signatures are rejected
    Fail,
    WeightedMultiSig(AccountKeyWeightedMultiSig),
}

impl AccountKey {
    pub fn tag(&self) -> u8 {
        match self {
            AccountKey::Legacy => ACCOUNT_KEY_LEGACY_TAG,
            AccountKey::Public(_) => ACCOUNT_KEY_PUBLIC_TAG,
            AccountKey::Fail => ACCOUNT_KEY_FAIL_TAG,
            AccountKey::WeightedMultiSig(_) => ACCOUNT_KEY_WEIGHTED_MULTISIG_TAG,
        }
    }

    /// Canonical tagged bytes.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            AccountKey::Legacy => vec![ACCOUNT_KEY_LEGACY_TAG, EMPTY_LIST],
            AccountKey::Public(key) => key.encode(),
            AccountKey::Fail => vec![ACCOUNT_KEY_FAIL_TAG, EMPTY_LIST],
            AccountKey::WeightedMultiSig(key) => key.encode(),
        }
    }

    pub fn encode_hex(&self) -> String {
        encode_hex(&self.encode())
    }

    /// Dispatch on the leading tag byte.
    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let tag = *bytes
            .first()
            .ok_or_else(|| SdkError::MalformedEncoding("empty account key".to_string()))?;
        match tag {
            ACCOUNT_KEY_LEGACY_TAG => {
                expect_empty_body(bytes)?;
                Ok(AccountKey::Legacy)
            }
            ACCOUNT_KEY_PUBLIC_TAG => Ok(AccountKey::Public(AccountKeyPublic::decode(bytes)?)),
            ACCOUNT_KEY_FAIL_TAG => {
                expect_empty_body(bytes)?;
                Ok(AccountKey::Fail)
            }
            ACCOUNT_KEY_WEIGHTED_MULTISIG_TAG => Ok(AccountKey::WeightedMultiSig(
                AccountKeyWeightedMultiSig::decode(bytes)?,
            )),
            ACCOUNT_KEY_ROLE_BASED_TAG => Err(SdkError::NotImplemented("role-based account key")),
            other => Err(SdkError::UnknownAccountKeyType(other)),
        }
    }

    pub fn decode_hex(s: &str) -> SdkResult<Self> {
        Self::decode(&decode_hex(s)?)
    }
}

impl From<AccountKeyPublic> for AccountKey {
    fn from(key: AccountKeyPublic) -> Self {
        AccountKey::Public(key)
    }
}

impl From<AccountKeyWeightedMultiSig> for AccountKey {
    fn from(key: AccountKeyWeightedMultiSig) -> Self {
        AccountKey::WeightedMultiSig(key)
    }
}

fn strip_tag(bytes: &[u8], tag: u8) -> SdkResult<&[u8]> {
    match bytes.split_first() {
        Some((first, body)) if *first == tag => Ok(body),
        Some((first, _)) => Err(SdkError::MalformedEncoding(format!(
            "expected account key tag {tag:#04x}, got {first:#04x}"
        ))),
        None => Err(SdkError::MalformedEncoding("empty account key".to_string())),
    }
}

fn expect_empty_body(bytes: &[u8]) -> SdkResult<()> {
    if bytes.len() != 2 || bytes[1] != EMPTY_LIST {
        return Err(SdkError::MalformedEncoding(format!(
            "account key {:#04x} must have an empty body",
            bytes[0]
        )));
    }
    Ok(())
}
