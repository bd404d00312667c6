//! # Domain Entities
//!
//! Value types shared by keys, accounts and transactions.

use super::errors::{SdkError, SdkResult};
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 256-bit Keccak digest.
pub type Hash = [u8; 32];

// =============================================================================
// ADDRESS
// =============================================================================

/// 20-byte account address.
///
/// Parsing is case-insensitive and display is always lower-case, so two
/// addresses that differ only in hex case compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create from a 20-byte slice.
    pub fn from_slice(bytes: &[u8]) -> SdkResult<Self> {
        let array: [u8; 20] = bytes
            .try_into()
            .map_err(|_| SdkError::InvalidAddress(format!("expected 20 bytes, got {}", bytes.len())))?;
        Ok(Self(array))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = strip_hex_prefix(s);
        if stripped.len() != 40 {
            return Err(SdkError::InvalidAddress(s.to_string()));
        }
        let bytes = hex::decode(stripped).map_err(|_| SdkError::InvalidAddress(s.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Encodable for Address {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.encoder().encode_value(&self.0);
    }
}

impl Decodable for Address {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        rlp.decoder().decode_value(|bytes| {
            bytes
                .try_into()
                .map(Address)
                .map_err(|_| DecoderError::Custom("address must be 20 bytes"))
        })
    }
}

/// Strip an optional `0x`/`0X` prefix.
pub(crate) fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

// =============================================================================
// SIGNATURES
// =============================================================================

/// A `(v, r, s)` signature triple in canonical minimal-byte form.
///
/// Each component has its leading zero bytes removed so that RLP encoding of
/// the triple is reproducible.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureData {
    pub v: Vec<u8>,
    pub r: Vec<u8>,
    pub s: Vec<u8>,
}

impl SignatureData {
    /// Build a triple, trimming leading zero bytes from each component.
    pub fn new(v: &[u8], r: &[u8], s: &[u8]) -> Self {
        Self {
            v: trim_leading_zeros(v).to_vec(),
            r: trim_leading_zeros(r).to_vec(),
            s: trim_leading_zeros(s).to_vec(),
        }
    }

    /// Decoded triple; components with leading zero bytes are rejected.
    pub(crate) fn from_minimal(
        v: Vec<u8>,
        r: Vec<u8>,
        s: Vec<u8>,
    ) -> Result<Self, DecoderError> {
        if [&v, &r, &s].iter().any(|part| part.first() == Some(&0)) {
            return Err(DecoderError::Custom("signature component has leading zero bytes"));
        }
        Ok(Self { v, r, s })
    }

    /// Parse a triple from `0x` hex strings.
    pub fn from_hex(v: &str, r: &str, s: &str) -> SdkResult<Self> {
        Ok(Self::new(&decode_hex(v)?, &decode_hex(r)?, &decode_hex(s)?))
    }

    /// The canonical empty placeholder `(0x01, 0x, 0x)`.
    pub fn empty() -> Self {
        Self {
            v: vec![0x01],
            r: Vec::new(),
            s: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// Hex strings of `(v, r, s)`.
    pub fn to_hex(&self) -> (String, String, String) {
        (
            format!("0x{}", hex::encode(&self.v)),
            format!("0x{}", hex::encode(&self.r)),
            format!("0x{}", hex::encode(&self.s)),
        )
    }
}

impl fmt::Debug for SignatureData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (v, r, s) = self.to_hex();
        write!(f, "[{v}, {r}, {s}]")
    }
}

impl Encodable for SignatureData {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.v);
        s.append(&self.r);
        s.append(&self.s);
    }
}

impl Decodable for SignatureData {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 3 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Self::from_minimal(rlp.val_at(0)?, rlp.val_at(1)?, rlp.val_at(2)?)
    }
}

/// Input accepted by `append_signatures`: one triple or a list of triples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureInput {
    Single(SignatureData),
    Multiple(Vec<SignatureData>),
}

impl SignatureInput {
    /// Normalize to a list of triples.
    pub fn into_vec(self) -> Vec<SignatureData> {
        match self {
            SignatureInput::Single(sig) => vec![sig],
            SignatureInput::Multiple(sigs) => sigs,
        }
    }
}

impl From<SignatureData> for SignatureInput {
    fn from(sig: SignatureData) -> Self {
        SignatureInput::Single(sig)
    }
}

impl From<Vec<SignatureData>> for SignatureInput {
    fn from(sigs: Vec<SignatureData>) -> Self {
        SignatureInput::Multiple(sigs)
    }
}

/// Remove duplicate and empty triples, keeping first-seen order.
///
/// Returns `[empty]` when nothing remains.
pub fn refine_signatures(signatures: Vec<SignatureData>) -> Vec<SignatureData> {
    let mut refined: Vec<SignatureData> = Vec::with_capacity(signatures.len());
    for sig in signatures {
        if sig.is_empty() || refined.contains(&sig) {
            continue;
        }
        refined.push(sig);
    }
    if refined.is_empty() {
        refined.push(SignatureData::empty());
    }
    refined
}

// =============================================================================
// ROLES
// =============================================================================

/// Key role slots of a keyring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Transaction = 0,
    AccountUpdate = 1,
    FeePayer = 2,
}

impl Role {
    /// Number of role slots.
    pub const COUNT: usize = 3;

    pub const ALL: [Role; 3] = [Role::Transaction, Role::AccountUpdate, Role::FeePayer];

    /// Slot index of this role.
    pub fn index(self) -> usize {
        self as usize
    }
}

// =============================================================================
// TRANSACTION TYPES
// =============================================================================

/// Transaction type tags.
pub mod tx_tag {
    pub const VALUE_TRANSFER: u8 = 0x08;
    pub const FEE_DELEGATED_VALUE_TRANSFER: u8 = 0x09;
    pub const FEE_DELEGATED_VALUE_TRANSFER_WITH_RATIO: u8 = 0x0a;
    pub const VALUE_TRANSFER_MEMO: u8 = 0x10;
    pub const FEE_DELEGATED_VALUE_TRANSFER_MEMO: u8 = 0x11;
    pub const ACCOUNT_UPDATE: u8 = 0x20;
    pub const FEE_DELEGATED_ACCOUNT_UPDATE: u8 = 0x21;
    pub const CANCEL: u8 = 0x38;
}

/// Closed set of supported transaction kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxType {
    Legacy,
    ValueTransfer,
    FeeDelegatedValueTransfer,
    FeeDelegatedValueTransferWithRatio,
    ValueTransferMemo,
    FeeDelegatedValueTransferMemo,
    AccountUpdate,
    FeeDelegatedAccountUpdate,
    Cancel,
}

impl TxType {
    /// Leading type tag; `None` for Legacy which is untagged.
    pub fn tag(self) -> Option<u8> {
        match self {
            TxType::Legacy => None,
            TxType::ValueTransfer => Some(tx_tag::VALUE_TRANSFER),
            TxType::FeeDelegatedValueTransfer => Some(tx_tag::FEE_DELEGATED_VALUE_TRANSFER),
            TxType::FeeDelegatedValueTransferWithRatio => {
                Some(tx_tag::FEE_DELEGATED_VALUE_TRANSFER_WITH_RATIO)
            }
            TxType::ValueTransferMemo => Some(tx_tag::VALUE_TRANSFER_MEMO),
            TxType::FeeDelegatedValueTransferMemo => Some(tx_tag::FEE_DELEGATED_VALUE_TRANSFER_MEMO),
            TxType::AccountUpdate => Some(tx_tag::ACCOUNT_UPDATE),
            TxType::FeeDelegatedAccountUpdate => Some(tx_tag::FEE_DELEGATED_ACCOUNT_UPDATE),
            TxType::Cancel => Some(tx_tag::CANCEL),
        }
    }

    /// Resolve a leading tag byte.
    pub fn from_tag(tag: u8) -> Option<TxType> {
        match tag {
            tx_tag::VALUE_TRANSFER => Some(TxType::ValueTransfer),
            tx_tag::FEE_DELEGATED_VALUE_TRANSFER => Some(TxType::FeeDelegatedValueTransfer),
            tx_tag::FEE_DELEGATED_VALUE_TRANSFER_WITH_RATIO => {
                Some(TxType::FeeDelegatedValueTransferWithRatio)
            }
            tx_tag::VALUE_TRANSFER_MEMO => Some(TxType::ValueTransferMemo),
            tx_tag::FEE_DELEGATED_VALUE_TRANSFER_MEMO => Some(TxType::FeeDelegatedValueTransferMemo),
            tx_tag::ACCOUNT_UPDATE => Some(TxType::AccountUpdate),
            tx_tag::FEE_DELEGATED_ACCOUNT_UPDATE => Some(TxType::FeeDelegatedAccountUpdate),
            tx_tag::CANCEL => Some(TxType::Cancel),
            _ => None,
        }
    }

    /// Canonical type name, e.g. `TxTypeFeeDelegatedAccountUpdate`.
    pub fn name(self) -> &'static str {
        match self {
            TxType::Legacy => "TxTypeLegacyTransaction",
            TxType::ValueTransfer => "TxTypeValueTransfer",
            TxType::FeeDelegatedValueTransfer => "TxTypeFeeDelegatedValueTransfer",
            TxType::FeeDelegatedValueTransferWithRatio => {
                "TxTypeFeeDelegatedValueTransferWithRatio"
            }
            TxType::ValueTransferMemo => "TxTypeValueTransferMemo",
            TxType::FeeDelegatedValueTransferMemo => "TxTypeFeeDelegatedValueTransferMemo",
            TxType::AccountUpdate => "TxTypeAccountUpdate",
            TxType::FeeDelegatedAccountUpdate => "TxTypeFeeDelegatedAccountUpdate",
            TxType::Cancel => "TxTypeCancel",
        }
    }

    pub fn is_fee_delegated(self) -> bool {
        matches!(
            self,
            TxType::FeeDelegatedValueTransfer
                | TxType::FeeDelegatedValueTransferWithRatio
                | TxType::FeeDelegatedValueTransferMemo
                | TxType::FeeDelegatedAccountUpdate
        )
    }

    pub fn is_account_update(self) -> bool {
        matches!(self, TxType::AccountUpdate | TxType::FeeDelegatedAccountUpdate)
    }

    /// Role whose keys authorize the sender signature.
    pub fn sender_role(self) -> Role {
        if self.is_account_update() {
            Role::AccountUpdate
        } else {
            Role::Transaction
        }
    }
}

// =============================================================================
// HEX HELPERS
// =============================================================================

/// Decode a hex string with optional `0x` prefix. `"0x"` decodes to empty.
pub fn decode_hex(s: &str) -> SdkResult<Vec<u8>> {
    let stripped = strip_hex_prefix(s);
    if stripped.len() % 2 == 1 {
        return Ok(hex::decode(format!("0{stripped}"))?);
    }
    Ok(hex::decode(stripped)?)
}

/// Encode bytes as a `0x`-prefixed lower-case hex string.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}
