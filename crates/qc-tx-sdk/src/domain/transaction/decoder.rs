//! # Transaction Decoder
//!
//! Routes raw bytes to the matching variant decoder by leading tag.
//! A first byte of `0xc0` or above is an RLP list header, i.e. an untagged
//! legacy transaction.

use super::{
    AccountUpdate, Cancel, FeeDelegatedAccountUpdate, FeeDelegatedValueTransfer,
    FeeDelegatedValueTransferMemo, FeeDelegatedValueTransferWithRatio, LegacyTransaction,
    TypedTransaction, ValueTransfer, ValueTransferMemo,
};
use crate::domain::entities::{decode_hex, TxType};
use crate::domain::errors::{SdkError, SdkResult};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Smallest RLP list header byte.
const RLP_LIST_OFFSET: u8 = 0xc0;

/// What to do with a leading byte that is neither a known tag nor a list header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownTagPolicy {
    /// Try to decode the whole input as a legacy transaction
    #[default]
    FallbackToLegacy,
    /// Fail with [`SdkError::UnknownTransactionType`]
    Reject,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    pub unknown_tag_policy: UnknownTagPolicy,
}

impl DecoderConfig {
    /// Reject unknown tags instead of guessing.
    pub fn strict() -> Self {
        Self {
            unknown_tag_policy: UnknownTagPolicy::Reject,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TransactionDecoder {
    config: DecoderConfig,
}

impl TransactionDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn decode(&self, bytes: &[u8]) -> SdkResult<TypedTransaction> {
        let first = *bytes
            .first()
            .ok_or_else(|| SdkError::MalformedEncoding("empty transaction".to_string()))?;

        if first >= RLP_LIST_OFFSET {
            return LegacyTransaction::decode(bytes).map(TypedTransaction::Legacy);
        }

        let Some(tx_type) = TxType::from_tag(first) else {
            return self.decode_unknown(first, bytes);
        };
        trace!(tag = first, tx_type = tx_type.name(), "Decoding typed transaction");

        let tx: TypedTransaction = match tx_type {
            TxType::Legacy => LegacyTransaction::decode(bytes)?.into(),
            TxType::ValueTransfer => ValueTransfer::decode(bytes)?.into(),
            TxType::FeeDelegatedValueTransfer => FeeDelegatedValueTransfer::decode(bytes)?.into(),
            TxType::FeeDelegatedValueTransferWithRatio => {
                FeeDelegatedValueTransferWithRatio::decode(bytes)?.into()
            }
            TxType::ValueTransferMemo => ValueTransferMemo::decode(bytes)?.into(),
            TxType::FeeDelegatedValueTransferMemo => {
                FeeDelegatedValueTransferMemo::decode(bytes)?.into()
            }
            TxType::AccountUpdate => AccountUpdate::decode(bytes)?.into(),
            TxType::FeeDelegatedAccountUpdate => FeeDelegatedAccountUpdate::decode(bytes)?.into(),
            TxType::Cancel => Cancel::decode(bytes)?.into(),
        };
        Ok(tx)
    }

    /// Decode a `0x` hex string.
    pub fn decode_hex(&self, encoded: &str) -> SdkResult<TypedTransaction> {
        self.decode(&decode_hex(encoded)?)
    }

    fn decode_unknown(&self, tag: u8, bytes: &[u8]) -> SdkResult<TypedTransaction> {
        match self.config.unknown_tag_policy {
            UnknownTagPolicy::Reject => Err(SdkError::UnknownTransactionType(tag)),
            UnknownTagPolicy::FallbackToLegacy => {
                warn!(tag, "Unknown transaction tag, decoding as legacy");
                LegacyTransaction::decode(bytes).map(TypedTransaction::Legacy)
            }
        }
    }
}
