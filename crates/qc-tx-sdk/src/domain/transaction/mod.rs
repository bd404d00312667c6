//! # Transactions
//!
//! A closed set of transaction variants sharing the [`Transaction`]
//! capability. Each variant defines two byte sequences:
//!
//! 1. **Signing payload**: for typed variants the common payload
//!    `RLP([tag, nonce, gasPrice, gas, ...fields])`, wrapped as
//!    `RLP([common, chainId, 0x, 0x])` for the sender and
//!    `RLP([common, feePayer, chainId, 0x, 0x])` for the fee payer.
//! 2. **Final encoding**: `tag ++ RLP([nonce, gasPrice, gas, ...fields,
//!    signatures(, feePayer, feePayerSignatures)])`.
//!
//! Legacy transactions are untagged and follow EIP-155.
//!
//! Field order in every decoder matches its encoder; the round-trip tests in
//! each variant module pin this down.

/// `Transaction` impl for a tagged variant with `common`, `from` and
/// `signatures` fields that implements [`TypedBody`]. The `fee_delegated`
/// form also wires the `fee_delegation` field.
macro_rules! impl_typed_transaction {
    ($variant:ty, $tx_type:expr) => {
        impl $crate::domain::transaction::Transaction for $variant {
            impl_typed_transaction!(@common $tx_type);

            fn rlp_encoding(&self) -> $crate::domain::errors::SdkResult<Vec<u8>> {
                $crate::domain::transaction::typed_encoding(
                    $tx_type,
                    &self.common,
                    self,
                    &self.signatures,
                    None,
                )
            }
        }
    };
    ($variant:ty, $tx_type:expr, fee_delegated) => {
        impl $crate::domain::transaction::Transaction for $variant {
            impl_typed_transaction!(@common $tx_type);

            fn rlp_encoding(&self) -> $crate::domain::errors::SdkResult<Vec<u8>> {
                $crate::domain::transaction::typed_encoding(
                    $tx_type,
                    &self.common,
                    self,
                    &self.signatures,
                    Some(&self.fee_delegation),
                )
            }

            fn rlp_encoding_for_sender_hash(&self) -> $crate::domain::errors::SdkResult<Vec<u8>> {
                $crate::domain::transaction::typed_encoding(
                    $tx_type,
                    &self.common,
                    self,
                    &self.signatures,
                    None,
                )
            }

            fn fee_delegation(&self) -> Option<&$crate::domain::transaction::FeeDelegation> {
                Some(&self.fee_delegation)
            }

            fn fee_delegation_mut(
                &mut self,
            ) -> Option<&mut $crate::domain::transaction::FeeDelegation> {
                Some(&mut self.fee_delegation)
            }
        }
    };
    (@common $tx_type:expr) => {
        fn tx_type(&self) -> $crate::domain::entities::TxType {
            $tx_type
        }

        fn common(&self) -> &$crate::domain::transaction::TxCommon {
            &self.common
        }

        fn common_mut(&mut self) -> &mut $crate::domain::transaction::TxCommon {
            &mut self.common
        }

        fn sender(&self) -> Option<$crate::domain::entities::Address> {
            Some(self.from)
        }

        fn signatures(&self) -> &[$crate::domain::entities::SignatureData] {
            &self.signatures
        }

        fn set_signatures(&mut self, signatures: Vec<$crate::domain::entities::SignatureData>) {
            self.signatures = signatures;
        }

        fn rlp_encoding_for_signature(&self) -> $crate::domain::errors::SdkResult<Vec<u8>> {
            $crate::domain::transaction::typed_signature_encoding($tx_type, &self.common, self)
        }
    };
}

mod account_update;
mod cancel;
pub mod decoder;
mod fee_delegated;
mod legacy;
mod value_transfer;

pub use account_update::{AccountUpdate, FeeDelegatedAccountUpdate};
pub use cancel::Cancel;
pub use decoder::{DecoderConfig, TransactionDecoder, UnknownTagPolicy};
pub use fee_delegated::{
    FeeDelegatedValueTransfer, FeeDelegatedValueTransferMemo, FeeDelegatedValueTransferWithRatio,
};
pub use legacy::LegacyTransaction;
pub use value_transfer::{ValueTransfer, ValueTransferMemo};

use super::codec::{append_signatures, keccak256, FieldReader};
use super::entities::{
    encode_hex, refine_signatures, Address, Hash, SignatureData, SignatureInput, TxType,
};
use super::errors::{SdkError, SdkResult};
use primitive_types::U256;
use rlp::RlpStream;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// COMMON FIELDS
// =============================================================================

/// Fields every variant carries.
///
/// `nonce`, `gas_price` and `chain_id` may be left unset and filled from the
/// chain before signing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxCommon {
    pub nonce: Option<u64>,
    pub gas_price: Option<U256>,
    pub gas: u64,
    pub chain_id: Option<u64>,
}

impl TxCommon {
    /// Only `gas` set; the rest is filled later.
    pub fn new(gas: u64) -> Self {
        Self {
            gas,
            ..Default::default()
        }
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_gas_price(mut self, gas_price: impl Into<U256>) -> Self {
        self.gas_price = Some(gas_price.into());
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn require_nonce(&self) -> SdkResult<u64> {
        self.nonce.ok_or(SdkError::MissingField("nonce"))
    }

    pub fn require_gas_price(&self) -> SdkResult<U256> {
        self.gas_price.ok_or(SdkError::MissingField("gasPrice"))
    }

    pub fn require_chain_id(&self) -> SdkResult<u64> {
        self.chain_id.ok_or(SdkError::MissingField("chainId"))
    }
}

/// Fee payer address and signatures of a fee-delegated variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeDelegation {
    /// Unset encodes as the zero address
    pub fee_payer: Option<Address>,
    fee_payer_signatures: Vec<SignatureData>,
}

impl FeeDelegation {
    pub fn new(fee_payer: Option<Address>) -> Self {
        Self {
            fee_payer,
            fee_payer_signatures: vec![SignatureData::empty()],
        }
    }

    pub(crate) fn from_parts(
        fee_payer: Option<Address>,
        fee_payer_signatures: Vec<SignatureData>,
    ) -> Self {
        Self {
            fee_payer,
            fee_payer_signatures: refine_signatures(fee_payer_signatures),
        }
    }

    pub fn fee_payer_signatures(&self) -> &[SignatureData] {
        &self.fee_payer_signatures
    }

    pub fn require_fee_payer(&self) -> SdkResult<Address> {
        self.fee_payer.ok_or(SdkError::MissingFeePayer)
    }

    fn append(&mut self, input: SignatureInput) {
        self.fee_payer_signatures = merge_signatures(&self.fee_payer_signatures, input);
    }

    fn append_to(&self, stream: &mut RlpStream) {
        stream.append(&self.fee_payer.unwrap_or(Address::ZERO));
        append_signatures(stream, &self.fee_payer_signatures);
    }
}

impl Default for FeeDelegation {
    fn default() -> Self {
        Self::new(None)
    }
}

// =============================================================================
// TRANSACTION CAPABILITY
// =============================================================================

/// Behaviour shared by every transaction variant.
pub trait Transaction: fmt::Debug {
    fn tx_type(&self) -> TxType;

    fn common(&self) -> &TxCommon;

    fn common_mut(&mut self) -> &mut TxCommon;

    /// The `from` address. Legacy transactions do not carry one.
    fn sender(&self) -> Option<Address>;

    fn signatures(&self) -> &[SignatureData];

    /// Replace the sender signature list wholesale (already refined).
    fn set_signatures(&mut self, signatures: Vec<SignatureData>);

    /// Tag plus every field except signatures.
    fn rlp_encoding_for_signature(&self) -> SdkResult<Vec<u8>>;

    /// Final wire encoding including signatures.
    fn rlp_encoding(&self) -> SdkResult<Vec<u8>>;

    fn fee_delegation(&self) -> Option<&FeeDelegation> {
        None
    }

    fn fee_delegation_mut(&mut self) -> Option<&mut FeeDelegation> {
        None
    }

    /// Bytes hashed for the sender signature.
    fn sender_signing_payload(&self) -> SdkResult<Vec<u8>> {
        let common = self.rlp_encoding_for_signature()?;
        Ok(wrap_for_signing(
            &common,
            None,
            self.common().require_chain_id()?,
        ))
    }

    /// Bytes hashed for the fee payer signature.
    fn fee_payer_signing_payload(&self) -> SdkResult<Vec<u8>> {
        let fee_payer = self
            .fee_delegation()
            .ok_or(SdkError::NotFeeDelegated(self.tx_type()))?
            .require_fee_payer()?;
        let common = self.rlp_encoding_for_signature()?;
        Ok(wrap_for_signing(
            &common,
            Some(&fee_payer),
            self.common().require_chain_id()?,
        ))
    }

    fn signing_hash(&self) -> SdkResult<Hash> {
        Ok(keccak256(&self.sender_signing_payload()?))
    }

    fn fee_payer_signing_hash(&self) -> SdkResult<Hash> {
        Ok(keccak256(&self.fee_payer_signing_payload()?))
    }

    /// Append one or many sender signatures, then dedup.
    fn append_signatures(&mut self, input: SignatureInput) -> SdkResult<()> {
        let merged = merge_signatures(self.signatures(), input);
        self.set_signatures(merged);
        Ok(())
    }

    /// Append one or many fee payer signatures, then dedup.
    fn append_fee_payer_signatures(&mut self, input: SignatureInput) -> SdkResult<()> {
        let tx_type = self.tx_type();
        self.fee_delegation_mut()
            .ok_or(SdkError::NotFeeDelegated(tx_type))?
            .append(input);
        Ok(())
    }

    /// Encoding hashed by [`Transaction::sender_tx_hash`]. Fee-delegated
    /// variants leave out the fee payer fields.
    fn rlp_encoding_for_sender_hash(&self) -> SdkResult<Vec<u8>> {
        self.rlp_encoding()
    }

    fn rlp_encoding_hex(&self) -> SdkResult<String> {
        Ok(encode_hex(&self.rlp_encoding()?))
    }

    /// keccak256 of the final encoding.
    fn transaction_hash(&self) -> SdkResult<Hash> {
        Ok(keccak256(&self.rlp_encoding()?))
    }

    /// Hash that stays stable whoever the fee payer turns out to be.
    fn sender_tx_hash(&self) -> SdkResult<Hash> {
        Ok(keccak256(&self.rlp_encoding_for_sender_hash()?))
    }

    /// True once a non-placeholder sender signature is present.
    fn is_signed(&self) -> bool {
        self.signatures().iter().any(|sig| !sig.is_empty())
    }
}

// =============================================================================
// SHARED ENCODING HELPERS
// =============================================================================

/// Concatenate and refine.
fn merge_signatures(existing: &[SignatureData], input: SignatureInput) -> Vec<SignatureData> {
    let mut all = existing.to_vec();
    all.extend(input.into_vec());
    refine_signatures(all)
}

/// `RLP([common, (feePayer,) chainId, 0x, 0x])`.
pub(crate) fn wrap_for_signing(
    common: &[u8],
    fee_payer: Option<&Address>,
    chain_id: u64,
) -> Vec<u8> {
    let mut stream = RlpStream::new_list(if fee_payer.is_some() { 5 } else { 4 });
    stream.append(&common.to_vec());
    if let Some(fee_payer) = fee_payer {
        stream.append(fee_payer);
    }
    stream.append(&chain_id);
    stream.append_empty_data();
    stream.append_empty_data();
    stream.out().to_vec()
}

/// Per-variant field layout after `nonce, gasPrice, gas`.
pub(crate) trait TypedBody {
    /// Number of fields appended by [`TypedBody::append_body`].
    const BODY_FIELDS: usize;

    fn append_body(&self, stream: &mut RlpStream);
}

/// `RLP([tag, nonce, gasPrice, gas, ...body])`.
pub(crate) fn typed_signature_encoding<B: TypedBody>(
    tx_type: TxType,
    common: &TxCommon,
    body: &B,
) -> SdkResult<Vec<u8>> {
    let tag = type_tag(tx_type)?;
    let mut stream = RlpStream::new_list(4 + B::BODY_FIELDS);
    stream.append(&vec![tag]);
    stream.append(&common.require_nonce()?);
    stream.append(&common.require_gas_price()?);
    stream.append(&common.gas);
    body.append_body(&mut stream);
    Ok(stream.out().to_vec())
}

/// `tag ++ RLP([nonce, gasPrice, gas, ...body, signatures(, feePayer, feePayerSignatures)])`.
pub(crate) fn typed_encoding<B: TypedBody>(
    tx_type: TxType,
    common: &TxCommon,
    body: &B,
    signatures: &[SignatureData],
    fee_delegation: Option<&FeeDelegation>,
) -> SdkResult<Vec<u8>> {
    let tag = type_tag(tx_type)?;
    let trailing = if fee_delegation.is_some() { 3 } else { 1 };
    let mut stream = RlpStream::new_list(3 + B::BODY_FIELDS + trailing);
    stream.append(&common.require_nonce()?);
    stream.append(&common.require_gas_price()?);
    stream.append(&common.gas);
    body.append_body(&mut stream);
    append_signatures(&mut stream, signatures);
    if let Some(fee_delegation) = fee_delegation {
        fee_delegation.append_to(&mut stream);
    }

    let rlp = stream.out();
    let mut out = Vec::with_capacity(1 + rlp.len());
    out.push(tag);
    out.extend_from_slice(&rlp);
    Ok(out)
}

/// Strip and check the leading tag, returning the RLP body.
pub(crate) fn strip_type_tag(bytes: &[u8], tx_type: TxType) -> SdkResult<&[u8]> {
    let tag = type_tag(tx_type)?;
    match bytes.split_first() {
        Some((first, body)) if *first == tag => Ok(body),
        Some((first, _)) => Err(SdkError::MalformedEncoding(format!(
            "expected {} tag {tag:#04x}, got {first:#04x}",
            tx_type.name()
        ))),
        None => Err(SdkError::MalformedEncoding("empty transaction".to_string())),
    }
}

/// `nonce, gasPrice, gas` at positions 0..3. Chain id is not encoded.
pub(crate) fn read_common(reader: &FieldReader<'_>) -> SdkResult<TxCommon> {
    Ok(TxCommon {
        nonce: Some(reader.u64(0)?),
        gas_price: Some(reader.u256(1)?),
        gas: reader.u64(2)?,
        chain_id: None,
    })
}

fn type_tag(tx_type: TxType) -> SdkResult<u8> {
    tx_type
        .tag()
        .ok_or_else(|| SdkError::MalformedEncoding(format!("{} has no type tag", tx_type.name())))
}

// =============================================================================
// TYPED TRANSACTION (closed enum)
// =============================================================================

/// Any supported transaction, as produced by the decoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedTransaction {
    Legacy(LegacyTransaction),
    ValueTransfer(ValueTransfer),
    FeeDelegatedValueTransfer(FeeDelegatedValueTransfer),
    FeeDelegatedValueTransferWithRatio(FeeDelegatedValueTransferWithRatio),
    ValueTransferMemo(ValueTransferMemo),
    FeeDelegatedValueTransferMemo(FeeDelegatedValueTransferMemo),
    AccountUpdate(AccountUpdate),
    FeeDelegatedAccountUpdate(FeeDelegatedAccountUpdate),
    Cancel(Cancel),
}

impl TypedTransaction {
    fn inner(&self) -> &dyn Transaction {
        match self {
            TypedTransaction::Legacy(tx) => tx,
            TypedTransaction::ValueTransfer(tx) => tx,
            TypedTransaction::FeeDelegatedValueTransfer(tx) => tx,
            TypedTransaction::FeeDelegatedValueTransferWithRatio(tx) => tx,
            TypedTransaction::ValueTransferMemo(tx) => tx,
            TypedTransaction::FeeDelegatedValueTransferMemo(tx) => tx,
            TypedTransaction::AccountUpdate(tx) => tx,
            TypedTransaction::FeeDelegatedAccountUpdate(tx) => tx,
            TypedTransaction::Cancel(tx) => tx,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Transaction {
        match self {
            TypedTransaction::Legacy(tx) => tx,
            TypedTransaction::ValueTransfer(tx) => tx,
            TypedTransaction::FeeDelegatedValueTransfer(tx) => tx,
            TypedTransaction::FeeDelegatedValueTransferWithRatio(tx) => tx,
            TypedTransaction::ValueTransferMemo(tx) => tx,
            TypedTransaction::FeeDelegatedValueTransferMemo(tx) => tx,
            TypedTransaction::AccountUpdate(tx) => tx,
            TypedTransaction::FeeDelegatedAccountUpdate(tx) => tx,
            TypedTransaction::Cancel(tx) => tx,
        }
    }
}

impl Transaction for TypedTransaction {
    fn tx_type(&self) -> TxType {
        self.inner().tx_type()
    }

    fn common(&self) -> &TxCommon {
        self.inner().common()
    }

    fn common_mut(&mut self) -> &mut TxCommon {
        self.inner_mut().common_mut()
    }

    fn sender(&self) -> Option<Address> {
        self.inner().sender()
    }

    fn signatures(&self) -> &[SignatureData] {
        self.inner().signatures()
    }

    fn set_signatures(&mut self, signatures: Vec<SignatureData>) {
        self.inner_mut().set_signatures(signatures)
    }

    fn rlp_encoding_for_signature(&self) -> SdkResult<Vec<u8>> {
        self.inner().rlp_encoding_for_signature()
    }

    fn rlp_encoding(&self) -> SdkResult<Vec<u8>> {
        self.inner().rlp_encoding()
    }

    fn fee_delegation(&self) -> Option<&FeeDelegation> {
        self.inner().fee_delegation()
    }

    fn fee_delegation_mut(&mut self) -> Option<&mut FeeDelegation> {
        self.inner_mut().fee_delegation_mut()
    }

    fn sender_signing_payload(&self) -> SdkResult<Vec<u8>> {
        self.inner().sender_signing_payload()
    }

    fn append_signatures(&mut self, input: SignatureInput) -> SdkResult<()> {
        self.inner_mut().append_signatures(input)
    }

    fn rlp_encoding_for_sender_hash(&self) -> SdkResult<Vec<u8>> {
        self.inner().rlp_encoding_for_sender_hash()
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for TypedTransaction {
                fn from(tx: $variant) -> Self {
                    TypedTransaction::$variant(tx)
                }
            }
        )*
    };
}

impl_from_variant!(
    ValueTransfer,
    FeeDelegatedValueTransfer,
    FeeDelegatedValueTransferWithRatio,
    ValueTransferMemo,
    FeeDelegatedValueTransferMemo,
    AccountUpdate,
    FeeDelegatedAccountUpdate,
    Cancel,
);

impl From<LegacyTransaction> for TypedTransaction {
    fn from(tx: LegacyTransaction) -> Self {
        TypedTransaction::Legacy(tx)
    }
}
