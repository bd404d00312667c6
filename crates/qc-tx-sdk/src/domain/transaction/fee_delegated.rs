//! Value transfers whose gas is paid by a separate fee payer.

use super::{read_common, strip_type_tag, FeeDelegation, TxCommon, TypedBody};
use crate::domain::codec::FieldReader;
use crate::domain::entities::{decode_hex, refine_signatures, Address, SignatureData, TxType};
use crate::domain::errors::{SdkError, SdkResult};
use primitive_types::U256;
use rlp::RlpStream;

/// Valid fee ratios are percentages the fee payer covers, exclusive of 0 and 100.
const FEE_RATIO_RANGE: std::ops::RangeInclusive<u8> = 1..=99;

fn read_fee_delegation(reader: &FieldReader<'_>, first: usize) -> SdkResult<FeeDelegation> {
    Ok(FeeDelegation::from_parts(
        reader.fee_payer(first)?,
        reader.signatures(first + 1)?,
    ))
}

/// Tag `0x09`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeDelegatedValueTransfer {
    pub common: TxCommon,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub fee_delegation: FeeDelegation,
    signatures: Vec<SignatureData>,
}

impl FeeDelegatedValueTransfer {
    pub fn new(common: TxCommon, from: Address, to: Address, value: U256) -> Self {
        Self {
            common,
            from,
            to,
            value,
            fee_delegation: FeeDelegation::default(),
            signatures: vec![SignatureData::empty()],
        }
    }

    pub fn with_fee_payer(mut self, fee_payer: Address) -> Self {
        self.fee_delegation.fee_payer = Some(fee_payer);
        self
    }

    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let body = strip_type_tag(bytes, TxType::FeeDelegatedValueTransfer)?;
        let reader = FieldReader::new(body, 9)?;
        Ok(Self {
            common: read_common(&reader)?,
            to: reader.address(3)?,
            value: reader.u256(4)?,
            from: reader.address(5)?,
            signatures: refine_signatures(reader.signatures(6)?),
            fee_delegation: read_fee_delegation(&reader, 7)?,
        })
    }

    pub fn decode_hex(encoded: &str) -> SdkResult<Self> {
        Self::decode(&decode_hex(encoded)?)
    }
}

impl TypedBody for FeeDelegatedValueTransfer {
    const BODY_FIELDS: usize = 3;

    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.to);
        stream.append(&self.value);
        stream.append(&self.from);
    }
}

impl_typed_transaction!(
    FeeDelegatedValueTransfer,
    TxType::FeeDelegatedValueTransfer,
    fee_delegated
);

/// Tag `0x0a`. The fee payer covers `fee_ratio` percent of the fee.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeDelegatedValueTransferWithRatio {
    pub common: TxCommon,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub fee_delegation: FeeDelegation,
    fee_ratio: u8,
    signatures: Vec<SignatureData>,
}

impl FeeDelegatedValueTransferWithRatio {
    /// Fails with [`SdkError::InvalidFeeRatio`] outside `1..=99`.
    pub fn new(
        common: TxCommon,
        from: Address,
        to: Address,
        value: U256,
        fee_ratio: u8,
    ) -> SdkResult<Self> {
        Ok(Self {
            common,
            from,
            to,
            value,
            fee_delegation: FeeDelegation::default(),
            fee_ratio: validate_fee_ratio(fee_ratio)?,
            signatures: vec![SignatureData::empty()],
        })
    }

    pub fn with_fee_payer(mut self, fee_payer: Address) -> Self {
        self.fee_delegation.fee_payer = Some(fee_payer);
        self
    }

    pub fn fee_ratio(&self) -> u8 {
        self.fee_ratio
    }

    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let body = strip_type_tag(bytes, TxType::FeeDelegatedValueTransferWithRatio)?;
        let reader = FieldReader::new(body, 10)?;
        Ok(Self {
            common: read_common(&reader)?,
            to: reader.address(3)?,
            value: reader.u256(4)?,
            from: reader.address(5)?,
            fee_ratio: validate_fee_ratio(reader.u8(6)?)?,
            signatures: refine_signatures(reader.signatures(7)?),
            fee_delegation: read_fee_delegation(&reader, 8)?,
        })
    }

    pub fn decode_hex(encoded: &str) -> SdkResult<Self> {
        Self::decode(&decode_hex(encoded)?)
    }
}

fn validate_fee_ratio(fee_ratio: u8) -> SdkResult<u8> {
    if FEE_RATIO_RANGE.contains(&fee_ratio) {
        Ok(fee_ratio)
    } else {
        Err(SdkError::InvalidFeeRatio(fee_ratio))
    }
}

impl TypedBody for FeeDelegatedValueTransferWithRatio {
    const BODY_FIELDS: usize = 4;

    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.to);
        stream.append(&self.value);
        stream.append(&self.from);
        stream.append(&self.fee_ratio);
    }
}

impl_typed_transaction!(
    FeeDelegatedValueTransferWithRatio,
    TxType::FeeDelegatedValueTransferWithRatio,
    fee_delegated
);

/// Tag `0x11`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeDelegatedValueTransferMemo {
    pub common: TxCommon,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub input: Vec<u8>,
    pub fee_delegation: FeeDelegation,
    signatures: Vec<SignatureData>,
}

impl FeeDelegatedValueTransferMemo {
    pub fn new(common: TxCommon, from: Address, to: Address, value: U256, input: Vec<u8>) -> Self {
        Self {
            common,
            from,
            to,
            value,
            input,
            fee_delegation: FeeDelegation::default(),
            signatures: vec![SignatureData::empty()],
        }
    }

    pub fn with_fee_payer(mut self, fee_payer: Address) -> Self {
        self.fee_delegation.fee_payer = Some(fee_payer);
        self
    }

    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let body = strip_type_tag(bytes, TxType::FeeDelegatedValueTransferMemo)?;
        let reader = FieldReader::new(body, 10)?;
        Ok(Self {
            common: read_common(&reader)?,
            to: reader.address(3)?,
            value: reader.u256(4)?,
            from: reader.address(5)?,
            input: reader.bytes(6)?,
            signatures: refine_signatures(reader.signatures(7)?),
            fee_delegation: read_fee_delegation(&reader, 8)?,
        })
    }

    pub fn decode_hex(encoded: &str) -> SdkResult<Self> {
        Self::decode(&decode_hex(encoded)?)
    }
}

impl TypedBody for FeeDelegatedValueTransferMemo {
    const BODY_FIELDS: usize = 4;

    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.to);
        stream.append(&self.value);
        stream.append(&self.from);
        stream.append(&self.input);
    }
}

impl_typed_transaction!(
    FeeDelegatedValueTransferMemo,
    TxType::FeeDelegatedValueTransferMemo,
    fee_delegated
);
