//! Plain value transfers, with and without a memo.

use super::{read_common, strip_type_tag, TxCommon, TypedBody};
use crate::domain::codec::FieldReader;
use crate::domain::entities::{decode_hex, refine_signatures, Address, SignatureData, TxType};
use crate::domain::errors::SdkResult;
use primitive_types::U256;
use rlp::RlpStream;

/// Tag `0x08`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueTransfer {
    pub common: TxCommon,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    signatures: Vec<SignatureData>,
}

impl ValueTransfer {
    pub fn new(common: TxCommon, from: Address, to: Address, value: U256) -> Self {
        Self {
            common,
            from,
            to,
            value,
            signatures: vec![SignatureData::empty()],
        }
    }

    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let body = strip_type_tag(bytes, TxType::ValueTransfer)?;
        let reader = FieldReader::new(body, 7)?;
        Ok(Self {
            common: read_common(&reader)?,
            to: reader.address(3)?,
            value: reader.u256(4)?,
            from: reader.address(5)?,
            signatures: refine_signatures(reader.signatures(6)?),
        })
    }

    pub fn decode_hex(encoded: &str) -> SdkResult<Self> {
        Self::decode(&decode_hex(encoded)?)
    }
}

impl TypedBody for ValueTransfer {
    const BODY_FIELDS: usize = 3;

    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.to);
        stream.append(&self.value);
        stream.append(&self.from);
    }
}

impl_typed_transaction!(ValueTransfer, TxType::ValueTransfer);

/// Tag `0x10`. A value transfer carrying arbitrary `input` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueTransferMemo {
    pub common: TxCommon,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub input: Vec<u8>,
    signatures: Vec<SignatureData>,
}

impl ValueTransferMemo {
    pub fn new(common: TxCommon, from: Address, to: Address, value: U256, input: Vec<u8>) -> Self {
        Self {
            common,
            from,
            to,
            value,
            input,
            signatures: vec![SignatureData::empty()],
        }
    }

    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let body = strip_type_tag(bytes, TxType::ValueTransferMemo)?;
        let reader = FieldReader::new(body, 8)?;
        Ok(Self {
            common: read_common(&reader)?,
            to: reader.address(3)?,
            value: reader.u256(4)?,
            from: reader.address(5)?,
            input: reader.bytes(6)?,
            signatures: refine_signatures(reader.signatures(7)?),
        })
    }

    pub fn decode_hex(encoded: &str) -> SdkResult<Self> {
        Self::decode(&decode_hex(encoded)?)
    }
}

impl TypedBody for ValueTransferMemo {
    const BODY_FIELDS: usize = 4;

    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.to);
        stream.append(&self.value);
        stream.append(&self.from);
        stream.append(&self.input);
    }
}

impl_typed_transaction!(ValueTransferMemo, TxType::ValueTransferMemo);
