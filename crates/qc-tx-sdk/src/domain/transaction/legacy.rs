//! Untagged EIP-155 transaction. Single signer only.

use super::{TxCommon, Transaction};
use crate::domain::codec::{append_optional_address, FieldReader};
use crate::domain::entities::{
    decode_hex, refine_signatures, Address, SignatureData, SignatureInput, TxType,
};
use crate::domain::errors::{SdkError, SdkResult};
use primitive_types::U256;
use rlp::RlpStream;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub common: TxCommon,
    /// `None` deploys a contract
    pub to: Option<Address>,
    pub value: U256,
    pub input: Vec<u8>,
    signatures: Vec<SignatureData>,
}

impl LegacyTransaction {
    pub fn new(common: TxCommon, to: Option<Address>, value: U256, input: Vec<u8>) -> Self {
        Self {
            common,
            to,
            value,
            input,
            signatures: vec![SignatureData::empty()],
        }
    }

    fn append_fields(&self, stream: &mut RlpStream) -> SdkResult<()> {
        stream.append(&self.common.require_nonce()?);
        stream.append(&self.common.require_gas_price()?);
        stream.append(&self.common.gas);
        append_optional_address(stream, self.to.as_ref());
        stream.append(&self.value);
        stream.append(&self.input);
        Ok(())
    }

    /// Decode `RLP([nonce, gasPrice, gas, to, value, input, v, r, s])`.
    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let reader = FieldReader::new(bytes, 9)?;
        let signature =
            SignatureData::from_minimal(reader.bytes(6)?, reader.bytes(7)?, reader.bytes(8)?)?;
        Ok(Self {
            common: super::read_common(&reader)?,
            to: reader.optional_address(3)?,
            value: reader.u256(4)?,
            input: reader.bytes(5)?,
            signatures: refine_signatures(vec![signature]),
        })
    }

    pub fn decode_hex(encoded: &str) -> SdkResult<Self> {
        Self::decode(&decode_hex(encoded)?)
    }
}

impl Transaction for LegacyTransaction {
    fn tx_type(&self) -> TxType {
        TxType::Legacy
    }

    fn common(&self) -> &TxCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut TxCommon {
        &mut self.common
    }

    fn sender(&self) -> Option<Address> {
        None
    }

    fn signatures(&self) -> &[SignatureData] {
        &self.signatures
    }

    fn set_signatures(&mut self, signatures: Vec<SignatureData>) {
        self.signatures = signatures;
    }

    fn rlp_encoding_for_signature(&self) -> SdkResult<Vec<u8>> {
        let mut stream = RlpStream::new_list(6);
        self.append_fields(&mut stream)?;
        Ok(stream.out().to_vec())
    }

    /// `RLP([nonce, gasPrice, gas, to, value, input, chainId, 0x, 0x])`.
    fn sender_signing_payload(&self) -> SdkResult<Vec<u8>> {
        let chain_id = self.common.require_chain_id()?;
        let mut stream = RlpStream::new_list(9);
        self.append_fields(&mut stream)?;
        stream.append(&chain_id);
        stream.append_empty_data();
        stream.append_empty_data();
        Ok(stream.out().to_vec())
    }

    fn rlp_encoding(&self) -> SdkResult<Vec<u8>> {
        let signature = self
            .signatures
            .first()
            .cloned()
            .unwrap_or_else(SignatureData::empty);
        let mut stream = RlpStream::new_list(9);
        self.append_fields(&mut stream)?;
        stream.append(&signature.v);
        stream.append(&signature.r);
        stream.append(&signature.s);
        Ok(stream.out().to_vec())
    }

    fn append_signatures(&mut self, input: SignatureInput) -> SdkResult<()> {
        if self.is_signed() {
            return Err(SdkError::LegacySignatureAlreadyExists);
        }
        let signatures = input.into_vec();
        if signatures.len() > 1 {
            return Err(SdkError::LegacyMultipleSignatures(signatures.len()));
        }
        self.signatures = refine_signatures(signatures);
        Ok(())
    }
}
