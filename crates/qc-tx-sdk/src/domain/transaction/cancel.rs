//! Tag `0x38`: replaces a pending transaction with the same nonce.

use super::{read_common, strip_type_tag, TxCommon, TypedBody};
use crate::domain::codec::FieldReader;
use crate::domain::entities::{decode_hex, refine_signatures, Address, SignatureData, TxType};
use crate::domain::errors::SdkResult;
use rlp::RlpStream;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cancel {
    pub common: TxCommon,
    pub from: Address,
    signatures: Vec<SignatureData>,
}

impl Cancel {
    pub fn new(common: TxCommon, from: Address) -> Self {
        Self {
            common,
            from,
            signatures: vec![SignatureData::empty()],
        }
    }

    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let body = strip_type_tag(bytes, TxType::Cancel)?;
        let reader = FieldReader::new(body, 5)?;
        Ok(Self {
            common: read_common(&reader)?,
            from: reader.address(3)?,
            signatures: refine_signatures(reader.signatures(4)?),
        })
    }

    pub fn decode_hex(encoded: &str) -> SdkResult<Self> {
        Self::decode(&decode_hex(encoded)?)
    }
}

impl TypedBody for Cancel {
    const BODY_FIELDS: usize = 1;

    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.from);
    }
}

impl_typed_transaction!(Cancel, TxType::Cancel);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::key::Key;
    use crate::domain::transaction::Transaction;

    #[test]
    fn test_round_trip() {
        let key = Key::from_bytes(&[0x21; 32]).unwrap();
        for nonce in [0u64, 12345] {
            let mut tx = Cancel::new(
                TxCommon::new(25_000)
                    .with_nonce(nonce)
                    .with_gas_price(25_000_000_000u64),
                key.address(),
            );
            assert_eq!(Cancel::decode(&tx.rlp_encoding().unwrap()).unwrap(), tx);

            tx.common.chain_id = Some(2019);
            let hash = tx.signing_hash().unwrap();
            tx.append_signatures(key.sign(&hash, 2019).unwrap().into())
                .unwrap();
            let mut decoded = Cancel::decode(&tx.rlp_encoding().unwrap()).unwrap();
            decoded.common.chain_id = Some(2019);
            assert_eq!(decoded, tx);
        }
    }

    #[test]
    fn test_field_count_mismatch() {
        // tag followed by a list of four fields
        let mut stream = RlpStream::new_list(4);
        stream.append(&0u64).append(&0u64).append(&0u64);
        stream.append(&Address::ZERO);
        let mut bytes = vec![0x38];
        bytes.extend_from_slice(&stream.out());
        assert_eq!(
            Cancel::decode(&bytes),
            Err(crate::domain::errors::SdkError::FieldCountMismatch {
                expected: 5,
                actual: 4
            })
        );
    }
}
