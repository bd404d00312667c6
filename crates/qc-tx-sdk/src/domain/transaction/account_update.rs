//! Transactions that replace an account's on-chain key.
//!
//! The new key travels as the tagged account key bytes (tag-in-tag), so
//! decoding goes through the [`AccountKey`] dispatcher.

use super::{read_common, strip_type_tag, FeeDelegation, TxCommon, TypedBody};
use crate::domain::account::Account;
use crate::domain::account_key::AccountKey;
use crate::domain::codec::FieldReader;
use crate::domain::entities::{decode_hex, refine_signatures, Address, SignatureData, TxType};
use crate::domain::errors::{SdkError, SdkResult};
use rlp::RlpStream;

fn check_account(from: Address, account: &Account) -> SdkResult<()> {
    if account.address() != from {
        return Err(SdkError::Inconsistency(format!(
            "from {from} does not match account address {}",
            account.address()
        )));
    }
    Ok(())
}

fn read_account(reader: &FieldReader<'_>) -> SdkResult<(Address, Account)> {
    let from = reader.address(3)?;
    let account_key = AccountKey::decode(&reader.bytes(4)?)?;
    Ok((from, Account::new(from, account_key)))
}

/// Tag `0x20`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountUpdate {
    pub common: TxCommon,
    from: Address,
    account: Account,
    signatures: Vec<SignatureData>,
}

impl AccountUpdate {
    /// Fails with [`SdkError::Inconsistency`] when `account` belongs to
    /// another address.
    pub fn new(common: TxCommon, from: Address, account: Account) -> SdkResult<Self> {
        check_account(from, &account)?;
        Ok(Self {
            common,
            from,
            account,
            signatures: vec![SignatureData::empty()],
        })
    }

    pub fn from_address(&self) -> Address {
        self.from
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let body = strip_type_tag(bytes, TxType::AccountUpdate)?;
        let reader = FieldReader::new(body, 6)?;
        let (from, account) = read_account(&reader)?;
        Ok(Self {
            common: read_common(&reader)?,
            from,
            account,
            signatures: refine_signatures(reader.signatures(5)?),
        })
    }

    pub fn decode_hex(encoded: &str) -> SdkResult<Self> {
        Self::decode(&decode_hex(encoded)?)
    }
}

impl TypedBody for AccountUpdate {
    const BODY_FIELDS: usize = 2;

    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.from);
        stream.append(&self.account.encoded_account_key());
    }
}

impl_typed_transaction!(AccountUpdate, TxType::AccountUpdate);

/// Tag `0x21`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeDelegatedAccountUpdate {
    pub common: TxCommon,
    pub fee_delegation: FeeDelegation,
    from: Address,
    account: Account,
    signatures: Vec<SignatureData>,
}

impl FeeDelegatedAccountUpdate {
    pub fn new(common: TxCommon, from: Address, account: Account) -> SdkResult<Self> {
        check_account(from, &account)?;
        Ok(Self {
            common,
            fee_delegation: FeeDelegation::default(),
            from,
            account,
            signatures: vec![SignatureData::empty()],
        })
    }

    pub fn with_fee_payer(mut self, fee_payer: Address) -> Self {
        self.fee_delegation.fee_payer = Some(fee_payer);
        self
    }

    pub fn from_address(&self) -> Address {
        self.from
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn decode(bytes: &[u8]) -> SdkResult<Self> {
        let body = strip_type_tag(bytes, TxType::FeeDelegatedAccountUpdate)?;
        let reader = FieldReader::new(body, 8)?;
        let (from, account) = read_account(&reader)?;
        Ok(Self {
            common: read_common(&reader)?,
            fee_delegation: FeeDelegation::from_parts(
                reader.fee_payer(6)?,
                reader.signatures(7)?,
            ),
            from,
            account,
            signatures: refine_signatures(reader.signatures(5)?),
        })
    }

    pub fn decode_hex(encoded: &str) -> SdkResult<Self> {
        Self::decode(&decode_hex(encoded)?)
    }
}

impl TypedBody for FeeDelegatedAccountUpdate {
    const BODY_FIELDS: usize = 2;

    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.from);
        stream.append(&self.account.encoded_account_key());
    }
}

impl_typed_transaction!(
    FeeDelegatedAccountUpdate,
    TxType::FeeDelegatedAccountUpdate,
    fee_delegated
);
