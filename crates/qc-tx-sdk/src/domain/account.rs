//! # Account
//!
//! An address paired with the account key it should be authenticated by.
//! The encoded key is exactly what account-update transactions embed.

use super::account_key::{
    AccountKey, AccountKeyPublic, AccountKeyWeightedMultiSig, WeightedMultiSigOptions,
};
use super::entities::Address;
use super::errors::SdkResult;
use super::key::PublicKey;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    address: Address,
    account_key: AccountKey,
}

impl Account {
    pub fn new(address: Address, account_key: AccountKey) -> Self {
        Self {
            address,
            account_key,
        }
    }

    pub fn with_legacy_key(address: Address) -> Self {
        Self::new(address, AccountKey::Legacy)
    }

    pub fn with_fail_key(address: Address) -> Self {
        Self::new(address, AccountKey::Fail)
    }

    pub fn with_public_key(address: Address, public_key: PublicKey) -> Self {
        Self::new(address, AccountKeyPublic::new(public_key).into())
    }

    pub fn with_weighted_multisig(
        address: Address,
        public_keys: &[PublicKey],
        options: &WeightedMultiSigOptions,
    ) -> SdkResult<Self> {
        let key = AccountKeyWeightedMultiSig::from_public_keys(public_keys, options)?;
        Ok(Self::new(address, key.into()))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn account_key(&self) -> &AccountKey {
        &self.account_key
    }

    /// Tagged account key bytes.
    pub fn encoded_account_key(&self) -> Vec<u8> {
        self.account_key.encode()
    }
}
