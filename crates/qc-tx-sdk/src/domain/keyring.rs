//! # Keyring
//!
//! An address plus three role-keyed key slots:
//!
//! | Slot | Role | Used for |
//! |------|------|----------|
//! | 0 | `Transaction` | Ordinary sender signatures |
//! | 1 | `AccountUpdate` | Account-update transactions |
//! | 2 | `FeePayer` | Fee-payer signatures |
//!
//! An empty `AccountUpdate` or `FeePayer` slot falls back to the
//! `Transaction` slot. If that is empty too, signing fails with
//! [`SdkError::KeyNotFound`].

use super::account::Account;
use super::account_key::WeightedMultiSigOptions;
use super::entities::{Address, Hash, Role, SignatureData};
use super::errors::{SdkError, SdkResult};
use super::key::{Key, PublicKey};

/// Options for [`Keyring::to_account`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToAccountOptions {
    /// Options for the transaction-role multisig key
    Single(WeightedMultiSigOptions),
    /// One entry per role; only the transaction-role entry (index 0) is used
    PerRole(Vec<WeightedMultiSigOptions>),
}

impl ToAccountOptions {
    fn transaction_role(&self) -> Option<&WeightedMultiSigOptions> {
        match self {
            ToAccountOptions::Single(options) => Some(options),
            ToAccountOptions::PerRole(options) => options.first(),
        }
    }
}

impl From<WeightedMultiSigOptions> for ToAccountOptions {
    fn from(options: WeightedMultiSigOptions) -> Self {
        ToAccountOptions::Single(options)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keyring {
    address: Address,
    keys: [Vec<Key>; Role::COUNT],
}

impl Keyring {
    // =========================================================================
    // Factories
    // =========================================================================

    /// Single key; address derived from the key.
    pub fn from_key(key: Key) -> Self {
        Self::with_single_key(key.address(), key)
    }

    /// Single key parsed from hex; address derived from the key.
    pub fn from_private_key(private_key: &str) -> SdkResult<Self> {
        Ok(Self::from_key(Key::new(private_key)?))
    }

    /// Single key bound to an explicit (possibly decoupled) address.
    pub fn with_single_key(address: Address, key: Key) -> Self {
        Self::with_role_based_keys(address, [vec![key], Vec::new(), Vec::new()])
    }

    /// Several transaction-role keys bound to one address.
    pub fn with_multiple_keys(address: Address, keys: Vec<Key>) -> Self {
        Self::with_role_based_keys(address, [keys, Vec::new(), Vec::new()])
    }

    pub fn from_private_keys(address: Address, private_keys: &[&str]) -> SdkResult<Self> {
        let keys = private_keys
            .iter()
            .map(|raw| Key::new(raw))
            .collect::<SdkResult<Vec<_>>>()?;
        Ok(Self::with_multiple_keys(address, keys))
    }

    /// Explicit keys per role slot, indexed by [`Role::index`].
    pub fn with_role_based_keys(address: Address, keys: [Vec<Key>; Role::COUNT]) -> Self {
        Self { address, keys }
    }

    /// Random single-key keyring.
    pub fn generate(entropy: Option<&[u8]>) -> Self {
        Self::from_key(Key::generate(entropy))
    }

    /// Value-independent clone.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn keys(&self) -> &[Vec<Key>; Role::COUNT] {
        &self.keys
    }

    /// Keys stored in a role slot, without fallback.
    pub fn keys_by_role(&self, role: Role) -> &[Key] {
        &self.keys[role.index()]
    }

    /// True when the account-update or fee-payer slot holds keys.
    pub fn is_role_based(&self) -> bool {
        !self.keys[Role::AccountUpdate.index()].is_empty()
            || !self.keys[Role::FeePayer.index()].is_empty()
    }

    /// True when the address is not derived from the sole transaction key.
    pub fn is_decoupled(&self) -> bool {
        match self.keys[Role::Transaction.index()].as_slice() {
            [key] if !self.is_role_based() => key.address() != self.address,
            _ => true,
        }
    }

    pub(crate) fn replace_keys(&mut self, keys: [Vec<Key>; Role::COUNT]) {
        self.keys = keys;
    }

    // =========================================================================
    // Signing
    // =========================================================================

    /// Keys for `role` after falling back to the transaction slot.
    fn resolve_keys(&self, role: Role, index: Option<usize>) -> SdkResult<&[Key]> {
        let slot = &self.keys[role.index()];
        if !slot.is_empty() {
            return Ok(slot);
        }
        let fallback = &self.keys[Role::Transaction.index()];
        if !fallback.is_empty() {
            return Ok(fallback);
        }
        Err(SdkError::KeyNotFound { role, index })
    }

    /// Sign with the `index`-th key of the resolved role slot.
    pub fn sign_with_key(
        &self,
        hash: &Hash,
        chain_id: u64,
        role: Role,
        index: usize,
    ) -> SdkResult<SignatureData> {
        let keys = self.resolve_keys(role, Some(index))?;
        let key = keys.get(index).ok_or(SdkError::KeyNotFound {
            role,
            index: Some(index),
        })?;
        key.sign(hash, chain_id)
    }

    /// Sign with every key of the resolved role slot, in key order.
    pub fn sign_with_keys(
        &self,
        hash: &Hash,
        chain_id: u64,
        role: Role,
    ) -> SdkResult<Vec<SignatureData>> {
        self.resolve_keys(role, None)?
            .iter()
            .map(|key| key.sign(hash, chain_id))
            .collect()
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// The account key this keyring would install on-chain.
    ///
    /// - role-based keyrings: [`SdkError::NotImplemented`]
    /// - several transaction keys: weighted multisig from `options`
    ///   (threshold 1 and unit weights when `None`)
    /// - one transaction key: single public key
    pub fn to_account(&self, options: Option<&ToAccountOptions>) -> SdkResult<Account> {
        if self.is_role_based() {
            return Err(SdkError::NotImplemented("role-based account key"));
        }

        let keys = &self.keys[Role::Transaction.index()];
        match keys.as_slice() {
            [] => Err(SdkError::KeyNotFound {
                role: Role::Transaction,
                index: None,
            }),
            [key] => Ok(Account::with_public_key(self.address, key.public_key())),
            many => {
                let public_keys: Vec<PublicKey> = many.iter().map(Key::public_key).collect();
                let default_options;
                let options = match options.and_then(ToAccountOptions::transaction_role) {
                    Some(options) => options,
                    None => {
                        default_options = WeightedMultiSigOptions::new(1, vec![1; many.len()]);
                        &default_options
                    }
                };
                Account::with_weighted_multisig(self.address, &public_keys, options)
            }
        }
    }
}
