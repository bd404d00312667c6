//! # Wallet
//!
//! Address-indexed collection of keyrings.
//!
//! Entries live in an append-only arena; a parallel map resolves an address to
//! its arena slot. Stored keyrings are copies, so later changes to the
//! caller's keyring do not leak into the wallet.

use super::entities::{Address, Hash, Role, SignatureData};
use super::errors::{SdkError, SdkResult};
use super::keyring::Keyring;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Clone, Debug, Default)]
pub struct Wallet {
    keyrings: Vec<Keyring>,
    index: HashMap<Address, usize>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` freshly generated single-key keyrings.
    pub fn generate(&mut self, count: usize, entropy: Option<&[u8]>) -> SdkResult<Vec<Address>> {
        let mut addresses = Vec::with_capacity(count);
        for _ in 0..count {
            let keyring = Keyring::generate(entropy);
            addresses.push(self.add(&keyring)?.address());
        }
        Ok(addresses)
    }

    /// Store a copy of `keyring`.
    ///
    /// Fails with [`SdkError::DuplicateAccount`] if the address is already
    /// present.
    pub fn add(&mut self, keyring: &Keyring) -> SdkResult<&Keyring> {
        let address = keyring.address();
        if self.index.contains_key(&address) {
            return Err(SdkError::DuplicateAccount(address));
        }

        let slot = self.keyrings.len();
        self.keyrings.push(keyring.copy());
        self.index.insert(address, slot);

        info!(address = %address, slot, "Keyring added to wallet");
        Ok(&self.keyrings[slot])
    }

    pub fn get_keyring(&self, address: &Address) -> SdkResult<&Keyring> {
        self.index
            .get(address)
            .map(|&slot| &self.keyrings[slot])
            .ok_or(SdkError::KeyringNotFound(*address))
    }

    pub fn is_existed(&self, address: &Address) -> bool {
        self.index.contains_key(address)
    }

    /// Replace the key material of the stored keyring at the same address.
    pub fn update_keyring(&mut self, keyring: &Keyring) -> SdkResult<&Keyring> {
        let address = keyring.address();
        let slot = *self
            .index
            .get(&address)
            .ok_or(SdkError::KeyringNotFound(address))?;

        let stored = &mut self.keyrings[slot];
        stored.replace_keys(keyring.keys().clone());

        info!(address = %address, slot, "Keyring updated in wallet");
        Ok(stored)
    }

    pub fn len(&self) -> usize {
        self.keyrings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyrings.is_empty()
    }

    /// Keyrings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Keyring> {
        self.keyrings.iter()
    }

    pub fn sign_with_key(
        &self,
        address: &Address,
        hash: &Hash,
        chain_id: u64,
        role: Role,
        index: usize,
    ) -> SdkResult<SignatureData> {
        debug!(address = %address, ?role, index, "Wallet signing with key");
        self.get_keyring(address)?
            .sign_with_key(hash, chain_id, role, index)
    }

    pub fn sign_with_keys(
        &self,
        address: &Address,
        hash: &Hash,
        chain_id: u64,
        role: Role,
    ) -> SdkResult<Vec<SignatureData>> {
        debug!(address = %address, ?role, "Wallet signing with all role keys");
        self.get_keyring(address)?.sign_with_keys(hash, chain_id, role)
    }
}
