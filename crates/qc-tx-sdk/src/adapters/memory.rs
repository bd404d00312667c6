//! In-memory chain and wallet adapters.

use crate::domain::entities::{Address, Hash, Role, SignatureData};
use crate::domain::errors::SdkResult;
use crate::domain::keyring::Keyring;
use crate::domain::wallet::Wallet;
use crate::ports::outbound::{ChainQuery, ChainQueryError, RemoteWallet, RemoteWalletError};
use async_trait::async_trait;
use parking_lot::RwLock;
use primitive_types::U256;
use std::collections::HashMap;
use tracing::debug;

/// Chain query with fixed answers.
///
/// Unknown addresses report a transaction count of zero.
pub struct StaticChainQuery {
    gas_price: U256,
    chain_id: u64,
    nonces: RwLock<HashMap<Address, u64>>,
}

impl StaticChainQuery {
    pub fn new(gas_price: impl Into<U256>, chain_id: u64) -> Self {
        Self {
            gas_price: gas_price.into(),
            chain_id,
            nonces: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_nonce(self, address: Address, nonce: u64) -> Self {
        self.set_nonce(address, nonce);
        self
    }

    pub fn set_nonce(&self, address: Address, nonce: u64) {
        self.nonces.write().insert(address, nonce);
    }
}

#[async_trait]
impl ChainQuery for StaticChainQuery {
    async fn gas_price(&self) -> Result<U256, ChainQueryError> {
        Ok(self.gas_price)
    }

    async fn transaction_count(&self, address: &Address) -> Result<u64, ChainQueryError> {
        Ok(self.nonces.read().get(address).copied().unwrap_or(0))
    }

    async fn chain_id(&self) -> Result<u64, ChainQueryError> {
        Ok(self.chain_id)
    }
}

/// A local [`Wallet`] served through the remote-wallet port.
#[derive(Default)]
pub struct LocalRemoteWallet {
    wallet: RwLock<Wallet>,
}

impl LocalRemoteWallet {
    pub fn new(wallet: Wallet) -> Self {
        Self {
            wallet: RwLock::new(wallet),
        }
    }

    pub fn add(&self, keyring: &Keyring) -> SdkResult<Address> {
        Ok(self.wallet.write().add(keyring)?.address())
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.wallet.read().is_existed(address)
    }
}

fn rejected(error: impl std::fmt::Display) -> RemoteWalletError {
    RemoteWalletError::Rejected(error.to_string())
}

#[async_trait]
impl RemoteWallet for LocalRemoteWallet {
    async fn sign_with_key(
        &self,
        address: &Address,
        hash: &Hash,
        chain_id: u64,
        role: Role,
        index: usize,
    ) -> Result<SignatureData, RemoteWalletError> {
        debug!(address = %address, ?role, index, "Local remote wallet signing");
        self.wallet
            .read()
            .sign_with_key(address, hash, chain_id, role, index)
            .map_err(rejected)
    }

    async fn sign_with_keys(
        &self,
        address: &Address,
        hash: &Hash,
        chain_id: u64,
        role: Role,
    ) -> Result<Vec<SignatureData>, RemoteWalletError> {
        debug!(address = %address, ?role, "Local remote wallet signing with all role keys");
        self.wallet
            .read()
            .sign_with_keys(address, hash, chain_id, role)
            .map_err(rejected)
    }
}
