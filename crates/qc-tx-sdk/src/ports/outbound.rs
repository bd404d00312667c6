//! Outbound (Driven) ports for the transaction SDK.
//!
//! Collaborators the SDK consumes but does not implement itself: a chain
//! endpoint for filling defaults and an optional remote key custodian.
//! Neither is retried here; errors pass through unchanged.

use crate::domain::entities::{Address, Hash, Role, SignatureData};
use async_trait::async_trait;
use primitive_types::U256;
use thiserror::Error;

/// Failures reported by a [`ChainQuery`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainQueryError {
    /// Endpoint could not be reached
    #[error("Chain endpoint unavailable: {0}")]
    Unavailable(String),

    /// Endpoint answered with something unusable
    #[error("Invalid chain response: {0}")]
    InvalidResponse(String),
}

/// Failures reported by a [`RemoteWallet`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteWalletError {
    /// Custodian could not be reached
    #[error("Remote wallet unavailable: {0}")]
    Unavailable(String),

    /// Custodian refused or failed to sign
    #[error("Remote signing rejected: {0}")]
    Rejected(String),
}

/// Read-only chain lookups used to fill unset transaction fields.
#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// Current gas price.
    async fn gas_price(&self) -> Result<U256, ChainQueryError>;

    /// Next nonce for `address` (count of its transactions, pending included).
    async fn transaction_count(&self, address: &Address) -> Result<u64, ChainQueryError>;

    async fn chain_id(&self) -> Result<u64, ChainQueryError>;
}

/// Key custody outside the process (HSM, KMS, another wallet).
///
/// Same contracts as [`crate::domain::keyring::Keyring::sign_with_key`] and
/// [`crate::domain::keyring::Keyring::sign_with_keys`], addressed by account.
#[async_trait]
pub trait RemoteWallet: Send + Sync {
    async fn sign_with_key(
        &self,
        address: &Address,
        hash: &Hash,
        chain_id: u64,
        role: Role,
        index: usize,
    ) -> Result<SignatureData, RemoteWalletError>;

    async fn sign_with_keys(
        &self,
        address: &Address,
        hash: &Hash,
        chain_id: u64,
        role: Role,
    ) -> Result<Vec<SignatureData>, RemoteWalletError>;
}
