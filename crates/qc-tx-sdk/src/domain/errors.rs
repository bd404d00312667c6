//! # SDK Errors
//!
//! Error taxonomy for transaction construction, encoding and signing.
//!
//! - **Validation** errors surface at construction time.
//! - **Capability** errors surface at signing time.
//! - **Decoding** errors surface when raw bytes are parsed.
//! - **Collaborator** errors are passed through unchanged from the ports.

use super::entities::{Address, Role, TxType};
use crate::ports::outbound::{ChainQueryError, RemoteWalletError};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type SdkResult<T> = Result<T, SdkError>;

/// Errors produced by the transaction SDK.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SdkError {
    // =========================================================================
    // Validation
    // =========================================================================
    /// Private key is not a scalar in (0, n)
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Public key is malformed or not on the curve
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Address is not 20 bytes of hex
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Input is not valid hex
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Two values that must agree do not
    #[error("Inconsistency: {0}")]
    Inconsistency(String),

    /// Multisig threshold is zero or exceeds the sum of weights
    #[error("Invalid threshold {threshold}: must be between 1 and total weight {total_weight}")]
    InvalidThreshold { threshold: u64, total_weight: u64 },

    /// Weight list is empty, has a zero weight, or does not match the key count
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Fee ratio outside 1..=99
    #[error("Invalid fee ratio {0}: must be between 1 and 99")]
    InvalidFeeRatio(u8),

    // =========================================================================
    // Capability
    // =========================================================================
    /// No key in the resolved role slot at the requested index
    #[error("Key not found for role {role:?} at index {index:?}")]
    KeyNotFound { role: Role, index: Option<usize> },

    /// Wallet has no keyring for the address
    #[error("Keyring not found for address {0}")]
    KeyringNotFound(Address),

    /// Wallet already holds a keyring for the address
    #[error("Duplicate account: {0} already exists in the wallet")]
    DuplicateAccount(Address),

    /// Fee payer signing attempted before a fee payer address was set
    #[error("Fee payer is not set")]
    MissingFeePayer,

    /// Fee payer operation on a transaction type without fee delegation
    #[error("{0:?} is not a fee-delegated transaction type")]
    NotFeeDelegated(TxType),

    /// Legacy transactions hold a single signature
    #[error("Legacy transaction already has a signature")]
    LegacySignatureAlreadyExists,

    /// Legacy transactions cannot take a list of signatures
    #[error("Legacy transaction accepts one signature, got {0}")]
    LegacyMultipleSignatures(usize),

    /// Field required for encoding or signing is unset
    #[error("Missing field `{0}`: set it or fill the transaction first")]
    MissingField(&'static str),

    /// The signing backend rejected the request
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Behaviour that is recognised but intentionally not provided
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    // =========================================================================
    // Decoding
    // =========================================================================
    /// RLP prefix or payload is malformed
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Leading type tag is not a known transaction type
    #[error("Unknown transaction type tag: {0:#04x}")]
    UnknownTransactionType(u8),

    /// Leading tag is not a known account key type
    #[error("Unknown account key type tag: {0:#04x}")]
    UnknownAccountKeyType(u8),

    /// RLP list has the wrong number of fields for the variant
    #[error("Field count mismatch: expected {expected}, got {actual}")]
    FieldCountMismatch { expected: usize, actual: usize },

    // =========================================================================
    // Collaborators
    // =========================================================================
    /// Chain query collaborator failed
    #[error(transparent)]
    ChainQuery(#[from] ChainQueryError),

    /// Remote wallet collaborator failed
    #[error(transparent)]
    RemoteWallet(#[from] RemoteWalletError),
}

impl From<rlp::DecoderError> for SdkError {
    fn from(err: rlp::DecoderError) -> Self {
        SdkError::MalformedEncoding(err.to_string())
    }
}

impl From<hex::FromHexError> for SdkError {
    fn from(err: hex::FromHexError) -> Self {
        SdkError::InvalidHex(err.to_string())
    }
}
