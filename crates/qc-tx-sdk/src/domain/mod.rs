//! # Domain Layer - Transaction SDK
//!
//! Pure logic, no I/O.
//!
//! ## Components
//!
//! - `codec`: keccak256, minimal naturals, RLP helpers and positional field reader
//! - `entities`: Address, SignatureData, Role, TxType
//! - `key`, `account_key`, `account`: key material and on-chain key descriptions
//! - `keyring`, `wallet`: role-keyed key bundles and their address index
//! - `transaction`: transaction variants, the `Transaction` capability, decoder
//! - `signer`: stateless signing orchestration
//! - `errors`: SdkError enumeration

pub mod account;
pub mod account_key;
pub mod codec;
pub mod entities;
pub mod errors;
pub mod key;
pub mod keyring;
pub mod signer;
pub mod transaction;
pub mod wallet;

pub use account::Account;
pub use account_key::{
    AccountKey, AccountKeyPublic, AccountKeyWeightedMultiSig, WeightedMultiSigOptions,
    WeightedPublicKey,
};
pub use codec::keccak256;
pub use entities::{Address, Hash, Role, SignatureData, SignatureInput, TxType};
pub use errors::{SdkError, SdkResult};
pub use key::{Key, PublicKey};
pub use keyring::{Keyring, ToAccountOptions};
pub use signer::{KeySource, Signer, SigningReceipt, SigningRequest};
pub use transaction::{
    AccountUpdate, Cancel, DecoderConfig, FeeDelegatedAccountUpdate, FeeDelegatedValueTransfer,
    FeeDelegatedValueTransferMemo, FeeDelegatedValueTransferWithRatio, FeeDelegation,
    LegacyTransaction, Transaction, TransactionDecoder, TxCommon, TypedTransaction,
    UnknownTagPolicy, ValueTransfer, ValueTransferMemo,
};
pub use wallet::Wallet;
