//! # Transaction SDK (QC-TX-SDK)
//!
//! Client-side construction, encoding and signing of account-based chain
//! transactions.
//!
//! ## Purpose
//!
//! Turns "I hold these private keys" into byte strings a node accepts:
//! typed transactions with RLP wire formats, multi-key and role-based
//! keyrings, and signing flows where the sender and a separate fee payer sign
//! different payloads of the same transaction.
//!
//! ## Transaction Types
//!
//! | Type | Tag | Fee payer | Sender role |
//! |------|-----|-----------|-------------|
//! | `LegacyTransaction` | none | no | Transaction |
//! | `ValueTransfer` | `0x08` | no | Transaction |
//! | `FeeDelegatedValueTransfer` | `0x09` | yes | Transaction |
//! | `FeeDelegatedValueTransferWithRatio` | `0x0a` | partial | Transaction |
//! | `ValueTransferMemo` | `0x10` | no | Transaction |
//! | `FeeDelegatedValueTransferMemo` | `0x11` | yes | Transaction |
//! | `AccountUpdate` | `0x20` | no | AccountUpdate |
//! | `FeeDelegatedAccountUpdate` | `0x21` | yes | AccountUpdate |
//! | `Cancel` | `0x38` | no | Transaction |
//!
//! ## Signing Flow
//!
//! ```text
//! [Unsigned] ──sign──→ [PartiallySigned] ──sign_as_fee_payer──→ [PartiallySigned]
//!                                                                     │
//!                                         rlp_encoding() ←────────────┘
//! ```
//!
//! Encoding is a pure function callable in any state. Whether enough
//! signatures exist for the chain to accept the result is up to the caller.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/ - StaticChainQuery, LocalRemoteWallet                │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - TransactionSigningApi                      │
//! │  ports/outbound.rs - ChainQuery, RemoteWallet                   │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/ - keys, keyrings, wallet, transactions, signer         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use qc_tx_sdk::{Keyring, KeySource, Signer, Transaction, TxCommon, ValueTransfer};
//!
//! let keyring = Keyring::from_private_key("0x...")?;
//! let common = TxCommon::new(30_000).with_nonce(0).with_gas_price(25_000_000_000u64).with_chain_id(1);
//! let mut tx = ValueTransfer::new(common, keyring.address(), to, value);
//! Signer::sign(&mut tx, KeySource::Keyring(&keyring), None)?;
//! let raw = tx.rlp_encoding_hex()?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{LocalRemoteWallet, StaticChainQuery};
pub use domain::*;
pub use ports::inbound::TransactionSigningApi;
pub use ports::outbound::{ChainQuery, ChainQueryError, RemoteWallet, RemoteWalletError};
pub use service::{ServiceConfig, TransactionSigningService};
