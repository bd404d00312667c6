//! Adapters layer for the transaction SDK.
//!
//! In-memory implementations of the outbound ports, for tests and for
//! callers that already know the chain parameters.

pub mod memory;

pub use memory::{LocalRemoteWallet, StaticChainQuery};
