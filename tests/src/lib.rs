//! # Transaction SDK Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── golden_vectors.rs   # Fixed encodings and hashes per transaction type
//!     └── signing_flows.rs    # Service, keyring, wallet and fee payer flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests
//! RUST_LOG=qc_tx_sdk=debug cargo test -p qc-tests integration::signing_flows
//! ```

pub mod integration;
