//! # Inbound Port - TransactionSigningApi
//!
//! | Method | Effect on the transaction |
//! |--------|---------------------------|
//! | `fill_transaction` | Sets unset gas price, nonce and chain id |
//! | `sign` / `sign_with_remote` | Appends sender signatures |
//! | `sign_as_fee_payer` / `sign_as_fee_payer_with_remote` | Appends fee payer signatures |
//! | `decode_transaction` | None; parses raw bytes |

use crate::domain::entities::Address;
use crate::domain::errors::SdkResult;
use crate::domain::signer::{KeySource, SigningReceipt};
use crate::domain::transaction::TypedTransaction;
use async_trait::async_trait;

/// Transaction preparation and signing.
///
/// Every method either completes or leaves the transaction as it was.
#[async_trait]
pub trait TransactionSigningApi: Send + Sync {
    /// Query and set whichever of gas price, nonce and chain id are unset.
    ///
    /// Lookups run in that order; nothing is written unless all succeed.
    async fn fill_transaction(&self, tx: &mut TypedTransaction) -> SdkResult<()>;

    /// Sign as sender with local keys.
    async fn sign(
        &self,
        tx: &mut TypedTransaction,
        source: KeySource<'_>,
        index: Option<usize>,
    ) -> SdkResult<SigningReceipt>;

    /// Sign as fee payer with local keys.
    async fn sign_as_fee_payer(
        &self,
        tx: &mut TypedTransaction,
        source: KeySource<'_>,
        index: Option<usize>,
    ) -> SdkResult<SigningReceipt>;

    /// Sign as sender through the configured remote wallet.
    async fn sign_with_remote(
        &self,
        tx: &mut TypedTransaction,
        address: Address,
        index: Option<usize>,
    ) -> SdkResult<SigningReceipt>;

    /// Sign as fee payer through the configured remote wallet.
    async fn sign_as_fee_payer_with_remote(
        &self,
        tx: &mut TypedTransaction,
        index: Option<usize>,
    ) -> SdkResult<SigningReceipt>;

    /// Decode raw bytes with the configured decoder policy.
    fn decode_transaction(&self, bytes: &[u8]) -> SdkResult<TypedTransaction>;
}
