//! # Transaction Signing Service
//!
//! Application service implementing [`TransactionSigningApi`].
//!
//! ## Architecture
//!
//! - Uses the outbound [`ChainQuery`] port to fill unset fields
//! - Optionally uses the outbound [`RemoteWallet`] port for key custody
//! - Delegates hashing and signing to [`Signer`] and [`SigningRequest`]
//!
//! ## Filling defaults
//!
//! Gas price, then nonce, then chain id are queried, each only when unset.
//! Results are written only after every lookup has succeeded, so a failed
//! lookup leaves the transaction untouched.

use crate::domain::entities::{encode_hex, Address, SignatureData};
use crate::domain::errors::{SdkError, SdkResult};
use crate::domain::signer::{KeySource, Signer, SigningReceipt, SigningRequest};
use crate::domain::transaction::{DecoderConfig, Transaction, TransactionDecoder, TypedTransaction};
use crate::ports::inbound::TransactionSigningApi;
use crate::ports::outbound::{ChainQuery, RemoteWallet, RemoteWalletError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Service configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Unknown-tag handling for `decode_transaction`
    pub decoder: DecoderConfig,
    /// Fill unset gas price, nonce and chain id before signing
    pub fill_defaults: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            decoder: DecoderConfig::default(),
            fill_defaults: true,
        }
    }
}

impl ServiceConfig {
    /// Strict decoding, defaults filled.
    pub fn for_testing() -> Self {
        Self {
            decoder: DecoderConfig::strict(),
            fill_defaults: true,
        }
    }
}

/// Transaction signing service.
pub struct TransactionSigningService<C: ChainQuery> {
    chain: C,
    remote: Option<Arc<dyn RemoteWallet>>,
    decoder: TransactionDecoder,
    config: ServiceConfig,
}

impl<C: ChainQuery> TransactionSigningService<C> {
    pub fn new(chain: C, config: ServiceConfig) -> Self {
        Self {
            chain,
            remote: None,
            decoder: TransactionDecoder::new(config.decoder.clone()),
            config,
        }
    }

    pub fn with_remote_wallet(mut self, remote: Arc<dyn RemoteWallet>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Fill unset fields, looking up the nonce for `sender` or, when `None`,
    /// for the transaction's `from`.
    pub async fn fill_for<T: Transaction + Send + ?Sized>(
        &self,
        tx: &mut T,
        sender: Option<Address>,
    ) -> SdkResult<()> {
        let common = tx.common();

        let gas_price = match common.gas_price {
            Some(gas_price) => gas_price,
            None => self.chain.gas_price().await?,
        };

        let nonce = match common.nonce {
            Some(nonce) => nonce,
            None => {
                let address = sender
                    .or_else(|| tx.sender())
                    .ok_or(SdkError::MissingField("from"))?;
                self.chain.transaction_count(&address).await?
            }
        };

        let chain_id = match tx.common().chain_id {
            Some(chain_id) => chain_id,
            None => self.chain.chain_id().await?,
        };

        let common = tx.common_mut();
        common.gas_price = Some(gas_price);
        common.nonce = Some(nonce);
        common.chain_id = Some(chain_id);

        debug!(
            tx_type = tx.tx_type().name(),
            nonce,
            chain_id,
            gas_price = %gas_price,
            "Transaction fields filled"
        );
        Ok(())
    }

    async fn prepare<T: Transaction + Send + ?Sized>(
        &self,
        tx: &mut T,
        sender: Option<Address>,
    ) -> SdkResult<()> {
        if self.config.fill_defaults {
            self.fill_for(tx, sender).await?;
        }
        Ok(())
    }

    fn remote(&self) -> SdkResult<&Arc<dyn RemoteWallet>> {
        self.remote.as_ref().ok_or_else(|| {
            RemoteWalletError::Unavailable("no remote wallet configured".to_string()).into()
        })
    }

    async fn remote_signatures(
        &self,
        request: &SigningRequest,
        address: &Address,
        index: Option<usize>,
    ) -> SdkResult<Vec<SignatureData>> {
        let remote = self.remote()?;
        let signatures = match index {
            Some(index) => vec![
                remote
                    .sign_with_key(address, &request.hash, request.chain_id, request.role, index)
                    .await?,
            ],
            None => {
                remote
                    .sign_with_keys(address, &request.hash, request.chain_id, request.role)
                    .await?
            }
        };
        Ok(signatures)
    }
}

#[async_trait]
impl<C: ChainQuery> TransactionSigningApi for TransactionSigningService<C> {
    async fn fill_transaction(&self, tx: &mut TypedTransaction) -> SdkResult<()> {
        self.fill_for(tx, None).await
    }

    async fn sign(
        &self,
        tx: &mut TypedTransaction,
        source: KeySource<'_>,
        index: Option<usize>,
    ) -> SdkResult<SigningReceipt> {
        let address = source.address()?;
        self.prepare(tx, Some(address)).await?;
        Signer::sign(tx, source, index)
    }

    async fn sign_as_fee_payer(
        &self,
        tx: &mut TypedTransaction,
        source: KeySource<'_>,
        index: Option<usize>,
    ) -> SdkResult<SigningReceipt> {
        self.prepare(tx, None).await?;
        Signer::sign_as_fee_payer(tx, source, index)
    }

    async fn sign_with_remote(
        &self,
        tx: &mut TypedTransaction,
        address: Address,
        index: Option<usize>,
    ) -> SdkResult<SigningReceipt> {
        self.remote()?;
        self.prepare(tx, Some(address)).await?;

        let request = SigningRequest::for_sender(tx)?;
        request.check_signer(address)?;
        let signatures = self.remote_signatures(&request, &address, index).await?;
        tx.append_signatures(signatures.clone().into())?;

        info!(
            address = %address,
            tx_type = tx.tx_type().name(),
            signatures = signatures.len(),
            hash = %encode_hex(&request.hash),
            "Transaction signed through remote wallet"
        );
        Ok(SigningReceipt {
            hash: request.hash,
            role: request.role,
            signatures,
        })
    }

    async fn sign_as_fee_payer_with_remote(
        &self,
        tx: &mut TypedTransaction,
        index: Option<usize>,
    ) -> SdkResult<SigningReceipt> {
        self.remote()?;
        self.prepare(tx, None).await?;

        let request = SigningRequest::for_fee_payer(tx)?;
        let fee_payer = request.signer.ok_or(SdkError::MissingFeePayer)?;
        let signatures = self.remote_signatures(&request, &fee_payer, index).await?;
        tx.append_fee_payer_signatures(signatures.clone().into())?;

        info!(
            fee_payer = %fee_payer,
            tx_type = tx.tx_type().name(),
            signatures = signatures.len(),
            hash = %encode_hex(&request.hash),
            "Transaction signed by fee payer through remote wallet"
        );
        Ok(SigningReceipt {
            hash: request.hash,
            role: request.role,
            signatures,
        })
    }

    fn decode_transaction(&self, bytes: &[u8]) -> SdkResult<TypedTransaction> {
        self.decoder.decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{LocalRemoteWallet, StaticChainQuery};
    use crate::domain::entities::Role;
    use crate::domain::key::Key;
    use crate::domain::keyring::Keyring;
    use crate::domain::transaction::{
        FeeDelegatedValueTransfer, LegacyTransaction, TxCommon, ValueTransfer,
    };
    use crate::ports::outbound::ChainQueryError;
    use primitive_types::U256;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(seed: u8) -> Key {
        Key::from_bytes(&[seed; 32]).unwrap()
    }

    fn unfilled(from: Address) -> TypedTransaction {
        ValueTransfer::new(TxCommon::new(30_000), from, Address([0xaa; 20]), U256::one()).into()
    }

    /// Answers gas price, fails the nonce lookup, counts chain id calls.
    struct FailingNonceQuery {
        chain_id_calls: AtomicUsize,
    }

    #[async_trait]
    impl ChainQuery for FailingNonceQuery {
        async fn gas_price(&self) -> Result<U256, ChainQueryError> {
            Ok(U256::from(1u64))
        }

        async fn transaction_count(&self, _address: &Address) -> Result<u64, ChainQueryError> {
            Err(ChainQueryError::Unavailable("node offline".to_string()))
        }

        async fn chain_id(&self) -> Result<u64, ChainQueryError> {
            self.chain_id_calls.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        }
    }

    #[tokio::test]
    async fn test_fill_sets_only_missing_fields() {
        let from = key(1).address();
        let chain = StaticChainQuery::new(25_000_000_000u64, 1001).with_nonce(from, 5);
        let service = TransactionSigningService::new(chain, ServiceConfig::for_testing());

        let mut tx = unfilled(from);
        tx.common_mut().chain_id = Some(7);
        service.fill_transaction(&mut tx).await.unwrap();

        assert_eq!(tx.common().gas_price, Some(U256::from(25_000_000_000u64)));
        assert_eq!(tx.common().nonce, Some(5));
        assert_eq!(tx.common().chain_id, Some(7));
    }

    #[tokio::test]
    async fn test_fill_failure_leaves_transaction_untouched() {
        let chain = FailingNonceQuery {
            chain_id_calls: AtomicUsize::new(0),
        };
        let service = TransactionSigningService::new(chain, ServiceConfig::default());
        let mut tx = unfilled(key(1).address());
        let before = tx.clone();

        let result = service.fill_transaction(&mut tx).await;
        assert_eq!(
            result,
            Err(SdkError::ChainQuery(ChainQueryError::Unavailable(
                "node offline".to_string()
            )))
        );
        assert_eq!(tx, before);
        assert_eq!(service.chain.chain_id_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_legacy_nonce_uses_signing_address() {
        let keyring = Keyring::from_key(key(2));
        let chain = StaticChainQuery::new(1u64, 1).with_nonce(keyring.address(), 11);
        let service = TransactionSigningService::new(chain, ServiceConfig::default());

        let mut tx: TypedTransaction =
            LegacyTransaction::new(TxCommon::new(21_000), None, U256::zero(), vec![0x60]).into();
        assert_eq!(
            service.fill_transaction(&mut tx.clone()).await,
            Err(SdkError::MissingField("from"))
        );

        service
            .sign(&mut tx, KeySource::Keyring(&keyring), None)
            .await
            .unwrap();
        assert_eq!(tx.common().nonce, Some(11));
        assert!(tx.is_signed());
    }

    #[tokio::test]
    async fn test_sign_without_fill_requires_fields() {
        let keyring = Keyring::from_key(key(1));
        let config = ServiceConfig {
            fill_defaults: false,
            ..ServiceConfig::default()
        };
        let service = TransactionSigningService::new(StaticChainQuery::new(1u64, 1), config);
        let mut tx = unfilled(keyring.address());
        assert_eq!(
            service
                .sign(&mut tx, KeySource::Keyring(&keyring), None)
                .await,
            Err(SdkError::MissingField("nonce"))
        );
    }

    #[tokio::test]
    async fn test_remote_signing_matches_local() {
        let keyring = Keyring::from_key(key(3));
        let remote = Arc::new(LocalRemoteWallet::default());
        remote.add(&keyring).unwrap();
        let service = TransactionSigningService::new(StaticChainQuery::new(5u64, 1), ServiceConfig::default())
            .with_remote_wallet(remote);

        let mut remote_tx = unfilled(keyring.address());
        let receipt = service
            .sign_with_remote(&mut remote_tx, keyring.address(), None)
            .await
            .unwrap();
        assert_eq!(receipt.role, Role::Transaction);

        let mut local_tx = unfilled(keyring.address());
        service
            .sign(&mut local_tx, KeySource::Keyring(&keyring), None)
            .await
            .unwrap();
        assert_eq!(remote_tx, local_tx);
    }

    #[tokio::test]
    async fn test_remote_fee_payer_signing() {
        let sender = Keyring::from_key(key(4));
        let payer = Keyring::from_key(key(5));
        let remote = Arc::new(LocalRemoteWallet::default());
        remote.add(&payer).unwrap();
        let service = TransactionSigningService::new(StaticChainQuery::new(5u64, 1), ServiceConfig::default())
            .with_remote_wallet(remote);

        let mut tx: TypedTransaction = FeeDelegatedValueTransfer::new(
            TxCommon::new(50_000),
            sender.address(),
            Address([0xaa; 20]),
            U256::one(),
        )
        .with_fee_payer(payer.address())
        .into();

        service
            .sign(&mut tx, KeySource::Keyring(&sender), None)
            .await
            .unwrap();
        let receipt = service
            .sign_as_fee_payer_with_remote(&mut tx, Some(0))
            .await
            .unwrap();
        assert_eq!(receipt.role, Role::FeePayer);
        assert_eq!(
            tx.fee_delegation().unwrap().fee_payer_signatures(),
            receipt.signatures.as_slice()
        );
    }

    #[tokio::test]
    async fn test_remote_not_configured() {
        let service =
            TransactionSigningService::new(StaticChainQuery::new(1u64, 1), ServiceConfig::default());
        let mut tx = unfilled(key(1).address());
        assert!(matches!(
            service.sign_with_remote(&mut tx, key(1).address(), None).await,
            Err(SdkError::RemoteWallet(RemoteWalletError::Unavailable(_)))
        ));
        assert_eq!(tx.common().nonce, None);
    }

    #[test]
    fn test_decode_uses_configured_policy() {
        let strict = TransactionSigningService::new(
            StaticChainQuery::new(1u64, 1),
            ServiceConfig::for_testing(),
        );
        assert_eq!(
            strict.decode_transaction(&[0x7f, 0xc0]),
            Err(SdkError::UnknownTransactionType(0x7f))
        );
    }

    #[test]
    fn test_config_from_json() {
        let config: ServiceConfig = serde_json::from_str(
            r#"{"decoder":{"unknown_tag_policy":"Reject"},"fill_defaults":false}"#,
        )
        .unwrap();
        assert_eq!(config.decoder, DecoderConfig::strict());
        assert!(!config.fill_defaults);

        let json = serde_json::to_string(&ServiceConfig::default()).unwrap();
        assert!(json.contains("FallbackToLegacy"));
    }
}
