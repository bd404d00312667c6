//! # Signing Flows
//!
//! End-to-end flows through the public API: service filling, wallet lookup,
//! sender then fee payer signing across a hex hand-off, multisig account
//! updates and remote key custody.

#[cfg(test)]
mod tests {
    use crate::integration::init_tracing;
    use primitive_types::U256;
    use qc_tx_sdk::{
        Account, AccountKey, AccountUpdate, Address, FeeDelegatedValueTransfer,
        FeeDelegatedValueTransferWithRatio, Key, KeySource, Keyring, LocalRemoteWallet, Role,
        SdkError, ServiceConfig, Signer, StaticChainQuery, Transaction, TransactionDecoder,
        TransactionSigningApi, TransactionSigningService, TxCommon, TypedTransaction,
        ValueTransfer, Wallet,
    };
    use std::sync::Arc;
    use tracing::info;

    const SENDER_KEY: &str = "0x4646464646464646464646464646464646464646464646464646464646464646";
    const FEE_PAYER_KEY: &str = "0x4747474747474747474747474747474747474747474747474747474747474747";
    const VALUE_TRANSFER_RAW: &str = "0x08f884808505d21dba0082753094aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa880de0b6b3a764000094bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbf845f84325a0b5721e4baf22749cd6c60168865410aa92645f6fd05af88e8191a9f2845210cba02449a35f674cdb97d374524d57cceaaa29203e599b2614d1f246f9014db76f3f";

    fn address(byte: u8) -> Address {
        Address([byte; 20])
    }

    fn key(byte: u8) -> Key {
        Key::from_bytes(&[byte; 32]).unwrap()
    }

    fn service() -> TransactionSigningService<StaticChainQuery> {
        TransactionSigningService::new(
            StaticChainQuery::new(25_000_000_000u64, 1),
            ServiceConfig::for_testing(),
        )
    }

    fn filled(nonce: u64, gas: u64) -> TxCommon {
        TxCommon::new(gas)
            .with_nonce(nonce)
            .with_gas_price(25_000_000_000u64)
            .with_chain_id(1)
    }

    // =============================================================================
    // SERVICE
    // =============================================================================

    #[tokio::test]
    async fn test_service_fills_and_signs_value_transfer() {
        init_tracing();
        let service = service();
        let keyring = Keyring::with_single_key(address(0xbb), Key::new(SENDER_KEY).unwrap());

        let mut tx: TypedTransaction = ValueTransfer::new(
            TxCommon::new(30_000),
            address(0xbb),
            address(0xaa),
            U256::from(1_000_000_000_000_000_000u64),
        )
        .into();

        service
            .sign(&mut tx, KeySource::Keyring(&keyring), None)
            .await
            .unwrap();

        assert_eq!(tx.common().nonce, Some(0));
        assert_eq!(tx.common().chain_id, Some(1));
        assert_eq!(tx.rlp_encoding_hex().unwrap(), VALUE_TRANSFER_RAW);
    }

    #[tokio::test]
    async fn test_service_uses_chain_nonce_for_sender() {
        init_tracing();
        let keyring = Keyring::from_key(key(3));
        let service = TransactionSigningService::new(
            StaticChainQuery::new(1u64, 1001).with_nonce(keyring.address(), 42),
            ServiceConfig::default(),
        );

        let mut tx: TypedTransaction =
            ValueTransfer::new(TxCommon::new(21_000), keyring.address(), address(1), U256::one())
                .into();
        service
            .sign(&mut tx, KeySource::Keyring(&keyring), None)
            .await
            .unwrap();

        assert_eq!(tx.common().nonce, Some(42));
        assert_eq!(tx.common().gas_price, Some(U256::one()));
        assert_eq!(tx.common().chain_id, Some(1001));
    }

    // =============================================================================
    // FEE DELEGATION
    // =============================================================================

    #[test]
    fn test_fee_ratio_flow_through_wallet() {
        init_tracing();
        let sender = Keyring::from_private_key(SENDER_KEY).unwrap();
        let fee_payer = Keyring::from_private_key(FEE_PAYER_KEY).unwrap();
        let mut wallet = Wallet::new();
        wallet.add(&sender).unwrap();
        wallet.add(&fee_payer).unwrap();

        let mut tx = FeeDelegatedValueTransferWithRatio::new(
            filled(1, 50_000),
            sender.address(),
            address(0xaa),
            U256::one(),
            30,
        )
        .unwrap()
        .with_fee_payer(fee_payer.address());

        Signer::sign(
            &mut tx,
            KeySource::Wallet {
                wallet: &wallet,
                address: sender.address(),
            },
            None,
        )
        .unwrap();
        Signer::sign_as_fee_payer(
            &mut tx,
            KeySource::Wallet {
                wallet: &wallet,
                address: fee_payer.address(),
            },
            None,
        )
        .unwrap();

        let raw = tx.rlp_encoding().unwrap();
        match TransactionDecoder::default().decode(&raw).unwrap() {
            TypedTransaction::FeeDelegatedValueTransferWithRatio(decoded) => {
                assert_eq!(decoded.fee_ratio(), 30);
                assert_eq!(decoded.fee_delegation.fee_payer, Some(fee_payer.address()));
                assert!(decoded.signatures().iter().all(|sig| !sig.is_empty()));
                assert!(decoded
                    .fee_delegation
                    .fee_payer_signatures()
                    .iter()
                    .all(|sig| !sig.is_empty()));
            }
            other => panic!("unexpected variant {:?}", other.tx_type()),
        }
    }

    #[tokio::test]
    async fn test_fee_payer_signs_after_hex_hand_off() {
        init_tracing();
        let sender = Keyring::from_key(key(5));
        let fee_payer = Keyring::from_key(key(6));

        let mut tx = FeeDelegatedValueTransfer::new(
            filled(7, 60_000),
            sender.address(),
            address(0xcc),
            U256::from(10u64),
        )
        .with_fee_payer(fee_payer.address());
        Signer::sign(&mut tx, KeySource::Keyring(&sender), None).unwrap();

        let sender_tx_hash = tx.sender_tx_hash().unwrap();
        let raw = tx.rlp_encoding_hex().unwrap();
        info!(raw = %raw, "Sender hand-off");

        // The fee payer only sees the hex string; chain id comes from the chain.
        let service = service();
        let bytes = ::hex::decode(raw.trim_start_matches("0x")).unwrap();
        let mut received = service.decode_transaction(&bytes).unwrap();
        assert_eq!(received.common().chain_id, None);

        let receipt = service
            .sign_as_fee_payer(&mut received, KeySource::Keyring(&fee_payer), None)
            .await
            .unwrap();

        assert_eq!(receipt.role, Role::FeePayer);
        assert_eq!(received.sender_tx_hash().unwrap(), sender_tx_hash);
        assert_ne!(received.transaction_hash().unwrap(), sender_tx_hash);
        assert_eq!(received.signatures(), tx.signatures());
    }

    #[test]
    fn test_fee_payer_must_match_transaction() {
        let sender = Keyring::from_key(key(5));
        let mut tx = FeeDelegatedValueTransfer::new(
            filled(0, 60_000),
            sender.address(),
            address(0xcc),
            U256::one(),
        )
        .with_fee_payer(address(0xdd));

        let result = Signer::sign_as_fee_payer(&mut tx, KeySource::Keyring(&sender), None);
        assert!(matches!(result, Err(SdkError::Inconsistency(_))));
        assert!(tx.fee_delegation.fee_payer_signatures()[0].is_empty());
    }

    // =============================================================================
    // ACCOUNT UPDATE
    // =============================================================================

    #[test]
    fn test_account_update_address_case_and_mismatch() {
        let lower: Address = "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f".parse().unwrap();
        let upper: Address = "0x9D8A62F656A8D1615C1294FD71E9CFB3E4855A4F".parse().unwrap();
        let new_key = key(9).public_key();

        let tx = AccountUpdate::new(
            filled(0, 300_000),
            lower,
            Account::with_public_key(upper, new_key.clone()),
        );
        assert!(tx.is_ok());

        let result = AccountUpdate::new(
            filled(0, 300_000),
            lower,
            Account::with_public_key(address(0x01), new_key),
        );
        assert!(matches!(result, Err(SdkError::Inconsistency(_))));
    }

    #[test]
    fn test_multisig_keyring_updates_account() {
        init_tracing();
        let owner = address(0x77);
        let keyring = Keyring::with_multiple_keys(owner, vec![key(1), key(2), key(3)]);
        let account = keyring.to_account(None).unwrap();

        match account.account_key() {
            AccountKey::WeightedMultiSig(multisig) => {
                assert_eq!(multisig.threshold(), 1);
                assert_eq!(multisig.weighted_public_keys().len(), 3);
            }
            other => panic!("expected multisig, got {:?}", other),
        }

        let mut tx = AccountUpdate::new(filled(2, 300_000), owner, account.clone()).unwrap();
        let receipt = Signer::sign(&mut tx, KeySource::Keyring(&keyring), None).unwrap();
        assert_eq!(receipt.role, Role::AccountUpdate);
        assert_eq!(tx.signatures().len(), 3);

        match TransactionDecoder::default()
            .decode(&tx.rlp_encoding().unwrap())
            .unwrap()
        {
            TypedTransaction::AccountUpdate(decoded) => {
                assert_eq!(decoded.account(), &account);
                assert_eq!(decoded.signatures(), tx.signatures());
            }
            other => panic!("unexpected variant {:?}", other.tx_type()),
        }
    }

    // =============================================================================
    // REMOTE WALLET
    // =============================================================================

    #[tokio::test]
    async fn test_remote_wallet_flow_matches_local() {
        init_tracing();
        let sender = Keyring::from_key(key(11));
        let fee_payer = Keyring::from_key(key(12));

        let remote = LocalRemoteWallet::default();
        remote.add(&sender).unwrap();
        remote.add(&fee_payer).unwrap();
        let service = service().with_remote_wallet(Arc::new(remote));

        let unsigned: TypedTransaction = FeeDelegatedValueTransfer::new(
            filled(0, 60_000),
            sender.address(),
            address(0xee),
            U256::from(5u64),
        )
        .with_fee_payer(fee_payer.address())
        .into();

        let mut remote_tx = unsigned.clone();
        service
            .sign_with_remote(&mut remote_tx, sender.address(), None)
            .await
            .unwrap();
        service
            .sign_as_fee_payer_with_remote(&mut remote_tx, None)
            .await
            .unwrap();

        let mut local_tx = unsigned;
        Signer::sign(&mut local_tx, KeySource::Keyring(&sender), None).unwrap();
        Signer::sign_as_fee_payer(&mut local_tx, KeySource::Keyring(&fee_payer), None).unwrap();

        assert_eq!(
            remote_tx.rlp_encoding_hex().unwrap(),
            local_tx.rlp_encoding_hex().unwrap()
        );
    }

    #[tokio::test]
    async fn test_remote_wallet_rejects_unknown_address() {
        init_tracing();
        let service = service().with_remote_wallet(Arc::new(LocalRemoteWallet::default()));
        let sender = address(0x42);

        let mut tx: TypedTransaction =
            ValueTransfer::new(filled(0, 21_000), sender, address(1), U256::one()).into();
        let result = service.sign_with_remote(&mut tx, sender, None).await;

        assert!(matches!(result, Err(SdkError::RemoteWallet(_))));
        assert!(!tx.is_signed());
    }
}
