//! # Golden Vectors
//!
//! Fixed encodings for known keys. Any change to field order, tag handling,
//! signing payload wrapping or signature normalization breaks these.
//!
//! | Vector | Signer key | Chain id |
//! |--------|------------|----------|
//! | EIP-155 legacy | `0x4646..46` | 1 |
//! | ValueTransfer | `0x4646..46` bound to `0xbbbb..bb` | 1 |
//! | FeeDelegatedValueTransferWithRatio | sender `0x4646..46`, fee payer `0x4747..47` | 1 |
//! | AccountUpdate | `0x4646..46` | 1 |

#[cfg(test)]
mod tests {
    use primitive_types::U256;
    use qc_tx_sdk::{
        Account, AccountKey, AccountUpdate, Address, FeeDelegatedValueTransferWithRatio, Key,
        KeySource, Keyring, Signer, Transaction, TransactionDecoder, TxCommon, TxType,
        TypedTransaction, ValueTransfer,
    };

    const SENDER_KEY: &str = "0x4646464646464646464646464646464646464646464646464646464646464646";
    const FEE_PAYER_KEY: &str = "0x4747474747474747474747474747474747474747474747474747474747474747";

    // =============================================================================
    // EXPECTED VALUES
    // =============================================================================

    const VALUE_TRANSFER_HASH: &str =
        "0x9b549f6043a11e75da44b655cfc9266f78f3fafcd718d4c6c007d40d81de2b9c";
    const VALUE_TRANSFER_R: &str =
        "0xb5721e4baf22749cd6c60168865410aa92645f6fd05af88e8191a9f2845210cb";
    const VALUE_TRANSFER_S: &str =
        "0x2449a35f674cdb97d374524d57cceaaa29203e599b2614d1f246f9014db76f3f";
    const VALUE_TRANSFER_RAW: &str = "0x08f884808505d21dba0082753094aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa880de0b6b3a764000094bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbf845f84325a0b5721e4baf22749cd6c60168865410aa92645f6fd05af88e8191a9f2845210cba02449a35f674cdb97d374524d57cceaaa29203e599b2614d1f246f9014db76f3f";
    const VALUE_TRANSFER_TX_HASH: &str =
        "0x2d98bda4a925d77fbbfaa6fa3f7a444d87341c1c98c4bfbc6f1e40e840d579a7";

    const WITH_RATIO_SENDER_HASH_INPUT: &str =
        "0xd2cd8c4c16b89935ccb960a97ee154273f3e04c7b000f6f49b48e72807f29ad0";
    const WITH_RATIO_FEE_PAYER_HASH_INPUT: &str =
        "0x030369e01f6478706cdc44eae922fc6f912c1243b9af13da51a83e21df2bd2b5";
    const WITH_RATIO_RAW: &str = "0x0af8d9018505d21dba0082c35094aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa01949d8a62f656a8d1615c1294fd71e9cfb3e4855a4f1ef845f84326a072c46c18ad5c43db714b7a4142096a0bcb6ad6c08639e09b42ca86e920d50505a021eb3a3727019038f4ac65dbe58c4068e94b6fb5baf9346bcaa2a174a9f554be94b595b18c88b1f651ca387489067f855b5c8e6720f845f84325a0dcf38bce432387f8883dab18a4e336dfb3b9d3a8051af799bf5584240e4d3c9ea00b9c0832047a8c06b1c695fafbdb3d64a037aca77c9423cbd164380e36a3ee0e";
    const WITH_RATIO_TX_HASH: &str =
        "0x399f4d629a0bb3d7b6b1355f41b5956c65c765357925c18c831ef37d4da92fef";
    const WITH_RATIO_SENDER_TX_HASH: &str =
        "0xeccf48cf809ff4553c553f6cb6c2d2493561698c4f4324e12578f7838a410421";

    const ACCOUNT_UPDATE_KEY: &str =
        "0x02a1021492bc6a132ac91cb8b9f57d2b809dd2bdb8e1a294d3edbb6c6f7fc03bf11cac";
    const ACCOUNT_UPDATE_HASH: &str =
        "0x669d1461348dcc9aaff09d7957f426f082db083e906449de4939c7bd6163d77a";
    const ACCOUNT_UPDATE_RAW: &str = "0x20f88b808505d21dba00830493e0949d8a62f656a8d1615c1294fd71e9cfb3e4855a4fa302a1021492bc6a132ac91cb8b9f57d2b809dd2bdb8e1a294d3edbb6c6f7fc03bf11cacf845f84326a033d952c347c3a98239442ae6808f550aa364b944be472773984c0dfb2650c829a00660c6709a2727e236e7e3954f887b5bc0b06aa95b81ef96ee6ba5c832c66266";

    const EIP155_RAW: &str = "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";

    // =============================================================================
    // HELPERS
    // =============================================================================

    fn hex(bytes: &[u8]) -> String {
        format!("0x{}", ::hex::encode(bytes))
    }

    fn common(nonce: u64, gas: u64) -> TxCommon {
        TxCommon::new(gas)
            .with_nonce(nonce)
            .with_gas_price(25_000_000_000u64)
            .with_chain_id(1)
    }

    // =============================================================================
    // VECTORS
    // =============================================================================

    #[test]
    fn test_value_transfer_vector() {
        let to: Address = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".parse().unwrap();
        let from: Address = "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB".parse().unwrap();
        let keyring = Keyring::with_single_key(from, Key::new(SENDER_KEY).unwrap());
        assert!(keyring.is_decoupled());

        let mut tx = ValueTransfer::new(
            common(0, 30_000),
            from,
            to,
            U256::from(1_000_000_000_000_000_000u64),
        );
        let receipt = Signer::sign(&mut tx, KeySource::Keyring(&keyring), None).unwrap();

        assert_eq!(hex(&receipt.hash), VALUE_TRANSFER_HASH);
        let signature = &tx.signatures()[0];
        assert_eq!(signature.v, vec![0x25]);
        assert_eq!(hex(&signature.r), VALUE_TRANSFER_R);
        assert_eq!(hex(&signature.s), VALUE_TRANSFER_S);
        assert_eq!(tx.rlp_encoding_hex().unwrap(), VALUE_TRANSFER_RAW);
        assert_eq!(hex(&tx.transaction_hash().unwrap()), VALUE_TRANSFER_TX_HASH);
        assert_eq!(hex(&tx.sender_tx_hash().unwrap()), VALUE_TRANSFER_TX_HASH);
    }

    #[test]
    fn test_fee_delegated_with_ratio_vector() {
        let sender = Keyring::from_private_key(SENDER_KEY).unwrap();
        let fee_payer = Keyring::from_private_key(FEE_PAYER_KEY).unwrap();
        let to: Address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".parse().unwrap();

        let mut tx = FeeDelegatedValueTransferWithRatio::new(
            common(1, 50_000),
            sender.address(),
            to,
            U256::one(),
            30,
        )
        .unwrap()
        .with_fee_payer(fee_payer.address());

        let sender_receipt = Signer::sign(&mut tx, KeySource::Keyring(&sender), None).unwrap();
        let payer_receipt =
            Signer::sign_as_fee_payer(&mut tx, KeySource::Keyring(&fee_payer), None).unwrap();

        assert_eq!(hex(&sender_receipt.hash), WITH_RATIO_SENDER_HASH_INPUT);
        assert_eq!(hex(&payer_receipt.hash), WITH_RATIO_FEE_PAYER_HASH_INPUT);
        assert_eq!(tx.rlp_encoding_hex().unwrap(), WITH_RATIO_RAW);
        assert_eq!(hex(&tx.transaction_hash().unwrap()), WITH_RATIO_TX_HASH);
        assert_eq!(hex(&tx.sender_tx_hash().unwrap()), WITH_RATIO_SENDER_TX_HASH);
    }

    #[test]
    fn test_account_update_vector() {
        let sender = Keyring::from_private_key(SENDER_KEY).unwrap();
        let new_key = Key::new(FEE_PAYER_KEY).unwrap();
        let account = Account::with_public_key(sender.address(), new_key.public_key());
        assert_eq!(account.account_key().encode_hex(), ACCOUNT_UPDATE_KEY);

        let mut tx = AccountUpdate::new(common(0, 300_000), sender.address(), account).unwrap();
        let receipt = Signer::sign(&mut tx, KeySource::Keyring(&sender), None).unwrap();

        assert_eq!(hex(&receipt.hash), ACCOUNT_UPDATE_HASH);
        assert_eq!(tx.rlp_encoding_hex().unwrap(), ACCOUNT_UPDATE_RAW);
    }

    #[test]
    fn test_decode_vectors() {
        let decoder = TransactionDecoder::default();

        match decoder.decode_hex(EIP155_RAW).unwrap() {
            TypedTransaction::Legacy(tx) => {
                assert_eq!(tx.common.nonce, Some(9));
                assert_eq!(tx.to, Some(Address([0x35; 20])));
                assert_eq!(tx.signatures()[0].v, vec![0x25]);
            }
            other => panic!("expected legacy, got {:?}", other.tx_type()),
        }

        let tx = decoder.decode_hex(VALUE_TRANSFER_RAW).unwrap();
        assert_eq!(tx.tx_type(), TxType::ValueTransfer);
        assert_eq!(tx.rlp_encoding_hex().unwrap(), VALUE_TRANSFER_RAW);

        match decoder.decode_hex(WITH_RATIO_RAW).unwrap() {
            TypedTransaction::FeeDelegatedValueTransferWithRatio(tx) => {
                assert_eq!(tx.fee_ratio(), 30);
                assert!(tx.is_signed());
                assert!(!tx.fee_delegation.fee_payer_signatures()[0].is_empty());
            }
            other => panic!("expected fee-delegated with ratio, got {:?}", other.tx_type()),
        }

        match decoder.decode_hex(ACCOUNT_UPDATE_RAW).unwrap() {
            TypedTransaction::AccountUpdate(tx) => {
                assert_eq!(
                    *tx.account().account_key(),
                    AccountKey::decode_hex(ACCOUNT_UPDATE_KEY).unwrap()
                );
            }
            other => panic!("expected account update, got {:?}", other.tx_type()),
        }
    }
}
