//! # Signer
//!
//! Stateless signing orchestration: work out which role signs, hash the
//! right payload, collect signatures from a key source and append them to the
//! right list on the transaction.
//!
//! The role comes from the transaction type alone (`AccountUpdate` for
//! account-update variants, `Transaction` otherwise, `FeePayer` for fee payer
//! signing). Fallback between roles happens only inside [`Keyring`].

use super::entities::{encode_hex, Address, Hash, Role, SignatureData};
use super::errors::{SdkError, SdkResult};
use super::key::Key;
use super::keyring::Keyring;
use super::transaction::Transaction;
use super::wallet::Wallet;
use std::borrow::Cow;
use tracing::debug;

/// Where signing keys come from.
#[derive(Clone, Copy, Debug)]
pub enum KeySource<'a> {
    /// A single hex private key; its derived address is the signer
    RawKey(&'a str),
    Keyring(&'a Keyring),
    /// The keyring stored in `wallet` under `address`
    Wallet { wallet: &'a Wallet, address: Address },
}

impl<'a> KeySource<'a> {
    /// Address the resolved keyring signs for.
    pub fn address(&self) -> SdkResult<Address> {
        match *self {
            KeySource::RawKey(raw) => Ok(Key::new(raw)?.address()),
            KeySource::Keyring(keyring) => Ok(keyring.address()),
            KeySource::Wallet { address, .. } => Ok(address),
        }
    }

    fn resolve(&self) -> SdkResult<Cow<'a, Keyring>> {
        match *self {
            KeySource::RawKey(raw) => Ok(Cow::Owned(Keyring::from_private_key(raw)?)),
            KeySource::Keyring(keyring) => Ok(Cow::Borrowed(keyring)),
            KeySource::Wallet { wallet, address } => {
                Ok(Cow::Borrowed(wallet.get_keyring(&address)?))
            }
        }
    }
}

/// Everything a key holder needs to produce signatures for one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningRequest {
    pub hash: Hash,
    pub chain_id: u64,
    pub role: Role,
    /// Address the signing keyring must belong to; `None` for legacy senders
    pub signer: Option<Address>,
}

impl SigningRequest {
    /// Sender request: role by transaction type, signer is `from`.
    pub fn for_sender<T: Transaction + ?Sized>(tx: &T) -> SdkResult<Self> {
        Ok(Self {
            hash: tx.signing_hash()?,
            chain_id: tx.common().require_chain_id()?,
            role: tx.tx_type().sender_role(),
            signer: tx.sender(),
        })
    }

    /// Fee payer request. Fails with [`SdkError::MissingFeePayer`] until a
    /// fee payer address is set.
    pub fn for_fee_payer<T: Transaction + ?Sized>(tx: &T) -> SdkResult<Self> {
        let fee_payer = tx
            .fee_delegation()
            .ok_or(SdkError::NotFeeDelegated(tx.tx_type()))?
            .require_fee_payer()?;
        Ok(Self {
            hash: tx.fee_payer_signing_hash()?,
            chain_id: tx.common().require_chain_id()?,
            role: Role::FeePayer,
            signer: Some(fee_payer),
        })
    }

    /// Fails with [`SdkError::Inconsistency`] when `address` is not the
    /// expected signer.
    pub fn check_signer(&self, address: Address) -> SdkResult<()> {
        match self.signer {
            Some(expected) if expected != address => Err(SdkError::Inconsistency(format!(
                "{:?} signer {expected} does not match signing address {address}",
                self.role
            ))),
            _ => Ok(()),
        }
    }

    /// [`check_signer`](Self::check_signer) for a local keyring. Without an
    /// expected signer the sender is recovered from the signature, so the
    /// keyring address must be derived from its key.
    pub fn check_keyring(&self, keyring: &Keyring) -> SdkResult<()> {
        if self.signer.is_none() && keyring.is_decoupled() {
            return Err(SdkError::Inconsistency(format!(
                "decoupled keyring {} cannot sign a transaction without a sender field",
                keyring.address()
            )));
        }
        self.check_signer(keyring.address())
    }

    /// Sign with one key (`index`) or every key of the role slot.
    pub fn sign_with(
        &self,
        keyring: &Keyring,
        index: Option<usize>,
    ) -> SdkResult<Vec<SignatureData>> {
        match index {
            Some(index) => Ok(vec![keyring.sign_with_key(
                &self.hash,
                self.chain_id,
                self.role,
                index,
            )?]),
            None => keyring.sign_with_keys(&self.hash, self.chain_id, self.role),
        }
    }
}

/// Signatures added by one signing call, with the hash they cover.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningReceipt {
    pub hash: Hash,
    pub role: Role,
    pub signatures: Vec<SignatureData>,
}

/// Signs transactions in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct Signer;

impl Signer {
    /// Add sender signatures.
    ///
    /// `index` selects one key of the role slot; `None` signs with all of
    /// them.
    pub fn sign<T: Transaction + ?Sized>(
        tx: &mut T,
        source: KeySource<'_>,
        index: Option<usize>,
    ) -> SdkResult<SigningReceipt> {
        let request = SigningRequest::for_sender(tx)?;
        let keyring = source.resolve()?;
        request.check_keyring(&keyring)?;

        let signatures = request.sign_with(&keyring, index)?;
        tx.append_signatures(signatures.clone().into())?;

        debug!(
            tx_type = tx.tx_type().name(),
            role = ?request.role,
            signatures = signatures.len(),
            hash = %encode_hex(&request.hash),
            "Transaction signed by sender"
        );
        Ok(SigningReceipt {
            hash: request.hash,
            role: request.role,
            signatures,
        })
    }

    /// Add fee payer signatures to a fee-delegated transaction.
    pub fn sign_as_fee_payer<T: Transaction + ?Sized>(
        tx: &mut T,
        source: KeySource<'_>,
        index: Option<usize>,
    ) -> SdkResult<SigningReceipt> {
        let request = SigningRequest::for_fee_payer(tx)?;
        let keyring = source.resolve()?;
        request.check_keyring(&keyring)?;

        let signatures = request.sign_with(&keyring, index)?;
        tx.append_fee_payer_signatures(signatures.clone().into())?;

        debug!(
            tx_type = tx.tx_type().name(),
            signatures = signatures.len(),
            hash = %encode_hex(&request.hash),
            "Transaction signed by fee payer"
        );
        Ok(SigningReceipt {
            hash: request.hash,
            role: request.role,
            signatures,
        })
    }
}
