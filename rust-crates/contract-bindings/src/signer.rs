use crate::{
    address::AccountAddress,
    error::{
        ClientError,
        Result,
    },
};
use ed25519_dalek::{
    Signer,
    SigningKey,
    Verifier,
    VerifyingKey,
};
use std::fmt;

/// The signing capability a wallet lends to a contract client.
pub trait TransactionSigner: Send + Sync {
    fn public_key(&self) -> AccountAddress;

    /// Sign the 32-byte transaction hash.
    fn sign(&self, tx_hash: &[u8; 32]) -> Result<[u8; 64]>;
}

/// A local ed25519 key.
#[derive(Clone)]
pub struct KeypairSigner {
    key: SigningKey,
}

impl KeypairSigner {
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(seed),
        }
    }

    /// Accepts raw 32-byte key material.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ClientError::Signing("secret key must be 32 bytes".into()))?;
        Ok(Self::from_seed(&seed))
    }

    /// Accepts an `S...` secret seed.
    pub fn from_secret_strkey(secret: &str) -> Result<Self> {
        let key = stellar_strkey::ed25519::PrivateKey::from_string(secret.trim())
            .map_err(|_| ClientError::Signing("not a valid S... secret seed".into()))?;
        Ok(Self::from_seed(&key.0))
    }
}

impl fmt::Debug for KeypairSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeypairSigner")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl TransactionSigner for KeypairSigner {
    fn public_key(&self) -> AccountAddress {
        AccountAddress(self.key.verifying_key().to_bytes())
    }

    fn sign(&self, tx_hash: &[u8; 32]) -> Result<[u8; 64]> {
        Ok(self.key.sign(tx_hash).to_bytes())
    }
}

pub fn verify_signature(
    signer: &AccountAddress,
    tx_hash: &[u8; 32],
    signature: &[u8; 64],
) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(signer.as_bytes()) else {
        return false;
    };
    key.verify(tx_hash, &ed25519_dalek::Signature::from_bytes(signature))
        .is_ok()
}
