//! Config sealer
//!
//! Packages a [`ClientConfig`] into a transportable AES-256-GCM sealed string.
//!
//! Wire format: `base64(nonce[12] || ciphertext || tag[16])` using the
//! standard padded alphabet. There is no version tag or key id; the consumer
//! must know which key sealed the blob.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use std::ffi::OsString;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::schemas::ClientConfig;

/// Default environment variable holding the raw 32-byte key
pub const DEFAULT_KEY_VAR: &str = "CONFIG_ENCRYPTION_KEY";

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum SealError {
    #[error("{0} not set in environment variables")]
    MissingKey(String),

    #[error("invalid key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to generate nonce: {0}")]
    RandomSource(String),

    #[error("encryption failed")]
    Encryption,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("sealed payload too short: {0} bytes")]
    Truncated(usize),

    #[error("decryption failed: wrong key or corrupted payload")]
    Decryption,
}

/// Seals and opens configuration blobs under a single AES-256-GCM key.
pub struct ConfigSealer {
    cipher: Aes256Gcm,
}

impl ConfigSealer {
    /// Build a sealer from raw key bytes. The key must be exactly 32 bytes.
    pub fn from_key_bytes(key: &[u8]) -> Result<Self, SealError> {
        let cipher =
            Aes256Gcm::new_from_slice(key).map_err(|_| SealError::InvalidKeyLength(key.len()))?;
        Ok(Self { cipher })
    }

    /// Serialize `config` to JSON and seal it
    pub fn seal(&self, config: &ClientConfig) -> Result<String, SealError> {
        let plaintext = Zeroizing::new(serde_json::to_vec(config)?);
        self.seal_bytes(&plaintext)
    }

    /// Seal arbitrary bytes under a fresh random nonce
    pub fn seal_bytes(&self, plaintext: &[u8]) -> Result<String, SealError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| SealError::RandomSource(e.to_string()))?;

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| SealError::Encryption)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(sealed))
    }

    /// Open a sealed blob and return the plaintext bytes
    pub fn open_bytes(&self, encoded: &str) -> Result<Zeroizing<Vec<u8>>, SealError> {
        let sealed = STANDARD.decode(encoded.trim())?;
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(SealError::Truncated(sealed.len()));
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| SealError::Decryption)?;

        Ok(Zeroizing::new(plaintext))
    }

    /// Open a sealed blob and decode the configuration record inside it
    pub fn open(&self, encoded: &str) -> Result<ClientConfig, SealError> {
        let plaintext = self.open_bytes(encoded)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }
}

/// Resolve the sealing key from `lookup`, returning its raw bytes.
///
/// The value is taken byte for byte; it does not need to be valid UTF-8.
pub fn key_from_lookup<F>(lookup: &F, key_var: &str) -> Result<Zeroizing<Vec<u8>>, SealError>
where
    F: Fn(&str) -> Option<OsString>,
{
    lookup(key_var)
        .map(|key| Zeroizing::new(key.into_encoded_bytes()))
        .ok_or_else(|| SealError::MissingKey(key_var.to_string()))
}

/// Build the configuration record and key from `lookup` and seal it.
///
/// The key is checked before anything is serialized, so a missing or
/// malformed key never produces output.
pub fn seal_from_lookup<F>(lookup: F, key_var: &str) -> Result<String, SealError>
where
    F: Fn(&str) -> Option<OsString>,
{
    let key = key_from_lookup(&lookup, key_var)?;
    let sealer = ConfigSealer::from_key_bytes(&key)?;
    let config = ClientConfig::from_lookup(&lookup);

    sealer.seal(&config)
}

/// Seal the configuration held in the process environment
pub fn seal_from_env(key_var: &str) -> Result<String, SealError> {
    seal_from_lookup(|name| std::env::var_os(name), key_var)
}
