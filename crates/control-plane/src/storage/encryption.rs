// At-rest encryption for provider API keys.
// Uses AES-256-GCM with a random nonce per value. Stored form is
// "enc:v1:<base64(nonce || ciphertext)>" so it fits the TEXT apikey column.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;

const NONCE_SIZE: usize = 12;
const KEY_SIZE: usize = 32;

/// Prefix marking a value written by [`EncryptionService::encrypt_string`]
pub const ENCRYPTED_PREFIX: &str = "enc:v1:";

/// Encryption service for secret text columns.
/// Thread-safe; share it behind an `Arc`.
#[derive(Clone)]
pub struct EncryptionService {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService").finish_non_exhaustive()
    }
}

impl EncryptionService {
    /// Create from a base64-encoded 32-byte key.
    pub fn new(key_b64: &str) -> Result<Self> {
        let key_bytes = BASE64
            .decode(key_b64.trim())
            .context("Failed to decode key from base64")?;

        if key_bytes.len() != KEY_SIZE {
            anyhow::bail!(
                "Key must be {} bytes, got {} bytes",
                KEY_SIZE,
                key_bytes.len()
            );
        }

        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| anyhow::anyhow!("Failed to create cipher: {}", e))?;

        Ok(Self { cipher })
    }

    /// Create from SECRETS_ENCRYPTION_KEY.
    /// Returns Ok(None) when the variable is unset or empty.
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var("SECRETS_ENCRYPTION_KEY") {
            Ok(key) if !key.trim().is_empty() => Self::new(&key).map(Some),
            _ => Ok(None),
        }
    }

    /// Whether a stored value carries the encrypted prefix
    pub fn is_encrypted(value: &str) -> bool {
        value.starts_with(ENCRYPTED_PREFIX)
    }

    pub fn encrypt_string(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| anyhow::anyhow!("Encryption failed: {}", e))?;

        let mut payload = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);

        Ok(format!("{}{}", ENCRYPTED_PREFIX, BASE64.encode(payload)))
    }

    /// Decrypt a stored value. Values without the prefix are legacy
    /// plaintext and are returned unchanged.
    pub fn decrypt_string(&self, stored: &str) -> Result<String> {
        let Some(encoded) = stored.strip_prefix(ENCRYPTED_PREFIX) else {
            return Ok(stored.to_string());
        };

        let payload = BASE64
            .decode(encoded)
            .context("Failed to decode encrypted payload")?;

        if payload.len() < NONCE_SIZE {
            anyhow::bail!("Encrypted payload too short");
        }

        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|e| anyhow::anyhow!("Decryption failed (data may be corrupted): {}", e))?;

        String::from_utf8(plaintext).context("Decrypted data is not valid UTF-8")
    }
}

/// Generate a new random key, base64-encoded.
pub fn generate_encryption_key() -> String {
    let mut key = [0u8; KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut key);
    BASE64.encode(key)
}
