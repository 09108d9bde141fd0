// SPDX-License-Identifier: AGPL-3.0-or-later

//! Field-level encryption for sensitive payment data.
//!
//! Card numbers and CVVs are encrypted with AES-256-GCM before they reach the
//! storage layer and decrypted only on explicit accessor calls. The key is
//! process-wide configuration ([`crate::config::ENCRYPTION_KEY_ENV`]); a fresh
//! random 96-bit nonce is drawn per write, so ciphertext is not deterministic
//! but decryption with the same key always recovers the original plaintext.
//!
//! Wire format: `base64(nonce || ciphertext || tag)`.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64ct::{Base64, Encoding};
use thiserror::Error;

use crate::config::ENCRYPTION_KEY_ENV;

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Errors from field encryption and decryption.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The encryption key environment variable is not set.
    #[error("{ENCRYPTION_KEY_ENV} is not set")]
    MissingKey,
    /// The configured key is not 32 bytes of valid base64.
    #[error("{ENCRYPTION_KEY_ENV} must be 32 bytes encoded as base64")]
    InvalidKey,
    /// Encryption failed.
    #[error("field encryption failed")]
    Encrypt,
    /// The stored ciphertext could not be recovered (corrupted data or a
    /// rotated key without re-encryption).
    #[error("stored ciphertext could not be decrypted")]
    Decrypt,
}

/// Authenticated cipher for sensitive field values.
pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl FieldCipher {
    /// Create a cipher from raw key material.
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Load the key from `PAYMENT_ENCRYPTION_KEY`.
    pub fn from_env() -> Result<Self, CryptoError> {
        let encoded = std::env::var(ENCRYPTION_KEY_ENV).map_err(|_| CryptoError::MissingKey)?;
        let raw = Base64::decode_vec(encoded.trim()).map_err(|_| CryptoError::InvalidKey)?;
        let key: [u8; 32] = raw.try_into().map_err(|_| CryptoError::InvalidKey)?;
        Ok(Self::new(&key))
    }

    /// Encrypt a plaintext field value.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;

        let mut buf = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        buf.extend_from_slice(&nonce);
        buf.extend_from_slice(&ciphertext);
        Ok(Base64::encode_string(&buf))
    }

    /// Decrypt a stored field value.
    pub fn decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
        let raw = Base64::decode_vec(encoded).map_err(|_| CryptoError::Decrypt)?;
        if raw.len() <= NONCE_LEN {
            return Err(CryptoError::Decrypt);
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::Decrypt)
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material through Debug output.
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> FieldCipher {
        FieldCipher::new(&[7u8; 32])
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let cipher = test_cipher();
        let ciphertext = cipher.encrypt("4111111111111234").unwrap();
        assert_ne!(ciphertext, "4111111111111234");
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), "4111111111111234");
    }

    #[test]
    fn nonce_varies_per_write() {
        let cipher = test_cipher();
        let a = cipher.encrypt("123").unwrap();
        let b = cipher.encrypt("123").unwrap();
        assert_ne!(a, b);
        assert_eq!(cipher.decrypt(&a).unwrap(), cipher.decrypt(&b).unwrap());
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let ciphertext = test_cipher().encrypt("123").unwrap();
        let other = FieldCipher::new(&[9u8; 32]);
        assert!(matches!(other.decrypt(&ciphertext), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn garbage_input_fails_to_decrypt() {
        let cipher = test_cipher();
        assert!(matches!(cipher.decrypt("not base64!"), Err(CryptoError::Decrypt)));
        assert!(matches!(cipher.decrypt(""), Err(CryptoError::Decrypt)));
        // Valid base64 but too short to hold a nonce.
        assert!(matches!(cipher.decrypt("AAAA"), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let cipher = test_cipher();
        let ciphertext = cipher.encrypt("4111111111111234").unwrap();
        let mut raw = Base64::decode_vec(&ciphertext).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = Base64::encode_string(&raw);
        assert!(matches!(cipher.decrypt(&tampered), Err(CryptoError::Decrypt)));
    }
}
