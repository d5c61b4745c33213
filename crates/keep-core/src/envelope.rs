//! Passphrase-based authenticated encryption.
//!
//! Payloads are sealed into a self-contained envelope:
//!
//! ```text
//! salt (32 bytes) || nonce (12 bytes) || ciphertext || tag (16 bytes)
//! ```
//!
//! The salt feeds scrypt key derivation, the nonce feeds AES-128-GCM. Both
//! are drawn fresh from the system CSPRNG on every call; nonce reuse would
//! be catastrophic for GCM security. The caller's context string (the item
//! key) is bound as AEAD associated data, so an envelope copied to a
//! different key fails authentication.
//!
//! No key material is cached between calls: every decryption attempt pays
//! the full scrypt cost, which is the intended brute-force deterrent.

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{Aes128Gcm, Nonce};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{KeepError, Result};

/// Length of the scrypt salt prepended to every envelope.
pub const SALT_LEN: usize = 32;

/// Length of the AES-GCM nonce (96 bits, standard for GCM).
pub const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// Length of the derived AES-128 key.
pub const KEY_LEN: usize = 16;

/// Minimum length of a well-formed envelope (empty plaintext).
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Default scrypt cost: N = 2^20, r = 8, p = 1.
///
/// Roughly one second and 1 GiB of memory per derivation on commodity
/// hardware. Fixed for all envelopes; the salt stored in the envelope is
/// the only per-payload derivation input.
const DEFAULT_LOG_N: u8 = 20;
const DEFAULT_R: u32 = 8;
const DEFAULT_P: u32 = 1;

/// Passphrase-based envelope cipher.
///
/// Holds only the scrypt cost parameters; no derived keys or other mutable
/// state, so a `Cipher` is safe to share across independent operations.
#[derive(Debug, Clone)]
pub struct Cipher {
    log_n: u8,
    r: u32,
    p: u32,
}

impl Cipher {
    /// Cipher with the production scrypt cost.
    pub fn new() -> Self {
        Self {
            log_n: DEFAULT_LOG_N,
            r: DEFAULT_R,
            p: DEFAULT_P,
        }
    }

    /// Cipher with explicit scrypt cost parameters.
    ///
    /// Lowering the cost weakens brute-force resistance; intended for tests
    /// and for operators who know what they are trading away. Envelopes
    /// written with one cost cannot be read with another.
    pub fn with_cost(log_n: u8, r: u32, p: u32) -> Self {
        Self { log_n, r, p }
    }

    /// Seal `plaintext` under `passphrase`, binding `aad` into the tag.
    ///
    /// Returns the full envelope: `salt || nonce || ciphertext+tag`.
    pub fn encrypt(&self, passphrase: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);

        let key = self.derive_key(passphrase, &salt)?;
        let cipher = Aes128Gcm::new_from_slice(key.as_ref())
            .map_err(|_| KeepError::Crypto("failed to initialize AES-128-GCM".to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(
                nonce,
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|_| KeepError::Crypto("AES-128-GCM encryption failed".to_string()))?;

        let mut envelope = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&ciphertext);
        Ok(envelope)
    }

    /// Open an envelope produced by [`Cipher::encrypt`].
    ///
    /// # Errors
    ///
    /// - [`KeepError::MalformedEnvelope`] if the payload cannot contain a
    ///   salt, nonce and tag.
    /// - [`KeepError::AuthenticationFailure`] if the tag check fails: wrong
    ///   passphrase, wrong associated data, or tampered ciphertext. These
    ///   cases are indistinguishable by design.
    pub fn decrypt(&self, passphrase: &[u8], aad: &[u8], envelope: &[u8]) -> Result<Vec<u8>> {
        if envelope.len() < MIN_ENVELOPE_LEN {
            return Err(KeepError::MalformedEnvelope);
        }

        let (salt, rest) = envelope.split_at(SALT_LEN);
        let (nonce_bytes, body) = rest.split_at(NONCE_LEN);

        let key = self.derive_key(passphrase, salt)?;
        let cipher = Aes128Gcm::new_from_slice(key.as_ref())
            .map_err(|_| KeepError::Crypto("failed to initialize AES-128-GCM".to_string()))?;
        let nonce = Nonce::from_slice(nonce_bytes);

        cipher
            .decrypt(nonce, Payload { msg: body, aad })
            .map_err(|_| KeepError::AuthenticationFailure)
    }

    /// Derive the AES key from a passphrase and salt via scrypt.
    ///
    /// The output is zeroized on drop.
    fn derive_key(&self, passphrase: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        let params = scrypt::Params::new(self.log_n, self.r, self.p, KEY_LEN)
            .map_err(|e| KeepError::Crypto(format!("invalid scrypt parameters: {}", e)))?;

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        scrypt::scrypt(passphrase, salt, &params, key.as_mut())
            .map_err(|e| KeepError::Crypto(format!("scrypt key derivation failed: {}", e)))?;
        Ok(key)
    }
}

impl Default for Cipher {
    fn default() -> Self {
        Self::new()
    }
}
