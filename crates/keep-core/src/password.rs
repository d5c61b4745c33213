//! Master and access password roles.
//!
//! The vault distinguishes two credential roles. The single master password
//! is chosen by the operator, may create and overwrite items, and resolves
//! any item through the access database. Access passwords are generated by
//! the system, one per stored item version, and carry a fixed marker prefix
//! on the wire so they can be recognized when handed back in.
//!
//! The role is an explicit tag on the [`Password`] value, assigned only at
//! trust boundaries (configuration load, CLI input classification, password
//! generation). Core code matches on the tag and never sniffs string
//! contents.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{KeepError, Result};

/// Marker prefix carried by every generated access password.
pub const ACCESS_MARKER: &str = "vvvvv";

/// Total length of a generated access password, marker included.
pub const ACCESS_PASSWORD_LEN: usize = 40;

/// Random bytes drawn per access password. 26 bytes encode to exactly 35
/// unpadded base64url characters, which with the 5-character marker gives
/// the fixed 40-character wire form (208 bits of entropy, collisions
/// negligible).
const ACCESS_RANDOM_BYTES: usize = 26;

/// A system-generated per-item access password.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessPassword(String);

impl AccessPassword {
    /// Generate a fresh access password from the system CSPRNG.
    pub fn generate() -> Self {
        let mut raw = [0u8; ACCESS_RANDOM_BYTES];
        OsRng.fill_bytes(&mut raw);
        Self(format!("{}{}", ACCESS_MARKER, URL_SAFE_NO_PAD.encode(raw)))
    }

    /// Accept an access password handed back by a caller.
    ///
    /// # Errors
    ///
    /// Returns [`KeepError::InvalidPassword`] if the value does not carry
    /// the access marker.
    pub fn parse(value: &str) -> Result<Self> {
        if !value.starts_with(ACCESS_MARKER) {
            return Err(KeepError::InvalidPassword(
                "not a generated access password".to_string(),
            ));
        }
        Ok(Self(value.to_string()))
    }

    /// The wire form: marker followed by base64url characters.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for AccessPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Debug for AccessPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessPassword").field(&"[REDACTED]").finish()
    }
}

/// A credential with an explicit role tag.
#[derive(Debug)]
pub enum Password {
    /// The operator-chosen master password.
    Master(SecretString),
    /// A system-generated per-item access password.
    Access(AccessPassword),
}

impl Password {
    /// Construct a master password at a trust boundary.
    ///
    /// # Errors
    ///
    /// Returns [`KeepError::InvalidPassword`] for an empty value or one
    /// beginning with the access marker: the marker namespace belongs to
    /// generated passwords, and a marker-prefixed master password would be
    /// misread as an access password when handed back in.
    pub fn master(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(KeepError::InvalidPassword(
                "password must not be empty".to_string(),
            ));
        }
        if value.starts_with(ACCESS_MARKER) {
            return Err(KeepError::InvalidPassword(format!(
                "a master password must not begin with the reserved marker '{}'",
                ACCESS_MARKER
            )));
        }
        Ok(Self::Master(SecretString::from(value)))
    }

    /// Classify raw user input: marker-prefixed values are access
    /// passwords, everything else is the master password.
    pub fn from_input(value: &str) -> Result<Self> {
        if value.starts_with(ACCESS_MARKER) {
            Ok(Self::Access(AccessPassword::parse(value)?))
        } else {
            Self::master(value)
        }
    }

    /// Whether this credential carries the master role.
    pub fn is_master(&self) -> bool {
        matches!(self, Self::Master(_))
    }

    /// Raw passphrase bytes for key derivation.
    pub(crate) fn expose(&self) -> &[u8] {
        match self {
            Self::Master(secret) => secret.expose_secret().as_bytes(),
            Self::Access(access) => access.as_bytes(),
        }
    }
}
