//! HMAC-SHA256 signer over the shared token secret

use ag_shared::config::validate_secret;
use ag_shared::ConfigError;
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Symmetric signer and verifier
///
/// The secret is checked when the signer is built and again before every
/// signature; a weak key never signs anything.
#[derive(Clone)]
pub struct Signer {
    key: Vec<u8>,
}

impl Signer {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
        let key = secret.as_ref().to_vec();
        validate_secret(&key)?;
        Ok(Self { key })
    }

    /// Deterministic HMAC of `payload`
    pub fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, ConfigError> {
        validate_secret(&self.key)?;
        Ok(self.mac(payload)?.finalize().into_bytes().to_vec())
    }

    /// Constant-time check of `signature` against `payload`
    ///
    /// A signature of the wrong length is a mismatch, not an error.
    pub fn verify(&self, payload: &[u8], signature: &[u8]) -> bool {
        match self.sign(payload) {
            Ok(expected) => constant_time_eq(&expected, signature),
            Err(_) => false,
        }
    }

    fn mac(&self, payload: &[u8]) -> Result<HmacSha256, ConfigError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| ConfigError::invalid("secret", e.to_string()))?;
        mac.update(payload);
        Ok(mac)
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("key", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_sign_is_deterministic() {
        let signer = Signer::new(SECRET).unwrap();
        let a = signer.sign(b"payload").unwrap();
        let b = signer.sign(b"payload").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert_ne!(a, signer.sign(b"payload2").unwrap());
    }

    #[test]
    fn test_verify() {
        let signer = Signer::new(SECRET).unwrap();
        let signature = signer.sign(b"payload").unwrap();

        assert!(signer.verify(b"payload", &signature));
        assert!(!signer.verify(b"tampered", &signature));
        assert!(!signer.verify(b"payload", &signature[..31]));
        assert!(!signer.verify(b"payload", &[]));
    }

    #[test]
    fn test_different_keys_disagree() {
        let a = Signer::new(SECRET).unwrap();
        let b = Signer::new(b"fedcba9876543210fedcba9876543210").unwrap();
        let signature = a.sign(b"payload").unwrap();
        assert!(!b.verify(b"payload", &signature));
    }

    #[test]
    fn test_weak_secret_refused() {
        assert_eq!(Signer::new(b"").unwrap_err(), ConfigError::EmptySecret);
        assert!(matches!(
            Signer::new(b"too-short"),
            Err(ConfigError::WeakSecret { actual: 9, .. })
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let signer = Signer::new(SECRET).unwrap();
        assert!(!format!("{:?}", signer).contains("0123456789abcdef"));
    }
}
