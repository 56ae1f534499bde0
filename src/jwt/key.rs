use super::{AlgorithmFamily, SigningMethod};
use crate::application_port::CredentialError;
use jsonwebtoken::{DecodingKey, EncodingKey};
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyHalf {
    /// PKCS#8 private key.
    Private,
    /// SubjectPublicKeyInfo.
    Public,
}

impl SigningMethod {
    /// Private (signing) key for this algorithm. HMAC takes the raw bytes,
    /// the asymmetric families take PEM.
    pub fn encoding_key(&self, data: &[u8]) -> Result<EncodingKey, CredentialError> {
        self.check_curve(data, KeyHalf::Private)?;
        let key = match self.family {
            AlgorithmFamily::Hmac => Ok(EncodingKey::from_secret(data)),
            AlgorithmFamily::Rsa => EncodingKey::from_rsa_pem(data),
            AlgorithmFamily::Ecdsa { .. } => EncodingKey::from_ec_pem(data),
            AlgorithmFamily::Ed25519 => EncodingKey::from_ed_pem(data),
        };
        key.map_err(|e| self.key_invalid(e))
    }

    /// Public (verification) key for this algorithm.
    pub fn decoding_key(&self, data: &[u8]) -> Result<DecodingKey, CredentialError> {
        self.check_curve(data, KeyHalf::Public)?;
        let key = match self.family {
            AlgorithmFamily::Hmac => Ok(DecodingKey::from_secret(data)),
            AlgorithmFamily::Rsa => DecodingKey::from_rsa_pem(data),
            AlgorithmFamily::Ecdsa { .. } => DecodingKey::from_ec_pem(data),
            AlgorithmFamily::Ed25519 => DecodingKey::from_ed_pem(data),
        };
        key.map_err(|e| self.key_invalid(e))
    }

    fn check_curve(&self, data: &[u8], half: KeyHalf) -> Result<(), CredentialError> {
        let AlgorithmFamily::Ecdsa { curve_bits } = self.family else {
            return Ok(());
        };

        match ec_curve_bits(data, half) {
            Some(bits) if bits == curve_bits => Ok(()),
            Some(bits) => Err(self.key_invalid(format!(
                "curve is {bits} bits, expected {curve_bits}"
            ))),
            None => Err(self.key_invalid("not a supported EC key")),
        }
    }

    fn key_invalid(&self, reason: impl ToString) -> CredentialError {
        CredentialError::KeyInvalid {
            algorithm: self.name(),
            reason: reason.to_string(),
        }
    }
}

pub fn read_key(path: impl AsRef<Path>) -> Result<Vec<u8>, CredentialError> {
    Ok(std::fs::read(path)?)
}

/// Field size of a P-256 or P-384 PEM key, read from the key's own
/// algorithm parameters. `None` for anything else.
fn ec_curve_bits(data: &[u8], half: KeyHalf) -> Option<usize> {
    let pem = std::str::from_utf8(data).ok()?;
    let (is_p256, is_p384) = match half {
        KeyHalf::Private => (
            p256::SecretKey::from_pkcs8_pem(pem).is_ok(),
            p384::SecretKey::from_pkcs8_pem(pem).is_ok(),
        ),
        KeyHalf::Public => (
            p256::PublicKey::from_public_key_pem(pem).is_ok(),
            p384::PublicKey::from_public_key_pem(pem).is_ok(),
        ),
    };

    if is_p256 {
        Some(256)
    } else if is_p384 {
        Some(384)
    } else {
        None
    }
}
