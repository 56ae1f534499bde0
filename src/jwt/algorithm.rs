use crate::application_port::CredentialError;
use jsonwebtoken::Algorithm;
use std::str::FromStr;

/// Key shape a signing algorithm expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    /// Raw shared secret.
    Hmac,
    /// RSA PKCS#1 v1.5 and RSA-PSS.
    Rsa,
    /// Elliptic curve whose field size must match the algorithm.
    Ecdsa { curve_bits: usize },
    Ed25519,
}

/// Algorithm resolved once at construction, together with its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningMethod {
    pub algorithm: Algorithm,
    pub family: AlgorithmFamily,
}

impl SigningMethod {
    /// Resolves an algorithm name such as `HS256`, `ES384` or `EdDSA`.
    /// `none` is refused outright: an unsigned credential proves nothing.
    pub fn from_name(name: &str) -> Result<Self, CredentialError> {
        if name.eq_ignore_ascii_case("none") {
            return Err(CredentialError::AlgorithmNone);
        }

        let algorithm = Algorithm::from_str(name)
            .map_err(|_| CredentialError::AlgorithmInvalid(name.to_string()))?;

        let family = match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => AlgorithmFamily::Hmac,
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => AlgorithmFamily::Rsa,
            Algorithm::ES256 => AlgorithmFamily::Ecdsa { curve_bits: 256 },
            Algorithm::ES384 => AlgorithmFamily::Ecdsa { curve_bits: 384 },
            Algorithm::EdDSA => AlgorithmFamily::Ed25519,
        };

        Ok(SigningMethod { algorithm, family })
    }

    pub fn name(&self) -> String {
        format!("{:?}", self.algorithm)
    }
}
