use super::{SigningMethod, read_key};
use crate::application_port::{Claims, CredentialBuilder, CredentialError};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::path::Path;

pub struct JwtBuilder {
    issuer: String,
    method: SigningMethod,
    key: EncodingKey,
}

impl JwtBuilder {
    pub fn new(
        issuer: impl Into<String>,
        algorithm: &str,
        private_key: &[u8],
    ) -> Result<Self, CredentialError> {
        let method = SigningMethod::from_name(algorithm)?;
        let key = method.encoding_key(private_key)?;
        let builder = JwtBuilder {
            issuer: issuer.into(),
            method,
            key,
        };

        // A key can be well-formed PEM and still unusable for signing.
        builder
            .build("startup-check", Duration::seconds(1), "", &[])
            .map_err(|e| CredentialError::KeyInvalid {
                algorithm: method.name(),
                reason: e.to_string(),
            })?;

        Ok(builder)
    }

    pub fn from_file(
        issuer: impl Into<String>,
        algorithm: &str,
        path: impl AsRef<Path>,
    ) -> Result<Self, CredentialError> {
        let data = read_key(path)?;
        Self::new(issuer, algorithm, &data)
    }

    pub fn method(&self) -> SigningMethod {
        self.method
    }
}

impl CredentialBuilder for JwtBuilder {
    fn build(
        &self,
        subject: &str,
        age: Duration,
        fingerprint: &str,
        roles: &[String],
    ) -> Result<String, CredentialError> {
        let iat_dt = Utc::now();
        let exp_dt = iat_dt
            .checked_add_signed(age)
            .ok_or_else(|| CredentialError::Signing("credential expiry overflowed".into()))?;
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: subject.to_string(),
            exp: exp_dt.timestamp(),
            iat: iat_dt.timestamp(),
            fingerprint: fingerprint.to_string(),
            roles: roles.to_vec(),
        };

        encode(&Header::new(self.method.algorithm), &claims, &self.key)
            .map_err(|e| CredentialError::Signing(e.to_string()))
    }
}
