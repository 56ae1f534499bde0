use super::AuthError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Payload of an access credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    /// Hex-encoded binding digest, same as on the paired refresh record.
    pub fingerprint: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("algorithm is invalid: {0}")]
    AlgorithmInvalid(String),
    #[error("algorithm is none")]
    AlgorithmNone,
    #[error("key is invalid for {algorithm}: {reason}")]
    KeyInvalid { algorithm: String, reason: String },
    #[error("key read error: {0}")]
    KeyRead(#[from] std::io::Error),
    #[error("signing error: {0}")]
    Signing(String),
    #[error("credential is invalid")]
    CredentialInvalid,
}

impl From<CredentialError> for AuthError {
    fn from(error: CredentialError) -> Self {
        match error {
            CredentialError::CredentialInvalid => AuthError::CredentialInvalid,
            other => AuthError::InternalError(other.to_string()),
        }
    }
}

/// Signs access credentials.
pub trait CredentialBuilder: Send + Sync {
    fn build(
        &self,
        subject: &str,
        age: Duration,
        fingerprint: &str,
        roles: &[String],
    ) -> Result<String, CredentialError>;
}

/// Verifies access credentials.
pub trait CredentialParser: Send + Sync {
    fn parse(&self, token: &str) -> Result<Claims, CredentialError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_credentials_are_external() {
        assert!(matches!(
            AuthError::from(CredentialError::CredentialInvalid),
            AuthError::CredentialInvalid
        ));
        assert!(matches!(
            AuthError::from(CredentialError::Signing("bad key".into())),
            AuthError::InternalError(_)
        ));
    }
}
