use super::{SigningMethod, read_key};
use crate::application_port::{Claims, CredentialError, CredentialParser};
use crate::logger::*;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, Validation, decode};
use std::path::Path;

pub struct JwtParser {
    method: SigningMethod,
    key: DecodingKey,
    validation: Validation,
}

impl JwtParser {
    pub fn new(
        issuer: impl Into<String>,
        algorithm: &str,
        public_key: &[u8],
    ) -> Result<Self, CredentialError> {
        let method = SigningMethod::from_name(algorithm)?;
        let key = method.decoding_key(public_key)?;
        let issuer: String = issuer.into();

        // Only the configured algorithm is accepted, whatever the header says.
        let mut validation = Validation::new(method.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(JwtParser {
            method,
            key,
            validation,
        })
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

impl CredentialParser for JwtParser {
    fn parse(&self, token: &str) -> Result<Claims, CredentialError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = rejection_reason(e.kind()), "access credential rejected");
                CredentialError::CredentialInvalid
            })
    }
}

fn rejection_reason(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ExpiredSignature => "expired",
        ErrorKind::InvalidSignature => "signature",
        ErrorKind::InvalidAlgorithm => "algorithm",
        ErrorKind::InvalidIssuer => "issuer",
        ErrorKind::MissingRequiredClaim(_) => "missing claim",
        _ => "malformed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_port::CredentialBuilder;
    use crate::jwt::JwtBuilder;
    use crate::jwt::key::fixtures::*;
    use chrono::{Duration, Utc};

    const ISSUER: &str = "authgate";

    fn round_trip(algorithm: &str, private_key: &[u8], public_key: &[u8]) {
        let builder = JwtBuilder::new(ISSUER, algorithm, private_key).unwrap();
        let parser = JwtParser::new(ISSUER, algorithm, public_key).unwrap();
        let roles = vec!["admin".to_string(), "user".to_string()];
        let age = Duration::minutes(15);

        let issued_at = Utc::now().timestamp();
        let token = builder.build("subject-1", age, "deadbeef", &roles).unwrap();
        let claims = parser.parse(&token).unwrap();

        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.sub, "subject-1");
        assert_eq!(claims.fingerprint, "deadbeef");
        assert_eq!(claims.roles, roles);
        assert!(claims.exp >= issued_at + age.num_seconds());
        assert!(claims.exp <= Utc::now().timestamp() + age.num_seconds());
    }

    #[test]
    fn round_trip_hmac() {
        round_trip("HS256", b"secret", b"secret");
        round_trip("HS512", b"secret", b"secret");
    }

    #[test]
    fn round_trip_rsa() {
        round_trip("RS256", RSA_PRIVATE, RSA_PUBLIC);
        round_trip("PS256", RSA_PRIVATE, RSA_PUBLIC);
    }

    #[test]
    fn round_trip_ecdsa() {
        round_trip("ES256", ES256_PRIVATE, ES256_PUBLIC);
        round_trip("ES384", ES384_PRIVATE, ES384_PUBLIC);
    }

    #[test]
    fn round_trip_ed25519() {
        round_trip("EdDSA", ED25519_PRIVATE, ED25519_PUBLIC);
    }

    #[test]
    fn unrepresentable_expiry_is_a_signing_error() {
        let builder = JwtBuilder::new(ISSUER, "HS256", b"secret").unwrap();
        assert!(matches!(
            builder.build("user", Duration::MAX, "00", &[]),
            Err(CredentialError::Signing(_))
        ));
    }

    #[test]
    fn construction_rejects_bad_configuration() {
        assert!(matches!(
            JwtParser::new(ISSUER, "HS255", b"secret"),
            Err(CredentialError::AlgorithmInvalid(_))
        ));
        assert!(matches!(
            JwtBuilder::new(ISSUER, "none", b"secret"),
            Err(CredentialError::AlgorithmNone)
        ));
        assert!(matches!(
            JwtBuilder::new(ISSUER, "ES256", ES384_PRIVATE),
            Err(CredentialError::KeyInvalid { .. })
        ));
        assert!(matches!(
            JwtBuilder::new(ISSUER, "EdDSA", ES256_PRIVATE),
            Err(CredentialError::KeyInvalid { .. })
        ));
    }

    #[test]
    fn rejects_expired() {
        let builder = JwtBuilder::new(ISSUER, "HS256", b"secret").unwrap();
        let parser = JwtParser::new(ISSUER, "HS256", b"secret").unwrap();

        let token = builder.build("s", Duration::seconds(-30), "", &[]).unwrap();
        assert!(matches!(
            parser.parse(&token),
            Err(CredentialError::CredentialInvalid)
        ));
    }

    #[test]
    fn rejects_other_issuer() {
        let builder = JwtBuilder::new("someone-else", "HS256", b"secret").unwrap();
        let parser = JwtParser::new(ISSUER, "HS256", b"secret").unwrap();

        let token = builder.build("s", Duration::minutes(1), "", &[]).unwrap();
        assert!(parser.parse(&token).is_err());
    }

    #[test]
    fn rejects_other_algorithm() {
        let builder = JwtBuilder::new(ISSUER, "HS384", b"secret").unwrap();
        let parser = JwtParser::new(ISSUER, "HS256", b"secret").unwrap();

        let token = builder.build("s", Duration::minutes(1), "", &[]).unwrap();
        assert!(parser.parse(&token).is_err());
    }

    #[test]
    fn rejects_public_key_used_as_hmac_secret() {
        let forger = JwtBuilder::new(ISSUER, "HS256", RSA_PUBLIC).unwrap();
        let parser = JwtParser::new(ISSUER, "RS256", RSA_PUBLIC).unwrap();

        let token = forger.build("s", Duration::minutes(1), "", &[]).unwrap();
        assert!(matches!(
            parser.parse(&token),
            Err(CredentialError::CredentialInvalid)
        ));
    }

    #[test]
    fn rejects_wrong_key_and_garbage() {
        let builder = JwtBuilder::new(ISSUER, "HS256", b"secret").unwrap();
        let parser = JwtParser::new(ISSUER, "HS256", b"other").unwrap();

        let token = builder.build("s", Duration::minutes(1), "", &[]).unwrap();
        assert!(parser.parse(&token).is_err());
        assert!(parser.parse("").is_err());
        assert!(parser.parse("not.a.jwt").is_err());
    }
}
