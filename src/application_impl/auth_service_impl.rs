use super::Fingerprint;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use std::sync::Arc;

pub struct RealAuthService {
    parser: Arc<dyn CredentialParser>,
}

impl RealAuthService {
    pub fn new(parser: Arc<dyn CredentialParser>) -> Self {
        Self { parser }
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn verify(
        &self,
        token: &AccessToken,
        fingerprint: &[u8],
    ) -> Result<Principal, AuthError> {
        let claims = self.parser.parse(token.as_str())?;

        let user_id = claims.sub.parse::<UserId>().map_err(|_| {
            debug!(sub = %claims.sub, "access credential subject is not a user id");
            AuthError::CredentialInvalid
        })?;

        Fingerprint::new(user_id, fingerprint)
            .verify_hex(&claims.fingerprint)
            .inspect_err(|_| warn!(%user_id, "access credential fingerprint mismatch"))?;

        Ok(Principal {
            user_id,
            roles: claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::{JwtBuilder, JwtParser};
    use chrono::Duration;

    const SECRET: &[u8] = b"test-secret";

    fn builder() -> JwtBuilder {
        JwtBuilder::new("authgate", "HS256", SECRET).unwrap()
    }

    fn service() -> RealAuthService {
        RealAuthService::new(Arc::new(JwtParser::new("authgate", "HS256", SECRET).unwrap()))
    }

    fn issue(subject: &str, fingerprint: &str) -> AccessToken {
        let roles = vec!["user".to_string()];
        AccessToken(
            builder()
                .build(subject, Duration::minutes(5), fingerprint, &roles)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn accepts_bound_credential() {
        let user_id = UserId(uuid::Uuid::new_v4());
        let digest = hex::encode(Fingerprint::new(user_id, b"agent").hash());
        let token = issue(&user_id.to_string(), &digest);

        let principal = service().verify(&token, b"agent").await.unwrap();
        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.roles, vec!["user".to_string()]);
    }

    #[tokio::test]
    async fn rejects_other_client() {
        let user_id = UserId(uuid::Uuid::new_v4());
        let digest = hex::encode(Fingerprint::new(user_id, b"agent").hash());
        let token = issue(&user_id.to_string(), &digest);

        assert!(matches!(
            service().verify(&token, b"stolen").await,
            Err(AuthError::FingerprintIncorrect)
        ));
    }

    #[tokio::test]
    async fn rejects_bad_subject_and_garbage() {
        let token = issue("not-a-uuid", "00");
        assert!(matches!(
            service().verify(&token, b"agent").await,
            Err(AuthError::CredentialInvalid)
        ));
        assert!(matches!(
            service().verify(&AccessToken("garbage".into()), b"agent").await,
            Err(AuthError::CredentialInvalid)
        ));
    }
}
