use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::Arc;

pub struct Argon2PasswordHasher;

#[async_trait::async_trait]
impl CredentialHasher for Argon2PasswordHasher {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = argon2::password_hash::SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    async fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::InternalError(format!("invalid PHC hash: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::InternalError(format!("verify error: {e}"))),
        }
    }
}

pub struct Argon2UserVerifier {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
}

impl Argon2UserVerifier {
    pub fn new(user_repo: Arc<dyn UserRepo>, credential_hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            user_repo,
            credential_hasher,
        }
    }
}

#[async_trait::async_trait]
impl UserVerifier for Argon2UserVerifier {
    async fn verify(&self, name: &str, password: &str) -> Result<UserId, AuthError> {
        let user = self
            .user_repo
            .get_by_name(name)
            .await?
            .ok_or(AuthError::UserNotExist)?;

        let ok = self
            .credential_hasher
            .verify_password(password, &user.password_hash)
            .await?;
        if !ok {
            debug!(user_id = %user.user_id, "password is incorrect");
            return Err(AuthError::PasswordIncorrect);
        }

        Ok(user.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::MemoryUserRepo;

    async fn verifier() -> (Argon2UserVerifier, UserId) {
        let hasher = Arc::new(Argon2PasswordHasher);
        let users = Arc::new(MemoryUserRepo::new());
        let user_id = UserId(uuid::Uuid::new_v4());
        users.insert(UserCredentials {
            user_id,
            name: "alice".to_string(),
            password_hash: hasher.hash_password("Correct#Horse1").await.unwrap(),
        });
        (Argon2UserVerifier::new(users, hasher), user_id)
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash_password("pw").await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify_password("pw", &hash).await.unwrap());
        assert!(!hasher.verify_password("nope", &hash).await.unwrap());
        assert!(hasher.verify_password("pw", "not-a-phc-string").await.is_err());
    }

    #[tokio::test]
    async fn verifies_user() {
        let (verifier, user_id) = verifier().await;
        assert_eq!(verifier.verify("alice", "Correct#Horse1").await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password() {
        let (verifier, _) = verifier().await;
        assert!(matches!(
            verifier.verify("bob", "Correct#Horse1").await,
            Err(AuthError::UserNotExist)
        ));
        assert!(matches!(
            verifier.verify("alice", "wrong").await,
            Err(AuthError::PasswordIncorrect)
        ));
    }
}
