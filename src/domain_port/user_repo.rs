use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Fetch credentials by unique name (for login).
    async fn get_by_name(&self, name: &str) -> Result<Option<UserCredentials>, AuthError>;
}
