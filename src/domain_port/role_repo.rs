use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait RoleRepo: Send + Sync {
    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Role>, AuthError>;
}
