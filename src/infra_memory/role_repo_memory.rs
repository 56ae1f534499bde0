use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryRoleRepo {
    roles: DashMap<UserId, Vec<Role>>,
}

impl MemoryRoleRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&self, user_id: UserId, role: Role) {
        self.roles.entry(user_id).or_default().push(role);
    }
}

#[async_trait::async_trait]
impl RoleRepo for MemoryRoleRepo {
    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Role>, AuthError> {
        Ok(self
            .roles
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
