use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryUserRepo {
    users: DashMap<String, UserCredentials>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, credentials: UserCredentials) {
        self.users.insert(credentials.name.clone(), credentials);
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn get_by_name(&self, name: &str) -> Result<Option<UserCredentials>, AuthError> {
        Ok(self.users.get(name).map(|entry| entry.value().clone()))
    }
}
