use super::util::{store_err, uuid_from_bytes};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlRoleRepo {
    pool: MySqlPool,
}

impl MySqlRoleRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlRoleRepo { pool }
    }

    fn row_to_role(row: MySqlRow) -> Result<Role, AuthError> {
        let id: Vec<u8> = row.try_get("role_id").map_err(store_err)?;
        let title: String = row.try_get("title").map_err(store_err)?;
        let description: String = row.try_get("description").map_err(store_err)?;

        Ok(Role {
            id: uuid_from_bytes(&id)?,
            title,
            description,
        })
    }
}

#[async_trait::async_trait]
impl RoleRepo for MySqlRoleRepo {
    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Role>, AuthError> {
        let rows: Vec<MySqlRow> = sqlx::query(
            r#"
SELECT r.role_id, r.title, r.description
FROM user_role ur
JOIN role r ON r.role_id = ur.role_id
WHERE ur.user_id = ?
ORDER BY r.title
"#,
        )
        .bind(user_id.as_bytes())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.into_iter().map(Self::row_to_role).collect()
    }
}
