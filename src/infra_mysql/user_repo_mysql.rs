use super::util::{store_err, uuid_from_bytes};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn get_by_name(&self, name: &str) -> Result<Option<UserCredentials>, AuthError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT user_id, name, password_hash
FROM user
WHERE name = ?
"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        let Some(row) = row_opt else {
            return Ok(None);
        };

        let user_id: Vec<u8> = row.try_get("user_id").map_err(store_err)?;
        Ok(Some(UserCredentials {
            user_id: UserId(uuid_from_bytes(&user_id)?),
            name: row.try_get("name").map_err(store_err)?,
            password_hash: row.try_get("password_hash").map_err(store_err)?,
        }))
    }
}
