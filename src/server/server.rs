use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::jwt::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::{MySql, Pool};
use std::sync::Arc;

const DEMO_USER_NAME: &str = "demo";
const DEMO_USER_PASSWORD: &str = "demo";

pub struct Server {
    pub token_service: Arc<dyn TokenService>,
    pub auth_service: Arc<dyn AuthService>,
    pub user_verifier: Arc<dyn UserVerifier>,
    pub cookie_path: String,
    pool: Option<Pool<MySql>>,
}

struct Stores {
    token_repo: Arc<dyn TokenRepo>,
    role_repo: Arc<dyn RoleRepo>,
    user_repo: Arc<dyn UserRepo>,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let params = TokenParams::try_new(
            settings.token.access_age_minutes,
            settings.token.refresh_age_days,
            settings.token.refresh_cap,
        )?;

        let builder = JwtBuilder::from_file(
            settings.jwt.issuer.clone(),
            &settings.jwt.algorithm,
            &settings.jwt.private_key_path,
        )?;
        let parser = JwtParser::from_file(
            settings.jwt.issuer.clone(),
            &settings.jwt.algorithm,
            &settings.jwt.public_key_path,
        )?;
        info!(algorithm = %builder.method().name(), issuer = %settings.jwt.issuer, "signing keys loaded");

        let credential_hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2PasswordHasher);

        let stores = match settings.store.backend.as_str() {
            "fake" => Self::fake_stores(credential_hasher.as_ref()).await?,
            "real" => {
                let pool = Pool::<MySql>::connect(&settings.store.dsn).await?;
                Stores {
                    token_repo: Arc::new(MySqlTokenRepo::new(pool.clone())),
                    role_repo: Arc::new(MySqlRoleRepo::new(pool.clone())),
                    user_repo: Arc::new(MySqlUserRepo::new(pool.clone())),
                    pool: Some(pool),
                }
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let token_service: Arc<dyn TokenService> = Arc::new(RealTokenService::new(
            stores.token_repo,
            stores.role_repo,
            Arc::new(builder),
            params,
        ));
        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(Arc::new(parser)));
        let user_verifier: Arc<dyn UserVerifier> =
            Arc::new(Argon2UserVerifier::new(stores.user_repo, credential_hasher));

        info!(backend = %settings.store.backend, "server started");

        Ok(Self {
            token_service,
            auth_service,
            user_verifier,
            cookie_path: settings.http.cookie_path.clone(),
            pool: stores.pool,
        })
    }

    async fn fake_stores(credential_hasher: &dyn CredentialHasher) -> anyhow::Result<Stores> {
        let user_id = UserId(uuid::Uuid::new_v5(
            &uuid::Uuid::NAMESPACE_OID,
            DEMO_USER_NAME.as_bytes(),
        ));

        let users = MemoryUserRepo::new();
        users.insert(UserCredentials {
            user_id,
            name: DEMO_USER_NAME.to_string(),
            password_hash: credential_hasher.hash_password(DEMO_USER_PASSWORD).await?,
        });

        let roles = MemoryRoleRepo::new();
        roles.assign(
            user_id,
            Role {
                id: uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, b"user"),
                title: "user".to_string(),
                description: "Regular account".to_string(),
            },
        );

        warn!(user = DEMO_USER_NAME, "in-memory store seeded with a demo account");

        Ok(Stores {
            token_repo: Arc::new(MemoryTokenRepo::new()),
            role_repo: Arc::new(roles),
            user_repo: Arc::new(users),
            pool: None,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
