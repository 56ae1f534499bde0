use anyhow::{Result, anyhow};
use config::{Config, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub http: Http,
    pub log: Log,
    pub store: Store,
    pub jwt: Jwt,
    pub token: Token,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub cert_path: String,
    pub key_path: String,
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "fake" or "real"
    #[serde(default)]
    pub dsn: String,
}

#[derive(Debug, Deserialize)]
pub struct Jwt {
    pub issuer: String,
    pub algorithm: String,
    pub private_key_path: String,
    pub public_key_path: String,
}

#[derive(Debug, Deserialize)]
pub struct Token {
    pub access_age_minutes: i64,
    pub refresh_age_days: i64,
    pub refresh_cap: usize,
}

fn default_cookie_path() -> String {
    "/api/v1/token".to_string()
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

pub fn parse_settings_str(toml: &str) -> Result<Settings> {
    let settings: Settings = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEV: &str = include_str!("../../settings/dev.toml");

    #[test]
    fn dev_settings_parse() {
        let settings = parse_settings_str(DEV).unwrap();
        assert_eq!(settings.store.backend, "fake");
        assert_eq!(settings.jwt.algorithm, "ES256");
        assert_eq!(settings.token.access_age_minutes, 15);
        assert_eq!(settings.token.refresh_age_days, 30);
        assert_eq!(settings.token.refresh_cap, 5);
    }

    #[test]
    fn cookie_path_defaults() {
        let toml = r#"
[http]
address = "127.0.0.1:8443"
cert_path = "cert.pem"
key_path = "key.pem"

[log]
filter = "info"

[store]
backend = "fake"

[jwt]
issuer = "authgate"
algorithm = "HS256"
private_key_path = "secret"
public_key_path = "secret"

[token]
access_age_minutes = 5
refresh_age_days = 1
refresh_cap = 2
"#;
        let settings = parse_settings_str(toml).unwrap();
        assert_eq!(settings.http.cookie_path, "/api/v1/token");
        assert!(settings.store.dsn.is_empty());
    }

    #[test]
    fn missing_section_fails() {
        assert!(parse_settings_str("[log]\nfilter = \"info\"\n").is_err());
    }
}
