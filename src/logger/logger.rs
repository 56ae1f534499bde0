use crate::settings;
use anyhow::{Result, anyhow};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

const BOOTSTRAP_FILTER: &str = "info";

pub struct LogConfig {
    pub filter: String,
}

impl LogConfig {
    pub fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(&self.filter).map_err(|e| anyhow!("log filter {:?}: {}", self.filter, e))
    }
}

impl From<&settings::Log> for LogConfig {
    fn from(log: &settings::Log) -> Self {
        LogConfig {
            filter: log.filter.clone(),
        }
    }
}

pub struct Logger {
    reload_handle: reload::Handle<EnvFilter, Registry>,
    /// `RUST_LOG` was set at startup and wins over the settings file.
    env_override: bool,
}

impl Logger {
    pub fn new_bootstrap() -> Self {
        let (filter, env_override) = match EnvFilter::try_from_default_env() {
            Ok(filter) => (filter, true),
            Err(_) => (EnvFilter::new(BOOTSTRAP_FILTER), false),
        };
        let (filter, reload_handle) = reload::Layer::new(filter);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();

        Self {
            reload_handle,
            env_override,
        }
    }

    /// Switches to the configured filter unless `RUST_LOG` is in charge.
    /// The filter is validated either way.
    pub fn reload_from_config(&self, config: &LogConfig) -> Result<()> {
        let filter = config.env_filter()?;
        if self.env_override {
            tracing::debug!(ignored = %config.filter, "RUST_LOG overrides the configured filter");
            return Ok(());
        }

        self.reload_handle.reload(filter).map_err(|e| anyhow!(e))?;
        tracing::debug!(filter = %config.filter, "log filter reloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_comes_from_settings() {
        let log = settings::Log {
            filter: "authgate=debug,warp=info".to_string(),
        };
        let config = LogConfig::from(&log);
        assert_eq!(config.filter, "authgate=debug,warp=info");
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn bad_level_is_rejected() {
        let config = LogConfig {
            filter: "authgate=loud".to_string(),
        };
        assert!(config.env_filter().is_err());
    }
}
