use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "config/rotation";
const ENV_PREFIX: &str = "ROTATION";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub rotation: RotationSettings,
    pub server: ServerSettings,
    pub preview: PreviewSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RotationSettings {
    pub interval_ms: u64,
    pub max_values_to_load: u32,
}

impl RotationSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            max_values_to_load: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PreviewSettings {
    pub dashboard_path: String,
}

impl AppConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.rotation.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "rotation.interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.rotation.max_values_to_load == 0 {
            return Err(ConfigError::Invalid(
                "rotation.max_values_to_load must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(DEFAULT_CONFIG_FILE)
}

/// Load defaults, then the optional file at `path`, then `ROTATION_*` environment variables
/// (for example `ROTATION_ROTATION__INTERVAL_MS`).
pub fn load_config_from(path: &str) -> Result<AppConfig, ConfigError> {
    let defaults = RotationSettings::default();
    let settings = config::Config::builder()
        .set_default("rotation.interval_ms", defaults.interval_ms as i64)?
        .set_default("rotation.max_values_to_load", defaults.max_values_to_load as i64)?
        .set_default("server.base_url", "http://localhost:30845")?
        .set_default("server.request_timeout_secs", 30_i64)?
        .set_default("preview.dashboard_path", "dashboard.json")?
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Environment variables are process-wide; config tests must not overlap.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "filter-rotation-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let _guard = env_lock();
        let config = load_config_from("config/does-not-exist").unwrap();
        assert_eq!(config.rotation, RotationSettings::default());
        assert_eq!(config.rotation.interval(), Duration::from_secs(10));
        assert_eq!(config.server.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.server.api_token, None);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let _guard = env_lock();
        let path = temp_config(
            "override",
            r#"
[rotation]
interval_ms = 2500

[server]
base_url = "https://bi.example.com"
api_token = "secret"
"#,
        );

        let config = load_config_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.rotation.interval_ms, 2500);
        assert_eq!(config.rotation.max_values_to_load, 100);
        assert_eq!(config.server.base_url, "https://bi.example.com");
        assert_eq!(config.server.api_token.as_deref(), Some("secret"));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let _guard = env_lock();
        let path = temp_config("zero", "[rotation]\ninterval_ms = 0\n");

        let err = load_config_from(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = env_lock();
        let path = temp_config("env", "[rotation]\ninterval_ms = 2500\n");
        let key = "ROTATION_ROTATION__INTERVAL_MS";
        let previous = std::env::var(key).ok();

        unsafe { std::env::set_var(key, "1234") };
        let result = load_config_from(path.to_str().unwrap());
        match previous {
            Some(value) => unsafe { std::env::set_var(key, value) },
            None => unsafe { std::env::remove_var(key) },
        }

        assert_eq!(result.unwrap().rotation.interval_ms, 1234);
        std::fs::remove_file(path).unwrap();
    }
}
