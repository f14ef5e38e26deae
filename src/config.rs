// =============================================================================
// Parque Backend - Configuration
// =============================================================================

use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1:7000")
    pub bind_address: String,

    /// Database URL (SQLite path)
    pub database_url: String,

    /// Insert the demo park on startup
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:7000".into(),
            database_url: "sqlite:parque.db".into(),
            seed_demo: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            seed_demo: match lookup("SEED_DEMO") {
                Some(value) => parse_flag("SEED_DEMO", &value)?,
                None => defaults.seed_demo,
            },
        })
    }

    /// Filesystem path of a file-backed SQLite database.
    pub fn sqlite_path(&self) -> Option<&str> {
        let path = self.database_url.strip_prefix("sqlite:")?;
        let path = path.strip_prefix("//").unwrap_or(path);
        let path = path.split('?').next().unwrap_or(path);
        (!path.is_empty() && path != ":memory:").then_some(path)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:7000");
        assert_eq!(config.database_url, "sqlite:parque.db");
        assert!(!config.seed_demo);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("BIND_ADDRESS", "0.0.0.0:8080"),
            ("DATABASE_URL", "sqlite:data/parks.db"),
            ("SEED_DEMO", "Yes"),
        ])
        .unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.sqlite_path(), Some("data/parks.db"));
        assert!(config.seed_demo);
    }

    #[test]
    fn test_invalid_flag() {
        let err = load(&[("SEED_DEMO", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SEED_DEMO", .. }));
    }

    #[test]
    fn test_sqlite_path() {
        let mut config = Config::default();
        assert_eq!(config.sqlite_path(), Some("parque.db"));

        config.database_url = "sqlite::memory:".into();
        assert_eq!(config.sqlite_path(), None);

        config.database_url = "sqlite://var/lib/parque.db?mode=rwc".into();
        assert_eq!(config.sqlite_path(), Some("var/lib/parque.db"));

        config.database_url = "postgres://localhost/parque".into();
        assert_eq!(config.sqlite_path(), None);
    }
}
