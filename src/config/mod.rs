use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub sirius: SiriusConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Path every route is mounted under, without a trailing slash.
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiriusConfig {
    /// Base URL used for API calls.
    pub url: String,
    /// Base URL the browser is sent to, e.g. for sign-in.
    pub public_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: bool,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        Self::for_environment(environment).with_env_overrides()
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("PREFIX") {
            self.server.prefix = normalize_prefix(&v);
        }

        if let Some(v) = lookup("SIRIUS_URL") {
            self.sirius.url = normalize_base(&v);
            self.sirius.public_url = self.sirius.url.clone();
        }
        if let Some(v) = lookup("SIRIUS_PUBLIC_URL") {
            self.sirius.public_url = normalize_base(&v);
        }
        if let Some(v) = lookup("SIRIUS_TIMEOUT_SECS") {
            self.sirius.timeout_secs = v.parse().unwrap_or(self.sirius.timeout_secs);
        }

        if let Some(v) = lookup("LOG_JSON") {
            self.logging.json = v.parse().unwrap_or(self.logging.json);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            sirius: SiriusConfig::default(),
            logging: LoggingConfig {
                json: false,
                filter: "sirius_user_management=debug,tower_http=debug,info".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig::default(),
            sirius: SiriusConfig {
                timeout_secs: 15,
                ..SiriusConfig::default()
            },
            logging: LoggingConfig {
                json: true,
                filter: "info".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default(),
            sirius: SiriusConfig {
                timeout_secs: 10,
                ..SiriusConfig::default()
            },
            logging: LoggingConfig {
                json: true,
                filter: "info".to_string(),
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8888,
            prefix: String::new(),
        }
    }
}

impl Default for SiriusConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9001".to_string(),
            public_url: "http://localhost:9001".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Strip trailing slashes so paths can be appended directly.
pub fn normalize_base(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}

/// A mount path: empty, or starting with `/` and without a trailing one.
pub fn normalize_prefix(value: &str) -> String {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 8888);
        assert_eq!(config.server.prefix, "");
        assert_eq!(config.sirius.url, "http://localhost:9001");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.logging.json);
        assert_eq!(config.sirius.timeout_secs, 10);
    }

    #[test]
    fn public_url_follows_sirius_url_unless_set() {
        let config = AppConfig::development()
            .with_overrides(overrides(&[("SIRIUS_URL", "http://sirius:8080/")]));
        assert_eq!(config.sirius.url, "http://sirius:8080");
        assert_eq!(config.sirius.public_url, "http://sirius:8080");

        let config = AppConfig::development().with_overrides(overrides(&[
            ("SIRIUS_URL", "http://sirius:8080"),
            ("SIRIUS_PUBLIC_URL", "https://sirius.example/"),
        ]));
        assert_eq!(config.sirius.public_url, "https://sirius.example");
    }

    #[test]
    fn invalid_numbers_keep_defaults() {
        let config = AppConfig::development().with_overrides(overrides(&[
            ("PORT", "not-a-port"),
            ("PREFIX", "/admin/"),
            ("LOG_JSON", "true"),
        ]));

        assert_eq!(config.server.port, 8888);
        assert_eq!(config.server.prefix, "/admin");
        assert!(config.logging.json);
    }

    #[test]
    fn prefix_gains_leading_slash() {
        assert_eq!(normalize_prefix("admin"), "/admin");
        assert_eq!(normalize_prefix("/admin/"), "/admin");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }
}
