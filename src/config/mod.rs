use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const PRODUCTION_API_URL: &str = "https://suivi-consultants-backend-production.up.railway.app";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is not set
    pub filter: String,
    /// Log response bodies of failed requests at debug level
    pub log_bodies: bool,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("development") | Ok("dev") => Environment::Development,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Production,
        };

        // Presets first, then specific env vars win
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("OBJECTIVE_API_URL") {
            let trimmed = v.trim().trim_end_matches('/');
            if !trimmed.is_empty() {
                self.api.base_url = trimmed.to_string();
            }
        }
        if let Ok(v) = env::var("OBJECTIVE_API_TIMEOUT_SECS") {
            match parse_timeout(&v) {
                Some(secs) => self.api.timeout_secs = secs,
                None => tracing::warn!(
                    "ignoring OBJECTIVE_API_TIMEOUT_SECS={:?}, keeping {}s",
                    v,
                    self.api.timeout_secs
                ),
            }
        }
        if let Ok(v) = env::var("OBJECTIVE_API_USER_AGENT") {
            self.api.user_agent = v;
        }

        if let Ok(v) = env::var("OBJECTIVE_LOG") {
            self.logging.filter = v;
        }
        if let Ok(v) = env::var("OBJECTIVE_LOG_BODIES") {
            self.logging.log_bodies = v.parse().unwrap_or(self.logging.log_bodies);
        }

        self
    }

    fn default_user_agent() -> String {
        format!("objective-tracker/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                timeout_secs: 60,
                user_agent: Self::default_user_agent(),
            },
            logging: LoggingConfig {
                filter: "objective_tracker=debug,info".to_string(),
                log_bodies: true,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: PRODUCTION_API_URL.to_string(),
                timeout_secs: 30,
                user_agent: Self::default_user_agent(),
            },
            logging: LoggingConfig {
                filter: "objective_tracker=info,warn".to_string(),
                log_bodies: true,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: PRODUCTION_API_URL.to_string(),
                timeout_secs: 30,
                user_agent: Self::default_user_agent(),
            },
            logging: LoggingConfig {
                filter: "warn".to_string(),
                log_bodies: false,
            },
        }
    }

    /// Same config pointed at another backend, used by tests and `--api-url`
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.api.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

/// Whole seconds, at least one; a zero timeout would fail every request
fn parse_timeout(value: &str) -> Option<u64> {
    value.trim().parse().ok().filter(|secs| *secs > 0)
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
