use std::env;
use std::fmt;

use thiserror::Error;

/// Minimum acceptable length for the shared JWT signing secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Obviously-weak placeholder secrets that must never reach production.
/// Startup fails outright if the configured secret matches one of these.
const WEAK_SECRETS: &[&str] = &[
    "secret",
    "changeme",
    "password",
    "your-secret-key",
    "fallback-secret-for-testing",
    "00000000000000000000000000000000",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT secret is not configured (set TODO_JWT_SECRET)")]
    MissingSecret,

    #[error("JWT secret must be at least {min} characters, got {len}")]
    SecretTooShort { min: usize, len: usize },

    #[error("JWT secret is a known placeholder value and must be replaced")]
    WeakSecret,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_leeway_secs: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

// The signing secret must never end up in logs, so Debug redacts it.
impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_leeway_secs", &self.jwt_leeway_secs)
            .field("enable_cors", &self.enable_cors)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the environment. Fails when the signing
    /// secret is missing, too short, or a known placeholder; the process
    /// must not start in that case.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides();

        config.security.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = env::var("TODO_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Security overrides
        if let Ok(v) = env::var("TODO_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("TODO_JWT_LEEWAY_SECS") {
            self.security.jwt_leeway_secs = v.parse().unwrap_or(self.security.jwt_leeway_secs);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_leeway_secs: 30,
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_leeway_secs: 30,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_leeway_secs: 10,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

impl SecurityConfig {
    /// Startup-time secret validation. Rejects missing, short, and
    /// placeholder secrets so a misconfigured deployment fails fast.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let lowered = self.jwt_secret.to_lowercase();
        if WEAK_SECRETS.contains(&lowered.as_str()) {
            return Err(ConfigError::WeakSecret);
        }

        let len = self.jwt_secret.len();
        if len < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort { min: MIN_SECRET_LEN, len });
        }

        Ok(())
    }
}
