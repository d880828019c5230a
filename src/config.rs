//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/circles/config.toml`).
//! Every section is optional; missing keys fall back to defaults.
//! Deployment secrets can be supplied through environment variables,
//! which win over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::services::DEFAULT_GRANT_TTL_MINUTES;
use crate::infrastructure::crypto::password::{MAX_COST, MIN_COST};
use crate::infrastructure::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Default configuration file location
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("circles")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub session: SessionSection,
    pub oauth: OAuthSection,
    pub access_gate: AccessGateSection,
    pub admin: AdminSection,
    pub uploads: UploadsSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout: 30,
        }
    }
}

/// Either a full `url`, or host/user/password parts for a MySQL URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: String,
    pub max_connections: Option<u32>,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            host: None,
            port: 3306,
            user: None,
            password: None,
            name: "circles".to_string(),
            max_connections: None,
            connect_timeout_secs: 10,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        match &self.host {
            Some(host) => format!(
                "mysql://{}:{}@{}:{}/{}",
                self.user.as_deref().unwrap_or("root"),
                self.password.as_deref().unwrap_or_default(),
                host,
                self.port,
                self.name
            ),
            None => DatabaseConfig::default().url,
        }
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.connection_url(),
            max_connections: self.max_connections,
            connect_timeout_secs: self.connect_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Cookie signing secret
    pub secret: String,
    pub cookie_name: String,
    pub secure: bool,
    pub max_age_days: i64,
}

const DEV_SESSION_SECRET: &str = "circles-development-secret";

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            secret: DEV_SESSION_SECRET.to_string(),
            cookie_name: "circles.sid".to_string(),
            secure: false,
            max_age_days: 7,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthSection {
    pub google: Option<GoogleOAuthSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleOAuthSection {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessGateSection {
    pub ttl_minutes: i64,
    pub bcrypt_cost: u32,
}

impl Default for AccessGateSection {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_GRANT_TTL_MINUTES,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSection {
    /// Signed-in users allowed to open the site dashboard
    pub operator_emails: Vec<String>,
}

impl AdminSection {
    pub fn is_operator(&self, email: Option<&str>) -> bool {
        email.is_some_and(|email| {
            self.operator_emails
                .iter()
                .any(|op| op.eq_ignore_ascii_case(email))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadsSection {
    pub dir: PathBuf,
    pub max_request_mb: usize,
    pub max_width: u32,
    pub jpeg_quality: u8,
}

impl Default for UploadsSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_request_mb: 50,
            max_width: 800,
            jpeg_quality: 70,
        }
    }
}

impl UploadsSection {
    pub fn max_request_bytes(&self) -> usize {
        self.max_request_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `path`, falling back to defaults when the file does not exist,
    /// then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Applies environment overrides read through `var`.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(host) = var("DB_HOST") {
            self.database.host = Some(host);
        }
        if let Some(user) = var("DB_USER") {
            self.database.user = Some(user);
        }
        if let Some(password) = var("DB_PASSWORD") {
            self.database.password = Some(password);
        }
        if let Some(port) = var("DB_PORT").and_then(|p| p.parse().ok()) {
            self.database.port = port;
        }
        if let Some(secret) = var("SECRET_KEY") {
            self.session.secret = secret;
        }
        if let Some(port) = var("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        let client_id = var("GOOGLE_CLIENT_ID");
        let client_secret = var("GOOGLE_CLIENT_SECRET");
        let callback = var("CALLBACK_URL");
        if client_id.is_some() || client_secret.is_some() || callback.is_some() {
            let google = self.oauth.google.get_or_insert_with(|| GoogleOAuthSection {
                client_id: String::new(),
                client_secret: String::new(),
                redirect_url: String::new(),
            });
            if let Some(v) = client_id {
                google.client_id = v;
            }
            if let Some(v) = client_secret {
                google.client_secret = v;
            }
            if let Some(v) = callback {
                google.redirect_url = v;
            }
        }
    }

    /// Checks values the server cannot start without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.secret.is_empty() {
            return Err(ConfigError::Invalid {
                key: "session.secret",
                reason: "must not be empty".into(),
            });
        }
        if self.access_gate.ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "access_gate.ttl_minutes",
                reason: "must be positive".into(),
            });
        }
        if !(MIN_COST..=MAX_COST).contains(&self.access_gate.bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "access_gate.bcrypt_cost",
                reason: format!("must be between {} and {}", MIN_COST, MAX_COST),
            });
        }
        if self.uploads.max_width == 0 || !(1..=100).contains(&self.uploads.jpeg_quality) {
            return Err(ConfigError::Invalid {
                key: "uploads",
                reason: "max_width must be positive and jpeg_quality 1-100".into(),
            });
        }
        if let Some(google) = &self.oauth.google {
            if google.client_id.is_empty() || google.client_secret.is_empty() {
                return Err(ConfigError::Invalid {
                    key: "oauth.google",
                    reason: "client_id and client_secret are required".into(),
                });
            }
        }
        Ok(())
    }

    /// Whether the cookie secret is still the built-in development value.
    pub fn uses_dev_session_secret(&self) -> bool {
        self.session.secret == DEV_SESSION_SECRET
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
