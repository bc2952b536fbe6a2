use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Application configuration, loaded once at startup and shared through `AppState`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub mail: MailConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/food.db"),
        }
    }
}

/// Outbound SMTP settings for owner notifications
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub owner_email: Option<String>,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
    pub queue_capacity: usize,
    /// How long shutdown waits for queued mail
    pub shutdown_grace_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: None,
            password: None,
            owner_email: None,
            timeout_secs: 10,
            max_attempts: 3,
            retry_backoff_ms: 500,
            queue_capacity: 64,
            shutdown_grace_secs: 30,
        }
    }
}

impl MailConfig {
    /// Returns `(owner, username, password)` when mail is enabled and fully configured.
    ///
    /// The owner address doubles as the SMTP login when no username is set.
    pub fn credentials(&self) -> Option<(&str, &str, &str)> {
        if !self.enabled {
            return None;
        }
        let owner = self.owner_email.as_deref().filter(|s| !s.is_empty())?;
        let password = self.password.as_deref().filter(|s| !s.is_empty())?;
        let username = self
            .username
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(owner);
        Some((owner, username, password))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub owner_whatsapp: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Home Kitchen".to_string(),
            owner_whatsapp: None,
        }
    }
}

impl AppConfig {
    /// Load from `$APP_CONFIG` (or `config.toml`), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("APP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Some(owner) = lookup("OWNER_EMAIL") {
            self.mail.owner_email = Some(owner);
        }
        if let Some(username) = lookup("SMTP_USERNAME") {
            self.mail.username = Some(username);
        }
        if let Some(password) = lookup("SMTP_PASSWORD") {
            self.mail.password = Some(password);
        }
        if let Some(whatsapp) = lookup("OWNER_WHATSAPP") {
            self.site.owner_whatsapp = Some(whatsapp);
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
