//! Configuration module
//!
//! Server, database and placeholder settings, read from the environment
//! (optionally seeded from a `.env` file).

use std::env;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const UPLOAD_BASE_URL: &str = "/wp-content/uploads";
/// Builder used when nothing else is configured.
pub const DEFAULT_PLACEHOLDER_BUILDER: &str = "placeholdit";
/// Default "large" image size, used when neither filename nor metadata carry dimensions.
const LARGE_SIZE: u32 = 1024;

/// Base configuration for the HTTP server and database pool
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

/// Placeholder-specific configuration
#[derive(Clone, Debug)]
pub struct PlaceholderConfig {
    /// Upload base as configured; may be a full URL or a bare path.
    pub upload_base_url: String,
    /// Directory holding real uploads; existing files are served from here.
    pub local_uploads_path: Option<String>,
    pub placeholder_builder: String,
    pub redirect_server: Option<String>,
    pub offline_mode: bool,
    /// `None` when configured as 0 (unset).
    pub large_size_w: Option<u32>,
    pub large_size_h: Option<u32>,
    pub trust_forwarded_proto: bool,
    pub force_https: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub placeholder: PlaceholderConfig,
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v.trim().to_lowercase())
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" | "" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_dimension(name: &str, default: u32) -> Result<Option<u32>, anyhow::Error> {
    let value = match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer", name))?,
        Err(_) => default,
    };
    Ok(Some(value).filter(|v| *v > 0))
}

/// Extract the path component of an upload base that may be a full URL.
///
/// `https://example.com/wp-content/uploads/` becomes `/wp-content/uploads`.
pub fn upload_base_path(upload_base_url: &str) -> String {
    let without_scheme = match upload_base_url.split_once("://") {
        Some((_, rest)) => match rest.find('/') {
            Some(idx) => &rest[idx..],
            None => "",
        },
        None => upload_base_url,
    };
    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    if path.is_empty() {
        String::from("/")
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Protocol-relative form of the upload base (`//example.com/wp-content/uploads`).
///
/// Bare paths are returned unchanged without a trailing slash.
pub fn upload_base_protocol_relative(upload_base_url: &str) -> String {
    let trimmed = upload_base_url.trim_end_matches('/');
    match trimmed.split_once("://") {
        Some((_, rest)) => format!("//{}", rest),
        None => trimmed.to_string(),
    }
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        let placeholder = PlaceholderConfig {
            upload_base_url: env::var("UPLOAD_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| UPLOAD_BASE_URL.to_string()),
            local_uploads_path: env::var("LOCAL_UPLOADS_PATH")
                .ok()
                .filter(|s| !s.is_empty()),
            placeholder_builder: env::var("MISSING_UPLOADED_IMAGE_PLACEHOLDER_BUILTIN")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_BUILDER.to_string()),
            redirect_server: env::var("MISSING_UPLOADED_IMAGE_REDIRECT_SERVER")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            offline_mode: env_bool("MEDIA_PLACEHOLDERS_OFFLINE", false),
            large_size_w: env_dimension("LARGE_SIZE_W", LARGE_SIZE)?,
            large_size_h: env_dimension("LARGE_SIZE_H", LARGE_SIZE)?,
            trust_forwarded_proto: env_bool("TRUST_FORWARDED_PROTO", true),
            force_https: env_bool("FORCE_HTTPS", false),
        };

        let config = Config { base, placeholder };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.base.database_url.starts_with("postgres://")
            && !self.base.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.placeholder.local_uploads_path.is_some() && self.upload_base_path() == "/" {
            return Err(anyhow::anyhow!(
                "LOCAL_UPLOADS_PATH cannot be combined with an UPLOAD_BASE_URL at the site root"
            ));
        }

        if let Some(server) = &self.placeholder.redirect_server {
            if server.contains("://") || server.contains('/') {
                return Err(anyhow::anyhow!(
                    "MISSING_UPLOADED_IMAGE_REDIRECT_SERVER must be a bare host name, got {:?}",
                    server
                ));
            }
        }

        Ok(())
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.base.db_timeout_seconds
    }

    pub fn upload_base_url(&self) -> &str {
        &self.placeholder.upload_base_url
    }

    /// Path prefix under which uploads are served, without a trailing slash.
    pub fn upload_base_path(&self) -> String {
        upload_base_path(&self.placeholder.upload_base_url)
    }

    pub fn local_uploads_path(&self) -> Option<&str> {
        self.placeholder.local_uploads_path.as_deref()
    }

    pub fn placeholder_builder(&self) -> &str {
        &self.placeholder.placeholder_builder
    }

    pub fn redirect_server(&self) -> Option<&str> {
        self.placeholder.redirect_server.as_deref()
    }

    pub fn offline_mode(&self) -> bool {
        self.placeholder.offline_mode
    }

    pub fn large_size_w(&self) -> Option<u32> {
        self.placeholder.large_size_w
    }

    pub fn large_size_h(&self) -> Option<u32> {
        self.placeholder.large_size_h
    }

    pub fn trust_forwarded_proto(&self) -> bool {
        self.placeholder.trust_forwarded_proto
    }

    pub fn force_https(&self) -> bool {
        self.placeholder.force_https
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        base: BaseConfig {
            server_port: SERVER_PORT,
            environment: "test".to_string(),
            database_url: "postgres://localhost/fauxmedia".to_string(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
        },
        placeholder: PlaceholderConfig {
            upload_base_url: "http://example.com/wp-content/uploads".to_string(),
            local_uploads_path: None,
            placeholder_builder: DEFAULT_PLACEHOLDER_BUILDER.to_string(),
            redirect_server: None,
            offline_mode: false,
            large_size_w: Some(LARGE_SIZE),
            large_size_h: Some(LARGE_SIZE),
            trust_forwarded_proto: true,
            force_https: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_base_path_from_full_url() {
        assert_eq!(
            upload_base_path("https://example.com/wp-content/uploads/"),
            "/wp-content/uploads"
        );
        assert_eq!(upload_base_path("http://example.com"), "/");
        assert_eq!(upload_base_path("http://example.com:8080/media?x=1"), "/media");
    }

    #[test]
    fn test_upload_base_path_from_bare_path() {
        assert_eq!(upload_base_path("/wp-content/uploads"), "/wp-content/uploads");
        assert_eq!(upload_base_path("uploads/"), "/uploads");
        assert_eq!(upload_base_path("/"), "/");
    }

    #[test]
    fn test_upload_base_protocol_relative() {
        assert_eq!(
            upload_base_protocol_relative("https://example.com/wp-content/uploads/"),
            "//example.com/wp-content/uploads"
        );
        assert_eq!(
            upload_base_protocol_relative("/wp-content/uploads"),
            "/wp-content/uploads"
        );
    }

    #[test]
    fn test_validate_rejects_non_postgres_url() {
        let mut config = test_config();
        config.base.database_url = "mysql://localhost/wp".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_redirect_server_with_scheme() {
        let mut config = test_config();
        config.placeholder.redirect_server = Some("https://prod.example.com".to_string());
        assert!(config.validate().is_err());

        config.placeholder.redirect_server = Some("prod.example.com".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_local_uploads_at_root() {
        let mut config = test_config();
        config.placeholder.upload_base_url = "http://example.com/".to_string();
        config.placeholder.local_uploads_path = Some("/var/www/uploads".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = test_config();
        assert!(!config.is_production());
        config.base.environment = "PROD".to_string();
        assert!(config.is_production());
    }
}
