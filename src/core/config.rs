use std::env;
use std::time::Duration;

use crate::shared::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_ALLOWED_MIME_TYPES, DEFAULT_CODE_ALPHABET,
    DEFAULT_CODE_LENGTH, DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_SESSION_TTL_SECS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub session: SessionConfig,
    pub upload: UploadConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Code allocation and session lifetime
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Symbols codes are drawn from
    pub alphabet: String,
    /// Number of symbols per code
    pub code_length: usize,
    /// Fixed lifetime of every session, never extended by activity
    pub ttl: Duration,
}

/// Limits applied to uploads before they reach storage
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: usize,
    /// Lower-case extensions without the leading dot
    pub allowed_extensions: Vec<String>,
    pub allowed_mime_types: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            session: SessionConfig::from_env()?,
            upload: UploadConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins =
            parse_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, String> {
        let alphabet =
            env::var("CODE_ALPHABET").unwrap_or_else(|_| DEFAULT_CODE_ALPHABET.to_string());

        let code_length = env::var("CODE_LENGTH")
            .unwrap_or_else(|_| DEFAULT_CODE_LENGTH.to_string())
            .parse::<usize>()
            .map_err(|_| "CODE_LENGTH must be a valid number".to_string())?;

        let ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SESSION_TTL_SECS must be a valid number".to_string())?;

        if ttl_secs == 0 {
            return Err("SESSION_TTL_SECS must be greater than zero".to_string());
        }

        Ok(Self {
            alphabet,
            code_length,
            ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_CODE_ALPHABET.to_string(),
            code_length: DEFAULT_CODE_LENGTH,
            ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, String> {
        let max_file_size = env::var("MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_UPLOAD_SIZE must be a valid number".to_string())?;

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .map(|s| parse_list(&s))
            .unwrap_or_else(|_| to_owned_list(DEFAULT_ALLOWED_EXTENSIONS))
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();

        let allowed_mime_types = env::var("ALLOWED_MIME_TYPES")
            .map(|s| parse_list(&s))
            .unwrap_or_else(|_| to_owned_list(DEFAULT_ALLOWED_MIME_TYPES))
            .into_iter()
            .map(|ty| ty.to_lowercase())
            .collect();

        Ok(Self {
            max_file_size,
            allowed_extensions,
            allowed_mime_types,
        })
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_UPLOAD_SIZE,
            allowed_extensions: to_owned_list(DEFAULT_ALLOWED_EXTENSIONS),
            allowed_mime_types: to_owned_list(DEFAULT_ALLOWED_MIME_TYPES),
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Bookdrop API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Send a file to any device with a short code".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

/// Split a comma-separated value, dropping empty entries
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
