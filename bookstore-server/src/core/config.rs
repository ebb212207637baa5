use std::path::PathBuf;

use crate::auth::{JwtConfig, JwtError};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | database file, uploads and logs |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | default tracing level (`RUST_LOG` overrides) |
/// | LOG_JSON | false | JSON log lines |
/// | JWT_SECRET | random outside production | HMAC key, at least 32 chars |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
/// | MAIL_GATEWAY_URL / MAIL_FROM | unset | outbound mail gateway |
/// | SMS_GATEWAY_URL / SMS_SENDER | unset | outbound SMS gateway |
/// | MAX_UPLOAD_BYTES | 5242880 | upload size limit |
/// | PUBLIC_BASE_URL | empty | prefix for returned upload URLs |
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub jwt: JwtConfig,
    pub mail_gateway_url: Option<String>,
    pub mail_from: String,
    pub sms_gateway_url: Option<String>,
    pub sms_sender: String,
    pub max_upload_bytes: usize,
    pub public_base_url: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, JwtError> {
        let environment = env_or("ENVIRONMENT", "development");
        let jwt = JwtConfig::from_env(environment == "production")?;

        Ok(Self {
            work_dir: PathBuf::from(env_or("WORK_DIR", "./data")),
            http_port: env_parse("HTTP_PORT", 3000),
            environment,
            log_level: env_or("LOG_LEVEL", "info"),
            log_json: env_parse("LOG_JSON", false),
            jwt,
            mail_gateway_url: env_opt("MAIL_GATEWAY_URL"),
            mail_from: env_or("MAIL_FROM", "no-reply@bookstore.local"),
            sms_gateway_url: env_opt("SMS_GATEWAY_URL"),
            sms_sender: env_or("SMS_SENDER", "Bookstore"),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 5 * 1024 * 1024),
            public_base_url: env_or("PUBLIC_BASE_URL", ""),
        })
    }

    /// Configuration for tests: everything under `work_dir`, fixed secret,
    /// no gateways
    pub fn for_tests(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 0,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            log_json: false,
            jwt: JwtConfig {
                secret: "bookstore-test-secret-0123456789abcdef".to_string(),
                expiration_minutes: 60,
            },
            mail_gateway_url: None,
            mail_from: "no-reply@bookstore.local".to_string(),
            sms_gateway_url: None,
            sms_sender: "Bookstore".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
            public_base_url: String::new(),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.work_dir.join("bookstore.redb")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.work_dir.join("uploads")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.work_dir.join("logs")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
