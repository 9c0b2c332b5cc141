use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::infrastructure::storage::ObjectStorageSettings;

/// `DATABASE_URL` value selecting the process-local document store
pub const MEMORY_DATABASE_URL: &str = "memory://";

const DEV_ACCESS_SECRET: &str = "dev-access-secret";
const DEV_REFRESH_SECRET: &str = "dev-refresh-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must start with postgres://, postgresql:// or be memory://")]
    InvalidDatabaseUrl(String),

    #[error("{0} cannot be empty")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Where image blobs are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Local,
    S3,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            other => Err(ConfigError::Invalid {
                name: "STORAGE_MODE",
                reason: format!("unknown mode '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    // Database connection pool settings
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub public_root: PathBuf,
    pub upload_staging_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub storage_mode: StorageMode,
    pub s3: ObjectStorageSettings,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub bcrypt_cost: u32,
    pub allowed_origins: Vec<String>,
    pub login_attempts_per_minute: u32,
    pub environment: String,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(name: &str, default: T) -> T {
    var(name).and_then(|s| s.parse().ok()).unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3500".to_string(),
            database_url: MEMORY_DATABASE_URL.to_string(),
            db_max_connections: 20,
            db_min_connections: 2,
            db_acquire_timeout_secs: 30,
            public_root: PathBuf::from("public"),
            upload_staging_dir: PathBuf::from("public/uploads"),
            max_upload_bytes: 5 * 1024 * 1024,
            storage_mode: StorageMode::Local,
            s3: ObjectStorageSettings::default(),
            access_token_secret: DEV_ACCESS_SECRET.to_string(),
            refresh_token_secret: DEV_REFRESH_SECRET.to_string(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 604_800,
            bcrypt_cost: 10,
            allowed_origins: Vec::new(),
            login_attempts_per_minute: 5,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_mode = match var("STORAGE_MODE") {
            Some(mode) => mode.parse()?,
            None => defaults.storage_mode,
        };

        Ok(Self {
            listen_addr: var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            db_min_connections: parsed("DB_MIN_CONNECTIONS", defaults.db_min_connections),
            db_acquire_timeout_secs: parsed(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.db_acquire_timeout_secs,
            ),
            public_root: var("PUBLIC_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_root),
            upload_staging_dir: var("UPLOAD_STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_staging_dir),
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            storage_mode,
            s3: ObjectStorageSettings {
                bucket: var("S3_BUCKET").unwrap_or_default(),
                region: var("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                endpoint: var("S3_ENDPOINT"),
                public_base_url: var("S3_PUBLIC_BASE_URL"),
                access_key_id: var("AWS_ACCESS_KEY_ID"),
                secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
            },
            access_token_secret: var("ACCESS_TOKEN_SECRET")
                .unwrap_or(defaults.access_token_secret),
            refresh_token_secret: var("REFRESH_TOKEN_SECRET")
                .unwrap_or(defaults.refresh_token_secret),
            access_token_ttl_secs: parsed("ACCESS_TOKEN_TTL_SECS", defaults.access_token_ttl_secs),
            refresh_token_ttl_secs: parsed(
                "REFRESH_TOKEN_TTL_SECS",
                defaults.refresh_token_ttl_secs,
            ),
            bcrypt_cost: parsed("BCRYPT_COST", defaults.bcrypt_cost),
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            login_attempts_per_minute: parsed(
                "LOGIN_ATTEMPTS_PER_MINUTE",
                defaults.login_attempts_per_minute,
            ),
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.uses_memory_store()
            && !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(ConfigError::InvalidDatabaseUrl("DATABASE_URL".to_string()));
        }

        if self.listen_addr.is_empty() {
            return Err(ConfigError::Missing("LISTEN_ADDR"));
        }

        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_UPLOAD_BYTES",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.storage_mode == StorageMode::S3 && self.s3.bucket.is_empty() {
            return Err(ConfigError::Missing("S3_BUCKET"));
        }

        if self.access_token_secret == self.refresh_token_secret {
            return Err(ConfigError::Invalid {
                name: "REFRESH_TOKEN_SECRET",
                reason: "must differ from ACCESS_TOKEN_SECRET".to_string(),
            });
        }

        if self.is_production()
            && (self.access_token_secret == DEV_ACCESS_SECRET
                || self.refresh_token_secret == DEV_REFRESH_SECRET)
        {
            return Err(ConfigError::Missing("ACCESS_TOKEN_SECRET/REFRESH_TOKEN_SECRET"));
        }

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                reason: "must be between 4 and 31".to_string(),
            });
        }

        if self.login_attempts_per_minute == 0 {
            return Err(ConfigError::Invalid {
                name: "LOGIN_ATTEMPTS_PER_MINUTE",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
