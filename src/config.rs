//! Runtime configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:5173,http://localhost:5174,http://localhost:3000";

const DEFAULT_RAZORPAY_BASE_URL: &str = "https://api.razorpay.com/v1";

const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Per-role JWT signing secrets; a token signed for one role never
/// validates for another.
#[derive(Clone, Debug)]
pub struct JwtSecrets {
    pub user: String,
    pub owner: String,
    pub admin: String,
}

#[derive(Clone, Debug)]
pub struct RazorpayConfig {
    pub key_id: String,
    /// Also the HMAC key for payment signature verification
    pub key_secret: String,
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtSecrets,
    pub token_ttl_hours: i64,
    pub razorpay: RazorpayConfig,
    /// Upper bound on a single payment gateway call
    pub gateway_timeout: Duration,
    pub cloudinary: CloudinaryConfig,
    /// Upper bound on a single image upload or destroy call
    pub image_host_timeout: Duration,
    pub allowed_origins: Vec<String>,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: env_or("HOST", "0.0.0.0"),
            port: parsed("PORT", 3000)?,
            jwt: JwtSecrets {
                user: required("JWT_USER_PASSWORD")?,
                owner: required("JWT_OWNER_PASSWORD")?,
                admin: required("JWT_ADMIN_PASSWORD")?,
            },
            token_ttl_hours: parsed("TOKEN_TTL_HOURS", 24)?,
            razorpay: RazorpayConfig {
                key_id: required("RAZORPAY_KEY_ID")?,
                key_secret: required("RAZORPAY_KEY_SECRET")?,
                base_url: env_or("RAZORPAY_BASE_URL", DEFAULT_RAZORPAY_BASE_URL),
            },
            gateway_timeout: Duration::from_secs(parsed("GATEWAY_TIMEOUT_SECS", 10)?),
            cloudinary: CloudinaryConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
                base_url: env_or("CLOUDINARY_BASE_URL", DEFAULT_CLOUDINARY_BASE_URL),
            },
            image_host_timeout: Duration::from_secs(parsed("IMAGE_HOST_TIMEOUT_SECS", 30)?),
            allowed_origins: parse_csv(&env_or("ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS)),
            bcrypt_cost: parsed("BCRYPT_COST", 10)?,
        })
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env_opt(key).ok_or(ConfigError::Missing(key))
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env_opt(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

pub(crate) fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_trims_and_skips_empty() {
        let origins = parse_csv(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_default_origins_cover_dev_frontends() {
        let origins = parse_csv(DEFAULT_ALLOWED_ORIGINS);
        assert_eq!(origins.len(), 3);
        assert!(origins.contains(&"http://localhost:5173".to_string()));
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::Missing("DATABASE_URL").to_string(),
            "DATABASE_URL must be set"
        );
        let err = ConfigError::Invalid {
            key: "PORT",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "PORT has an invalid value: abc");
    }
}
