use std::env;

use crate::error::AppError;

/// Default client table for dev deployments: a trusted first-party client, a
/// read-only guest client and a provisioned-but-unscoped third party.
pub const DEFAULT_CLIENTS: &str = "acme:acmesecret:trusted,guest:guest:guest,3rd:3rd:unregistered";

#[derive(Debug, Clone)]
pub struct UaaConfig {
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub port: u16,
    pub otlp_endpoint: Option<String>,
    pub allowed_origins: Vec<String>,
    pub jwt: JwtConfig,
    pub member_store: MemberStoreConfig,
    /// Raw `client_id:secret:tier` triples, comma separated.
    pub clients: String,
    pub store_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

/// Key material and issuer for the token signing/verification primitive.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub private_key_path: String,
    pub public_key_path: String,
}

#[derive(Debug, Clone)]
pub enum MemberStoreConfig {
    Memory,
    Mongo { uri: String, database: String },
}

impl UaaConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let member_store = match get_env("MEMBER_STORE", Some("memory"), is_prod)?.as_str() {
            "memory" => MemberStoreConfig::Memory,
            "mongo" => MemberStoreConfig::Mongo {
                uri: get_env("MONGODB_URI", None, is_prod)?,
                database: get_env("MONGODB_DATABASE", None, is_prod)?,
            },
            other => {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "invalid member store backend: {}",
                    other
                )))
            }
        };

        let config = UaaConfig {
            environment,
            service_name: get_env("SERVICE_NAME", Some("uaa-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            port: get_env("PORT", Some("8080"), is_prod)?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    AppError::ConfigError(anyhow::anyhow!(e.to_string()))
                })?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            allowed_origins: get_env("ALLOWED_ORIGINS", Some("http://localhost:3000"), is_prod)?
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            jwt: JwtConfig {
                issuer: get_env("JWT_ISSUER", Some("uaa"), is_prod)?,
                private_key_path: get_env("JWT_PRIVATE_KEY_PATH", None, is_prod)?,
                public_key_path: get_env("JWT_PUBLIC_KEY_PATH", None, is_prod)?,
            },
            member_store,
            clients: get_env("OAUTH_CLIENTS", Some(DEFAULT_CLIENTS), is_prod)?,
            store_timeout_ms: get_env("MEMBER_STORE_TIMEOUT_MS", Some("3000"), is_prod)?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    AppError::ConfigError(anyhow::anyhow!(e.to_string()))
                })?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.store_timeout_ms == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "MEMBER_STORE_TIMEOUT_MS must be positive"
            )));
        }

        if self.environment == Environment::Prod {
            if self.allowed_origins.iter().any(|o| o == "*") {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard CORS origin not allowed in production"
                )));
            }

            if matches!(self.member_store, MemberStoreConfig::Memory) {
                tracing::warn!(
                    "In-memory member store configured in production; members will not survive a restart"
                );
            }
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
