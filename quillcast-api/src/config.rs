//! Configuration management for the API server.
//!
//! Configuration is loaded from environment variables (with `.env` support
//! for development via dotenvy).
//!
//! # Environment Variables
//!
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `API_PORT`: Port to bind to (default: 8080)
//! - `API_PRODUCTION`: Enables production hardening such as HSTS (default: false)
//! - `CORS_ORIGINS`: Comma-separated allowed origins (default: "*")
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `JWT_SECRET`: Secret key for JWT signing, at least 32 bytes (required)
//! - `STORAGE_ENDPOINT`: Object-storage upload endpoint (required)
//! - `STORAGE_ACCESS_KEY`: Object-storage access key (required)
//! - `STORAGE_PUBLIC_URL`: Public base URL for stored objects (required)
//! - `STRIPE_SECRET_KEY`: Payment gateway secret key (required)
//! - `PAYMENT_CURRENCY`: ISO currency code (default: "usd")
//! - `TTS_ENDPOINT`: Speech-synthesis endpoint (default: Google Translate TTS)
//! - `TTS_LANGUAGE`: Narration language code (default: "en")

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Object storage configuration
    pub storage: StorageConfig,

    /// Payment gateway configuration
    pub payment: PaymentConfig,

    /// Speech synthesis configuration
    pub tts: TtsConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; "*" means permissive (development)
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS and strict CORS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing; must be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Upload endpoint, e.g. "https://storage.example.com/quillcast"
    pub endpoint: String,

    /// Access key sent with every upload
    pub access_key: String,

    /// Public base URL under which stored objects are served
    pub public_url: String,
}

/// Payment gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Gateway secret key
    pub secret_key: String,

    /// ISO currency code used for every intent
    pub currency: String,
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Synthesis endpoint
    pub endpoint: String,

    /// Narration language code
    pub language: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails
    /// to parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;
        let production = env::var("API_PRODUCTION")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let storage_endpoint = env::var("STORAGE_ENDPOINT")
            .map_err(|_| anyhow::anyhow!("STORAGE_ENDPOINT environment variable is required"))?;
        let storage_access_key = env::var("STORAGE_ACCESS_KEY")
            .map_err(|_| anyhow::anyhow!("STORAGE_ACCESS_KEY environment variable is required"))?;
        let storage_public_url = env::var("STORAGE_PUBLIC_URL")
            .map_err(|_| anyhow::anyhow!("STORAGE_PUBLIC_URL environment variable is required"))?;

        let stripe_secret_key = env::var("STRIPE_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("STRIPE_SECRET_KEY environment variable is required"))?;
        let currency = env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "usd".to_string());

        let tts_endpoint = env::var("TTS_ENDPOINT")
            .unwrap_or_else(|_| "https://translate.google.com/translate_tts".to_string());
        let tts_language = env::var("TTS_LANGUAGE").unwrap_or_else(|_| "en".to_string());

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            storage: StorageConfig {
                endpoint: storage_endpoint,
                access_key: storage_access_key,
                public_url: storage_public_url,
            },
            payment: PaymentConfig {
                secret_key: stripe_secret_key,
                currency,
            },
            tts: TtsConfig {
                endpoint: tts_endpoint,
                language: tts_language,
            },
        })
    }

    /// Returns the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Builds a fully populated configuration for unit tests.
#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/quillcast_test".to_string(),
            max_connections: 10,
        },
        jwt: JwtConfig {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
        },
        storage: StorageConfig {
            endpoint: "https://storage.example.com/quillcast".to_string(),
            access_key: "test-key".to_string(),
            public_url: "https://cdn.example.com".to_string(),
        },
        payment: PaymentConfig {
            secret_key: "sk_test_123".to_string(),
            currency: "usd".to_string(),
        },
        tts: TtsConfig {
            endpoint: "https://translate.google.com/translate_tts".to_string(),
            language: "en".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_joins_host_and_port() {
        let config = test_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
