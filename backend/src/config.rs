//! Configuration management for the Health & Sanitation Inspection Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with HSI_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{ComplianceRule, ViolationSeverity};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Outbound event delivery configuration
    pub events: EventsConfig,

    /// Compliance rule configuration
    pub compliance: ComplianceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for verifying JWT tokens issued by the identity provider
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    /// Webhook endpoint consuming domain events; delivery is disabled when
    /// unset
    pub endpoint: Option<String>,

    /// Secret for the HMAC-SHA256 payload signature header
    pub signing_secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ComplianceConfig {
    /// Violation severities that block compliance while unresolved
    pub blocking_severities: Vec<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("HSI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.secret", "development-secret-key")?
            .set_default(
                "compliance.blocking_severities",
                vec!["critical".to_string()],
            )?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (HSI_ prefix)
            .add_source(
                Environment::with_prefix("HSI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Compliance rule parsed from configuration; unknown severities are
    /// logged and skipped
    pub fn compliance_rule(&self) -> ComplianceRule {
        let severities: Vec<ViolationSeverity> = self
            .compliance
            .blocking_severities
            .iter()
            .filter_map(|s| {
                let parsed = ViolationSeverity::from_str(s);
                if parsed.is_none() {
                    tracing::warn!("Ignoring unknown blocking severity '{}' in config", s);
                }
                parsed
            })
            .collect();

        if severities.is_empty() {
            ComplianceRule::default()
        } else {
            ComplianceRule::new(severities)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
