//! Configuration module

use std::env;

use attrition_core::ArtifactPaths;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Classifier and role rate table locations
    pub artifacts: ArtifactPaths,

    /// Allow any origin in production (browser form served from elsewhere).
    /// Off unless CORS_ALLOW_ANY is set; non-production always allows any.
    pub cors_allow_any: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            artifacts: ArtifactPaths::from_env(),

            cors_allow_any: parse_flag(env::var("CORS_ALLOW_ANY").ok()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Boolean env flag: "1", "true" or "yes" (any case) turn it on
fn parse_flag(value: Option<String>) -> bool {
    value
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
