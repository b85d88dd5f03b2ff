//! Application configuration loaded from TOML.
//!
//! ```toml
//! environment = "development"
//!
//! [identity]
//! mode = "development"
//! session_ttl_secs = 3600
//!
//! [audit]
//! enabled = true
//! ```
//!
//! Every field has a default. The defaults select production with an
//! external identity provider, so the development bypass is only ever
//! enabled by an explicit opt-in. Role permissions are not configurable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use volunteerflow_contracts::error::{FlowError, FlowResult};

/// Upper bound on a development session lifetime (30 days).
pub const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

/// Where request identities come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityMode {
    /// A real identity provider supplied by the host.
    #[default]
    External,
    /// The built-in seed identities with locally issued session tokens.
    Development,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    #[serde(default)]
    pub mode: IdentityMode,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self { mode: IdentityMode::default(), session_ttl_secs: DEFAULT_SESSION_TTL_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Development environment with the development identity bypass.
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            identity: IdentityConfig { mode: IdentityMode::Development, ..IdentityConfig::default() },
            audit: AuditConfig::default(),
        }
    }

    /// Parse and validate a TOML document.
    ///
    /// Returns `FlowError::ConfigError` if the TOML is malformed, carries
    /// unknown keys, or fails `validate`.
    pub fn from_toml_str(s: &str) -> FlowResult<Self> {
        let config: AppConfig = toml::from_str(s).map_err(|e| FlowError::ConfigError {
            reason: format!("failed to parse configuration TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> FlowResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| FlowError::ConfigError {
            reason: format!("failed to read configuration file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject combinations that must never run.
    ///
    /// The development identity bypass is refused outright in production.
    pub fn validate(&self) -> FlowResult<()> {
        if self.environment == Environment::Production && self.identity.mode == IdentityMode::Development {
            return Err(FlowError::ConfigError {
                reason: "development identity mode is not allowed in production".to_string(),
            });
        }
        if self.identity.session_ttl_secs == 0 || self.identity.session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(FlowError::ConfigError {
                reason: format!(
                    "identity.session_ttl_secs must be between 1 and {MAX_SESSION_TTL_SECS}, got {}",
                    self.identity.session_ttl_secs
                ),
            });
        }
        Ok(())
    }

    pub fn is_development_identity(&self) -> bool {
        self.identity.mode == IdentityMode::Development
    }
}
