//! # Client Configuration
//!
//! Where the booking backend lives, where the session is kept, and how
//! payments are confirmed.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DRIVEHUB_API_BASE=https://api.drivehub.example                     │
//! │     DRIVEHUB_PAYMENT_MODE=decline                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/client.toml (Linux)                           │
//! │     ~/Library/Application Support/com.drivehub.storefront/client.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5000, no timeout, simulated payments              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://localhost:5000"
//! # request_timeout_secs = 30
//!
//! [session]
//! # path = "/tmp/drivehub-session.json"
//!
//! [payment]
//! mode = "simulated"  # simulated | decline
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Payment Mode
// =============================================================================

/// How the local payment gateway answers a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Every payment succeeds.
    #[default]
    Simulated,

    /// Every payment is declined. Useful for exercising the retry path.
    Decline,
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMode::Simulated => write!(f, "simulated"),
            PaymentMode::Decline => write!(f, "decline"),
        }
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simulated" | "success" => Ok(PaymentMode::Simulated),
            "decline" | "declined" => Ok(PaymentMode::Decline),
            other => Err(ClientError::InvalidConfig(format!(
                "Unknown payment mode: '{}'. Valid options: simulated, decline",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Booking backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the REST backend; `/api/...` paths are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means requests wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Session file. Defaults to `session.json` in the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentSettings {
    #[serde(default)]
    pub mode: PaymentMode,
}

// =============================================================================
// Client Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub payment: PaymentSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> ClientResult<()> {
        self.base_url()?;

        if self.api.request_timeout_secs == Some(0) {
            return Err(ClientError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from a key lookup (the process environment in
    /// [`ClientConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DRIVEHUB_API_BASE") {
            debug!(url = %url, "Overriding API base URL from environment");
            self.api.base_url = url;
        }

        if let Some(secs) = lookup("DRIVEHUB_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.request_timeout_secs = Some(s),
                Err(_) => warn!(value = %secs, "Ignoring non-numeric request timeout"),
            }
        }

        if let Some(path) = lookup("DRIVEHUB_SESSION_PATH") {
            self.session.path = Some(PathBuf::from(path));
        }

        if let Some(mode) = lookup("DRIVEHUB_PAYMENT_MODE") {
            match mode.parse() {
                Ok(parsed) => {
                    debug!(mode = %mode, "Overriding payment mode from environment");
                    self.payment.mode = parsed;
                }
                Err(_) => warn!(mode = %mode, "Unknown payment mode in environment"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "drivehub", "storefront")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The parsed API base. Only http and https are accepted.
    pub fn base_url(&self) -> ClientResult<Url> {
        let url = Url::parse(&self.api.base_url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::InvalidUrl(format!(
                "API base must use http or https, got: {}",
                other
            ))),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.api.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn payment_mode(&self) -> PaymentMode {
        self.payment.mode
    }
}
