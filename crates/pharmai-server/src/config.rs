//! Service configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use pharmai_llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use thiserror::Error;

/// Application version (from Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 10;
pub const MAX_INFERENCE_TIMEOUT_SECS: u64 = 300;

/// Slack between the client timeout and the request-level guard.
pub const TIMEOUT_GRACE: Duration = Duration::from_secs(2);

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "pharmai=info,tower_http=info"
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a number, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be an IP address, got '{value}'")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{var} must be at most {max}, got {value}")]
    TooLarge {
        var: &'static str,
        value: u64,
        max: u64,
    },
}

#[derive(Clone, PartialEq)]
pub struct Config {
    pub bind: IpAddr,
    pub port: u16,
    /// Unset disables inference
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub inference_timeout_secs: u64,
    /// Unset uses the built-in dataset
    pub dataset_path: Option<PathBuf>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind", &self.bind)
            .field("port", &self.port)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("inference_timeout_secs", &self.inference_timeout_secs)
            .field("dataset_path", &self.dataset_path)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            inference_timeout_secs: DEFAULT_INFERENCE_TIMEOUT_SECS,
            dataset_path: None,
        }
    }
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Config::default();

        let bind = match get("PHARMAI_BIND") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidAddress {
                var: "PHARMAI_BIND",
                value,
            })?,
            None => defaults.bind,
        };

        let port = match get("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var: "PORT", value })?,
            None => defaults.port,
        };

        let inference_timeout_secs = match get("PHARMAI_INFERENCE_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "PHARMAI_INFERENCE_TIMEOUT_SECS",
                value,
            })?,
            None => defaults.inference_timeout_secs,
        };
        if inference_timeout_secs == 0 {
            return Err(ConfigError::Zero("PHARMAI_INFERENCE_TIMEOUT_SECS"));
        }
        if inference_timeout_secs > MAX_INFERENCE_TIMEOUT_SECS {
            return Err(ConfigError::TooLarge {
                var: "PHARMAI_INFERENCE_TIMEOUT_SECS",
                value: inference_timeout_secs,
                max: MAX_INFERENCE_TIMEOUT_SECS,
            });
        }

        Ok(Self {
            bind,
            port,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            inference_timeout_secs,
            dataset_path: get("PHARMAI_DATASET").map(PathBuf::from),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Upper bound on a request that may call the inference service.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout_secs).saturating_add(TIMEOUT_GRACE)
    }
}
