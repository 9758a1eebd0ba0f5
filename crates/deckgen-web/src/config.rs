use std::net::SocketAddr;
use std::time::Duration;

use deckgen_core::config_file::{self, ConfigFile};
use deckgen_core::{DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_PAGES, UploadLimits};
use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_EXTRACT_TIMEOUT_SECS: u64 = 30;

/// Slack on top of the file size limit for multipart boundaries and headers.
pub const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {reason}")]
    Bind { value: String, reason: String },
    #[error("invalid value {value:?} for {key}: expected a non-negative integer")]
    Number { key: &'static str, value: String },
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
}

/// Server configuration, resolved once at startup.
///
/// Precedence: environment variables > config files > defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub limits: UploadLimits,
    /// `None` disables the extraction timeout.
    pub extraction_timeout: Option<Duration>,
    pub cors_allow_any_origin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            limits: UploadLimits::default(),
            extraction_timeout: Some(Duration::from_secs(DEFAULT_EXTRACT_TIMEOUT_SECS)),
            cors_allow_any_origin: false,
        }
    }
}

impl ServerConfig {
    /// Load from `.deckgen.toml` / the platform config file and the process
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(&config_file::load_config(), |key| std::env::var(key).ok())
    }

    /// Resolve from a parsed config file and an environment lookup.
    pub fn resolve(
        file: &ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let server = file.server.clone().unwrap_or_default();
        let extraction = file.extraction.clone().unwrap_or_default();

        let bind_str = env("DECKGEN_BIND")
            .or(server.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Bind {
                value: bind_str.clone(),
                reason: e.to_string(),
            }
        })?;

        let max_file_size = parse_env(&env, "DECKGEN_MAX_FILE_SIZE")?
            .or(extraction.max_file_size_bytes)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE);
        if max_file_size == 0 {
            return Err(ConfigError::Zero {
                key: "max_file_size_bytes",
            });
        }

        let max_pages = parse_env(&env, "DECKGEN_MAX_PAGES")?
            .map(|v: u64| v as usize)
            .or(extraction.max_pages)
            .unwrap_or(DEFAULT_MAX_PAGES);
        if max_pages == 0 {
            return Err(ConfigError::Zero { key: "max_pages" });
        }

        let timeout_secs = parse_env(&env, "DECKGEN_EXTRACT_TIMEOUT")?
            .or(extraction.timeout_secs)
            .unwrap_or(DEFAULT_EXTRACT_TIMEOUT_SECS);

        let cors_allow_any_origin = env("DECKGEN_CORS_ANY_ORIGIN")
            .map(|v| v == "true" || v == "1")
            .or(server.cors_allow_any_origin)
            .unwrap_or(false);

        Ok(Self {
            bind,
            limits: UploadLimits {
                max_file_size,
                max_pages,
            },
            extraction_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            cors_allow_any_origin,
        })
    }

    /// Request body limit: the file limit plus multipart overhead.
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.limits.max_file_size.saturating_add(MULTIPART_OVERHEAD))
            .unwrap_or(usize::MAX)
    }
}

fn parse_env(
    env: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match env(key) {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Number { key, value: v }),
    }
}
