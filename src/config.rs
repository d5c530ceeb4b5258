//! Runtime configuration: backend location and the status polling policy.
//!
//! Everything has a working default; environment variables override:
//! - `TTS_CONSOLE_BASE_URL` (default `http://127.0.0.1:5000`)
//! - `TTS_CONSOLE_HTTP_TIMEOUT_SECS` (default 30)
//! - `TTS_CONSOLE_PROXY_URL` (unset)
//! - `TTS_CONSOLE_POLL_POLICY` (`continuous` | `capped`, default `continuous`)

use crate::{Error, ErrorContext, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_STATUS_PATH: &str = "/status";
pub const DEFAULT_SYNTHESIS_PATH: &str = "/tts";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the backend lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: String,
    status_path: String,
    synthesis_path: String,
    pub timeout: Duration,
    pub proxy_url: Option<String>,
}

impl BackendConfig {
    /// Build a config for `base_url` with default paths and timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            status_path: DEFAULT_STATUS_PATH.to_string(),
            synthesis_path: DEFAULT_SYNTHESIS_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy_url: None,
        })
    }

    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var("TTS_CONSOLE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = env::var("TTS_CONSOLE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let mut config = Self::new(&base_url)?.with_timeout(Duration::from_secs(timeout_secs));
        if let Ok(proxy) = env::var("TTS_CONSOLE_PROXY_URL") {
            if !proxy.trim().is_empty() {
                config = config.with_proxy_url(proxy);
            }
        }
        Ok(config)
    }

    /// Point at another backend, keeping paths, timeout and proxy.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn with_status_path(mut self, path: impl Into<String>) -> Self {
        self.status_path = normalize_path(path.into());
        self
    }

    pub fn with_synthesis_path(mut self, path: impl Into<String>) -> Self {
        self.synthesis_path = normalize_path(path.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn status_url(&self) -> String {
        format!("{}{}", self.base_url, self.status_path)
    }

    pub fn synthesis_url(&self) -> String {
        format!("{}{}", self.base_url, self.synthesis_path)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            status_path: DEFAULT_STATUS_PATH.to_string(),
            synthesis_path: DEFAULT_SYNTHESIS_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy_url: None,
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|e| {
        Error::configuration_with_context(
            format!("Invalid backend URL '{}': {}", raw, e),
            ErrorContext::new()
                .with_field_path("backend.base_url")
                .with_source("backend_config"),
        )
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration_with_context(
            format!("Unsupported URL scheme '{}'", parsed.scheme()),
            ErrorContext::new()
                .with_field_path("backend.base_url")
                .with_details("expected http or https")
                .with_source("backend_config"),
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

/// How the controller keeps connectivity state fresh.
///
/// The two variants are complete, mutually exclusive behaviors: each fixes the
/// timer cadence *and* what happens after a failed synthesis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPolicy {
    /// Poll forever; re-check status after every synthesis failure.
    Continuous { interval: Duration },
    /// Poll `limit` times and stop; on synthesis failure, flag rate limiting
    /// instead of re-checking status.
    Capped { interval: Duration, limit: u32 },
}

impl PollPolicy {
    pub const CONTINUOUS_INTERVAL: Duration = Duration::from_secs(30);
    pub const CAPPED_INTERVAL: Duration = Duration::from_secs(300);
    pub const AUTO_CHECK_LIMIT: u32 = 3;

    pub fn continuous() -> Self {
        PollPolicy::Continuous {
            interval: Self::CONTINUOUS_INTERVAL,
        }
    }

    pub fn capped() -> Self {
        PollPolicy::Capped {
            interval: Self::CAPPED_INTERVAL,
            limit: Self::AUTO_CHECK_LIMIT,
        }
    }

    /// Read `TTS_CONSOLE_POLL_POLICY`; unset means [`PollPolicy::continuous`].
    pub fn from_env() -> Result<Self> {
        match env::var("TTS_CONSOLE_POLL_POLICY") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse(),
            _ => Ok(Self::default()),
        }
    }

    pub fn interval(&self) -> Duration {
        match self {
            PollPolicy::Continuous { interval } | PollPolicy::Capped { interval, .. } => *interval,
        }
    }

    /// Maximum number of automatic checks, if bounded.
    pub fn limit(&self) -> Option<u32> {
        match self {
            PollPolicy::Continuous { .. } => None,
            PollPolicy::Capped { limit, .. } => Some(*limit),
        }
    }

    pub fn rechecks_after_failure(&self) -> bool {
        matches!(self, PollPolicy::Continuous { .. })
    }

    pub fn detects_rate_limits(&self) -> bool {
        matches!(self, PollPolicy::Capped { .. })
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::continuous()
    }
}

impl FromStr for PollPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "continuous" => Ok(Self::continuous()),
            "capped" => Ok(Self::capped()),
            other => Err(Error::configuration_with_context(
                format!("Unknown poll policy '{}'", other),
                ErrorContext::new()
                    .with_field_path("poll_policy")
                    .with_details("expected 'continuous' or 'capped'"),
            )),
        }
    }
}

impl fmt::Display for PollPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollPolicy::Continuous { interval } => {
                write!(f, "continuous (every {}s)", interval.as_secs())
            }
            PollPolicy::Capped { interval, limit } => {
                write!(f, "capped (every {}s, {} checks)", interval.as_secs(), limit)
            }
        }
    }
}
