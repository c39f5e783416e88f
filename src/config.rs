use std::{collections::HashMap, time::Duration};

use crate::{fetch::HeaderCodec, Result};

pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP settings for fetching playlists and segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Limit for a whole request including its body. `None` disables it,
    /// since a segment body may legitimately take long to stream.
    pub timeout: Option<Duration>,
    /// Maximum time between two chunks of a response body.
    pub read_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    /// Extra headers sent with every request.
    pub headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: concat!("hlsdl/", env!("CARGO_PKG_VERSION")).to_string(),
            headers: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `HLSDL_*` environment variables.
    ///
    /// - `HLSDL_TIMEOUT_SECS`: whole-request timeout, `0` disables it
    /// - `HLSDL_READ_TIMEOUT_SECS`
    /// - `HLSDL_CONNECT_TIMEOUT_SECS`
    /// - `HLSDL_USER_AGENT`
    /// - `HLSDL_HEADERS`: JSON object of extra headers
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(secs) = seconds(&lookup, "HLSDL_TIMEOUT_SECS") {
            self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(secs) = seconds(&lookup, "HLSDL_READ_TIMEOUT_SECS") {
            self.read_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = seconds(&lookup, "HLSDL_CONNECT_TIMEOUT_SECS") {
            self.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = lookup("HLSDL_USER_AGENT").filter(|a| !a.is_empty()) {
            self.user_agent = agent;
        }
        if let Some(encoded) = lookup("HLSDL_HEADERS").filter(|h| !h.is_empty()) {
            self.headers.extend(HeaderCodec::decode_json(&encoded)?);
        }
        Ok(self)
    }
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(secs) => Some(secs),
        Err(_) => {
            tracing::warn!("Ignoring {}: not a number of seconds: {:?}", key, value);
            None
        }
    }
}
