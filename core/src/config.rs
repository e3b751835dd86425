//! Client and OAuth configuration.
//!
//! `ClientConfig` drives the HTTP layer; `AuthOptions` is consumed only by the
//! OAuth1 handshake. Both can be built from defaults, `with_*` builders,
//! environment variables, or the dynamic `get_option` / `set_option` surface
//! keyed by option name.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TrelloError};

pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/";
pub const DEFAULT_USER_AGENT: &str = concat!("trello-core/", env!("CARGO_PKG_VERSION"));
pub const SUPPORTED_API_VERSIONS: &[u32] = &[1];

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service root, without the version segment.
    pub base_url: String,
    pub user_agent: String,
    /// Global per-request deadline, serialized as whole seconds.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Advisory only; nothing throttles requests.
    pub api_limit: u32,
    pub api_version: u32,
    /// Accepted for compatibility; no cache is kept.
    pub cache_dir: Option<PathBuf>,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            api_limit: 5000,
            api_version: 1,
            cache_dir: None,
        }
    }
}

impl ClientConfig {
    /// Read overrides from the environment, falling back to defaults.
    ///
    /// - `TRELLO_BASE_URL`
    /// - `TRELLO_API_VERSION`
    /// - `TRELLO_TIMEOUT_SECS`
    /// - `TRELLO_USER_AGENT`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = env::var("TRELLO_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(version) = env::var("TRELLO_API_VERSION") {
            config.api_version = version.parse().map_err(|_| {
                TrelloError::InvalidArgument(format!("TRELLO_API_VERSION is not a number: {version}"))
            })?;
        }
        if let Some(secs) = env::var("TRELLO_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(agent) = env::var("TRELLO_USER_AGENT") {
            config.user_agent = agent;
        }
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_api_version(mut self, version: u32) -> Self {
        self.api_version = version;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_API_VERSIONS.contains(&self.api_version) {
            return Err(TrelloError::InvalidArgument(format!(
                "Invalid API version \"{}\", allowed versions are {:?}",
                self.api_version, SUPPORTED_API_VERSIONS
            )));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(TrelloError::InvalidArgument(format!(
                "base_url must be an http(s) URL, got \"{}\"",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Versioned API root, always ending in `/`.
    pub fn api_url(&self) -> String {
        format!("{}/{}/", self.base_url.trim_end_matches('/'), self.api_version)
    }

    /// Read an option by name.
    pub fn get_option(&self, name: &str) -> Result<Value> {
        let all = serde_json::to_value(self)
            .map_err(|e| TrelloError::InvalidArgument(e.to_string()))?;
        all.get(name)
            .cloned()
            .ok_or_else(|| unknown_option(name))
    }

    /// Set an option by name. The result is validated before it is kept.
    pub fn set_option(&mut self, name: &str, value: Value) -> Result<()> {
        let updated = set_field(self, name, value)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

/// Options for the OAuth1 handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthOptions {
    /// Application key (OAuth consumer key).
    pub identifier: Option<String>,
    /// Application secret (OAuth consumer secret).
    pub secret: Option<String>,
    pub callback_uri: Option<String>,
    /// Application name shown on the authorization page.
    pub name: String,
    pub expiration: String,
    pub scope: String,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            identifier: None,
            secret: None,
            callback_uri: None,
            name: "trello-core".to_string(),
            expiration: "never".to_string(),
            scope: "read,write".to_string(),
        }
    }
}

impl AuthOptions {
    /// `TRELLO_API_KEY`, `TRELLO_API_SECRET` and `TRELLO_CALLBACK_URI`.
    pub fn from_env() -> Self {
        Self {
            identifier: env::var("TRELLO_API_KEY").ok(),
            secret: env::var("TRELLO_API_SECRET").ok(),
            callback_uri: env::var("TRELLO_CALLBACK_URI").ok(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self.secret = Some(secret.into());
        self
    }

    #[must_use]
    pub fn with_callback_uri(mut self, uri: impl Into<String>) -> Self {
        self.callback_uri = Some(uri.into());
        self
    }

    pub fn get_option(&self, name: &str) -> Result<Value> {
        let all = serde_json::to_value(self)
            .map_err(|e| TrelloError::InvalidArgument(e.to_string()))?;
        all.get(name)
            .cloned()
            .ok_or_else(|| unknown_option(name))
    }

    pub fn set_option(&mut self, name: &str, value: Value) -> Result<()> {
        *self = set_field(self, name, value)?;
        Ok(())
    }
}

/// Round-trip `target` through JSON with one field replaced.
fn set_field<T>(target: &T, name: &str, value: Value) -> Result<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let mut all = serde_json::to_value(target)
        .map_err(|e| TrelloError::InvalidArgument(e.to_string()))?;
    let slot = all
        .get_mut(name)
        .ok_or_else(|| unknown_option(name))?;
    *slot = value;
    serde_json::from_value(all)
        .map_err(|e| TrelloError::InvalidArgument(format!("Invalid value for option \"{name}\": {e}")))
}

fn unknown_option(name: &str) -> TrelloError {
    TrelloError::InvalidArgument(format!("Unknown option \"{name}\""))
}
