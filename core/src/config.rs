//! Base endpoint configuration for `PostsClient`.
//!
//! # Design
//! The client never reads process-global state. Callers build a
//! `ClientConfig` explicitly, deserialize one with serde, or use `from_env`
//! to read the `SINATRA_*` variables the posts service deployments use.

use serde::Deserialize;
use url::Url;

use crate::error::ApiError;

pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_ROOT_PATH: &str = "/api/v1";

pub const HOST_VAR: &str = "SINATRA_HOST";
pub const PORT_VAR: &str = "SINATRA_PORT";
pub const SCHEME_VAR: &str = "SINATRA_SCHEME";

/// Scheme, authority and root path of the remote posts service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    pub host: String,
    pub port: u16,
    #[serde(default = "default_root_path")]
    pub root_path: String,
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_root_path() -> String {
    DEFAULT_ROOT_PATH.to_string()
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: default_scheme(),
            host: host.into(),
            port,
            root_path: default_root_path(),
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_root_path(mut self, root_path: impl Into<String>) -> Self {
        self.root_path = root_path.into();
        self
    }

    /// Read `SINATRA_HOST`, `SINATRA_PORT` and optionally `SINATRA_SCHEME`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with variables resolved through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let host = lookup(HOST_VAR)
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| ApiError::InvalidConfiguration(format!("{HOST_VAR} is not set")))?;
        let port = lookup(PORT_VAR)
            .ok_or_else(|| ApiError::InvalidConfiguration(format!("{PORT_VAR} is not set")))?;
        let port = port.trim().parse::<u16>().map_err(|e| {
            ApiError::InvalidConfiguration(format!("{PORT_VAR}={port:?} is not a port: {e}"))
        })?;

        let mut config = Self::new(host.trim(), port);
        if let Some(scheme) = lookup(SCHEME_VAR).filter(|s| !s.trim().is_empty()) {
            config.scheme = scheme.trim().to_string();
        }
        Ok(config)
    }

    /// Resolve the configuration to the base URL every request starts from.
    pub fn base_url(&self) -> Result<Url, ApiError> {
        let scheme = self.scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ApiError::InvalidConfiguration(format!(
                "unsupported scheme {:?}",
                self.scheme
            )));
        }
        if self.host.trim().is_empty() {
            return Err(ApiError::InvalidConfiguration("host is empty".to_string()));
        }

        // IPv6 literals need brackets before a port can follow.
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let authority = format!("{scheme}://{host}:{}", self.port);
        let mut url = Url::parse(&authority).map_err(|e| {
            ApiError::InvalidConfiguration(format!("{authority:?} is not a valid authority: {e}"))
        })?;

        // A host smuggling in a path, query or credentials is not an authority.
        if url.path() != "/"
            || url.query().is_some()
            || url.fragment().is_some()
            || !url.username().is_empty()
            || url.cannot_be_a_base()
        {
            return Err(ApiError::InvalidConfiguration(format!(
                "{:?} is not a valid host",
                self.host
            )));
        }

        url.set_path(&normalize_root(&self.root_path));
        Ok(url)
    }
}

fn normalize_root(root: &str) -> String {
    let trimmed = root.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}
