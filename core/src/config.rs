//! Client configuration.
//!
//! Each `NetClient` owns its `NetConfig`; there is no process-wide state, so
//! independently configured clients can coexist.

use serde::{Deserialize, Deserializer, Serialize};

use crate::headers::HeaderSet;

pub const DOMAIN_ENV: &str = "NETAPI_DEFAULT_DOMAIN";
pub const CACHE_NAME_ENV: &str = "NETAPI_CACHE_NAME";

/// Cache bucket used by buffer fetches unless configured otherwise.
pub const DEFAULT_CACHE_NAME: &str = "netapi-buffers";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Base URL prefixed to relative endpoints, stored without a trailing `/`.
    #[serde(deserialize_with = "deserialize_domain")]
    default_domain: String,
    /// Headers sent on every call, under any per-call headers.
    pub default_headers: HeaderSet,
    /// Name of the cache bucket opened by buffer fetches.
    pub cache_name: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            default_domain: String::new(),
            default_headers: HeaderSet::new(),
            cache_name: DEFAULT_CACHE_NAME.to_string(),
        }
    }
}

impl NetConfig {
    pub fn new(default_domain: &str) -> Self {
        Self {
            default_domain: normalize_domain(default_domain),
            ..Self::default()
        }
    }

    /// Read `NETAPI_DEFAULT_DOMAIN` and `NETAPI_CACHE_NAME`; unset variables
    /// fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = NetConfig::default();
        if let Ok(domain) = std::env::var(DOMAIN_ENV) {
            config.default_domain = normalize_domain(&domain);
        }
        if let Ok(name) = std::env::var(CACHE_NAME_ENV) {
            config.cache_name = name;
        }
        config
    }

    pub fn default_domain(&self) -> &str {
        &self.default_domain
    }

    pub fn with_default_domain(mut self, domain: &str) -> Self {
        self.default_domain = normalize_domain(domain);
        self
    }

    pub fn with_default_headers(mut self, headers: HeaderSet) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }
}

fn normalize_domain(domain: &str) -> String {
    domain.trim_end_matches('/').to_string()
}

fn deserialize_domain<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let domain = String::deserialize(deserializer)?;
    Ok(normalize_domain(&domain))
}
