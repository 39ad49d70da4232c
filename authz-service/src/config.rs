use std::env;
use std::time::Duration;

use anyhow::Result;

#[derive(Debug, Clone)]
pub struct AuthzConfig {
    /// Unset means the service runs without a cache.
    pub redis_url: Option<String>,
    pub cache_ttl: Duration,
    pub cache_prefix: String,
    /// Budget for a single cache or repository call.
    pub lookup_timeout: Duration,
    pub port: u16,
}

impl AuthzConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Variables arrive through a lookup so tests never have to mutate
    // process env.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let redis_url = get("REDIS_URL").filter(|value| !value.trim().is_empty());
        let cache_ttl_secs = get("AUTHZ_CACHE_TTL_SECONDS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(300);
        let cache_prefix = get("AUTHZ_CACHE_PREFIX")
            .unwrap_or_else(|| "user:platform-roles".to_string());
        let lookup_timeout_ms = get("AUTHZ_LOOKUP_TIMEOUT_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(500);
        let port = get("SERVICE_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(9000);

        Ok(Self {
            redis_url,
            cache_ttl: Duration::from_secs(cache_ttl_secs.max(1)),
            cache_prefix,
            lookup_timeout: Duration::from_millis(lookup_timeout_ms.max(1)),
            port,
        })
    }
}
