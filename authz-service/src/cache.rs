use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use common_auth::{Identity, RoleSet};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Read-through/write-through acceleration in front of the role store.
///
/// Every operation fails open: a backend error is logged and reported as
/// a miss or no-op, never surfaced. A broken cache must leave the system
/// exactly as available as no cache at all.
#[async_trait]
pub trait RoleCache: Send + Sync {
    /// `None` covers never-cached, TTL-expired, and backend failure alike.
    async fn get(&self, identity: &Identity) -> Option<RoleSet>;
    /// Replaces any existing entry wholesale; best-effort.
    async fn set(&self, identity: &Identity, roles: &RoleSet);
    /// Returns whether an entry existed.
    async fn invalidate(&self, identity: &Identity) -> bool;
    async fn health_check(&self) -> bool;
}

// ---------------- Redis Implementation ----------------

pub struct RedisRoleCache {
    manager: ConnectionManager,
    ttl: Duration,
    prefix: String,
}

impl RedisRoleCache {
    pub async fn connect(redis_url: &str, ttl: Duration, prefix: String) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;
        let manager = ConnectionManager::new(client)
            .await
            .context("Failed to create Redis connection manager")?;
        info!(ttl_secs = ttl.as_secs(), %prefix, "role cache connected");
        Ok(Self { manager, ttl, prefix })
    }

    // Namespaced key keeps role entries clear of unrelated data in a
    // shared Redis, e.g. `user:platform-roles:a@example.com`.
    fn key_for(&self, identity: &Identity) -> String {
        format!("{}:{}", self.prefix, identity.as_str())
    }
}

#[async_trait]
impl RoleCache for RedisRoleCache {
    async fn get(&self, identity: &Identity) -> Option<RoleSet> {
        let key = self.key_for(identity);
        let mut conn = self.manager.clone();
        let cached: Option<String> = match conn.get(&key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(%identity, %err, "cache read failed; treating as miss");
                return None;
            }
        };
        let raw = cached?;
        match serde_json::from_str::<RoleSet>(&raw) {
            Ok(roles) => {
                debug!(%identity, "cache hit");
                Some(roles)
            }
            Err(err) => {
                warn!(%identity, %err, "cache entry undecodable; treating as miss");
                None
            }
        }
    }

    async fn set(&self, identity: &Identity, roles: &RoleSet) {
        let key = self.key_for(identity);
        let value = match serde_json::to_string(roles) {
            Ok(value) => value,
            Err(err) => {
                warn!(%identity, %err, "failed to encode roles for cache");
                return;
            }
        };
        let mut conn = self.manager.clone();
        let result: redis::RedisResult<()> = conn.set_ex(&key, value, self.ttl.as_secs()).await;
        if let Err(err) = result {
            warn!(%identity, %err, "cache write failed; continuing without cache");
        }
    }

    async fn invalidate(&self, identity: &Identity) -> bool {
        let key = self.key_for(identity);
        let mut conn = self.manager.clone();
        match conn.del::<_, i64>(&key).await {
            Ok(deleted) => deleted > 0,
            Err(err) => {
                warn!(%identity, %err, "cache invalidation failed");
                false
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.manager.clone();
        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(_) => true,
            Err(err) => {
                warn!(%err, "cache health check failed");
                false
            }
        }
    }
}

// ---------------- In-Memory Implementation (tests, cacheless dev) ----------------

pub struct InMemoryRoleCache {
    inner: Arc<Mutex<HashMap<String, (RoleSet, Instant)>>>,
    ttl: Duration,
}

impl InMemoryRoleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }
}

#[async_trait]
impl RoleCache for InMemoryRoleCache {
    async fn get(&self, identity: &Identity) -> Option<RoleSet> {
        let mut guard = self.inner.lock().await;
        match guard.get(identity.as_str()) {
            Some((roles, inserted_at)) if inserted_at.elapsed() < self.ttl => Some(roles.clone()),
            Some(_) => {
                guard.remove(identity.as_str());
                None
            }
            None => None,
        }
    }

    async fn set(&self, identity: &Identity, roles: &RoleSet) {
        let mut guard = self.inner.lock().await;
        guard.insert(identity.as_str().to_owned(), (roles.clone(), Instant::now()));
    }

    async fn invalidate(&self, identity: &Identity) -> bool {
        let mut guard = self.inner.lock().await;
        guard.remove(identity.as_str()).is_some()
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(names: &[&str]) -> RoleSet {
        names.iter().copied().collect()
    }

    #[tokio::test]
    async fn entry_expires_after_ttl() {
        let cache = InMemoryRoleCache::new(Duration::from_millis(20));
        let id = Identity::normalize("a@example.com");
        cache.set(&id, &roles(&["user"])).await;
        assert!(cache.get(&id).await.is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(&id).await.is_none(), "expired entry must read as a miss");
    }

    #[tokio::test]
    async fn set_replaces_existing_entry_wholesale() {
        let cache = InMemoryRoleCache::new(Duration::from_secs(60));
        let id = Identity::normalize("a@example.com");
        cache.set(&id, &roles(&["user"])).await;
        cache.set(&id, &roles(&["user", "admin"])).await;
        let cached = cache.get(&id).await.expect("entry");
        assert_eq!(cached, roles(&["user", "admin"]));
    }

    #[tokio::test]
    async fn invalidate_reports_prior_presence() {
        let cache = InMemoryRoleCache::new(Duration::from_secs(60));
        let id = Identity::normalize("a@example.com");
        assert!(!cache.invalidate(&id).await);
        cache.set(&id, &roles(&["user"])).await;
        assert!(cache.invalidate(&id).await);
        assert!(cache.get(&id).await.is_none());
    }
}
