use std::sync::Arc;
use std::time::Duration;

use common_auth::{Identity, RoleSet, ROLE_GUEST, ROLE_UNVERIFIED};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::cache::RoleCache;
use crate::metrics::AuthzMetrics;
use crate::repository::{RepositoryError, RoleLookup, RoleRepository};

/// Cache-aside role resolution: cache first, role store on miss,
/// write-through on success, sentinel fallbacks for unknown and
/// anonymous callers.
///
/// Owns the cache and repository handles; downstream services only ever
/// see the resolved role set.
pub struct RoleResolver {
    cache: Option<Arc<dyn RoleCache>>,
    repository: Arc<dyn RoleRepository>,
    op_timeout: Duration,
    metrics: Arc<AuthzMetrics>,
}

impl RoleResolver {
    pub fn new(
        cache: Option<Arc<dyn RoleCache>>,
        repository: Arc<dyn RoleRepository>,
        op_timeout: Duration,
        metrics: Arc<AuthzMetrics>,
    ) -> Self {
        Self { cache, repository, op_timeout, metrics }
    }

    /// Resolves the role set for a known identity.
    ///
    /// The only error is `Unavailable`: an absent identity resolves to
    /// the `unverified` sentinel, which is never cached so a role grant
    /// becomes visible on the very next lookup instead of after TTL.
    pub async fn resolve(&self, identity: &Identity) -> Result<RoleSet, RepositoryError> {
        if let Some(cache) = &self.cache {
            // A slow cache counts as a miss; it must never delay the
            // request beyond the budget.
            match timeout(self.op_timeout, cache.get(identity)).await {
                Ok(Some(roles)) => {
                    debug!(%identity, "resolved from cache");
                    self.metrics.cache_event("hit");
                    return Ok(roles);
                }
                Ok(None) => self.metrics.cache_event("miss"),
                Err(_) => {
                    warn!(%identity, "cache read timed out; treating as miss");
                    self.metrics.cache_event("miss");
                }
            }
        }

        let outcome = match timeout(self.op_timeout, self.repository.lookup(identity)).await {
            Ok(result) => result,
            Err(_) => Err(RepositoryError::Unavailable(format!(
                "lookup timed out after {:?}",
                self.op_timeout
            ))),
        };

        match outcome {
            Ok(RoleLookup::Found(roles)) => {
                self.metrics.repository_lookup("found");
                if let Some(cache) = &self.cache {
                    // Best effort; a failed or slow write never blocks
                    // the response.
                    let _ = timeout(self.op_timeout, cache.set(identity, &roles)).await;
                }
                Ok(roles)
            }
            Ok(RoleLookup::NotFound) => {
                info!(%identity, "identity has no stored roles; assigning sentinel");
                self.metrics.repository_lookup("not_found");
                Ok(RoleSet::single(ROLE_UNVERIFIED))
            }
            Err(err) => {
                // Cannot tell "no such identity" from "store is down";
                // propagate so the caller can fail closed.
                self.metrics.repository_lookup("unavailable");
                Err(err)
            }
        }
    }

    /// Entry point covering anonymous callers: no credential means the
    /// `guest` sentinel with zero cache or repository traffic.
    pub async fn resolve_principal(
        &self,
        identity: Option<&Identity>,
    ) -> Result<RoleSet, RepositoryError> {
        match identity {
            Some(identity) if !identity.is_empty() => self.resolve(identity).await,
            _ => Ok(RoleSet::single(ROLE_GUEST)),
        }
    }

    pub async fn invalidate(&self, identity: &Identity) -> bool {
        match &self.cache {
            Some(cache) => cache.invalidate(identity).await,
            None => false,
        }
    }

    /// `None` when no cache is configured.
    pub async fn cache_health(&self) -> Option<bool> {
        match &self.cache {
            Some(cache) => Some(cache.health_check().await),
            None => None,
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }
}
