use std::net::SocketAddr;
use std::sync::Arc;

use authz_service::{
    router, AppState, AuthzConfig, AuthzMetrics, RedisRoleCache, RoleCache, RoleResolver,
    SeedRoleRepository,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = AuthzConfig::from_env()?;

    let cache: Option<Arc<dyn RoleCache>> = match &config.redis_url {
        Some(url) => {
            match RedisRoleCache::connect(url, config.cache_ttl, config.cache_prefix.clone()).await
            {
                Ok(cache) => Some(Arc::new(cache)),
                Err(err) => {
                    // Cache is an optimization; start degraded rather than not at all.
                    warn!(%err, "failed to connect role cache; continuing without cache");
                    None
                }
            }
        }
        None => {
            info!("REDIS_URL not configured; role caching disabled");
            None
        }
    };

    let repository = Arc::new(SeedRoleRepository::with_default_seed());
    info!(identities = repository.len(), "role store seeded");

    let metrics = Arc::new(AuthzMetrics::new()?);
    let resolver = Arc::new(RoleResolver::new(
        cache,
        repository,
        config.lookup_timeout,
        metrics.clone(),
    ));

    let app = router(AppState { resolver, metrics });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting authorization service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
