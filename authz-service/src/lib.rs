pub mod app;
pub mod cache;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod repository;
pub mod resolver;

pub use app::{router, AppState};
pub use cache::{InMemoryRoleCache, RedisRoleCache, RoleCache};
pub use config::AuthzConfig;
pub use metrics::AuthzMetrics;
pub use repository::{RepositoryError, RoleLookup, RoleRepository, SeedRoleRepository};
pub use resolver::RoleResolver;
