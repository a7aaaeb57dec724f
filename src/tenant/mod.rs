// Tenant scoping: every deployment customer lives on its own subdomain, and
// the resolver gates navigation on being able to name that customer.
pub mod resolver;

pub use resolver::{parse_tenant, Resolution, TenantResolver};

use serde::{Deserialize, Serialize};

/// Durable storage key the resolved tenant identifier is persisted under
pub const TENANT_STORAGE_KEY: &str = "tenantId";

/// Route shown when no tenant can be derived from the hostname
pub const NO_TENANT_PATH: &str = "/no-tenant-provided";

/// Resolved tenant scope for one navigation. `tenant_id` is `None` on the
/// fallback route, where the console renders tenant-less.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub tenant_id: Option<String>,
}

/// Port for the durable key-value store the tenant identifier is persisted to
pub trait TenantStore: Send + Sync {
    /// Persist a value under a key; `None` stores the absent sentinel
    fn set_item(&self, key: &str, value: Option<&str>);

    fn get_item(&self, key: &str) -> Option<String>;
}
