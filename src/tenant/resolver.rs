use std::sync::Arc;

use crate::tenant::{TenantContext, TenantStore, NO_TENANT_PATH, TENANT_STORAGE_KEY};

/// Derive a tenant identifier from a hostname.
///
/// `acme.example.com` and `acme.localhost` both resolve to `acme`; a bare
/// two-label production domain resolves to nothing (tenant-less, not an error).
pub fn parse_tenant(hostname: &str) -> Option<String> {
    let normalized = hostname.strip_prefix("www.").unwrap_or(hostname);
    let labels: Vec<&str> = normalized.split('.').collect();

    // tenant.localhost development addressing
    if normalized.contains("localhost") && labels.len() == 2 {
        return Some(labels[0].to_string());
    }

    // tenant.example.com production addressing
    if labels.len() > 2 {
        return Some(labels[0].to_string());
    }

    None
}

/// Outcome of resolving a navigation: either a tenant context for the route
/// to render under, or a redirect instruction for the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Context(TenantContext),
    Redirect(String),
}

/// Runs once per top-level navigation, before any route renders.
///
/// Persistence goes through an injected store rather than an ambient global,
/// so hosts decide where the identifier lives (browser storage, a config file,
/// an in-memory map in tests).
pub struct TenantResolver {
    store: Arc<dyn TenantStore>,
    fallback_path: String,
}

impl TenantResolver {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self {
            store,
            fallback_path: NO_TENANT_PATH.to_string(),
        }
    }

    pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = path.into();
        self
    }

    /// Resolve the tenant for the current navigation.
    ///
    /// An unresolvable tenant redirects to the fallback path unless that path
    /// is already active (the check that prevents redirect loops). The
    /// identifier is persisted only when resolution completes, including the
    /// absent sentinel on the fallback route itself.
    pub fn resolve(&self, hostname: &str, current_path: &str) -> Resolution {
        let tenant = parse_tenant(hostname);

        if tenant.is_none() && current_path != self.fallback_path {
            tracing::debug!(hostname, current_path, "no tenant in hostname, redirecting");
            return Resolution::Redirect(self.fallback_path.clone());
        }

        self.store.set_item(TENANT_STORAGE_KEY, tenant.as_deref());
        tracing::debug!(hostname, tenant = ?tenant, "tenant resolved");

        Resolution::Context(TenantContext { tenant_id: tenant })
    }

    /// Last persisted tenant identifier, if any
    pub fn stored_tenant(&self) -> Option<String> {
        self.store.get_item(TENANT_STORAGE_KEY)
    }
}
