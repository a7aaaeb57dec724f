use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub environment: Environment,
    pub transport: TransportConfig,
    pub tenant: TenantConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub fallback_path: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Transport overrides
        if let Ok(v) = env::var("CONSOLE_API_BASE_URL") {
            self.transport.base_url = v;
        }
        if let Ok(v) = env::var("CONSOLE_REQUEST_TIMEOUT_SECS") {
            self.transport.request_timeout_secs =
                v.parse().unwrap_or(self.transport.request_timeout_secs);
        }
        if let Ok(v) = env::var("CONSOLE_DEBUG_LOGGING") {
            self.transport.debug_logging = v.parse().unwrap_or(self.transport.debug_logging);
        }

        // Tenant overrides
        if let Ok(v) = env::var("CONSOLE_TENANT_FALLBACK_PATH") {
            self.tenant.fallback_path = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            transport: TransportConfig {
                base_url: "http://localhost:8080/api/v1/".to_string(),
                request_timeout_secs: 30,
                debug_logging: true,
            },
            tenant: TenantConfig {
                fallback_path: "/no-tenant-provided".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            transport: TransportConfig {
                base_url: "https://api.staging.example.com/v1/".to_string(),
                request_timeout_secs: 15,
                debug_logging: true,
            },
            tenant: TenantConfig {
                fallback_path: "/no-tenant-provided".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            transport: TransportConfig {
                base_url: "https://api.example.com/v1/".to_string(),
                request_timeout_secs: 10,
                debug_logging: false,
            },
            tenant: TenantConfig {
                fallback_path: "/no-tenant-provided".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static ClientConfig {
    &CONFIG
}
