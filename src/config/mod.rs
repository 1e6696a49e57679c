use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub paging: PagingConfig,
    pub security: SecurityConfig,
    pub access: AccessConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
    pub enable_audit_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Identity used for requests that carry no bearer token
    pub default_user_email: String,
    /// Progeny readable by everyone at the public access level
    pub public_progeny_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub push_gateway_url: Option<String>,
    pub push_gateway_key: Option<String>,
    pub icon_url: String,
    pub web_base_url: String,
    /// Run audit/notification observers on a spawned task instead of inline
    pub detach_async_observers: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("KINAUNA_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "memory" => DatabaseBackend::Memory,
                _ => DatabaseBackend::Postgres,
            };
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // Paging overrides
        if let Ok(v) = env::var("PAGING_DEFAULT_PAGE_SIZE") {
            self.paging.default_page_size = v.parse().unwrap_or(self.paging.default_page_size);
        }
        if let Ok(v) = env::var("PAGING_MAX_PAGE_SIZE") {
            self.paging.max_page_size = v.parse().unwrap_or(self.paging.max_page_size);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_AUDIT_LOGGING") {
            self.security.enable_audit_logging = v.parse().unwrap_or(self.security.enable_audit_logging);
        }

        // Access overrides
        if let Ok(v) = env::var("KINAUNA_DEFAULT_USER") {
            self.access.default_user_email = v.trim().to_lowercase();
        }
        if let Ok(v) = env::var("KINAUNA_PUBLIC_PROGENY_ID") {
            self.access.public_progeny_id = v.parse().unwrap_or(self.access.public_progeny_id);
        }

        // Notification overrides
        if let Ok(v) = env::var("PUSH_GATEWAY_URL") {
            self.notifications.push_gateway_url = Some(v);
        }
        if let Ok(v) = env::var("PUSH_GATEWAY_KEY") {
            self.notifications.push_gateway_key = Some(v);
        }
        if let Ok(v) = env::var("NOTIFICATION_ICON_URL") {
            self.notifications.icon_url = v;
        }
        if let Ok(v) = env::var("WEB_BASE_URL") {
            self.notifications.web_base_url = v;
        }
        if let Ok(v) = env::var("NOTIFICATIONS_DETACH") {
            self.notifications.detach_async_observers = v.parse().unwrap_or(self.notifications.detach_async_observers);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                backend: DatabaseBackend::Postgres,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            paging: PagingConfig {
                default_page_size: 8,
                max_page_size: 100,
            },
            security: SecurityConfig {
                jwt_secret: "kinauna-development-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                enable_audit_logging: true,
            },
            access: AccessConfig {
                default_user_email: "testuser@niviaq.com".to_string(),
                public_progeny_id: 2,
            },
            notifications: NotificationConfig {
                push_gateway_url: None,
                push_gateway_key: None,
                icon_url: "https://www.kinauna.com/images/kinaunalogo48x48.png".to_string(),
                web_base_url: "http://localhost:5173".to_string(),
                detach_async_observers: false,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 8080,
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                backend: DatabaseBackend::Postgres,
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            paging: PagingConfig {
                default_page_size: 8,
                max_page_size: 100,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                cors_origins: vec!["https://staging.kinauna.com".to_string()],
                enable_audit_logging: true,
            },
            access: AccessConfig {
                default_user_email: "testuser@niviaq.com".to_string(),
                public_progeny_id: 2,
            },
            notifications: NotificationConfig {
                push_gateway_url: None,
                push_gateway_key: None,
                icon_url: "https://www.kinauna.com/images/kinaunalogo48x48.png".to_string(),
                web_base_url: "https://staging.kinauna.com".to_string(),
                detach_async_observers: true,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 8080,
                enable_request_logging: false,
            },
            database: DatabaseConfig {
                backend: DatabaseBackend::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            paging: PagingConfig {
                default_page_size: 8,
                max_page_size: 50,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                cors_origins: vec!["https://web.kinauna.com".to_string()],
                enable_audit_logging: true,
            },
            access: AccessConfig {
                default_user_email: "testuser@niviaq.com".to_string(),
                public_progeny_id: 2,
            },
            notifications: NotificationConfig {
                push_gateway_url: None,
                push_gateway_key: None,
                icon_url: "https://www.kinauna.com/images/kinaunalogo48x48.png".to_string(),
                web_base_url: "https://web.kinauna.com".to_string(),
                detach_async_observers: true,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.database.backend, DatabaseBackend::Postgres);
        assert!(!config.security.jwt_secret.is_empty());
        assert!(!config.notifications.detach_async_observers);
        assert_eq!(config.paging.default_page_size, 8);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty(), "production must supply JWT_SECRET");
        assert!(config.notifications.detach_async_observers);
        assert_eq!(config.paging.max_page_size, 50);
    }
}
