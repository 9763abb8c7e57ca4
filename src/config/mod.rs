use clap::Parser;
use serde::Serialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub pagination: PaginationConfig,
    pub bucketlists: BucketlistConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecurityConfig {
    /// HS256 signing secret. Never defaulted.
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationConfig {
    pub default_limit: i64,
    /// Exclusive upper bound for `limit`.
    pub max_limit: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketlistConfig {
    pub name_scope: NameScope,
}

/// Where bucketlist names have to be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NameScope {
    Global,
    Owner,
}

impl FromStr for NameScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(NameScope::Global),
            "owner" | "user" => Ok(NameScope::Owner),
            _ => Err(()),
        }
    }
}

/// Command-line overrides, applied on top of the environment.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Bucket list API server")]
pub struct Args {
    /// Host to bind to (overrides BUCKETLIST_API_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides BUCKETLIST_API_PORT / PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match var("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let jwt_secret = var("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let config = match environment {
            Environment::Production => Self::production(jwt_secret),
            Environment::Staging => Self::staging(jwt_secret),
            Environment::Development => Self::development(jwt_secret),
        };

        config.with_env_overrides(var)
    }

    fn with_env_overrides<F>(mut self, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = var("BUCKETLIST_API_HOST") {
            self.server.host = v;
        }
        if let Some(v) = var("BUCKETLIST_API_PORT").or_else(|| var("PORT")) {
            self.server.port = parse("BUCKETLIST_API_PORT", &v)?;
        }

        // Database overrides
        if let Some(v) = var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", &v)?;
        }

        // Security overrides
        if let Some(v) = var("TOKEN_TTL_SECS") {
            let ttl: i64 = parse("TOKEN_TTL_SECS", &v)?;
            if ttl <= 0 {
                return Err(ConfigError::Invalid { key: "TOKEN_TTL_SECS", value: v });
            }
            self.security.token_ttl_secs = ttl;
        }
        if let Some(v) = var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(v) = var("BUCKETLIST_NAME_SCOPE") {
            self.bucketlists.name_scope = v
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "BUCKETLIST_NAME_SCOPE", value: v.clone() })?;
        }

        Ok(self)
    }

    /// Command-line flags win over everything else.
    pub fn with_args(mut self, args: Args) -> Self {
        if let Some(host) = args.host {
            self.server.host = host;
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(url) = args.database_url {
            self.database.url = url;
        }
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn development(jwt_secret: String) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite://bucketlist.db?mode=rwc".to_string(),
                max_connections: 5,
            },
            security: SecurityConfig {
                jwt_secret,
                token_ttl_secs: 3600,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            pagination: PaginationConfig::default(),
            bucketlists: BucketlistConfig {
                name_scope: NameScope::Global,
            },
        }
    }

    fn staging(jwt_secret: String) -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite://bucketlist.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            security: SecurityConfig {
                jwt_secret,
                token_ttl_secs: 3600,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            pagination: PaginationConfig::default(),
            bucketlists: BucketlistConfig {
                name_scope: NameScope::Global,
            },
        }
    }

    fn production(jwt_secret: String) -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://bucketlist.db?mode=rwc".to_string(),
                max_connections: 20,
            },
            security: SecurityConfig {
                jwt_secret,
                token_ttl_secs: 3600,
                enable_cors: false,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            pagination: PaginationConfig::default(),
            bucketlists: BucketlistConfig {
                name_scope: NameScope::Global,
            },
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn requires_jwt_secret() {
        let err = AppConfig::from_vars(vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        let err = AppConfig::from_vars(vars(&[("JWT_SECRET", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_vars(vars(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.security.token_ttl_secs, 3600);
        assert_eq!(config.pagination.default_limit, 20);
        assert_eq!(config.pagination.max_limit, 100);
        assert_eq!(config.bucketlists.name_scope, NameScope::Global);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::from_vars(vars(&[("JWT_SECRET", "s3cret"), ("APP_ENV", "prod")])).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.security.enable_cors);
    }

    #[test]
    fn env_overrides_apply() {
        let config = AppConfig::from_vars(vars(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "4100"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("TOKEN_TTL_SECS", "360"),
            ("BUCKETLIST_NAME_SCOPE", "owner"),
            ("SECURITY_CORS_ORIGINS", "http://a.test, http://b.test"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 4100);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.security.token_ttl_secs, 360);
        assert_eq!(config.bucketlists.name_scope, NameScope::Owner);
        assert_eq!(config.security.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn rejects_bad_values() {
        let err = AppConfig::from_vars(vars(&[("JWT_SECRET", "s"), ("PORT", "not-a-port")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BUCKETLIST_API_PORT", .. }));

        let err = AppConfig::from_vars(vars(&[("JWT_SECRET", "s"), ("TOKEN_TTL_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TOKEN_TTL_SECS", .. }));

        let err = AppConfig::from_vars(vars(&[("JWT_SECRET", "s"), ("BUCKETLIST_NAME_SCOPE", "planet")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BUCKETLIST_NAME_SCOPE", .. }));
    }

    #[test]
    fn args_override_env() {
        let config = AppConfig::from_vars(vars(&[("JWT_SECRET", "s"), ("PORT", "4100")]))
            .unwrap()
            .with_args(Args {
                host: Some("127.0.0.1".to_string()),
                port: Some(5000),
                database_url: None,
            });
        assert_eq!(config.addr(), "127.0.0.1:5000");
    }
}
