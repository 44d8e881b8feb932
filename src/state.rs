use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::pipeline::{Cancellation, Dispatcher, Outcome, Request};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, config: Arc<Config>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            config,
        }
    }

    /// Dispatches `request` on its own task.
    ///
    /// If the caller's future is dropped (client disconnect), the request is
    /// cancelled at its next I/O checkpoint; a commit already in flight still
    /// completes.
    pub async fn send<R: Request>(&self, request: R) -> Result<Outcome<R::Response>> {
        let cancel = Cancellation::new();
        let _cancel_on_drop = cancel.cancel_on_drop();
        let dispatcher = Arc::clone(&self.dispatcher);

        tokio::spawn(async move { dispatcher.dispatch(request, &cancel).await })
            .await
            .map_err(|e| {
                tracing::error!("Dispatch task failed: {:?}", e);
                AppError::InternalError
            })?
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup` so they can be supplied without
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| AppError::Config("PORT must be a port number".to_string()))?;

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                AppError::Config("DATABASE_MAX_CONNECTIONS must be a positive number".to_string())
            })?;

        let storage = match lookup("NOTICE_STORAGE").as_deref().unwrap_or("postgres") {
            "postgres" => StorageBackend::Postgres {
                database_url: lookup("DATABASE_URL").ok_or_else(|| {
                    AppError::Config("DATABASE_URL must be set".to_string())
                })?,
            },
            "memory" => StorageBackend::Memory,
            other => {
                return Err(AppError::Config(format!(
                    "NOTICE_STORAGE must be 'postgres' or 'memory', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            host,
            port,
            storage,
            max_connections,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_database_url() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/notices")]).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.max_connections, 5);
        assert_eq!(
            config.storage,
            StorageBackend::Postgres {
                database_url: "postgres://localhost/notices".to_string()
            }
        );
    }

    #[test]
    fn test_memory_storage_needs_no_database() {
        let config = config(&[("NOTICE_STORAGE", "memory"), ("PORT", "8080")]).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert!(matches!(config(&[]), Err(AppError::Config(_))));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let base = ("NOTICE_STORAGE", "memory");
        assert!(matches!(config(&[base, ("PORT", "http")]), Err(AppError::Config(_))));
        assert!(matches!(
            config(&[base, ("DATABASE_MAX_CONNECTIONS", "0")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config(&[("NOTICE_STORAGE", "sqlite")]),
            Err(AppError::Config(_))
        ));
    }
}
