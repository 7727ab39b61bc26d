//! Redis storage backend
//!
//! Collections are stored as plain string values under the configured key
//! prefix, without expiry. Calls are blocking; async callers reach the
//! backend through `LocalStore::run_blocking`.

use std::sync::Mutex;
use redis::{Client, Commands, Connection};
use tracing::{debug, warn};
use crate::config::RedisConfig;
use crate::utils::errors::{ShopDeskError, Result};
use super::KeyValueStore;

pub struct RedisStore {
    client: Client,
    config: RedisConfig,
    connection: Mutex<Option<Connection>>,
}

impl RedisStore {
    /// Create a new Redis store; the connection is opened on first use
    pub fn new(config: RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        Ok(Self {
            client,
            config,
            connection: Mutex::new(None),
        })
    }

    /// Test Redis connection
    pub fn test_connection(&self) -> Result<()> {
        self.with_connection(|conn| redis::cmd("PING").query::<String>(conn))?;
        Ok(())
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.config.prefix, key)
    }

    /// Run one command on the shared connection.
    ///
    /// A connection that fails with an I/O error is dropped and reopened on
    /// the next call.
    fn with_connection<T>(&self, command: impl FnOnce(&mut Connection) -> redis::RedisResult<T>) -> Result<T> {
        let mut slot = self.connection.lock()
            .map_err(|_| ShopDeskError::Storage("redis connection lock poisoned".to_string()))?;

        if slot.is_none() {
            *slot = Some(self.client.get_connection()?);
        }
        let result = match slot.as_mut() {
            Some(conn) => command(conn),
            None => return Err(ShopDeskError::Storage("redis connection unavailable".to_string())),
        };

        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_io_error() || e.is_connection_dropped() {
                    warn!(error = %e, "Redis connection lost, reconnecting on next call");
                    *slot = None;
                }
                Err(e.into())
            }
        }
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let full_key = self.full_key(key);
        let value: Option<String> = self.with_connection(|conn| conn.get(&full_key))?;
        debug!(key = %full_key, found = value.is_some(), "Redis GET");
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let full_key = self.full_key(key);
        self.with_connection(|conn| conn.set::<_, _, ()>(&full_key, value))?;
        debug!(key = %full_key, bytes = value.len(), "Redis SET");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let full_key = self.full_key(key);
        let deleted: u32 = self.with_connection(|conn| conn.del(&full_key))?;
        debug!(key = %full_key, deleted = deleted, "Redis DEL");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> RedisConfig {
        RedisConfig {
            url: "redis://localhost:6379".to_string(),
            prefix: "test_shopdesk:".to_string(),
        }
    }

    #[test]
    fn test_keys_carry_prefix() {
        let store = RedisStore::new(create_test_config()).unwrap();
        assert_eq!(store.full_key("products"), "test_shopdesk:products");
    }

    #[test]
    fn test_rejects_malformed_url() {
        let config = RedisConfig {
            url: "not-a-redis-url".to_string(),
            prefix: String::new(),
        };
        assert!(RedisStore::new(config).is_err());
    }
}
