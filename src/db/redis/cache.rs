use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

/// Namespaced cache keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Generated recipe drafts, keyed by a normalized ingredient token
    Generation(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Generation(token) => write!(f, "gen:{}", token),
        }
    }
}

/// Creates a Redis client for caching
///
/// Uses connection pooling via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

struct CacheWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Redis-backed cache with write-behind semantics
///
/// Reads hit Redis directly. Writes are handed to a background task over a
/// channel so cache population never delays an API response.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWrite>,
}

impl Cache {
    /// Creates the cache and spawns its background writer task
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(redis_client: Client) -> Self {
        let (write_tx, mut write_rx) = mpsc::unbounded_channel::<CacheWrite>();

        let client = redis_client.clone();
        tokio::spawn(async move {
            tracing::debug!("Cache writer task started");
            while let Some(write) = write_rx.recv().await {
                if let Err(e) = Self::write_to_redis(&client, write).await {
                    tracing::error!(error = %e, "Failed to write to Redis cache");
                }
            }
            tracing::debug!("Cache writer task stopped");
        });

        Self {
            redis_client,
            write_tx,
        }
    }

    async fn write_to_redis(client: &Client, write: CacheWrite) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(write.key, write.value, write.ttl).await?;
        Ok(())
    }

    /// Retrieves a cached value, or `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(format!("{}", key)).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a cache write and returns immediately
    ///
    /// The write happens on the background task; a failed write only loses
    /// the cache entry, never the response.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let write = CacheWrite {
            key: format!("{}", key),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(write) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_display_generation() {
        let key = CacheKey::Generation("chicken,garlic,lemon".to_string());
        assert_eq!(format!("{}", key), "gen:chicken,garlic,lemon");
    }

    #[tokio::test]
    async fn test_set_in_background_does_not_block_without_redis() {
        // Client::open only parses the URL; nothing listens on the port.
        // The queued write fails on the background task, the caller returns.
        let client = Client::open("redis://127.0.0.1:1").unwrap();
        let cache = Cache::new(client);

        let key = CacheKey::Generation("unreachable".to_string());
        cache.set_in_background(&key, &vec!["draft".to_string()], 60);
    }
}
