use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Product types under a clothing class, optionally narrowed by gender
    ProductTypes { clothing_class: String, gender: String },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::ProductTypes {
                clothing_class,
                gender,
            } => write!(
                f,
                "subcats:{}:{}",
                clothing_class.trim().to_lowercase(),
                gender
            ),
        }
    }
}

/// Creates a Redis client for caching
///
/// Only opens the client; connections are made lazily per operation.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// A pending write handed to the background writer
struct PendingWrite {
    key: String,
    payload: String,
    ttl_secs: u64,
}

/// Read-through Redis cache with writes deferred to a background task
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    writes: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the background writer once queued writes are flushed
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer and waits until queued writes have been attempted
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown requested");

        if let Err(e) = self.writer.await {
            tracing::error!(error = %e, "Cache writer task failed");
        }
    }
}

impl Cache {
    /// Creates the cache and spawns its writer task
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (writes, pending) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let writer = tokio::spawn(async move {
            Self::run_writer(client, pending, shutdown_rx).await;
        });

        (
            Self {
                redis_client,
                writes,
            },
            CacheWriterHandle {
                shutdown_tx,
                writer,
            },
        )
    }

    async fn run_writer(
        client: Client,
        mut pending: mpsc::UnboundedReceiver<PendingWrite>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::debug!("Cache writer started");

        loop {
            tokio::select! {
                Some(write) = pending.recv() => {
                    let key = write.key.clone();
                    if let Err(e) = Self::write(&client, write).await {
                        tracing::warn!(error = %e, key = %key, "Cache write failed");
                    }
                }
                _ = shutdown_rx.recv() => {
                    pending.close();
                    while let Some(write) = pending.recv().await {
                        if let Err(e) = Self::write(&client, write).await {
                            tracing::warn!(error = %e, "Cache write failed during shutdown");
                        }
                    }
                    tracing::info!("Cache writer stopped");
                    break;
                }
            }
        }
    }

    async fn write(client: &Client, write: PendingWrite) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(write.key, write.payload, write.ttl_secs).await?;
        Ok(())
    }

    /// Reads and deserializes a cached value, `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        cached
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })
            })
            .transpose()
    }

    /// Queues a value for writing without waiting on Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl_secs: u64) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            payload,
            ttl_secs,
        };

        if self.writes.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer is gone, dropping write");
        }
    }
}
