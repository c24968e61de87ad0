use crate::cache::store::{ChannelStore, StoreError};
use crate::error::{NotifyError, Result};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use std::time::Duration;

/// Redis-backed channel store.
///
/// Holds at most one connection for the whole run. When the server could not
/// be reached at startup every operation reports [`StoreError::Unavailable`].
pub struct RedisStore {
    connection: Option<MultiplexedConnection>,
}

impl RedisStore {
    /// Connect to `url`, giving up after `timeout`.
    ///
    /// A malformed URL is a configuration error. An unreachable server is not:
    /// the store is returned disconnected and the run carries on without it.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| NotifyError::Config(format!("Invalid REDIS_HOST: {}", e)))?;

        let config = redis::AsyncConnectionConfig::new()
            .set_connection_timeout(timeout)
            .set_response_timeout(timeout);

        match client
            .get_multiplexed_async_connection_with_config(&config)
            .await
        {
            Ok(connection) => {
                tracing::info!("Connected to channel cache");
                Ok(Self {
                    connection: Some(connection),
                })
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    timeout_ms = timeout.as_millis() as u64,
                    "Channel cache unreachable, continuing without it"
                );
                Ok(Self::disconnected())
            }
        }
    }

    pub fn disconnected() -> Self {
        Self { connection: None }
    }

    fn connection(&self) -> std::result::Result<MultiplexedConnection, StoreError> {
        // Multiplexed connections are cheap handles onto one socket
        self.connection
            .clone()
            .ok_or_else(|| StoreError::Unavailable("not connected".to_string()))
    }
}

impl ChannelStore for RedisStore {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        let mut connection = self.connection()?;
        let value: Option<String> = connection.get(key).await.map_err(classify)?;
        Ok(value)
    }

    async fn put_pair(
        &self,
        first: (&str, &str),
        second: (&str, &str),
        ttl: Duration,
    ) -> std::result::Result<(), StoreError> {
        let mut connection = self.connection()?;
        let seconds = ttl.as_secs();

        let _: () = redis::pipe()
            .atomic()
            .set_ex(first.0, first.1, seconds)
            .ignore()
            .set_ex(second.0, second.1, seconds)
            .ignore()
            .query_async(&mut connection)
            .await
            .map_err(classify)?;

        Ok(())
    }
}

fn classify(e: redis::RedisError) -> StoreError {
    if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout()
    {
        StoreError::Unavailable(e.to_string())
    } else {
        StoreError::Unexpected(e.to_string())
    }
}
