use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached (refused, timed out, dropped)
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    /// Anything else the store reported
    #[error("unexpected cache store failure: {0}")]
    Unexpected(String),
}

/// Key-value store holding the channel mappings.
///
/// Expiry is enforced by the store itself.
#[allow(async_fn_in_trait)]
pub trait ChannelStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write two keys together; either both are stored or neither is.
    async fn put_pair(
        &self,
        first: (&str, &str),
        second: (&str, &str),
        ttl: Duration,
    ) -> Result<(), StoreError>;
}

impl<T: ChannelStore + ?Sized> ChannelStore for &T {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn put_pair(
        &self,
        first: (&str, &str),
        second: (&str, &str),
        ttl: Duration,
    ) -> Result<(), StoreError> {
        (**self).put_pair(first, second, ttl).await
    }
}
