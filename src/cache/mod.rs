//! Channel name ↔ ID cache
//!
//! Directory scans are slow and rate limited, so every channel seen during a
//! scan is remembered in both directions for a week.
//!
//! - Best-effort: an unreachable store is a cache miss, never a failed run
//! - Only the "store unavailable" condition is swallowed; other store
//!   failures propagate
//! - No invalidation: a renamed channel keeps its old mapping until expiry

mod channels;
mod memory;
mod redis_store;
mod store;

pub use channels::{CHANNEL_TTL, CacheStats, ChannelCache};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use store::{ChannelStore, StoreError};
