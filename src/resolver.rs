//! Channel name → ID resolution
//!
//! Cache first; on a miss, walk the directory page by page, caching every
//! channel seen, and stop at the first match.

use crate::cache::{ChannelCache, ChannelStore};
use crate::config::DirectoryConfig;
use crate::directory::{self, ChannelDirectory};
use crate::error::{NotifyError, Result};
use crate::slack::ChannelId;
use futures::StreamExt;
use std::time::Duration;

/// Where a resolved ID came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    Cache,
    /// Found during a scan after fetching this many pages
    Directory { pages: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub channel_id: ChannelId,
    pub source: ResolutionSource,
}

pub struct ChannelResolver<'a, D, S> {
    directory: &'a D,
    cache: &'a ChannelCache<S>,
    page_size: u16,
    page_delay: Duration,
}

impl<'a, D, S> ChannelResolver<'a, D, S>
where
    D: ChannelDirectory,
    S: ChannelStore,
{
    pub fn new(directory: &'a D, cache: &'a ChannelCache<S>, config: &DirectoryConfig) -> Self {
        Self {
            directory,
            cache,
            page_size: config.page_size,
            page_delay: config.page_delay,
        }
    }

    /// Resolve `channel_name` (with or without a leading `#`) to its ID.
    ///
    /// Cached mappings are trusted as-is; a renamed channel resolves to its
    /// old ID until the entry expires. A listing error ends the scan without
    /// retry and the resulting [`NotifyError::ChannelNotFound`] is marked
    /// truncated.
    pub async fn resolve(&self, channel_name: &str) -> Result<Resolution> {
        let name = channel_name.trim_start_matches('#');

        if let Some(id) = self.cache.get(name).await? {
            tracing::info!(channel = %name, channel_id = %id, "Resolved channel from cache");
            return Ok(Resolution {
                channel_id: ChannelId::new(id),
                source: ResolutionSource::Cache,
            });
        }

        tracing::info!(channel = %name, "Channel not cached, scanning directory");

        let mut pages = std::pin::pin!(directory::pages(
            self.directory,
            self.page_size,
            self.page_delay
        ));
        let mut visited = 0;
        let mut truncated = false;

        while let Some(page) = pages.next().await {
            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(
                        channel = %name,
                        pages_visited = visited,
                        error = %e,
                        "Channel listing failed, treating as end of directory"
                    );
                    truncated = true;
                    break;
                }
            };
            visited += 1;

            tracing::debug!(
                page = visited,
                channels = page.channels.len(),
                "Scanning channel page"
            );

            for channel in &page.channels {
                self.cache.put(&channel.name, &channel.id).await?;

                if channel.name == name {
                    tracing::info!(
                        channel = %name,
                        channel_id = %channel.id,
                        pages = visited,
                        "Resolved channel from directory"
                    );
                    return Ok(Resolution {
                        channel_id: ChannelId::new(channel.id.clone()),
                        source: ResolutionSource::Directory { pages: visited },
                    });
                }
            }
        }

        tracing::warn!(
            channel = %name,
            pages_visited = visited,
            truncated = truncated,
            "Channel not found in directory"
        );

        Err(NotifyError::ChannelNotFound {
            channel: name.to_string(),
            truncated,
        })
    }
}
