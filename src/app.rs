//! One notification run: resolve the channel, then deliver the message

use crate::cache::{ChannelCache, ChannelStore};
use crate::config::Settings;
use crate::directory::ChannelDirectory;
use crate::error::Result;
use crate::logging::Timer;
use crate::notifier::{Message, MessageTransport, Notifier};
use crate::resolver::{ChannelResolver, Resolution};

/// Run a single notification against `slack`, caching channels in `store`.
///
/// The message (and attachment) is prepared before any Slack call, so a bad
/// `IMAGE_PATH` fails before the channel scan starts.
pub async fn run<C, S>(settings: &Settings, slack: &C, store: S) -> Result<Resolution>
where
    C: ChannelDirectory + MessageTransport,
    S: ChannelStore,
{
    let message = Message::from_config(&settings.message).await?;

    let cache = ChannelCache::new(store, settings.cache.namespace.clone());
    let resolver = ChannelResolver::new(slack, &cache, &settings.directory);

    let resolution = {
        let _timer = Timer::new("resolve_channel");
        resolver.resolve(&settings.message.channel).await
    };
    cache.log_stats();
    let resolution = resolution?;

    {
        let _timer = Timer::new("send_message");
        Notifier::new(slack)
            .send(&resolution.channel_id, &message)
            .await?;
    }

    Ok(resolution)
}
