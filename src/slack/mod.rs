mod client;
mod types;

pub use client::SlackClient;
pub use types::{ChannelId, MessageTs};
