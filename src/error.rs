use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel cache error: {0}")]
    Cache(String),

    #[error(
        "Channel {} not found.{} If it is a private channel: mention the bot and invite it to the channel first",
        .channel,
        truncation_note(.truncated)
    )]
    ChannelNotFound { channel: String, truncated: bool },

    #[error("Slack API error: {0}")]
    SlackApi(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn truncation_note(truncated: &bool) -> &'static str {
    if *truncated {
        " The channel scan was interrupted by a Slack API error, so the list may be incomplete."
    } else {
        ""
    }
}

impl NotifyError {
    /// Process exit code reported for this error
    pub fn exit_code(&self) -> u8 {
        1
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mentions_channel_and_invite() {
        let err = NotifyError::ChannelNotFound {
            channel: "ghost".to_string(),
            truncated: false,
        };
        let text = err.to_string();
        assert!(text.contains("Channel ghost not found."));
        assert!(text.contains("invite it to the channel"));
        assert!(!text.contains("interrupted"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_truncated_not_found_says_scan_was_interrupted() {
        let err = NotifyError::ChannelNotFound {
            channel: "ghost".to_string(),
            truncated: true,
        };
        assert!(err.to_string().contains("scan was interrupted"));
    }
}
