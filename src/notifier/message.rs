use crate::config::{MessageConfig, MessageFormat};
use crate::error::{NotifyError, Result};
use crate::notifier::markdown_to_slack;
use std::path::Path;

/// A file sent alongside the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Read an attachment from disk
    pub async fn from_path(path: &Path) -> Result<Self> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                NotifyError::Config(format!("IMAGE_PATH has no file name: {}", path.display()))
            })?
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        tracing::debug!(filename = %filename, size = bytes.len(), "Loaded attachment");

        Ok(Self { filename, bytes })
    }

    /// MIME type guessed from the file extension
    pub fn content_type(&self) -> &'static str {
        let extension = Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("svg") => "image/svg+xml",
            _ => "application/octet-stream",
        }
    }
}

/// Everything needed to post one notification
#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub username: String,
    pub icon_url: String,
    pub attachment: Option<Attachment>,
}

impl Message {
    /// Build the message from configuration, reading the attachment if any
    pub async fn from_config(config: &MessageConfig) -> Result<Self> {
        let text = match config.format {
            MessageFormat::Mrkdwn => config.content.clone(),
            MessageFormat::Markdown => markdown_to_slack(&config.content),
        };

        let attachment = match &config.image_path {
            Some(path) => Some(Attachment::from_path(path).await?),
            None => None,
        };

        Ok(Self {
            text,
            username: config.username.clone(),
            icon_url: config.icon_url.clone(),
            attachment,
        })
    }
}
