use crate::error::{NotifyError, Result};
use crate::notifier::{Attachment, Message};
use crate::slack::{ChannelId, MessageTs};

/// Chat platform operations needed to deliver a notification
#[allow(async_fn_in_trait)]
pub trait MessageTransport {
    /// Handle returned by [`get_upload_url`](Self::get_upload_url) and passed
    /// through the rest of the upload
    type UploadTicket;

    /// Post `message.text` with username/icon branding and link/media unfurling
    async fn post_message(&self, channel: &ChannelId, message: &Message) -> Result<MessageTs>;

    async fn get_upload_url(&self, filename: &str, length: usize) -> Result<Self::UploadTicket>;

    /// Transfer the raw file bytes to the upload target
    async fn upload(
        &self,
        ticket: &Self::UploadTicket,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// File the uploaded blob under `title` in `channel`
    async fn complete_upload(
        &self,
        ticket: Self::UploadTicket,
        title: &str,
        channel: &ChannelId,
    ) -> Result<()>;
}

pub struct Notifier<'a, T> {
    transport: &'a T,
}

impl<'a, T: MessageTransport> Notifier<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Send the message, then the attachment if there is one.
    ///
    /// Any failure is returned as-is; nothing is retried or rolled back.
    pub async fn send(&self, channel: &ChannelId, message: &Message) -> Result<()> {
        let ts = self.transport.post_message(channel, message).await?;
        tracing::info!(channel_id = %channel, ts = %ts.as_str(), "Message posted");

        if let Some(attachment) = &message.attachment {
            self.upload(channel, attachment).await?;
        }

        Ok(())
    }

    async fn upload(&self, channel: &ChannelId, attachment: &Attachment) -> Result<()> {
        let filename = attachment.filename.as_str();
        tracing::debug!(
            filename = %filename,
            size = attachment.bytes.len(),
            "Requesting upload URL"
        );

        let ticket = self
            .transport
            .get_upload_url(filename, attachment.bytes.len())
            .await
            .map_err(|e| upload_error("requesting upload URL", e))?;

        self.transport
            .upload(&ticket, attachment.bytes.clone(), attachment.content_type())
            .await
            .map_err(|e| upload_error("transferring file", e))?;

        self.transport
            .complete_upload(ticket, filename, channel)
            .await
            .map_err(|e| upload_error("completing upload", e))?;

        tracing::info!(channel_id = %channel, filename = %filename, "Attachment uploaded");
        Ok(())
    }
}

fn upload_error(step: &str, error: NotifyError) -> NotifyError {
    match error {
        NotifyError::Upload(_) => error,
        other => NotifyError::Upload(format!("{}: {}", step, other)),
    }
}
