use crate::config::SlackConfig;
use crate::directory::{Channel, ChannelDirectory, ChannelPage, Cursor};
use crate::error::{NotifyError, Result};
use crate::notifier::{Message, MessageTransport};
use crate::slack::{ChannelId, MessageTs};
use slack_morphism::prelude::*;
use std::sync::Arc;

pub struct SlackClient {
    client: Arc<SlackHyperClient>,
    token: SlackApiToken,
}

impl SlackClient {
    pub fn new(config: SlackConfig) -> Result<Self> {
        let connector = SlackClientHyperConnector::new()
            .map_err(|e| NotifyError::SlackApi(e.to_string()))?;

        let client = Arc::new(slack_morphism::SlackClient::new(connector));
        let token = SlackApiToken::new(config.bot_token.into());

        Ok(Self { client, token })
    }
}

impl ChannelDirectory for SlackClient {
    async fn list_channels(&self, cursor: &Cursor, limit: u16) -> Result<ChannelPage> {
        let session = self.client.open_session(&self.token);

        let mut request = SlackApiConversationsListRequest::new()
            .with_exclude_archived(true)
            .with_limit(limit)
            .with_types(vec![
                SlackConversationType::Public,
                SlackConversationType::Private,
            ]);

        if !cursor.is_empty() {
            request = request.with_cursor(SlackCursorId(cursor.as_str().to_string()));
        }

        let response = session
            .conversations_list(&request)
            .await
            .map_err(|e| NotifyError::SlackApi(e.to_string()))?;

        // Unnamed conversations (DMs) can never match a channel name
        let channels: Vec<Channel> = response
            .channels
            .iter()
            .filter_map(|c| {
                c.name
                    .as_ref()
                    .map(|name| Channel::new(name.clone(), c.id.to_string()))
            })
            .collect();

        let next_cursor = response
            .response_metadata
            .and_then(|m| m.next_cursor)
            .map(|c| Cursor::new(c.to_string()));

        tracing::debug!(
            channels = channels.len(),
            has_more = next_cursor.as_ref().is_some_and(|c| !c.is_empty()),
            "Received channel page"
        );

        Ok(ChannelPage {
            channels,
            next_cursor,
        })
    }
}

impl MessageTransport for SlackClient {
    type UploadTicket = SlackApiFilesGetUploadUrlExternalResponse;

    async fn post_message(&self, channel: &ChannelId, message: &Message) -> Result<MessageTs> {
        let session = self.client.open_session(&self.token);

        let mut request = SlackApiChatPostMessageRequest::new(
            channel.as_str().into(),
            SlackMessageContent::new().with_text(message.text.clone()),
        );

        request.username = Some(message.username.clone());
        request.icon_url = Some(message.icon_url.clone());

        // Unfurl links and media to show previews
        request.unfurl_links = Some(true);
        request.unfurl_media = Some(true);

        let response = session
            .chat_post_message(&request)
            .await
            .map_err(|e| NotifyError::SlackApi(e.to_string()))?;

        Ok(MessageTs::new(response.ts.to_string()))
    }

    async fn get_upload_url(&self, filename: &str, length: usize) -> Result<Self::UploadTicket> {
        let session = self.client.open_session(&self.token);

        session
            .get_upload_url_external(&SlackApiFilesGetUploadUrlExternalRequest::new(
                filename.to_string(),
                length,
            ))
            .await
            .map_err(|e| NotifyError::SlackApi(e.to_string()))
    }

    async fn upload(
        &self,
        ticket: &Self::UploadTicket,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let session = self.client.open_session(&self.token);

        session
            .files_upload_via_url(&SlackApiFilesUploadViaUrlRequest::new(
                ticket.upload_url.clone(),
                bytes,
                content_type.to_string(),
            ))
            .await
            .map_err(|e| NotifyError::SlackApi(e.to_string()))?;

        Ok(())
    }

    async fn complete_upload(
        &self,
        ticket: Self::UploadTicket,
        title: &str,
        channel: &ChannelId,
    ) -> Result<()> {
        let session = self.client.open_session(&self.token);

        let file = SlackApiFilesComplete::new(ticket.file_id).with_title(title.to_string());
        let request = SlackApiFilesCompleteUploadExternalRequest::new(vec![file])
            .with_channel_id(SlackChannelId(channel.as_str().to_string()));

        session
            .files_complete_upload_external(&request)
            .await
            .map_err(|e| NotifyError::SlackApi(e.to_string()))?;

        Ok(())
    }
}
