#![allow(dead_code)]

use slack_notify::cache::{ChannelStore, StoreError};
use slack_notify::config::Settings;
use slack_notify::directory::{Channel, ChannelDirectory, ChannelPage, Cursor};
use slack_notify::notifier::{Message, MessageTransport};
use slack_notify::slack::{ChannelId, MessageTs};
use slack_notify::{NotifyError, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Every call made against [`FakeSlack`], in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    Post { channel: String, text: String },
    GetUploadUrl { filename: String, length: usize },
    Upload { bytes: usize, content_type: String },
    Complete { title: String, channel: String },
}

/// In-memory Slack workspace with a paged channel directory
#[derive(Default)]
pub struct FakeSlack {
    pages: Vec<Vec<Channel>>,
    fail_list_at: Option<usize>,
    fail_step: Option<&'static str>,
    calls: Mutex<Vec<Call>>,
}

impl FakeSlack {
    pub fn with_pages(pages: Vec<Vec<(&str, &str)>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|page| {
                    page.into_iter()
                        .map(|(name, id)| Channel::new(name, id))
                        .collect()
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing_list_at(mut self, page: usize) -> Self {
        self.fail_list_at = Some(page);
        self
    }

    pub fn failing_at(mut self, step: &'static str) -> Self {
        self.fail_step = Some(step);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::List(_)))
            .count()
    }

    fn record(&self, step: &str, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_step == Some(step) {
            return Err(NotifyError::SlackApi(format!("{}: invalid_auth", step)));
        }
        Ok(())
    }
}

impl ChannelDirectory for FakeSlack {
    async fn list_channels(&self, cursor: &Cursor, _limit: u16) -> Result<ChannelPage> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::List(cursor.as_str().to_string()));

        let index = if cursor.is_empty() {
            0
        } else {
            cursor
                .as_str()
                .trim_start_matches("page-")
                .parse::<usize>()
                .unwrap()
        };
        if self.fail_list_at == Some(index) {
            return Err(NotifyError::SlackApi("ratelimited".to_string()));
        }

        let next_cursor = if index + 1 < self.pages.len() {
            Cursor::new(format!("page-{}", index + 1))
        } else {
            Cursor::start()
        };

        Ok(ChannelPage {
            channels: self.pages.get(index).cloned().unwrap_or_default(),
            next_cursor: Some(next_cursor),
        })
    }
}

impl MessageTransport for FakeSlack {
    type UploadTicket = String;

    async fn post_message(&self, channel: &ChannelId, message: &Message) -> Result<MessageTs> {
        self.record(
            "post",
            Call::Post {
                channel: channel.as_str().to_string(),
                text: message.text.clone(),
            },
        )?;
        Ok(MessageTs::new("1700000000.000100"))
    }

    async fn get_upload_url(&self, filename: &str, length: usize) -> Result<String> {
        self.record(
            "get_upload_url",
            Call::GetUploadUrl {
                filename: filename.to_string(),
                length,
            },
        )?;
        Ok("F0UPLOAD".to_string())
    }

    async fn upload(&self, _ticket: &String, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        self.record(
            "upload",
            Call::Upload {
                bytes: bytes.len(),
                content_type: content_type.to_string(),
            },
        )
    }

    async fn complete_upload(
        &self,
        _ticket: String,
        title: &str,
        channel: &ChannelId,
    ) -> Result<()> {
        self.record(
            "complete_upload",
            Call::Complete {
                title: title.to_string(),
                channel: channel.as_str().to_string(),
            },
        )
    }
}

/// Store whose server is never reachable
pub struct UnreachableStore;

impl ChannelStore for UnreachableStore {
    async fn get(&self, _key: &str) -> std::result::Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("Connection refused (os error 111)".to_string()))
    }

    async fn put_pair(
        &self,
        _first: (&str, &str),
        _second: (&str, &str),
        _ttl: Duration,
    ) -> std::result::Result<(), StoreError> {
        Err(StoreError::Unavailable("Connection refused (os error 111)".to_string()))
    }
}

/// Settings as the pipeline would set them, with no page delay
pub fn settings(overrides: &[(&str, &str)]) -> Settings {
    let mut env: HashMap<String, String> = [
        ("SLACK_CHANNEL", "deploys"),
        ("MESSAGE_CONTENT", "Build passed"),
        ("PIPELINE_NAME", "release-pipeline"),
        ("SLACK_BOT_TOKEN", "xoxb-test"),
        ("DIRECTORY_PAGE_DELAY_MS", "0"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        env.insert(key.to_string(), value.to_string());
    }

    Settings::from_lookup(|key| env.get(key).cloned()).unwrap()
}
