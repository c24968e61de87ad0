use crate::error::{NotifyError, Result};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BOT_ICON: &str = "https://avatars.githubusercontent.com/u/44036562";
const DEFAULT_REDIS_HOST: &str = "localhost";
const DEFAULT_REDIS_PORT: u16 = 6379;
const DEFAULT_CACHE_NAMESPACE: &str = "slack_channels";

#[derive(Debug, Clone)]
pub struct Settings {
    pub slack: SlackConfig,
    pub message: MessageConfig,
    pub cache: CacheConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub bot_token: String,
}

#[derive(Debug, Clone)]
pub struct MessageConfig {
    /// Target channel name, as given by the pipeline
    pub channel: String,
    /// Message text with `\n` escapes already translated
    pub content: String,
    pub username: String,
    pub icon_url: String,
    pub image_path: Option<PathBuf>,
    pub format: MessageFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Send the text unchanged (Slack mrkdwn)
    Mrkdwn,
    /// Convert standard Markdown to Slack mrkdwn first
    Markdown,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub redis_url: String,
    pub namespace: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub page_size: u16,
    pub page_delay: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            page_size: 500,
            page_delay: Duration::from_millis(500),
        }
    }
}

pub fn load_settings() -> Result<Settings> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    Settings::from_lookup(|key| std::env::var(key).ok())
}

impl Settings {
    /// Build settings from an arbitrary variable source.
    ///
    /// Every required variable is checked here, before any network activity.
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| {
                NotifyError::Config(format!(
                    "Env var {} is not set and is required to run",
                    key
                ))
            })
        };

        let channel = required("SLACK_CHANNEL")?;
        let content = required("MESSAGE_CONTENT")?;
        let username = required("PIPELINE_NAME")?;
        let bot_token = required("SLACK_BOT_TOKEN")?;

        let format = match get("MESSAGE_FORMAT").as_deref() {
            None | Some("mrkdwn") => MessageFormat::Mrkdwn,
            Some("markdown") => MessageFormat::Markdown,
            Some(other) => {
                return Err(NotifyError::Config(format!(
                    "Invalid MESSAGE_FORMAT: {} (expected mrkdwn or markdown)",
                    other
                )));
            }
        };

        let message = MessageConfig {
            channel,
            content: unescape_newlines(&content),
            username,
            icon_url: get("SLACK_BOT_ICON").unwrap_or_else(|| DEFAULT_BOT_ICON.to_string()),
            image_path: get("IMAGE_PATH").map(PathBuf::from),
            format,
        };

        let cache = CacheConfig {
            enabled: get("CHANNEL_CACHE")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "off" | "false" | "0"))
                .unwrap_or(true),
            redis_url: redis_url(
                &get("REDIS_HOST").unwrap_or_else(|| DEFAULT_REDIS_HOST.to_string()),
            ),
            namespace: get("CHANNEL_CACHE_NAMESPACE")
                .unwrap_or_else(|| DEFAULT_CACHE_NAMESPACE.to_string()),
            timeout: Duration::from_millis(
                get("REDIS_TIMEOUT_MS")
                    .unwrap_or_else(|| "2000".to_string())
                    .parse()
                    .map_err(|_| NotifyError::Config("Invalid REDIS_TIMEOUT_MS".to_string()))?,
            ),
        };

        let directory = DirectoryConfig {
            page_delay: Duration::from_millis(
                get("DIRECTORY_PAGE_DELAY_MS")
                    .unwrap_or_else(|| "500".to_string())
                    .parse()
                    .map_err(|_| {
                        NotifyError::Config("Invalid DIRECTORY_PAGE_DELAY_MS".to_string())
                    })?,
            ),
            ..DirectoryConfig::default()
        };

        Ok(Settings {
            slack: SlackConfig { bot_token },
            message,
            cache,
            directory,
        })
    }
}

/// Pipelines pass message text through YAML, where newlines arrive as a
/// literal backslash followed by `n`.
fn unescape_newlines(content: &str) -> String {
    content.replace("\\n", "\n")
}

/// Turn a `REDIS_HOST` value into a connection URL.
///
/// Accepts a bare host, `host:port`, a bare or bracketed IPv6 address
/// (`::1`, `[::1]:6380`), or a full `redis://`/`rediss://` URL.
pub fn redis_url(host: &str) -> String {
    if host.contains("://") {
        host.to_string()
    } else if host.starts_with('[') {
        if host.contains("]:") {
            format!("redis://{}/", host)
        } else {
            format!("redis://{}:{}/", host, DEFAULT_REDIS_PORT)
        }
    } else if host.matches(':').count() > 1 {
        format!("redis://[{}]:{}/", host, DEFAULT_REDIS_PORT)
    } else if host.contains(':') {
        format!("redis://{}/", host)
    } else {
        format!("redis://{}:{}/", host, DEFAULT_REDIS_PORT)
    }
}
