use slack_notify::cache::{MemoryStore, RedisStore};
use slack_notify::config::{Settings, load_settings};
use slack_notify::error::Result;
use slack_notify::logging;
use slack_notify::resolver::Resolution;
use slack_notify::slack::SlackClient;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    logging::init();

    match notify().await {
        Ok(resolution) => {
            tracing::debug!(
                channel_id = %resolution.channel_id,
                source = ?resolution.source,
                "Notification delivered"
            );
            println!("Message sent.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            logging::log_error("notify", &e);
            println!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn notify() -> Result<Resolution> {
    // Load configuration
    let settings = load_settings()?;
    tracing::info!(
        channel = %settings.message.channel,
        pipeline = %settings.message.username,
        attachment = settings.message.image_path.is_some(),
        "Configuration loaded"
    );

    let slack = SlackClient::new(settings.slack.clone())?;

    if settings.cache.enabled {
        let store = connect_cache(&settings).await?;
        slack_notify::app::run(&settings, &slack, store).await
    } else {
        tracing::info!("Shared channel cache disabled");
        slack_notify::app::run(&settings, &slack, MemoryStore::new()).await
    }
}

async fn connect_cache(settings: &Settings) -> Result<RedisStore> {
    tracing::debug!(
        timeout_ms = settings.cache.timeout.as_millis() as u64,
        "Connecting to channel cache"
    );
    RedisStore::connect(&settings.cache.redis_url, settings.cache.timeout).await
}
