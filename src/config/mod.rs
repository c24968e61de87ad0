mod settings;

pub use settings::{
    CacheConfig, DirectoryConfig, MessageConfig, MessageFormat, Settings, SlackConfig,
    load_settings, redis_url,
};
