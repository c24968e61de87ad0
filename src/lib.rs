pub mod app;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod resolver;
pub mod slack;

pub use error::{NotifyError, Result};
