//! Message delivery: the text post and the optional file upload

mod markdown;
mod message;
mod sender;

pub use markdown::markdown_to_slack;
pub use message::{Attachment, Message};
pub use sender::{MessageTransport, Notifier};
