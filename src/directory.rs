//! Paginated channel directory
//!
//! The directory is Slack's `conversations.list`. It is modelled as a trait so
//! the resolver can be driven by any page source.

use crate::error::Result;
use futures::Stream;
use std::time::Duration;

/// A channel as listed by the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Channel name without `#` (e.g. "deploys")
    pub name: String,

    /// Channel ID (e.g. "C123")
    pub id: String,
}

impl Channel {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Opaque pagination token. Empty means "first page" when sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Cursor that requests the first page
    pub fn start() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of the directory listing
#[derive(Debug, Clone, Default)]
pub struct ChannelPage {
    pub channels: Vec<Channel>,
    pub next_cursor: Option<Cursor>,
}

impl ChannelPage {
    /// Continuation cursor, or `None` when this is the last page
    pub fn next(&self) -> Option<&Cursor> {
        self.next_cursor.as_ref().filter(|c| !c.is_empty())
    }
}

/// Source of channel listing pages
#[allow(async_fn_in_trait)]
pub trait ChannelDirectory {
    /// Fetch the page starting at `cursor`, at most `limit` entries.
    ///
    /// Archived channels are excluded; public and private channels are included.
    async fn list_channels(&self, cursor: &Cursor, limit: u16) -> Result<ChannelPage>;
}

enum Position {
    First,
    After(Cursor),
    Exhausted,
}

/// Lazily walk the directory one page at a time.
///
/// The stream ends after the first page without a continuation cursor, or
/// right after yielding the first listing error. `delay` is slept between
/// page fetches, never before the first one.
pub fn pages<D>(
    directory: &D,
    limit: u16,
    delay: Duration,
) -> impl Stream<Item = Result<ChannelPage>> + '_
where
    D: ChannelDirectory,
{
    futures::stream::unfold(Position::First, move |position| async move {
        let cursor = match position {
            Position::First => Cursor::start(),
            Position::After(cursor) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                cursor
            }
            Position::Exhausted => return None,
        };

        tracing::debug!(cursor = %cursor.as_str(), "Fetching channel page");

        match directory.list_channels(&cursor, limit).await {
            Ok(page) => {
                let position = match page.next() {
                    Some(next) => Position::After(next.clone()),
                    None => Position::Exhausted,
                };
                Some((Ok(page), position))
            }
            Err(e) => Some((Err(e), Position::Exhausted)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use futures::StreamExt;
    use std::sync::Mutex;

    /// Pages keyed by position; the cursor of page `n` is `"p{n}"`.
    struct ScriptedDirectory {
        pages: Vec<Vec<Channel>>,
        fail_at: Option<usize>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedDirectory {
        fn new(pages: Vec<Vec<Channel>>) -> Self {
            Self {
                pages,
                fail_at: None,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChannelDirectory for ScriptedDirectory {
        async fn list_channels(&self, cursor: &Cursor, _limit: u16) -> Result<ChannelPage> {
            self.requested.lock().unwrap().push(cursor.as_str().to_string());
            let index = if cursor.is_empty() {
                0
            } else {
                cursor.as_str()[1..].parse::<usize>().unwrap()
            };
            if self.fail_at == Some(index) {
                return Err(NotifyError::SlackApi("ratelimited".to_string()));
            }
            let next_cursor = (index + 1 < self.pages.len())
                .then(|| Cursor::new(format!("p{}", index + 1)))
                .or_else(|| Some(Cursor::start()));
            Ok(ChannelPage {
                channels: self.pages[index].clone(),
                next_cursor,
            })
        }
    }

    #[test]
    fn test_empty_cursor_is_last_page() {
        let page = ChannelPage {
            channels: vec![],
            next_cursor: Some(Cursor::start()),
        };
        assert!(page.next().is_none());

        let page = ChannelPage {
            channels: vec![],
            next_cursor: Some(Cursor::new("dGVhbTpD")),
        };
        assert_eq!(page.next().map(Cursor::as_str), Some("dGVhbTpD"));
    }

    #[tokio::test]
    async fn test_pages_visits_each_page_once() {
        let directory = ScriptedDirectory::new(vec![
            vec![Channel::new("general", "C1")],
            vec![Channel::new("random", "C2")],
            vec![Channel::new("deploys", "C3")],
        ]);

        let collected: Vec<_> = pages(&directory, 500, Duration::ZERO).collect().await;

        assert_eq!(collected.len(), 3);
        assert!(collected.iter().all(|p| p.is_ok()));
        assert_eq!(
            *directory.requested.lock().unwrap(),
            vec!["".to_string(), "p1".to_string(), "p2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_pages_stop_after_error() {
        let mut directory = ScriptedDirectory::new(vec![
            vec![Channel::new("general", "C1")],
            vec![Channel::new("random", "C2")],
            vec![Channel::new("deploys", "C3")],
        ]);
        directory.fail_at = Some(1);

        let collected: Vec<_> = pages(&directory, 500, Duration::ZERO).collect().await;

        assert_eq!(collected.len(), 2);
        assert!(collected[0].is_ok());
        assert!(collected[1].is_err());
        assert_eq!(directory.requested.lock().unwrap().len(), 2);
    }

    /// Records when each page was requested
    struct TimedDirectory {
        pages: usize,
        fetched_at: Mutex<Vec<tokio::time::Instant>>,
    }

    impl ChannelDirectory for TimedDirectory {
        async fn list_channels(&self, cursor: &Cursor, _limit: u16) -> Result<ChannelPage> {
            let mut fetched_at = self.fetched_at.lock().unwrap();
            fetched_at.push(tokio::time::Instant::now());
            let index = fetched_at.len() - 1;
            assert_eq!(cursor.is_empty(), index == 0);

            let next_cursor =
                (index + 1 < self.pages).then(|| Cursor::new(format!("p{}", index + 1)));
            Ok(ChannelPage {
                channels: vec![Channel::new(format!("c{}", index), format!("C{}", index))],
                next_cursor,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_pages_not_before_first() {
        let directory = TimedDirectory {
            pages: 3,
            fetched_at: Mutex::new(Vec::new()),
        };
        let delay = Duration::from_millis(500);
        let start = tokio::time::Instant::now();

        let collected: Vec<_> = pages(&directory, 500, delay).collect().await;
        assert_eq!(collected.len(), 3);

        let fetched_at = directory.fetched_at.lock().unwrap().clone();
        assert_eq!(fetched_at.len(), 3);
        assert!(fetched_at[0] - start < Duration::from_millis(1));
        for pair in fetched_at.windows(2) {
            assert!(pair[1] - pair[0] >= delay, "gap {:?}", pair[1] - pair[0]);
        }
    }

    #[tokio::test]
    async fn test_pages_are_lazy() {
        let directory = ScriptedDirectory::new(vec![
            vec![Channel::new("general", "C1")],
            vec![Channel::new("random", "C2")],
        ]);

        let mut stream = std::pin::pin!(pages(&directory, 500, Duration::ZERO));
        let first = stream.next().await;

        assert!(first.is_some());
        assert_eq!(directory.requested.lock().unwrap().len(), 1);
    }
}
