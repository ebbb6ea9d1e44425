//! Feed selection for the RSS output. Only posts with a firm date are
//! eligible: a timestamp inferred from file metadata is not authorial, so it
//! has no business in a syndication feed. Selected posts are copied into
//! [`FeedItem`]s with their own escaped, absolute links, leaving the source
//! collection untouched so nothing downstream double-escapes.

use crate::post::Post;
use gtmpl_value::Value;
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;
use std::fmt;
use url::Url;

/// How many of the most recent posts are considered for the feed. Non-firm
/// posts inside the window are dropped, not replaced.
pub const FEED_WINDOW: usize = 25;

/// One selected feed entry. Title and link are escaped copies of the post's
/// fields; the link is absolute (site URL joined with the post link).
#[derive(Debug, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
}

/// The feed as handed to the RSS template.
#[derive(Debug)]
pub struct FeedChannel {
    pub title: String,
    pub url: String,
    pub description: String,
    pub items: Vec<FeedItem>,
}

impl FeedChannel {
    /// Converts the channel into a template [`Value`] with fields `Title`,
    /// `URL`, `Desc`, and `Items`.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Title".to_owned(), Value::String(self.title.clone()));
        m.insert("URL".to_owned(), Value::String(self.url.clone()));
        m.insert("Desc".to_owned(), Value::String(self.description.clone()));
        m.insert(
            "Items".to_owned(),
            Value::Array(
                self.items
                    .iter()
                    .map(|item| {
                        let mut entry: HashMap<String, Value> = HashMap::new();
                        entry.insert("Title".to_owned(), Value::String(item.title.clone()));
                        entry.insert("Link".to_owned(), Value::String(item.link.clone()));
                        Value::Object(entry)
                    })
                    .collect(),
            ),
        );
        Value::Object(m)
    }
}

/// Builds the feed channel from the chronological collection: the first
/// [`FEED_WINDOW`] posts, filtered to firm dates, each escaped exactly once.
pub fn channel(
    title: &str,
    url: &Url,
    description: &str,
    chronological: &[Post],
) -> Result<FeedChannel> {
    let mut items = Vec::new();
    for post in chronological.iter().take(FEED_WINDOW) {
        if !post.date_is_firm {
            continue;
        }
        let absolute = url.join(&post.link)?;
        items.push(FeedItem {
            title: escape(&post.title)?,
            link: escape(absolute.as_str())?,
        });
    }
    Ok(FeedChannel {
        title: escape(title)?,
        url: escape(url.as_str())?,
        description: escape(description)?,
        items,
    })
}

fn escape(text: &str) -> Result<String> {
    let mut escaped = String::with_capacity(text.len());
    escape_html(&mut escaped, text)?;
    Ok(escaped)
}

/// The result of a feed-building operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error building the feed channel.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post link cannot be joined onto the site URL.
    UrlParse(url::ParseError),

    /// Returned for I/O errors while escaping into the buffer.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator when joining post links onto the site URL.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator when escaping text.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post(slug: &str, title: &str, day: u32, firm: bool) -> Post {
        Post {
            slug: slug.to_owned(),
            body: String::new(),
            title: title.to_owned(),
            date: Utc.ymd(2021, 3, day).and_hms(0, 0, 0),
            date_is_firm: firm,
            hashtags: Vec::new(),
            link: format!("{}.html", slug),
            prev: String::new(),
            next: String::new(),
        }
    }

    fn site_url() -> Url {
        Url::parse("https://example.com/blog/").unwrap()
    }

    #[test]
    fn test_non_firm_posts_excluded() -> Result<()> {
        let posts = vec![
            post("firm", "Firm", 2, true),
            post("guessed", "Guessed", 1, false),
        ];
        let channel = channel("Blog", &site_url(), "A blog", &posts)?;
        assert_eq!(channel.items.len(), 1);
        assert_eq!(channel.items[0].link, "https://example.com/blog/firm.html");
        Ok(())
    }

    #[test]
    fn test_window_caps_selection() -> Result<()> {
        let posts: Vec<Post> = (1..=28)
            .map(|day| post(&format!("p{:02}", day), "P", (day % 28) + 1, true))
            .collect();
        let channel = channel("Blog", &site_url(), "A blog", &posts)?;
        assert_eq!(channel.items.len(), FEED_WINDOW);
        Ok(())
    }

    #[test]
    fn test_non_firm_inside_window_not_backfilled() -> Result<()> {
        // 26 firm posts plus one guessed date in the middle of the window:
        // the guessed post is dropped and the 26th firm post stays outside.
        let mut posts: Vec<Post> = (1..=26)
            .map(|day| post(&format!("p{:02}", day), "P", 1, true))
            .collect();
        posts.insert(3, post("guessed", "Guessed", 1, false));
        let channel = channel("Blog", &site_url(), "A blog", &posts)?;
        assert_eq!(channel.items.len(), FEED_WINDOW - 1);
        assert!(channel.items.iter().all(|i| !i.link.contains("guessed")));
        Ok(())
    }

    #[test]
    fn test_titles_escaped_once() -> Result<()> {
        let posts = vec![post("amp", "Fish & Chips", 1, true)];
        let channel = channel("A & B", &site_url(), "desc", &posts)?;
        assert_eq!(channel.title, "A &amp; B");
        assert_eq!(channel.items[0].title, "Fish &amp; Chips");
        Ok(())
    }

    #[test]
    fn test_source_posts_left_unescaped() -> Result<()> {
        let posts = vec![post("amp", "Fish & Chips", 1, true)];
        let _ = channel("Blog", &site_url(), "desc", &posts)?;
        assert_eq!(posts[0].title, "Fish & Chips");
        assert_eq!(posts[0].link, "amp.html");
        Ok(())
    }
}
