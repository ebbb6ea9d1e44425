//! Exports the [`build_site`] function which stitches together the
//! high-level steps of one build: loading and extracting the posts
//! ([`crate::post`]), sorting and linking the collection ([`crate::views`]),
//! and rendering every output view ([`crate::render`]), with the RSS feed
//! last and only when the site identity is configured.

use crate::config::Config;
use crate::feed::{self, Error as FeedError};
use crate::post::{self, Error as LoadError};
use crate::render::{Error as RenderError, Writer};
use crate::views;
use std::fmt;

/// Runs one full build: load → chronological sort → adjacency links →
/// post pages, archive, contents, latest, hashtags → feed. Single-threaded
/// and all-or-nothing; the first error aborts the run with nothing retried.
pub fn build_site(config: &Config) -> Result<()> {
    let mut posts = post::load_posts(config)?;
    views::sort_chronological(&mut posts);
    views::link_adjacent(&mut posts);

    let writer = Writer::new(config)?;
    writer.write_posts(&posts)?;
    writer.write_archive(&posts)?;
    writer.write_contents(&posts)?;
    writer.write_latest(&posts)?;
    writer.write_hashtags(&posts)?;

    if let Some(site) = &config.site {
        let channel = feed::channel(&site.title, &site.url, &site.description, &posts)?;
        writer.write_feed(&channel)?;
    }

    Ok(())
}

/// The result of a site build.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can occur while loading
/// posts, templating and writing output files, or assembling the feed.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading the post collection.
    Load(LoadError),

    /// Returned for errors templating or writing output files.
    Render(RenderError),

    /// Returned for errors assembling the feed.
    Feed(FeedError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Load(err) => err.fmt(f),
            Error::Render(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Load(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Feed(err) => Some(err),
        }
    }
}

impl From<LoadError> for Error {
    /// Converts [`LoadError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: LoadError) -> Error {
        Error::Load(err)
    }
}

impl From<RenderError> for Error {
    /// Converts [`RenderError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: RenderError) -> Error {
        Error::Render(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}
