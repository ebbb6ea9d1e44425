//! The library code for the `quill` static site generator. The architecture
//! breaks down into three distinct steps:
//!
//! 1. Loading posts from source files on disk and extracting their metadata
//!    ([`crate::post`], [`crate::extract`])
//! 2. Deriving the cross-page views from the one shared collection
//!    ([`crate::views`], [`crate::feed`])
//! 3. Templating the views and writing the output files ([`crate::render`])
//!
//! Of the three, the first is the most involved: posts are plain text with
//! no mandatory structure, so the title, date, and hashtags are recovered by
//! heuristic pattern matching with a cascade of fallbacks. The second step
//! re-sorts and re-groups the same collection several ways (chronological,
//! alphabetical, per-tag, latest-N, feed-eligible) without re-extracting
//! anything. The third step applies a Go-template-style template per view,
//! falling back to a built-in minimal template when none is supplied.
//!
//! [`crate::build`] stitches the steps together into a single synchronous,
//! all-or-nothing pipeline.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod extract;
pub mod feed;
pub mod markdown;
pub mod post;
pub mod render;
pub mod views;
