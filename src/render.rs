//! Templating and writing of the output site. Each output view has a
//! template file name (`page.tmpl`, `archive.tmpl`, ...) looked up in the
//! template directory, and a built-in minimal fallback used when the file
//! doesn't exist. Template load, parse, and render failures are all fatal.

use crate::config::Config;
use crate::feed::FeedChannel;
use crate::post::Post;
use crate::views;
use gtmpl::Template;
use gtmpl_value::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const PAGE_FALLBACK: &str = r#"<!DOCTYPE html>
<html lang="en-us">
<head>
<meta charset="utf-8" />
<link rel="stylesheet" href="default.css" />
<title>{{.Title}}</title>
</head>
<body>{{.Body}}</body>
</html>
"#;

/// Shared by the archive and contents views, which differ only in ordering.
const LIST_FALLBACK: &str = r#"<!DOCTYPE html>
<html lang="en-us">
<head>
<meta charset="utf-8" />
<link rel="stylesheet" href="default.css" />
<title>{{.Title}}</title>
</head>
<body>
<ul>{{range .Pages}}
<li><a href="{{.Link}}">{{.Title}}</a></li>{{end}}
</ul>
</body>
</html>
"#;

/// The latest-posts output is a snippet for inclusion, not a full document.
const LATEST_FALLBACK: &str = r#"<div id="latest">
<ul>{{range .}}
<li><a href="{{.Link}}">{{.Title}}</a></li>{{end}}
</ul>
</div>
"#;

const HASHTAGS_FALLBACK: &str = r#"<!DOCTYPE html>
<html lang="en-us">
<head>
<meta charset="utf-8" />
<link rel="stylesheet" href="default.css" />
<title>Hashtags</title>
</head>
<body>
{{range .}}<h2 id="{{.Tag}}">{{.Tag}}</h2>
<ul>{{range .Pages}}
<li><a href="{{.Link}}">{{.Title}}</a></li>{{end}}
</ul>
{{end}}</body>
</html>
"#;

const RSS_FALLBACK: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
<channel>
<atom:link href="{{.URL}}rss.xml" rel="self" type="application/rss+xml" />
<title>{{.Title}}</title>
<link>{{.URL}}</link>
<description>{{.Desc}}</description>
{{range .Items}}<item>
<title>{{.Title}}</title>
<link>{{.Link}}</link>
<guid isPermaLink="true">{{.Link}}</guid>
</item>{{end}}
</channel>
</rss>
"#;

/// Responsible for templating the finished views and writing them to the
/// output directory.
pub struct Writer<'a> {
    output_directory: &'a Path,
    page: Template,
    archive: Template,
    contents: Template,
    latest: Template,
    hashtags: Template,
    rss: Template,
}

impl<'a> Writer<'a> {
    /// Loads (or falls back) and parses every view template up front, so a
    /// broken template aborts the build before any output is written.
    pub fn new(config: &'a Config) -> Result<Writer<'a>> {
        let dir = &config.template_directory;
        Ok(Writer {
            output_directory: &config.output_directory,
            page: load_template(dir, "page.tmpl", PAGE_FALLBACK)?,
            archive: load_template(dir, "archive.tmpl", LIST_FALLBACK)?,
            contents: load_template(dir, "contents.tmpl", LIST_FALLBACK)?,
            latest: load_template(dir, "latest.tmpl", LATEST_FALLBACK)?,
            hashtags: load_template(dir, "hashtags.tmpl", HASHTAGS_FALLBACK)?,
            rss: load_template(dir, "rss.tmpl", RSS_FALLBACK)?,
        })
    }

    /// Writes one `{slug}.html` document per post.
    pub fn write_posts(&self, posts: &[Post]) -> Result<()> {
        for post in posts {
            self.write_file(&self.page, post.to_value(), &post.link)?;
        }
        Ok(())
    }

    /// Writes the chronological archive page.
    pub fn write_archive(&self, posts: &[Post]) -> Result<()> {
        let pages: Vec<&Post> = posts.iter().collect();
        self.write_file(&self.archive, list_value("Archive", &pages), "archive.html")
    }

    /// Writes the alphabetical contents page.
    pub fn write_contents(&self, posts: &[Post]) -> Result<()> {
        let pages = views::alphabetical(posts);
        self.write_file(
            &self.contents,
            list_value("Contents", &pages),
            "contents.html",
        )
    }

    /// Writes the latest-posts snippet.
    pub fn write_latest(&self, posts: &[Post]) -> Result<()> {
        let value = Value::Array(views::latest(posts).iter().map(Post::to_value).collect());
        self.write_file(&self.latest, value, "latest.html")
    }

    /// Writes the hashtag index page: one `{Tag, Pages}` group per tag, tags
    /// in sorted order, bucket members in chronological order.
    pub fn write_hashtags(&self, posts: &[Post]) -> Result<()> {
        let groups = views::tag_index(posts)
            .into_iter()
            .map(|(tag, pages)| {
                let mut group: HashMap<String, Value> = HashMap::new();
                group.insert("Tag".to_owned(), Value::String(tag.to_owned()));
                group.insert(
                    "Pages".to_owned(),
                    Value::Array(pages.iter().map(|p| p.to_value()).collect()),
                );
                Value::Object(group)
            })
            .collect();
        self.write_file(&self.hashtags, Value::Array(groups), "hashtags.html")
    }

    /// Writes the RSS feed.
    pub fn write_feed(&self, channel: &FeedChannel) -> Result<()> {
        self.write_file(&self.rss, channel.to_value(), "rss.xml")
    }

    fn write_file(&self, template: &Template, value: Value, file_name: &str) -> Result<()> {
        let path = self.output_directory.join(file_name);
        let mut file = File::create(&path)?;
        render(template, value, &mut file)?;
        debug!(file = %path.display(), "generated output file");
        Ok(())
    }
}

/// Renders a template over a [`Value`] into any writer. Split out from
/// [`Writer`] so tests can render into a buffer.
fn render<W: io::Write>(template: &Template, value: Value, w: &mut W) -> Result<()> {
    let context = gtmpl::Context::from(value)?;
    template.execute(w, &context)?;
    Ok(())
}

/// Builds the `{Title, Pages}` value shared by the archive and contents
/// templates.
fn list_value(title: &str, pages: &[&Post]) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("Title".to_owned(), Value::String(title.to_owned()));
    m.insert(
        "Pages".to_owned(),
        Value::Array(pages.iter().map(|p| p.to_value()).collect()),
    );
    Value::Object(m)
}

/// Loads and parses `{dir}/{file_name}`, or the built-in fallback when no
/// such file exists.
fn load_template(dir: &Path, file_name: &str, fallback: &str) -> Result<Template> {
    let path = dir.join(file_name);
    let source = if path.is_file() {
        std::fs::read_to_string(&path).map_err(|err| Error::OpenTemplateFile { path, err })?
    } else {
        debug!(template = file_name, "template not found; using fallback");
        fallback.to_owned()
    };

    let mut template = Template::default();
    template.parse(&source).map_err(Error::Template)?;
    Ok(template)
}

/// The result of a fallible rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error templating or writing the output site.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// An error during template parsing or execution.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "opening template file '{}': {}", path.display(), err)
            }
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}
