//! Defines the [`Post`] type and the logic for loading the full post
//! collection from the input directory. Loading is eager and fatal: any file
//! that matches the glob but cannot be read aborts the whole build, and two
//! files that reduce to the same slug are reported as a collision rather
//! than silently overwriting each other's output.

use crate::config::Config;
use crate::extract;
use crate::markdown;
use chrono::{DateTime, Utc};
use gtmpl_value::Value;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const HTML_EXTENSION: &str = ".html";

/// One input file's extracted record. Created once per file, then mutated in
/// place as the pipeline stages (chronological linking, view assembly) run.
#[derive(Debug, Clone)]
pub struct Post {
    /// The input filename without its extension. Stable identifier; doubles
    /// as the output filename stem and the cross-page link target.
    pub slug: String,

    /// The rendered HTML body (or the raw text in preformatted mode).
    pub body: String,

    /// Non-empty after extraction; falls back to the slug.
    pub title: String,

    /// Always populated after the extraction cascade.
    pub date: DateTime<Utc>,

    /// True only when the date came from body text or a filename pattern.
    /// Governs feed eligibility.
    pub date_is_firm: bool,

    /// Distinct `#word` tokens in order of first appearance on the winning
    /// tag line.
    pub hashtags: Vec<String>,

    /// The output path, `{slug}.html`.
    pub link: String,

    /// Link of the chronologically next-older post, filled in by
    /// [`crate::views::link_adjacent`]. Empty for the oldest post.
    pub prev: String,

    /// Link of the chronologically next-newer post. Empty for the newest.
    pub next: String,
}

impl Post {
    /// Converts the post into a template [`Value`]. Field names match the
    /// template surface: `Title`, `Body`, `Date`, `Link`, `Prev`, `Next`,
    /// `File`, and `Hashtags`.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("File".to_owned(), Value::String(self.slug.clone()));
        m.insert("Title".to_owned(), Value::String(self.title.clone()));
        m.insert("Body".to_owned(), Value::String(self.body.clone()));
        m.insert(
            "Date".to_owned(),
            Value::String(self.date.format("%Y-%m-%d %H:%M:%S").to_string()),
        );
        m.insert("Link".to_owned(), Value::String(self.link.clone()));
        m.insert("Prev".to_owned(), Value::String(self.prev.clone()));
        m.insert("Next".to_owned(), Value::String(self.next.clone()));
        m.insert(
            "Hashtags".to_owned(),
            Value::Array(
                self.hashtags
                    .iter()
                    .map(|t| Value::String(t.clone()))
                    .collect(),
            ),
        );
        Value::Object(m)
    }
}

/// Loads every post matching the configured glob, in sorted filename order.
/// Invokes the extractor once per file and converts bodies to HTML unless
/// the preformatted flag is set.
pub fn load_posts(config: &Config) -> Result<Vec<Post>> {
    let files = list_input_files(&config.input_directory, &config.glob)?;

    let mut posts = Vec::with_capacity(files.len());
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for path in files {
        let post = load_post(&path, config)?;
        if let Some(first) = seen.insert(post.slug.clone(), path.clone()) {
            return Err(Error::SlugCollision {
                slug: post.slug,
                first,
                second: path,
            });
        }
        posts.push(post);
    }
    Ok(posts)
}

fn load_post(path: &Path, config: &Config) -> Result<Post> {
    let slug = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| Error::InvalidFileName(path.to_owned()))?
        .to_owned();

    let raw = fs::read_to_string(path).map_err(|err| Error::Read {
        path: path.to_owned(),
        err,
    })?;
    let modified: DateTime<Utc> = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|err| Error::Read {
            path: path.to_owned(),
            err,
        })?
        .into();

    let meta = extract::extract(&raw, &slug, modified, config.assume_utc);
    let body = if config.preformatted {
        raw
    } else {
        markdown::to_html(&raw)
    };

    debug!(
        file = %path.display(),
        title = %meta.title,
        date = %meta.date,
        firm = meta.date_is_firm,
        tags = ?meta.hashtags,
        "processed input file"
    );

    let link = format!("{}{}", slug, HTML_EXTENSION);
    Ok(Post {
        slug,
        body,
        title: meta.title,
        date: meta.date,
        date_is_firm: meta.date_is_firm,
        hashtags: meta.hashtags,
        link,
        prev: String::new(),
        next: String::new(),
    })
}

/// Lists the files in `dir` whose names match `glob`, sorted by name so the
/// collection order (and therefore tie-breaking everywhere downstream) is
/// deterministic.
fn list_input_files(dir: &Path, glob: &str) -> Result<Vec<PathBuf>> {
    let matcher = glob_to_regex(glob)?;
    let mut files = Vec::new();
    for result in fs::read_dir(dir)? {
        let entry = result?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if matcher.is_match(&file_name) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Translates a shell-style glob (`*` and `?` wildcards) into an anchored
/// [`Regex`].
fn glob_to_regex(glob: &str) -> Result<Regex> {
    let mut expr = String::with_capacity(glob.len() + 2);
    expr.push('^');
    for c in glob.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            c => expr.push_str(&regex::escape(&c.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(Error::BadGlob)
}

/// The result of a post-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the post collection.
#[derive(Debug)]
pub enum Error {
    /// Returned when an input file cannot be read (or its metadata fetched).
    Read { path: PathBuf, err: std::io::Error },

    /// Returned when a file name is not valid UTF-8 or has no stem.
    InvalidFileName(PathBuf),

    /// Returned when the configured glob does not translate to a valid
    /// pattern.
    BadGlob(regex::Error),

    /// Returned when two input files reduce to the same slug and would
    /// overwrite each other's output file.
    SlugCollision {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Returned for other I/O errors while listing the input directory.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "reading input file '{}': {}", path.display(), err)
            }
            Error::InvalidFileName(path) => {
                write!(f, "invalid input file name: {:?}", path)
            }
            Error::BadGlob(err) => write!(f, "bad file glob: {}", err),
            Error::SlugCollision { slug, first, second } => write!(
                f,
                "input files '{}' and '{}' both produce output '{}{}'",
                first.display(),
                second.display(),
                slug,
                HTML_EXTENSION,
            ),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { path: _, err } => Some(err),
            Error::InvalidFileName(_) => None,
            Error::BadGlob(err) => Some(err),
            Error::SlugCollision { .. } => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
