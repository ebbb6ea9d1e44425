//! Build configuration. Command-line flags are merged over an optional
//! `site.yaml` in the input directory; flags win. Validation failures here
//! are fatal before any input file is touched.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

/// The optional per-site configuration file, looked up in the input
/// directory.
pub const SITE_FILE: &str = "site.yaml";

const DEFAULT_GLOB: &str = "*.txt";

/// The subset of configuration that can live in [`SITE_FILE`]. Every field
/// is optional; command-line flags override whatever is present.
#[derive(Deserialize, Default)]
struct SiteFile {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    glob: Option<String>,

    #[serde(default)]
    preformatted: Option<bool>,

    #[serde(default)]
    utc: Option<bool>,
}

/// Site identity. The feed is generated only when all three fields are
/// supplied.
#[derive(Debug, Clone)]
pub struct SiteInfo {
    pub title: String,
    pub url: Url,
    pub description: String,
}

/// The resolved configuration for one build run.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub template_directory: PathBuf,
    pub glob: String,
    pub preformatted: bool,
    pub assume_utc: bool,
    pub site: Option<SiteInfo>,
}

/// Raw values as they arrive from the command line, before merging with the
/// site file and applying defaults.
#[derive(Debug, Default)]
pub struct Flags {
    pub input_directory: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub template_directory: Option<PathBuf>,
    pub glob: Option<String>,
    pub preformatted: bool,
    pub assume_utc: bool,
    pub site_title: Option<String>,
    pub site_url: Option<String>,
    pub site_description: Option<String>,
}

impl Config {
    /// Resolves the effective configuration: current directory defaults,
    /// then [`SITE_FILE`] values, then flags on top.
    pub fn resolve(flags: Flags) -> Result<Config> {
        let input_directory = match flags.input_directory {
            Some(dir) => dir,
            None => std::env::current_dir()
                .map_err(|e| anyhow!("using the current directory for input: {}", e))?,
        };
        if !input_directory.is_dir() {
            return Err(anyhow!(
                "input directory '{}' does not exist",
                input_directory.display()
            ));
        }

        let site_file = load_site_file(&input_directory)?;

        let output_directory = match flags.output_directory {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(anyhow!(
                        "output directory '{}' does not exist",
                        dir.display()
                    ));
                }
                dir
            }
            None => input_directory.clone(),
        };
        let template_directory = flags
            .template_directory
            .unwrap_or_else(|| input_directory.clone());

        let site = site_info(
            flags.site_title.or(site_file.title),
            flags.site_url.or(site_file.url),
            flags.site_description.or(site_file.description),
        )?;

        Ok(Config {
            input_directory,
            output_directory,
            template_directory,
            glob: flags
                .glob
                .or(site_file.glob)
                .unwrap_or_else(|| DEFAULT_GLOB.to_owned()),
            preformatted: flags.preformatted || site_file.preformatted.unwrap_or(false),
            assume_utc: flags.assume_utc || site_file.utc.unwrap_or(false),
            site,
        })
    }
}

fn load_site_file(input_directory: &std::path::Path) -> Result<SiteFile> {
    let path = input_directory.join(SITE_FILE);
    if !path.is_file() {
        return Ok(SiteFile::default());
    }
    let file = std::fs::File::open(&path)
        .map_err(|e| anyhow!("opening site file '{}': {}", path.display(), e))?;
    serde_yaml::from_reader(file)
        .map_err(|e| anyhow!("parsing site file '{}': {}", path.display(), e))
}

/// Combines the three site-identity values. All three must be present to
/// enable feed generation; any other combination means no feed. The URL is
/// normalized to end with a slash so post links join underneath it.
fn site_info(
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
) -> Result<Option<SiteInfo>> {
    match (title, url, description) {
        (Some(title), Some(url), Some(description)) => {
            let url = if url.ends_with('/') {
                url
            } else {
                format!("{}/", url)
            };
            let url =
                Url::parse(&url).map_err(|e| anyhow!("parsing site url '{}': {}", url, e))?;
            Ok(Some(SiteInfo {
                title,
                url,
                description,
            }))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_site_url_gains_trailing_slash() -> Result<()> {
        let site = site_info(
            Some("Blog".to_owned()),
            Some("https://example.com/blog".to_owned()),
            Some("A blog".to_owned()),
        )?
        .expect("all three fields supplied");
        assert_eq!(site.url.as_str(), "https://example.com/blog/");
        Ok(())
    }

    #[test]
    fn test_feed_requires_all_three_fields() -> Result<()> {
        let site = site_info(
            Some("Blog".to_owned()),
            None,
            Some("A blog".to_owned()),
        )?;
        assert!(site.is_none());
        Ok(())
    }

    #[test]
    fn test_bad_site_url_is_fatal() {
        let result = site_info(
            Some("Blog".to_owned()),
            Some("not a url".to_owned()),
            Some("A blog".to_owned()),
        );
        assert!(result.is_err());
    }
}
