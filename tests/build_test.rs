//! End-to-end test of the pipeline: load the posts in `testdata/posts`,
//! build the whole site into a scratch directory, and check the output
//! artifacts against the properties the views promise.

use quill::build::build_site;
use quill::config::{Config, SiteInfo};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("quill-{}-{}", name, std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn config(output_directory: &Path) -> Config {
    let input = PathBuf::from("./testdata/posts");
    Config {
        input_directory: input.clone(),
        output_directory: output_directory.to_owned(),
        template_directory: input,
        glob: "*.txt".to_owned(),
        preformatted: false,
        assume_utc: true,
        site: Some(SiteInfo {
            title: "Test Blog".to_owned(),
            url: Url::parse("https://example.com/blog/").unwrap(),
            description: "A test blog".to_owned(),
        }),
    }
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap_or_else(|e| panic!("reading {}: {}", name, e))
}

#[test]
fn test_build_writes_every_artifact() {
    let out = scratch_dir("artifacts");
    build_site(&config(&out)).unwrap();

    for name in &[
        "first-post.html",
        "20161231091857.html",
        "notes.html",
        "archive.html",
        "contents.html",
        "latest.html",
        "hashtags.html",
        "rss.xml",
    ] {
        assert!(out.join(name).is_file(), "missing output file {}", name);
    }
}

#[test]
fn test_post_pages_carry_extracted_titles() {
    let out = scratch_dir("titles");
    build_site(&config(&out)).unwrap();

    assert!(read(&out, "first-post.html").contains("<title>First Post</title>"));
    assert!(read(&out, "20161231091857.html").contains("<title>New Year Preparations</title>"));
    // No heading-like line in notes.txt, so the slug stands in.
    assert!(read(&out, "notes.html").contains("<title>notes</title>"));
}

#[test]
fn test_archive_is_chronological() {
    let out = scratch_dir("archive");
    build_site(&config(&out)).unwrap();

    let archive = read(&out, "archive.html");
    let first = archive.find("First Post").unwrap();
    let newyear = archive.find("New Year Preparations").unwrap();
    // Jan 2017 before Dec 2016: most recent first.
    assert!(first < newyear);
}

#[test]
fn test_contents_is_alphabetical() {
    let out = scratch_dir("contents");
    build_site(&config(&out)).unwrap();

    let contents = read(&out, "contents.html");
    let first = contents.find("First Post").unwrap();
    let newyear = contents.find("New Year Preparations").unwrap();
    let notes = contents.find("notes</a>").unwrap();
    assert!(first < newyear);
    assert!(newyear < notes);
}

#[test]
fn test_feed_excludes_guessed_dates() {
    let out = scratch_dir("feed");
    build_site(&config(&out)).unwrap();

    let rss = read(&out, "rss.xml");
    assert!(rss.contains("https://example.com/blog/first-post.html"));
    assert!(rss.contains("https://example.com/blog/20161231091857.html"));
    // notes.txt has no date evidence; its modification time is not authorial.
    assert!(!rss.contains("notes.html"));
}

#[test]
fn test_hashtag_buckets_group_posts() {
    let out = scratch_dir("hashtags");
    build_site(&config(&out)).unwrap();

    let hashtags = read(&out, "hashtags.html");
    assert!(hashtags.contains(r##"<h2 id="#newyear">#newyear</h2>"##));
    assert!(hashtags.contains(r##"<h2 id="#fireworks">#fireworks</h2>"##));

    // Both tagged posts appear under #newyear, newest first.
    let bucket_start = hashtags.find(r##"id="#newyear""##).unwrap();
    let bucket = &hashtags[bucket_start..];
    let first = bucket.find("first-post.html").unwrap();
    let newyear = bucket.find("20161231091857.html").unwrap();
    assert!(first < newyear);
}

#[test]
fn test_no_feed_without_site_identity() {
    let out = scratch_dir("nofeed");
    let mut config = config(&out);
    config.site = None;
    build_site(&config).unwrap();

    assert!(!out.join("rss.xml").exists());
    assert!(out.join("archive.html").is_file());
}

#[test]
fn test_rebuild_is_idempotent() {
    let out = scratch_dir("idempotent");
    build_site(&config(&out)).unwrap();

    let mut first_run = Vec::new();
    for entry in fs::read_dir(&out).unwrap() {
        let path = entry.unwrap().path();
        first_run.push((path.clone(), fs::read(&path).unwrap()));
    }

    build_site(&config(&out)).unwrap();
    for (path, bytes) in first_run {
        assert_eq!(fs::read(&path).unwrap(), bytes, "{} changed", path.display());
    }
}
