//! Heuristic metadata extraction for plain-text posts. Posts carry no
//! mandatory front matter; instead the title, publication date, and hashtags
//! are recovered from the body text by pattern matching, with a cascade of
//! fallbacks (filename-encoded date, then file modification time) so that
//! every post ends up with a non-empty title and a populated date.

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

/// Every Unicode line-break form. Input is split on any of these, and empty
/// segments are skipped, so the scan sees one logical line at a time.
const LINE_BREAKS: &[char] = &[
    '\u{000A}', '\u{000B}', '\u{000C}', '\u{000D}', '\u{0085}', '\u{2028}', '\u{2029}',
];

lazy_static! {
    /// A markdown-heading-like line: optional `#` markers, at least one word
    /// token, optional trailing `#` markers.
    static ref TITLE_LINE: Regex = Regex::new(r"\s*#*\s+\w+\s*#*\s*").unwrap();

    /// `#word` tokens preceded by start-of-line, whitespace, or a comma.
    static ref HASHTAG: Regex = Regex::new(r"(?:^|\s|,)(#\w+)").unwrap();

    /// A UnixDate-style timestamp, e.g. "Sat Dec 31 09:18:57 EST 2016" or
    /// "Sun Jan  1 07:56:01 EST 2017" (single-digit days are space-padded).
    static ref DATE_LINE: Regex = Regex::new(
        r"[MTWFS][ouehrau][neduitn] [JFMASOND][aepuco][nbrylgptvc]\s{1,2}\d{1,2} [0-2]\d:[0-5][0-9]:[0-5][0-9] [A-Z]{3} \d{4}",
    )
    .unwrap();

    /// A filename-encoded date: "20161231" or "20161231091857".
    static ref FILE_DATE: Regex = Regex::new(r"\d{4}[01]\d[0-3]\d([01]\d[0-5]\d[0-5]\d)?").unwrap();
}

/// The layout of an explicit date-line match. `%Z` skips the zone name
/// during parsing; the instant is taken as UTC.
const DATE_LINE_FORMAT: &str = "%a %b %e %H:%M:%S %Z %Y";

/// The layout of a filename-date match after zero-padding to 14 digits.
const FILE_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// The metadata recovered for one post. After [`extract`] completes, `title`
/// is non-empty and `date` is populated; `date_is_firm` records whether the
/// date came from explicit evidence (body text or filename) rather than the
/// file modification time.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub date: DateTime<Utc>,
    pub date_is_firm: bool,
    pub hashtags: Vec<String>,
}

/// Intermediate result of the line scan, before the fallback cascade runs.
#[derive(Debug, Default)]
struct Scan {
    title: String,
    date: Option<DateTime<Utc>>,
    date_is_firm: bool,
    hashtags: Vec<String>,
}

/// Extracts a [`Metadata`] record from a post's raw text.
///
/// * `raw` is the unconverted body text.
/// * `slug` is the input filename without its extension; it doubles as the
///   title fallback and may embed a numeric date.
/// * `modified` is the file's modification time, the date of last resort.
/// * `assume_utc` selects UTC over local time when interpreting
///   filename-encoded dates, which carry no zone of their own.
pub fn extract(raw: &str, slug: &str, modified: DateTime<Utc>, assume_utc: bool) -> Metadata {
    let mut scan = scan_lines(raw);

    if scan.title.is_empty() {
        scan.title = slug.to_owned();
    }
    if scan.date.is_none() {
        if let Some(date) = date_from_slug(slug, assume_utc) {
            scan.date = Some(date);
            scan.date_is_firm = true;
        }
    }

    let (date, date_is_firm) = match scan.date {
        Some(date) => (date, scan.date_is_firm),
        None => (modified, false),
    };

    Metadata {
        title: scan.title,
        date,
        date_is_firm,
        hashtags: scan.hashtags,
    }
}

/// Scans each logical line for a title, hashtags, and an explicit date. The
/// first matching title line and the first parseable date line win; for
/// hashtags the *last* matching line wins, replacing any list found earlier.
fn scan_lines(raw: &str) -> Scan {
    let mut scan = Scan::default();

    for line in raw.split(LINE_BREAKS).filter(|l| !l.is_empty()) {
        if scan.title.is_empty() && TITLE_LINE.is_match(line) {
            scan.title = line.trim_matches(|c| c == ' ' || c == '#').to_owned();
        }

        if HASHTAG.is_match(line) {
            // Replaces, not extends: a later tag line discards the earlier
            // extraction result.
            scan.hashtags = HASHTAG
                .captures_iter(line)
                .map(|captures| captures[1].trim().to_owned())
                .collect();
        }

        if scan.date.is_none() {
            if let Some(found) = DATE_LINE.find(line) {
                match NaiveDateTime::parse_from_str(found.as_str().trim(), DATE_LINE_FORMAT) {
                    Ok(naive) => {
                        scan.date = Some(Utc.from_utc_datetime(&naive));
                        scan.date_is_firm = true;
                    }
                    Err(err) => warn!(line, %err, "date-like line failed to parse; skipping"),
                }
            }
        }
    }

    scan
}

/// Recovers a date from a filename-encoded `YYYYMMDD` or `YYYYMMDDHHMMSS`
/// pattern. The matched digits are zero-padded on the right to 14 before
/// parsing, so a date-only filename means midnight.
fn date_from_slug(slug: &str, assume_utc: bool) -> Option<DateTime<Utc>> {
    let found = FILE_DATE.find(slug)?;
    let mut digits = found.as_str().to_owned();
    while digits.len() < 14 {
        digits.push('0');
    }
    match NaiveDateTime::parse_from_str(&digits, FILE_DATE_FORMAT) {
        Ok(naive) => Some(resolve_zone(naive, assume_utc)),
        Err(err) => {
            warn!(slug, %err, "filename date failed to parse; falling back to modification time");
            None
        }
    }
}

/// Interprets a zoneless timestamp in UTC or local time per the `-z` flag.
/// Nonexistent local times (DST gaps) degrade to UTC.
fn resolve_zone(naive: NaiveDateTime, assume_utc: bool) -> DateTime<Utc> {
    if assume_utc {
        return Utc.from_utc_datetime(&naive);
    }
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(date) => date.with_timezone(&Utc),
        LocalResult::Ambiguous(date, _) => date.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn modified() -> DateTime<Utc> {
        Utc.ymd(2020, 6, 1).and_hms(12, 0, 0)
    }

    fn fixture(raw: &str, slug: &str) -> Metadata {
        extract(raw, slug, modified(), true)
    }

    #[test]
    fn test_title_from_heading_line() {
        let meta = fixture("# Hello World\n\nbody text", "hello");
        assert_eq!(meta.title, "Hello World");
    }

    #[test]
    fn test_title_trims_trailing_markers() {
        let meta = fixture("## Hello World ##", "hello");
        assert_eq!(meta.title, "Hello World");
    }

    #[test]
    fn test_title_first_match_wins() {
        let meta = fixture("# First Title\n# Second Title", "hello");
        assert_eq!(meta.title, "First Title");
    }

    #[test]
    fn test_title_falls_back_to_slug() {
        let meta = fixture("nothing\n", "20161231");
        assert_eq!(meta.title, "20161231");
    }

    #[test]
    fn test_hashtags_in_order_of_appearance() {
        let meta = fixture("text #rust and #blog, #meta", "hello");
        assert_eq!(meta.hashtags, vec!["#rust", "#blog", "#meta"]);
    }

    #[test]
    fn test_hashtags_last_line_replaces_earlier() {
        // A later tag line replaces the earlier list wholesale.
        let meta = fixture("#one #two\nplain line\n#three", "hello");
        assert_eq!(meta.hashtags, vec!["#three"]);
    }

    #[test]
    fn test_hashtags_require_boundary() {
        let meta = fixture("not#a-tag but #real", "hello");
        assert_eq!(meta.hashtags, vec!["#real"]);
    }

    #[test]
    fn test_heading_marker_is_not_a_hashtag() {
        let meta = fixture("# Hello World", "hello");
        assert!(meta.hashtags.is_empty());
    }

    #[test]
    fn test_explicit_date_is_firm() {
        let meta = fixture("Sat Dec 31 09:18:57 EST 2016", "hello");
        assert!(meta.date_is_firm);
        assert_eq!(meta.date, Utc.ymd(2016, 12, 31).and_hms(9, 18, 57));
    }

    #[test]
    fn test_explicit_date_space_padded_day() {
        let meta = fixture("Sun Jan  1 07:56:01 EST 2017", "hello");
        assert_eq!(meta.date, Utc.ymd(2017, 1, 1).and_hms(7, 56, 1));
    }

    #[test]
    fn test_explicit_date_first_match_wins() {
        let meta = fixture(
            "Sat Dec 31 09:18:57 EST 2016\nSun Jan  1 07:56:01 EST 2017",
            "hello",
        );
        assert_eq!(meta.date, Utc.ymd(2016, 12, 31).and_hms(9, 18, 57));
    }

    #[test]
    fn test_malformed_date_line_is_skipped() {
        // Matches the date pattern (hour 29) but fails to parse; extraction
        // continues and the modification time takes over.
        let meta = fixture("Sat Dec 31 29:18:57 EST 2016", "hello");
        assert!(!meta.date_is_firm);
        assert_eq!(meta.date, modified());
    }

    #[test]
    fn test_filename_date_full_precision() {
        let meta = fixture("no date here", "20161231091857");
        assert!(meta.date_is_firm);
        assert_eq!(meta.date, Utc.ymd(2016, 12, 31).and_hms(9, 18, 57));
    }

    #[test]
    fn test_filename_date_padded_to_midnight() {
        let meta = fixture("no date here", "20170101");
        assert!(meta.date_is_firm);
        assert_eq!(meta.date, Utc.ymd(2017, 1, 1).and_hms(0, 0, 0));
    }

    #[test]
    fn test_body_date_beats_filename_date() {
        let meta = fixture("Sat Dec 31 09:18:57 EST 2016", "20170101");
        assert_eq!(meta.date, Utc.ymd(2016, 12, 31).and_hms(9, 18, 57));
    }

    #[test]
    fn test_modification_time_is_not_firm() {
        let meta = fixture("just a body", "hello");
        assert!(!meta.date_is_firm);
        assert_eq!(meta.date, modified());
    }
}
