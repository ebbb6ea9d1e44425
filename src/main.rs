use clap::{App, Arg};
use quill::config::{Config, Flags};
use std::path::PathBuf;

fn main() {
    let matches = App::new("quill")
        .about("A small static site generator for loosely-structured plain-text posts")
        .arg(
            Arg::with_name("input")
                .value_name("INPUT_DIR")
                .help("Input directory of post files (defaults to the current directory)"),
        )
        .arg(
            Arg::with_name("description")
                .short("d")
                .value_name("DESC")
                .help("Description of the site. Required to produce the RSS feed."),
        )
        .arg(
            Arg::with_name("debug")
                .long("debug")
                .help("Write debug info to stderr"),
        )
        .arg(
            Arg::with_name("glob")
                .short("g")
                .value_name("GLOB")
                .help("File glob pattern of input files [default: *.txt]"),
        )
        .arg(
            Arg::with_name("templates")
                .short("l")
                .value_name("DIR")
                .help("Directory for template files (defaults to the input directory)"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .value_name("DIR")
                .help("Output directory (defaults to the input directory)"),
        )
        .arg(
            Arg::with_name("preformatted")
                .short("p")
                .help("Leave input as preformatted text; don't process it as Markdown"),
        )
        .arg(
            Arg::with_name("title")
                .short("t")
                .value_name("TITLE")
                .help("Title of the site, like 'My Blog'. Required to produce the RSS feed."),
        )
        .arg(
            Arg::with_name("url")
                .short("u")
                .value_name("URL")
                .help("URL of the site, like 'https://example.com/blog/'. Required to produce the RSS feed."),
        )
        .arg(
            Arg::with_name("utc")
                .short("z")
                .help("For dates with unknown time zones, assume UTC rather than local time"),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_max_level(if matches.is_present("debug") {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let flags = Flags {
        input_directory: matches.value_of("input").map(PathBuf::from),
        output_directory: matches.value_of("output").map(PathBuf::from),
        template_directory: matches.value_of("templates").map(PathBuf::from),
        glob: matches.value_of("glob").map(str::to_owned),
        preformatted: matches.is_present("preformatted"),
        assume_utc: matches.is_present("utc"),
        site_title: matches.value_of("title").map(str::to_owned),
        site_url: matches.value_of("url").map(str::to_owned),
        site_description: matches.value_of("description").map(str::to_owned),
    };

    let config = match Config::resolve(flags) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("quill: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = quill::build::build_site(&config) {
        eprintln!("quill: {}", err);
        std::process::exit(1);
    }
}
