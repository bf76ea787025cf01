// Command-line interface for wikivert
//
// Reads a Parsoid-annotated HTML document and prints the wikitext it
// serializes to. The interesting options mirror the library:
//
//  wikivert page.html                                  - full serialization
//  wikivert page.html --selser --original page.wt      - selective serialization
//  wikivert page.html --scrub-wikitext -o page.wt      - write to a file
//
// Configuration is layered: embedded defaults, then an optional
// wikivert.toml (via --config), then explicit flags. The serializer itself
// never appends a trailing newline; the CLI adds one when writing to a
// terminal (configurable via output.trailing_newline).

use clap::{Arg, ArgAction, Command, ValueHint};
use std::fs;
use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use wikivert::{Env, SerializeOptions};
use wikivert_config::{Loader, TrailingNewline, WikivertConfig};

fn build_cli() -> Command {
    Command::new("wikivert")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Serialize annotated wiki HTML back to wikitext")
        .long_about(
            "wikivert converts the annotated HTML DOM a round-trip-aware wiki\n\
            parser produces back into wikitext.\n\n\
            Modes:\n  \
            - full: re-emit the whole document from the DOM\n  \
            - selser: reuse original source bytes for unmodified subtrees\n    \
            (pass --selser together with --original)\n\n\
            Examples:\n  \
            wikivert page.html                              # wikitext on stdout\n  \
            wikivert page.html --selser --original page.wt  # minimal diffs\n  \
            wikivert page.html -o page.wt                   # write to a file",
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Path to the annotated HTML document")
                .required(true)
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("selser")
                .long("selser")
                .help("Selective serialization (requires --original)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("original")
                .long("original")
                .value_name("FILE")
                .help("Original wikitext source of the page")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("scrub-wikitext")
                .long("scrub-wikitext")
                .help("Drop whitespace whose only effect was an accidental indent-pre")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write wikitext to a file instead of stdout")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a wikivert.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
}

fn load_config(matches: &clap::ArgMatches) -> Result<WikivertConfig, String> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    } else {
        loader = loader.with_optional_file("wikivert.toml");
    }
    if matches.get_flag("selser") {
        loader = loader
            .set_override("serialize.selser", true)
            .map_err(|e| e.to_string())?;
    }
    if matches.get_flag("scrub-wikitext") {
        loader = loader
            .set_override("serialize.scrub_wikitext", true)
            .map_err(|e| e.to_string())?;
    }
    loader.build().map_err(|e| e.to_string())
}

fn run() -> Result<(), String> {
    let matches = build_cli().get_matches();
    let config = load_config(&matches)?;

    let input_path = matches
        .get_one::<String>("input")
        .expect("input is a required argument");
    let html = fs::read_to_string(input_path)
        .map_err(|e| format!("cannot read {input_path}: {e}"))?;

    let options: SerializeOptions = (&config.serialize).into();
    if options.selser && matches.get_one::<String>("original").is_none() {
        return Err("--selser requires --original <FILE>".to_string());
    }

    let mut env = Env::new(options);
    if let Some(original_path) = matches.get_one::<String>("original") {
        let original = fs::read_to_string(original_path)
            .map_err(|e| format!("cannot read {original_path}: {e}"))?;
        env = env.with_page_src(original);
    }

    let wikitext = wikivert::html_to_wikitext(&html, &env).map_err(|e| e.to_string())?;

    match matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, &wikitext).map_err(|e| format!("cannot write {path}: {e}"))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(wikitext.as_bytes())
                .map_err(|e| e.to_string())?;
            let newline = match config.output.trailing_newline {
                TrailingNewline::Always => true,
                TrailingNewline::Never => false,
                TrailingNewline::Auto => stdout.is_terminal(),
            };
            if newline {
                handle.write_all(b"\n").map_err(|e| e.to_string())?;
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("wikivert: {message}");
            ExitCode::FAILURE
        }
    }
}
