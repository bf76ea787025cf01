use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the CLI from src/main.rs. Build scripts can't access src/
// modules, so the definition is duplicated here for completion generation.
fn completion_cli() -> Command {
    Command::new("wikivert")
        .about("Serialize annotated wiki HTML back to wikitext")
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

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = completion_cli();
    generate_to(Bash, &mut cmd, "wikivert", &outdir)?;
    generate_to(Zsh, &mut cmd, "wikivert", &outdir)?;
    generate_to(Fish, &mut cmd, "wikivert", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
