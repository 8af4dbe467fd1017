use redeck::{ParsedDeck, RedrawPolicy, parse, update};
use std::fs;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    match run(config) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

enum Mode {
    /// Parse one deck and print the line accounting.
    Report(String),
    /// List cards changed between two parses.
    Diff(String, String),
    /// Emit the override deck for the changes between two parses.
    Restart(String, String),
    /// Emit the extraction deck for one deck's figure list.
    Strip(String),
}

struct CliConfig {
    mode: Mode,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut args = std::env::args().skip(1);

    let mode = match args.next().as_deref() {
        Some("-h") | Some("--help") | None => {
            print_help();
            std::process::exit(0);
        }
        Some("-V") | Some("--version") => {
            println!("redeck {}", env!("CARGO_PKG_VERSION"));
            std::process::exit(0);
        }
        Some("--report") => Mode::Report(expect_path(&mut args, "--report")?),
        Some("--diff") => Mode::Diff(expect_path(&mut args, "--diff")?, expect_path(&mut args, "--diff")?),
        Some("--restart") => Mode::Restart(expect_path(&mut args, "--restart")?, expect_path(&mut args, "--restart")?),
        Some("--strip") => Mode::Strip(expect_path(&mut args, "--strip")?),
        Some(other) => return Err(format!("error: unknown option '{other}' (try --help)")),
    };

    if let Some(extra) = args.next() {
        return Err(format!("error: unexpected argument '{extra}'"));
    }
    Ok(CliConfig { mode })
}

fn expect_path(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("error: {flag} expects a deck path"))
}

fn load(path: &str) -> Result<ParsedDeck, String> {
    let text = fs::read_to_string(path).map_err(|err| format!("cannot read {path}: {err}"))?;
    let out = parse(&text);
    if out.deck.cards.is_empty() && out.report.skipped_lines > 0 {
        eprintln!("warning: {path}: no cards parsed, {} lines skipped", out.report.skipped_lines);
    }
    Ok(out)
}

fn run(config: CliConfig) -> Result<(), String> {
    match config.mode {
        Mode::Report(path) => {
            let out = load(&path)?;
            println!(
                "cards: {} ({} lines)  figures: {}  skipped lines: {}",
                out.deck.cards.len(),
                out.report.card_lines,
                out.deck.figures.len(),
                out.report.skipped_lines
            );
            if out.no_figures() {
                println!("no plots specified");
            }
        }
        Mode::Diff(prev_path, curr_path) => {
            let prev = load(&prev_path)?;
            let curr = load(&curr_path)?;
            let outcome = update(&prev.deck, &curr.deck).map_err(|err| err.to_string())?;
            for (id, params) in outcome.changed.iter() {
                println!("{id} = {}", params.join(" "));
            }
            match outcome.redraw {
                RedrawPolicy::NoChange => {}
                RedrawPolicy::Append => println!("figures: redraw (append)"),
                RedrawPolicy::Reset => println!("figures: reset"),
            }
        }
        Mode::Restart(prev_path, curr_path) => {
            let prev = load(&prev_path)?;
            let curr = load(&curr_path)?;
            let outcome = update(&prev.deck, &curr.deck).map_err(|err| err.to_string())?;
            match outcome.restart_deck {
                Some(deck) => print!("{deck}"),
                None => return Err("no cards changed; nothing to restart".to_string()),
            }
        }
        Mode::Strip(path) => {
            let out = load(&path)?;
            print!("{}", redeck::extraction_deck(&out.deck));
        }
    }
    Ok(())
}

fn print_help() {
    println!(
        "redeck - restart/extraction deck builder for simulation input decks

USAGE:
    redeck --report  <deck>          parse a deck and print line accounting
    redeck --diff    <prev> <curr>   list cards changed between two decks
    redeck --restart <prev> <curr>   emit the override deck on stdout
    redeck --strip   <deck>          emit the extraction deck on stdout

OPTIONS:
    -h, --help       print this help
    -V, --version    print version

Set REDECK_DEBUG_DECK=1 to trace skipped lines and prefix resolution."
    );
}
