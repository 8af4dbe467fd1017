//! Deck parsing.
//!
//! A deck is line-oriented and split in two by a boundary line whose first
//! non-space character is `.`:
//!
//! ```text
//! * problem setup                      <- comment, ignored
//! 100  new  transnt                    <- card: id 100, two parameters
//! 20500000 9999                        <- card: control-variable format flag
//! .                                    <- end of card section
//! Caption1, Power [W], rktpow 0, Core  <- figure specification
//! ```
//!
//! Card lines start with a digit and are tokenized on runs of whitespace
//! and/or commas; the first token is the card id, the rest are its parameter
//! tokens (position carries the meaning: the engine interprets them by slot).
//! Figure lines start with an alphanumeric character and are split on
//! comma-plus-whitespace so captions and labels may contain internal spaces.
//!
//! Both kinds of line are truncated at the first `*` or `$` comment marker
//! that starts the line or follows whitespace.
//!
//! ## Silent skip
//!
//! Lines matching neither grammar are dropped without error: deck authors
//! rely on free-form comment and title lines, and the engine itself ignores
//! them. The [`ParseReport`] counts accepted and dropped lines so a caller
//! can notice an unexpectedly empty parse; `REDECK_DEBUG_DECK=1` traces each
//! dropped line.

use crate::{CardId, CardTable, Channel, Deck, FigureSpec, debug_enabled};

/// Per-parse line accounting. The diagnostic companion to the no-throw
/// parsing contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Card lines accepted into the table (counted before duplicate-id
    /// overwrite, so this can exceed the table's cardinality).
    pub card_lines: usize,
    /// Figure lines accepted into the figure list.
    pub figure_lines: usize,
    /// Non-blank lines that matched neither grammar and were dropped.
    pub skipped_lines: usize,
}

/// Parse raw deck text into a card table and figure list.
///
/// Never fails: unmatched lines are skipped and counted in the report.
/// A duplicate card id overwrites the earlier entry.
pub fn parse_deck(text: &str) -> (Deck, ParseReport) {
    let mut deck = Deck::default();
    let mut report = ParseReport::default();
    let mut in_figures = false;

    for raw in text.lines() {
        // Kills carriage-return artifacts from CRLF decks as well.
        let line = raw.trim_end();
        let body = line.trim_start();
        if body.is_empty() {
            continue;
        }

        let first = body.chars().next().unwrap_or(' ');

        if !in_figures {
            if first == '.' {
                in_figures = true;
            } else if first.is_ascii_digit() {
                match parse_card_line(body) {
                    Some((id, params)) => {
                        deck.cards.insert(id, params);
                        report.card_lines += 1;
                    }
                    None => skip(&mut report, line),
                }
            } else {
                skip(&mut report, line);
            }
        } else if first.is_ascii_alphanumeric() {
            match parse_figure_line(body) {
                Some(fig) => {
                    deck.figures.push(fig);
                    report.figure_lines += 1;
                }
                None => skip(&mut report, line),
            }
        } else {
            skip(&mut report, line);
        }
    }

    (deck, report)
}

fn skip(report: &mut ParseReport, line: &str) {
    report.skipped_lines += 1;
    if debug_enabled() {
        eprintln!("[parse_deck] skipped line: {line:?}");
    }
}

/// Truncate `line` at the first `*` or `$` comment marker that starts the
/// line or follows whitespace.
fn strip_comment(line: &str) -> &str {
    match regex!(r"(?:^|\s)[*$]").find(line) {
        Some(m) => line[..m.start()].trim_end(),
        None => line,
    }
}

/// `<id> <param> <param> ...` with whitespace/comma separators. Returns
/// `None` when the id token is not a pure digit string.
fn parse_card_line(body: &str) -> Option<(CardId, Vec<String>)> {
    let mut tokens = regex!(r"[\s,]+").split(strip_comment(body)).filter(|t| !t.is_empty());
    let id = CardId::new(tokens.next()?)?;
    Some((id, tokens.map(str::to_string).collect()))
}

/// `caption, y-label[, var ref, display label]...` split on comma plus
/// whitespace. Requires at least the caption and y-label fields; a trailing
/// variable reference without a label is kept with `label: None`.
fn parse_figure_line(body: &str) -> Option<FigureSpec> {
    let stripped = strip_comment(body);
    let fields: Vec<&str> = regex!(r",\s+").split(stripped).map(str::trim).collect();
    if fields.len() < 2 {
        return None;
    }

    let channels = fields[2..]
        .chunks(2)
        .map(|pair| Channel { request: pair[0].to_string(), label: pair.get(1).map(|s| s.to_string()) })
        .collect();

    Some(FigureSpec { caption: fields[0].to_string(), y_label: fields[1].to_string(), channels })
}

/// Parse only the card section of `text` (convenience for tests and round
/// trips over built decks, which carry no figure section).
pub(crate) fn parse_cards(text: &str) -> CardTable {
    let (deck, _) = parse_deck(text);
    deck.cards
}
