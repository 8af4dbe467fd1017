use crate::error::Result;
use crate::{Deck, ParseReport, build, diff, expand, parser};
use std::time::{Duration, Instant};

pub use diff::RedrawPolicy;

/// Result from [`parse`]: the deck plus per-parse diagnostics.
#[derive(Debug, Clone)]
pub struct ParsedDeck {
    /// Card table and figure list.
    pub deck: Deck,
    /// Line accounting for the silent-skip contract.
    pub report: ParseReport,
    /// Total elapsed parse time.
    pub elapsed: Duration,
}

impl ParsedDeck {
    /// True when the deck specifies no figures at all, the state a caller
    /// should render explicitly ("no plots specified") instead of diffing.
    pub fn no_figures(&self) -> bool {
        self.deck.figures.is_empty()
    }
}

/// One polling cycle's verdict from [`update`].
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// Cards whose parameters changed, at their new values.
    pub changed: crate::CardTable,
    /// What the plotting side must do with the figure diff.
    pub redraw: RedrawPolicy,
    /// The override deck to restart the engine with, present iff any card
    /// changed.
    pub restart_deck: Option<String>,
}

/// Parse raw deck text.
///
/// # Example
/// ```
/// let out = redeck::parse("100 new transnt\n.\nCap, Power [W], rktpow 0\n");
/// assert_eq!(out.deck.cards.len(), 1);
/// assert_eq!(out.deck.figures.len(), 1);
/// ```
pub fn parse(text: &str) -> ParsedDeck {
    let start = Instant::now();
    let (deck, report) = parser::parse_deck(text);
    ParsedDeck { deck, report, elapsed: start.elapsed() }
}

/// Run one diff -> expand -> build cycle over two successive parses.
///
/// Fails with a [`crate::StructuralError`] when the card structure changed
/// (the caller must abort the restart cycle). Otherwise returns the changed
/// set, the figure redraw policy, and, when anything changed, a complete
/// override deck built from the dependency closure of the changed cards over
/// the *current* table.
pub fn update(prev: &Deck, curr: &Deck) -> Result<UpdateOutcome> {
    let changed = diff::diff_cards(&prev.cards, &curr.cards)?;
    let redraw = diff::diff_figures(&prev.figures, &curr.figures);

    let restart_deck = if changed.is_empty() {
        None
    } else {
        let closure = expand::expand(&curr.cards, &changed);
        Some(build::restart_deck(&curr.cards, &closure))
    };

    Ok(UpdateOutcome { changed, redraw, restart_deck })
}

/// Build the extraction deck for the current figure list.
pub fn extraction_deck(deck: &Deck) -> String {
    build::strip_deck(&deck.figures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StructuralError;
    use pretty_assertions::assert_eq;

    const BASE_DECK: &str = "\
= small test model
100 new transnt
103 0
201 50.0 1.0e-6 0.01 3 100 2000 10000
20500000 100
20517300 sum 1.0 0.0 1
20517310 0.5 cntrlvar 172
30000101 1.0
.
Caption1, Power [W], rktpow 0, Reactor Power
Caption2, Level [m], cntrlvar 172
";

    #[test]
    fn parse_reports_both_sections() {
        let out = parse(BASE_DECK);
        assert_eq!(out.deck.cards.len(), 7);
        assert_eq!(out.deck.figures.len(), 2);
        assert_eq!(out.report.card_lines, 7);
        assert_eq!(out.report.figure_lines, 2);
        assert_eq!(out.report.skipped_lines, 1); // the title line
        assert!(!out.no_figures());
    }

    #[test]
    fn unchanged_deck_produces_no_restart() {
        let deck = parse(BASE_DECK).deck;
        let outcome = update(&deck, &deck.clone()).unwrap();
        assert!(outcome.changed.is_empty());
        assert_eq!(outcome.redraw, RedrawPolicy::NoChange);
        assert_eq!(outcome.restart_deck, None);
    }

    #[test]
    fn edited_card_yields_a_dependency_complete_override_deck() {
        let prev = parse(BASE_DECK).deck;
        let curr = parse(&BASE_DECK.replace("20517300 sum 1.0 0.0 1", "20517300 sum 2.0 0.0 1")).deck;

        let outcome = update(&prev, &curr).unwrap();
        assert_eq!(outcome.changed.len(), 1);

        let deck = outcome.restart_deck.expect("restart deck");
        assert_eq!(
            deck,
            "100 restart transnt\n\
             103 -1 rstplt\n\
             201 50.0 1.0e-6 0.01 3 100 2000 10000\n\
             20517300 sum 2.0 0.0 1\n\
             20517310 0.5 cntrlvar 172\n\
             .\n"
        );
    }

    #[test]
    fn structural_edit_aborts_the_cycle() {
        let prev = parse(BASE_DECK).deck;
        let grown = parse(&BASE_DECK.replace("30000101 1.0\n", "30000101 1.0\n30000102 2.0\n")).deck;
        assert_eq!(update(&prev, &grown).unwrap_err(), StructuralError::CardsAdded { prev: 7, curr: 8 });

        let shrunk = parse(&BASE_DECK.replace("30000101 1.0\n", "")).deck;
        assert_eq!(update(&prev, &shrunk).unwrap_err(), StructuralError::CardsRemoved { prev: 7, curr: 6 });
    }

    #[test]
    fn figure_growth_is_append_and_does_not_restart() {
        let prev = parse(BASE_DECK).deck;
        let curr = parse(&format!("{BASE_DECK}Caption3, Flow [kg/s], mflowj 505000000\n")).deck;
        let outcome = update(&prev, &curr).unwrap();
        assert_eq!(outcome.redraw, RedrawPolicy::Append);
        assert_eq!(outcome.restart_deck, None);
    }

    #[test]
    fn extraction_deck_follows_figure_order() {
        let deck = parse(BASE_DECK).deck;
        assert_eq!(
            extraction_deck(&deck),
            "= stripping file\n\
             100 strip\n\
             103 0\n\
             1001 rktpow 0\n\
             1002 cntrlvar 172\n\
             .\n"
        );
    }
}
