//! Override- and extraction-deck assembly.
//!
//! Both builders emit whole documents in the engine's deck grammar: one line
//! per card (`<id> <space-joined parameters>`), ids in ascending string
//! order, terminated by a line containing only `.`.

use crate::{CardId, CardTable, FigureSpec};
use std::fmt::Write;

/// First request-card id of an extraction deck; cards count up from here and
/// map 1:1, in emission order, onto the extraction run's output columns
/// (column 0 is the independent time axis).
const FIRST_REQUEST_ID: u32 = 1001;

fn serialize(cards: &CardTable) -> String {
    let mut out = String::new();
    for (id, params) in cards.iter() {
        out.push_str(id.as_str());
        for param in params {
            out.push(' ');
            out.push_str(param);
        }
        out.push('\n');
    }
    out.push_str(".\n");
    out
}

/// Is `id` a time-step/output-frequency control card (`2dd`)?
fn is_time_card(id: &CardId) -> bool {
    regex!(r"^2\d{2}$").is_match(id.as_str())
}

/// Build the override deck restarting the engine with `closure` re-applied.
///
/// The deck always carries the two fixed restart-control cards and every
/// time card of the current table; the closure is merged last and wins on
/// id collision.
pub fn restart_deck(table: &CardTable, closure: &CardTable) -> String {
    let mut cards = CardTable::new();
    cards.insert(CardId::from(100), vec!["restart".into(), "transnt".into()]);
    cards.insert(CardId::from(103), vec!["-1".into(), "rstplt".into()]);

    for (id, params) in table.iter() {
        if is_time_card(id) {
            cards.insert(id.clone(), params.clone());
        }
    }
    cards.absorb(closure);

    serialize(&cards)
}

/// Build the extraction deck requesting every figure channel in order.
///
/// One request card per (variable reference, label) pair across all figures,
/// ids sequential from 1001, each carrying the literal variable reference.
pub fn strip_deck(figures: &[FigureSpec]) -> String {
    let mut out = String::from("= stripping file\n100 strip\n103 0\n");
    let mut next_id = FIRST_REQUEST_ID;
    for fig in figures {
        for channel in &fig.channels {
            let _ = writeln!(out, "{next_id} {}", channel.request);
            next_id += 1;
        }
    }
    out.push_str(".\n");
    out
}
