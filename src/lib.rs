extern crate self as redeck;

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

#[macro_use]
mod macros;
mod api;
mod build;
mod diff;
mod error;
mod expand;
mod parser;

pub use api::{ParsedDeck, UpdateOutcome, extraction_deck, parse, update};
pub use build::{restart_deck, strip_deck};
pub use diff::{RedrawPolicy, diff_cards, diff_figures};
pub use error::{Result, StructuralError};
pub use expand::{CnvWidth, FamilyMask, control_variable_width, expand, families_of};
pub use parser::{ParseReport, parse_deck};

// --- Core data model --------------------------------------------------------

/// A card identifier: one or more ASCII digits.
///
/// The engine's deck grammar attaches no type to an id beyond its digit
/// string; the *length and leading digits* decide which component family a
/// card belongs to (see `expand`). Ids order and compare as plain strings,
/// which is also the serialization order of built decks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardId(String);

impl CardId {
    /// Create an id from a digit string. Returns `None` unless `s` is one or
    /// more ASCII digits.
    pub fn new(s: &str) -> Option<Self> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) { Some(CardId(s.to_string())) } else { None }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits. Ids are ASCII, so bytes == digits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The leading `n` digits, or the whole id if it is shorter.
    pub fn leading(&self, n: usize) -> &str {
        &self.0[..self.0.len().min(n)]
    }
}

impl From<u32> for CardId {
    fn from(n: u32) -> Self {
        CardId(n.to_string())
    }
}

impl Borrow<str> for CardId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered card store: id -> parameter tokens.
///
/// Re-inserting an id overwrites the previous entry; keys are unique by
/// construction. Iteration is in ascending string order of the ids, which is
/// also the order built decks are serialized in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardTable {
    cards: BTreeMap<CardId, Vec<String>>,
}

impl CardTable {
    pub fn new() -> Self {
        CardTable { cards: BTreeMap::new() }
    }

    /// Insert a card, replacing any existing entry for the same id.
    pub fn insert(&mut self, id: CardId, params: Vec<String>) {
        self.cards.insert(id, params);
    }

    pub fn get(&self, id: &str) -> Option<&Vec<String>> {
        self.cards.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate cards in ascending string order of their ids.
    pub fn iter(&self) -> impl Iterator<Item = (&CardId, &Vec<String>)> {
        self.cards.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &CardId> {
        self.cards.keys()
    }

    /// Copy every card of `other` into `self`, overwriting on id collision.
    pub fn absorb(&mut self, other: &CardTable) {
        for (id, params) in other.iter() {
            self.cards.insert(id.clone(), params.clone());
        }
    }
}

impl FromIterator<(CardId, Vec<String>)> for CardTable {
    fn from_iter<T: IntoIterator<Item = (CardId, Vec<String>)>>(iter: T) -> Self {
        CardTable { cards: iter.into_iter().collect() }
    }
}

/// One requested time-series channel of a figure: the engine variable
/// reference (e.g. `cntrlvar 172`) and an optional display label.
///
/// A trailing variable reference without a label is legal in the figure
/// grammar; such a channel is plotted unlabeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub request: String,
    pub label: Option<String>,
}

/// One figure specification from the deck's figure section.
///
/// Figure order in the deck is meaningful: it determines plot numbering and
/// the column order of the extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureSpec {
    pub caption: String,
    pub y_label: String,
    pub channels: Vec<Channel>,
}

/// A parsed deck: the card table plus the ordered figure list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    pub cards: CardTable,
    pub figures: Vec<FigureSpec>,
}

pub(crate) fn debug_enabled() -> bool {
    std::env::var_os("REDECK_DEBUG_DECK").is_some()
}
