//! Error types for redeck.

use crate::CardId;
use thiserror::Error;

/// Result type alias using [`StructuralError`].
pub type Result<T> = std::result::Result<T, StructuralError>;

/// Fatal diff outcomes: the deck's card structure changed between parses.
///
/// Structural edits (adding or removing cards) cannot be expressed as an
/// override deck, so the calling workflow must abort the restart cycle when
/// one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructuralError {
    #[error("cards were added to the deck ({prev} -> {curr}); structural edits are not supported")]
    CardsAdded { prev: usize, curr: usize },

    #[error("cards were removed from the deck ({prev} -> {curr}); structural edits are not supported")]
    CardsRemoved { prev: usize, curr: usize },

    #[error("card {id} was replaced by a card with a different id; structural edits are not supported")]
    CardReplaced { id: CardId },
}
