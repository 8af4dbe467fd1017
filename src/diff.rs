//! Incremental deck comparison.
//!
//! Successive parses of the editable deck are compared pairwise: the card
//! tables yield the changed-card set driving the restart pipeline, and the
//! figure lists yield a redraw policy for the plotting collaborator.
//!
//! Outcomes are explicit return values, never shared flags: a structural
//! verdict is a [`StructuralError`], a figure verdict is a [`RedrawPolicy`].

use crate::error::{Result, StructuralError};
use crate::{CardTable, FigureSpec, debug_enabled};

/// What the plotting side must do after a figure-list diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawPolicy {
    /// Figure lists are identical; keep all plot state.
    NoChange,
    /// Figures were added or edited in place; redraw over existing state.
    Append,
    /// Figures were removed; discard all prior plot state and start over.
    Reset,
}

/// Compare two card tables and return the cards whose parameter sequence
/// changed, keyed by id and carrying the *new* values.
///
/// A change in cardinality means the deck was structurally edited (cards
/// added or removed), which cannot be expressed as an override deck; the
/// caller must abort the restart cycle. The same holds for an id present in
/// one table but not the other even at equal cardinality.
pub fn diff_cards(prev: &CardTable, curr: &CardTable) -> Result<CardTable> {
    if curr.len() > prev.len() {
        return Err(StructuralError::CardsAdded { prev: prev.len(), curr: curr.len() });
    }
    if curr.len() < prev.len() {
        return Err(StructuralError::CardsRemoved { prev: prev.len(), curr: curr.len() });
    }

    let mut changed = CardTable::new();
    for (id, old_params) in prev.iter() {
        match curr.get(id.as_str()) {
            Some(new_params) if new_params != old_params => {
                changed.insert(id.clone(), new_params.clone());
            }
            Some(_) => {}
            None => return Err(StructuralError::CardReplaced { id: id.clone() }),
        }
    }

    if debug_enabled() && !changed.is_empty() {
        for (id, params) in changed.iter() {
            eprintln!("[diff_cards] changed {id} = {params:?}");
        }
    }
    Ok(changed)
}

/// Compare two figure lists.
///
/// Growth and in-place edits are additive (existing plots survive); shrinkage
/// resets all plot state. An *empty previous list* is the distinguished
/// "nothing specified" state: callers observe it on the parse result itself
/// and render it explicitly, it is not encoded here.
pub fn diff_figures(prev: &[FigureSpec], curr: &[FigureSpec]) -> RedrawPolicy {
    if curr.len() > prev.len() {
        return RedrawPolicy::Append;
    }
    if curr.len() < prev.len() {
        return RedrawPolicy::Reset;
    }
    if prev.iter().zip(curr).any(|(a, b)| a != b) { RedrawPolicy::Append } else { RedrawPolicy::NoChange }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_cards;
    use crate::{Channel, FigureSpec};

    fn fig(caption: &str, n_channels: usize) -> FigureSpec {
        FigureSpec {
            caption: caption.to_string(),
            y_label: "Power [W]".to_string(),
            channels: (0..n_channels)
                .map(|i| Channel { request: format!("rktpow {i}"), label: None })
                .collect(),
        }
    }

    #[test]
    fn identical_tables_diff_to_empty_set() {
        let table = parse_cards("100 new transnt\n201 0.0 100.0 1.0e-6\n20500000 9999\n");
        let changed = diff_cards(&table, &table).unwrap();
        assert!(changed.is_empty());
    }

    #[test]
    fn changed_cards_carry_new_values() {
        let prev = parse_cards("100 new transnt\n201 0.0 100.0\n301 rktpow 0\n");
        let curr = parse_cards("100 new transnt\n201 0.0 250.0\n301 rktpow 0\n");
        let changed = diff_cards(&prev, &curr).unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed.get("201"), Some(&vec!["0.0".to_string(), "250.0".to_string()]));
    }

    #[test]
    fn token_count_difference_counts_as_changed() {
        let prev = parse_cards("201 0.0 100.0\n");
        let curr = parse_cards("201 0.0 100.0 1.0e-6\n");
        let changed = diff_cards(&prev, &curr).unwrap();
        assert_eq!(changed.len(), 1);
    }

    #[test]
    fn added_card_is_a_structural_error() {
        // 10 cards before, 11 after: the workflow must abort.
        let prev: CardTable = (0..10u32).map(|i| (crate::CardId::from(300 + i), vec![])).collect();
        let mut curr = prev.clone();
        curr.insert(crate::CardId::from(500), vec![]);
        assert_eq!(diff_cards(&prev, &curr), Err(StructuralError::CardsAdded { prev: 10, curr: 11 }));
    }

    #[test]
    fn removed_card_is_a_structural_error() {
        let prev = parse_cards("100 a\n103 b\n201 c\n");
        let curr = parse_cards("100 a\n103 b\n");
        assert_eq!(diff_cards(&prev, &curr), Err(StructuralError::CardsRemoved { prev: 3, curr: 2 }));
    }

    #[test]
    fn renamed_id_at_equal_cardinality_is_structural() {
        let prev = parse_cards("100 a\n201 c\n");
        let curr = parse_cards("100 a\n202 c\n");
        assert_eq!(
            diff_cards(&prev, &curr),
            Err(StructuralError::CardReplaced { id: crate::CardId::new("201").unwrap() })
        );
    }

    #[test]
    fn figure_growth_appends() {
        let prev = vec![fig("a", 1), fig("b", 2)];
        let curr = vec![fig("a", 1), fig("b", 2), fig("c", 1)];
        assert_eq!(diff_figures(&prev, &curr), RedrawPolicy::Append);
    }

    #[test]
    fn figure_shrinkage_resets() {
        let prev = vec![fig("a", 1), fig("b", 2)];
        let curr = vec![fig("a", 1)];
        assert_eq!(diff_figures(&prev, &curr), RedrawPolicy::Reset);
    }

    #[test]
    fn in_place_figure_edit_appends() {
        let prev = vec![fig("a", 1), fig("b", 2)];
        let curr = vec![fig("a", 1), fig("b", 3)];
        assert_eq!(diff_figures(&prev, &curr), RedrawPolicy::Append);
    }

    #[test]
    fn identical_figures_are_no_change() {
        let figs = vec![fig("a", 1), fig("b", 2)];
        assert_eq!(diff_figures(&figs, &figs.clone()), RedrawPolicy::NoChange);
        assert_eq!(diff_figures(&[], &[]), RedrawPolicy::NoChange);
    }
}
