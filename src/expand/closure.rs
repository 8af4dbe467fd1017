//! Closure computation over the family table.

use super::families::{FAMILY_RULES, control_variable_width};
use crate::{CardTable, debug_enabled};
use std::collections::BTreeSet;

/// Expand `changed` into its dependency closure over the current `table`.
///
/// Every family rule matching a changed id resolves to a `(id length,
/// prefix)` pair; prefixes are deduplicated so each family is scanned once
/// no matter how many changed ids mapped to it. Every table card of the
/// right length under a resolved prefix is pulled at its *current* value,
/// then the changed cards themselves are merged in verbatim (their new
/// values take precedence).
///
/// The result is always a superset of `changed`. A changed card whose id
/// matches no family rule, or whose family has no other members, passes
/// through on its own.
pub fn expand(table: &CardTable, changed: &CardTable) -> CardTable {
    let width = control_variable_width(table);

    let mut prefixes: BTreeSet<(usize, &str)> = BTreeSet::new();
    for id in changed.ids() {
        for rule in FAMILY_RULES.iter() {
            if rule.matches(id) {
                prefixes.insert((rule.id_len, id.leading(rule.prefix.resolve(width))));
            }
        }
    }

    if debug_enabled() {
        eprintln!("[expand] width={width:?} prefixes={prefixes:?}");
    }

    let mut closure = CardTable::new();
    for (id, params) in table.iter() {
        if prefixes.iter().any(|&(len, prefix)| id.len() == len && id.as_str().starts_with(prefix)) {
            closure.insert(id.clone(), params.clone());
        }
    }
    closure.absorb(changed);
    closure
}
