//! The family-rule table.
//!
//! A card id's component family is decided purely by the *shape* of the id:
//! its digit count and its leading digits. This module is the single place
//! that shape grammar is written down; expansion (`closure.rs`) and tests
//! consult the table rather than re-deriving patterns.
//!
//! | family            | id length | leading digits | shared prefix        |
//! |-------------------|-----------|----------------|----------------------|
//! | hydro volume      | 7         | `ccc`          | 3 digits             |
//! | reactor kinetics  | 8         | `3...`         | 4 digits             |
//! | control variable  | 8         | `205...`       | 6 (Short) / 7 (Long) |
//! | general table     | 8         | `202...`       | 6 digits             |
//! | heat structure    | 8         | `1...`         | 4 digits             |
//! | heat transfer     | 8         | `201...`       | 6 digits             |
//!
//! The control-variable prefix length depends on a deck-wide flag card (see
//! [`control_variable_width`]); everything else is fixed.
//!
//! ## Invariants
//!
//! - Rules are evaluated independently; a rule never suppresses another.
//!   Ids matching several rules contribute a prefix per match and the member
//!   sets are unioned downstream.
//! - A rule's prefix length is strictly smaller than its id length, so a
//!   family member always carries at least one per-card suffix digit.

use crate::{CardId, CardTable};
use once_cell::sync::Lazy;
use regex::Regex;

bitflags::bitflags! {
    /// Component families a card id can belong to.
    ///
    /// A mask rather than an enum: family rules are non-exclusive, so one id
    /// can belong to several families at once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FamilyMask: u8 {
        const HYDRO_VOLUME     = 1 << 0;
        const REACTOR_KINETICS = 1 << 1;
        const CONTROL_VARIABLE = 1 << 2;
        const GENERAL_TABLE    = 1 << 3;
        const HEAT_STRUCTURE   = 1 << 4;
        const HEAT_TRANSFER    = 1 << 5;
    }
}

/// Control-variable id format, selected once per parse by card `20500000`.
///
/// Long format gives each variable a one-digit suffix (7-digit shared
/// prefix); Short gives it two (6-digit shared prefix).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CnvWidth {
    Short,
    Long,
}

/// Prefix length of a family rule.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PrefixLen {
    Fixed(usize),
    /// Width-sensitive: 6 digits for [`CnvWidth::Short`], 7 for Long.
    ControlVariable,
}

impl PrefixLen {
    pub fn resolve(self, width: CnvWidth) -> usize {
        match self {
            PrefixLen::Fixed(n) => n,
            PrefixLen::ControlVariable => match width {
                CnvWidth::Short => 6,
                CnvWidth::Long => 7,
            },
        }
    }
}

/// One row of the family table.
#[derive(Debug)]
pub(crate) struct FamilyRule {
    pub family: FamilyMask,
    pub id_len: usize,
    /// Anchored leading-digit pattern.
    pub pattern: &'static Regex,
    pub prefix: PrefixLen,
}

impl FamilyRule {
    pub fn matches(&self, id: &CardId) -> bool {
        id.len() == self.id_len && self.pattern.is_match(id.as_str())
    }
}

pub(crate) static FAMILY_RULES: Lazy<Vec<FamilyRule>> = Lazy::new(|| {
    vec![
        FamilyRule {
            family: FamilyMask::HYDRO_VOLUME,
            id_len: 7,
            pattern: regex!(r"^\d{3}"),
            prefix: PrefixLen::Fixed(3),
        },
        FamilyRule {
            family: FamilyMask::REACTOR_KINETICS,
            id_len: 8,
            pattern: regex!(r"^3\d{3}"),
            prefix: PrefixLen::Fixed(4),
        },
        FamilyRule {
            family: FamilyMask::CONTROL_VARIABLE,
            id_len: 8,
            pattern: regex!(r"^205\d{3}"),
            prefix: PrefixLen::ControlVariable,
        },
        FamilyRule {
            family: FamilyMask::GENERAL_TABLE,
            id_len: 8,
            pattern: regex!(r"^202\d{3}"),
            prefix: PrefixLen::Fixed(6),
        },
        FamilyRule {
            family: FamilyMask::HEAT_STRUCTURE,
            id_len: 8,
            pattern: regex!(r"^1\d{3}"),
            prefix: PrefixLen::Fixed(4),
        },
        FamilyRule {
            family: FamilyMask::HEAT_TRANSFER,
            id_len: 8,
            pattern: regex!(r"^201\d{3}"),
            prefix: PrefixLen::Fixed(6),
        },
    ]
});

/// Which families does `id` belong to?
///
/// Matching depends only on the id's shape, never on the control-variable
/// width; width changes *prefix length*, not membership.
pub fn families_of(id: &CardId) -> FamilyMask {
    FAMILY_RULES
        .iter()
        .filter(|rule| rule.matches(id))
        .fold(FamilyMask::empty(), |mask, rule| mask | rule.family)
}

/// Resolve the deck-wide control-variable width for one parse.
///
/// Card `20500000` carrying exactly the single parameter `9999` or `4095`
/// selects Long format; anything else, including a missing card, is Short.
/// The result is computed once per expansion and used throughout it.
pub fn control_variable_width(table: &CardTable) -> CnvWidth {
    match table.get("20500000").map(Vec::as_slice) {
        Some([v]) if matches!(v.as_str(), "9999" | "4095") => CnvWidth::Long,
        _ => CnvWidth::Short,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_cards;

    fn id(s: &str) -> CardId {
        CardId::new(s).unwrap()
    }

    #[test]
    fn family_membership_by_id_shape() {
        // Array of (id, expected family mask)
        let cases: Vec<(&str, FamilyMask)> = vec![
            ("1150101", FamilyMask::HYDRO_VOLUME),
            ("2400000", FamilyMask::HYDRO_VOLUME),
            ("30000101", FamilyMask::REACTOR_KINETICS),
            ("20500210", FamilyMask::CONTROL_VARIABLE),
            ("20500000", FamilyMask::CONTROL_VARIABLE),
            ("20210001", FamilyMask::GENERAL_TABLE),
            ("13600101", FamilyMask::HEAT_STRUCTURE),
            ("20100500", FamilyMask::HEAT_TRANSFER),
            // Length gates: right digits, wrong length.
            ("115", FamilyMask::empty()),
            ("205001", FamilyMask::empty()),
            ("11501010", FamilyMask::HEAT_STRUCTURE),
            ("2050021", FamilyMask::HYDRO_VOLUME),
            // Leading digits outside every 8-digit rule.
            ("99999999", FamilyMask::empty()),
            ("20600000", FamilyMask::empty()),
        ];

        for (card, expected) in cases {
            assert_eq!(families_of(&id(card)), expected, "id {card}");
        }
    }

    #[test]
    fn rules_are_evaluated_independently() {
        // Every matching rule contributes, none suppresses another.
        for (card, expected) in [("20100500", FamilyMask::HEAT_TRANSFER), ("13600101", FamilyMask::HEAT_STRUCTURE)] {
            let mut unioned = FamilyMask::empty();
            for rule in FAMILY_RULES.iter() {
                if rule.matches(&id(card)) {
                    unioned |= rule.family;
                }
            }
            assert_eq!(unioned, expected);
        }
    }

    #[test]
    fn prefix_lengths_stay_below_id_lengths() {
        for rule in FAMILY_RULES.iter() {
            for width in [CnvWidth::Short, CnvWidth::Long] {
                assert!(rule.prefix.resolve(width) < rule.id_len, "{:?}", rule.family);
            }
        }
    }

    #[test]
    fn width_flag_values_select_long() {
        assert_eq!(control_variable_width(&parse_cards("20500000 9999\n")), CnvWidth::Long);
        assert_eq!(control_variable_width(&parse_cards("20500000 4095\n")), CnvWidth::Long);
    }

    #[test]
    fn other_flag_values_select_short() {
        assert_eq!(control_variable_width(&parse_cards("20500000 1000\n")), CnvWidth::Short);
        assert_eq!(control_variable_width(&parse_cards("20500000\n")), CnvWidth::Short);
        // Two tokens is not the flag shape, even if the first is 9999.
        assert_eq!(control_variable_width(&parse_cards("20500000 9999 reactor\n")), CnvWidth::Short);
    }

    #[test]
    fn missing_flag_card_defaults_to_short() {
        assert_eq!(control_variable_width(&parse_cards("100 new transnt\n")), CnvWidth::Short);
        assert_eq!(control_variable_width(&CardTable::new()), CnvWidth::Short);
    }
}
