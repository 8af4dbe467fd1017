//! Component-closure expansion.
//!
//! The external engine specifies multi-card components atomically: on a
//! restart, every card of a component must be present in the override deck or
//! the missing siblings silently fall back to engine defaults. Expansion
//! therefore turns the literally-changed cards into the full set of family
//! members that must be re-emitted together.
//!
//! ## How the parts work together
//!
//! ```text
//! changed cards ──┬─ families_of        (families.rs)
//!                 │    match each id against the family-rule table
//!                 │
//! current table ──┼─ control_variable_width (families.rs)
//!                 │    card 20500000 selects Short/Long suffix width
//!                 v
//!             expand                    (closure.rs)
//!               - resolve a prefix per matched rule
//!               - dedup prefixes (one scan per family)
//!               - pull every same-length table card under a prefix
//!               - union with the changed cards (new values win)
//!                 │
//!                 v
//!             ClosureSet (a CardTable)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `families.rs`: the central table of (id length, leading-digit pattern,
//!   prefix length) -> family, plus the width flag it depends on. Both the
//!   expansion scan and the width-sensitive control-variable rule consult
//!   this one table.
//! - `closure.rs`: the expansion algorithm itself.
//!
//! Family rules are evaluated independently and non-exclusively: an id
//! matching several rules contributes a prefix for each, and all resulting
//! members are unioned. A family with no members beyond the changed card is
//! a singleton, not an error.

#[path = "expand/closure.rs"]
mod closure;
#[path = "expand/families.rs"]
mod families;

pub use closure::expand;
pub use families::{CnvWidth, FamilyMask, control_variable_width, families_of};
