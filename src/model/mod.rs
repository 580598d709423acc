//! Core data types shared by the store, the matcher and the FFI layer.

mod recipe;
mod tag_state;

pub use recipe::{extract_ingredients, ContentKind, Recipe};
pub use tag_state::{clear_all, toggle_tag, TagState, TagStates};

use std::collections::BTreeSet;

/// An order-irrelevant set of tag strings.
///
/// A `BTreeSet` keeps iteration deterministic, which in turn keeps the
/// bound parameters of generated SQL stable between identical calls.
pub type TagSet = BTreeSet<String>;
