//! Tag-based recipe matching for the FoodGuide apps.
//!
//! The user marks ingredients and tools as wanted or unwanted
//! ([`TagStates`]); the [`Matcher`] turns that selection and a
//! [`SearchMode`] into the list of recipes from the read-only recipe
//! database ([`store`]).

uniffi::setup_scaffolding!();

pub mod catalog;
pub mod ffi;
pub mod model;
pub mod search;
pub mod store;

pub use catalog::{Catalog, TagCategory};
pub use model::*;
pub use search::{match_recipes, MatchError, Matcher, SearchMode};
pub use store::{RecipeSource, SqliteStore, StoreConfig, StoreError, StoreHandle, TagIndex};
