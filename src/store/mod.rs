//! Read-only access to the recipe database.
//!
//! The database has two tables:
//!
//! - `Recipe(id INTEGER, name TEXT, content TEXT, is_video INTEGER)`
//! - `RecipeTag(recipe_id INTEGER, tag TEXT)`, many-to-many with `Recipe`
//!
//! [`RecipeSource`] is the query interface the matcher depends on. It is
//! implemented by [`SqliteStore`] with parameterized SQL, by [`TagIndex`]
//! with set algebra over an in-memory snapshot, and by [`StoreHandle`],
//! which provisions and opens a [`SqliteStore`] on first use.

use crate::model::{Recipe, TagSet};
use camino::Utf8PathBuf;
use thiserror::Error;

mod config;
mod handle;
mod memory;
mod sqlite;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::{ConfigError, RefreshPolicy, StoreConfig};
pub use handle::StoreHandle;
pub use memory::TagIndex;
pub use sqlite::SqliteStore;

/// Tables that must exist for a database to be usable.
pub(crate) const REQUIRED_TABLES: [&str; 2] = ["Recipe", "RecipeTag"];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Recipe database not found: {0}")]
    Missing(Utf8PathBuf),

    #[error("Failed to provision recipe database: {0}")]
    Provision(#[from] std::io::Error),

    #[error("Failed to open recipe database: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("Recipe database has no table named {0}")]
    Schema(&'static str),

    #[error("Recipe database connection is poisoned")]
    Poisoned,

    #[error("Failed to query recipe database: {0}")]
    Query(#[from] rusqlite::Error),
}

impl StoreError {
    /// Returns true if the database could not be reached at all, as opposed
    /// to a single query failing against an open database.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, StoreError::Query(_))
    }
}

/// Query interface over the `Recipe` and `RecipeTag` tables.
///
/// Every tag query returns distinct recipes in ascending id order and
/// returns an empty list when `wanted` is empty.
pub trait RecipeSource {
    /// Recipes carrying at least one wanted tag and no unwanted tag.
    fn query_by_tags_fuzzy(
        &self,
        wanted: &TagSet,
        unwanted: &TagSet,
    ) -> Result<Vec<Recipe>, StoreError>;

    /// Recipes carrying every wanted tag and no unwanted tag.
    fn query_by_tags_accurate(
        &self,
        wanted: &TagSet,
        unwanted: &TagSet,
    ) -> Result<Vec<Recipe>, StoreError>;

    /// Recipes whose tags are all wanted, with at least one tag.
    fn query_by_tags_survival(&self, wanted: &TagSet) -> Result<Vec<Recipe>, StoreError>;

    /// Every recipe, in store order.
    fn all_recipes(&self) -> Result<Vec<Recipe>, StoreError>;

    /// A single recipe, `None` if no recipe has this id.
    fn recipe_by_id(&self, id: i64) -> Result<Option<Recipe>, StoreError>;

    /// Tags of a recipe in ascending order; empty for unknown ids.
    fn tags_for(&self, recipe_id: i64) -> Result<Vec<String>, StoreError>;
}
