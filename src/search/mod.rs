use crate::model::{Recipe, TagSet, TagStates};
use crate::store::{RecipeSource, StoreError};
use thiserror::Error;
use tracing::debug;

mod model;

pub use model::{SearchMode, UnknownSearchMode};

/// Why a match could not be computed.
///
/// An empty `Vec` from the matcher always means "no recipe qualifies"; a
/// database that cannot be read is reported here instead.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Recipe store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("Recipe query failed: {0}")]
    QueryFailed(#[source] StoreError),
}

impl From<StoreError> for MatchError {
    fn from(e: StoreError) -> Self {
        if e.is_unavailable() {
            MatchError::StoreUnavailable(e)
        } else {
            MatchError::QueryFailed(e)
        }
    }
}

/// Matching engine over any [`RecipeSource`].
pub struct Matcher<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: RecipeSource + ?Sized> Matcher<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Matcher { source }
    }

    /// Recipes satisfying `mode` for the given tags, ascending by id.
    ///
    /// An empty `wanted` set short-circuits to an empty result in every mode
    /// without touching the store. `unwanted` is ignored in
    /// [`SearchMode::Survival`]: a recipe made only of wanted tags cannot
    /// carry an unwanted one unless the caller marked a tag as both.
    pub fn find(
        &self,
        wanted: &TagSet,
        unwanted: &TagSet,
        mode: SearchMode,
    ) -> Result<Vec<Recipe>, MatchError> {
        if wanted.is_empty() {
            debug!(%mode, "No wanted tags, skipping query");
            return Ok(Vec::new());
        }

        let mut recipes = match mode {
            SearchMode::Fuzzy => self.source.query_by_tags_fuzzy(wanted, unwanted)?,
            SearchMode::Accurate => self.source.query_by_tags_accurate(wanted, unwanted)?,
            SearchMode::Survival => self.source.query_by_tags_survival(wanted)?,
        };

        recipes.sort_by_key(|recipe| recipe.id);
        recipes.dedup_by_key(|recipe| recipe.id);

        debug!(
            %mode,
            wanted = wanted.len(),
            unwanted = unwanted.len(),
            results = recipes.len(),
            "Matched recipes"
        );
        Ok(recipes)
    }

    /// Same as [`Matcher::find`] with the sets derived from a tag selection.
    pub fn find_for(&self, states: &TagStates, mode: SearchMode) -> Result<Vec<Recipe>, MatchError> {
        self.find(&states.wanted(), &states.unwanted(), mode)
    }

    /// Every recipe in store order.
    pub fn all(&self) -> Result<Vec<Recipe>, MatchError> {
        Ok(self.source.all_recipes()?)
    }

    /// A single recipe; `Ok(None)` when no recipe has this id.
    pub fn by_id(&self, id: i64) -> Result<Option<Recipe>, MatchError> {
        Ok(self.source.recipe_by_id(id)?)
    }

    /// Tags attached to a recipe, ascending.
    pub fn tags_for(&self, recipe_id: i64) -> Result<Vec<String>, MatchError> {
        Ok(self.source.tags_for(recipe_id)?)
    }
}

/// Recipes in `source` satisfying `mode`; see [`Matcher::find`].
pub fn match_recipes<S: RecipeSource + ?Sized>(
    source: &S,
    wanted: &TagSet,
    unwanted: &TagSet,
    mode: SearchMode,
) -> Result<Vec<Recipe>, MatchError> {
    Matcher::new(source).find(wanted, unwanted, mode)
}
