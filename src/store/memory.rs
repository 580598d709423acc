use super::{RecipeSource, SqliteStore, StoreError};
use crate::model::{Recipe, TagSet};
use std::collections::BTreeMap;
use tracing::{debug, warn};

static NO_TAGS: TagSet = TagSet::new();

/// In-memory snapshot of the recipe database.
///
/// Answers the same queries as [`SqliteStore`] by evaluating the match
/// predicates as set operations over each recipe's tag set. Useful when the
/// host wants to keep matching off the database entirely, and as the
/// reference semantics the SQL queries are tested against.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    recipes: BTreeMap<i64, Recipe>,
    tags: BTreeMap<i64, TagSet>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every recipe and tag association out of `store`.
    ///
    /// Tag rows that point at a recipe id missing from the `Recipe` table are
    /// skipped.
    pub fn load(store: &SqliteStore) -> Result<Self, StoreError> {
        let mut index = TagIndex::new();
        for recipe in store.all_recipes()? {
            index.recipes.insert(recipe.id, recipe);
        }

        let mut orphans = 0usize;
        for (recipe_id, tag) in store.recipe_tags()? {
            if index.recipes.contains_key(&recipe_id) {
                index.tags.entry(recipe_id).or_default().insert(tag);
            } else {
                orphans += 1;
            }
        }
        if orphans > 0 {
            warn!(orphans, "Skipped tags referencing unknown recipes");
        }

        debug!(
            recipes = index.recipes.len(),
            tagged = index.tags.len(),
            "Loaded recipe tag index"
        );
        Ok(index)
    }

    /// Adds a recipe with its tags, replacing any recipe with the same id.
    pub fn insert<S: Into<String>>(&mut self, recipe: Recipe, tags: impl IntoIterator<Item = S>) {
        let tags: TagSet = tags.into_iter().map(Into::into).collect();
        let id = recipe.id;
        self.recipes.insert(id, recipe);
        if tags.is_empty() {
            self.tags.remove(&id);
        } else {
            self.tags.insert(id, tags);
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    fn tags_of(&self, id: i64) -> &TagSet {
        self.tags.get(&id).unwrap_or(&NO_TAGS)
    }

    fn select(&self, wanted: &TagSet, predicate: impl Fn(&TagSet) -> bool) -> Vec<Recipe> {
        if wanted.is_empty() {
            return Vec::new();
        }
        self.recipes
            .values()
            .filter(|recipe| predicate(self.tags_of(recipe.id)))
            .cloned()
            .collect()
    }
}

/// `T(r) ∩ wanted ≠ ∅` and `T(r) ∩ unwanted = ∅`
fn matches_fuzzy(tags: &TagSet, wanted: &TagSet, unwanted: &TagSet) -> bool {
    !tags.is_disjoint(wanted) && tags.is_disjoint(unwanted)
}

/// `wanted ⊆ T(r)` and `T(r) ∩ unwanted = ∅`
fn matches_accurate(tags: &TagSet, wanted: &TagSet, unwanted: &TagSet) -> bool {
    wanted.is_subset(tags) && tags.is_disjoint(unwanted)
}

/// `T(r) ∩ wanted ≠ ∅` and `T(r) ⊆ wanted`
fn matches_survival(tags: &TagSet, wanted: &TagSet) -> bool {
    !tags.is_disjoint(wanted) && tags.is_subset(wanted)
}

impl RecipeSource for TagIndex {
    fn query_by_tags_fuzzy(
        &self,
        wanted: &TagSet,
        unwanted: &TagSet,
    ) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.select(wanted, |tags| matches_fuzzy(tags, wanted, unwanted)))
    }

    fn query_by_tags_accurate(
        &self,
        wanted: &TagSet,
        unwanted: &TagSet,
    ) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.select(wanted, |tags| matches_accurate(tags, wanted, unwanted)))
    }

    fn query_by_tags_survival(&self, wanted: &TagSet) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.select(wanted, |tags| matches_survival(tags, wanted)))
    }

    fn all_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.recipes.values().cloned().collect())
    }

    fn recipe_by_id(&self, id: i64) -> Result<Option<Recipe>, StoreError> {
        Ok(self.recipes.get(&id).cloned())
    }

    fn tags_for(&self, recipe_id: i64) -> Result<Vec<String>, StoreError> {
        Ok(self.tags_of(recipe_id).iter().cloned().collect())
    }
}
