//! UniFFI bindings for the iOS and Android apps.
//!
//! The core types are mirrored by FFI-safe records and enums here; the tag
//! selection crosses the boundary as a plain `tag -> state` map so the host
//! UI can keep it in its own state container.

use crate::catalog::{Catalog, CatalogError, TagCategory};
use crate::model::{self, extract_ingredients, Recipe, TagState, TagStates};
use crate::search::{MatchError, Matcher, SearchMode};
use crate::store::{ConfigError, StoreConfig, StoreHandle};
use std::collections::HashMap;
use std::sync::Arc;

/// FFI-safe error type that wraps all possible errors.
#[derive(Debug, uniffi::Error, thiserror::Error)]
pub enum FoodGuideError {
    #[error("Recipe store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Recipe query failed: {message}")]
    QueryFailed { message: String },

    #[error("Invalid tag catalog: {message}")]
    InvalidCatalog { message: String },

    #[error("Invalid store config: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid tag selection: {message}")]
    InvalidState { message: String },
}

impl From<MatchError> for FoodGuideError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::StoreUnavailable(e) => FoodGuideError::StoreUnavailable {
                message: e.to_string(),
            },
            MatchError::QueryFailed(e) => FoodGuideError::QueryFailed {
                message: e.to_string(),
            },
        }
    }
}

impl From<CatalogError> for FoodGuideError {
    fn from(e: CatalogError) -> Self {
        FoodGuideError::InvalidCatalog {
            message: e.to_string(),
        }
    }
}

impl From<ConfigError> for FoodGuideError {
    fn from(e: ConfigError) -> Self {
        FoodGuideError::InvalidConfig {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for FoodGuideError {
    fn from(e: serde_json::Error) -> Self {
        FoodGuideError::InvalidState {
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiTagState {
    Unselected,
    Wanted,
    Unwanted,
}

impl From<TagState> for FfiTagState {
    fn from(state: TagState) -> Self {
        match state {
            TagState::Unselected => FfiTagState::Unselected,
            TagState::Wanted => FfiTagState::Wanted,
            TagState::Unwanted => FfiTagState::Unwanted,
        }
    }
}

impl From<FfiTagState> for TagState {
    fn from(state: FfiTagState) -> Self {
        match state {
            FfiTagState::Unselected => TagState::Unselected,
            FfiTagState::Wanted => TagState::Wanted,
            FfiTagState::Unwanted => TagState::Unwanted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiSearchMode {
    Fuzzy,
    Accurate,
    Survival,
}

impl From<FfiSearchMode> for SearchMode {
    fn from(mode: FfiSearchMode) -> Self {
        match mode {
            FfiSearchMode::Fuzzy => SearchMode::Fuzzy,
            FfiSearchMode::Accurate => SearchMode::Accurate,
            FfiSearchMode::Survival => SearchMode::Survival,
        }
    }
}

/// FFI-safe representation of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiRecipe {
    pub id: i64,
    pub name: String,
    /// Markdown body, or a video URL when `is_video` is set
    pub content: String,
    pub is_video: bool,
}

impl From<Recipe> for FfiRecipe {
    fn from(r: Recipe) -> Self {
        FfiRecipe {
            id: r.id,
            name: r.name,
            content: r.content,
            is_video: r.is_video,
        }
    }
}

/// FFI-safe representation of a tag category.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiTagCategory {
    pub name: String,
    /// Heading for the category, never empty
    pub title: String,
    pub tags: Vec<String>,
}

impl From<&TagCategory> for FfiTagCategory {
    fn from(c: &TagCategory) -> Self {
        FfiTagCategory {
            name: c.name.clone(),
            title: c.title().to_string(),
            tags: c.tags.clone(),
        }
    }
}

fn to_states(map: HashMap<String, FfiTagState>) -> TagStates {
    map.into_iter()
        .map(|(tag, state)| (tag, TagState::from(state)))
        .collect()
}

fn from_states(states: &TagStates) -> HashMap<String, FfiTagState> {
    states
        .iter()
        .map(|(tag, state)| (tag.to_string(), state.into()))
        .collect()
}

fn to_recipes(recipes: Vec<Recipe>) -> Vec<FfiRecipe> {
    recipes.into_iter().map(FfiRecipe::from).collect()
}

/// Read-only recipe database shared by the whole app.
///
/// Create one per process. The database is provisioned and opened on the
/// first query; every method may be called from any thread.
#[derive(uniffi::Object)]
pub struct RecipeStore {
    handle: StoreHandle,
}

#[uniffi::export]
impl RecipeStore {
    /// Creates a store for `database_path`, copied from `asset_path` on first
    /// use when one is given.
    #[uniffi::constructor]
    pub fn new(database_path: String, asset_path: Option<String>) -> Arc<Self> {
        let mut config = StoreConfig::new(database_path);
        if let Some(asset_path) = asset_path {
            config = config.with_asset(asset_path);
        }
        Arc::new(RecipeStore {
            handle: StoreHandle::new(config),
        })
    }

    /// Creates a store from a YAML [`StoreConfig`].
    #[uniffi::constructor]
    pub fn from_yaml_config(yaml: String) -> Result<Arc<Self>, FoodGuideError> {
        let config = StoreConfig::from_yaml_str(&yaml)?;
        Ok(Arc::new(RecipeStore {
            handle: StoreHandle::new(config),
        }))
    }

    /// Returns true once the database has been opened.
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Recipes matching the tags under `mode`, ascending by id.
    ///
    /// An empty list means nothing matched; an unreadable database is
    /// reported as [`FoodGuideError::StoreUnavailable`].
    pub fn match_recipes(
        &self,
        wanted: Vec<String>,
        unwanted: Vec<String>,
        mode: FfiSearchMode,
    ) -> Result<Vec<FfiRecipe>, FoodGuideError> {
        let wanted = wanted.into_iter().collect();
        let unwanted = unwanted.into_iter().collect();
        let recipes = Matcher::new(&self.handle).find(&wanted, &unwanted, mode.into())?;
        Ok(to_recipes(recipes))
    }

    /// Recipes matching a tag selection under `mode`.
    pub fn match_selection(
        &self,
        states: HashMap<String, FfiTagState>,
        mode: FfiSearchMode,
    ) -> Result<Vec<FfiRecipe>, FoodGuideError> {
        let recipes = Matcher::new(&self.handle).find_for(&to_states(states), mode.into())?;
        Ok(to_recipes(recipes))
    }

    pub fn all_recipes(&self) -> Result<Vec<FfiRecipe>, FoodGuideError> {
        Ok(to_recipes(Matcher::new(&self.handle).all()?))
    }

    /// A single recipe, or `None` if no recipe has this id.
    pub fn recipe_by_id(&self, id: i64) -> Result<Option<FfiRecipe>, FoodGuideError> {
        Ok(Matcher::new(&self.handle).by_id(id)?.map(FfiRecipe::from))
    }

    pub fn tags_for(&self, recipe_id: i64) -> Result<Vec<String>, FoodGuideError> {
        Ok(Matcher::new(&self.handle).tags_for(recipe_id)?)
    }
}

// ============================================================================
// Exported FFI Functions
// ============================================================================

/// Advances `tag` one step along unselected → wanted → unwanted → unselected.
///
/// Returns the new selection; `current` is not modified. Unselected tags are
/// never present in the returned map.
#[uniffi::export]
pub fn toggle_tag(
    tag: String,
    current: HashMap<String, FfiTagState>,
) -> HashMap<String, FfiTagState> {
    from_states(&model::toggle_tag(&tag, &to_states(current)))
}

/// Returns an empty selection.
#[uniffi::export]
pub fn clear_all() -> HashMap<String, FfiTagState> {
    from_states(&model::clear_all())
}

/// Wanted tags of a selection, sorted.
#[uniffi::export]
pub fn wanted_tags(states: HashMap<String, FfiTagState>) -> Vec<String> {
    to_states(states).wanted().into_iter().collect()
}

/// Unwanted tags of a selection, sorted.
#[uniffi::export]
pub fn unwanted_tags(states: HashMap<String, FfiTagState>) -> Vec<String> {
    to_states(states).unwanted().into_iter().collect()
}

/// Serializes a selection to JSON so the host can persist it.
#[uniffi::export]
pub fn encode_tag_states(states: HashMap<String, FfiTagState>) -> Result<String, FoodGuideError> {
    Ok(to_states(states).to_json()?)
}

/// Restores a selection saved with [`encode_tag_states`].
#[uniffi::export]
pub fn decode_tag_states(json: String) -> Result<HashMap<String, FfiTagState>, FoodGuideError> {
    Ok(from_states(&TagStates::from_json(&json)?))
}

/// The tag categories shipped with the app.
#[uniffi::export]
pub fn tag_catalog() -> Result<Vec<FfiTagCategory>, FoodGuideError> {
    let catalog = Catalog::builtin()?;
    Ok(catalog.categories().iter().map(FfiTagCategory::from).collect())
}

/// Tag categories from a custom YAML catalog.
#[uniffi::export]
pub fn tag_catalog_from_yaml(yaml: String) -> Result<Vec<FfiTagCategory>, FoodGuideError> {
    let catalog = Catalog::from_yaml_str(&yaml)?;
    Ok(catalog.categories().iter().map(FfiTagCategory::from).collect())
}

/// Ingredients listed in a markdown recipe body.
#[uniffi::export]
pub fn recipe_ingredients(content: String) -> Vec<String> {
    extract_ingredients(&content)
}

/// Label for a search mode, as shown in the mode picker.
#[uniffi::export]
pub fn search_mode_name(mode: FfiSearchMode) -> String {
    SearchMode::from(mode).display_name().to_string()
}

/// Returns the library version.
#[uniffi::export]
pub fn library_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
