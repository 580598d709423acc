use super::{RecipeSource, RefreshPolicy, SqliteStore, StoreConfig, StoreError};
use crate::model::{Recipe, TagSet};
use camino::Utf8PathBuf;
use once_cell::sync::OnceCell;
use std::fs;
use tracing::{debug, info, warn};

/// Lazily provisioned, read-only recipe database.
///
/// Owned by the application's composition root and shared by reference.
/// Creating a handle does no I/O; the first call to [`StoreHandle::get`]
/// copies the bundled asset into place (per [`RefreshPolicy`]) and opens the
/// database. Concurrent first callers wait for that single initialization
/// and all receive the same store. A failed initialization is not cached,
/// so a later call tries again.
#[derive(Debug)]
pub struct StoreHandle {
    config: StoreConfig,
    store: OnceCell<SqliteStore>,
}

impl StoreHandle {
    pub fn new(config: StoreConfig) -> Self {
        StoreHandle {
            config,
            store: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the open store, provisioning and opening it on first use.
    pub fn get(&self) -> Result<&SqliteStore, StoreError> {
        self.store.get_or_try_init(|| {
            open(&self.config).inspect_err(|e| {
                warn!(database = %self.config.database_path, error = %e, "Recipe database unavailable");
            })
        })
    }

    /// Returns true once the database has been opened successfully.
    pub fn is_open(&self) -> bool {
        self.store.get().is_some()
    }
}

fn open(config: &StoreConfig) -> Result<SqliteStore, StoreError> {
    provision(config)?;
    let store = SqliteStore::open_read_only(&config.database_path)?;
    info!(database = %config.database_path, "Recipe database ready");
    Ok(store)
}

/// Copies the bundled asset to the database path when the policy asks for it.
///
/// The copy goes to a sibling `.partial` file first and is renamed into
/// place, so an interrupted copy never leaves a truncated database behind.
/// A failed copy or rename removes the staging file.
fn provision(config: &StoreConfig) -> Result<(), StoreError> {
    let Some(asset) = &config.asset_path else {
        return Ok(());
    };
    let target = &config.database_path;

    if config.refresh == RefreshPolicy::IfMissing && target.is_file() {
        debug!(database = %target, "Recipe database already provisioned");
        return Ok(());
    }
    if !asset.is_file() {
        return Err(StoreError::Missing(asset.clone()));
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let staging = Utf8PathBuf::from(format!("{target}.partial"));
    if let Err(e) = fs::copy(asset, &staging).and_then(|_| fs::rename(&staging, target)) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }

    info!(asset = %asset, database = %target, "Copied bundled recipe database");
    Ok(())
}

impl RecipeSource for StoreHandle {
    fn query_by_tags_fuzzy(
        &self,
        wanted: &TagSet,
        unwanted: &TagSet,
    ) -> Result<Vec<Recipe>, StoreError> {
        self.get()?.query_by_tags_fuzzy(wanted, unwanted)
    }

    fn query_by_tags_accurate(
        &self,
        wanted: &TagSet,
        unwanted: &TagSet,
    ) -> Result<Vec<Recipe>, StoreError> {
        self.get()?.query_by_tags_accurate(wanted, unwanted)
    }

    fn query_by_tags_survival(&self, wanted: &TagSet) -> Result<Vec<Recipe>, StoreError> {
        self.get()?.query_by_tags_survival(wanted)
    }

    fn all_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        self.get()?.all_recipes()
    }

    fn recipe_by_id(&self, id: i64) -> Result<Option<Recipe>, StoreError> {
        self.get()?.recipe_by_id(id)
    }

    fn tags_for(&self, recipe_id: i64) -> Result<Vec<String>, StoreError> {
        self.get()?.tags_for(recipe_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{sample_recipes, tags, write_database};
    use camino::Utf8Path;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn temp_path(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8Path::from_path(temp_dir.path()).unwrap().to_path_buf()
    }

    fn bundled_asset(dir: &Utf8Path) -> Utf8PathBuf {
        let asset = dir.join("bundle").join("food_guide_recipes.db");
        fs::create_dir_all(asset.parent().unwrap()).unwrap();
        write_database(&asset, &sample_recipes());
        asset
    }

    #[test]
    fn test_new_does_no_io() {
        let handle = StoreHandle::new(StoreConfig::new("/nonexistent/recipes.db"));
        assert!(!handle.is_open());
    }

    #[test]
    fn test_provisions_from_asset() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_path(&temp_dir);
        let asset = bundled_asset(&dir);
        let database = dir.join("documents").join("food_guide_recipes.db");

        let handle = StoreHandle::new(StoreConfig::new(&database).with_asset(&asset));
        let recipes = handle.query_by_tags_fuzzy(&tags(&["米"]), &TagSet::new()).unwrap();

        assert!(handle.is_open());
        assert!(database.is_file());
        assert!(!Utf8PathBuf::from(format!("{database}.partial")).exists());
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "白米饭");
    }

    #[test]
    fn test_always_refresh_overwrites_existing_copy() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_path(&temp_dir);
        let asset = bundled_asset(&dir);
        let database = dir.join("food_guide_recipes.db");
        fs::write(&database, "stale").unwrap();

        let handle = StoreHandle::new(StoreConfig::new(&database).with_asset(&asset));
        assert_eq!(handle.all_recipes().unwrap().len(), sample_recipes().len());
    }

    #[test]
    fn test_if_missing_keeps_existing_copy() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_path(&temp_dir);
        let asset = bundled_asset(&dir);
        let database = dir.join("food_guide_recipes.db");
        write_database(&database, &sample_recipes()[..2]);

        let handle = StoreHandle::new(
            StoreConfig::new(&database)
                .with_asset(&asset)
                .with_refresh(RefreshPolicy::IfMissing),
        );
        assert_eq!(handle.all_recipes().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_asset_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_path(&temp_dir);

        let handle = StoreHandle::new(
            StoreConfig::new(dir.join("food_guide_recipes.db")).with_asset(dir.join("missing.db")),
        );
        let err = handle.all_recipes().unwrap_err();
        assert!(matches!(err, StoreError::Missing(_)));
        assert!(err.is_unavailable());
        assert!(!handle.is_open());
    }

    #[test]
    fn test_failed_provision_removes_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_path(&temp_dir);
        let asset = bundled_asset(&dir);
        // A non-empty directory where the database should go makes the rename fail.
        let database = dir.join("food_guide_recipes.db");
        fs::create_dir_all(database.join("occupied")).unwrap();

        let handle = StoreHandle::new(StoreConfig::new(&database).with_asset(&asset));
        let err = handle.get().unwrap_err();

        assert!(matches!(err, StoreError::Provision(_)));
        assert!(!Utf8PathBuf::from(format!("{database}.partial")).exists());
        assert!(!handle.is_open());
    }

    #[test]
    fn test_failed_init_is_retried() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_path(&temp_dir);
        let database = dir.join("food_guide_recipes.db");

        let handle = StoreHandle::new(StoreConfig::new(&database));
        assert!(handle.get().is_err());

        write_database(&database, &sample_recipes());
        assert!(handle.get().is_ok());
        assert!(handle.is_open());
    }

    #[test]
    fn test_concurrent_first_access_opens_once() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_path(&temp_dir);
        let asset = bundled_asset(&dir);
        let handle = Arc::new(StoreHandle::new(
            StoreConfig::new(dir.join("food_guide_recipes.db")).with_asset(&asset),
        ));

        let addresses: Vec<usize> = (0..8)
            .map(|_| {
                let handle = Arc::clone(&handle);
                thread::spawn(move || handle.get().unwrap() as *const SqliteStore as usize)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|t| t.join().unwrap())
            .collect();

        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }
}
