use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse store config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Store config has an empty database path")]
    EmptyDatabasePath,
}

/// When the bundled asset is copied over the working database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Copy on the first access of every process, so app updates ship new
    /// recipe data.
    #[default]
    Always,
    /// Copy only when no database exists at the target path yet.
    IfMissing,
}

/// Where the recipe database lives and how it gets there.
///
/// ```
/// # use food_guide_core::store::{RefreshPolicy, StoreConfig};
/// let config = StoreConfig::from_yaml_str(
///     "database_path: /data/food_guide_recipes.db\n\
///      asset_path: /bundle/food_guide_recipes.db\n\
///      refresh: if-missing\n",
/// )?;
/// assert_eq!(config.refresh, RefreshPolicy::IfMissing);
/// # Ok::<(), food_guide_core::store::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Working copy opened read-only
    pub database_path: Utf8PathBuf,
    /// Bundled database copied to `database_path`, if any
    #[serde(default)]
    pub asset_path: Option<Utf8PathBuf>,
    #[serde(default)]
    pub refresh: RefreshPolicy,
}

impl StoreConfig {
    pub fn new(database_path: impl Into<Utf8PathBuf>) -> Self {
        StoreConfig {
            database_path: database_path.into(),
            asset_path: None,
            refresh: RefreshPolicy::default(),
        }
    }

    pub fn with_asset(mut self, asset_path: impl Into<Utf8PathBuf>) -> Self {
        self.asset_path = Some(asset_path.into());
        self
    }

    pub fn with_refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.as_str().trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_yaml_str("database_path: recipes.db").unwrap();
        assert_eq!(config, StoreConfig::new("recipes.db"));
        assert_eq!(config.refresh, RefreshPolicy::Always);
        assert!(config.asset_path.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = StoreConfig::from_yaml_str(indoc! {"
            database_path: /data/user/0/foodguide/databases/food_guide_recipes.db
            asset_path: /assets/food_guide_recipes.db
            refresh: if-missing
        "})
        .unwrap();

        assert_eq!(
            config,
            StoreConfig::new("/data/user/0/foodguide/databases/food_guide_recipes.db")
                .with_asset("/assets/food_guide_recipes.db")
                .with_refresh(RefreshPolicy::IfMissing)
        );
    }

    #[test]
    fn test_empty_database_path() {
        let result = StoreConfig::from_yaml_str("database_path: ''");
        assert!(matches!(result, Err(ConfigError::EmptyDatabasePath)));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = StoreConfig::from_yaml_str("refresh: sometimes");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }
}
