//! Tag vocabulary offered to the user, grouped by category.
//!
//! The catalog only drives what the picker shows. The matcher and the tag
//! state machine accept any string, whether or not a category lists it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("builtin.yaml");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse tag catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Tag category at position {0} has no name")]
    UnnamedCategory(usize),

    #[error("Category {0} contains an empty tag")]
    EmptyTag(String),

    #[error("Tag {tag} appears in both {first} and {second}")]
    DuplicateTag {
        tag: String,
        first: String,
        second: String,
    },
}

/// A named group of tags, e.g. vegetables or staples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCategory {
    /// Short identifier
    pub name: String,
    /// Heading shown above the tags; falls back to `name`
    #[serde(default)]
    pub title: Option<String>,
    pub tags: Vec<String>,
}

impl TagCategory {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<TagCategory>,
}

impl Catalog {
    /// The catalog shipped with the app.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Parses and validates a catalog such as:
    ///
    /// ```yaml
    /// categories:
    ///   - name: 主食
    ///     title: 🍚 主食
    ///     tags: [米, 面包]
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn categories(&self) -> &[TagCategory] {
        &self.categories
    }

    /// The category listing `tag`, if any.
    pub fn category_of(&self, tag: &str) -> Option<&TagCategory> {
        self.categories
            .iter()
            .find(|category| category.tags.iter().any(|t| t == tag))
    }

    /// Every tag in category order.
    pub fn all_tags(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|category| category.tags.iter().map(String::as_str))
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for (position, category) in self.categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(CatalogError::UnnamedCategory(position));
            }
            for tag in &category.tags {
                if tag.trim().is_empty() {
                    return Err(CatalogError::EmptyTag(category.name.clone()));
                }
                if let Some(first) = seen.insert(tag, &category.name) {
                    return Err(CatalogError::DuplicateTag {
                        tag: tag.clone(),
                        first: first.to_string(),
                        second: category.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let names: Vec<&str> = catalog.categories().iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["蔬菜", "肉类", "主食", "其他"]);
        assert_eq!(catalog.all_tags().count(), 37);
        assert_eq!(catalog.category_of("土豆").unwrap().name, "蔬菜");
        assert_eq!(catalog.category_of("烤箱").unwrap().title(), "🔍 其他的标签");
        assert!(catalog.category_of("可乐").is_none());
    }

    #[test]
    fn test_title_falls_back_to_name() {
        let catalog = Catalog::from_yaml_str(indoc! {"
            categories:
              - name: 工具
                tags: [烤箱]
        "})
        .unwrap();

        assert_eq!(catalog.categories()[0].title(), "工具");
    }

    #[test]
    fn test_duplicate_tag() {
        let result = Catalog::from_yaml_str(indoc! {"
            categories:
              - name: 蔬菜
                tags: [土豆, 番茄]
              - name: 水果
                tags: [番茄]
        "});

        match result {
            Err(CatalogError::DuplicateTag { tag, first, second }) => {
                assert_eq!(tag, "番茄");
                assert_eq!(first, "蔬菜");
                assert_eq!(second, "水果");
            }
            other => panic!("expected duplicate tag error, got {other:?}"),
        }
    }

    #[test]
    fn test_unnamed_category() {
        let result = Catalog::from_yaml_str(indoc! {"
            categories:
              - name: ''
                tags: [米]
        "});
        assert!(matches!(result, Err(CatalogError::UnnamedCategory(0))));
    }

    #[test]
    fn test_empty_tag() {
        let result = Catalog::from_yaml_str(indoc! {"
            categories:
              - name: 主食
                tags: [米, '']
        "});
        assert!(matches!(result, Err(CatalogError::EmptyTag(name)) if name == "主食"));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            Catalog::from_yaml_str("categories: 3"),
            Err(CatalogError::Yaml(_))
        ));
    }
}
