use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Heading of the ingredient section in HowToCook-style markdown recipes.
const INGREDIENT_HEADING: &str = "## 必备原料和工具";

static INGREDIENT_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?s){INGREDIENT_HEADING}\n\n(.*?)(?:\n##|\z)"))
        .expect("ingredient section pattern is valid")
});

/// How the `content` of a recipe should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// `content` is a markdown body rendered in-app.
    Markdown,
    /// `content` is a video URL opened externally.
    Video,
}

/// A single row of the `Recipe` table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipe {
    /// Store-assigned identifier, unique and stable
    pub id: i64,
    /// Display name
    pub name: String,
    /// Markdown body or video URL, depending on `is_video`
    pub content: String,
    /// Discriminator for `content`
    pub is_video: bool,
}

impl Recipe {
    pub fn new(id: i64, name: impl Into<String>, content: impl Into<String>, is_video: bool) -> Self {
        Recipe {
            id,
            name: name.into(),
            content: content.into(),
            is_video,
        }
    }

    /// Returns how `content` should be presented.
    pub fn kind(&self) -> ContentKind {
        if self.is_video {
            ContentKind::Video
        } else {
            ContentKind::Markdown
        }
    }

    /// Returns the video URL if this is a video recipe.
    pub fn video_url(&self) -> Option<&str> {
        self.is_video.then_some(self.content.as_str())
    }

    /// Returns the ingredients and tools listed in the markdown body.
    ///
    /// Video recipes have no body to read and always return an empty list.
    pub fn ingredients(&self) -> Vec<String> {
        match self.kind() {
            ContentKind::Markdown => extract_ingredients(&self.content),
            ContentKind::Video => Vec::new(),
        }
    }
}

/// Extracts the bullet items of the `## 必备原料和工具` section.
///
/// Only lines starting with `-` are kept, with the marker and surrounding
/// whitespace removed. Empty bullets are skipped. Returns an empty list when
/// the section is missing.
pub fn extract_ingredients(markdown: &str) -> Vec<String> {
    let Some(section) = INGREDIENT_SECTION
        .captures(markdown)
        .and_then(|caps| caps.get(1))
    else {
        return Vec::new();
    };

    section
        .as_str()
        .lines()
        .filter_map(|line| line.trim().strip_prefix('-'))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
