use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which matching rule the engine applies to the wanted/unwanted tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// At least one wanted tag, no unwanted tag.
    #[default]
    Fuzzy,
    /// Every wanted tag, no unwanted tag.
    Accurate,
    /// Only wanted tags: the recipe can be cooked with what is at hand.
    Survival,
}

impl SearchMode {
    pub const ALL: [SearchMode; 3] = [SearchMode::Fuzzy, SearchMode::Accurate, SearchMode::Survival];

    /// Label shown in the mode picker.
    pub fn display_name(self) -> &'static str {
        match self {
            SearchMode::Fuzzy => "模糊匹配",
            SearchMode::Accurate => "严格匹配",
            SearchMode::Survival => "生存模式",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SearchMode::Fuzzy => "fuzzy",
            SearchMode::Accurate => "accurate",
            SearchMode::Survival => "survival",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown search mode: {0}")]
pub struct UnknownSearchMode(pub String);

impl FromStr for SearchMode {
    type Err = UnknownSearchMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSearchMode(s.to_string()))
    }
}
