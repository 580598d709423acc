use super::TagSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selection state of a single tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagState {
    #[default]
    Unselected,
    /// The user has this ingredient or tool.
    Wanted,
    /// Recipes using this ingredient or tool are excluded.
    Unwanted,
}

impl TagState {
    /// Next state in the `Unselected → Wanted → Unwanted → Unselected` cycle.
    pub fn next(self) -> Self {
        match self {
            TagState::Unselected => TagState::Wanted,
            TagState::Wanted => TagState::Unwanted,
            TagState::Unwanted => TagState::Unselected,
        }
    }
}

/// Sparse mapping from tag to [`TagState`].
///
/// Only `Wanted` and `Unwanted` entries are stored; a tag that is absent is
/// `Unselected`. [`TagStates::state`] is the only place that rule lives.
///
/// Serializes as a JSON object such as `{"土豆": "wanted", "鸡蛋": "unwanted"}`.
/// Deserialization drops `"unselected"` entries so the mapping stays sparse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, TagState>", into = "BTreeMap<String, TagState>")]
pub struct TagStates {
    states: BTreeMap<String, TagState>,
}

impl TagStates {
    /// Creates an empty mapping (every tag unselected).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of `tag`, `Unselected` if it has no entry.
    pub fn state(&self, tag: &str) -> TagState {
        self.states.get(tag).copied().unwrap_or_default()
    }

    /// Returns a new mapping with `tag` advanced one step along the cycle.
    ///
    /// Any string is a valid tag, including ones no catalog knows about.
    pub fn toggled(&self, tag: &str) -> TagStates {
        let mut next = self.clone();
        next.toggle(tag);
        next
    }

    /// In-place variant of [`TagStates::toggled`].
    pub fn toggle(&mut self, tag: &str) {
        match self.state(tag).next() {
            TagState::Unselected => {
                self.states.remove(tag);
            }
            state => {
                self.states.insert(tag.to_string(), state);
            }
        }
    }

    /// Resets every tag to `Unselected`.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Tags currently marked `Wanted`.
    pub fn wanted(&self) -> TagSet {
        self.tags_in(TagState::Wanted)
    }

    /// Tags currently marked `Unwanted`.
    pub fn unwanted(&self) -> TagSet {
        self.tags_in(TagState::Unwanted)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates over the stored (non-default) entries in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TagState)> {
        self.states.iter().map(|(tag, state)| (tag.as_str(), *state))
    }

    /// Parses a mapping previously produced by [`TagStates::to_json`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn tags_in(&self, wanted_state: TagState) -> TagSet {
        self.states
            .iter()
            .filter(|(_, state)| **state == wanted_state)
            .map(|(tag, _)| tag.clone())
            .collect()
    }
}

impl From<BTreeMap<String, TagState>> for TagStates {
    fn from(mut states: BTreeMap<String, TagState>) -> Self {
        states.retain(|_, state| *state != TagState::Unselected);
        TagStates { states }
    }
}

impl From<TagStates> for BTreeMap<String, TagState> {
    fn from(states: TagStates) -> Self {
        states.states
    }
}

impl<S: Into<String>> FromIterator<(S, TagState)> for TagStates {
    fn from_iter<I: IntoIterator<Item = (S, TagState)>>(iter: I) -> Self {
        let states: BTreeMap<String, TagState> =
            iter.into_iter().map(|(tag, state)| (tag.into(), state)).collect();
        states.into()
    }
}

/// Pure transition used by the UI: returns `current` with `tag` toggled.
pub fn toggle_tag(tag: &str, current: &TagStates) -> TagStates {
    current.toggled(tag)
}

/// Returns the empty mapping, whatever the previous selection was.
pub fn clear_all() -> TagStates {
    TagStates::new()
}
