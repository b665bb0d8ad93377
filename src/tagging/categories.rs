use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::Category;

#[derive(Error, Debug)]
pub enum CategoryMapError {
    #[error("Failed to read category map: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse category map: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Tag '{tag}' is listed under both {first} and {second}")]
    DuplicateTag {
        tag: String,
        first: Category,
        second: Category,
    },
}

/// Serializable form: one list of tags per category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryLists {
    pub adj_adv: Vec<String>,
    pub noun: Vec<String>,
    pub other: Vec<String>,
    pub verb: Vec<String>,
}

/// Maps part-of-speech tags onto the four grammatical categories.
///
/// Tags that are not listed fall into [`Category::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    tags: HashMap<String, Category>,
}

impl CategoryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Penn Treebank tag set
    #[must_use]
    pub fn penn_treebank() -> Self {
        let lists = CategoryLists {
            adj_adv: ["JJ", "JJR", "JJS", "RB", "RBR", "RBS", "WRB"]
                .map(String::from)
                .to_vec(),
            noun: ["NN", "NNS", "NNP", "NNPS"].map(String::from).to_vec(),
            other: Vec::new(),
            verb: ["VB", "VBD", "VBG", "VBN", "VBP", "VBZ", "MD"]
                .map(String::from)
                .to_vec(),
        };
        // The built-in lists are disjoint
        Self::from_lists(lists).unwrap_or_default()
    }

    /// Build a map from per-category tag lists.
    ///
    /// # Errors
    ///
    /// Returns `CategoryMapError::DuplicateTag` if a tag appears under two
    /// different categories.
    pub fn from_lists(lists: CategoryLists) -> Result<Self, CategoryMapError> {
        let mut map = Self::new();
        let groups = [
            (Category::AdjAdv, lists.adj_adv),
            (Category::Noun, lists.noun),
            (Category::Other, lists.other),
            (Category::Verb, lists.verb),
        ];
        for (category, tags) in groups {
            for tag in tags {
                if let Some(&first) = map.tags.get(&tag) {
                    if first != category {
                        return Err(CategoryMapError::DuplicateTag {
                            tag,
                            first,
                            second: category,
                        });
                    }
                }
                map.tags.insert(tag, category);
            }
        }
        Ok(map)
    }

    /// Parse a map from JSON: `{"adj_adv": [...], "noun": [...], "other": [...], "verb": [...]}`
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a tag is listed twice.
    pub fn from_json(json: &str) -> Result<Self, CategoryMapError> {
        let lists: CategoryLists = serde_json::from_str(json)?;
        Self::from_lists(lists)
    }

    /// Load a map from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, CategoryMapError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a map from four plain-text files with one tag per line
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read or a tag is listed twice.
    pub fn load_from_tag_files(
        adj_adv: &Path,
        noun: &Path,
        other: &Path,
        verb: &Path,
    ) -> Result<Self, CategoryMapError> {
        let lists = CategoryLists {
            adj_adv: read_tag_file(adj_adv)?,
            noun: read_tag_file(noun)?,
            other: read_tag_file(other)?,
            verb: read_tag_file(verb)?,
        };
        Self::from_lists(lists)
    }

    pub fn insert(&mut self, tag: impl Into<String>, category: Category) {
        self.tags.insert(tag.into(), category);
    }

    #[must_use]
    pub fn category(&self, tag: &str) -> Category {
        self.tags.get(tag).copied().unwrap_or(Category::Other)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

fn read_tag_file(path: &Path) -> Result<Vec<String>, std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect())
}
