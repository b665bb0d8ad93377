use serde::{Deserialize, Serialize};

/// Number of alignment stages the statistics line format reserves room for
pub const MAX_MODULES: usize = 4;

/// Number of grammatical categories used by the category-weighted scheme
pub const CATEGORY_COUNT: usize = 4;

/// Alignment stage (module), ordered by decreasing match confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Surface forms are identical
    Exact,
    /// Stems are identical
    Stem,
    /// Words share a synonym set
    Synonym,
    /// Phrases appear together in a paraphrase table
    Paraphrase,
}

impl Stage {
    pub const ALL: [Self; MAX_MODULES] = [Self::Exact, Self::Stem, Self::Synonym, Self::Paraphrase];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Weight handed to the aligner when it chooses between competing alignments.
    ///
    /// These are not the scoring weights: the aligner always prefers exact
    /// matches and treats every fuzzier stage alike.
    #[must_use]
    pub fn aligner_weight(self) -> f64 {
        match self {
            Self::Exact => 1.0,
            Self::Stem | Self::Synonym | Self::Paraphrase => 0.5,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Stem => write!(f, "stem"),
            Self::Synonym => write!(f, "synonym"),
            Self::Paraphrase => write!(f, "paraphrase"),
        }
    }
}

/// Grammatical category a token is assigned to from its part-of-speech tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    AdjAdv,
    Noun,
    Other,
    Verb,
}

impl Category {
    /// All categories, in the order used by weight vectors and the stats line format
    pub const ALL: [Self; CATEGORY_COUNT] = [Self::AdjAdv, Self::Noun, Self::Other, Self::Verb];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AdjAdv => write!(f, "adj_adv"),
            Self::Noun => write!(f, "noun"),
            Self::Other => write!(f, "other"),
            Self::Verb => write!(f, "verb"),
        }
    }
}

/// One side of a sentence pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The candidate (system output) being evaluated
    Test,
    Reference,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Test => write!(f, "test"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

/// Unit in which lengths and matches are counted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthMode {
    #[default]
    Tokens,
    /// Sum of the character lengths of the tokens involved
    Characters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_index() {
        assert_eq!(Stage::from_index(0), Some(Stage::Exact));
        assert_eq!(Stage::from_index(3), Some(Stage::Paraphrase));
        assert_eq!(Stage::from_index(MAX_MODULES), None);
    }

    #[test]
    fn test_aligner_weights() {
        assert!((Stage::Exact.aligner_weight() - 1.0).abs() < f64::EPSILON);
        assert!((Stage::Synonym.aligner_weight() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_category_order() {
        let indices: Vec<usize> = Category::ALL.iter().map(|c| c.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(Category::AdjAdv.to_string(), "adj_adv");
    }
}
