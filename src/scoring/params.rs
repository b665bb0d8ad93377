use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::types::{LengthMode, CATEGORY_COUNT, MAX_MODULES};
use crate::utils::validation::is_valid_weight;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read parameters: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse parameters: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Parameter {name} = {value} is outside {expected}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("At least one module weight is required")]
    NoModuleWeights,

    #[error("{0} module weights given, at most 4 stages are supported")]
    TooManyModuleWeights(usize),

    #[error("Invalid {name}[{index}] = {value}: weights must be finite and non-negative")]
    InvalidWeight {
        name: &'static str,
        index: usize,
        value: f64,
    },
}

/// Parameters of the METEOR scoring formulas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Precision/recall trade-off in the harmonic mean
    pub alpha: f64,
    /// Exponent of the fragmentation penalty
    pub beta: f64,
    /// Maximum fragmentation penalty
    pub gamma: f64,
    /// Content-word share of the legacy weighting (function words get `1 - delta`)
    pub delta: f64,
    /// One weight per alignment stage
    pub module_weights: Vec<f64>,
    /// One weight per grammatical category, in `Category::ALL` order
    pub category_weights: [f64; CATEGORY_COUNT],
    pub length_mode: LengthMode,
}

impl Default for ScoringParams {
    /// English METEOR parameters
    fn default() -> Self {
        Self {
            alpha: 0.85,
            beta: 0.20,
            gamma: 0.60,
            delta: 0.75,
            module_weights: vec![1.0, 0.6, 0.8, 0.6],
            category_weights: [1.0; CATEGORY_COUNT],
            length_mode: LengthMode::Tokens,
        }
    }
}

impl ScoringParams {
    /// Load parameters from a JSON file and validate them
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse parameters from JSON and validate them.
    ///
    /// Missing fields take their default value. `category_weights` must have
    /// exactly four entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    #[must_use]
    pub fn with_module_weights(mut self, weights: Vec<f64>) -> Self {
        self.module_weights = weights;
        self
    }

    #[must_use]
    pub fn with_length_mode(mut self, mode: LengthMode) -> Self {
        self.length_mode = mode;
        self
    }

    /// Check every parameter against its valid range
    ///
    /// # Errors
    ///
    /// Returns the first parameter found out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("alpha", self.alpha)?;
        check_unit("gamma", self.gamma)?;
        check_unit("delta", self.delta)?;
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "beta",
                value: self.beta,
                expected: "[0, inf)",
            });
        }

        validate_module_weights(&self.module_weights)?;
        for (index, &value) in self.category_weights.iter().enumerate() {
            if !is_valid_weight(value) {
                return Err(ConfigError::InvalidWeight {
                    name: "category_weights",
                    index,
                    value,
                });
            }
        }
        if self.category_weights.iter().all(|&w| w == 0.0) {
            warn!("All category weights are zero; category-weighted scores will be 0");
        }
        if self.length_mode == LengthMode::Characters {
            warn!("Character-based lengths do not populate category statistics");
        }
        Ok(())
    }
}

/// Validate a stage weight vector on its own
///
/// # Errors
///
/// Returns an error if the vector is empty, longer than `MAX_MODULES`, or
/// holds a negative or non-finite weight.
pub fn validate_module_weights(weights: &[f64]) -> Result<(), ConfigError> {
    if weights.is_empty() {
        return Err(ConfigError::NoModuleWeights);
    }
    if weights.len() > MAX_MODULES {
        return Err(ConfigError::TooManyModuleWeights(weights.len()));
    }
    for (index, &value) in weights.iter().enumerate() {
        if !is_valid_weight(value) {
            return Err(ConfigError::InvalidWeight {
                name: "module_weights",
                index,
                value,
            });
        }
    }
    Ok(())
}

fn check_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            expected: "[0, 1]",
        })
    }
}
