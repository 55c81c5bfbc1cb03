use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::FeatureCounts;

/// Immutable analyzer configuration.
///
/// Holds the constant tables the scoring engine and the suggestion pass
/// consult, so the pipeline stays a pure function of its inputs. Defaults
/// reproduce the reference grading scheme; a TOML file can override them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub scoring: ScoringSection,
    #[serde(default)]
    pub style: StyleSection,
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::NotFound(path.display().to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scoring.advanced_threshold <= self.scoring.intermediate_threshold {
            return Err(ConfigError::Invalid(
                "advanced_threshold must exceed intermediate_threshold".to_string(),
            ));
        }
        if self.style.max_line_length == 0 {
            return Err(ConfigError::Invalid(
                "max_line_length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Weighted-score parameters for generic (non-domain) code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    #[serde(default)]
    pub weights: FeatureWeights,
    /// Weighted score at or above which code rates Advanced.
    pub advanced_threshold: u32,
    /// Weighted score at or above which code rates Intermediate.
    pub intermediate_threshold: u32,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            weights: FeatureWeights::default(),
            advanced_threshold: 15,
            intermediate_threshold: 8,
        }
    }
}

/// Per-feature multipliers for the generic weighted score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub functions: u32,
    pub classes: u32,
    pub imports: u32,
    pub comprehensions: u32,
    pub error_handling: u32,
    pub advanced_types: u32,
    pub docstrings: u32,
    pub decorators: u32,
    pub complex_structures: u32,
    pub advanced_features: u32,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            functions: 2,
            classes: 3,
            imports: 1,
            comprehensions: 3,
            error_handling: 3,
            advanced_types: 2,
            docstrings: 2,
            decorators: 4,
            complex_structures: 2,
            advanced_features: 5,
        }
    }
}

impl FeatureWeights {
    /// Weighted sum of the feature counts.
    pub fn apply(&self, counts: &FeatureCounts) -> u32 {
        counts.functions * self.functions
            + counts.classes * self.classes
            + counts.imports * self.imports
            + counts.comprehensions * self.comprehensions
            + counts.error_handling * self.error_handling
            + counts.advanced_types * self.advanced_types
            + counts.docstrings * self.docstrings
            + counts.decorators * self.decorators
            + counts.complex_structures * self.complex_structures
            + counts.advanced_features * self.advanced_features
    }
}

/// Limits for the style checks in the suggestion pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSection {
    /// Maximum line length before a style suggestion fires (PEP 8: 79).
    pub max_line_length: usize,
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            max_line_length: 79,
        }
    }
}
