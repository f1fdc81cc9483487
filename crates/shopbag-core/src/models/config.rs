//! Configuration structures for receipt normalization.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ShopbagError};
use crate::receipt::rules::dates::DEFAULT_TWO_DIGIT_YEAR_PIVOT;

/// Main configuration for shopbag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopbagConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Two-digit years below this value are read as 20yy, the rest as 19yy.
    pub two_digit_year_pivot: u8,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            two_digit_year_pivot: DEFAULT_TWO_DIGIT_YEAR_PIVOT,
        }
    }
}

/// Receipt output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Text,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

/// Batch processing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of documents assembled concurrently.
    pub jobs: usize,

    /// Keep going after a document fails.
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            continue_on_error: false,
        }
    }
}

impl ShopbagConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.extraction.two_digit_year_pivot > 100 {
            return Err(ShopbagError::Config(format!(
                "extraction.two_digit_year_pivot must be between 0 and 100, got {}",
                self.extraction.two_digit_year_pivot
            )));
        }
        if self.batch.jobs == 0 {
            return Err(ShopbagError::Config("batch.jobs must be at least 1".to_string()));
        }
        Ok(())
    }
}
