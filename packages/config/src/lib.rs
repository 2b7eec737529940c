#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Construction-time configuration for the civic-link matching engine.
//!
//! Every threshold, marker list and vocabulary the engine uses is carried
//! by an [`EngineConfig`] value handed to the segmenter, resolver and
//! comparator when they are built. Nothing is read from global state, so a
//! test suite can exercise alternate thresholds by building its own config.
//!
//! Configs are plain TOML. Every field has a default, so an empty document
//! is a valid config:
//!
//! ```toml
//! [matching]
//! similarity_threshold = 0.9
//!
//! [segmenter]
//! no_number_placeholder = "SNC"
//! ```

use std::path::Path;

use serde::Deserialize;

/// The built-in configuration, embedded at compile time.
///
/// Kept in sync with [`EngineConfig::default()`].
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Similarity thresholds shared by the resolver and the comparator.
    pub matching: MatchingConfig,
    /// Marker vocabulary for address segmentation.
    pub segmenter: SegmenterConfig,
    /// Street-type prefixes stripped before street comparison.
    /// `None` selects the built-in vocabulary.
    pub street_prefixes: Option<Vec<String>>,
}

/// Fuzzy matching thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum similarity ratio for two values to count as similar.
    pub similarity_threshold: f64,
    /// Maximum ratio gap within which two gazetteer candidates tie.
    pub tie_margin: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.88,
            tie_margin: 0.02,
        }
    }
}

/// Marker vocabulary used by the address segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// House-number value stored when the address has no number.
    pub no_number_placeholder: String,
    /// Tokens meaning "no house number" (e.g. `SNC`, `SN`).
    pub no_number_markers: Vec<String>,
    /// Upper-case month names used to recognize written-out dates.
    pub month_names: Vec<String>,
    /// Label prefixed to the staircase in the compact view.
    pub staircase_label: String,
    /// Label prefixed to the unit in the compact view.
    pub unit_label: String,
    /// Label prefixed to the floor in the compact view.
    pub floor_label: String,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            no_number_placeholder: "SNC".to_string(),
            no_number_markers: vec!["SNC".to_string(), "SN".to_string()],
            month_names: [
                "GENNAIO",
                "FEBBRAIO",
                "MARZO",
                "APRILE",
                "MAGGIO",
                "GIUGNO",
                "LUGLIO",
                "AGOSTO",
                "SETTEMBRE",
                "OTTOBRE",
                "NOVEMBRE",
                "DICEMBRE",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            staircase_label: "SC".to_string(),
            unit_label: "INT".to_string(),
            floor_label: "PI".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML config document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid TOML for
    /// this schema, or [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`EngineConfig::from_toml`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_toml(&text)?;
        log::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Checks value ranges and required non-empty lists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.matching.similarity_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::invalid(
                "matching.similarity_threshold",
                format!("must be in (0, 1], got {threshold}"),
            ));
        }

        let margin = self.matching.tie_margin;
        if !(0.0..1.0).contains(&margin) {
            return Err(ConfigError::invalid(
                "matching.tie_margin",
                format!("must be in [0, 1), got {margin}"),
            ));
        }

        let segmenter = &self.segmenter;
        if segmenter.no_number_placeholder.trim().is_empty() {
            return Err(ConfigError::invalid(
                "segmenter.no_number_placeholder",
                "must not be empty",
            ));
        }
        if !has_non_blank(&segmenter.no_number_markers) {
            return Err(ConfigError::invalid(
                "segmenter.no_number_markers",
                "must contain at least one marker",
            ));
        }
        if !has_non_blank(&segmenter.month_names) {
            return Err(ConfigError::invalid(
                "segmenter.month_names",
                "must contain at least one month name",
            ));
        }

        if self
            .street_prefixes
            .as_deref()
            .is_some_and(|prefixes| !has_non_blank(prefixes))
        {
            return Err(ConfigError::invalid(
                "street_prefixes",
                "must contain at least one prefix when set",
            ));
        }

        Ok(())
    }
}

fn has_non_blank(values: &[String]) -> bool {
    values.iter().any(|v| !v.trim().is_empty())
}

/// Errors from loading an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML syntax or schema error.
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value failed validation.
    #[error("Invalid config value for {field}: {message}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The config file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path of the config file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}
