//! Error types for configuration and progress records.
//!
//! The engine itself is infallible; these errors come from the layers that
//! load configuration and progress files.

use thiserror::Error;

/// A configuration value that would make the engine's thresholds incoherent.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A percentage threshold above 100.
    #[error("{name} must be at most 100, got {value}")]
    PercentOutOfRange { name: &'static str, value: u8 },

    /// Thresholds that must be strictly descending are not.
    #[error("{upper} ({upper_value}) must be greater than {lower} ({lower_value})")]
    NotDescending {
        upper: &'static str,
        upper_value: u32,
        lower: &'static str,
        lower_value: u32,
    },

    /// A tier weight that is negative, NaN or infinite.
    #[error("weight {name} must be a finite non-negative number, got {value}")]
    InvalidWeight { name: String, value: f64 },

    /// A regime whose weights are all zero, which would score every learner 0.
    #[error("weights.{regime} must have at least one non-zero weight")]
    ZeroWeights { regime: &'static str },

    /// A level gate outside the 0..=5 ordinal range.
    #[error("{name} must be a mastery level between 0 and 5, got {value}")]
    LevelOutOfRange { name: &'static str, value: u8 },
}

/// Problems with a progress record that make it unusable.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// The requested subtopic is not in the progress file.
    #[error("subtopic not found: {0}")]
    SubtopicNotFound(String),

    /// A subtopic entry has an empty identifier.
    #[error("subtopic entry {index} has an empty id")]
    EmptySubtopicId { index: usize },
}
