//! Tunable thresholds and weights for the mastery engine.
//!
//! Every constant the scoring rules depend on lives in [`MasteryConfig`].
//! The defaults reproduce the production calibration; a `mastery.toml` file
//! may override any subset of them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::results::MasteryLevel;

/// Easy-tier accuracy at which the easy foundation counts as mastered.
pub const EASY_MASTERED_PCT: u8 = 80;
/// Medium-tier accuracy at which the medium foundation counts as mastered.
pub const MEDIUM_MASTERED_PCT: u8 = 70;

pub const MASTERY_PCT: u8 = 90;
pub const PROFICIENT_PCT: u8 = 75;
pub const APPROACHING_PCT: u8 = 60;
pub const DEVELOPING_PCT: u8 = 40;
pub const BEGINNING_PCT: u8 = 1;

/// Attempts needed for a high-confidence estimate.
pub const HIGH_CONFIDENCE_MIN_QUESTIONS: u32 = 12;
/// Attempts needed for a medium-confidence estimate.
pub const MEDIUM_CONFIDENCE_MIN_QUESTIONS: u32 = 8;
/// Attempts needed for a low-confidence estimate.
pub const LOW_CONFIDENCE_MIN_QUESTIONS: u32 = 5;

pub const A_STAR_ADVANCED_BONUS: u8 = 10;
pub const A_STAR_FOUNDATION_PENALTY: u8 = 15;
pub const A_STAR_THRESHOLD: u8 = 85;

/// Per-tier weights used by the weighted accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierWeights {
    pub easy: f64,
    pub medium: f64,
    pub hard: f64,
}

impl TierWeights {
    pub const fn new(easy: f64, medium: f64, hard: f64) -> Self {
        Self { easy, medium, hard }
    }
}

/// Foundation mastery cutoffs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundationThresholds {
    pub easy_mastered_pct: u8,
    pub medium_mastered_pct: u8,
}

impl Default for FoundationThresholds {
    fn default() -> Self {
        Self {
            easy_mastered_pct: EASY_MASTERED_PCT,
            medium_mastered_pct: MEDIUM_MASTERED_PCT,
        }
    }
}

/// Minimum accuracy for each mastery level above Unassessed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
    pub mastery_pct: u8,
    pub proficient_pct: u8,
    pub approaching_pct: u8,
    pub developing_pct: u8,
    pub beginning_pct: u8,
}

impl LevelThresholds {
    /// Lowest accuracy that reaches `level`; `None` for Unassessed.
    pub fn min_accuracy(&self, level: MasteryLevel) -> Option<u8> {
        match level {
            MasteryLevel::Unassessed => None,
            MasteryLevel::Beginning => Some(self.beginning_pct),
            MasteryLevel::Developing => Some(self.developing_pct),
            MasteryLevel::Approaching => Some(self.approaching_pct),
            MasteryLevel::Proficient => Some(self.proficient_pct),
            MasteryLevel::Mastery => Some(self.mastery_pct),
        }
    }
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            mastery_pct: MASTERY_PCT,
            proficient_pct: PROFICIENT_PCT,
            approaching_pct: APPROACHING_PCT,
            developing_pct: DEVELOPING_PCT,
            beginning_pct: BEGINNING_PCT,
        }
    }
}

/// Sample-size cutoffs for the confidence rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    pub high_min_questions: u32,
    pub medium_min_questions: u32,
    pub low_min_questions: u32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high_min_questions: HIGH_CONFIDENCE_MIN_QUESTIONS,
            medium_min_questions: MEDIUM_CONFIDENCE_MIN_QUESTIONS,
            low_min_questions: LOW_CONFIDENCE_MIN_QUESTIONS,
        }
    }
}

/// Weight triples for each weighting regime.
///
/// A tier left out of a `[weights.<regime>]` table keeps that regime's
/// default weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "WeightingOverrides")]
pub struct WeightingConfig {
    /// Easy and medium both mastered: hard questions carry premium weight.
    pub advanced: TierWeights,
    /// Easy mastered, medium not yet: prioritize the medium tier.
    pub medium_focus: TierWeights,
    /// Weak foundations: hard-tier results are unreliable signal.
    pub foundation: TierWeights,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            advanced: TierWeights::new(1.0, 2.0, 3.0),
            medium_focus: TierWeights::new(1.0, 2.5, 1.0),
            foundation: TierWeights::new(2.0, 1.5, 0.5),
        }
    }
}

/// On-disk weights: any tier of any regime may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WeightingOverrides {
    advanced: TierOverrides,
    medium_focus: TierOverrides,
    foundation: TierOverrides,
}

#[derive(Debug, Default, Deserialize)]
struct TierOverrides {
    easy: Option<f64>,
    medium: Option<f64>,
    hard: Option<f64>,
}

impl TierOverrides {
    fn over(self, base: TierWeights) -> TierWeights {
        TierWeights {
            easy: self.easy.unwrap_or(base.easy),
            medium: self.medium.unwrap_or(base.medium),
            hard: self.hard.unwrap_or(base.hard),
        }
    }
}

impl From<WeightingOverrides> for WeightingConfig {
    fn from(overrides: WeightingOverrides) -> Self {
        let defaults = WeightingConfig::default();
        Self {
            advanced: overrides.advanced.over(defaults.advanced),
            medium_focus: overrides.medium_focus.over(defaults.medium_focus),
            foundation: overrides.foundation.over(defaults.foundation),
        }
    }
}

/// Exam readiness and recommendation gates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Added to current accuracy when ready for advanced work.
    pub advanced_bonus: u8,
    /// Subtracted from current accuracy otherwise.
    pub foundation_penalty: u8,
    /// A* potential needed for the consistency recommendation.
    pub a_star_threshold: u8,
    /// Level ordinal needed for the consistency recommendation.
    pub consistency_level: u8,
    /// Level ordinal needed for the harder-questions recommendation.
    pub challenge_level: u8,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            advanced_bonus: A_STAR_ADVANCED_BONUS,
            foundation_penalty: A_STAR_FOUNDATION_PENALTY,
            a_star_threshold: A_STAR_THRESHOLD,
            consistency_level: 4,
            challenge_level: 3,
        }
    }
}

/// Top-level mastery engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MasteryConfig {
    pub foundation: FoundationThresholds,
    pub levels: LevelThresholds,
    pub confidence: ConfidenceThresholds,
    pub weights: WeightingConfig,
    pub readiness: ReadinessConfig,
}

impl MasteryConfig {
    /// Check that thresholds are in range and ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let percents = [
            ("foundation.easy_mastered_pct", self.foundation.easy_mastered_pct),
            (
                "foundation.medium_mastered_pct",
                self.foundation.medium_mastered_pct,
            ),
            ("levels.mastery_pct", self.levels.mastery_pct),
            ("readiness.a_star_threshold", self.readiness.a_star_threshold),
            ("readiness.advanced_bonus", self.readiness.advanced_bonus),
            (
                "readiness.foundation_penalty",
                self.readiness.foundation_penalty,
            ),
        ];
        for (name, value) in percents {
            if value > 100 {
                return Err(ConfigError::PercentOutOfRange { name, value });
            }
        }

        let levels = &self.levels;
        let ladder = [
            ("levels.mastery_pct", levels.mastery_pct),
            ("levels.proficient_pct", levels.proficient_pct),
            ("levels.approaching_pct", levels.approaching_pct),
            ("levels.developing_pct", levels.developing_pct),
            ("levels.beginning_pct", levels.beginning_pct),
        ];
        for pair in ladder.windows(2) {
            let (upper, upper_value) = pair[0];
            let (lower, lower_value) = pair[1];
            if upper_value <= lower_value {
                return Err(ConfigError::NotDescending {
                    upper,
                    upper_value: upper_value.into(),
                    lower,
                    lower_value: lower_value.into(),
                });
            }
        }
        // Level 0 must stay reachable only for zero accuracy.
        if levels.beginning_pct == 0 {
            return Err(ConfigError::NotDescending {
                upper: "levels.beginning_pct",
                upper_value: 0,
                lower: "unassessed",
                lower_value: 0,
            });
        }

        let c = &self.confidence;
        let cutoffs = [
            ("confidence.high_min_questions", c.high_min_questions),
            ("confidence.medium_min_questions", c.medium_min_questions),
            ("confidence.low_min_questions", c.low_min_questions),
        ];
        for pair in cutoffs.windows(2) {
            let (upper, upper_value) = pair[0];
            let (lower, lower_value) = pair[1];
            if upper_value <= lower_value {
                return Err(ConfigError::NotDescending {
                    upper,
                    upper_value,
                    lower,
                    lower_value,
                });
            }
        }

        let regimes = [
            ("advanced", &self.weights.advanced),
            ("medium_focus", &self.weights.medium_focus),
            ("foundation", &self.weights.foundation),
        ];
        for (regime, w) in regimes {
            for (tier, value) in [("easy", w.easy), ("medium", w.medium), ("hard", w.hard)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidWeight {
                        name: format!("weights.{regime}.{tier}"),
                        value,
                    });
                }
            }
            if w.easy == 0.0 && w.medium == 0.0 && w.hard == 0.0 {
                return Err(ConfigError::ZeroWeights { regime });
            }
        }

        for (name, value) in [
            ("readiness.consistency_level", self.readiness.consistency_level),
            ("readiness.challenge_level", self.readiness.challenge_level),
        ] {
            if value > 5 {
                return Err(ConfigError::LevelOutOfRange { name, value });
            }
        }

        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `mastery.toml` in the current directory
/// 2. `~/.config/mastery/config.toml`
///
/// Falls back to the built-in defaults when neither exists.
pub fn load_config() -> Result<MasteryConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MasteryConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mastery.toml");
        if local.exists() {
            Some(local)
        } else {
            config_dir()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("invalid config: {}", path.display()))?;
            tracing::debug!("loaded mastery config from {}", path.display());
            config
        }
        None => MasteryConfig::default(),
    };

    Ok(config)
}

/// Parse and validate a TOML config string.
pub fn parse_config_str(content: &str) -> Result<MasteryConfig> {
    let config: MasteryConfig = toml::from_str(content).context("failed to parse config TOML")?;
    config.validate()?;
    Ok(config)
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mastery"))
}
