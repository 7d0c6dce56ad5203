//! mastery-core: Mastery scoring engine, data model, and report types.
//!
//! This crate turns a learner's cumulative per-difficulty answer counts into
//! a calibrated mastery assessment, and defines the record, configuration,
//! and report types the rest of the workspace builds on.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod results;
pub mod statistics;

pub use config::MasteryConfig;
pub use engine::MasteryEngine;
pub use model::{ProgressSet, SubtopicProgress, Tier, TierStats};
pub use results::{ComprehensiveMasteryData, MasteryLevel};
