//! mastery-report: Report rendering for mastery assessments.
//!
//! Turns a [`mastery_core::report::MasteryReport`] into a self-contained
//! HTML dashboard.

pub mod html;

pub use html::{generate_html, write_html_report};
