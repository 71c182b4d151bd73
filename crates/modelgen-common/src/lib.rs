//! Common types and utilities for the modelgen code generator.
//!
//! This crate provides foundational types used across all modelgen crates:
//! - Diagnostics attached to model elements (`Diagnostic`, codes, templates)
//! - Resolution limits and thresholds

pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, DiagnosticRelatedInformation,
    diagnostic_codes, diagnostic_messages, format_message,
};

// Centralized limits and thresholds
pub mod limits;
