//! Error types for cost accounting.

use thiserror::Error;

/// Errors raised by the cost engine and session controller.
///
/// Negative counts and rates are never errors: they are clamped to zero where
/// they enter the session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CostError {
    /// A tick reported time running backwards.
    #[error("elapsed seconds must not be negative, got {seconds}")]
    NegativeElapsed { seconds: f64 },

    /// A tick reported NaN or an infinite duration.
    #[error("elapsed seconds must be finite, got {seconds}")]
    NonFiniteElapsed { seconds: f64 },

    /// The role id is not part of the session catalog.
    #[error("unknown role: {role_id}")]
    UnknownRole { role_id: String },
}
