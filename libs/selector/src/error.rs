//! Error types for selector rules.

use gantry_id::SelectorId;
use thiserror::Error;

/// Errors reported by an [`crate::ExpressionEvaluator`].
///
/// Scoring never surfaces these; they are logged and the rule is treated as
/// not holding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluatorError {
    /// The expression could not be parsed.
    #[error("syntax error in expression '{expression}': {message}")]
    Syntax { expression: String, message: String },

    /// The expression parsed but failed at runtime.
    #[error("failed to evaluate expression '{expression}': {message}")]
    Evaluation { expression: String, message: String },

    /// The expression references a name missing from the context.
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
}

/// Errors from managing system selectors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// A selector with this ID is already registered.
    #[error("system selector already exists: {0}")]
    DuplicateSelector(SelectorId),

    /// No selector with this ID is registered.
    #[error("system selector not found: {0}")]
    NotFound(SelectorId),

    /// The selector failed validation.
    #[error("invalid system selector {id}: {reason}")]
    InvalidSelector { id: SelectorId, reason: String },
}

impl SelectorError {
    /// Returns true if the error indicates a missing selector.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SelectorError::NotFound(_))
    }
}
