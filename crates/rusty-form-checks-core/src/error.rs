//! Configuration errors
//!
//! Raised while building checks, never while evaluating them.

use thiserror::Error;

/// Programmer errors surfaced when a check, sequence or group is set up
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Regular expression failed to compile
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Comparison operator marker not one of `<`, `>`, `==`, `===`, `<=`, `>=`
    #[error("Unknown comparison operator: {0}")]
    UnknownOperator(String),

    /// Regex logic marker not one of `!!`, `!`, `match`
    #[error("Unknown regex logic: {0}")]
    UnknownRegexLogic(String),

    /// Date literal could not be parsed as `YYYY-MM-DD`
    #[error("Invalid date literal: {0}")]
    InvalidDate(String),

    /// Named sequence key not present in the catalog
    #[error("Unknown sequence key: {0}")]
    UnknownSequenceKey(String),

    /// Override object must select exactly one named rule
    #[error("Override must contain exactly one key, found {0}")]
    InvalidOverride(usize),

    /// A rule is missing a parameter its evaluator needs
    #[error("Rule `{key}` is missing parameter `{param}`")]
    MissingParam { key: String, param: &'static str },

    /// A rule sets a parameter its evaluator never reads
    #[error("Rule `{key}` does not use parameter `{param}`")]
    UnusedParam { key: String, param: &'static str },

    /// Cross-field rule references a field the group does not have
    #[error("Unknown field: {0}")]
    UnknownField(String),
}
