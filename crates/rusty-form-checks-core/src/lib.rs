//! Rusty Form Checks Core
//!
//! Stateless predicates used by every check in `rusty-form-checks`:
//! regular-expression tests, numeric comparison, string length, word count
//! and date normalisation.
//!
//! None of these functions fail at evaluation time. Anything that can be
//! malformed (a pattern, an operator marker, a date literal) is parsed up
//! front and reported as a [`ConfigError`].

pub mod date;
pub mod error;
pub mod numeric;
pub mod pattern;
pub mod string;

// Re-export all evaluators
pub use date::*;
pub use error::ConfigError;
pub use numeric::*;
pub use pattern::*;
pub use string::*;
