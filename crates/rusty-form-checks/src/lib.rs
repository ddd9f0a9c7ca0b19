//! # rusty-form-checks
//!
//! Composable form checks: declarative rule lists turned into validators plus
//! the messages a form shows for them.
//!
//! ## Quick Start
//!
//! ```
//! use rusty_form_checks::{dynamic_password_validator, password_checks, FormControl, SequenceSelection};
//!
//! // Show-all: every password rule with its current state
//! let checks = password_checks();
//! let control = FormControl::new("abc");
//! let failing = checks.failing(&control);
//! assert!(failing.contains(&"noUppercase".to_string()));
//!
//! // Short-circuit: only the first failing rule of a selection
//! let selection = [SequenceSelection::from("noNumeric"), SequenceSelection::from("minLength")];
//! let validator = dynamic_password_validator(Some(&selection[..])).unwrap();
//! let errors = validator(&control).unwrap();
//! assert_eq!(errors.len(), 1);
//! assert!(errors.contains_key("noNumeric"));
//! ```
//!
//! ## Two evaluation strategies
//!
//! - [`check_factory`] / [`ComposedCheckSet::evaluate`] run every check and
//!   report all failures, for checklist-style displays.
//! - [`sequential_validator`] stops at the first failing rule, for a single
//!   inline message.
//!
//! ## Features
//!
//! - **`catalog`** (default) - Load named rule catalogs from TOML files
//!
//! ## Architecture
//!
//! - **`rusty-form-checks-core`** - Primitive evaluators (regex, numeric, length, dates),
//!   re-exported as [`primitives`]
//! - **this crate** - Controls, error bookkeeping, check sets, sequences, cross-field rules

#![doc(html_root_url = "https://docs.rs/rusty-form-checks/0.1.0")]

pub use rusty_form_checks_core as primitives;
pub use rusty_form_checks_core::{CompareOp, ConfigError, RegexLogic};

pub mod checks;
pub mod control;
pub mod cross_field;
pub mod display;
pub mod error_state;
pub mod sequence;
pub mod validators;

#[cfg(feature = "catalog")]
pub mod catalog;

pub use checks::{
    address_checks, check_factory, password_checks, word_count_checks, CheckDescriptor, CheckStatus,
    ComposedCheckSet,
};
pub use control::{
    AbstractControl, ErrorPayload, FormControl, FormGroup, ValidationError, ValidationErrors, ValidatorFn,
};
pub use cross_field::{
    link_to, linked_to, required_either, required_if, required_if_not, CrossFieldKind, CrossFieldRule,
};
pub use display::{select_messages, DisplayOptions, PartialDisplayOptions};
pub use error_state::{remove_errors, set_errors};
pub use sequence::{
    dynamic_password_validator, sequential_validator, Evaluator, NamedSequenceMap, SequenceConfig,
    SequenceParams, SequenceSelection,
};
pub use validators::CheckKind;

#[cfg(feature = "catalog")]
pub use catalog::{load_catalog, parse_catalog};
