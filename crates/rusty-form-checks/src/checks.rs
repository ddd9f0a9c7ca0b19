// File: src/checks.rs
// Purpose: Check factory and the named check sets built on it

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use rusty_form_checks_core::{CompareOp, RegexLogic};

use crate::control::{run_validators, AbstractControl, ValidationErrors, ValidatorFn};
use crate::validators::CheckKind;

/// Minimum password length used by [`password_checks`] and the password catalog
pub const PASSWORD_MIN_LENGTH: usize = 8;
/// Maximum password length used by [`password_checks`] and the password catalog
pub const PASSWORD_MAX_LENGTH: usize = 64;
pub const ADDRESS_MAX_LENGTH: usize = 100;

pub(crate) const ALPHA_PATTERN: &str = "[A-Za-z]";
pub(crate) const LOWERCASE_PATTERN: &str = "[a-z]";
pub(crate) const UPPERCASE_PATTERN: &str = "[A-Z]";
pub(crate) const NUMERIC_PATTERN: &str = "[0-9]";
pub(crate) const SPECIAL_PATTERN: &str = r"[^A-Za-z0-9\s]";

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(ALPHA_PATTERN).unwrap());
static LOWERCASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(LOWERCASE_PATTERN).unwrap());
static UPPERCASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(UPPERCASE_PATTERN).unwrap());
static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(NUMERIC_PATTERN).unwrap());
static SPECIAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(SPECIAL_PATTERN).unwrap());

static STREET_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+").unwrap());
static STREET_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]{2,}").unwrap());
static ADDRESS_INVALID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9\s.,#'/\-]").unwrap());

/// One declarative rule: a check, its error name and the message shown for it
#[derive(Debug, Clone)]
pub struct CheckDescriptor {
    pub check: CheckKind,
    pub error_name: String,
    pub error_message: String,
}

impl CheckDescriptor {
    pub fn new(check: CheckKind, error_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            check,
            error_name: error_name.into(),
            error_message: error_message.into(),
        }
    }
}

/// Current state of one configured check, for a checklist-style display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStatus {
    pub error_name: String,
    pub message: String,
    pub failing: bool,
}

/// Validators and the message lookup produced by [`check_factory`]
#[derive(Clone, Default)]
pub struct ComposedCheckSet {
    pub validators: Vec<ValidatorFn>,
    pub messages: BTreeMap<String, String>,
}

impl ComposedCheckSet {
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Runs every validator, never stopping early, and merges their errors
    pub fn evaluate(&self, control: &dyn AbstractControl) -> Option<ValidationErrors> {
        run_validators(&self.validators, control)
    }

    /// Every configured message with whether its check is currently failing
    pub fn statuses(&self, control: &dyn AbstractControl) -> Vec<CheckStatus> {
        let errors = self.evaluate(control).unwrap_or_default();
        self.messages
            .iter()
            .map(|(name, message)| CheckStatus {
                error_name: name.clone(),
                message: message.clone(),
                failing: errors.contains_key(name),
            })
            .collect()
    }

    /// Error names currently failing
    pub fn failing(&self, control: &dyn AbstractControl) -> Vec<String> {
        self.evaluate(control)
            .map(|errors| errors.into_keys().collect())
            .unwrap_or_default()
    }
}

impl fmt::Debug for ComposedCheckSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedCheckSet")
            .field("validators", &self.validators.len())
            .field("messages", &self.messages)
            .finish()
    }
}

/// Turns descriptors into validators plus a name → message lookup
///
/// Validators keep input order and one is produced per descriptor. Duplicate
/// error names are not collapsed: both validators run, and the later message
/// wins in `messages`.
pub fn check_factory(descriptors: impl IntoIterator<Item = CheckDescriptor>) -> ComposedCheckSet {
    let mut set = ComposedCheckSet::default();

    for descriptor in descriptors {
        let CheckDescriptor {
            check,
            error_name,
            error_message,
        } = descriptor;

        if set.messages.contains_key(&error_name) {
            tracing::debug!("Duplicate check name `{}`, later message wins", error_name);
        }
        set.validators.push(check.bind(error_name.clone(), error_message.clone()));
        set.messages.insert(error_name, error_message);
    }

    tracing::debug!(
        "Composed {} checks ({} messages)",
        set.validators.len(),
        set.messages.len()
    );
    set
}

fn regex_check(regex: &Lazy<Regex>, logic: RegexLogic) -> CheckKind {
    CheckKind::Pattern {
        pattern: Regex::clone(regex),
        logic,
    }
}

/// Letter, case, digit, special character and length rules for passwords
pub fn password_checks() -> ComposedCheckSet {
    check_factory([
        CheckDescriptor::new(
            regex_check(&ALPHA_REGEX, RegexLogic::MatchRequired),
            "noAlpha",
            "Must contain at least one letter",
        ),
        CheckDescriptor::new(
            regex_check(&LOWERCASE_REGEX, RegexLogic::MatchRequired),
            "noLowercase",
            "Must contain at least one lowercase letter",
        ),
        CheckDescriptor::new(
            regex_check(&UPPERCASE_REGEX, RegexLogic::MatchRequired),
            "noUppercase",
            "Must contain at least one uppercase letter",
        ),
        CheckDescriptor::new(
            regex_check(&NUMERIC_REGEX, RegexLogic::MatchRequired),
            "noNumeric",
            "Must contain at least one number",
        ),
        CheckDescriptor::new(
            regex_check(&SPECIAL_REGEX, RegexLogic::MatchRequired),
            "noSpecial",
            "Must contain at least one special character",
        ),
        CheckDescriptor::new(
            CheckKind::Length {
                length: PASSWORD_MIN_LENGTH,
                op: CompareOp::Ge,
            },
            "minLength",
            format!("Must be at least {} characters", PASSWORD_MIN_LENGTH),
        ),
        CheckDescriptor::new(
            CheckKind::Length {
                length: PASSWORD_MAX_LENGTH,
                op: CompareOp::Le,
            },
            "maxLength",
            format!("Must be at most {} characters", PASSWORD_MAX_LENGTH),
        ),
    ])
}

/// Minimum and maximum word count
pub fn word_count_checks(min: usize, max: usize) -> ComposedCheckSet {
    check_factory([
        CheckDescriptor::new(
            CheckKind::WordCount {
                count: min,
                op: CompareOp::Ge,
            },
            "minWords",
            format!("Must contain at least {} words", min),
        ),
        CheckDescriptor::new(
            CheckKind::WordCount {
                count: max,
                op: CompareOp::Le,
            },
            "maxWords",
            format!("Must contain at most {} words", max),
        ),
    ])
}

/// Street address rules
pub fn address_checks() -> ComposedCheckSet {
    check_factory([
        CheckDescriptor::new(CheckKind::Required, "required", "Address is required"),
        CheckDescriptor::new(
            regex_check(&STREET_NUMBER_REGEX, RegexLogic::MatchRequired),
            "noStreetNumber",
            "Address must start with a street number",
        ),
        CheckDescriptor::new(
            regex_check(&STREET_NAME_REGEX, RegexLogic::MatchRequired),
            "noStreetName",
            "Address must include a street name",
        ),
        CheckDescriptor::new(
            regex_check(&ADDRESS_INVALID_REGEX, RegexLogic::MustNotMatch),
            "invalidCharacters",
            "Address contains invalid characters",
        ),
        CheckDescriptor::new(
            CheckKind::Length {
                length: ADDRESS_MAX_LENGTH,
                op: CompareOp::Le,
            },
            "maxLength",
            format!("Must be at most {} characters", ADDRESS_MAX_LENGTH),
        ),
    ])
}
