// File: src/validators.rs
// Purpose: Check kinds and the single-field validator constructors built on them

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use rusty_form_checks_core::{
    compile_pattern, date_to_comparable_integer, length_compare, numeric_compare, parse_control_date,
    regex_test, word_count_compare, CompareOp, ConfigError, RegexLogic,
};

use crate::control::{is_empty_value, value_as_text, AbstractControl, ErrorPayload, ValidationErrors, ValidatorFn};

/// Arbitrary value predicate, `true` meaning the value passes
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl Predicate {
    pub fn new(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn test(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Condition evaluated at validation time, independent of the control value
#[derive(Clone)]
pub struct Condition(Arc<dyn Fn() -> bool + Send + Sync>);

impl Condition {
    pub fn new(f: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn holds(&self) -> bool {
        (self.0)()
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

/// One kind of check together with its arguments
#[derive(Debug, Clone)]
pub enum CheckKind {
    /// Value must be non-empty
    Required,
    /// Value must be non-empty while the condition holds
    RequiredWhen(Condition),
    Pattern { pattern: Regex, logic: RegexLogic },
    Length { length: usize, op: CompareOp },
    WordCount { count: usize, op: CompareOp },
    /// Control date (shifted by `year_offset` years) compared against `date`
    Date { date: NaiveDate, op: CompareOp, year_offset: i32 },
    Custom(Predicate),
}

impl CheckKind {
    /// Compiles `pattern` into a pattern check
    pub fn pattern(pattern: &str, logic: RegexLogic) -> Result<Self, ConfigError> {
        Ok(CheckKind::Pattern {
            pattern: compile_pattern(pattern)?,
            logic,
        })
    }

    pub fn custom(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        CheckKind::Custom(Predicate::new(f))
    }

    /// Evaluates the check against a raw value
    pub fn passes(&self, value: &Value) -> bool {
        match self {
            CheckKind::Required => !is_empty_value(value),
            CheckKind::RequiredWhen(condition) => !condition.holds() || !is_empty_value(value),
            CheckKind::Pattern { pattern, logic } => regex_test(pattern, &value_as_text(value), *logic),
            CheckKind::Length { length, op } => length_compare(&value_as_text(value), *length, *op),
            CheckKind::WordCount { count, op } => word_count_compare(&value_as_text(value), *count, *op),
            CheckKind::Date { date, op, year_offset } => {
                let text = value_as_text(value);
                // only a blank value counts as absent; anything else must parse
                let actual = match parse_control_date(&text) {
                    Some(parsed) => Some(parsed),
                    None if text.trim().is_empty() => None,
                    None => return false,
                };
                numeric_compare(
                    date_to_comparable_integer(actual, *year_offset),
                    date_to_comparable_integer(Some(*date), 0),
                    *op,
                )
            }
            CheckKind::Custom(predicate) => predicate.test(value),
        }
    }

    /// Binds the check to an error name and message
    ///
    /// A failing control yields `{error_name: message}`.
    pub fn bind(self, error_name: impl Into<String>, message: impl Into<String>) -> ValidatorFn {
        self.bind_payload(error_name.into(), ErrorPayload::Message(message.into()))
    }

    /// Binds the check so a failing control yields `{error_name: true}`
    pub fn bind_flag(self, error_name: impl Into<String>) -> ValidatorFn {
        self.bind_payload(error_name.into(), ErrorPayload::Flag(true))
    }

    fn bind_payload(self, error_name: String, payload: ErrorPayload) -> ValidatorFn {
        Arc::new(move |control: &dyn AbstractControl| {
            if self.passes(&control.value()) {
                None
            } else {
                let mut errors = ValidationErrors::new();
                errors.insert(error_name.clone(), payload.clone());
                Some(errors)
            }
        })
    }
}

/// `{required: true}` when the value is empty
pub fn required() -> ValidatorFn {
    CheckKind::Required.bind_flag("required")
}

/// `{required: true}` when the value is empty and `condition` holds
pub fn conditional_required(condition: impl Fn() -> bool + Send + Sync + 'static) -> ValidatorFn {
    CheckKind::RequiredWhen(Condition::new(condition)).bind_flag("required")
}

/// Regex check under the given logic
pub fn pattern(
    pattern: &str,
    logic: RegexLogic,
    error_name: impl Into<String>,
    message: impl Into<String>,
) -> Result<ValidatorFn, ConfigError> {
    Ok(CheckKind::pattern(pattern, logic)?.bind(error_name, message))
}

pub fn min_length(min: usize) -> ValidatorFn {
    CheckKind::Length { length: min, op: CompareOp::Ge }
        .bind("minLength", format!("Must be at least {} characters", min))
}

pub fn max_length(max: usize) -> ValidatorFn {
    CheckKind::Length { length: max, op: CompareOp::Le }
        .bind("maxLength", format!("Must be at most {} characters", max))
}

/// Length check with an arbitrary operator
pub fn length(length: usize, op: CompareOp, error_name: impl Into<String>, message: impl Into<String>) -> ValidatorFn {
    CheckKind::Length { length, op }.bind(error_name, message)
}

pub fn min_words(min: usize) -> ValidatorFn {
    CheckKind::WordCount { count: min, op: CompareOp::Ge }
        .bind("minWords", format!("Must contain at least {} words", min))
}

pub fn max_words(max: usize) -> ValidatorFn {
    CheckKind::WordCount { count: max, op: CompareOp::Le }
        .bind("maxWords", format!("Must contain at most {} words", max))
}

/// Passes when the control date plus `year_offset` years is before `date`
///
/// An empty control normalises to the earliest possible date and passes; a
/// value that is not a date fails.
pub fn date_earlier(date: NaiveDate, year_offset: i32) -> ValidatorFn {
    CheckKind::Date { date, op: CompareOp::Lt, year_offset }
        .bind("dateEarlier", format!("Date must be earlier than {}", date))
}

/// Passes when the control date plus `year_offset` years is after `date`
pub fn date_later(date: NaiveDate, year_offset: i32) -> ValidatorFn {
    CheckKind::Date { date, op: CompareOp::Gt, year_offset }
        .bind("dateLater", format!("Date must be later than {}", date))
}

pub fn date_compare(date: NaiveDate, op: CompareOp, year_offset: i32) -> ValidatorFn {
    CheckKind::Date { date, op, year_offset }.bind("dateCompare", format!("Date must be {} {}", op, date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::FormControl;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn run(validator: &ValidatorFn, value: &str) -> Option<ValidationErrors> {
        validator(&FormControl::new(value))
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_required() {
        let v = required();
        assert!(run(&v, "x").is_none());
        let errors = run(&v, "").unwrap();
        assert_eq!(errors.get("required"), Some(&ErrorPayload::Flag(true)));
        assert!(v(&FormControl::new(Value::Null)).is_some());
    }

    #[test]
    fn test_conditional_required() {
        let active = Arc::new(AtomicBool::new(false));
        let flag = active.clone();
        let v = conditional_required(move || flag.load(Ordering::SeqCst));

        assert!(run(&v, "").is_none());
        active.store(true, Ordering::SeqCst);
        assert!(run(&v, "").is_some());
        assert!(run(&v, "filled").is_none());
    }

    #[test]
    fn test_pattern_validator() {
        let v = pattern("^[0-9]+$", RegexLogic::MatchRequired, "digits", "Digits only").unwrap();
        assert!(run(&v, "123").is_none());
        assert_eq!(
            run(&v, "12a").unwrap().get("digits"),
            Some(&ErrorPayload::Message("Digits only".to_string()))
        );
        // empty is tested literally
        assert!(run(&v, "").is_some());
    }

    #[test]
    fn test_pattern_rejects_bad_regex() {
        assert!(pattern("(", RegexLogic::MatchRequired, "x", "x").is_err());
    }

    #[test]
    fn test_length_validators() {
        assert!(run(&min_length(3), "abc").is_none());
        assert!(run(&min_length(3), "ab").unwrap().contains_key("minLength"));
        assert!(run(&max_length(3), "abcd").unwrap().contains_key("maxLength"));
        assert!(run(&length(2, CompareOp::Eq, "exact", "Two"), "ab").is_none());
    }

    #[test]
    fn test_word_validators() {
        assert!(run(&min_words(2), "one two").is_none());
        assert!(run(&min_words(2), "one").unwrap().contains_key("minWords"));
        assert!(run(&max_words(2), "one two three").unwrap().contains_key("maxWords"));
    }

    #[test]
    fn test_date_earlier_with_offset() {
        // must be at least 18 years before 2024-06-01
        let adult = date_earlier(ymd(2024, 6, 1), 18);
        assert!(run(&adult, "2000-01-15").is_none());
        assert!(run(&adult, "2010-01-15").unwrap().contains_key("dateEarlier"));
    }

    #[test]
    fn test_date_missing_compares_earliest() {
        assert!(run(&date_earlier(ymd(2024, 6, 1), 0), "").is_none());
        assert!(run(&date_later(ymd(2024, 6, 1), 0), "").is_some());
        assert!(run(&date_later(ymd(2024, 6, 1), 0), "not a date").is_some());
    }

    #[test]
    fn test_date_unparseable_value_fails_every_operator() {
        let earlier = date_earlier(ymd(2024, 6, 1), 0);
        assert!(run(&earlier, "banana").unwrap().contains_key("dateEarlier"));
        assert!(run(&earlier, "2024-13-45").unwrap().contains_key("dateEarlier"));

        let before = date_compare(ymd(2024, 6, 1), CompareOp::Lt, 0);
        assert!(run(&before, "banana").unwrap().contains_key("dateCompare"));

        // absent stays distinct from malformed
        assert!(run(&earlier, "   ").is_none());
        assert!(earlier(&FormControl::new(Value::Null)).is_none());
    }

    #[test]
    fn test_date_compare() {
        let on = date_compare(ymd(2024, 6, 1), CompareOp::Eq, 0);
        assert!(run(&on, "2024-06-01").is_none());
        assert!(run(&on, "2024-06-02").unwrap().contains_key("dateCompare"));
    }

    #[test]
    fn test_custom_check() {
        let v = CheckKind::custom(|value| value.as_str() == Some("yes")).bind("mustAgree", "Say yes");
        assert!(run(&v, "yes").is_none());
        assert!(run(&v, "no").is_some());
    }
}
