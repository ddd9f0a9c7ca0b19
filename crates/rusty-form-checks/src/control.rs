// File: src/control.rs
// Purpose: Control abstraction, error payloads and reference form controls

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cross_field::CrossFieldRule;
use crate::error_state::merge_errors;
use crate::ConfigError;

/// Payload stored under an error name
///
/// Checks record their message; flag-style validators (`required`) record `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Flag(bool),
    Message(String),
}

impl ErrorPayload {
    /// Message text, if this payload carries one
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorPayload::Message(m) => Some(m),
            ErrorPayload::Flag(_) => None,
        }
    }
}

/// All errors currently recorded on one control, keyed by error name
pub type ValidationErrors = BTreeMap<String, ErrorPayload>;

/// A single named validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub error_name: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(error_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_name: error_name.into(),
            message: message.into(),
        }
    }

    /// Converts into the `{error_name: message}` mapping validators return
    pub fn into_errors(self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.insert(self.error_name, ErrorPayload::Message(self.message));
        errors
    }
}

/// Bound validator: `None` means valid
pub type ValidatorFn = Arc<dyn Fn(&dyn AbstractControl) -> Option<ValidationErrors> + Send + Sync>;

/// What a validator needs from the form control it is attached to
///
/// The host form layer owns value subscription and status propagation; checks
/// only read the current value and read-modify-write the error state.
pub trait AbstractControl {
    /// Current value. Groups return an object of their children's values.
    fn value(&self) -> Value;

    /// Current error state, `None` when valid
    fn errors(&self) -> Option<&ValidationErrors>;

    /// Replaces the error state wholesale
    fn set_error_state(&mut self, errors: Option<ValidationErrors>);

    /// Named child control, for groups
    fn child_mut(&mut self, _name: &str) -> Option<&mut dyn AbstractControl> {
        None
    }

    fn has_error(&self, error_name: &str) -> bool {
        self.errors().is_some_and(|e| e.contains_key(error_name))
    }
}

/// Empty for `required` purposes: null, `""` or an empty array
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// Text form of a value as single-field checks see it
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Runs every validator and merges their results
pub fn run_validators(validators: &[ValidatorFn], control: &dyn AbstractControl) -> Option<ValidationErrors> {
    let mut errors = None;
    for validator in validators {
        merge_errors(&mut errors, validator(control));
    }
    errors
}

/// Single-value control
#[derive(Clone, Default)]
pub struct FormControl {
    value: Value,
    errors: Option<ValidationErrors>,
    validators: Vec<ValidatorFn>,
}

impl FormControl {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            errors: None,
            validators: Vec::new(),
        }
    }

    /// Attaches validators and runs them once against the initial value
    pub fn with_validators(mut self, validators: impl IntoIterator<Item = ValidatorFn>) -> Self {
        self.validators.extend(validators);
        self.update_value_and_validity();
        self
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
        self.update_value_and_validity();
    }

    /// Recomputes the error state from the attached validators
    pub fn update_value_and_validity(&mut self) {
        let errors = run_validators(&self.validators, self);
        self.errors = errors;
    }

    pub fn valid(&self) -> bool {
        self.errors.is_none()
    }
}

impl fmt::Debug for FormControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormControl")
            .field("value", &self.value)
            .field("errors", &self.errors)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl AbstractControl for FormControl {
    fn value(&self) -> Value {
        self.value.clone()
    }

    fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }

    fn set_error_state(&mut self, errors: Option<ValidationErrors>) {
        self.errors = errors;
    }
}

/// Named controls plus the cross-field rules that span them
#[derive(Debug, Clone, Default)]
pub struct FormGroup {
    controls: BTreeMap<String, FormControl>,
    errors: Option<ValidationErrors>,
    rules: Vec<CrossFieldRule>,
}

impl FormGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_control(mut self, name: impl Into<String>, control: FormControl) -> Self {
        self.controls.insert(name.into(), control);
        self
    }

    /// Adds a cross-field rule, failing if it names a field this group lacks
    pub fn add_rule(&mut self, rule: CrossFieldRule) -> Result<(), ConfigError> {
        for field in rule.fields() {
            if !self.controls.contains_key(field) {
                return Err(ConfigError::UnknownField(field.to_string()));
            }
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn with_rule(mut self, rule: CrossFieldRule) -> Result<Self, ConfigError> {
        self.add_rule(rule)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&FormControl> {
        self.controls.get(name)
    }

    /// Sets a child's value and revalidates the whole group
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        let control = self
            .controls
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownField(name.to_string()))?;
        control.set_value(value);
        self.validate();
        Ok(())
    }

    /// Runs child validators, then cross-field rules in insertion order
    ///
    /// A rule clearing its error name only undoes what rules set: a child's
    /// own failure under the same name is merged back afterwards.
    pub fn validate(&mut self) {
        let mut own_errors = BTreeMap::new();
        for (name, control) in self.controls.iter_mut() {
            control.update_value_and_validity();
            if let Some(errors) = &control.errors {
                own_errors.insert(name.clone(), errors.clone());
            }
        }

        self.errors = None;
        let rules = std::mem::take(&mut self.rules);
        for rule in &rules {
            let group_errors = rule.apply(self);
            merge_errors(&mut self.errors, group_errors);
        }
        self.rules = rules;

        for (name, errors) in own_errors {
            if let Some(control) = self.controls.get_mut(&name) {
                merge_errors(&mut control.errors, Some(errors));
            }
        }
    }

    pub fn valid(&self) -> bool {
        self.errors.is_none() && self.controls.values().all(FormControl::valid)
    }
}

impl AbstractControl for FormGroup {
    fn value(&self) -> Value {
        let map: Map<String, Value> = self
            .controls
            .iter()
            .map(|(name, control)| (name.clone(), control.value.clone()))
            .collect();
        Value::Object(map)
    }

    fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }

    fn set_error_state(&mut self, errors: Option<ValidationErrors>) {
        self.errors = errors;
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut dyn AbstractControl> {
        self.controls
            .get_mut(name)
            .map(|control| control as &mut dyn AbstractControl)
    }
}
