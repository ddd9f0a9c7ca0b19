// File: src/sequence.rs
// Purpose: Named rule catalogs, per-call selection/overrides and the short-circuit validator

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use rusty_form_checks_core::{parse_date_literal, CompareOp, ConfigError, RegexLogic};

use crate::checks::{
    ALPHA_PATTERN, LOWERCASE_PATTERN, NUMERIC_PATTERN, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, SPECIAL_PATTERN,
    UPPERCASE_PATTERN,
};
use crate::control::{AbstractControl, ValidationError, ValidatorFn};
use crate::validators::{CheckKind, Predicate};

/// Which primitive a catalog rule runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluator {
    Required,
    Regex,
    Length,
    WordCount,
    Date,
    /// Programmatic predicate; cannot come from a catalog file
    #[serde(skip)]
    Custom(Predicate),
}

impl Evaluator {
    /// Parameters this evaluator reads besides `error_name` and `message`
    pub fn params(&self) -> &'static [&'static str] {
        match self {
            Evaluator::Required | Evaluator::Custom(_) => &[],
            Evaluator::Regex => &["pattern", "logic"],
            Evaluator::Length => &["length", "operator"],
            Evaluator::WordCount => &["count", "operator"],
            Evaluator::Date => &["date", "operator", "year_offset"],
        }
    }
}

/// Parameter bag for a catalog rule
///
/// Every field is optional so that an override only names what it changes.
/// Misspelled fields are rejected when deserialising.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SequenceParams {
    #[serde(alias = "errorName", skip_serializing_if = "Option::is_none")]
    pub error_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logic: Option<RegexLogic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<CompareOp>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(alias = "yearOffset", skip_serializing_if = "Option::is_none")]
    pub year_offset: Option<i32>,
}

impl SequenceParams {
    /// Field-by-field merge: set fields of `overrides` replace ours, the rest are kept
    pub fn merged(&self, overrides: &SequenceParams) -> SequenceParams {
        SequenceParams {
            error_name: overrides.error_name.clone().or_else(|| self.error_name.clone()),
            message: overrides.message.clone().or_else(|| self.message.clone()),
            pattern: overrides.pattern.clone().or_else(|| self.pattern.clone()),
            logic: overrides.logic.or(self.logic),
            length: overrides.length.or(self.length),
            count: overrides.count.or(self.count),
            operator: overrides.operator.or(self.operator),
            date: overrides.date.clone().or_else(|| self.date.clone()),
            year_offset: overrides.year_offset.or(self.year_offset),
        }
    }

    /// Names of the evaluator-specific parameters that are set
    fn set_params(&self) -> Vec<&'static str> {
        [
            ("pattern", self.pattern.is_some()),
            ("logic", self.logic.is_some()),
            ("length", self.length.is_some()),
            ("count", self.count.is_some()),
            ("operator", self.operator.is_some()),
            ("date", self.date.is_some()),
            ("year_offset", self.year_offset.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

/// A named, reusable rule: what to evaluate and with which parameters
#[derive(Debug, Clone)]
pub struct SequenceConfig {
    pub key: String,
    pub evaluate: Evaluator,
    pub config: SequenceParams,
}

/// A rule compiled and ready to evaluate
#[derive(Debug, Clone)]
pub struct SequenceStep {
    pub error_name: String,
    pub message: String,
    pub check: CheckKind,
}

impl SequenceConfig {
    pub fn new(key: impl Into<String>, evaluate: Evaluator, config: SequenceParams) -> Self {
        Self {
            key: key.into(),
            evaluate,
            config,
        }
    }

    /// Rule backed by a programmatic predicate
    pub fn custom(
        key: impl Into<String>,
        predicate: impl Fn(&serde_json::Value) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            key,
            Evaluator::Custom(Predicate::new(predicate)),
            SequenceParams {
                message: Some(message.into()),
                ..SequenceParams::default()
            },
        )
    }

    /// Copy of this rule with `overrides` merged into its parameters
    pub fn with_overrides(&self, overrides: &SequenceParams) -> SequenceConfig {
        SequenceConfig {
            key: self.key.clone(),
            evaluate: self.evaluate.clone(),
            config: self.config.merged(overrides),
        }
    }

    /// Validates the parameters and builds the check they describe
    ///
    /// The error name defaults to the rule key. Parameters the evaluator
    /// does not read are rejected rather than ignored.
    pub fn compile(&self) -> Result<SequenceStep, ConfigError> {
        let params = &self.config;
        let missing = |param: &'static str| ConfigError::MissingParam {
            key: self.key.clone(),
            param,
        };

        let used = self.evaluate.params();
        if let Some(param) = params.set_params().into_iter().find(|p| !used.contains(p)) {
            return Err(ConfigError::UnusedParam {
                key: self.key.clone(),
                param,
            });
        }

        let check = match &self.evaluate {
            Evaluator::Required => CheckKind::Required,
            Evaluator::Regex => {
                let pattern = params.pattern.as_deref().ok_or_else(|| missing("pattern"))?;
                CheckKind::pattern(pattern, params.logic.unwrap_or(RegexLogic::MatchRequired))?
            }
            Evaluator::Length => CheckKind::Length {
                length: params.length.ok_or_else(|| missing("length"))?,
                op: params.operator.unwrap_or(CompareOp::Ge),
            },
            Evaluator::WordCount => CheckKind::WordCount {
                count: params.count.ok_or_else(|| missing("count"))?,
                op: params.operator.unwrap_or(CompareOp::Ge),
            },
            Evaluator::Date => CheckKind::Date {
                date: parse_date_literal(params.date.as_deref().ok_or_else(|| missing("date"))?)?,
                op: params.operator.unwrap_or(CompareOp::Lt),
                year_offset: params.year_offset.unwrap_or(0),
            },
            Evaluator::Custom(predicate) => CheckKind::Custom(predicate.clone()),
        };

        Ok(SequenceStep {
            error_name: params.error_name.clone().unwrap_or_else(|| self.key.clone()),
            message: params.message.clone().ok_or_else(|| missing("message"))?,
            check,
        })
    }
}

/// One entry of a caller's selection: a bare key or `{key: overrides}`
///
/// Deserialises from JSON such as `["noAlpha", {"minLength": {"length": 10}}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SequenceSelection {
    Key(String),
    Override(BTreeMap<String, SequenceParams>),
}

impl SequenceSelection {
    pub fn with_override(key: impl Into<String>, params: SequenceParams) -> Self {
        let mut map = BTreeMap::new();
        map.insert(key.into(), params);
        SequenceSelection::Override(map)
    }
}

impl From<&str> for SequenceSelection {
    fn from(key: &str) -> Self {
        SequenceSelection::Key(key.to_string())
    }
}

/// Immutable catalog of named rules with a stable default order
///
/// Resolution always works on clones, so overrides from one call never reach
/// another.
#[derive(Debug, Clone, Default)]
pub struct NamedSequenceMap {
    entries: BTreeMap<String, SequenceConfig>,
    order: Vec<String>,
}

static PASSWORD_SEQUENCES: Lazy<NamedSequenceMap> = Lazy::new(build_password_sequences);

impl NamedSequenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule; re-adding a key replaces it in place
    pub fn with_entry(mut self, config: SequenceConfig) -> Self {
        if !self.entries.contains_key(&config.key) {
            self.order.push(config.key.clone());
        }
        self.entries.insert(config.key.clone(), config);
        self
    }

    /// Shared password catalog
    ///
    /// Keys, in default order: `noAlpha`, `noLowercase`, `noUppercase`,
    /// `noNumeric`, `noSpecial`, `minLength`, `maxLength`.
    pub fn password() -> &'static NamedSequenceMap {
        &PASSWORD_SEQUENCES
    }

    pub fn get(&self, key: &str) -> Option<&SequenceConfig> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Every rule in default order
    pub fn resolve_all(&self) -> Vec<SequenceConfig> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key))
            .cloned()
            .collect()
    }

    /// Resolves a selection into ordered, independent rule copies
    pub fn resolve(&self, selection: &[SequenceSelection]) -> Result<Vec<SequenceConfig>, ConfigError> {
        let mut resolved = Vec::with_capacity(selection.len());

        for entry in selection {
            let config = match entry {
                SequenceSelection::Key(key) => self.lookup(key)?.clone(),
                SequenceSelection::Override(map) => {
                    let mut iter = map.iter();
                    let (key, overrides) = match (iter.next(), map.len()) {
                        (Some(pair), 1) => pair,
                        _ => return Err(ConfigError::InvalidOverride(map.len())),
                    };
                    self.lookup(key)?.with_overrides(overrides)
                }
            };
            resolved.push(config);
        }

        tracing::debug!("Resolved {} of {} catalog rules", resolved.len(), self.len());
        Ok(resolved)
    }

    fn lookup(&self, key: &str) -> Result<&SequenceConfig, ConfigError> {
        self.entries
            .get(key)
            .ok_or_else(|| ConfigError::UnknownSequenceKey(key.to_string()))
    }
}

fn regex_rule(key: &str, pattern: &str, message: &str) -> SequenceConfig {
    SequenceConfig::new(
        key,
        Evaluator::Regex,
        SequenceParams {
            message: Some(message.to_string()),
            pattern: Some(pattern.to_string()),
            logic: Some(RegexLogic::MatchRequired),
            ..SequenceParams::default()
        },
    )
}

fn length_rule(key: &str, length: usize, operator: CompareOp, message: String) -> SequenceConfig {
    SequenceConfig::new(
        key,
        Evaluator::Length,
        SequenceParams {
            message: Some(message),
            length: Some(length),
            operator: Some(operator),
            ..SequenceParams::default()
        },
    )
}

fn build_password_sequences() -> NamedSequenceMap {
    NamedSequenceMap::new()
        .with_entry(regex_rule("noAlpha", ALPHA_PATTERN, "Must contain at least one letter"))
        .with_entry(regex_rule(
            "noLowercase",
            LOWERCASE_PATTERN,
            "Must contain at least one lowercase letter",
        ))
        .with_entry(regex_rule(
            "noUppercase",
            UPPERCASE_PATTERN,
            "Must contain at least one uppercase letter",
        ))
        .with_entry(regex_rule("noNumeric", NUMERIC_PATTERN, "Must contain at least one number"))
        .with_entry(regex_rule(
            "noSpecial",
            SPECIAL_PATTERN,
            "Must contain at least one special character",
        ))
        .with_entry(length_rule(
            "minLength",
            PASSWORD_MIN_LENGTH,
            CompareOp::Ge,
            format!("Must be at least {} characters", PASSWORD_MIN_LENGTH),
        ))
        .with_entry(length_rule(
            "maxLength",
            PASSWORD_MAX_LENGTH,
            CompareOp::Le,
            format!("Must be at most {} characters", PASSWORD_MAX_LENGTH),
        ))
}

/// Compiles `configs` and returns a validator reporting only the first failure
///
/// Steps run in order; once one fails the rest are not evaluated.
pub fn sequential_validator(configs: &[SequenceConfig]) -> Result<ValidatorFn, ConfigError> {
    let steps = configs
        .iter()
        .map(SequenceConfig::compile)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!("Built sequential validator with {} steps", steps.len());

    Ok(Arc::new(move |control: &dyn AbstractControl| {
        let value = control.value();
        for (index, step) in steps.iter().enumerate() {
            if !step.check.passes(&value) {
                tracing::trace!("Sequence step {} (`{}`) failed", index, step.error_name);
                return Some(ValidationError::new(step.error_name.clone(), step.message.clone()).into_errors());
            }
        }
        None
    }))
}

/// Sequential validator over the password catalog
///
/// `None` selects every rule in catalog order.
pub fn dynamic_password_validator(selection: Option<&[SequenceSelection]>) -> Result<ValidatorFn, ConfigError> {
    let catalog = NamedSequenceMap::password();
    let configs = match selection {
        Some(selection) => catalog.resolve(selection)?,
        None => catalog.resolve_all(),
    };
    sequential_validator(&configs)
}
