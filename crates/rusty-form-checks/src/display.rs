// File: src/display.rs
// Purpose: Error-text selection for display components, with default-filled options

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::control::ValidationErrors;

/// How an error display turns a control's errors into text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Show only the first error instead of all of them
    #[serde(default = "default_true")]
    pub first_only: bool,

    /// Text for an error name with no message anywhere
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,

    /// Per-error-name message replacements
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

/// Options as a consumer supplies them; unset fields come from defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialDisplayOptions {
    pub first_only: Option<bool>,
    pub fallback_message: Option<String>,
    pub overrides: Option<BTreeMap<String, String>>,
}

fn default_true() -> bool {
    true
}

fn default_fallback_message() -> String {
    "Invalid value".to_string()
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            first_only: default_true(),
            fallback_message: default_fallback_message(),
            overrides: BTreeMap::new(),
        }
    }
}

impl DisplayOptions {
    /// Fills the unset fields of `partial` from `defaults`
    ///
    /// Overrides are merged key by key, `partial` winning.
    pub fn from_partial(partial: PartialDisplayOptions, defaults: &DisplayOptions) -> Self {
        let mut overrides = defaults.overrides.clone();
        if let Some(extra) = partial.overrides {
            overrides.extend(extra);
        }

        Self {
            first_only: partial.first_only.unwrap_or(defaults.first_only),
            fallback_message: partial
                .fallback_message
                .unwrap_or_else(|| defaults.fallback_message.clone()),
            overrides,
        }
    }
}

/// Text an error display shows for `errors`
///
/// Message lookup order per error name: option overrides, the check set's
/// `messages`, the message carried by the error itself, then the fallback.
pub fn select_messages(
    errors: Option<&ValidationErrors>,
    messages: &BTreeMap<String, String>,
    options: &DisplayOptions,
) -> Vec<String> {
    let Some(errors) = errors else {
        return Vec::new();
    };

    let texts = errors.iter().map(|(name, payload)| {
        options
            .overrides
            .get(name)
            .or_else(|| messages.get(name))
            .map(String::as_str)
            .or_else(|| payload.message())
            .unwrap_or(&options.fallback_message)
            .to_string()
    });

    if options.first_only {
        texts.take(1).collect()
    } else {
        texts.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ErrorPayload;
    use pretty_assertions::assert_eq;

    fn sample_errors() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.insert("minLength".into(), ErrorPayload::Message("Too short".into()));
        errors.insert("required".into(), ErrorPayload::Flag(true));
        errors.insert("zzz".into(), ErrorPayload::Flag(true));
        errors
    }

    #[test]
    fn test_from_partial_fills_defaults() {
        let mut defaults = DisplayOptions::default();
        defaults.overrides.insert("required".into(), "Required".into());

        let mut extra = BTreeMap::new();
        extra.insert("minLength".into(), "Longer please".into());
        let options = DisplayOptions::from_partial(
            PartialDisplayOptions {
                first_only: Some(false),
                overrides: Some(extra),
                ..Default::default()
            },
            &defaults,
        );

        assert!(!options.first_only);
        assert_eq!(options.fallback_message, "Invalid value");
        assert_eq!(options.overrides.len(), 2);
    }

    #[test]
    fn test_partial_from_json() {
        let partial: PartialDisplayOptions = serde_json::from_str(r#"{"first_only": false}"#).unwrap();
        let options = DisplayOptions::from_partial(partial, &DisplayOptions::default());
        assert!(!options.first_only);
        assert!(options.overrides.is_empty());
    }

    #[test]
    fn test_select_all_messages() {
        let mut messages = BTreeMap::new();
        messages.insert("required".to_string(), "This field is required".to_string());
        let options = DisplayOptions {
            first_only: false,
            ..Default::default()
        };

        let errors = sample_errors();
        assert_eq!(
            select_messages(Some(&errors), &messages, &options),
            vec!["Too short", "This field is required", "Invalid value"]
        );
    }

    #[test]
    fn test_select_first_with_override() {
        let mut options = DisplayOptions::default();
        options.overrides.insert("minLength".into(), "Needs more".into());
        let errors = sample_errors();
        assert_eq!(
            select_messages(Some(&errors), &BTreeMap::new(), &options),
            vec!["Needs more"]
        );
    }

    #[test]
    fn test_no_errors_no_text() {
        assert!(select_messages(None, &BTreeMap::new(), &DisplayOptions::default()).is_empty());
    }
}
