// File: src/catalog.rs
// Purpose: Loading named rule catalogs from TOML files

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::sequence::{Evaluator, NamedSequenceMap, SequenceConfig, SequenceParams};

/// Catalog file layout
///
/// ```toml
/// base = "password"
///
/// [[rules]]
/// key = "minLength"
/// evaluate = "length"
/// message = "Must be at least 12 characters"
/// length = 12
/// operator = ">="
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    /// Built-in catalog to start from; rules with the same key replace its entries
    #[serde(default)]
    pub base: Option<String>,

    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

/// One `[[rules]]` table
///
/// The remaining keys are kept raw and checked against [`SequenceParams`]
/// once the rule is built, so a misspelled parameter is an error.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub key: String,
    pub evaluate: Evaluator,
    #[serde(flatten)]
    pub params: toml::Table,
}

impl RuleEntry {
    pub fn into_config(self) -> Result<SequenceConfig> {
        let params: SequenceParams = toml::Value::Table(self.params)
            .try_into()
            .with_context(|| format!("Invalid parameters for catalog rule `{}`", self.key))?;
        Ok(SequenceConfig::new(self.key, self.evaluate, params))
    }
}

impl CatalogFile {
    /// Builds the catalog, compiling every rule so bad patterns fail here
    pub fn into_catalog(self) -> Result<NamedSequenceMap> {
        let mut catalog = match self.base.as_deref() {
            None => NamedSequenceMap::new(),
            Some("password") => NamedSequenceMap::password().clone(),
            Some(other) => bail!("Unknown base catalog: {}", other),
        };

        for rule in self.rules {
            let config = rule.into_config()?;
            config
                .compile()
                .with_context(|| format!("Invalid catalog rule `{}`", config.key))?;
            catalog = catalog.with_entry(config);
        }

        tracing::debug!("Loaded catalog with {} rules", catalog.len());
        Ok(catalog)
    }
}

/// Parses a catalog from TOML text
pub fn parse_catalog(content: &str) -> Result<NamedSequenceMap> {
    let file: CatalogFile = toml::from_str(content).context("Failed to parse catalog")?;
    file.into_catalog()
}

/// Loads a catalog file
///
/// A missing or empty file yields the built-in password catalog.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<NamedSequenceMap> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(NamedSequenceMap::password().clone());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {:?}", path))?;

    if content.trim().is_empty() {
        return Ok(NamedSequenceMap::password().clone());
    }

    parse_catalog(&content).with_context(|| format!("Failed to load catalog file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusty_form_checks_core::CompareOp;

    #[test]
    fn test_parse_standalone_catalog() {
        let catalog = parse_catalog(
            r#"
            [[rules]]
            key = "noDigits"
            evaluate = "regex"
            pattern = "[0-9]"
            logic = "!"
            message = "Digits are not allowed"

            [[rules]]
            key = "short"
            evaluate = "word_count"
            count = 5
            operator = "<="
            message = "Five words at most"
            "#,
        )
        .unwrap();

        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["noDigits", "short"]);
        let short = catalog.get("short").unwrap();
        assert_eq!(short.config.count, Some(5));
        assert_eq!(short.config.operator, Some(CompareOp::Le));
    }

    #[test]
    fn test_base_catalog_replaces_in_place() {
        let catalog = parse_catalog(
            r#"
            base = "password"

            [[rules]]
            key = "minLength"
            evaluate = "length"
            length = 12
            message = "Must be at least 12 characters"
            "#,
        )
        .unwrap();

        assert_eq!(catalog.len(), NamedSequenceMap::password().len());
        assert_eq!(catalog.get("minLength").unwrap().config.length, Some(12));
        // shared catalog untouched
        assert_eq!(NamedSequenceMap::password().get("minLength").unwrap().config.length, Some(8));
    }

    #[test]
    fn test_invalid_rule_fails_at_load() {
        let err = parse_catalog(
            r#"
            [[rules]]
            key = "broken"
            evaluate = "regex"
            pattern = "("
            message = "x"
            "#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("broken"));
    }

    #[test]
    fn test_misspelled_param_fails_at_load() {
        let err = parse_catalog(
            r#"
            [[rules]]
            key = "short"
            evaluate = "length"
            lenght = 12
            message = "x"
            "#,
        )
        .unwrap_err();
        let report = format!("{:#}", err);
        assert!(report.contains("short"));
        assert!(report.contains("lenght"));
    }

    #[test]
    fn test_param_unused_by_evaluator_fails_at_load() {
        let err = parse_catalog(
            r#"
            [[rules]]
            key = "filled"
            evaluate = "required"
            length = 3
            message = "x"
            "#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("does not use parameter `length`"));
    }

    #[test]
    fn test_unknown_base() {
        assert!(parse_catalog(r#"base = "address""#).is_err());
    }
}
