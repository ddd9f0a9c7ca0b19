//! Regular-expression evaluation

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Relationship a value must have with a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegexLogic {
    /// Passes when the pattern matches somewhere in the value (`!!`)
    #[serde(rename = "!!")]
    MatchRequired,
    /// Passes when the pattern matches nowhere in the value (`!`)
    #[serde(rename = "!")]
    MustNotMatch,
    /// Passes when a match can be located in the value (`match`)
    #[serde(rename = "match")]
    ExistsMatch,
}

impl RegexLogic {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegexLogic::MatchRequired => "!!",
            RegexLogic::MustNotMatch => "!",
            RegexLogic::ExistsMatch => "match",
        }
    }
}

impl FromStr for RegexLogic {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "!!" => Ok(RegexLogic::MatchRequired),
            "!" => Ok(RegexLogic::MustNotMatch),
            "match" => Ok(RegexLogic::ExistsMatch),
            other => Err(ConfigError::UnknownRegexLogic(other.to_string())),
        }
    }
}

impl fmt::Display for RegexLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiles a pattern, reporting failures as configuration errors
pub fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Tests `value` against `pattern` under the given logic
///
/// Empty values are tested literally: `""` fails `[a-z]` with
/// [`RegexLogic::MatchRequired`]. Pair with a required check when empty
/// input should pass.
pub fn regex_test(pattern: &Regex, value: &str, logic: RegexLogic) -> bool {
    match logic {
        RegexLogic::MatchRequired => pattern.is_match(value),
        RegexLogic::MustNotMatch => !pattern.is_match(value),
        RegexLogic::ExistsMatch => pattern.find(value).is_some(),
    }
}
