//! Numeric comparison

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Comparison operator applied as `value <op> target`
///
/// Rust has a single equality, so both `==` and `===` parse to [`CompareOp::Eq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "==", alias = "===")]
    Eq,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Eq => "==",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        }
    }
}

impl FromStr for CompareOp {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(CompareOp::Lt),
            ">" => Ok(CompareOp::Gt),
            "==" | "===" => Ok(CompareOp::Eq),
            "<=" => Ok(CompareOp::Le),
            ">=" => Ok(CompareOp::Ge),
            other => Err(ConfigError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compares `a` against `b` with the given operator
pub fn numeric_compare<T: PartialOrd>(a: T, b: T, op: CompareOp) -> bool {
    match op {
        CompareOp::Lt => a < b,
        CompareOp::Gt => a > b,
        CompareOp::Eq => a == b,
        CompareOp::Le => a <= b,
        CompareOp::Ge => a >= b,
    }
}
