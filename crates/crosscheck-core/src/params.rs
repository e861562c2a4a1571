//! Indicator parameters and the `key=value` override parser.
//!
//! Override strings come from the command line (`--candidate-kwargs "period=20"`)
//! and are parsed by a strict grammar; nothing is ever evaluated:
//!
//! ```text
//! kwargs := "" | pair ("," pair)* ","?
//! pair   := ident "=" value
//! value  := int | float | "true" | "false" | "True" | "False" | quoted-string
//! ```
//!
//! # Example
//!
//! ```
//! use ta_crosscheck_core::params::{parse_kwargs, ParamValue};
//!
//! let params = parse_kwargs("period=20, devs=2.5, matype='ema'").unwrap();
//! assert_eq!(params.get("period"), Some(&ParamValue::Int(20)));
//! assert_eq!(params.get("devs"), Some(&ParamValue::Float(2.5)));
//! assert_eq!(params.get("matype"), Some(&ParamValue::Str("ema".into())));
//!
//! assert!(parse_kwargs("period=__import__('os')").is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    Str(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// An ordered keyword-parameter map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Creates an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Looks up a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Returns true if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overrides individual keys with the values from `other`.
    pub fn merge(&mut self, other: &Params) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Reads a non-negative integer parameter, falling back to `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Param`] if the value is not a non-negative integer.
    pub fn usize_or(&self, key: &str, default: usize) -> Result<usize> {
        match self.get(key) {
            None => Ok(default),
            Some(ParamValue::Int(i)) => {
                usize::try_from(*i).map_err(|_| Error::param(key, format!("expected a non-negative integer, got {i}")))
            }
            Some(other) => Err(Error::param(key, format!("expected an integer, got {other}"))),
        }
    }

    /// Reads a numeric parameter, falling back to `default` when absent.
    ///
    /// Integers are accepted and widened.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Param`] if the value is not numeric.
    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64> {
        match self.get(key) {
            None => Ok(default),
            Some(ParamValue::Float(x)) => Ok(*x),
            #[allow(clippy::cast_precision_loss)]
            Some(ParamValue::Int(i)) => Ok(*i as f64),
            Some(other) => Err(Error::param(key, format!("expected a number, got {other}"))),
        }
    }

    /// Reads a boolean parameter, falling back to `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Param`] if the value is not a boolean.
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(ParamValue::Bool(b)) => Ok(*b),
            Some(other) => Err(Error::param(key, format!("expected a boolean, got {other}"))),
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        write!(f, "}}")
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn syntax(input: &str, reason: impl Into<String>) -> Error {
    Error::ParamSyntax {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_value(input: &str, raw: &str) -> Result<ParamValue> {
    match raw {
        "" => return Err(syntax(input, "missing value")),
        "true" | "True" => return Ok(ParamValue::Bool(true)),
        "false" | "False" => return Ok(ParamValue::Bool(false)),
        _ => {}
    }

    for quote in ['\'', '"'] {
        if raw.starts_with(quote) {
            if raw.len() < 2 || !raw.ends_with(quote) {
                return Err(syntax(input, format!("unterminated string {raw}")));
            }
            let inner = &raw[1..raw.len() - 1];
            if inner.contains(quote) {
                return Err(syntax(input, format!("stray quote in {raw}")));
            }
            return Ok(ParamValue::Str(inner.to_string()));
        }
    }

    if let Ok(i) = raw.parse::<i64>() {
        return Ok(ParamValue::Int(i));
    }

    let numeric = raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if numeric {
        if let Ok(x) = raw.parse::<f64>() {
            if x.is_finite() {
                return Ok(ParamValue::Float(x));
            }
        }
    }

    Err(syntax(input, format!("unsupported value {raw}")))
}

/// Splits on commas that are not inside a quoted string.
fn split_pairs(input: &str) -> Result<Vec<&str>> {
    let mut pairs = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, ',') => {
                pairs.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() {
        return Err(syntax(input, "unterminated string"));
    }
    pairs.push(&input[start..]);
    Ok(pairs)
}

/// Parses a `key=value, key=value` string into [`Params`].
///
/// An empty (or all-whitespace) string yields an empty map. A single trailing
/// comma is accepted.
///
/// # Errors
///
/// Returns [`Error::ParamSyntax`] on any deviation from the grammar: a pair
/// without `=`, a key that is not an identifier, a duplicate key, or a value
/// that is not a literal.
pub fn parse_kwargs(input: &str) -> Result<Params> {
    let mut params = Params::new();
    if input.trim().is_empty() {
        return Ok(params);
    }

    let pairs = split_pairs(input)?;
    let last = pairs.len() - 1;
    for (i, pair) in pairs.into_iter().enumerate() {
        let pair = pair.trim();
        if pair.is_empty() {
            if i == last && i > 0 {
                break;
            }
            return Err(syntax(input, "empty entry"));
        }

        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| syntax(input, format!("expected key=value, got {pair}")))?;
        let key = key.trim();
        if !is_identifier(key) {
            return Err(syntax(input, format!("invalid key {key:?}")));
        }

        let value = parse_value(input, raw.trim())?;
        if params.insert(key, value).is_some() {
            return Err(syntax(input, format!("duplicate key {key}")));
        }
    }

    Ok(params)
}

/// Externally supplied parameter overrides for one side of a comparison.
///
/// `replace` wins over `update`: a full override map replaces the test's own
/// defaults entirely; otherwise `update` is merged key by key on top of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamOverrides {
    /// Full replacement map.
    pub replace: Option<Params>,
    /// Keys merged over the defaults.
    pub update: Option<Params>,
}

impl ParamOverrides {
    /// No overrides at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds overrides from raw command-line strings; empty strings mean "not given".
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParamSyntax`] if either string is malformed.
    pub fn from_strs(update: &str, replace: &str) -> Result<Self> {
        let parse_opt = |s: &str| -> Result<Option<Params>> {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                parse_kwargs(s).map(Some)
            }
        };
        Ok(Self {
            replace: parse_opt(replace)?,
            update: parse_opt(update)?,
        })
    }

    /// Applies the precedence rules to a test's default parameters.
    #[must_use]
    pub fn resolve(&self, defaults: &Params) -> Params {
        if let Some(replace) = &self.replace {
            return replace.clone();
        }
        let mut params = defaults.clone();
        if let Some(update) = &self.update {
            params.merge(update);
        }
        params
    }
}
