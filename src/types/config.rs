//! Node configuration values and the constraints that guard them.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Configuration map of a node, ordered by key so serialized output is stable.
pub type Config = BTreeMap<String, ConfigValue>;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
  Bool(bool),
  Int(i64),
  Float(f64),
  Text(Cow<'static, str>),
}

impl ConfigValue {
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      ConfigValue::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      ConfigValue::Int(i) => Some(*i),
      _ => None,
    }
  }

  /// Numeric view; integers widen to `f64`.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      ConfigValue::Int(i) => Some(*i as f64),
      ConfigValue::Float(f) => Some(*f),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      ConfigValue::Text(s) => Some(s),
      _ => None,
    }
  }

  /// Reads a command-line literal: `true`/`false`, then integer, then
  /// number, otherwise text.
  pub fn parse_literal(raw: &str) -> Self {
    if let Ok(b) = raw.parse::<bool>() {
      return ConfigValue::Bool(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
      return ConfigValue::Int(i);
    }
    match raw.parse::<f64>() {
      Ok(f) if f.is_finite() => ConfigValue::Float(f),
      _ => ConfigValue::Text(Cow::Owned(raw.to_string())),
    }
  }

  /// Short name of the value's type, used in error messages.
  pub fn type_name(&self) -> &'static str {
    match self {
      ConfigValue::Bool(_) => "boolean",
      ConfigValue::Int(_) => "integer",
      ConfigValue::Float(_) => "number",
      ConfigValue::Text(_) => "text",
    }
  }
}

impl fmt::Display for ConfigValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigValue::Bool(b) => write!(f, "{}", b),
      ConfigValue::Int(i) => write!(f, "{}", i),
      ConfigValue::Float(x) => write!(f, "{}", x),
      ConfigValue::Text(s) => f.write_str(s),
    }
  }
}

impl From<bool> for ConfigValue {
  fn from(v: bool) -> Self {
    ConfigValue::Bool(v)
  }
}

impl From<i64> for ConfigValue {
  fn from(v: i64) -> Self {
    ConfigValue::Int(v)
  }
}

impl From<i32> for ConfigValue {
  fn from(v: i32) -> Self {
    ConfigValue::Int(v.into())
  }
}

impl From<f64> for ConfigValue {
  fn from(v: f64) -> Self {
    ConfigValue::Float(v)
  }
}

impl From<&str> for ConfigValue {
  fn from(v: &str) -> Self {
    ConfigValue::Text(Cow::Owned(v.to_string()))
  }
}

impl From<String> for ConfigValue {
  fn from(v: String) -> Self {
    ConfigValue::Text(Cow::Owned(v))
  }
}

/// Declared domain of a configuration field.
#[derive(Debug)]
pub enum Constraint {
  Flag,
  /// Any non-blank text.
  Text,
  /// Text matching a URL pattern; `hint` describes the expected form.
  Url {
    pattern: &'static Lazy<Regex>,
    hint: &'static str,
  },
  Integer {
    min: i64,
    max: i64,
  },
  /// Floating point range; integers are accepted and widened.
  Number {
    min: f64,
    max: f64,
  },
  Choice(&'static [&'static str]),
}

impl Constraint {
  /// Reads a command-line literal for this field. Text-like fields keep the
  /// raw text even when it looks like a number or boolean.
  pub fn parse_literal(&self, raw: &str) -> ConfigValue {
    match self {
      Constraint::Text | Constraint::Url { .. } | Constraint::Choice(_) => {
        ConfigValue::Text(Cow::Owned(raw.to_string()))
      }
      _ => ConfigValue::parse_literal(raw),
    }
  }

  /// Validates `value` and returns it in the field's canonical representation.
  pub fn check(&self, value: ConfigValue) -> Result<ConfigValue, String> {
    match self {
      Constraint::Flag => match value {
        ConfigValue::Bool(_) => Ok(value),
        other => Err(format!("expected boolean, got {}", other.type_name())),
      },
      Constraint::Text => match value.as_str() {
        Some(s) if s.trim().is_empty() => Err("must not be empty".to_string()),
        Some(_) => Ok(value),
        None => Err(format!("expected text, got {}", value.type_name())),
      },
      Constraint::Url { pattern, hint } => match value.as_str() {
        Some(s) if pattern.is_match(s) => Ok(value),
        Some(s) => Err(format!("'{}' is not a {} URL", s, hint)),
        None => Err(format!("expected text, got {}", value.type_name())),
      },
      Constraint::Integer { min, max } => match value.as_i64() {
        Some(i) if i < *min || i > *max => {
          Err(format!("{} is outside the range {}..={}", i, min, max))
        }
        Some(_) => Ok(value),
        None => Err(format!("expected integer, got {}", value.type_name())),
      },
      Constraint::Number { min, max } => match value.as_f64() {
        Some(x) if !x.is_finite() || x < *min || x > *max => {
          Err(format!("{} is outside the range {}..={}", x, min, max))
        }
        Some(x) => Ok(ConfigValue::Float(x)),
        None => Err(format!("expected number, got {}", value.type_name())),
      },
      Constraint::Choice(options) => match value.as_str() {
        Some(s) if options.contains(&s) => Ok(value),
        Some(s) => Err(format!("'{}' is not one of: {}", s, options.join(", "))),
        None => Err(format!("expected text, got {}", value.type_name())),
      },
    }
  }
}

/// A configuration field declared by a node kind.
#[derive(Debug)]
pub struct FieldSpec {
  pub key: &'static str,
  pub label: &'static str,
  pub constraint: Constraint,
  pub default: ConfigValue,
}

impl FieldSpec {
  pub(crate) const fn new(
    key: &'static str,
    label: &'static str,
    constraint: Constraint,
    default: ConfigValue,
  ) -> Self {
    Self {
      key,
      label,
      constraint,
      default,
    }
  }
}
