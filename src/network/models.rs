use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::common::errors::{NetworkError, Result};

/// A single value from a variable's domain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Label(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Label(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Label(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Label(value)
    }
}

/// Text is read as a boolean first (any letter case), then an integer, and
/// otherwise kept as a label.
impl FromStr for Value {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Ok(Value::Boolean(true));
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Ok(Value::Boolean(false));
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Ok(Value::Integer(i));
        }
        Ok(Value::Label(trimmed.to_string()))
    }
}

/// A named discrete random variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Unique name within a network
    pub(crate) name: String,
    /// Ordered, non-empty set of values; the first one is the reference value
    pub(crate) domain: Vec<Value>,
    /// Ordered parent names; CPT rows are keyed in this order
    pub(crate) parents: Vec<String>,
}

impl Variable {
    /// Create a variable over the given domain, with no parents.
    pub fn new<V: Into<Value>>(name: &str, domain: Vec<V>) -> Result<Self> {
        let domain: Vec<Value> = domain.into_iter().map(Into::into).collect();
        if domain.is_empty() {
            return Err(NetworkError::EmptyDomain(name.to_string()));
        }
        let mut seen = HashSet::new();
        for value in &domain {
            if !seen.insert(value) {
                return Err(NetworkError::DuplicateDomainValue {
                    variable: name.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(Variable {
            name: name.to_string(),
            domain,
            parents: Vec::new(),
        })
    }

    /// A `{true, false}` variable; `true` is the reference value.
    pub fn boolean(name: &str) -> Self {
        Variable {
            name: name.to_string(),
            domain: vec![Value::Boolean(true), Value::Boolean(false)],
            parents: Vec::new(),
        }
    }

    /// Set the parents before the variable is attached to a network.
    pub fn with_parents(mut self, parents: &[&str]) -> Result<Self> {
        self.set_parents(parents.iter().map(|p| p.to_string()).collect())?;
        Ok(self)
    }

    pub(crate) fn set_parents(&mut self, parents: Vec<String>) -> Result<()> {
        let mut seen = HashSet::new();
        for parent in &parents {
            if !seen.insert(parent.as_str()) {
                return Err(NetworkError::DuplicateParent {
                    variable: self.name.clone(),
                    parent: parent.clone(),
                });
            }
        }
        self.parents = parents;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Position of `value` in the domain.
    pub fn value_index(&self, value: &Value) -> Option<usize> {
        self.domain.iter().position(|v| v == value)
    }

    /// The first declared domain value.
    pub fn reference_value(&self) -> &Value {
        &self.domain[0]
    }

    pub(crate) fn parent_position(&self, parent: &str) -> Option<usize> {
        self.parents.iter().position(|p| p == parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_parsing() {
        assert_eq!("true".parse::<Value>().unwrap(), Value::Boolean(true));
        assert_eq!("True".parse::<Value>().unwrap(), Value::Boolean(true));
        assert_eq!("FALSE".parse::<Value>().unwrap(), Value::Boolean(false));
        assert_eq!(" 3 ".parse::<Value>().unwrap(), Value::Integer(3));
        assert_eq!("high".parse::<Value>().unwrap(), Value::Label("high".to_string()));
    }

    #[test]
    fn test_value_json_is_untagged() {
        let values: Vec<Value> = serde_json::from_str(r#"[true, 2, "low"]"#).unwrap();
        assert_eq!(
            values,
            vec![Value::Boolean(true), Value::Integer(2), Value::from("low")]
        );
        assert_ne!(Value::Boolean(true), Value::from("true"));
    }

    #[test]
    fn test_variable_domain_checks() {
        assert_eq!(
            Variable::new::<bool>("X", vec![]),
            Err(NetworkError::EmptyDomain("X".to_string()))
        );
        assert!(matches!(
            Variable::new("X", vec!["a", "b", "a"]),
            Err(NetworkError::DuplicateDomainValue { .. })
        ));
        let weather = Variable::new("Weather", vec!["sun", "rain", "snow"]).unwrap();
        assert_eq!(weather.value_index(&Value::from("snow")), Some(2));
        assert_eq!(weather.reference_value(), &Value::from("sun"));
    }

    #[test]
    fn test_duplicate_parents_rejected() {
        let result = Variable::boolean("A").with_parents(&["B", "B"]);
        assert_eq!(
            result,
            Err(NetworkError::DuplicateParent {
                variable: "A".to_string(),
                parent: "B".to_string(),
            })
        );
    }
}
