use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::common::errors::NetworkError;
use crate::network::models::Value;

/// Observed values, by variable name, for a single query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evidence {
    observations: BTreeMap<String, Value>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<V: Into<Value>>(mut self, variable: &str, value: V) -> Self {
        self.insert(variable, value);
        self
    }

    /// Returns the previous observation of `variable`, if any.
    pub fn insert<V: Into<Value>>(&mut self, variable: &str, value: V) -> Option<Value> {
        self.observations.insert(variable.to_string(), value.into())
    }

    pub fn get(&self, variable: &str) -> Option<&Value> {
        self.observations.get(variable)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.observations.contains_key(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.observations.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Evidence {
    fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
        Evidence {
            observations: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Parses `NAME=VALUE` pairs separated by commas, e.g. `J=true, M=true`.
/// An empty string is empty evidence.
impl FromStr for Evidence {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut evidence = Evidence::new();
        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, raw) = pair
                .split_once('=')
                .ok_or_else(|| NetworkError::InvalidEvidence {
                    variable: pair.to_string(),
                    detail: "expected NAME=VALUE".to_string(),
                })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(NetworkError::InvalidEvidence {
                    variable: pair.to_string(),
                    detail: "missing variable name".to_string(),
                });
            }
            let value: Value = match raw.parse() {
                Ok(value) => value,
                Err(never) => match never {},
            };
            if evidence.insert(name, value).is_some() {
                return Err(NetworkError::InvalidEvidence {
                    variable: name.to_string(),
                    detail: "observed more than once".to_string(),
                });
            }
        }
        Ok(evidence)
    }
}
