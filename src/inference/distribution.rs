use serde::Serialize;
use std::fmt;

use crate::network::models::Value;

/// A normalized posterior over one variable, in the variable's domain order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    variable: String,
    entries: Vec<(Value, f64)>,
}

impl Distribution {
    pub(crate) fn new(variable: &str, entries: Vec<(Value, f64)>) -> Self {
        Distribution {
            variable: variable.to_string(),
            entries,
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn get(&self, value: &Value) -> Option<f64> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, f64)> {
        self.entries.iter().map(|(v, p)| (v, *p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    /// Highest-probability value; ties go to the earlier domain value.
    pub fn most_likely(&self) -> Option<(&Value, f64)> {
        self.iter()
            .fold(None, |best: Option<(&Value, f64)>, (v, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((v, p)),
            })
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(v, p)| format!("{}: {:.6}", v, p))
            .collect();
        write!(f, "{} = {{{}}}", self.variable, parts.join(", "))
    }
}
