use log::trace;
use ndarray::{Array2, ArrayView1};
use std::collections::{BTreeMap, HashSet};

use crate::common::errors::{NetworkError, Result};
use crate::network::models::{Value, Variable};

/// Key of one CPT entry: `P(variable = value | parent = parent_value, ...)`.
///
/// Parent pairs may be given in any order; they are resolved against the
/// variable's declared parents when the entry is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbKey {
    pub variable: String,
    pub value: Value,
    pub given: Vec<(String, Value)>,
}

impl ProbKey {
    pub fn new<V: Into<Value>>(variable: &str, value: V) -> Self {
        ProbKey {
            variable: variable.to_string(),
            value: value.into(),
            given: Vec::new(),
        }
    }

    pub fn given<V: Into<Value>>(mut self, parent: &str, value: V) -> Self {
        self.given.push((parent.to_string(), value.into()));
        self
    }

    /// Parent values ordered by the variable's declared parents.
    pub(crate) fn configuration(&self, variable: &Variable) -> Result<Vec<Value>> {
        let mut slots: Vec<Option<Value>> = vec![None; variable.parents().len()];
        for (parent, parent_value) in &self.given {
            let position =
                variable
                    .parent_position(parent)
                    .ok_or_else(|| NetworkError::UnknownParent {
                        variable: variable.name().to_string(),
                        parent: parent.clone(),
                    })?;
            if slots[position].replace(parent_value.clone()).is_some() {
                return Err(NetworkError::IncompleteKey {
                    variable: variable.name().to_string(),
                    parent: parent.clone(),
                });
            }
        }
        slots
            .into_iter()
            .zip(variable.parents())
            .map(|(slot, parent)| {
                slot.ok_or_else(|| NetworkError::IncompleteKey {
                    variable: variable.name().to_string(),
                    parent: parent.clone(),
                })
            })
            .collect()
    }
}

/// Raw CPT entries accepted from the caller, not yet checked for coverage.
///
/// Rows are keyed by parent values in declared parent order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableEntries {
    rows: BTreeMap<Vec<Value>, BTreeMap<Value, f64>>,
}

impl TableEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later inserts for the same key overwrite earlier ones.
    pub fn insert(&mut self, configuration: Vec<Value>, value: Value, probability: f64) {
        self.rows
            .entry(configuration)
            .or_default()
            .insert(value, probability);
    }

    pub fn get(&self, configuration: &[Value], value: &Value) -> Option<f64> {
        self.rows
            .get(configuration)
            .and_then(|row| row.get(value))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of stored `(configuration, value)` entries.
    pub fn len(&self) -> usize {
        self.rows.values().map(|row| row.len()).sum()
    }

    pub fn configurations(&self) -> impl Iterator<Item = &Vec<Value>> {
        self.rows.keys()
    }
}

/// All parent configurations in mixed-radix order, last parent varying fastest.
///
/// No parents gives the single empty configuration.
pub fn configurations(domains: &[&[Value]]) -> Vec<Vec<Value>> {
    let mut result: Vec<Vec<Value>> = vec![Vec::new()];
    for domain in domains {
        result = result
            .into_iter()
            .flat_map(|prefix| {
                domain.iter().map(move |value| {
                    let mut next = prefix.clone();
                    next.push(value.clone());
                    next
                })
            })
            .collect();
    }
    result
}

/// A complete, normalized CPT.
///
/// Row `r` is the parent configuration with mixed-radix index `r` over the
/// parents' domain sizes; column `c` is the variable's `c`-th domain value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    radices: Vec<usize>,
    rows: Array2<f64>,
}

impl ProbabilityTable {
    /// Check `entries` against the variable's domain and its parents' domains
    /// and lay them out densely.
    pub fn from_entries(
        variable: &Variable,
        parent_domains: &[&[Value]],
        entries: &TableEntries,
        tolerance: f64,
    ) -> Result<Self> {
        let all = configurations(parent_domains);
        let mut rows = Array2::<f64>::zeros((all.len(), variable.domain().len()));

        for (row_index, configuration) in all.iter().enumerate() {
            let mut sum = 0.0;
            for (column, value) in variable.domain().iter().enumerate() {
                let probability = entries.get(configuration, value).ok_or_else(|| {
                    NetworkError::IncompleteTable {
                        variable: variable.name().to_string(),
                        configuration: configuration.clone(),
                        value: value.clone(),
                    }
                })?;
                rows[[row_index, column]] = probability;
                sum += probability;
            }
            if (sum - 1.0).abs() > tolerance {
                return Err(NetworkError::UnnormalizedTable {
                    variable: variable.name().to_string(),
                    configuration: configuration.clone(),
                    sum,
                });
            }
        }

        let reachable: HashSet<&Vec<Value>> = all.iter().collect();
        if let Some(stray) = entries.configurations().find(|c| !reachable.contains(c)) {
            return Err(NetworkError::UnreachableConfiguration {
                variable: variable.name().to_string(),
                configuration: stray.clone(),
            });
        }

        trace!(
            "table for '{}' has {} rows x {} values",
            variable.name(),
            rows.nrows(),
            rows.ncols()
        );
        Ok(ProbabilityTable {
            radices: parent_domains.iter().map(|d| d.len()).collect(),
            rows,
        })
    }

    /// Row index of a configuration given as parent domain indices.
    pub fn row_index(&self, parent_indices: &[usize]) -> usize {
        parent_indices
            .iter()
            .zip(&self.radices)
            .fold(0, |acc, (index, radix)| acc * radix + index)
    }

    pub fn probability(&self, row: usize, value_index: usize) -> f64 {
        self.rows[[row, value_index]]
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.rows.row(row)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.nrows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alarm() -> Variable {
        Variable::boolean("A").with_parents(&["B", "E"]).unwrap()
    }

    #[test]
    fn test_key_is_resolved_in_declared_order() {
        let key = ProbKey::new("A", true).given("E", false).given("B", true);
        assert_eq!(
            key.configuration(&alarm()).unwrap(),
            vec![Value::Boolean(true), Value::Boolean(false)]
        );
    }

    #[test]
    fn test_key_errors() {
        let unknown = ProbKey::new("A", true).given("B", true).given("X", true);
        assert!(matches!(
            unknown.configuration(&alarm()),
            Err(NetworkError::UnknownParent { .. })
        ));

        let missing = ProbKey::new("A", true).given("B", true);
        assert_eq!(
            missing.configuration(&alarm()),
            Err(NetworkError::IncompleteKey {
                variable: "A".to_string(),
                parent: "E".to_string(),
            })
        );

        let repeated = ProbKey::new("A", true)
            .given("B", true)
            .given("B", false)
            .given("E", true);
        assert!(matches!(
            repeated.configuration(&alarm()),
            Err(NetworkError::IncompleteKey { .. })
        ));
    }

    #[test]
    fn test_configurations_order() {
        let bools = [Value::Boolean(true), Value::Boolean(false)];
        let three = [Value::Integer(0), Value::Integer(1), Value::Integer(2)];
        let all = configurations(&[&bools[..], &three[..]]);
        assert_eq!(all.len(), 6);
        assert_eq!(all[1], vec![Value::Boolean(true), Value::Integer(1)]);
        assert_eq!(all[3], vec![Value::Boolean(false), Value::Integer(0)]);
        assert_eq!(configurations(&[]), vec![Vec::<Value>::new()]);
    }

    #[test]
    fn test_dense_layout_matches_row_index() {
        let variable = Variable::boolean("J").with_parents(&["A"]).unwrap();
        let mut entries = TableEntries::new();
        entries.insert(vec![true.into()], true.into(), 0.9);
        entries.insert(vec![true.into()], false.into(), 0.1);
        entries.insert(vec![false.into()], true.into(), 0.05);
        entries.insert(vec![false.into()], false.into(), 0.95);

        let bools = [Value::Boolean(true), Value::Boolean(false)];
        let table = ProbabilityTable::from_entries(&variable, &[&bools[..]], &entries, 1e-6).unwrap();
        assert_eq!(table.num_rows(), 2);
        let row = table.row_index(&[1]);
        assert_eq!(table.probability(row, 0), 0.05);
        assert_eq!(table.row(0).to_vec(), vec![0.9, 0.1]);
    }

    #[test]
    fn test_missing_and_unnormalized_rows() {
        let variable = Variable::boolean("B");
        let mut entries = TableEntries::new();
        entries.insert(vec![], true.into(), 0.001);
        assert!(matches!(
            ProbabilityTable::from_entries(&variable, &[], &entries, 1e-6),
            Err(NetworkError::IncompleteTable { .. })
        ));

        entries.insert(vec![], false.into(), 0.9);
        assert!(matches!(
            ProbabilityTable::from_entries(&variable, &[], &entries, 1e-6),
            Err(NetworkError::UnnormalizedTable { .. })
        ));

        entries.insert(vec![], false.into(), 0.999);
        assert!(ProbabilityTable::from_entries(&variable, &[], &entries, 1e-6).is_ok());
        assert_eq!(entries.len(), 2);
    }
}
