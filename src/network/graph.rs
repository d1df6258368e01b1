use log::{debug, trace};
use std::collections::HashMap;

use crate::common::errors::{NetworkError, Result};
use crate::network::models::Variable;
use crate::network::table::{ProbKey, TableEntries};

/// A Bayesian network under construction.
///
/// Variables keep their insertion order. Parents may name variables that have
/// not been added yet; that is only checked when the network is certified.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub(crate) variables: Vec<Variable>,
    pub(crate) tables: Vec<TableEntries>,
    index: HashMap<String, usize>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable.
    pub fn add_node(&mut self, variable: Variable) -> Result<()> {
        if self.index.contains_key(variable.name()) {
            return Err(NetworkError::DuplicateVariable(variable.name().to_string()));
        }
        debug!(
            "add_node {} domain={:?} parents={:?}",
            variable.name(),
            variable.domain(),
            variable.parents()
        );
        self.index
            .insert(variable.name().to_string(), self.variables.len());
        self.variables.push(variable);
        self.tables.push(TableEntries::new());
        Ok(())
    }

    /// Replace the parents of an attached variable.
    ///
    /// Only allowed while its table is still empty, since stored rows are keyed
    /// by the parent order.
    pub fn set_parents(&mut self, name: &str, parents: &[&str]) -> Result<()> {
        let position = self.position(name)?;
        if !self.tables[position].is_empty() {
            return Err(NetworkError::ParentsLocked(name.to_string()));
        }
        self.variables[position].set_parents(parents.iter().map(|p| p.to_string()).collect())
    }

    /// Bulk-load CPT entries.
    ///
    /// Either every entry is accepted or none is.
    pub fn add_prob<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (ProbKey, f64)>,
    {
        let mut resolved = Vec::new();
        for (key, probability) in entries {
            if !(0.0..=1.0).contains(&probability) {
                return Err(NetworkError::InvalidProbability {
                    variable: key.variable.clone(),
                    probability,
                });
            }
            let position = self.position(&key.variable)?;
            let variable = &self.variables[position];
            if variable.value_index(&key.value).is_none() {
                return Err(NetworkError::ValueOutsideDomain {
                    variable: key.variable.clone(),
                    value: key.value.clone(),
                });
            }
            let configuration = key.configuration(variable)?;
            resolved.push((position, configuration, key.value, probability));
        }

        trace!("add_prob merging {} entries", resolved.len());
        for (position, configuration, value, probability) in resolved {
            self.tables[position].insert(configuration, value, probability);
        }
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&i| &self.variables[i])
    }

    /// Variables in insertion order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Raw entries loaded so far for `name`.
    pub fn entries(&self, name: &str) -> Option<&TableEntries> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    /// Stored probability for one key, if it has been loaded.
    pub fn probability(&self, key: &ProbKey) -> Result<Option<f64>> {
        let position = self.position(&key.variable)?;
        let configuration = key.configuration(&self.variables[position])?;
        Ok(self.tables[position].get(&configuration, &key.value))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub(crate) fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| NetworkError::UnknownVariable(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nodes() -> Network {
        let mut network = Network::new();
        network.add_node(Variable::boolean("Rain")).unwrap();
        network
            .add_node(Variable::boolean("Wet").with_parents(&["Rain"]).unwrap())
            .unwrap();
        network
    }

    #[test]
    fn test_duplicate_node() {
        let mut network = two_nodes();
        assert_eq!(
            network.add_node(Variable::boolean("Rain")),
            Err(NetworkError::DuplicateVariable("Rain".to_string()))
        );
        assert_eq!(network.len(), 2);
    }

    #[test]
    fn test_add_prob_overwrites_duplicates() {
        let mut network = two_nodes();
        let key = ProbKey::new("Wet", true).given("Rain", true);
        network.add_prob([(key.clone(), 0.5)]).unwrap();
        network.add_prob([(key.clone(), 0.8)]).unwrap();
        assert_eq!(network.probability(&key).unwrap(), Some(0.8));
        assert_eq!(network.entries("Wet").unwrap().len(), 1);
    }

    #[test]
    fn test_add_prob_is_atomic() {
        let mut network = two_nodes();
        let result = network.add_prob([
            (ProbKey::new("Rain", true), 0.2),
            (ProbKey::new("Rain", false), 1.5),
        ]);
        assert!(matches!(
            result,
            Err(NetworkError::InvalidProbability { probability, .. }) if probability == 1.5
        ));
        assert!(network.entries("Rain").unwrap().is_empty());
    }

    #[test]
    fn test_add_prob_rejects_nan_and_unknowns() {
        let mut network = two_nodes();
        assert!(matches!(
            network.add_prob([(ProbKey::new("Rain", true), f64::NAN)]),
            Err(NetworkError::InvalidProbability { .. })
        ));
        assert_eq!(
            network.add_prob([(ProbKey::new("Snow", true), 0.1)]),
            Err(NetworkError::UnknownVariable("Snow".to_string()))
        );
        assert!(matches!(
            network.add_prob([(ProbKey::new("Rain", "maybe"), 0.1)]),
            Err(NetworkError::ValueOutsideDomain { .. })
        ));
        assert_eq!(
            network.add_prob([(ProbKey::new("Wet", true).given("Cloudy", true), 0.1)]),
            Err(NetworkError::UnknownParent {
                variable: "Wet".to_string(),
                parent: "Cloudy".to_string(),
            })
        );
    }

    #[test]
    fn test_set_parents_after_attachment() {
        let mut network = two_nodes();
        network.add_node(Variable::boolean("Sprinkler")).unwrap();
        network.set_parents("Wet", &["Rain", "Sprinkler"]).unwrap();
        assert_eq!(
            network.variable("Wet").unwrap().parents(),
            &["Rain".to_string(), "Sprinkler".to_string()]
        );

        network
            .add_prob([(
                ProbKey::new("Wet", true)
                    .given("Sprinkler", false)
                    .given("Rain", true),
                0.8,
            )])
            .unwrap();
        assert_eq!(
            network.set_parents("Wet", &["Rain"]),
            Err(NetworkError::ParentsLocked("Wet".to_string()))
        );
        assert_eq!(
            network.set_parents("Hail", &[]),
            Err(NetworkError::UnknownVariable("Hail".to_string()))
        );
    }
}
