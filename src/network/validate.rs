//! Certification of a built network.
//!
//! A `Network` that passes every check here becomes a `CertifiedNetwork`: an
//! immutable, dense, topologically ordered form that the inference engine
//! reads from. A network that fails is never queried.

use log::{debug, warn};
use std::collections::{BTreeSet, HashMap};

use crate::common::errors::{NetworkError, Result};
use crate::network::graph::Network;
use crate::network::models::{Value, Variable};
use crate::network::table::ProbabilityTable;

/// Absolute tolerance on each CPT row sum.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Largest accepted row-sum tolerance. Pruning barren variables relies on
/// every row summing to 1, so anything looser changes query answers.
pub const MAX_TOLERANCE: f64 = 1e-3;

/// A network that passed validation.
///
/// Read-only; queries take `&self`, so one certified network can be shared
/// between threads.
#[derive(Debug, Clone)]
pub struct CertifiedNetwork {
    pub(crate) variables: Vec<Variable>,
    pub(crate) tables: Vec<ProbabilityTable>,
    /// Parent positions of each variable, in declared parent order
    pub(crate) parents: Vec<Vec<usize>>,
    /// Variable positions, every parent before its children
    pub(crate) order: Vec<usize>,
    index: HashMap<String, usize>,
}

impl CertifiedNetwork {
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&i| &self.variables[i])
    }

    /// Variables in insertion order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn table(&self, name: &str) -> Option<&ProbabilityTable> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    /// Variable names, parents before children.
    pub fn topological_order(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(|&i| self.variables[i].name())
            .collect()
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

impl Network {
    /// True when the network can be queried. The reason for a failure is logged.
    pub fn defined_check(&self) -> bool {
        match self.certify() {
            Ok(_) => true,
            Err(e) => {
                warn!("network is not fully defined: {}", e);
                false
            }
        }
    }

    pub fn certify(&self) -> Result<CertifiedNetwork> {
        self.certify_with_tolerance(DEFAULT_TOLERANCE)
    }

    /// Check parents, acyclicity, CPT coverage and row sums, then build the
    /// dense tables. `tolerance` must lie in `[0, MAX_TOLERANCE]`.
    pub fn certify_with_tolerance(&self, tolerance: f64) -> Result<CertifiedNetwork> {
        if !(0.0..=MAX_TOLERANCE).contains(&tolerance) {
            return Err(NetworkError::InvalidTolerance(tolerance));
        }

        let mut parents = Vec::with_capacity(self.variables.len());
        for variable in &self.variables {
            let positions = variable
                .parents()
                .iter()
                .map(|parent| {
                    self.position(parent)
                        .map_err(|_| NetworkError::UnknownParent {
                            variable: variable.name().to_string(),
                            parent: parent.clone(),
                        })
                })
                .collect::<Result<Vec<usize>>>()?;
            parents.push(positions);
        }

        let order = topological_order(&self.variables, &parents)?;

        let mut tables = Vec::with_capacity(self.variables.len());
        for (position, variable) in self.variables.iter().enumerate() {
            let parent_domains: Vec<&[Value]> = parents[position]
                .iter()
                .map(|&p| self.variables[p].domain())
                .collect();
            tables.push(ProbabilityTable::from_entries(
                variable,
                &parent_domains,
                &self.tables[position],
                tolerance,
            )?);
        }

        debug!(
            "certified network of {} variables, order {:?}",
            self.variables.len(),
            order
                .iter()
                .map(|&i| self.variables[i].name())
                .collect::<Vec<_>>()
        );
        Ok(CertifiedNetwork {
            variables: self.variables.clone(),
            tables,
            parents,
            order,
            index: self
                .variables
                .iter()
                .enumerate()
                .map(|(i, v)| (v.name().to_string(), i))
                .collect(),
        })
    }
}

/// Kahn's algorithm; among ready variables the earliest inserted goes first.
fn topological_order(variables: &[Variable], parents: &[Vec<usize>]) -> Result<Vec<usize>> {
    let mut pending: Vec<usize> = parents.iter().map(|p| p.len()).collect();
    let mut children = vec![Vec::new(); variables.len()];
    for (child, child_parents) in parents.iter().enumerate() {
        for &parent in child_parents {
            children[parent].push(child);
        }
    }

    let mut ready: BTreeSet<usize> = (0..variables.len()).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(variables.len());
    while let Some(next) = ready.pop_first() {
        order.push(next);
        for &child in &children[next] {
            pending[child] -= 1;
            if pending[child] == 0 {
                ready.insert(child);
            }
        }
    }

    if order.len() < variables.len() {
        let stuck = (0..variables.len())
            .filter(|&i| pending[i] > 0)
            .map(|i| variables[i].name().to_string())
            .collect();
        return Err(NetworkError::CyclicGraph(stuck));
    }
    Ok(order)
}
