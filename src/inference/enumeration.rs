//! Exact inference by enumeration.
//!
//! For each value `v` of the query variable the engine sums the full joint
//! probability over every assignment of the hidden variables, then normalizes
//! over `v`. Variables are visited in topological order, so by the time a
//! variable's CPT is read all of its parents are already fixed. Variables that
//! are neither the query, observed, nor an ancestor of either are dropped up
//! front: summing a barren descendant over its domain always gives 1.

use log::{debug, trace};

use crate::common::errors::{NetworkError, Result};
use crate::inference::distribution::Distribution;
use crate::inference::evidence::Evidence;
use crate::network::models::Value;
use crate::network::validate::CertifiedNetwork;

/// Partial assignment: domain index per variable position, `None` while hidden.
type Assignment = Vec<Option<usize>>;

impl CertifiedNetwork {
    /// Posterior distribution `P(query | evidence)` over the query's domain.
    pub fn pre_enum(&self, query: &str, evidence: &Evidence) -> Result<Distribution> {
        let query_position = self.position(query)?;
        let mut assignment = self.assign_evidence(evidence)?;
        if assignment[query_position].is_some() {
            return Err(NetworkError::InvalidEvidence {
                variable: query.to_string(),
                detail: "the query variable is also observed".to_string(),
            });
        }

        let relevant = self.relevant_order(&[query_position], &assignment);
        trace!(
            "pre_enum {} over {} relevant variables",
            query,
            relevant.len()
        );

        let domain = self.variables[query_position].domain();
        let mut joint = Vec::with_capacity(domain.len());
        for value_index in 0..domain.len() {
            assignment[query_position] = Some(value_index);
            joint.push(self.enumerate_all(&relevant, &mut assignment));
        }

        let normalizer: f64 = joint.iter().sum();
        if normalizer.is_nan() || normalizer <= 0.0 {
            return Err(NetworkError::InconsistentEvidence);
        }
        let entries: Vec<(Value, f64)> = domain
            .iter()
            .cloned()
            .zip(joint.iter().map(|j| j / normalizer))
            .collect();
        let distribution = Distribution::new(query, entries);
        debug!("P({} | {:?}) = {}", query, evidence, distribution);
        Ok(distribution)
    }

    /// `P(query = value | evidence)`, one entry of `pre_enum`.
    pub fn probabilistic_inference<V: Into<Value>>(
        &self,
        query: &str,
        value: V,
        evidence: &Evidence,
    ) -> Result<f64> {
        let value = value.into();
        let position = self.position(query)?;
        let value_index = self.variables[position]
            .value_index(&value)
            .ok_or_else(|| NetworkError::ValueOutsideDomain {
                variable: query.to_string(),
                value: value.clone(),
            })?;
        let distribution = self.pre_enum(query, evidence)?;
        Ok(distribution.iter().nth(value_index).map_or(0.0, |(_, p)| p))
    }

    /// Posterior of the query's reference value (`true` for a boolean variable).
    pub fn reference_probability(&self, query: &str, evidence: &Evidence) -> Result<f64> {
        let position = self.position(query)?;
        let reference = self.variables[position].reference_value().clone();
        self.probabilistic_inference(query, reference, evidence)
    }

    /// Marginal probability of the evidence itself, `P(evidence)`.
    pub fn evidence_probability(&self, evidence: &Evidence) -> Result<f64> {
        let mut assignment = self.assign_evidence(evidence)?;
        let observed: Vec<usize> = (0..assignment.len())
            .filter(|&i| assignment[i].is_some())
            .collect();
        let relevant = self.relevant_order(&observed, &assignment);
        Ok(self.enumerate_all(&relevant, &mut assignment))
    }

    fn assign_evidence(&self, evidence: &Evidence) -> Result<Assignment> {
        let mut assignment = vec![None; self.variables.len()];
        for (name, value) in evidence.iter() {
            let position = self.position(name)?;
            let value_index = self.variables[position].value_index(value).ok_or_else(|| {
                NetworkError::InvalidEvidence {
                    variable: name.to_string(),
                    detail: format!("'{}' is not in its domain", value),
                }
            })?;
            assignment[position] = Some(value_index);
        }
        Ok(assignment)
    }

    /// Targets, observed variables and all their ancestors, in topological order.
    fn relevant_order(&self, targets: &[usize], assignment: &Assignment) -> Vec<usize> {
        let mut relevant = vec![false; self.variables.len()];
        let mut stack: Vec<usize> = targets.to_vec();
        stack.extend((0..assignment.len()).filter(|&i| assignment[i].is_some()));
        while let Some(position) = stack.pop() {
            if relevant[position] {
                continue;
            }
            relevant[position] = true;
            stack.extend(self.parents[position].iter().copied());
        }
        self.order
            .iter()
            .copied()
            .filter(|&position| relevant[position])
            .collect()
    }

    /// Sum of the product of CPT entries over every completion of `assignment`
    /// on `variables`. `assignment` is restored before returning.
    fn enumerate_all(&self, variables: &[usize], assignment: &mut Assignment) -> f64 {
        let Some((&first, rest)) = variables.split_first() else {
            return 1.0;
        };
        match assignment[first] {
            Some(value_index) => {
                let p = self.conditional(first, value_index, assignment);
                if p == 0.0 {
                    return 0.0;
                }
                p * self.enumerate_all(rest, assignment)
            }
            None => {
                let mut sum = 0.0;
                for value_index in 0..self.variables[first].domain().len() {
                    let p = self.conditional(first, value_index, assignment);
                    if p == 0.0 {
                        continue;
                    }
                    assignment[first] = Some(value_index);
                    sum += p * self.enumerate_all(rest, assignment);
                }
                assignment[first] = None;
                sum
            }
        }
    }

    /// `P(variable = value_index | parents)` with every parent already assigned.
    fn conditional(&self, position: usize, value_index: usize, assignment: &Assignment) -> f64 {
        let parent_indices: Vec<usize> = self.parents[position]
            .iter()
            .map(|&parent| {
                debug_assert!(assignment[parent].is_some(), "parent visited after child");
                assignment[parent].unwrap_or_default()
            })
            .collect();
        let table = &self.tables[position];
        table.probability(table.row_index(&parent_indices), value_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::burglary::BurglaryAlarm;
    use crate::scenarios::ScenarioMaker;

    fn burglary() -> CertifiedNetwork {
        BurglaryAlarm {}.build().unwrap().certify().unwrap()
    }

    fn names(network: &CertifiedNetwork, positions: &[usize]) -> Vec<String> {
        positions
            .iter()
            .map(|&p| network.variables[p].name().to_string())
            .collect()
    }

    #[test]
    fn test_barren_descendants_are_skipped() {
        let network = burglary();
        let evidence = Evidence::new().with("B", true).with("E", false);
        let assignment = network.assign_evidence(&evidence).unwrap();
        let a = network.position("A").unwrap();
        let relevant = network.relevant_order(&[a], &assignment);
        assert_eq!(names(&network, &relevant), vec!["B", "E", "A"]);

        let evidence = Evidence::new().with("J", true);
        let assignment = network.assign_evidence(&evidence).unwrap();
        let b = network.position("B").unwrap();
        let relevant = network.relevant_order(&[b], &assignment);
        assert_eq!(names(&network, &relevant), vec!["B", "E", "A", "J"]);
    }

    #[test]
    fn test_enumerate_all_base_cases() {
        let network = burglary();
        let mut assignment = vec![None; network.len()];
        assert_eq!(network.enumerate_all(&[], &mut assignment), 1.0);

        // Summing a root over its whole domain gives its row total.
        let b = network.position("B").unwrap();
        let total = network.enumerate_all(&[b], &mut assignment);
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(assignment[b], None);

        assignment[b] = Some(0);
        assert_eq!(network.enumerate_all(&[b], &mut assignment), 0.001);
    }

    #[test]
    fn test_conditional_reads_parent_row() {
        let network = burglary();
        let mut assignment = vec![None; network.len()];
        let (a, b, e) = (
            network.position("A").unwrap(),
            network.position("B").unwrap(),
            network.position("E").unwrap(),
        );
        assignment[b] = Some(1);
        assignment[e] = Some(0);
        assert_eq!(network.conditional(a, 0, &assignment), 0.29);
    }
}
