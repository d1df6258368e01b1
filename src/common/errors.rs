//! Error types for building, certifying and querying a network.

use thiserror::Error;

use crate::network::models::Value;

/// Errors raised while building a network, certifying it, or answering a query.
///
/// Structural errors come from `add_node`/`set_parents`/`add_prob` and from
/// certification; data errors from `add_prob` and certification; query errors
/// from the inference engine. Nothing is retried or swallowed.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("variable '{0}' is already in the network")]
    DuplicateVariable(String),

    #[error("variable '{variable}' lists parent '{parent}' more than once")]
    DuplicateParent { variable: String, parent: String },

    #[error("variable '{variable}' has no parent named '{parent}'")]
    UnknownParent { variable: String, parent: String },

    #[error("parents of '{0}' cannot change once its table has entries")]
    ParentsLocked(String),

    #[error("the parent graph has a cycle; cannot order: {}", .0.join(", "))]
    CyclicGraph(Vec<String>),

    #[error("variable '{0}' must have a non-empty domain")]
    EmptyDomain(String),

    #[error("variable '{variable}' lists domain value '{value}' more than once")]
    DuplicateDomainValue { variable: String, value: Value },

    #[error("probability {probability} for '{variable}' is outside [0, 1]")]
    InvalidProbability { variable: String, probability: f64 },

    #[error("entry for '{variable}' gives no single value for parent '{parent}'")]
    IncompleteKey { variable: String, parent: String },

    #[error("'{value}' is not in the domain of '{variable}'")]
    ValueOutsideDomain { variable: String, value: Value },

    #[error("table of '{variable}' has no entry for value '{value}' given ({})", format_configuration(.configuration))]
    IncompleteTable {
        variable: String,
        configuration: Vec<Value>,
        value: Value,
    },

    #[error("table of '{variable}' sums to {sum} given ({})", format_configuration(.configuration))]
    UnnormalizedTable {
        variable: String,
        configuration: Vec<Value>,
        sum: f64,
    },

    #[error("table of '{variable}' has a row for parent values ({}) outside the parents' domains", format_configuration(.configuration))]
    UnreachableConfiguration {
        variable: String,
        configuration: Vec<Value>,
    },

    #[error("tolerance {0} must be a finite number in [0, {max}]", max = crate::network::validate::MAX_TOLERANCE)]
    InvalidTolerance(f64),

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("invalid evidence for '{variable}': {detail}")]
    InvalidEvidence { variable: String, detail: String },

    #[error("evidence has zero probability under the network")]
    InconsistentEvidence,
}

pub type Result<T> = std::result::Result<T, NetworkError>;

fn format_configuration(configuration: &[Value]) -> String {
    configuration
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
