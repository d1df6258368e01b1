pub mod common;
pub mod inference;
pub mod network;
pub mod scenarios;

pub use common::errors::{NetworkError, Result};
pub use inference::{Distribution, Evidence};
pub use network::{CertifiedNetwork, Network, ProbKey, Value, Variable};
