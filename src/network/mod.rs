pub mod description;
pub mod graph;
pub mod models;
pub mod table;
pub mod validate;

pub use graph::Network;
pub use models::{Value, Variable};
pub use table::{ProbKey, ProbabilityTable};
pub use validate::{CertifiedNetwork, DEFAULT_TOLERANCE, MAX_TOLERANCE};
