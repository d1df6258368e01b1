pub mod burglary;
pub mod factory;
pub mod sprinkler;

use crate::common::errors::Result;
use crate::network::graph::Network;

/// A named, fully specified network that can be rebuilt on demand.
pub trait ScenarioMaker {
    fn name(&self) -> &'static str;

    fn build(&self) -> Result<Network>;
}
