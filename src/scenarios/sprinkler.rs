use crate::common::errors::Result;
use crate::network::graph::Network;
use crate::network::models::Variable;
use crate::network::table::ProbKey;

use super::{burglary::push_boolean, ScenarioMaker};

/// Cloudy drives both Sprinkler and Rain; either one wets the grass.
pub struct Sprinkler {}

impl ScenarioMaker for Sprinkler {
    fn name(&self) -> &'static str {
        "sprinkler"
    }

    fn build(&self) -> Result<Network> {
        let mut network = Network::new();
        network.add_node(Variable::boolean("Cloudy"))?;
        network.add_node(Variable::boolean("Sprinkler").with_parents(&["Cloudy"])?)?;
        network.add_node(Variable::boolean("Rain").with_parents(&["Cloudy"])?)?;
        network.add_node(Variable::boolean("WetGrass").with_parents(&["Sprinkler", "Rain"])?)?;

        let mut entries = Vec::new();
        push_boolean(&mut entries, ProbKey::new("Cloudy", true), 0.5);
        for (c, p) in [(true, 0.1), (false, 0.5)] {
            push_boolean(&mut entries, ProbKey::new("Sprinkler", true).given("Cloudy", c), p);
        }
        for (c, p) in [(true, 0.8), (false, 0.2)] {
            push_boolean(&mut entries, ProbKey::new("Rain", true).given("Cloudy", c), p);
        }
        for (s, r, p) in [
            (true, true, 0.99),
            (true, false, 0.9),
            (false, true, 0.9),
            (false, false, 0.0),
        ] {
            push_boolean(
                &mut entries,
                ProbKey::new("WetGrass", true)
                    .given("Sprinkler", s)
                    .given("Rain", r),
                p,
            );
        }
        network.add_prob(entries)?;
        Ok(network)
    }
}
