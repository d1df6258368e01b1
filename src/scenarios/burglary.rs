use crate::common::errors::Result;
use crate::network::graph::Network;
use crate::network::models::Variable;
use crate::network::table::ProbKey;

use super::ScenarioMaker;

/// The burglary alarm network: B and E cause A, which J and M report.
pub struct BurglaryAlarm {}

impl ScenarioMaker for BurglaryAlarm {
    fn name(&self) -> &'static str {
        "burglary"
    }

    fn build(&self) -> Result<Network> {
        let mut network = Network::new();
        network.add_node(Variable::boolean("B"))?;
        network.add_node(Variable::boolean("E"))?;
        network.add_node(Variable::boolean("A").with_parents(&["B", "E"])?)?;
        network.add_node(Variable::boolean("J").with_parents(&["A"])?)?;
        network.add_node(Variable::boolean("M").with_parents(&["A"])?)?;

        let mut entries = Vec::new();
        push_boolean(&mut entries, ProbKey::new("B", true), 0.001);
        push_boolean(&mut entries, ProbKey::new("E", true), 0.002);
        for (b, e, p) in [
            (true, true, 0.95),
            (true, false, 0.94),
            (false, true, 0.29),
            (false, false, 0.001),
        ] {
            push_boolean(
                &mut entries,
                ProbKey::new("A", true).given("B", b).given("E", e),
                p,
            );
        }
        for (a, p) in [(true, 0.9), (false, 0.05)] {
            push_boolean(&mut entries, ProbKey::new("J", true).given("A", a), p);
        }
        for (a, p) in [(true, 0.7), (false, 0.01)] {
            push_boolean(&mut entries, ProbKey::new("M", true).given("A", a), p);
        }
        network.add_prob(entries)?;
        Ok(network)
    }
}

/// Adds `key` with probability `p` and its complement for the `false` value.
pub(crate) fn push_boolean(entries: &mut Vec<(ProbKey, f64)>, key: ProbKey, p: f64) {
    let complement = ProbKey {
        value: false.into(),
        ..key.clone()
    };
    entries.push((key, p));
    entries.push((complement, 1.0 - p));
}
