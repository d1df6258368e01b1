use anyhow::{Context, Result};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::common::errors;
use crate::network::graph::Network;
use crate::network::models::{Value, Variable};
use crate::network::table::ProbKey;

/// JSON form of a network: variables, then CPT entries.
///
/// ```json
/// {
///   "variables": [
///     {"name": "Rain"},
///     {"name": "Wet", "parents": ["Rain"]}
///   ],
///   "probabilities": [
///     {"variable": "Rain", "value": true, "p": 0.2},
///     {"variable": "Wet", "value": true, "given": {"Rain": true}, "p": 0.9}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkDescription {
    pub variables: Vec<VariableDescription>,
    #[serde(default)]
    pub probabilities: Vec<EntryDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableDescription {
    pub name: String,
    /// Defaults to `[true, false]`
    #[serde(default)]
    pub domain: Option<Vec<Value>>,
    #[serde(default)]
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryDescription {
    pub variable: String,
    pub value: Value,
    /// Parent values as written, repeated names included
    #[serde(default, deserialize_with = "parent_pairs")]
    pub given: Vec<(String, Value)>,
    pub p: f64,
}

type ParentPairs = Vec<(String, Value)>;

/// Read a `given` object keeping every pair, so a repeated parent reaches
/// `ProbKey` and fails there instead of being overwritten.
fn parent_pairs<'de, D>(deserializer: D) -> std::result::Result<ParentPairs, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = ParentPairs;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map from parent name to parent value")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<ParentPairs, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(pair) = map.next_entry::<String, Value>()? {
                pairs.push(pair);
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor)
}

impl NetworkDescription {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse network description")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read network file {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Build the (not yet certified) network.
    pub fn build(&self) -> errors::Result<Network> {
        let mut network = Network::new();
        for description in &self.variables {
            let mut variable = match &description.domain {
                Some(domain) => Variable::new(&description.name, domain.clone())?,
                None => Variable::boolean(&description.name),
            };
            variable.set_parents(description.parents.clone())?;
            network.add_node(variable)?;
        }
        network.add_prob(self.probabilities.iter().map(|entry| {
            let key = entry
                .given
                .iter()
                .fold(ProbKey::new(&entry.variable, entry.value.clone()), |key, (parent, value)| {
                    key.given(parent, value.clone())
                });
            (key, entry.p)
        }))?;
        Ok(network)
    }
}

impl Network {
    /// Read and build a network from a JSON description file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Network> {
        let description = NetworkDescription::from_file(path)?;
        description
            .build()
            .context("Network description is not consistent")
    }
}
