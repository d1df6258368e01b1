//! Read-only text views of a network. Nothing here affects inference.

use crate::network::graph::Network;

/// Factorization of the joint, one factor per variable: `P(B), P(A|B,E), ...`.
pub fn compact(network: &Network) -> String {
    network
        .variables()
        .iter()
        .map(|variable| {
            if variable.parents().is_empty() {
                format!("P({})", variable.name())
            } else {
                format!("P({}|{})", variable.name(), variable.parents().join(","))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per variable: `name [domain] <- parents`.
pub fn structure(network: &Network) -> String {
    let mut out = String::new();
    for variable in network.variables() {
        let domain: Vec<String> = variable.domain().iter().map(|v| v.to_string()).collect();
        out.push_str(&format!("{} [{}]", variable.name(), domain.join(", ")));
        if !variable.parents().is_empty() {
            out.push_str(&format!(" <- {}", variable.parents().join(", ")));
        }
        out.push('\n');
    }
    out
}

/// Every loaded CPT row, grouped by variable.
pub fn factors(network: &Network) -> String {
    let mut out = String::new();
    for variable in network.variables() {
        out.push_str(&format!("{}\n", factor_header(variable.name(), variable.parents())));
        let Some(entries) = network.entries(variable.name()) else {
            continue;
        };
        if entries.is_empty() {
            out.push_str("  (no entries)\n");
            continue;
        }
        for configuration in entries.configurations() {
            let condition: Vec<String> = variable
                .parents()
                .iter()
                .zip(configuration)
                .map(|(parent, value)| format!("{}={}", parent, value))
                .collect();
            let cells: Vec<String> = variable
                .domain()
                .iter()
                .map(|value| match entries.get(configuration, value) {
                    Some(p) => format!("{}={}", value, p),
                    None => format!("{}=?", value),
                })
                .collect();
            if condition.is_empty() {
                out.push_str(&format!("  {}\n", cells.join(" ")));
            } else {
                out.push_str(&format!("  {}: {}\n", condition.join(", "), cells.join(" ")));
            }
        }
    }
    out
}

fn factor_header(name: &str, parents: &[String]) -> String {
    if parents.is_empty() {
        format!("P({})", name)
    } else {
        format!("P({} | {})", name, parents.join(", "))
    }
}
