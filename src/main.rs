use anyhow::{Context, Result};
use bayesnet::common::render;
use bayesnet::common::setup::{
    init_logging, parse_configuration_options, CommandLineOptions, NetworkSource, OutputFormat,
};
use bayesnet::scenarios::factory::ScenarioMakerFactory;
use bayesnet::Network;
use colored::Colorize;
use log::info;

fn load_network(options: &CommandLineOptions) -> Result<Network> {
    match &options.source {
        NetworkSource::Scenario(name) => {
            info!("Building scenario {}", name);
            let scenario = ScenarioMakerFactory::new_shared(name)?;
            Ok(scenario.build()?)
        }
        NetworkSource::File(path) => {
            info!("Loading network from {}", path);
            Network::from_file(path)
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let options = parse_configuration_options()?;

    let network = load_network(&options)?;
    if options.show_factors {
        println!("{}", render::compact(&network).bold());
        print!("{}", render::structure(&network));
        print!("{}", render::factors(&network));
    }

    let certified = network
        .certify_with_tolerance(options.tolerance)
        .context("Network is not fully defined")?;
    info!(
        "Certified {} variables, order {:?}",
        certified.len(),
        certified.topological_order()
    );

    let distribution = certified.pre_enum(&options.query, &options.evidence)?;
    let selected = match &options.value {
        Some(value) => Some((
            value.clone(),
            certified.probabilistic_inference(&options.query, value.clone(), &options.evidence)?,
        )),
        None => None,
    };

    match options.output_format {
        OutputFormat::Json => {
            let output = match &selected {
                Some((value, p)) => serde_json::json!({
                    "query": options.query,
                    "evidence": options.evidence,
                    "value": value,
                    "probability": p,
                }),
                None => serde_json::json!({
                    "query": options.query,
                    "evidence": options.evidence,
                    "distribution": distribution,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            let given: Vec<String> = options
                .evidence
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            match &selected {
                Some((value, p)) => println!(
                    "P({}={} | {}) = {}",
                    options.query.cyan(),
                    value,
                    given.join(", "),
                    format!("{:.6}", p).green()
                ),
                None => {
                    println!("P({} | {})", options.query.cyan(), given.join(", "));
                    let best = distribution.most_likely().map(|(v, _)| v.clone());
                    for (value, p) in distribution.iter() {
                        let line = format!("  {:<12} {:.6}", value.to_string(), p);
                        if Some(value) == best.as_ref() {
                            println!("{}", line.green());
                        } else {
                            println!("{}", line);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
