use anyhow::{bail, Context, Result};
use clap::{builder::EnumValueParser, Arg, ArgMatches, Command, ValueEnum};
use env_logger::{Builder, Env};
use serde::Deserialize;
use std::io::Write;

use crate::inference::evidence::Evidence;
use crate::network::models::Value;
use crate::network::validate::{DEFAULT_TOLERANCE, MAX_TOLERANCE};

/// How query results are printed
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable text
    #[serde(rename = "text")]
    Text,

    /// One JSON object per query
    #[serde(rename = "json")]
    Json,
}

/// Where the network comes from
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub enum NetworkSource {
    Scenario(String),
    File(String),
}

/// These options define the inputs from the user.
#[derive(Deserialize, Clone, Debug)]
pub struct CommandLineOptions {
    pub source: NetworkSource,
    pub query: String,
    pub value: Option<Value>,
    pub evidence: Evidence,
    pub tolerance: f64,
    pub output_format: OutputFormat,
    pub show_factors: bool,
}

pub fn init_logging() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let file = record.file().unwrap_or("unknown");
            let line = record.line().unwrap_or(0);
            writeln!(
                buf,
                "{} [{}:{}] {}",
                record.level(),
                file,
                line,
                record.args()
            )
        })
        .init();
}

fn command() -> Command {
    Command::new("BAYESNET")
        .version("0.1")
        .about("Exact inference over discrete Bayesian networks.")
        .arg(
            Arg::new("scenario_name")
                .long("scenario_name")
                .value_name("STRING")
                .help("Built-in network to query: 'burglary' or 'sprinkler'")
                .conflicts_with("network_file"),
        )
        .arg(
            Arg::new("network_file")
                .long("network_file")
                .value_name("FILE")
                .help("JSON network description to load"),
        )
        .arg(
            Arg::new("query")
                .long("query")
                .value_name("VARIABLE")
                .help("Variable whose posterior is computed")
                .required(true),
        )
        .arg(
            Arg::new("value")
                .long("value")
                .value_name("VALUE")
                .help("Only report the probability of this value (optional)"),
        )
        .arg(
            Arg::new("evidence")
                .long("evidence")
                .value_name("NAME=VALUE,...")
                .help("Observed values, e.g. J=true,M=True; booleans are case-insensitive")
                .default_value(""),
        )
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .value_name("NUMBER")
                .help("Allowed deviation of each CPT row sum from 1, at most 0.001"),
        )
        .arg(
            Arg::new("output_format")
                .long("output_format")
                .value_parser(EnumValueParser::<OutputFormat>::new())
                .help("Output format: 'text' or 'json'")
                .default_value("text"),
        )
        .arg(
            Arg::new("show_factors")
                .long("show_factors")
                .help("Print the network structure and its CPTs before querying")
                .action(clap::ArgAction::SetTrue),
        )
}

pub fn parse_configuration_options() -> Result<CommandLineOptions> {
    options_from_matches(&command().get_matches())
}

/// Parse options from an explicit argument list; the first item is the program name.
pub fn parse_configuration_options_from<I, T>(args: I) -> Result<CommandLineOptions>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = command()
        .try_get_matches_from(args)
        .context("Invalid command line")?;
    options_from_matches(&matches)
}

fn options_from_matches(matches: &ArgMatches) -> Result<CommandLineOptions> {
    let scenario_name = matches.get_one::<String>("scenario_name");
    let network_file = matches.get_one::<String>("network_file");
    let source = match (scenario_name, network_file) {
        (Some(name), None) => NetworkSource::Scenario(name.clone()),
        (None, Some(path)) => NetworkSource::File(path.clone()),
        (None, None) => NetworkSource::Scenario("burglary".to_string()),
        (Some(_), Some(_)) => bail!("--scenario_name and --network_file are exclusive"),
    };
    let query = matches
        .get_one::<String>("query")
        .context("query is required")?
        .to_string();
    let value = matches
        .get_one::<String>("value")
        .map(|v| v.parse::<Value>().unwrap_or_else(|never| match never {}));
    let evidence: Evidence = matches
        .get_one::<String>("evidence")
        .map(String::as_str)
        .unwrap_or_default()
        .parse()?;
    let tolerance = match matches.get_one::<String>("tolerance") {
        Some(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("tolerance needs to be a number, got '{}'", raw))?,
        None => DEFAULT_TOLERANCE,
    };
    if !(0.0..=MAX_TOLERANCE).contains(&tolerance) {
        bail!("tolerance needs to be in [0, {}], got {}", MAX_TOLERANCE, tolerance);
    }
    let output_format = matches
        .get_one::<OutputFormat>("output_format")
        .copied()
        .unwrap_or(OutputFormat::Text);
    let show_factors = matches.get_flag("show_factors");

    Ok(CommandLineOptions {
        source,
        query,
        value,
        evidence,
        tolerance,
        output_format,
        show_factors,
    })
}
