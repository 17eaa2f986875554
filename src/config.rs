use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::validate_config;
use crate::error::{Error, Result};
use crate::models::{DistributionConfig, SimConfig};

#[derive(Parser, Debug)]
#[command(
    name = "bank-sim",
    about = "Single-server FIFO queue simulation",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation (the default when no subcommand is given)
    Run(RunArgs),
    /// Print the resolved configuration without running
    ShowConfig(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// TOML or JSON config file; command-line flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(short = 'n', long)]
    pub num_customers: Option<usize>,
    #[arg(long, help = "Seed for both duration streams; omit to draw one and report it")]
    pub seed: Option<u64>,
    #[arg(long, help = "Inter-arrival distribution: uniform:LOW:HIGH or constant:VALUE")]
    pub interarrival: Option<String>,
    #[arg(long, help = "Service distribution: uniform:LOW:HIGH or constant:VALUE")]
    pub service: Option<String>,
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    /// Shorthand for --format summary
    #[arg(long)]
    pub summary: bool,
    /// Save metrics.json, customer_data.csv and summary.txt under a timestamped directory here
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Human,
    Summary,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Run,
    ShowConfig,
}

#[derive(Clone, Debug)]
pub struct Invocation {
    pub action: Action,
    pub config: SimConfig,
    pub format: FormatArg,
    pub output_dir: Option<PathBuf>,
    pub log_level: String,
}

pub fn parse_args() -> Result<Cli> {
    match Cli::try_parse() {
        Ok(cli) => Ok(cli),
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => Err(Error::Cli(err.to_string())),
    }
}

pub fn build_invocation(cli: Cli) -> Result<Invocation> {
    let (action, args) = match cli.command {
        Some(Command::Run(args)) => (Action::Run, args),
        Some(Command::ShowConfig(args)) => (Action::ShowConfig, args),
        None => (Action::Run, cli.run),
    };

    let mut config = build_config(&args)?;
    if action == Action::Run && config.seed.is_none() {
        config.seed = Some(rand::random());
    }

    let format = if args.summary {
        FormatArg::Summary
    } else {
        args.format.clone().unwrap_or(FormatArg::Human)
    };

    Ok(Invocation {
        action,
        config,
        format,
        output_dir: args.output_dir,
        log_level: args.log_level,
    })
}

pub fn build_config(args: &RunArgs) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };

    if let Some(customers) = args.num_customers {
        config.customers = customers;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(input) = &args.interarrival {
        config.interarrival = parse_distribution(input, "interarrival")?;
    }
    if let Some(input) = &args.service {
        config.service = parse_distribution(input, "service")?;
    }

    validate_config(&config)?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<SimConfig> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "failed to read config '{}': {}",
            path.display(),
            err
        ))
    })?;
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("");

    match ext {
        "toml" => toml::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse TOML: {}", err))),
        "json" => serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err))),
        "" => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        _ => Err(Error::UnsupportedConfigFormat(ext.to_string())),
    }
}

pub fn parse_distribution(input: &str, name: &'static str) -> Result<DistributionConfig> {
    let trimmed = input.trim();
    let invalid = || Error::InvalidDistributionEntry(trimmed.to_string());

    let mut parts = trimmed.split(':').map(str::trim);
    let kind = parts.next().unwrap_or("");
    let values = parts
        .map(|part| part.parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;

    let distribution = match (kind, values.as_slice()) {
        ("uniform", [low, high]) => DistributionConfig::Uniform {
            low: *low,
            high: *high,
        },
        ("constant", [value]) => DistributionConfig::Constant { value: *value },
        _ => return Err(invalid()),
    };

    distribution.validate(name)?;
    Ok(distribution)
}
