use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use metfrag_exporter::exporter::{OutputTarget, ParameterExporter};
use metfrag_exporter::parameters::ExportSettings;
use metfrag_exporter::reader::MzMLImporter;

mod args;
mod config;

pub use args::{normalize, parse_arguments, print_help, ParsedArguments};
pub use config::Config;

/// Export MS/MS spectra from mzML as MetFrag parameter sets
#[derive(Parser)]
#[command(name = "metfrag-exporter")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load parameters from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// MetFrag parameters as name=value, or help
    #[arg(
        value_name = "NAME=VALUE",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Build the export settings from the config file and the command line
fn load_settings(cli: &Cli) -> Result<Option<ExportSettings>> {
    let mut settings = ExportSettings::default();

    if let Some(path) = &cli.config {
        Config::from_file(path)?.apply_to(&mut settings)?;
        info!("Loaded config from {}", path.display());
    }

    let tokens = normalize(&cli.args);
    match parse_arguments(&tokens, &mut settings)? {
        ParsedArguments::Help => Ok(None),
        ParsedArguments::Run => Ok(Some(settings)),
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.args.is_empty() && cli.config.is_none() {
        print_help();
        return Ok(());
    }

    let Some(settings) = load_settings(&cli)? else {
        print_help();
        return Ok(());
    };
    settings.validate()?;

    let input = settings.require_input_file()?;
    let target = OutputTarget::from_settings(&settings)?;
    info!("Input:  {}", input.display());
    info!("Output: {}", target);

    let records = MzMLImporter::new(input)
        .spectra_msms(settings.maximum_spectrum_limit)
        .with_context(|| format!("Failed to read spectra from {}", input.display()))?;
    info!("Read {} spectra", records.len());

    ParameterExporter::from_settings(&settings)
        .write(&records, &target)
        .context("Failed to write MetFrag parameters")?;

    Ok(())
}
