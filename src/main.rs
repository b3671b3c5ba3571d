//! # MetFrag parameter exporter
//!
//! Reads MS/MS spectra from an mzML file and writes one MetFrag command line
//! per spectrum.
//!
//! ## Usage
//!
//! ```bash
//! # One command file per spectrum
//! metfrag-exporter InputFile=run.mzML OutputFolder=commands/
//!
//! # All commands in one file, first 10 spectra, PubChem search
//! metfrag-exporter InputFile=run.mzML OutputFile=commands.txt \
//!     MaximumSpectrumLimit=10 MetFragDatabaseType=PubChem
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    cli::init_logging(cli.verbosity());

    cli::run(cli)
}
