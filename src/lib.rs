//! # metfrag-exporter
//!
//! Turns the MS/MS scans of an mzML file into MetFrag command lines, one per
//! precursor isolation window.
//!
//! ## Pipeline
//!
//! 1. [`mzml::MzMLStreamer`] pulls spectra out of the mzML document one at a
//!    time and decodes their binary arrays (base64, optional zlib, 32/64-bit
//!    little-endian floats).
//! 2. [`reader::read_spectra`] keeps the scans with precursors and turns each
//!    isolation window into a [`spectrum::SpectrumRecord`]. Scans with
//!    mismatched or missing peak arrays are skipped with a warning.
//! 3. [`exporter::ParameterExporter`] prefixes each record with the shared
//!    [`parameters::ParameterTable`] and writes the result to a folder or a file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use metfrag_exporter::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut settings = ExportSettings::default();
//!     settings.apply("MetFragDatabaseType", "PubChem")?;
//!     settings.apply("OutputFolder", "commands")?;
//!
//!     let records = MzMLImporter::new("run.mzML").spectra_msms(Some(10))?;
//!     let target = OutputTarget::from_settings(&settings)?;
//!     let summary = ParameterExporter::from_settings(&settings).write(&records, &target)?;
//!     println!("wrote {} files", summary.files_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Command format
//!
//! Every command is a single line of space-separated `name=value` tokens: the
//! parameter table sorted by name, then `SampleName`, `IonizedPrecursorMass`,
//! `PeakListString`, `PrecursorIonType`, `MetFragCandidateWriter` and
//! `ResultsPath`. Peaks are written as `<mz>_<intensity>` pairs joined by `;`.

#![deny(rustdoc::missing_crate_level_docs)]

pub mod exporter;
pub mod mzml;
pub mod parameters;
pub mod reader;
pub mod spectrum;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::exporter::{
        parameter_string, ExportError, ExportSummary, OutputTarget, ParameterExporter,
    };
    pub use crate::mzml::{MzMLError, MzMLSpectrum, MzMLStreamer};
    pub use crate::parameters::{ArgumentError, ConfigError, ExportSettings, ParameterTable};
    pub use crate::reader::{read_spectra, MsScan, MzMLImporter, ReaderError, ScanSource};
    pub use crate::spectrum::{SpectrumRecord, DEFAULT_PRECURSOR_ADDUCT_TYPE};
}
