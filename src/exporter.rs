//! Parameter exporter: one MetFrag command line per spectrum
//!
//! Each command is the shared parameter table followed by the spectrum
//! specific keys. Commands go either to numbered files in a folder
//! (`command_01.txt`, `command_02.txt`, ...) or as lines of a single file.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::parameters::{ConfigError, ExportSettings, ParameterTable};
use crate::spectrum::SpectrumRecord;

/// Candidate writer requested from MetFrag
pub const CANDIDATE_WRITER: &str = "CSV";

/// Errors raised while writing command files
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error creating or writing an output file
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Where commands are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// One file per spectrum inside this folder
    Folder(PathBuf),
    /// All commands as lines of this file
    File(PathBuf),
}

impl OutputTarget {
    /// Pick the output target from the settings; a folder wins over a file
    pub fn from_settings(settings: &ExportSettings) -> Result<Self, ConfigError> {
        match (&settings.output_folder, &settings.output_file) {
            (Some(folder), _) => Ok(OutputTarget::Folder(folder.clone())),
            (None, Some(file)) => Ok(OutputTarget::File(file.clone())),
            (None, None) => Err(ConfigError::MissingOutput),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Folder(path) => write!(f, "folder {}", path.display()),
            OutputTarget::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Summary of a finished export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub spectra_written: usize,
    pub files_written: usize,
}

/// Number of digits needed to number `count` files (at least 1)
pub fn index_width(count: usize) -> usize {
    let mut width = 1;
    let mut rest = count / 10;
    while rest > 0 {
        width += 1;
        rest /= 10;
    }
    width
}

/// File name of the `index`-th (1-based) command file
pub fn command_file_name(index: usize, width: usize) -> String {
    format!("command_{:0width$}.txt", index, width = width)
}

/// Build the MetFrag command line for one spectrum
pub fn parameter_string(
    parameters: &ParameterTable,
    record: &SpectrumRecord,
    results_path: &Path,
) -> String {
    let general = parameters.to_parameter_string();
    let mut command = String::with_capacity(general.len() + record.peak_list().len() + 256);
    command.push_str(&general);
    for (key, value) in [
        ("SampleName", record.name().to_string()),
        (
            "IonizedPrecursorMass",
            format!("{:?}", record.precursor_ion_mass()),
        ),
        ("PeakListString", record.peak_list().to_string()),
        ("PrecursorIonType", record.precursor_adduct().to_string()),
        ("MetFragCandidateWriter", CANDIDATE_WRITER.to_string()),
        ("ResultsPath", results_path.display().to_string()),
    ] {
        if !command.is_empty() {
            command.push(' ');
        }
        command.push_str(key);
        command.push('=');
        command.push_str(&value);
    }
    command
}

/// Formats spectra into MetFrag commands and writes them out
#[derive(Debug, Clone)]
pub struct ParameterExporter<'a> {
    parameters: &'a ParameterTable,
    results_path: &'a Path,
}

impl<'a> ParameterExporter<'a> {
    pub fn new(parameters: &'a ParameterTable, results_path: &'a Path) -> Self {
        Self {
            parameters,
            results_path,
        }
    }

    /// Exporter using the parameter table and results path of `settings`
    pub fn from_settings(settings: &'a ExportSettings) -> Self {
        Self::new(&settings.parameters, &settings.results_path)
    }

    /// One command per record, in record order
    pub fn commands(&self, records: &[SpectrumRecord]) -> Vec<String> {
        records
            .iter()
            .map(|record| parameter_string(self.parameters, record, self.results_path))
            .collect()
    }

    /// Write the commands for `records` to `target`.
    ///
    /// Files written before an I/O error are left in place.
    pub fn write(
        &self,
        records: &[SpectrumRecord],
        target: &OutputTarget,
    ) -> Result<ExportSummary, ExportError> {
        if records.is_empty() {
            warn!("No MS/MS spectra found, nothing to export");
        }

        let commands = self.commands(records);
        let summary = match target {
            OutputTarget::Folder(folder) => write_folder(folder, &commands)?,
            OutputTarget::File(file) => write_single_file(file, &commands)?,
        };

        info!(
            "Exported {} spectra to {} file(s)",
            summary.spectra_written, summary.files_written
        );
        Ok(summary)
    }
}

fn write_folder(folder: &Path, commands: &[String]) -> Result<ExportSummary, ExportError> {
    fs::create_dir_all(folder).map_err(ExportError::io(folder))?;

    let width = index_width(commands.len());
    for (i, command) in commands.iter().enumerate() {
        let path = folder.join(command_file_name(i + 1, width));
        fs::write(&path, command).map_err(ExportError::io(&path))?;
        log::debug!("Wrote {}", path.display());
    }

    Ok(ExportSummary {
        spectra_written: commands.len(),
        files_written: commands.len(),
    })
}

fn write_single_file(path: &Path, commands: &[String]) -> Result<ExportSummary, ExportError> {
    let file = File::create(path).map_err(ExportError::io(path))?;
    let mut writer = BufWriter::new(file);
    for command in commands {
        writer
            .write_all(command.as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .map_err(ExportError::io(path))?;
    }
    writer.flush().map_err(ExportError::io(path))?;

    Ok(ExportSummary {
        spectra_written: commands.len(),
        files_written: 1,
    })
}
