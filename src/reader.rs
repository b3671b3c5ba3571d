//! Raw-data reader: turns the scans of an mzML file into [`SpectrumRecord`]s.
//!
//! Parsing sits behind the [`ScanSource`] and [`MsScan`] traits, so any
//! backend that can hand out scans with isolation windows, annotations and
//! peak arrays can feed the exporter. [`MzMLStreamer`] is the built-in one.

use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::mzml::{DataArray, MzMLError, MzMLSpectrum, MzMLStreamer, Precursor};
use crate::spectrum::{
    format_peak_list, spectrum_name, SpectrumRecord, DEFAULT_PRECURSOR_ADDUCT_TYPE,
};

/// Name of the user parameter holding the precursor adduct type
pub const PRECURSOR_ADDUCT_TYPE_NAME: &str = "Precursor_Ion";

/// Errors raised while opening or reading the raw data file
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// The input path does not exist
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    /// The input path exists but is not a regular file
    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),

    /// The input file cannot be opened for reading
    #[error("No read permission for {}: {source}", .path.display())]
    NotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mzML content could not be parsed
    #[error("Failed to read mzML file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: MzMLError,
    },
}

/// A single scan as seen by the reader
pub trait MsScan {
    /// Scan number used in the sample name
    fn scan_number(&self) -> i64;

    /// Isolation windows of the scan, in document order
    fn isolation_windows(&self) -> &[Precursor];

    /// Look up a scan annotation (mzML `userParam`) by name
    fn annotation(&self, name: &str) -> Option<&str>;

    fn mz_values(&self) -> Option<&DataArray>;

    fn intensity_values(&self) -> Option<&DataArray>;
}

/// A sequential supply of scans
pub trait ScanSource {
    type Scan: MsScan;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Next scan in document order, `None` once exhausted
    fn next_scan(&mut self) -> Result<Option<Self::Scan>, Self::Error>;
}

impl MsScan for MzMLSpectrum {
    fn scan_number(&self) -> i64 {
        MzMLSpectrum::scan_number(self)
    }

    fn isolation_windows(&self) -> &[Precursor] {
        &self.precursors
    }

    fn annotation(&self, name: &str) -> Option<&str> {
        self.user_params.get(name).map(String::as_str)
    }

    fn mz_values(&self) -> Option<&DataArray> {
        self.mz_array.as_ref()
    }

    fn intensity_values(&self) -> Option<&DataArray> {
        self.intensity_array.as_ref()
    }
}

impl<R: BufRead> ScanSource for MzMLStreamer<R> {
    type Scan = MzMLSpectrum;
    type Error = MzMLError;

    fn next_scan(&mut self) -> Result<Option<MzMLSpectrum>, MzMLError> {
        self.next_spectrum()
    }
}

/// In-memory scans, e.g. produced by another parsing library
impl<S: MsScan> ScanSource for std::vec::IntoIter<S> {
    type Scan = S;
    type Error = Infallible;

    fn next_scan(&mut self) -> Result<Option<S>, Infallible> {
        Ok(self.next())
    }
}

/// Why a scan's peak data cannot be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeakProblem {
    Missing,
    Inconsistent { masses: usize, intensities: usize },
}

impl fmt::Display for PeakProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeakProblem::Missing => write!(f, "No peak information provided"),
            PeakProblem::Inconsistent {
                masses,
                intensities,
            } => write!(
                f,
                "Peak information inconsistent, found {} masses and {} intensities",
                masses, intensities
            ),
        }
    }
}

/// Both arrays present, non-empty and of equal length
fn checked_peak_arrays<S: MsScan>(scan: &S) -> Result<(&DataArray, &DataArray), PeakProblem> {
    let (Some(mz), Some(intensity)) = (scan.mz_values(), scan.intensity_values()) else {
        return Err(PeakProblem::Missing);
    };
    if mz.values.is_empty() || intensity.values.is_empty() {
        return Err(PeakProblem::Missing);
    }
    if mz.values.len() != intensity.values.len() {
        return Err(PeakProblem::Inconsistent {
            masses: mz.values.len(),
            intensities: intensity.values.len(),
        });
    }
    Ok((mz, intensity))
}

/// Extract one [`SpectrumRecord`] per isolation window of every scan.
///
/// Scans with unusable peak data are skipped with a warning. Reading stops as
/// soon as `limit` records have been collected; `None` reads everything.
pub fn read_spectra<S: ScanSource>(
    source: &mut S,
    limit: Option<usize>,
) -> Result<Vec<SpectrumRecord>, S::Error> {
    let mut records = Vec::new();
    let mut scans_read = 0usize;
    let mut scans_skipped = 0usize;

    if limit == Some(0) {
        return Ok(records);
    }

    'scans: while let Some(scan) = source.next_scan()? {
        scans_read += 1;
        let scan_number = scan.scan_number();

        for (k, window) in scan.isolation_windows().iter().enumerate() {
            let Some(precursor_mz) = window.precursor_mz() else {
                warn!(
                    "No precursor m/z provided for isolation window {} of MS/MS spectrum: ID {}. Window skipped.",
                    k + 1,
                    scan_number
                );
                continue;
            };

            let adduct_type = match scan.annotation(PRECURSOR_ADDUCT_TYPE_NAME) {
                Some(adduct) => adduct.to_string(),
                None => {
                    warn!(
                        "No adduct information provided for MS/MS spectrum: ID {}, Mass: {}. Assuming {}",
                        scan_number, precursor_mz, DEFAULT_PRECURSOR_ADDUCT_TYPE
                    );
                    DEFAULT_PRECURSOR_ADDUCT_TYPE.to_string()
                }
            };

            let (mz, intensity) = match checked_peak_arrays(&scan) {
                Ok(arrays) => arrays,
                Err(problem) => {
                    warn!(
                        "{} for MS/MS spectrum: ID {}, Mass: {}. Scan skipped.",
                        problem, scan_number, precursor_mz
                    );
                    scans_skipped += 1;
                    continue 'scans;
                }
            };

            records.push(SpectrumRecord::new(
                format_peak_list(mz, intensity),
                adduct_type,
                precursor_mz,
                spectrum_name(scan_number, k + 1),
            ));

            if limit.is_some_and(|max| records.len() >= max) {
                info!("Spectrum limit of {} reached", records.len());
                break 'scans;
            }
        }
    }

    info!(
        "Read {} scans, extracted {} MS/MS spectra ({} scans skipped)",
        scans_read,
        records.len(),
        scans_skipped
    );

    Ok(records)
}

/// Reads MS/MS spectra from an mzML file on disk
#[derive(Debug, Clone)]
pub struct MzMLImporter {
    path: PathBuf,
}

impl MzMLImporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read MS/MS spectra from the file.
    ///
    /// Adduct types come from the `Precursor_Ion` user parameter of each
    /// scan. When it is missing `[M+H]+` is assumed and a warning is logged.
    pub fn spectra_msms(&self, limit: Option<usize>) -> Result<Vec<SpectrumRecord>, ReaderError> {
        let mut streamer = self.open()?;
        read_spectra(&mut streamer, limit).map_err(|source| ReaderError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn open(&self) -> Result<MzMLStreamer<BufReader<File>>, ReaderError> {
        if !self.path.exists() {
            return Err(ReaderError::NotFound(self.path.clone()));
        }
        if !self.path.is_file() {
            return Err(ReaderError::NotAFile(self.path.clone()));
        }

        info!("Reading mzML file {}", self.path.display());
        MzMLStreamer::open(&self.path).map_err(|source| match source {
            MzMLError::IoError(source) => ReaderError::NotReadable {
                path: self.path.clone(),
                source,
            },
            source => ReaderError::Parse {
                path: self.path.clone(),
                source,
            },
        })
    }
}
