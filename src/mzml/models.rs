//! Data models for parsed mzML content

use std::collections::BTreeMap;

use super::binary::BinaryEncoding;
use super::cv_params::CvParam;

/// File-level information gathered before the spectrum list
#[derive(Debug, Clone, Default)]
pub struct MzMLFileMetadata {
    /// mzML schema version
    pub version: Option<String>,

    /// Run identifier
    pub run_id: Option<String>,

    /// Declared `count` of the `<spectrumList>`
    pub spectrum_count: Option<usize>,
}

/// A decoded numeric array together with the precision it was stored at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataArray {
    pub values: Vec<f64>,
    pub encoding: BinaryEncoding,
}

impl DataArray {
    pub fn new(values: Vec<f64>, encoding: BinaryEncoding) -> Self {
        Self { values, encoding }
    }
}

/// Represents a single spectrum from an mzML file
#[derive(Debug, Clone, Default)]
pub struct MzMLSpectrum {
    /// Spectrum index (0-based)
    pub index: i64,

    /// Native spectrum ID from the file
    pub id: String,

    /// Default array length (number of peaks)
    pub default_array_length: usize,

    /// MS level (1 for MS1, 2 for MS2, etc.)
    pub ms_level: i16,

    /// Precursor information (for MS2+ spectra)
    pub precursors: Vec<Precursor>,

    /// m/z array, `None` when the spectrum carries no m/z `<binaryDataArray>`
    pub mz_array: Option<DataArray>,

    /// Intensity array, `None` when the spectrum carries no intensity `<binaryDataArray>`
    pub intensity_array: Option<DataArray>,

    /// Spectrum-level CV parameters
    pub cv_params: Vec<CvParam>,

    /// User parameters (`<userParam name=".." value=".."/>`) found in the
    /// spectrum, its scan list and its precursors
    pub user_params: BTreeMap<String, String>,
}

impl MzMLSpectrum {
    /// Get the scan number from the native ID
    pub fn scan_number(&self) -> i64 {
        // Common formats:
        // "scan=12345"
        // "controllerType=0 controllerNumber=1 scan=12345"
        // "S12345"
        if let Some(pos) = self.id.find("scan=") {
            let start = pos + 5;
            let end = self.id[start..]
                .find(|c: char| !c.is_ascii_digit())
                .map(|i| start + i)
                .unwrap_or(self.id.len());
            if let Ok(number) = self.id[start..end].parse() {
                return number;
            }
        } else if let Some(number) = self.id.strip_prefix('S').and_then(|s| s.parse().ok()) {
            return number;
        }
        self.index + 1
    }

    /// Get the number of peaks
    pub fn peak_count(&self) -> usize {
        self.mz_array.as_ref().map_or(0, |a| a.values.len())
    }
}

/// Precursor ion information for MS2+ spectra
///
/// Each `<precursor>` element describes one isolation window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Precursor {
    /// Reference to the precursor spectrum ID
    pub spectrum_ref: Option<String>,

    /// Isolation window target m/z
    pub isolation_window_target: Option<f64>,

    /// Selected ion m/z
    pub selected_ion_mz: Option<f64>,
}

impl Precursor {
    /// The precursor m/z: the selected ion if reported, else the isolation target
    pub fn precursor_mz(&self) -> Option<f64> {
        self.selected_ion_mz.or(self.isolation_window_target)
    }
}
