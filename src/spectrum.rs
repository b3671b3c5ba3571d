//! MS/MS spectrum records handed from the reader to the exporter

use std::fmt::Write as _;

use crate::mzml::{BinaryEncoding, DataArray};

/// Adduct assumed when a scan carries no `Precursor_Ion` annotation
pub const DEFAULT_PRECURSOR_ADDUCT_TYPE: &str = "[M+H]+";

/// One MS/MS spectrum: a single isolation window of a single scan
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumRecord {
    peak_list: String,
    precursor_adduct: String,
    precursor_ion_mass: f64,
    name: String,
}

impl SpectrumRecord {
    /// Create a record from an already serialized peak list
    pub fn new(
        peak_list: impl Into<String>,
        precursor_adduct: impl Into<String>,
        precursor_ion_mass: f64,
        name: impl Into<String>,
    ) -> Self {
        Self {
            peak_list: peak_list.into(),
            precursor_adduct: precursor_adduct.into(),
            precursor_ion_mass,
            name: name.into(),
        }
    }

    /// Peaks as `"<mz>_<intensity>"` pairs joined by `;`
    pub fn peak_list(&self) -> &str {
        &self.peak_list
    }

    pub fn precursor_adduct(&self) -> &str {
        &self.precursor_adduct
    }

    pub fn precursor_ion_mass(&self) -> f64 {
        self.precursor_ion_mass
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Sample name for the `window`-th (1-based) isolation window of a scan
pub fn spectrum_name(scan_number: i64, window: usize) -> String {
    format!("Spectrum_{}_{}", scan_number, window)
}

/// Format a number in shortest round-trip form at the precision it was stored with.
///
/// Integral values keep a trailing `.0` (`100.0`), and values read from 32-bit
/// arrays are printed as `f32` so that `0.1` does not turn into
/// `0.10000000149011612`.
pub fn format_value(value: f64, encoding: BinaryEncoding) -> String {
    match encoding {
        BinaryEncoding::Float32 => format!("{:?}", value as f32),
        BinaryEncoding::Float64 => format!("{:?}", value),
    }
}

/// Serialize paired m/z and intensity arrays into a peak list string.
///
/// The caller guarantees both arrays have the same length.
pub fn format_peak_list(mz: &DataArray, intensity: &DataArray) -> String {
    let mut peaks = String::with_capacity(mz.values.len() * 24);
    for (i, (m, int)) in mz.values.iter().zip(&intensity.values).enumerate() {
        if i > 0 {
            peaks.push(';');
        }
        // Writing into a String cannot fail
        let _ = write!(
            peaks,
            "{}_{}",
            format_value(*m, mz.encoding),
            format_value(*int, intensity.encoding)
        );
    }
    peaks
}
