//! Controlled Vocabulary (CV) parameter handling for mzML
//!
//! Only the PSI-MS terms needed to pull MS/MS precursors and peak arrays out
//! of a spectrum are mapped here. Everything else is kept as a raw [`CvParam`]
//! and ignored by the reader.

/// A controlled vocabulary parameter from mzML
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CvParam {
    /// Accession number (e.g., "MS:1000511")
    pub accession: String,

    /// Human-readable name
    pub name: String,

    /// Optional value
    pub value: Option<String>,
}

impl CvParam {
    /// Get the value as f64 if possible
    pub fn value_as_f64(&self) -> Option<f64> {
        self.value.as_ref()?.trim().parse().ok()
    }

    /// Get the value as i64 if possible
    pub fn value_as_i64(&self) -> Option<i64> {
        self.value.as_ref()?.trim().parse().ok()
    }
}

/// PSI-MS accessions used when reading MS/MS spectra
#[allow(non_snake_case)]
pub mod MS_CV_ACCESSIONS {
    // =========================================================================
    // Spectrum type
    // =========================================================================

    /// MS level
    pub const MS_LEVEL: &str = "MS:1000511";

    // =========================================================================
    // Precursor/isolation
    // =========================================================================

    /// Selected ion m/z
    pub const SELECTED_ION_MZ: &str = "MS:1000744";

    /// Isolation window target m/z
    pub const ISOLATION_WINDOW_TARGET_MZ: &str = "MS:1000827";

    // =========================================================================
    // Binary data encoding
    // =========================================================================

    /// 32-bit float
    pub const FLOAT_32_BIT: &str = "MS:1000521";

    /// 64-bit float
    pub const FLOAT_64_BIT: &str = "MS:1000523";

    /// zlib compression
    pub const ZLIB_COMPRESSION: &str = "MS:1000574";

    /// No compression
    pub const NO_COMPRESSION: &str = "MS:1000576";

    /// MS-Numpress linear prediction
    pub const NUMPRESS_LINEAR: &str = "MS:1002312";

    /// MS-Numpress positive integer compression
    pub const NUMPRESS_PIC: &str = "MS:1002313";

    /// MS-Numpress short logged float compression
    pub const NUMPRESS_SLOF: &str = "MS:1002314";

    // =========================================================================
    // Binary array types
    // =========================================================================

    /// m/z array
    pub const MZ_ARRAY: &str = "MS:1000514";

    /// Intensity array
    pub const INTENSITY_ARRAY: &str = "MS:1000515";
}

/// Find the first CV parameter with the given accession
pub fn find_cv_param<'a>(cv_params: &'a [CvParam], accession: &str) -> Option<&'a CvParam> {
    cv_params.iter().find(|p| p.accession == accession)
}
