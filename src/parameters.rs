//! MetFrag parameter table and run settings
//!
//! A run starts from [`ExportSettings::default`], which carries the MetFrag
//! defaults, and then applies `name=value` pairs from the config file and
//! the command line through [`ExportSettings::apply`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Spectral data file (mzML)
pub const INPUT_FILE: &str = "InputFile";
/// Folder receiving one command file per spectrum
pub const OUTPUT_FOLDER: &str = "OutputFolder";
/// Single file receiving one command line per spectrum
pub const OUTPUT_FILE: &str = "OutputFile";
/// Maximum number of spectra to export, negative for no limit
pub const MAXIMUM_SPECTRUM_LIMIT: &str = "MaximumSpectrumLimit";

pub const SCORE_TYPES: &str = "MetFragScoreTypes";
pub const SCORE_WEIGHTS: &str = "MetFragScoreWeights";

/// Weight added for every additional score type
const DEFAULT_SCORE_WEIGHT: &str = "1.0";

/// Parameter names accepted as `name=value` arguments, in help order
pub const PARAMETER_NAMES: [&str; 14] = [
    "DatabaseSearchRelativeMassDeviation",
    "FragmentPeakMatchAbsoluteMassDeviation",
    "FragmentPeakMatchRelativeMassDeviation",
    "MaximumTreeDepth",
    "MetFragDatabaseType",
    SCORE_TYPES,
    SCORE_WEIGHTS,
    "MetFragPreProcessingCandidateFilter",
    "MetFragPostProcessingCandidateFilter",
    "ChemSpiderToken",
    INPUT_FILE,
    OUTPUT_FOLDER,
    OUTPUT_FILE,
    MAXIMUM_SPECTRUM_LIMIT,
];

/// MetFrag parameters every exported command starts from
const DEFAULT_PARAMETERS: [(&str, &str); 10] = [
    ("DatabaseSearchRelativeMassDeviation", "10"),
    ("FragmentPeakMatchAbsoluteMassDeviation", "0.01"),
    ("FragmentPeakMatchRelativeMassDeviation", "10"),
    ("MaximumTreeDepth", "2"),
    ("MetFragDatabaseType", "KEGG"),
    (SCORE_WEIGHTS, DEFAULT_SCORE_WEIGHT),
    (SCORE_TYPES, "FragmenterScore"),
    (
        "MetFragPreProcessingCandidateFilter",
        "IsotopeFilter,UnconnectedCompoundFilter",
    ),
    ("MetFragPostProcessingCandidateFilter", "InChIKeyFilter"),
    (
        "MetFragPeakListReader",
        "de.ipbhalle.metfraglib.peaklistreader.FilteredStringTandemMassPeakListReader",
    ),
];

/// Check whether `name` may be set by the user
pub fn is_recognized(name: &str) -> bool {
    PARAMETER_NAMES.contains(&name)
}

/// Errors in a single `name=value` argument
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// Token is not of the form `name=value`
    #[error("Error at {0}")]
    Malformed(String),

    /// Name is not a recognized parameter
    #[error("Unknown parameter {0}")]
    UnknownParameter(String),

    /// Value cannot be interpreted for this parameter
    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },
}

/// Errors in the settings as a whole
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("No input file given. Define InputFile")]
    MissingInputFile,

    #[error("No output folder/file given. Define at least OutputFolder or OutputFile")]
    MissingOutput,
}

/// Append one default weight to `weights` for every comma in `score_types`.
///
/// Starting from one weight per score type this keeps the weight count equal
/// to the number of comma-separated score types.
pub fn extend_score_weights(weights: &str, score_types: &str) -> String {
    let extra = score_types.matches(',').count();
    let mut extended = String::with_capacity(weights.len() + extra * 4);
    extended.push_str(weights);
    for _ in 0..extra {
        extended.push(',');
        extended.push_str(DEFAULT_SCORE_WEIGHT);
    }
    extended
}

/// Parameters passed unchanged to every MetFrag command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterTable {
    entries: BTreeMap<String, String>,
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PARAMETERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl ParameterTable {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Set a parameter, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Space-separated `name=value` tokens, sorted by name
    pub fn to_parameter_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Everything a run needs: file locations, limits and the parameter table
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub input_file: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    /// `None` exports every spectrum
    pub maximum_spectrum_limit: Option<usize>,
    /// Value of the `ResultsPath` directive in every command
    pub results_path: PathBuf,
    pub parameters: ParameterTable,
    /// Weights last set explicitly, the base that score types extend
    base_score_weights: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            input_file: None,
            output_folder: None,
            output_file: None,
            maximum_spectrum_limit: None,
            results_path: std::env::temp_dir(),
            parameters: ParameterTable::default(),
            base_score_weights: DEFAULT_SCORE_WEIGHT.to_string(),
        }
    }
}

impl ExportSettings {
    /// Apply one recognized `name=value` pair.
    ///
    /// File locations and the spectrum limit go to their own fields, all
    /// other names overwrite the parameter table. Setting the score types
    /// also rebuilds the score weights from the last explicitly set weights
    /// (default `1.0`), see [`extend_score_weights`], so repeated types never
    /// pile up weights.
    pub fn apply(&mut self, name: &str, value: &str) -> Result<(), ArgumentError> {
        if !is_recognized(name) {
            return Err(ArgumentError::UnknownParameter(name.to_string()));
        }

        match name {
            INPUT_FILE => self.input_file = Some(PathBuf::from(value)),
            OUTPUT_FOLDER => self.output_folder = Some(PathBuf::from(value)),
            OUTPUT_FILE => self.output_file = Some(PathBuf::from(value)),
            MAXIMUM_SPECTRUM_LIMIT => {
                self.maximum_spectrum_limit = parse_spectrum_limit(value)?;
            }
            SCORE_TYPES => {
                let weights = extend_score_weights(&self.base_score_weights, value);
                self.parameters.set(SCORE_WEIGHTS, weights);
                self.parameters.set(SCORE_TYPES, value);
            }
            SCORE_WEIGHTS => {
                self.base_score_weights = value.to_string();
                self.parameters.set(SCORE_WEIGHTS, value);
            }
            _ => self.parameters.set(name, value),
        }

        Ok(())
    }

    /// The input file, which every run needs
    pub fn require_input_file(&self) -> Result<&Path, ConfigError> {
        self.input_file
            .as_deref()
            .ok_or(ConfigError::MissingInputFile)
    }

    /// Check that an input file and at least one output target are set
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.require_input_file()?;
        if self.output_folder.is_none() && self.output_file.is_none() {
            return Err(ConfigError::MissingOutput);
        }
        Ok(())
    }
}

fn parse_spectrum_limit(value: &str) -> Result<Option<usize>, ArgumentError> {
    let limit: i64 = value.parse().map_err(|_| ArgumentError::InvalidValue {
        name: MAXIMUM_SPECTRUM_LIMIT.to_string(),
        value: value.to_string(),
    })?;
    Ok(usize::try_from(limit).ok())
}
