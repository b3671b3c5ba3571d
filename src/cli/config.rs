//! TOML configuration file support.
//!
//! Parameters shared by many runs can live in a config file instead of the
//! command line:
//!
//! ```toml
//! # metfrag.toml
//! [parameters]
//! MetFragDatabaseType = "PubChem"
//! MaximumTreeDepth = 3
//!
//! [export]
//! results_path = "/data/results"
//! maximum_spectrum_limit = 50
//! ```
//!
//! The file is applied before the command-line tokens, so the command line wins.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use metfrag_exporter::parameters::ExportSettings;

/// Root configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// `name = value` pairs, same names as on the command line.
    #[serde(default)]
    pub parameters: BTreeMap<String, toml::Value>,

    /// Export-specific settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Settings with no command-line counterpart, plus the spectrum limit.
#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    /// Directory MetFrag writes its results to (`ResultsPath`).
    pub results_path: Option<PathBuf>,

    /// Maximum number of spectra to export, negative for no limit.
    pub maximum_spectrum_limit: Option<i64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Apply the file's settings on top of `settings`.
    ///
    /// Parameters go through [`ExportSettings::apply`] in name order, so
    /// `MetFragScoreTypes` is applied before `MetFragScoreWeights`.
    pub fn apply_to(&self, settings: &mut ExportSettings) -> Result<()> {
        for (name, value) in &self.parameters {
            let value = scalar_to_string(name, value)?;
            settings
                .apply(name, &value)
                .with_context(|| format!("Invalid [parameters] entry {}", name))?;
        }

        if let Some(results_path) = &self.export.results_path {
            settings.results_path = results_path.clone();
        }
        if let Some(limit) = self.export.maximum_spectrum_limit {
            settings.maximum_spectrum_limit = usize::try_from(limit).ok();
        }

        Ok(())
    }
}

fn scalar_to_string(name: &str, value: &toml::Value) -> Result<String> {
    Ok(match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        other => bail!(
            "Parameter {} must be a string or number, found {}",
            name,
            other.type_str()
        ),
    })
}
