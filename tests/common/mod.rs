//! Inline mzML fixtures shared by the integration tests

#![allow(dead_code)]

use base64::prelude::*;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// One scan of a generated mzML document
#[derive(Debug, Clone)]
pub struct ScanFixture {
    pub scan: i64,
    pub ms_level: u8,
    pub precursors: Vec<f64>,
    pub adduct: Option<&'static str>,
    pub mz: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl ScanFixture {
    /// MS/MS scan with one isolation window and three peaks
    pub fn msms(scan: i64, precursor_mz: f64) -> Self {
        Self {
            scan,
            ms_level: 2,
            precursors: vec![precursor_mz],
            adduct: None,
            mz: vec![50.5, 101.25, 150.0],
            intensity: vec![1000.0, 250.5, 42.0],
        }
    }

    pub fn ms1(scan: i64) -> Self {
        Self {
            ms_level: 1,
            precursors: Vec::new(),
            ..Self::msms(scan, 0.0)
        }
    }

    pub fn with_adduct(mut self, adduct: &'static str) -> Self {
        self.adduct = Some(adduct);
        self
    }

    pub fn with_precursors(mut self, precursors: Vec<f64>) -> Self {
        self.precursors = precursors;
        self
    }

    pub fn with_peaks(mut self, mz: Vec<f64>, intensity: Vec<f64>) -> Self {
        self.mz = mz;
        self.intensity = intensity;
        self
    }
}

fn encode_f64(values: &[f64]) -> String {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    BASE64_STANDARD.encode(bytes)
}

fn binary_array(out: &mut String, accession: &str, name: &str, values: &[f64]) {
    let _ = write!(
        out,
        r#"
          <binaryDataArray encodedLength="0">
            <cvParam cvRef="MS" accession="MS:1000523" name="64-bit float"/>
            <cvParam cvRef="MS" accession="MS:1000576" name="no compression"/>
            <cvParam cvRef="MS" accession="{accession}" name="{name}"/>
            <binary>{}</binary>
          </binaryDataArray>"#,
        encode_f64(values)
    );
}

/// Render a complete indexed mzML document
pub fn mzml_document(scans: &[ScanFixture]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="utf-8"?>
<indexedmzML xmlns="http://psi.hupo.org/ms/mzml">
<mzML xmlns="http://psi.hupo.org/ms/mzml" version="1.1.0">
  <cvList count="1">
    <cv id="MS" fullName="Proteomics Standards Initiative Mass Spectrometry Ontology"/>
  </cvList>
  <run id="fixture_run">
"#,
    );
    let _ = writeln!(out, r#"    <spectrumList count="{}">"#, scans.len());

    for (index, scan) in scans.iter().enumerate() {
        let _ = write!(
            out,
            r#"      <spectrum index="{index}" id="controllerType=0 controllerNumber=1 scan={}" defaultArrayLength="{}">
        <cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="{}"/>"#,
            scan.scan,
            scan.mz.len(),
            scan.ms_level
        );
        if let Some(adduct) = scan.adduct {
            let _ = write!(out, r#"
        <userParam name="Precursor_Ion" value="{adduct}"/>"#);
        }
        if !scan.precursors.is_empty() {
            let _ = write!(out, r#"
        <precursorList count="{}">"#, scan.precursors.len());
            for mz in &scan.precursors {
                let _ = write!(
                    out,
                    r#"
          <precursor>
            <selectedIonList count="1">
              <selectedIon>
                <cvParam cvRef="MS" accession="MS:1000744" name="selected ion m/z" value="{mz}"/>
              </selectedIon>
            </selectedIonList>
          </precursor>"#
                );
            }
            out.push_str("\n        </precursorList>");
        }
        out.push_str("\n        <binaryDataArrayList count=\"2\">");
        binary_array(&mut out, "MS:1000514", "m/z array", &scan.mz);
        binary_array(&mut out, "MS:1000515", "intensity array", &scan.intensity);
        out.push_str("\n        </binaryDataArrayList>\n      </spectrum>\n");
    }

    out.push_str("    </spectrumList>\n  </run>\n</mzML>\n</indexedmzML>\n");
    out
}

/// Write a generated document to `dir/name`
pub fn write_mzml(dir: &Path, name: &str, scans: &[ScanFixture]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, mzml_document(scans)).unwrap();
    path
}

/// Three MS/MS scans with one isolation window each and no adduct annotation
pub fn three_unannotated_scans() -> Vec<ScanFixture> {
    vec![
        ScanFixture::msms(11, 301.1412),
        ScanFixture::msms(12, 445.12),
        ScanFixture::msms(13, 180.0634),
    ]
}
