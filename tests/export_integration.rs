//! Integration tests for the mzML to MetFrag command pipeline
//!
//! Documents are generated inline, written to temporary directories and run
//! through the library and the `metfrag-exporter` binary.

mod common;

use common::{three_unannotated_scans, write_mzml, ScanFixture};
use metfrag_exporter::prelude::*;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn export(settings: &ExportSettings) -> ExportSummary {
    let input = settings.require_input_file().unwrap();
    let records = MzMLImporter::new(input)
        .spectra_msms(settings.maximum_spectrum_limit)
        .unwrap();
    let target = OutputTarget::from_settings(settings).unwrap();
    ParameterExporter::from_settings(settings)
        .write(&records, &target)
        .unwrap()
}

fn sorted_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn run_binary(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_metfrag-exporter"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// Get a named value out of a command line
fn directive<'a>(command: &'a str, name: &str) -> Option<&'a str> {
    command
        .split(' ')
        .find_map(|token| token.strip_prefix(name)?.strip_prefix('='))
}

#[test]
fn test_one_record_per_isolation_window() {
    let dir = tempdir().unwrap();
    let scans = vec![
        ScanFixture::ms1(1),
        ScanFixture::msms(2, 301.14).with_precursors(vec![301.14, 445.12]),
        ScanFixture::msms(3, 180.06).with_adduct("[M+Na]+"),
        ScanFixture::ms1(4),
    ];
    let path = write_mzml(dir.path(), "run.mzML", &scans);

    let records = MzMLImporter::new(&path).spectra_msms(None).unwrap();
    let names: Vec<_> = records.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["Spectrum_2_1", "Spectrum_2_2", "Spectrum_3_1"]);

    assert_eq!(records[1].precursor_ion_mass(), 445.12);
    assert_eq!(records[2].precursor_adduct(), "[M+Na]+");
    assert_eq!(records[0].peak_list(), "50.5_1000.0;101.25_250.5;150.0_42.0");
}

#[test]
fn test_spectrum_limit() {
    let dir = tempdir().unwrap();
    let scans: Vec<_> = (1..=6).map(|i| ScanFixture::msms(i, 100.0 + i as f64)).collect();
    let path = write_mzml(dir.path(), "run.mzML", &scans);
    let importer = MzMLImporter::new(&path);

    assert_eq!(importer.spectra_msms(Some(4)).unwrap().len(), 4);
    assert_eq!(importer.spectra_msms(Some(0)).unwrap().len(), 0);
    assert_eq!(importer.spectra_msms(Some(100)).unwrap().len(), 6);
}

#[test]
fn test_three_scans_default_adduct_folder_mode() {
    let dir = tempdir().unwrap();
    let input = write_mzml(dir.path(), "run.mzML", &three_unannotated_scans());
    let out = dir.path().join("commands");

    let mut settings = ExportSettings::default();
    settings.apply("InputFile", input.to_str().unwrap()).unwrap();
    settings.apply("OutputFolder", out.to_str().unwrap()).unwrap();

    let summary = export(&settings);
    assert_eq!(summary, ExportSummary { spectra_written: 3, files_written: 3 });
    assert_eq!(
        sorted_file_names(&out),
        vec!["command_1.txt", "command_2.txt", "command_3.txt"]
    );

    for (i, scan) in [11, 12, 13].iter().enumerate() {
        let command = fs::read_to_string(out.join(format!("command_{}.txt", i + 1))).unwrap();
        assert_eq!(directive(&command, "PrecursorIonType"), Some("[M+H]+"));
        assert_eq!(
            directive(&command, "SampleName"),
            Some(format!("Spectrum_{}_1", scan).as_str())
        );
        assert_eq!(directive(&command, "MetFragCandidateWriter"), Some("CSV"));
        assert!(!command.ends_with('\n'));
    }
}

#[test]
fn test_folder_names_padded_to_total() {
    let dir = tempdir().unwrap();
    let scans: Vec<_> = (1..=12).map(|i| ScanFixture::msms(i, 200.0)).collect();
    let input = write_mzml(dir.path(), "run.mzML", &scans);
    let out = dir.path().join("out");

    let mut settings = ExportSettings::default();
    settings.input_file = Some(input);
    settings.output_folder = Some(out.clone());

    assert_eq!(export(&settings).files_written, 12);
    let names = sorted_file_names(&out);
    assert_eq!(names.len(), 12);
    assert_eq!(names.first().map(String::as_str), Some("command_01.txt"));
    assert_eq!(names.last().map(String::as_str), Some("command_12.txt"));
}

#[test]
fn test_mismatched_scan_is_skipped() {
    let dir = tempdir().unwrap();
    let scans = vec![
        ScanFixture::msms(1, 150.0),
        ScanFixture::msms(2, 250.0).with_peaks(vec![100.0, 200.0, 300.0], vec![1.0, 2.0]),
        ScanFixture::msms(3, 350.0).with_peaks(Vec::new(), Vec::new()),
        ScanFixture::msms(4, 450.0),
    ];
    let path = write_mzml(dir.path(), "run.mzML", &scans);

    let records = MzMLImporter::new(&path).spectra_msms(None).unwrap();
    let names: Vec<_> = records.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["Spectrum_1_1", "Spectrum_4_1"]);
}

#[test]
fn test_score_weights_follow_score_types() {
    let dir = tempdir().unwrap();
    let input = write_mzml(dir.path(), "run.mzML", &[ScanFixture::msms(5, 300.0)]);
    let out = dir.path().join("commands.txt");

    let mut settings = ExportSettings::default();
    settings.input_file = Some(input);
    settings.output_file = Some(out.clone());
    settings.apply("MetFragScoreTypes", "ScoreA,ScoreB,ScoreC").unwrap();

    export(&settings);
    let content = fs::read_to_string(&out).unwrap();
    let command = content.lines().next().unwrap();
    assert_eq!(directive(command, "MetFragScoreTypes"), Some("ScoreA,ScoreB,ScoreC"));
    assert_eq!(directive(command, "MetFragScoreWeights"), Some("1.0,1.0,1.0"));
}

#[test]
fn test_folder_wins_over_file() {
    let dir = tempdir().unwrap();
    let input = write_mzml(dir.path(), "run.mzML", &three_unannotated_scans());
    let folder = dir.path().join("folder");
    let file = dir.path().join("single.txt");

    let mut settings = ExportSettings::default();
    settings.input_file = Some(input);
    settings.output_folder = Some(folder.clone());
    settings.output_file = Some(file.clone());

    export(&settings);
    assert_eq!(sorted_file_names(&folder).len(), 3);
    assert!(!file.exists());
}

#[test]
fn test_file_mode_one_line_per_spectrum() {
    let dir = tempdir().unwrap();
    let input = write_mzml(dir.path(), "run.mzML", &three_unannotated_scans());
    let out = dir.path().join("commands.txt");

    let mut settings = ExportSettings::default();
    settings.input_file = Some(input);
    settings.output_file = Some(out.clone());
    settings.results_path = dir.path().join("results");

    assert_eq!(export(&settings).files_written, 1);
    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(content.ends_with('\n'));

    let results = dir.path().join("results");
    for line in lines {
        assert_eq!(
            directive(line, "ResultsPath"),
            Some(results.to_str().unwrap())
        );
        assert!(line.starts_with(&settings.parameters.to_parameter_string()));
    }
}

#[test]
fn test_identical_inputs_identical_outputs() {
    let dir = tempdir().unwrap();
    let input = write_mzml(dir.path(), "run.mzML", &three_unannotated_scans());

    let mut outputs = Vec::new();
    for run in ["first.txt", "second.txt"] {
        let mut settings = ExportSettings::default();
        settings.input_file = Some(input.clone());
        settings.output_file = Some(dir.path().join(run));
        settings.results_path = "/tmp/metfrag".into();
        export(&settings);
        outputs.push(fs::read(dir.path().join(run)).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn test_missing_input_file() {
    let dir = tempdir().unwrap();
    match MzMLImporter::new(dir.path().join("absent.mzML")).spectra_msms(None) {
        Err(ReaderError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_binary_folder_export_warns_per_scan() {
    let dir = tempdir().unwrap();
    let input = write_mzml(dir.path(), "run.mzML", &three_unannotated_scans());
    let out = dir.path().join("commands");

    let output = run_binary(&[
        &format!("InputFile={}", input.display()),
        &format!("OutputFolder={}", out.display()),
        "MetFragDatabaseType = PubChem",
    ]);
    assert!(output.status.success(), "{:?}", output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("No adduct information provided").count(), 3);

    let first = fs::read_to_string(out.join("command_1.txt")).unwrap();
    assert_eq!(directive(&first, "MetFragDatabaseType"), Some("PubChem"));
}

#[test]
fn test_binary_help_and_errors() {
    for args in [&[][..], &["help"][..], &["-help"][..], &["--help"][..]] {
        let output = run_binary(args);
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("InputFile=..."));
    }

    let output = run_binary(&["InputFile"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error at InputFile"));

    let output = run_binary(&["OutputFile=out.txt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No input file given"));

    let output = run_binary(&["InputFile=run.mzML"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("OutputFolder"));
}

#[test]
fn test_binary_config_file() {
    let dir = tempdir().unwrap();
    let input = write_mzml(dir.path(), "run.mzML", &three_unannotated_scans());
    let out = dir.path().join("commands.txt");
    let config = dir.path().join("metfrag.toml");
    fs::write(
        &config,
        format!(
            "[parameters]\nMetFragDatabaseType = \"PubChem\"\nMaximumTreeDepth = 3\nInputFile = {:?}\n\n[export]\nresults_path = \"/data/results\"\nmaximum_spectrum_limit = 2\n",
            input.display().to_string()
        ),
    )
    .unwrap();

    let output = run_binary(&[
        "--config",
        config.to_str().unwrap(),
        &format!("OutputFile={}", out.display()),
        "MaximumTreeDepth=4",
    ]);
    assert!(output.status.success(), "{:?}", output);

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(directive(lines[0], "MetFragDatabaseType"), Some("PubChem"));
    assert_eq!(directive(lines[0], "MaximumTreeDepth"), Some("4"));
    assert_eq!(directive(lines[0], "ResultsPath"), Some("/data/results"));
}
