//! File-set configuration tests.

use std::io::Write as _;
use std::path::PathBuf;

use quadsim_core::FileSet;
use quadsim_core::common::SimError;
use tempfile::NamedTempFile;

fn args(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| (*p).to_owned()).collect()
}

#[test]
fn no_arguments_selects_conventional_names() {
    let set = FileSet::from_args(&[]).expect("defaults");
    assert_eq!(set, FileSet::default());
    assert_eq!(set.imem[3], PathBuf::from("imem3.txt"));
    assert_eq!(set.core_trace[0], PathBuf::from("core0trace.txt"));
    assert_eq!(set.bus_trace, PathBuf::from("bustrace.txt"));
}

#[test]
fn five_arguments_name_the_inputs_only() {
    let set = FileSet::from_args(&args(&["a0", "a1", "a2", "a3", "mem"])).expect("inputs");
    assert_eq!(set.imem[0], PathBuf::from("a0"));
    assert_eq!(set.imem[3], PathBuf::from("a3"));
    assert_eq!(set.memin, PathBuf::from("mem"));
    assert_eq!(set.memout, FileSet::default().memout);
}

#[test]
fn twenty_seven_arguments_name_everything() {
    let names: Vec<String> = (0..27).map(|i| format!("f{i}")).collect();
    let set = FileSet::from_args(&names).expect("full set");
    assert_eq!(set.imem[0], PathBuf::from("f0"));
    assert_eq!(set.memin, PathBuf::from("f4"));
    assert_eq!(set.memout, PathBuf::from("f5"));
    assert_eq!(set.regout[0], PathBuf::from("f6"));
    assert_eq!(set.core_trace[0], PathBuf::from("f10"));
    assert_eq!(set.bus_trace, PathBuf::from("f14"));
    assert_eq!(set.dsram[0], PathBuf::from("f15"));
    assert_eq!(set.tsram[0], PathBuf::from("f19"));
    assert_eq!(set.stats[3], PathBuf::from("f26"));
}

#[test]
fn other_argument_counts_are_rejected() {
    let err = FileSet::from_args(&args(&["a", "b"])).unwrap_err();
    assert!(matches!(err, SimError::InvalidArgs(2)), "got {err}");
}

#[test]
fn json_file_set_overrides_selected_paths() {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(br#"{"memin": "custom/mem.txt", "bus_trace": "bt.txt"}"#)
        .expect("write json");

    let set = FileSet::from_json_file(file.path()).expect("json");
    assert_eq!(set.memin, PathBuf::from("custom/mem.txt"));
    assert_eq!(set.bus_trace, PathBuf::from("bt.txt"));
    assert_eq!(set.imem, FileSet::default().imem);
}

#[test]
fn unknown_json_keys_are_rejected() {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(br#"{"memfile": "x"}"#).expect("write json");
    let err = FileSet::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, SimError::Config(_)), "got {err}");
}
