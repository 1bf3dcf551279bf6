//! Annotation exchange: files and `fir.toml` feeding the wiring pass.

use fir_config::{load_annotations, load_config, parse_annotations_json};
use fir_conformance::wire;
use fir_ir::{Annotation, Target};

const CIRCUIT: &str = "\
circuit Top :
  module Top :
    input clock : Clock

    inst leaf of Leaf
  module Leaf :
    skip
";

#[test]
fn json_file_drives_wiring() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pins.json");
    std::fs::write(
        &path,
        r#"[
  {"kind": "source", "target": "Top>clock", "pin": "clk"},
  {"kind": "sink", "target": "Leaf", "pin": "clk"}
]"#,
    )
    .unwrap();
    let annotations = load_annotations(&path).unwrap();
    let out = wire(CIRCUIT, annotations).unwrap();
    assert!(out.circuit.module("Leaf").unwrap().port("clk").is_some());
    assert!(out.circuit.to_string().contains("leaf.clk <= clock"));
}

#[test]
fn config_directives_drive_wiring() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("fir.toml"),
        r#"
[project]
name = "leafy"
version = "0.1.0"
input = "Top.fir"

[[wiring.sources]]
target = "Top>clock"
pin = "clk"

[[wiring.sinks]]
target = "Leaf"
pin = "clk"
"#,
    )
    .unwrap();
    let config = load_config(dir.path()).unwrap();
    let out = wire(CIRCUIT, config.wiring.annotations()).unwrap();
    assert!(out.circuit.module("Leaf").unwrap().port("clk").is_some());
}

#[test]
fn annotations_serialize_back_to_the_same_records() {
    let annotations = vec![
        Annotation::source("Top>clock".parse().unwrap(), "clk"),
        Annotation::sink(Target::Module("Leaf".into()), "clk"),
    ];
    let json = serde_json::to_string(&annotations).unwrap();
    assert!(json.contains(r#""kind":"source""#));
    assert!(json.contains(r#""target":"Top>clock""#));
    assert_eq!(parse_annotations_json(&json).unwrap(), annotations);
}

#[test]
fn malformed_records_are_rejected() {
    assert!(parse_annotations_json(r#"[{"kind": "source", "target": "Top", "pin": "p"}]"#).is_err());
    assert!(parse_annotations_json(r#"[{"kind": "probe", "target": "Top", "pin": "p"}]"#).is_err());
    assert!(parse_annotations_json(r#"{"kind": "sink"}"#).is_err());
}
