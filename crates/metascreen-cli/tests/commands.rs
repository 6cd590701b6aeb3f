use clap::Parser;
use serde_json::Value;

use metascreen_cli::cli::Cli;
use metascreen_cli::commands::run;

fn exec(args: &[&str]) -> eyre::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("metascreen").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn analyze_reports_each_file_in_argument_order() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.csv");
    let bad = dir.path().join("bad.bin");
    let missing = dir.path().join("missing.csv");
    std::fs::write(&good, "Patient,Y\nMetabolite,Result\nGlucose,5.9\n").unwrap();
    std::fs::write(&bad, [0xffu8, 0x00, 0x13, 0x37]).unwrap();

    let output = exec(&[
        "analyze",
        bad.to_str().unwrap(),
        missing.to_str().unwrap(),
        good.to_str().unwrap(),
    ])
    .unwrap();
    let outcomes: Vec<Value> = serde_json::from_str(&output).unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0]["file"], bad.display().to_string());
    assert_eq!(outcomes[0]["error"]["kind"], "malformed_file");
    assert_eq!(outcomes[1]["error"]["kind"], "io");
    assert_eq!(outcomes[2]["file"], good.display().to_string());

    let result = &outcomes[2]["result"];
    assert_eq!(result["panels"][0]["name"], "Energy metabolism");
    assert_eq!(result["panels"][0]["measurements"][0]["flag"], "risk_high");
    assert_eq!(result["panels"][0]["measurements"][0]["id"], "glucose");
    assert_eq!(result["cardio"]["model"]["id"], "cardio_v1");
}

#[test]
fn analyze_requires_files() {
    assert!(Cli::try_parse_from(["metascreen", "analyze"]).is_err());
}

#[test]
fn reference_prints_tsv() {
    let output = exec(&["reference"]).unwrap();
    let header = output.lines().next().unwrap();
    assert!(header.starts_with("id\tdisplay_name\tunit"), "{header}");
    assert!(output.lines().any(|l| l.starts_with("glucose\t")));
}

#[test]
fn models_prints_both_summaries() {
    let summaries: Vec<Value> = serde_json::from_str(&exec(&["models"]).unwrap()).unwrap();
    let ids: Vec<&str> = summaries.iter().filter_map(|s| s["id"].as_str()).collect();
    assert_eq!(ids, vec!["cardio_v1", "oncology_v1"]);
}

#[test]
fn command_line_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("metascreen.json");
    std::fs::write(
        &config,
        r#"{ "config_version": 2, "risk_margin": 0.05, "panels": { "hide_missing_values": true } }"#,
    )
    .unwrap();
    let written = dir.path().join("out.json");

    let output = exec(&[
        "--config",
        config.to_str().unwrap(),
        "--risk-margin",
        "0.2",
        "config",
        "--write",
        written.to_str().unwrap(),
    ])
    .unwrap();
    let printed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(printed["risk_margin"], 0.2);
    assert_eq!(printed["panels"]["hide_missing_values"], true);

    let saved: Value =
        serde_json::from_str(&std::fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(saved, printed);
}

#[test]
fn invalid_risk_margin_is_refused() {
    assert!(exec(&["--risk-margin", "0.8", "models"]).is_err());
}
