use std::io::Write;

use metascreen_engine::config::CURRENT_VERSION;
use metascreen_engine::{ConfigError, Engine, EngineConfig};
use metascreen_interpret::{PanelPolicy, RiskMargin};
use pretty_assertions::assert_eq;

#[test]
fn empty_object_takes_defaults() {
    let config = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(config.config_version, CURRENT_VERSION);
    assert_eq!(config.risk_margin().unwrap(), RiskMargin::DEFAULT);
    assert_eq!(config.reference_path, None);
    assert!(!config.panels.hide_missing_values);
}

#[test]
fn pre_versioned_config_migrates_forward() {
    let config = EngineConfig::from_json_str(
        r#"{ "hide_missing_values": true, "risk_margin_percent": 20 }"#,
    )
    .unwrap();
    assert_eq!(config.config_version, CURRENT_VERSION);
    assert!(config.panels.hide_missing_values);
    assert_eq!(config.risk_margin, 0.2);
}

#[test]
fn version_one_keeps_explicit_fraction() {
    let config = EngineConfig::from_json_str(
        r#"{ "config_version": 1, "risk_margin": 0.05, "risk_margin_percent": 30,
             "panels": { "overrides": { "Amino acids": { "hide_missing_values": true } } } }"#,
    )
    .unwrap();
    assert_eq!(config.risk_margin, 0.05);
    assert_eq!(
        config.panels.for_panel("amino acids"),
        PanelPolicy {
            hide_missing_values: true
        }
    );
}

#[test]
fn newer_version_is_rejected() {
    let err = EngineConfig::from_json_str(r#"{ "config_version": 99 }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnsupportedVersion {
            found: 99,
            supported: CURRENT_VERSION
        }
    ));
}

#[test]
fn non_integer_version_is_rejected() {
    for raw in [r#""3""#, "2.0", "-1", "null", "4294967297"] {
        let err = EngineConfig::from_json_str(&format!(r#"{{ "config_version": {raw} }}"#))
            .unwrap_err();
        assert!(
            matches!(&err, ConfigError::InvalidVersion(found) if found == raw),
            "{raw}: {err}"
        );
    }
}

#[test]
fn invalid_documents_are_rejected() {
    assert!(matches!(
        EngineConfig::from_json_str("[1, 2]").unwrap_err(),
        ConfigError::NotAnObject
    ));
    assert!(matches!(
        EngineConfig::from_json_str("{ broken").unwrap_err(),
        ConfigError::Json(_)
    ));
    assert!(matches!(
        EngineConfig::from_json_str(r#"{ "config_version": 2, "risk_margin": 0.9 }"#).unwrap_err(),
        ConfigError::RiskMargin(_)
    ));
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("metascreen.json");
    let config = EngineConfig {
        config_version: 0,
        risk_margin: 0.15,
        reference_path: Some(dir.path().join("reference.tsv")),
        ..EngineConfig::default()
    };
    config.save(&path).unwrap();

    let loaded = EngineConfig::load(&path).unwrap();
    assert_eq!(loaded.config_version, CURRENT_VERSION);
    assert_eq!(loaded.risk_margin, 0.15);
    assert_eq!(loaded.reference_path, config.reference_path);
    assert!(!dir.path().join("nested").join("metascreen.json.tmp").exists());
}

#[test]
fn missing_config_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn engine_loads_files_named_by_config() {
    let dir = tempfile::tempdir().unwrap();
    let reference = dir.path().join("lab_2024.tsv");
    std::fs::write(
        &reference,
        Engine::builtin().unwrap().reference().to_tsv().unwrap(),
    )
    .unwrap();

    let mut model = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
    let artifact = serde_json::to_string(Engine::builtin().unwrap().oncology().artifact()).unwrap();
    model.write_all(artifact.as_bytes()).unwrap();

    let config = EngineConfig {
        reference_path: Some(reference),
        oncology_model_path: Some(model.path().to_path_buf()),
        ..EngineConfig::default()
    };
    let engine = Engine::from_config(&config).unwrap();
    assert_eq!(engine.reference().version(), "lab_2024");
    assert_eq!(engine.oncology().id(), "oncology_v1");
}

#[test]
fn unusable_startup_files_are_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let config = EngineConfig {
        reference_path: Some(dir.path().join("missing.tsv")),
        ..EngineConfig::default()
    };
    assert_eq!(Engine::from_config(&config).unwrap_err().kind(), "reference_table");

    let config = EngineConfig {
        cardio_model_path: Some(dir.path().join("missing.json")),
        ..EngineConfig::default()
    };
    assert_eq!(Engine::from_config(&config).unwrap_err().kind(), "model_unavailable");

    let config = EngineConfig {
        risk_margin: 2.0,
        ..EngineConfig::default()
    };
    assert_eq!(Engine::from_config(&config).unwrap_err().kind(), "config");
}
