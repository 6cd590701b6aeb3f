use metascreen_core::models::patient::{PatientField, PatientInfo};
use metascreen_core::models::probability::{ClassProbability, ModelSummary, ProbabilityMap};
use metascreen_engine::assemble;
use metascreen_models::ScoringError;
use pretty_assertions::assert_eq;

fn map(id: &str, entries: &[(&str, f64)]) -> ProbabilityMap {
    ProbabilityMap::new(
        ModelSummary {
            id: id.into(),
            title: id.into(),
            algorithm: "random_forest".into(),
            description: None,
            metrics: vec![],
        },
        entries
            .iter()
            .map(|(label, p)| ClassProbability {
                label: (*label).into(),
                probability: *p,
            })
            .collect(),
    )
}

fn patient() -> PatientInfo {
    PatientInfo::new(vec![PatientField {
        name: "Patient".into(),
        value: "X".into(),
    }])
}

#[test]
fn values_pass_through_unchanged() {
    let cardio = map("cardio", &[("B", 70.0), ("A", 30.0)]);
    let oncology = map("onco", &[("Control", 12.5), ("Lung cancer", 87.5)]);

    let result = assemble(patient(), vec![], Ok(cardio.clone()), Ok(oncology.clone())).unwrap();

    assert_eq!(result.cardio, cardio);
    assert_eq!(result.oncology, oncology);
    assert_eq!(result.patient, patient());
    assert!(result.request_id.is_nil());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn first_scoring_failure_is_propagated() {
    let mismatch = || ScoringError::FeatureMismatch {
        model: "cardio".into(),
        expected: 10,
        actual: 3,
    };

    let err = assemble(patient(), vec![], Err(mismatch()), Ok(map("onco", &[]))).unwrap_err();
    assert_eq!(err.kind(), "feature_mismatch");

    let err = assemble(
        patient(),
        vec![],
        Ok(map("cardio", &[])),
        Err(ScoringError::unavailable("onco", "gone")),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "model_unavailable");

    let err = assemble(
        patient(),
        vec![],
        Err(mismatch()),
        Err(ScoringError::unavailable("onco", "gone")),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "feature_mismatch");
}
