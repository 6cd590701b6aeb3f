use metascreen_core::models::result::EngineResult;
use metascreen_engine::{Engine, Upload};
use uuid::Uuid;

fn uploads() -> Vec<Upload> {
    (0..24)
        .map(|i| {
            if i % 5 == 3 {
                Upload::new(format!("broken-{i}.bin"), vec![0xff, 0xfe, 0x00, i as u8])
            } else {
                let glucose = 3.0 + i as f64 * 0.25;
                let text = format!("Patient,P{i}\nMetabolite,Result\nGlucose,{glucose}\nTMAO,{i}\n");
                Upload::new(format!("patient-{i}.csv"), text)
            }
        })
        .collect()
}

fn comparable(result: EngineResult) -> EngineResult {
    result.with_request_id(Uuid::nil())
}

#[test]
fn batch_outcomes_are_in_input_order() {
    let engine = Engine::builtin().unwrap();
    let uploads = uploads();
    let outcomes = engine.process_batch(&uploads);

    assert_eq!(outcomes.len(), uploads.len());
    for (upload, outcome) in uploads.iter().zip(&outcomes) {
        match outcome {
            Ok(result) => assert_eq!(result.source.as_deref(), Some(upload.name.as_str())),
            Err(e) => {
                assert!(upload.name.starts_with("broken"), "{}: {e}", upload.name);
                assert_eq!(e.kind(), "malformed_file");
            }
        }
    }
    assert_eq!(outcomes.iter().filter(|o| o.is_err()).count(), 5);
}

#[test]
fn batch_matches_processing_each_file_alone() {
    let engine = Engine::builtin().unwrap();
    let uploads = uploads();
    let batch = engine.process_batch(&uploads);

    for (upload, outcome) in uploads.iter().zip(batch) {
        let alone = engine.process_named(Some(&upload.name), &upload.bytes);
        match (outcome, alone) {
            (Ok(a), Ok(b)) => assert_eq!(comparable(a), comparable(b)),
            (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
            (a, b) => panic!("{}: batch {:?} vs alone {:?}", upload.name, a.is_ok(), b.is_ok()),
        }
    }
}

#[test]
fn empty_batch_is_empty() {
    let engine = Engine::builtin().unwrap();
    assert!(engine.process_batch(&[]).is_empty());
}
