use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use metascreen_core::models::probability::ModelSummary;
use metascreen_core::models::result::EngineResult;
use metascreen_interpret::{GroupingPolicy, RiskMargin, classify_all, group};
use metascreen_models::{ModelPipeline, score};
use metascreen_reference::ReferenceTable;

use crate::assemble::assemble;
use crate::config::EngineConfig;
use crate::error::EngineError;

/// One file of a batch.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Shared, read-only processing state. Cheap to clone; safe to use from any
/// number of threads at once.
#[derive(Debug, Clone)]
pub struct Engine {
    reference: Arc<ReferenceTable>,
    cardio: Arc<ModelPipeline>,
    oncology: Arc<ModelPipeline>,
    margin: RiskMargin,
    grouping: GroupingPolicy,
}

impl Engine {
    /// Check that both models only use metabolites known to `reference`.
    pub fn new(
        reference: ReferenceTable,
        cardio: ModelPipeline,
        oncology: ModelPipeline,
        margin: RiskMargin,
        grouping: GroupingPolicy,
    ) -> Result<Self, EngineError> {
        cardio.check_features(&reference)?;
        oncology.check_features(&reference)?;
        Ok(Self {
            reference: Arc::new(reference),
            cardio: Arc::new(cardio),
            oncology: Arc::new(oncology),
            margin,
            grouping,
        })
    }

    /// Built-in reference table and demonstration models, default policy.
    pub fn builtin() -> Result<Self, EngineError> {
        Self::from_config(&EngineConfig::default())
    }

    /// Load everything `config` points at. Any failure here is fatal for the
    /// process.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let margin = config.risk_margin()?;
        let reference = match &config.reference_path {
            Some(path) => ReferenceTable::load(path)?,
            None => ReferenceTable::builtin()?,
        };
        let cardio = match &config.cardio_model_path {
            Some(path) => ModelPipeline::load(path)?,
            None => ModelPipeline::builtin_cardio()?,
        };
        let oncology = match &config.oncology_model_path {
            Some(path) => ModelPipeline::load(path)?,
            None => ModelPipeline::builtin_oncology()?,
        };
        let engine = Self::new(reference, cardio, oncology, margin, config.panels.clone())?;
        info!(
            reference = engine.reference.version(),
            entries = engine.reference.len(),
            cardio = engine.cardio.id(),
            oncology = engine.oncology.id(),
            risk_margin = margin.fraction(),
            "engine ready"
        );
        Ok(engine)
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    pub fn risk_margin(&self) -> RiskMargin {
        self.margin
    }

    pub fn cardio(&self) -> &ModelPipeline {
        &self.cardio
    }

    pub fn oncology(&self) -> &ModelPipeline {
        &self.oncology
    }

    pub fn model_summaries(&self) -> Vec<ModelSummary> {
        vec![
            self.cardio.summary().clone(),
            self.oncology.summary().clone(),
        ]
    }

    pub fn process(&self, bytes: &[u8]) -> Result<EngineResult, EngineError> {
        self.process_named(None, bytes)
    }

    /// Run the whole pipeline for one file. Returns either a complete result
    /// or the first fatal error; never a partial result.
    pub fn process_named(
        &self,
        source: Option<&str>,
        bytes: &[u8],
    ) -> Result<EngineResult, EngineError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("process", %request_id, source = source.unwrap_or("-"));
        let _guard = span.enter();
        info!(bytes = bytes.len(), "processing file");

        let outcome = self.run(bytes);
        match &outcome {
            Ok(result) => {
                for d in &result.diagnostics {
                    warn!(kind = ?d.kind, row = ?d.row, "{}", d.message);
                }
                info!(
                    panels = result.panels.len(),
                    measurements = result.panels.iter().map(|p| p.measurements.len()).sum::<usize>(),
                    diagnostics = result.diagnostics.len(),
                    "file processed"
                );
            }
            Err(e) => warn!(kind = e.kind(), error = %e, "file rejected"),
        }
        outcome.map(|r| {
            r.with_request_id(request_id)
                .with_source(source.map(String::from))
        })
    }

    fn run(&self, bytes: &[u8]) -> Result<EngineResult, EngineError> {
        let ingested = metascreen_ingest::ingest(bytes, &self.reference)?;
        let classified = classify_all(ingested.measurements, self.margin);

        let measurements = || classified.iter().map(|c| &c.measurement);
        let cardio_features = self.cardio.feature_vector(measurements());
        let oncology_features = self.oncology.feature_vector(measurements());
        debug!(
            cardio_imputed = cardio_features.imputed().len(),
            oncology_imputed = oncology_features.imputed().len(),
            "feature vectors built"
        );
        let cardio = score(&cardio_features, &self.cardio);
        let oncology = score(&oncology_features, &self.oncology);

        let panels = group(classified, &self.grouping);
        Ok(assemble(ingested.patient, panels, cardio, oncology)?
            .with_diagnostics(ingested.diagnostics))
    }

    /// Process independent files in parallel. Outcomes are in input order
    /// and match processing each file alone.
    pub fn process_batch(&self, uploads: &[Upload]) -> Vec<Result<EngineResult, EngineError>> {
        info!(files = uploads.len(), "processing batch");
        uploads
            .par_iter()
            .map(|upload| self.process_named(Some(&upload.name), &upload.bytes))
            .collect()
    }
}
