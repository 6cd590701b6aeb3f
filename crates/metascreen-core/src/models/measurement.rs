use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::reference::ReferenceEntry;

/// A single metabolite row from an ingested file, resolved against the
/// reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetaboliteMeasurement {
    /// Reference identifier the source name resolved to.
    pub id: String,
    /// Name exactly as written in the file.
    pub source_name: String,
    /// 1-based row number in the source sheet.
    pub source_row: usize,
    /// Cell text before numeric parsing.
    pub raw_value: String,
    /// `None` for blank cells and placeholders.
    pub value: Option<f64>,
    pub reference: ReferenceEntry,
}

/// Clinical flag of a measurement against its reference band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Flag {
    Normal,
    Low,
    High,
    /// Inside the band, close to the lower bound.
    RiskLow,
    /// Inside the band, close to the upper bound.
    RiskHigh,
    Unclassifiable,
}

impl Flag {
    /// Hard out-of-range flags.
    pub fn is_out_of_range(self) -> bool {
        matches!(self, Flag::Low | Flag::High)
    }

    pub fn is_risk(self) -> bool {
        matches!(self, Flag::RiskLow | Flag::RiskHigh)
    }
}

/// Why a measurement could not be flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UnclassifiableReason {
    MissingValue,
    MissingUpperBound,
}

/// A measurement together with its flag. Produced once by the range
/// classifier and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClassifiedMeasurement {
    #[serde(flatten)]
    pub measurement: MetaboliteMeasurement,
    pub flag: Flag,
    /// Set only when `flag` is [`Flag::Unclassifiable`].
    pub reason: Option<UnclassifiableReason>,
}

impl ClassifiedMeasurement {
    pub fn id(&self) -> &str {
        &self.measurement.id
    }

    pub fn reference(&self) -> &ReferenceEntry {
        &self.measurement.reference
    }

    pub fn value(&self) -> Option<f64> {
        self.measurement.value
    }
}
