use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::measurement::{ClassifiedMeasurement, Flag};

/// Named physiological group of classified measurements, in reference-table
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Panel {
    pub name: String,
    pub order: u32,
    pub measurements: Vec<ClassifiedMeasurement>,
    pub counts: FlagCounts,
}

impl Panel {
    pub fn new(name: String, order: u32, measurements: Vec<ClassifiedMeasurement>) -> Self {
        let counts = FlagCounts::tally(&measurements);
        Self {
            name,
            order,
            measurements,
            counts,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.measurements.iter().map(|m| m.id())
    }
}

/// Number of measurements per flag within a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FlagCounts {
    pub normal: usize,
    pub low: usize,
    pub high: usize,
    pub risk_low: usize,
    pub risk_high: usize,
    pub unclassifiable: usize,
}

impl FlagCounts {
    pub fn tally(measurements: &[ClassifiedMeasurement]) -> Self {
        let mut counts = Self::default();
        for m in measurements {
            match m.flag {
                Flag::Normal => counts.normal += 1,
                Flag::Low => counts.low += 1,
                Flag::High => counts.high += 1,
                Flag::RiskLow => counts.risk_low += 1,
                Flag::RiskHigh => counts.risk_high += 1,
                Flag::Unclassifiable => counts.unclassifiable += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.normal + self.low + self.high + self.risk_low + self.risk_high + self.unclassifiable
    }
}
