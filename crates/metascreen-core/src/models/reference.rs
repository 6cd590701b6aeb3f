use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One row of the reference table: the normal band and panel membership of
/// a single metabolite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReferenceEntry {
    /// Stable identifier, e.g. `glucose`.
    pub id: String,
    pub display_name: String,
    pub unit: String,
    /// Absent for upper-only bands.
    pub lower: Option<f64>,
    /// Absent when the laboratory publishes no upper limit; such entries are
    /// never reported in panels.
    pub upper: Option<f64>,
    pub panel: String,
    /// Display order of the panel among all panels.
    pub panel_order: u32,
    /// Display order of this metabolite inside its panel.
    pub position: u32,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ReferenceEntry {
    pub fn has_upper_bound(&self) -> bool {
        self.upper.is_some()
    }

    /// Width of the normal band. Upper-only bands are measured from zero.
    pub fn band_width(&self) -> Option<f64> {
        let upper = self.upper?;
        Some(upper - self.lower.unwrap_or(0.0))
    }
}
