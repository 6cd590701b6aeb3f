use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use metascreen_core::models::measurement::{ClassifiedMeasurement, UnclassifiableReason};
use metascreen_core::models::panel::Panel;
use metascreen_core::normalize::normalize_name;

/// Display policy of a single panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelPolicy {
    /// Drop measurements that had no value instead of listing them as
    /// unclassifiable.
    #[serde(default)]
    pub hide_missing_values: bool,
}

/// Global panel policy plus per-panel overrides keyed by panel name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupingPolicy {
    #[serde(default)]
    pub hide_missing_values: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, PanelPolicy>,
}

impl GroupingPolicy {
    pub fn for_panel(&self, panel: &str) -> PanelPolicy {
        let key = normalize_name(panel);
        self.overrides
            .iter()
            .find(|(name, _)| normalize_name(name) == key)
            .map(|(_, policy)| *policy)
            .unwrap_or(PanelPolicy {
                hide_missing_values: self.hide_missing_values,
            })
    }
}

/// Group classified measurements into panels.
///
/// Panels come out in reference panel order and measurements in intra-panel
/// order, ties broken by identifier. Entries without an upper bound are
/// dropped, as are missing values when the panel policy hides them. Empty
/// panels are omitted.
pub fn group(classified: Vec<ClassifiedMeasurement>, policy: &GroupingPolicy) -> Vec<Panel> {
    let mut buckets: BTreeMap<(u32, String), Vec<ClassifiedMeasurement>> = BTreeMap::new();
    let mut policies: HashMap<String, PanelPolicy> = HashMap::new();

    for m in classified {
        let panel = m.reference().panel.clone();
        if !m.reference().has_upper_bound() {
            debug!(id = m.id(), panel = %panel, "dropped: reference has no upper bound");
            continue;
        }
        let panel_policy = *policies
            .entry(panel.clone())
            .or_insert_with(|| policy.for_panel(&panel));
        if panel_policy.hide_missing_values
            && m.reason == Some(UnclassifiableReason::MissingValue)
        {
            debug!(id = m.id(), panel = %panel, "dropped: missing value hidden by panel policy");
            continue;
        }
        buckets
            .entry((m.reference().panel_order, panel))
            .or_default()
            .push(m);
    }

    buckets
        .into_iter()
        .map(|((order, name), mut measurements)| {
            measurements.sort_by(|a, b| {
                a.reference()
                    .position
                    .cmp(&b.reference().position)
                    .then_with(|| a.id().cmp(b.id()))
            });
            Panel::new(name, order, measurements)
        })
        .collect()
}
