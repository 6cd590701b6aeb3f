use metascreen_core::models::measurement::{
    ClassifiedMeasurement, Flag, MetaboliteMeasurement, UnclassifiableReason,
};
use metascreen_core::models::reference::ReferenceEntry;

use crate::margin::RiskMargin;

/// Flag one measurement against the reference entry it resolved to.
pub fn classify(measurement: MetaboliteMeasurement, margin: RiskMargin) -> ClassifiedMeasurement {
    let (flag, reason) = flag_for(measurement.value, &measurement.reference, margin);
    ClassifiedMeasurement {
        measurement,
        flag,
        reason,
    }
}

pub fn classify_all(
    measurements: Vec<MetaboliteMeasurement>,
    margin: RiskMargin,
) -> Vec<ClassifiedMeasurement> {
    measurements
        .into_iter()
        .map(|m| classify(m, margin))
        .collect()
}

/// The classification rule. First match wins:
///
/// 1. no value: `Unclassifiable`
/// 2. no upper bound: `Unclassifiable`
/// 3. above the upper bound: `High`
/// 4. below the lower bound: `Low`
/// 5. within the margin below the upper bound: `RiskHigh`
/// 6. within the margin above the lower bound: `RiskLow`
/// 7. otherwise `Normal`
///
/// Hard comparisons are strict, so a value sitting on a bound is inside the
/// band. Upper-only bands measure their width from zero and have no low risk
/// zone.
pub fn flag_for(
    value: Option<f64>,
    entry: &ReferenceEntry,
    margin: RiskMargin,
) -> (Flag, Option<UnclassifiableReason>) {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return (
            Flag::Unclassifiable,
            Some(UnclassifiableReason::MissingValue),
        );
    };
    let Some(upper) = entry.upper else {
        return (
            Flag::Unclassifiable,
            Some(UnclassifiableReason::MissingUpperBound),
        );
    };

    if value > upper {
        return (Flag::High, None);
    }
    if let Some(lower) = entry.lower
        && value < lower
    {
        return (Flag::Low, None);
    }

    let zone = margin.fraction() * entry.band_width().unwrap_or(0.0);
    if zone > 0.0 {
        if value >= upper - zone {
            return (Flag::RiskHigh, None);
        }
        if let Some(lower) = entry.lower
            && value <= lower + zone
        {
            return (Flag::RiskLow, None);
        }
    }
    (Flag::Normal, None)
}
