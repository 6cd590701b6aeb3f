use metascreen_core::models::measurement::{
    ClassifiedMeasurement, Flag, MetaboliteMeasurement, UnclassifiableReason,
};
use metascreen_core::models::panel::{FlagCounts, Panel};
use metascreen_core::models::reference::ReferenceEntry;
use pretty_assertions::assert_eq;

fn entry(id: &str, lower: Option<f64>, upper: Option<f64>) -> ReferenceEntry {
    ReferenceEntry {
        id: id.to_string(),
        display_name: id.to_string(),
        unit: "µmol/L".to_string(),
        lower,
        upper,
        panel: "Amino acids".to_string(),
        panel_order: 1,
        position: 1,
        aliases: vec![],
    }
}

fn classified(id: &str, flag: Flag) -> ClassifiedMeasurement {
    ClassifiedMeasurement {
        measurement: MetaboliteMeasurement {
            id: id.to_string(),
            source_name: id.to_string(),
            source_row: 1,
            raw_value: String::new(),
            value: None,
            reference: entry(id, Some(1.0), Some(2.0)),
        },
        flag,
        reason: (flag == Flag::Unclassifiable).then_some(UnclassifiableReason::MissingValue),
    }
}

#[test]
fn band_width_measures_upper_only_bands_from_zero() {
    assert_eq!(entry("a", Some(3.9), Some(6.1)).band_width().map(|w| (w * 10.0).round()), Some(22.0));
    assert_eq!(entry("b", None, Some(5.0)).band_width(), Some(5.0));
    assert_eq!(entry("c", Some(1.0), None).band_width(), None);
}

#[test]
fn panel_counts_every_flag() {
    let panel = Panel::new(
        "Amino acids".to_string(),
        1,
        vec![
            classified("a", Flag::Normal),
            classified("b", Flag::High),
            classified("c", Flag::High),
            classified("d", Flag::RiskLow),
            classified("e", Flag::Unclassifiable),
        ],
    );
    assert_eq!(
        panel.counts,
        FlagCounts {
            normal: 1,
            low: 0,
            high: 2,
            risk_low: 1,
            risk_high: 0,
            unclassifiable: 1,
        }
    );
    assert_eq!(panel.counts.total(), 5);
    assert_eq!(panel.ids().collect::<Vec<_>>(), ["a", "b", "c", "d", "e"]);
}

#[test]
fn flag_predicates() {
    assert!(Flag::High.is_out_of_range());
    assert!(!Flag::RiskHigh.is_out_of_range());
    assert!(Flag::RiskLow.is_risk());
    assert!(!Flag::Normal.is_risk());
}
