use metascreen_core::normalize::normalize_name;

/// Spellings of the same unit found in laboratory exports, keyed by the
/// canonical form.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("µmol/l", &["umol/l", "μmol/l", "мкмоль/л", "мкм/л"]),
    ("mmol/l", &["ммоль/л", "mm/l"]),
    ("nmol/l", &["нмоль/л"]),
    ("mg/dl", &["мг/дл"]),
];

/// Whether two unit labels denote the same unit.
pub fn same_unit(a: &str, b: &str) -> bool {
    canonical_unit(a) == canonical_unit(b)
}

fn canonical_unit(unit: &str) -> String {
    let compact: String = normalize_name(unit).chars().filter(|c| *c != ' ').collect();
    for (canonical, spellings) in SYNONYMS {
        if compact == *canonical || spellings.contains(&compact.as_str()) {
            return canonical.to_string();
        }
    }
    compact
}
