/// Outcome of reading a value cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCell {
    Blank,
    /// Laboratory placeholder such as `-`, `n/a` or a censored `<0.1`.
    Placeholder,
    Number(f64),
    /// Non-blank text that is not a finite number.
    Invalid,
}

const PLACEHOLDERS: &[&str] = &[
    "-", "--", "—", "–", "?", "x", "na", "n/a", "nd", "n.d.", "not detected", "н/д", "нд", "н.о.",
];

/// Parse a value cell written with either decimal convention.
///
/// Whitespace (including non-breaking and thin spaces) is ignored. A lone
/// comma is a decimal separator. When both `,` and `.` appear, the right-most
/// one is the decimal separator and the other groups thousands.
pub fn parse_numeric(raw: &str) -> NumericCell {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return NumericCell::Blank;
    }
    let lowered = compact.to_lowercase();
    if PLACEHOLDERS.contains(&lowered.as_str()) || lowered.starts_with(['<', '>']) {
        return NumericCell::Placeholder;
    }

    let canonical = match (compact.rfind(','), compact.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => compact.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => compact.replace(',', ""),
        (Some(_), None) if compact.matches(',').count() == 1 => compact.replace(',', "."),
        (Some(_), None) => compact.replace(',', ""),
        (None, _) => compact,
    };

    match canonical.parse::<f64>() {
        Ok(v) if v.is_finite() => NumericCell::Number(v),
        _ => NumericCell::Invalid,
    }
}
