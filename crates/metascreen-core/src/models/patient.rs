use jiff::Span;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::normalize::normalize_name;

/// Field names that carry the sample collection date, already normalized.
const DATE_FIELDS: &[&str] = &["sample date", "date", "collection date", "дата", "дата забора"];

/// Spreadsheet serial days are counted from this date.
const SERIAL_EPOCH: (i16, i8, i8) = (1899, 12, 30);

/// Largest serial day a spreadsheet can represent (9999-12-31).
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// One `name: value` pair from the header block of an ingested file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientField {
    pub name: String,
    pub value: String,
}

/// Demographic and administrative fields, in the order they appear in the
/// file. Values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientInfo {
    fields: Vec<PatientField>,
}

impl PatientInfo {
    pub fn new(fields: Vec<PatientField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[PatientField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of the first field whose name matches `name` after
    /// normalization.
    pub fn get(&self, name: &str) -> Option<&str> {
        let wanted = normalize_name(name);
        self.fields
            .iter()
            .find(|f| normalize_name(&f.name) == wanted)
            .map(|f| f.value.as_str())
    }

    /// Best-effort sample date. Accepts ISO dates (optionally followed by a
    /// time), `dd.mm.yyyy`, `dd/mm/yyyy` and spreadsheet serial days.
    pub fn sample_date(&self) -> Option<Date> {
        self.fields
            .iter()
            .filter(|f| DATE_FIELDS.contains(&normalize_name(&f.name).as_str()))
            .find_map(|f| parse_date(&f.value))
    }
}

fn parse_date(raw: &str) -> Option<Date> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(date) = value.get(..10).and_then(|head| head.parse::<Date>().ok()) {
        return Some(date);
    }
    for format in ["%d.%m.%Y", "%d/%m/%Y"] {
        if let Ok(date) = Date::strptime(format, value) {
            return Some(date);
        }
    }
    serial_to_date(value)
}

fn serial_to_date(value: &str) -> Option<Date> {
    let serial: f64 = value.parse().ok()?;
    if !(1.0..=MAX_SERIAL_DAY).contains(&serial) {
        return None;
    }
    let (year, month, day) = SERIAL_EPOCH;
    let epoch = Date::new(year, month, day).ok()?;
    let span = Span::new().try_days(serial.trunc() as i64).ok()?;
    epoch.checked_add(span).ok()
}
