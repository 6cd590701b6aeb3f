/// Canonical form of a metabolite or column name for lookup.
///
/// Trims, lowercases and collapses every run of whitespace (including
/// non-breaking spaces) into a single ASCII space. This is the only
/// normalizer in the system; the reference table and the ingestion layer
/// both key on its output.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}
