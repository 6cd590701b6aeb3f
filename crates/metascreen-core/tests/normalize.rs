use metascreen_core::normalize::normalize_name;

#[test]
fn trims_and_lowercases() {
    assert_eq!(normalize_name("  Glucose "), "glucose");
}

#[test]
fn collapses_inner_whitespace_including_nbsp() {
    assert_eq!(normalize_name("Uric\u{a0}\u{a0}acid"), "uric acid");
    assert_eq!(normalize_name("Uric \t acid"), "uric acid");
}

#[test]
fn lowercases_cyrillic() {
    assert_eq!(normalize_name("ГЛЮКОЗА"), "глюкоза");
}

#[test]
fn blank_input_is_empty() {
    assert_eq!(normalize_name(" \t "), "");
}
