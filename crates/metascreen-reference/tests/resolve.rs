use metascreen_reference::ReferenceTable;

fn table() -> ReferenceTable {
    ReferenceTable::builtin().unwrap()
}

#[test]
fn resolves_exact_identifier() {
    assert_eq!(table().resolve("glucose").unwrap().id, "glucose");
}

#[test]
fn resolves_exact_display_name() {
    assert_eq!(
        table().resolve("Free carnitine (C0)").unwrap().id,
        "free_carnitine"
    );
}

#[test]
fn resolves_normalized_names_and_aliases() {
    let table = table();
    assert_eq!(table.resolve("  GLUCOSE ").unwrap().id, "glucose");
    assert_eq!(table.resolve("Глюкоза").unwrap().id, "glucose");
    assert_eq!(table.resolve("c2").unwrap().id, "acetylcarnitine");
    assert_eq!(
        table.resolve("trimethylamine   n-oxide").unwrap().id,
        "tmao"
    );
}

#[test]
fn unknown_name_is_none() {
    assert!(table().resolve("unobtainium").is_none());
    assert!(table().resolve("").is_none());
}

#[test]
fn get_does_not_fall_back_to_display_name() {
    assert!(table().get("Glucose").is_none());
}
