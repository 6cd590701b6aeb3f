use std::io::{Cursor, Write};

use metascreen_ingest::sheet::MAX_PART_BYTES;
use metascreen_ingest::{IngestError, ingest};
use metascreen_reference::ReferenceTable;
use pretty_assertions::assert_eq;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

fn workbook(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

const SHARED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<si><t>Patient</t></si>
<si><t>Petrov B.</t></si>
<si><t>Metabolite</t></si>
<si><t>Result</t></si>
<si><t>Unit</t></si>
<si><t>Glucose</t></si>
<si><t>mmol/L</t></si>
<si><r><t>Homo</t></r><r><t>cysteine</t></r></si>
</sst>"#;

const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2" t="inlineStr"><is><t>Sample date</t></is></c><c r="B2"><v>44828</v></c></row>
<row r="4"><c r="A4" t="s"><v>2</v></c><c r="B4" t="s"><v>3</v></c><c r="C4" t="s"><v>4</v></c></row>
<row r="5"><c r="A5" t="s"><v>5</v></c><c r="B5"><v>5.9</v></c><c r="C5" t="s"><v>6</v></c></row>
<row r="6"><c r="A6" t="s"><v>7</v></c><c r="B6" t="inlineStr"><is><t>12,5</t></is></c><c r="C6" t="inlineStr"><is><t>µmol/L</t></is></c></row>
<row r="7"><c r="A7" t="inlineStr"><is><t>Lactate</t></is></c><c r="B7" t="e"><v>#N/A</v></c></row>
</sheetData>
</worksheet>"#;

#[test]
fn reads_conventional_first_sheet() {
    let bytes = workbook(&[
        ("xl/sharedStrings.xml", SHARED),
        ("xl/worksheets/sheet1.xml", SHEET),
    ]);
    let out = ingest(&bytes, &ReferenceTable::builtin().unwrap()).unwrap();

    assert_eq!(out.patient.get("Patient"), Some("Petrov B."));
    assert_eq!(
        out.patient.sample_date(),
        Some(jiff::civil::date(2022, 9, 24))
    );

    let rows: Vec<(&str, usize, Option<f64>)> = out
        .measurements
        .iter()
        .map(|m| (m.id.as_str(), m.source_row, m.value))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("glucose", 5, Some(5.9)),
            ("homocysteine", 6, Some(12.5)),
            ("lactate", 7, None),
        ]
    );
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
}

#[test]
fn follows_workbook_relationships_to_the_first_sheet() {
    let workbook_xml = r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Results" sheetId="1" r:id="rId7"/><sheet name="Other" sheetId="2" r:id="rId8"/></sheets>
</workbook>"#;
    let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId8" Type="worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId7" Type="worksheet" Target="worksheets/results.xml"/>
</Relationships>"#;
    let other = r#"<worksheet><sheetData><row r="1"><c t="inlineStr"><is><t>nothing here</t></is></c></row></sheetData></worksheet>"#;
    let bytes = workbook(&[
        ("xl/workbook.xml", workbook_xml),
        ("xl/_rels/workbook.xml.rels", rels),
        ("xl/sharedStrings.xml", SHARED),
        ("xl/worksheets/sheet1.xml", other),
        ("xl/worksheets/results.xml", SHEET),
    ]);
    let out = ingest(&bytes, &ReferenceTable::builtin().unwrap()).unwrap();

    assert_eq!(out.measurements.len(), 3);
    assert_eq!(out.measurements[0].id, "glucose");
}

#[test]
fn workbook_without_worksheet_is_malformed() {
    let bytes = workbook(&[("xl/sharedStrings.xml", SHARED)]);
    let err = ingest(&bytes, &ReferenceTable::builtin().unwrap()).unwrap_err();
    assert!(err.to_string().starts_with("malformed file"), "{err}");
}

#[test]
fn oversized_worksheet_part_is_malformed() {
    let mut sheet = String::from("<worksheet><sheetData>");
    sheet.push_str(&" ".repeat(MAX_PART_BYTES as usize));
    sheet.push_str("</sheetData></worksheet>");

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file("xl/worksheets/sheet1.xml", options).unwrap();
    writer.write_all(sheet.as_bytes()).unwrap();
    let bytes = writer.finish().unwrap().into_inner();
    assert!(bytes.len() < 1024 * 1024);

    let err = ingest(&bytes, &ReferenceTable::builtin().unwrap()).unwrap_err();
    assert!(matches!(err, IngestError::MalformedFile(_)), "{err}");
}
