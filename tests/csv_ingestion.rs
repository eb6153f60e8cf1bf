use tabular_insight::ingestion::csv::{ingest_csv_from_bytes, ingest_csv_from_reader, ingest_delimited_from_bytes};
use tabular_insight::types::{CellValue, Schema};

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

#[test]
fn ingest_csv_fixture_happy_path() {
    let bytes = std::fs::read("tests/fixtures/people.csv").unwrap();
    let t = ingest_csv_from_bytes(&bytes, 100).unwrap();

    assert_eq!(t.schema, Schema::new(["id", "name", "score", "active"]));
    assert_eq!(t.row_count(), 2);
    assert_eq!(t.rows[0], vec![text("1"), text("Ada"), text("98.5"), text("true")]);
}

#[test]
fn ingest_tsv_fixture_matches_csv() {
    let csv = ingest_csv_from_bytes(&std::fs::read("tests/fixtures/people.csv").unwrap(), 100).unwrap();
    let tsv = ingest_delimited_from_bytes(&std::fs::read("tests/fixtures/people.tsv").unwrap(), b'\t', 100).unwrap();
    assert_eq!(csv, tsv);
}

#[test]
fn ingest_csv_pads_short_and_truncates_long_rows() {
    let input = "a,b,c\n1,2\n3,4,5,6\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());

    let t = ingest_csv_from_reader(&mut rdr, 100).unwrap();
    assert_eq!(t.rows[0], vec![text("1"), text("2"), CellValue::Null]);
    assert_eq!(t.rows[1], vec![text("3"), text("4"), text("5")]);
}

#[test]
fn ingest_csv_stops_at_row_cap() {
    let t = ingest_csv_from_bytes(b"n\n1\n2\n3\n4\n", 2).unwrap();
    assert_eq!(t.row_count(), 2);
    assert_eq!(t.rows[1], vec![text("2")]);
}

#[test]
fn ingest_csv_blank_cells_are_null_and_headers_are_normalized() {
    let t = ingest_csv_from_bytes(b"x,,x\n  ,b,c\n", 10).unwrap();
    assert_eq!(t.schema, Schema::new(["x", "column_2", "x_2"]));
    assert_eq!(t.rows[0][0], CellValue::Null);
}

#[test]
fn ingest_csv_without_header_yields_empty_table() {
    let t = ingest_csv_from_bytes(b"\n", 10).unwrap();
    assert_eq!(t.column_count(), 0);
    assert_eq!(t.row_count(), 0);
}

#[test]
fn ingest_csv_errors_on_invalid_utf8() {
    let err = ingest_csv_from_bytes(b"a,b\n\xff\xfe,1\n", 10).unwrap_err();
    assert!(err.to_string().contains("csv error"));
}
