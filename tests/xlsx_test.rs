#![cfg(feature = "xlsx")]

use serde_json::{json, Map, Value};
use tempfile::TempDir;

use dodecahedron::repositories::{Repository, XlsxRepository};
use dodecahedron::wrappers::XlsxFile;

fn record(reference: &str, sku: &str, quantity: i64) -> Map<String, Value> {
    let mut result = Map::new();
    result.insert("reference".to_string(), json!(reference));
    result.insert("sku".to_string(), json!(sku));
    result.insert("quantity".to_string(), json!(quantity));
    result
}

fn columns() -> Vec<String> {
    vec![
        "reference".to_string(),
        "sku".to_string(),
        "quantity".to_string(),
    ]
}

#[test]
fn test_workbook_round_trips_records() {
    let dir = TempDir::new().unwrap();
    let file = XlsxFile::new(dir.path().join("orders.xlsx")).unwrap();

    file.write_records(&columns(), &[record("o-1", "CHAIR", 3)])
        .unwrap();

    assert_eq!(file.headers().unwrap(), columns());
    let rows = file.read_records().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["reference"], json!("o-1"));
    assert_eq!(rows[0]["sku"], json!("CHAIR"));
    // Spreadsheet numbers come back as floats.
    assert_eq!(rows[0]["quantity"].as_f64(), Some(3.0));
}

#[test]
fn test_repository_commit_writes_workbook() {
    let dir = TempDir::new().unwrap();
    let file = XlsxFile::new(dir.path().join("orders.xlsx")).unwrap();

    let mut repository = XlsxRepository::new(file, "reference", columns());
    repository.add(record("o-1", "CHAIR", 3)).unwrap();
    repository.add(record("o-2", "TABLE", 1)).unwrap();
    repository.commit().unwrap();

    let reopened = XlsxFile::new(dir.path().join("orders.xlsx")).unwrap();
    let mut reopened = XlsxRepository::new(reopened, "reference", Vec::new());
    let rows = reopened.list().unwrap();
    assert_eq!(rows.len(), 2);

    let found = reopened.get("o-2").unwrap().expect("row exists");
    assert_eq!(found["sku"], json!("TABLE"));
}

#[test]
fn test_repository_rejects_duplicate_references() {
    let dir = TempDir::new().unwrap();
    let file = XlsxFile::new(dir.path().join("orders.xlsx")).unwrap();

    let mut repository = XlsxRepository::new(file, "reference", columns());
    repository.add(record("o-1", "CHAIR", 3)).unwrap();
    assert!(repository.add(record("o-1", "STOOL", 9)).is_err());
}

#[test]
fn test_rollback_restores_workbook_state() {
    let dir = TempDir::new().unwrap();
    let file = XlsxFile::new(dir.path().join("orders.xlsx")).unwrap();

    let mut repository = XlsxRepository::new(file, "reference", columns());
    repository.add(record("o-1", "CHAIR", 3)).unwrap();
    repository.commit().unwrap();

    repository.add(record("o-2", "TABLE", 1)).unwrap();
    repository.rollback().unwrap();

    assert_eq!(repository.list().unwrap().len(), 1);
}

#[test]
fn test_wrong_extension_is_rejected() {
    assert!(XlsxFile::new("orders.csv").is_err());
}
