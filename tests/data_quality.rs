use std::fs;
use std::path::Path;

use tempfile::TempDir;

use metric_trust::data::{
    file_sha256, load_record_store, validate_schema, GOVERNANCE_COLUMNS, GOVERNANCE_FILE,
    PRICING_COLUMNS, PRICING_FILE, RECEIPT_COLUMNS, RECEIPT_FILE,
};

fn write_csv(path: &Path, header: &[&str], rows: &[&str]) {
    let mut out = String::new();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    fs::write(path, out).unwrap();
}

const GOV_ROW: &str = "SUP001,Supplier B1,Europe,VGS-SUP001-01,2024-01-01,2025-12-31,1000000.00,100000.00,200.00,2025-02-10,2025-02-08,2025-02-12,false,false,Q1";
const VPC_ROW: &str = "SUP001,Supplier B1,Europe,VPC-SUP001-01,1000000.00,150.00,200.00,1000,25.00,Q1";
const SI_ROW: &str = "SUP001,Supplier B1,Europe,SI-SUP001-Q1-001,2025-02-10,2025-02-10,RECEIVED,false,100000.00,Q1";

fn write_store(dir: &Path) {
    write_csv(&dir.join(GOVERNANCE_FILE), &GOVERNANCE_COLUMNS, &[GOV_ROW]);
    write_csv(&dir.join(PRICING_FILE), &PRICING_COLUMNS, &[VPC_ROW]);
    write_csv(&dir.join(RECEIPT_FILE), &RECEIPT_COLUMNS, &[SI_ROW]);
}

#[test]
fn schema_accepts_good_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(GOVERNANCE_FILE);
    write_csv(&path, &GOVERNANCE_COLUMNS, &[GOV_ROW]);
    let report = validate_schema(&path, &GOVERNANCE_COLUMNS).unwrap();
    assert!(report.ok, "{}", report.message);
}

#[test]
fn schema_rejects_bad_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    write_csv(&path, &["supplier_id", "region"], &["SUP001,Europe"]);
    let report = validate_schema(&path, &GOVERNANCE_COLUMNS).unwrap();
    assert!(!report.ok);
}

#[test]
fn load_produces_store_and_manifests() {
    let dir = TempDir::new().unwrap();
    write_store(dir.path());
    let (store, manifests) = load_record_store(dir.path()).unwrap();
    assert_eq!(store.governance.len(), 1);
    assert_eq!(store.pricing.len(), 1);
    assert_eq!(store.receipts.len(), 1);
    assert_eq!(manifests.len(), 3);
    for m in &manifests {
        assert_eq!(m.row_count, 1);
        assert_eq!(m.hash_sha256.len(), 64);
    }
}

#[test]
fn malformed_row_fails_the_whole_load() {
    let dir = TempDir::new().unwrap();
    write_store(dir.path());
    write_csv(
        &dir.path().join(RECEIPT_FILE),
        &RECEIPT_COLUMNS,
        &[SI_ROW, "SUP002,Supplier C2,Asia,SI-SUP002-Q1-001,not-a-date,2025-02-10,RECEIVED,false,100000.00,Q1"],
    );
    let err = load_record_store(dir.path()).unwrap_err();
    assert!(err.to_string().contains("line"), "{}", err);
}

#[test]
fn wrong_header_fails_the_whole_load() {
    let dir = TempDir::new().unwrap();
    write_store(dir.path());
    write_csv(&dir.path().join(PRICING_FILE), &RECEIPT_COLUMNS, &[SI_ROW]);
    assert!(load_record_store(dir.path()).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(load_record_store(dir.path()).is_err());
}

#[test]
fn sha256_changes_with_content() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.csv");
    let b = dir.path().join("b.csv");
    fs::write(&a, "one").unwrap();
    fs::write(&b, "two").unwrap();
    assert_ne!(file_sha256(&a).unwrap(), file_sha256(&b).unwrap());
    assert_eq!(file_sha256(&a).unwrap(), file_sha256(&a).unwrap());
}
