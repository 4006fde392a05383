//! CSV loading for the three source system exports.
//!
//! Loading is the only I/O in the system and the only place malformed
//! input is allowed to fail: every row must parse completely before the
//! calculators see the store, so computation never has to defend against
//! missing fields. Each loaded table gets a manifest with a SHA-256
//! content hash for audit trails.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::logging::{json_log, obj, v_num, v_str, Domain};
use crate::store::{
    GovernanceRecord, PricingRecord, Quarter, ReceiptRecord, ReceiptStatus, RecordStore,
};

pub const GOVERNANCE_COLUMNS: [&str; 15] = [
    "supplier_id",
    "supplier_name",
    "region",
    "contract_id",
    "contract_start",
    "contract_end",
    "original_value",
    "amendment_value",
    "prior_contract_price",
    "delivery_date",
    "agreed_window_start",
    "agreed_window_end",
    "is_partial_delivery",
    "force_majeure_flag",
    "quarter",
];

pub const PRICING_COLUMNS: [&str; 10] = [
    "supplier_id",
    "supplier_name",
    "region",
    "contract_id",
    "original_contract_value",
    "unit_price",
    "list_price",
    "volume",
    "negotiated_discount_pct",
    "quarter",
];

pub const RECEIPT_COLUMNS: [&str; 10] = [
    "supplier_id",
    "supplier_name",
    "region",
    "delivery_id",
    "scheduled_date",
    "actual_receipt_date",
    "status",
    "is_partial",
    "committed_spend",
    "quarter",
];

pub const GOVERNANCE_FILE: &str = "system_vgs.csv";
pub const PRICING_FILE: &str = "system_vpc.csv";
pub const RECEIPT_FILE: &str = "system_si.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaReport {
    pub columns: Vec<String>,
    pub expected: Vec<String>,
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableManifest {
    pub path: String,
    pub hash_sha256: String,
    pub row_count: u64,
    pub generated_at_epoch: u64,
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").with_context(|| format!("bad date: {}", s))
}

fn parse_f64(s: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .with_context(|| format!("bad number: {}", s))
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.trim() {
        "true" | "True" => Ok(true),
        "false" | "False" => Ok(false),
        other => Err(anyhow!("bad bool: {}", other)),
    }
}

fn parse_optional_f64(s: &str) -> Result<Option<f64>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_f64(trimmed).map(Some)
}

fn split_row(line: &str, expected: usize) -> Result<Vec<&str>> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != expected {
        return Err(anyhow!(
            "expected {} columns, got {}",
            expected,
            parts.len()
        ));
    }
    Ok(parts)
}

pub fn parse_governance_row(line: &str) -> Result<GovernanceRecord> {
    let p = split_row(line, GOVERNANCE_COLUMNS.len())?;
    Ok(GovernanceRecord {
        supplier_id: p[0].trim().to_string(),
        supplier_name: p[1].trim().to_string(),
        region: p[2].trim().to_string(),
        contract_id: p[3].trim().to_string(),
        contract_start: parse_date(p[4])?,
        contract_end: parse_date(p[5])?,
        original_value: parse_f64(p[6])?,
        amendment_value: parse_f64(p[7])?,
        prior_contract_price: parse_optional_f64(p[8])?,
        delivery_date: parse_date(p[9])?,
        agreed_window_start: parse_date(p[10])?,
        agreed_window_end: parse_date(p[11])?,
        is_partial_delivery: parse_bool(p[12])?,
        force_majeure_flag: parse_bool(p[13])?,
        quarter: Quarter::parse(p[14]).map_err(|e| anyhow!(e))?,
    })
}

pub fn parse_pricing_row(line: &str) -> Result<PricingRecord> {
    let p = split_row(line, PRICING_COLUMNS.len())?;
    Ok(PricingRecord {
        supplier_id: p[0].trim().to_string(),
        supplier_name: p[1].trim().to_string(),
        region: p[2].trim().to_string(),
        contract_id: p[3].trim().to_string(),
        original_contract_value: parse_f64(p[4])?,
        unit_price: parse_f64(p[5])?,
        list_price: parse_f64(p[6])?,
        volume: parse_f64(p[7])?,
        negotiated_discount_pct: parse_f64(p[8])?,
        quarter: Quarter::parse(p[9]).map_err(|e| anyhow!(e))?,
    })
}

pub fn parse_receipt_row(line: &str) -> Result<ReceiptRecord> {
    let p = split_row(line, RECEIPT_COLUMNS.len())?;
    Ok(ReceiptRecord {
        supplier_id: p[0].trim().to_string(),
        supplier_name: p[1].trim().to_string(),
        region: p[2].trim().to_string(),
        delivery_id: p[3].trim().to_string(),
        scheduled_date: parse_date(p[4])?,
        actual_receipt_date: parse_date(p[5])?,
        status: ReceiptStatus::parse(p[6]).map_err(|e| anyhow!(e))?,
        is_partial: parse_bool(p[7])?,
        committed_spend: parse_f64(p[8])?,
        quarter: Quarter::parse(p[9]).map_err(|e| anyhow!(e))?,
    })
}

/// Check a CSV header against the expected column list for its table.
pub fn validate_schema(path: &Path, expected: &[&str]) -> Result<SchemaReport> {
    let header = read_header(path)?;
    let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    let ok = header == expected;
    let message = if ok {
        "schema ok".to_string()
    } else {
        format!("schema mismatch: got {:?} expected {:?}", header, expected)
    };
    Ok(SchemaReport {
        columns: header,
        expected,
        ok,
        message,
    })
}

pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let reader = BufReader::new(file);
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Ok(trimmed.split(',').map(|s| s.trim().to_string()).collect());
    }
    Ok(Vec::new())
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

fn load_table<T>(
    path: &Path,
    expected: &[&str],
    parse: impl Fn(&str) -> Result<T>,
) -> Result<(Vec<T>, TableManifest)> {
    let schema = validate_schema(path, expected)?;
    if !schema.ok {
        return Err(anyhow!("{}: {}", path.display(), schema.message));
    }

    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut rows = Vec::new();
    let mut first_content_line = true;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if first_content_line {
            // header
            first_content_line = false;
            continue;
        }
        let row = parse(trimmed)
            .with_context(|| format!("{} line {}", path.display(), line_no + 1))?;
        rows.push(row);
    }

    let manifest = TableManifest {
        path: path.display().to_string(),
        hash_sha256: file_sha256(path)?,
        row_count: rows.len() as u64,
        generated_at_epoch: chrono::Utc::now().timestamp() as u64,
    };
    Ok((rows, manifest))
}

/// Load all three exports from a directory. Any malformed row is a fatal
/// load error; the store is complete and well-typed or it does not exist.
pub fn load_record_store(dir: &Path) -> Result<(RecordStore, Vec<TableManifest>)> {
    let (governance, gov_manifest) = load_table(
        &dir.join(GOVERNANCE_FILE),
        &GOVERNANCE_COLUMNS,
        parse_governance_row,
    )?;
    let (pricing, vpc_manifest) =
        load_table(&dir.join(PRICING_FILE), &PRICING_COLUMNS, parse_pricing_row)?;
    let (receipts, si_manifest) =
        load_table(&dir.join(RECEIPT_FILE), &RECEIPT_COLUMNS, parse_receipt_row)?;

    for m in [&gov_manifest, &vpc_manifest, &si_manifest] {
        json_log(
            Domain::Data,
            "table_loaded",
            obj(&[
                ("path", v_str(&m.path)),
                ("rows", v_num(m.row_count as f64)),
                ("sha256", v_str(&m.hash_sha256)),
            ]),
        );
    }

    Ok((
        RecordStore {
            governance,
            pricing,
            receipts,
        },
        vec![gov_manifest, vpc_manifest, si_manifest],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn governance_row_parses() {
        let line = "SUP001,Supplier B1,Europe,VGS-SUP001-01,2024-01-01,2025-12-31,1000000.00,100000.00,200.00,2025-02-10,2025-02-08,2025-02-12,false,false,Q1";
        let r = parse_governance_row(line).unwrap();
        assert_eq!(r.supplier_id, "SUP001");
        assert_eq!(r.prior_contract_price, Some(200.0));
        assert!(!r.is_partial_delivery);
        assert_eq!(r.quarter, Quarter::Q1);
    }

    #[test]
    fn empty_prior_price_is_none() {
        let line = "SUP001,Supplier B1,Europe,VGS-SUP001-01,2024-01-01,2025-12-31,1000000.00,100000.00,,2025-02-10,2025-02-08,2025-02-12,True,False,Q2";
        let r = parse_governance_row(line).unwrap();
        assert_eq!(r.prior_contract_price, None);
        assert!(r.is_partial_delivery);
    }

    #[test]
    fn receipt_row_parses_status() {
        let line = "SUP001,Supplier B1,Asia,SI-SUP001-Q1-001,2025-02-10,2025-02-11,LATE,false,100000.00,Q1";
        let r = parse_receipt_row(line).unwrap();
        assert_eq!(r.status, ReceiptStatus::Late);
    }

    #[test]
    fn short_row_is_rejected() {
        assert!(parse_pricing_row("SUP001,Supplier B1,Europe").is_err());
    }
}
