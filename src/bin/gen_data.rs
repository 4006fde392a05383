//! Generate synthetic exports for the three source systems, with the
//! deliberate discrepancies that make reconciliation interesting
//! (partial-friendly SI+ statuses, list-price VPC baselines, amendment
//! values only VGS knows about). Deterministic for a fixed GEN_SEED.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use metric_trust::data::{GOVERNANCE_FILE, PRICING_FILE, RECEIPT_FILE};
use metric_trust::logging::{json_log, obj, v_num, v_str, Domain};
use metric_trust::store::Quarter;

const REGIONS: [&str; 4] = ["Europe", "Asia", "Americas", "Other"];

fn quarter_bounds(q: Quarter) -> (NaiveDate, NaiveDate) {
    let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).expect("valid date");
    match q {
        Quarter::Q1 => (d(1, 1), d(3, 31)),
        Quarter::Q2 => (d(4, 1), d(6, 30)),
        Quarter::Q3 => (d(7, 1), d(9, 30)),
        Quarter::Q4 => (d(10, 1), d(12, 31)),
    }
}

struct Supplier {
    id: String,
    name: String,
    region: &'static str,
}

fn suppliers() -> Vec<Supplier> {
    (1..=20)
        .map(|i| Supplier {
            id: format!("SUP{:03}", i),
            name: format!("Supplier {}{}", (b'A' + (i % 26) as u8) as char, i),
            region: REGIONS[i % 4],
        })
        .collect()
}

fn date_in(rng: &mut StdRng, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days();
    start + Duration::days(rng.gen_range(0..=span))
}

fn generate_vgs(rng: &mut StdRng) -> String {
    let mut out = String::from(
        "supplier_id,supplier_name,region,contract_id,contract_start,contract_end,original_value,amendment_value,prior_contract_price,delivery_date,agreed_window_start,agreed_window_end,is_partial_delivery,force_majeure_flag,quarter\n",
    );
    for s in suppliers() {
        let num_contracts = rng.gen_range(1..=3);
        for c in 0..num_contracts {
            let contract_id = format!("VGS-{}-{:02}", s.id, c + 1);
            let contract_start = NaiveDate::from_ymd_opt(
                2024,
                rng.gen_range(1..=12),
                rng.gen_range(1..=28),
            )
            .expect("valid date");
            let contract_end =
                NaiveDate::from_ymd_opt(2025, rng.gen_range(7..=12), rng.gen_range(1..=28))
                    .expect("valid date");
            let original_value: f64 = rng.gen_range(500_000.0..5_000_000.0);
            let amendment_value: f64 = rng.gen_range(0.0..original_value * 0.3);
            let prior_price: f64 = rng.gen_range(100.0..500.0);

            for q in Quarter::ALL {
                let (q_start, q_end) = quarter_bounds(q);
                for _ in 0..rng.gen_range(2..=8) {
                    let delivery = date_in(rng, q_start, q_end);
                    let window_start = delivery - Duration::days(rng.gen_range(0..=5));
                    let window_end = delivery + Duration::days(rng.gen_range(0..=3));
                    let is_partial = rng.gen_bool(0.15);
                    let force_majeure = rng.gen_bool(0.05);
                    writeln!(
                        out,
                        "{},{},{},{},{},{},{:.2},{:.2},{:.2},{},{},{},{},{},{}",
                        s.id,
                        s.name,
                        s.region,
                        contract_id,
                        contract_start,
                        contract_end,
                        original_value,
                        amendment_value,
                        prior_price,
                        delivery,
                        window_start,
                        window_end,
                        is_partial,
                        force_majeure,
                        q.as_str(),
                    )
                    .expect("write to string");
                }
            }
        }
    }
    out
}

fn generate_vpc(rng: &mut StdRng) -> String {
    let mut out = String::from(
        "supplier_id,supplier_name,region,contract_id,original_contract_value,unit_price,list_price,volume,negotiated_discount_pct,quarter\n",
    );
    for s in suppliers() {
        let num_contracts = rng.gen_range(1..=2);
        for c in 0..num_contracts {
            let contract_id = format!("VPC-{}-{:02}", s.id, c + 1);
            let original_value: f64 = rng.gen_range(500_000.0..5_000_000.0);
            let list_price: f64 = rng.gen_range(150.0..600.0);
            let unit_price = list_price * rng.gen_range(0.7..0.95);
            let discount_pct = (1.0 - unit_price / list_price) * 100.0;
            for q in Quarter::ALL {
                let volume: f64 = rng.gen_range(1000.0..10_000.0);
                writeln!(
                    out,
                    "{},{},{},{},{:.2},{:.2},{:.2},{:.0},{:.2},{}",
                    s.id,
                    s.name,
                    s.region,
                    contract_id,
                    original_value,
                    unit_price,
                    list_price,
                    volume,
                    discount_pct,
                    q.as_str(),
                )
                .expect("write to string");
            }
        }
    }
    out
}

fn generate_si(rng: &mut StdRng) -> String {
    let mut out = String::from(
        "supplier_id,supplier_name,region,delivery_id,scheduled_date,actual_receipt_date,status,is_partial,committed_spend,quarter\n",
    );
    for s in suppliers() {
        for q in Quarter::ALL {
            let (q_start, q_end) = quarter_bounds(q);
            for d in 0..rng.gen_range(3..=10) {
                let delivery_id = format!("SI-{}-{}-{:03}", s.id, q.as_str(), d + 1);
                let scheduled = date_in(rng, q_start, q_end);
                let is_partial = rng.gen_bool(0.15);
                let actual = scheduled + Duration::days(rng.gen_range(-2..=5));
                let status = if actual <= scheduled + Duration::days(1) {
                    "RECEIVED"
                } else if actual <= scheduled + Duration::days(3) {
                    "LATE"
                } else {
                    "DELAYED"
                };
                let spend: f64 = rng.gen_range(50_000.0..500_000.0);
                writeln!(
                    out,
                    "{},{},{},{},{},{},{},{},{:.2},{}",
                    s.id,
                    s.name,
                    s.region,
                    delivery_id,
                    scheduled,
                    actual,
                    status,
                    is_partial,
                    spend,
                    q.as_str(),
                )
                .expect("write to string");
            }
        }
    }
    out
}

fn main() -> Result<()> {
    let dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let seed: u64 = std::env::var("GEN_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(42);
    let mut rng = StdRng::seed_from_u64(seed);

    let dir = Path::new(&dir);
    fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;

    for (file, content) in [
        (GOVERNANCE_FILE, generate_vgs(&mut rng)),
        (PRICING_FILE, generate_vpc(&mut rng)),
        (RECEIPT_FILE, generate_si(&mut rng)),
    ] {
        let path = dir.join(file);
        let rows = content.lines().count().saturating_sub(1);
        fs::write(&path, content).with_context(|| format!("cannot write {}", path.display()))?;
        json_log(
            Domain::System,
            "table_generated",
            obj(&[
                ("path", v_str(&path.display().to_string())),
                ("rows", v_num(rows as f64)),
                ("seed", v_num(seed as f64)),
            ]),
        );
    }
    Ok(())
}
