//! Governed reconciliation calculators.
//!
//! One function per metric, each applying the documented cross-system rule
//! and producing the certified value. Joins are keyed on supplier id with
//! first-match semantics: when a supplier has several contracts, only the
//! first governance row seen contributes its window or prior price. That
//! matches the upstream systems' behavior and is kept deliberately; a
//! multi-contract-aware join would change certified numbers.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::compute::{round2, vgs_contract_value};
use crate::store::{MetricFilter, RecordStore};

/// A receipt row joined to its supplier's governance window, after the
/// partial / force-majeure exclusions.
#[derive(Debug, Clone)]
pub struct JoinedReceipt<'a> {
    pub supplier_id: &'a str,
    pub on_time: bool,
}

/// Join SI+ receipts to a first-match-per-supplier map of VGS windows and
/// flags, dropping partial and force-majeure suppliers. A receipt is
/// on-time iff its actual receipt date falls inside the governance-agreed
/// window, inclusive.
pub fn joined_on_time_rows<'a>(
    store: &'a RecordStore,
    filter: &'a MetricFilter,
) -> Vec<JoinedReceipt<'a>> {
    struct Window {
        start: NaiveDate,
        end: NaiveDate,
        is_partial: bool,
        force_majeure: bool,
    }

    let mut windows: BTreeMap<&str, Window> = BTreeMap::new();
    for g in store.governance_view(filter) {
        windows.entry(g.supplier_id.as_str()).or_insert(Window {
            start: g.agreed_window_start,
            end: g.agreed_window_end,
            is_partial: g.is_partial_delivery,
            force_majeure: g.force_majeure_flag,
        });
    }

    let mut joined = Vec::new();
    for r in store.receipt_view(filter) {
        let Some(w) = windows.get(r.supplier_id.as_str()) else {
            continue;
        };
        if w.is_partial || w.force_majeure {
            continue;
        }
        joined.push(JoinedReceipt {
            supplier_id: r.supplier_id.as_str(),
            on_time: r.actual_receipt_date >= w.start && r.actual_receipt_date <= w.end,
        });
    }
    joined
}

/// Governed on-time rate: SI+ receipt timestamps measured against VGS
/// windows, partials and force majeure excluded.
pub fn governed_on_time_delivery(store: &RecordStore, filter: &MetricFilter) -> Option<f64> {
    let joined = joined_on_time_rows(store, filter);
    if joined.is_empty() {
        return None;
    }
    let on_time = joined.iter().filter(|j| j.on_time).count();
    Some(round2(on_time as f64 / joined.len() as f64 * 100.0))
}

/// Governed savings: VPC current price and volume against the VGS prior
/// contract price (first match per supplier). Rows where the prior price
/// is missing, volume is non-positive, or the current price already
/// exceeds the prior one contribute nothing rather than negative savings.
pub fn governed_savings(store: &RecordStore, filter: &MetricFilter) -> Option<f64> {
    let mut prior_prices: BTreeMap<&str, Option<f64>> = BTreeMap::new();
    for g in store.governance_view(filter) {
        prior_prices
            .entry(g.supplier_id.as_str())
            .or_insert(g.prior_contract_price);
    }

    let mut total = 0.0;
    let mut qualifying = 0usize;
    for p in store.pricing_view(filter) {
        let Some(Some(prior)) = prior_prices.get(p.supplier_id.as_str()).copied() else {
            continue;
        };
        if p.volume <= 0.0 || prior <= p.unit_price {
            continue;
        }
        total += (prior - p.unit_price) * p.volume;
        qualifying += 1;
    }
    if qualifying == 0 {
        return None;
    }
    Some(round2(total))
}

/// Governed contract value: governance is the source of truth here, so
/// this is exactly the VGS view — active contracts only, original plus
/// amendment, counted once per contract.
pub fn governed_contract_value(
    store: &RecordStore,
    filter: &MetricFilter,
    today: NaiveDate,
) -> Option<f64> {
    vgs_contract_value(store, filter, today)
}

/// Per-supplier governed on-time rate, in supplier-id order.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierRate {
    pub supplier_id: String,
    pub on_time_count: usize,
    pub total_count: usize,
    pub rate: f64,
}

/// Group the governed join by supplier and compute each supplier's rate.
pub fn supplier_on_time_rates(store: &RecordStore, filter: &MetricFilter) -> Vec<SupplierRate> {
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for j in joined_on_time_rows(store, filter) {
        let entry = groups.entry(j.supplier_id).or_insert((0, 0));
        entry.1 += 1;
        if j.on_time {
            entry.0 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(supplier_id, (on_time, total))| SupplierRate {
            supplier_id: supplier_id.to_string(),
            on_time_count: on_time,
            total_count: total,
            rate: round2(on_time as f64 / total as f64 * 100.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GovernanceRecord, PricingRecord, Quarter, ReceiptRecord, ReceiptStatus};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn gov(supplier: &str, window: (NaiveDate, NaiveDate)) -> GovernanceRecord {
        GovernanceRecord {
            supplier_id: supplier.into(),
            supplier_name: format!("Supplier {}", supplier),
            region: "Europe".into(),
            contract_id: format!("VGS-{}-01", supplier),
            contract_start: d(2024, 1, 1),
            contract_end: d(2025, 12, 31),
            original_value: 1_000_000.0,
            amendment_value: 0.0,
            prior_contract_price: Some(200.0),
            delivery_date: window.0,
            agreed_window_start: window.0,
            agreed_window_end: window.1,
            is_partial_delivery: false,
            force_majeure_flag: false,
            quarter: Quarter::Q1,
        }
    }

    fn receipt(supplier: &str, received_on: NaiveDate) -> ReceiptRecord {
        ReceiptRecord {
            supplier_id: supplier.into(),
            supplier_name: format!("Supplier {}", supplier),
            region: "Europe".into(),
            delivery_id: format!("SI-{}-Q1-001", supplier),
            scheduled_date: received_on,
            actual_receipt_date: received_on,
            status: ReceiptStatus::Received,
            is_partial: false,
            committed_spend: 100_000.0,
            quarter: Quarter::Q1,
        }
    }

    fn pricing(supplier: &str, unit: f64, volume: f64) -> PricingRecord {
        PricingRecord {
            supplier_id: supplier.into(),
            supplier_name: format!("Supplier {}", supplier),
            region: "Europe".into(),
            contract_id: format!("VPC-{}-01", supplier),
            original_contract_value: 1_000_000.0,
            unit_price: unit,
            list_price: unit * 1.3,
            volume,
            negotiated_discount_pct: 23.0,
            quarter: Quarter::Q1,
        }
    }

    #[test]
    fn governed_on_time_uses_governance_windows() {
        let window = (d(2025, 2, 8), d(2025, 2, 12));
        let store = RecordStore {
            governance: vec![gov("SUP001", window)],
            receipts: vec![
                receipt("SUP001", d(2025, 2, 10)), // inside
                receipt("SUP001", d(2025, 2, 20)), // outside
            ],
            ..Default::default()
        };
        assert_eq!(
            governed_on_time_delivery(&store, &MetricFilter::all()),
            Some(50.00)
        );
    }

    #[test]
    fn governed_on_time_drops_unmatched_suppliers() {
        let store = RecordStore {
            governance: vec![gov("SUP001", (d(2025, 2, 8), d(2025, 2, 12)))],
            receipts: vec![receipt("SUP999", d(2025, 2, 10))],
            ..Default::default()
        };
        assert_eq!(governed_on_time_delivery(&store, &MetricFilter::all()), None);
    }

    #[test]
    fn governed_on_time_excludes_flagged_suppliers() {
        let mut flagged = gov("SUP001", (d(2025, 2, 8), d(2025, 2, 12)));
        flagged.force_majeure_flag = true;
        let store = RecordStore {
            governance: vec![flagged],
            receipts: vec![receipt("SUP001", d(2025, 2, 10))],
            ..Default::default()
        };
        assert_eq!(governed_on_time_delivery(&store, &MetricFilter::all()), None);
    }

    #[test]
    fn first_governance_row_wins_per_supplier() {
        // Second contract's much wider window must not participate.
        let narrow = gov("SUP001", (d(2025, 2, 8), d(2025, 2, 9)));
        let wide = gov("SUP001", (d(2025, 1, 1), d(2025, 12, 31)));
        let store = RecordStore {
            governance: vec![narrow, wide],
            receipts: vec![receipt("SUP001", d(2025, 3, 1))],
            ..Default::default()
        };
        assert_eq!(governed_on_time_delivery(&store, &MetricFilter::all()), Some(0.00));
    }

    // A prior price below the current unit price contributes zero, never
    // negative savings.
    #[test]
    fn governed_savings_guards_against_negative_rows() {
        let mut cheap_prior = gov("SUP001", (d(2025, 2, 8), d(2025, 2, 12)));
        cheap_prior.prior_contract_price = Some(100.0);
        let good_prior = gov("SUP002", (d(2025, 2, 8), d(2025, 2, 12)));
        let store = RecordStore {
            governance: vec![cheap_prior, good_prior],
            pricing: vec![
                pricing("SUP001", 120.0, 1000.0), // prior 100 < unit 120: excluded
                pricing("SUP002", 150.0, 1000.0), // prior 200 > unit 150: (200-150)*1000
            ],
            ..Default::default()
        };
        assert_eq!(governed_savings(&store, &MetricFilter::all()), Some(50_000.00));
    }

    #[test]
    fn governed_savings_requires_positive_volume() {
        let store = RecordStore {
            governance: vec![gov("SUP001", (d(2025, 2, 8), d(2025, 2, 12)))],
            pricing: vec![pricing("SUP001", 150.0, 0.0)],
            ..Default::default()
        };
        assert_eq!(governed_savings(&store, &MetricFilter::all()), None);
    }

    #[test]
    fn supplier_rates_group_by_supplier() {
        let window = (d(2025, 2, 1), d(2025, 2, 28));
        let store = RecordStore {
            governance: vec![
                gov("SUP001", window),
                gov("SUP002", window),
            ],
            receipts: vec![
                receipt("SUP001", d(2025, 2, 10)),
                receipt("SUP001", d(2025, 3, 10)), // late
                receipt("SUP002", d(2025, 2, 5)),
            ],
            ..Default::default()
        };
        let rates = supplier_on_time_rates(&store, &MetricFilter::all());
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].supplier_id, "SUP001");
        assert_eq!(rates[0].rate, 50.00);
        assert_eq!(rates[1].rate, 100.00);
    }

    #[test]
    fn governed_rates_stay_in_bounds() {
        let window = (d(2025, 2, 1), d(2025, 2, 28));
        let store = RecordStore {
            governance: vec![gov("SUP001", window)],
            receipts: vec![
                receipt("SUP001", d(2025, 2, 10)),
                receipt("SUP001", d(2025, 6, 1)),
                receipt("SUP001", d(2025, 2, 2)),
            ],
            ..Default::default()
        };
        let rate = governed_on_time_delivery(&store, &MetricFilter::all()).unwrap();
        assert!((0.0..=100.0).contains(&rate));
    }
}
