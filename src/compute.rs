//! Per-system metric calculators.
//!
//! Each source system computes "the same" metric from its own export with
//! its own rules; the functions here reproduce those rules faithfully,
//! including the ones that are wrong on purpose (VPC's list-price savings
//! baseline, SI+'s partial-friendly on-time rate). `None` always means
//! "no qualifying rows under these filters", never a computed zero.

use chrono::NaiveDate;

use crate::store::{MetricFilter, ReceiptStatus, RecordStore};

/// Round to the 2-decimal output contract shared by every calculator.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// VGS on-time rate: partials and force majeure excluded, a delivery is
/// on-time iff its delivery date lands inside its own agreed window
/// (inclusive bounds).
pub fn vgs_on_time_delivery(store: &RecordStore, filter: &MetricFilter) -> Option<f64> {
    let mut total = 0usize;
    let mut on_time = 0usize;
    for r in store.governance_view(filter) {
        if r.is_partial_delivery || r.force_majeure_flag {
            continue;
        }
        total += 1;
        if r.delivery_date >= r.agreed_window_start && r.delivery_date <= r.agreed_window_end {
            on_time += 1;
        }
    }
    if total == 0 {
        return None;
    }
    Some(round2(on_time as f64 / total as f64 * 100.0))
}

/// SI+ on-time rate: RECEIVED over all receipt rows. RECEIVED includes
/// partial deliveries, so this reads more lenient than VGS.
pub fn si_on_time_delivery(store: &RecordStore, filter: &MetricFilter) -> Option<f64> {
    let mut total = 0usize;
    let mut received = 0usize;
    for r in store.receipt_view(filter) {
        total += 1;
        if r.status == ReceiptStatus::Received {
            received += 1;
        }
    }
    if total == 0 {
        return None;
    }
    Some(round2(received as f64 / total as f64 * 100.0))
}

/// VGS savings estimate. VGS has the prior unit price but no volume, so it
/// extrapolates volume from contract value and assumes a flat 10% saving
/// against the unknown current price.
pub fn vgs_savings(store: &RecordStore, filter: &MetricFilter) -> Option<f64> {
    let mut price_sum = 0.0;
    let mut price_count = 0usize;
    let mut value_sum = 0.0;
    for r in store.governance_view(filter) {
        if let Some(prior) = r.prior_contract_price {
            price_sum += prior;
            price_count += 1;
            value_sum += r.original_value;
        }
    }
    if price_count == 0 {
        return None;
    }
    let avg_unit_price = price_sum / price_count as f64;
    let estimated_volume = if avg_unit_price > 0.0 {
        value_sum / avg_unit_price
    } else {
        0.0
    };
    Some(round2(avg_unit_price * 0.1 * estimated_volume))
}

/// VPC savings: (list price − unit price) × volume, summed. The list-price
/// baseline inflates the number relative to the governed definition.
pub fn vpc_savings(store: &RecordStore, filter: &MetricFilter) -> Option<f64> {
    let mut total = 0.0;
    let mut rows = 0usize;
    for r in store.pricing_view(filter) {
        total += (r.list_price - r.unit_price) * r.volume;
        rows += 1;
    }
    if rows == 0 {
        return None;
    }
    Some(round2(total))
}

/// VGS active contract value: original + amendment for contracts active
/// today, counted once per contract id no matter how many delivery rows
/// reference it.
pub fn vgs_contract_value(
    store: &RecordStore,
    filter: &MetricFilter,
    today: NaiveDate,
) -> Option<f64> {
    let mut seen: Vec<&str> = Vec::new();
    let mut total = 0.0;
    for r in store.governance_view(filter) {
        if r.contract_start > today || r.contract_end < today {
            continue;
        }
        if seen.iter().any(|id| *id == r.contract_id) {
            continue;
        }
        seen.push(&r.contract_id);
        total += r.original_value + r.amendment_value;
    }
    if seen.is_empty() {
        return None;
    }
    Some(round2(total))
}

/// VPC contract value: original value summed per row, no amendment
/// awareness and no contract dedup. The table carries one row per contract
/// per quarter, so unfiltered sums double count; that is the source
/// system's limitation, reproduced as-is.
pub fn vpc_contract_value(store: &RecordStore, filter: &MetricFilter) -> Option<f64> {
    let mut total = 0.0;
    let mut rows = 0usize;
    for r in store.pricing_view(filter) {
        total += r.original_contract_value;
        rows += 1;
    }
    if rows == 0 {
        return None;
    }
    Some(round2(total))
}

/// SI+ "contract value": committed spend, an operational commitment rather
/// than a contract value. Returned unadjusted.
pub fn si_contract_value(store: &RecordStore, filter: &MetricFilter) -> Option<f64> {
    let mut total = 0.0;
    let mut rows = 0usize;
    for r in store.receipt_view(filter) {
        total += r.committed_spend;
        rows += 1;
    }
    if rows == 0 {
        return None;
    }
    Some(round2(total))
}
