//! Static governed-metric metadata: the documented definition each
//! certified value is computed under. Keyed by metric, not by data.

use serde::Serialize;

use crate::dispatch::Metric;

#[derive(Debug, Clone, Serialize)]
pub struct MetricDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub formula: &'static str,
    pub grain: &'static str,
    pub time_logic: &'static str,
    pub owner: &'static str,
    pub inclusions: &'static [&'static str],
    pub exclusions: &'static [&'static str],
}

const ON_TIME_DELIVERY: MetricDefinition = MetricDefinition {
    name: "Supplier On-Time Delivery Rate",
    description: "Share of deliveries received within the contractually agreed window.",
    formula: "on_time_deliveries / total_deliveries * 100",
    grain: "delivery event",
    time_logic: "actual_receipt_date within [agreed_window_start, agreed_window_end], inclusive",
    owner: "Supplier Performance Office",
    inclusions: &[
        "Full deliveries received against an agreed window",
        "SI+ receipt timestamps measured against VGS windows",
    ],
    exclusions: &[
        "Partial deliveries",
        "Deliveries flagged force majeure",
        "Suppliers with no governance window on record",
    ],
};

const NEGOTIATED_SAVINGS: MetricDefinition = MetricDefinition {
    name: "Negotiated Savings",
    description: "Realized price reduction against the prior contract price.",
    formula: "sum((prior_contract_price - unit_price) * volume)",
    grain: "supplier contract per quarter",
    time_logic: "current-quarter volume at current unit price",
    owner: "Category Management",
    inclusions: &[
        "Rows with a recorded prior contract price",
        "Positive purchase volume",
        "Prior price above the current unit price",
    ],
    exclusions: &[
        "List-price baselines",
        "Extrapolated volumes",
        "Price increases (never negative savings)",
    ],
};

const ACTIVE_CONTRACT_VALUE: MetricDefinition = MetricDefinition {
    name: "Active Contract Value",
    description: "Total value of contracts currently in force, amendments included.",
    formula: "sum(original_value + amendment_value) per active contract",
    grain: "contract",
    time_logic: "contract_start <= today <= contract_end",
    owner: "Procurement Finance",
    inclusions: &[
        "Contracts active today",
        "Signed amendments",
    ],
    exclusions: &[
        "Expired and future contracts",
        "Committed spend (operational, not contractual)",
        "Duplicate delivery rows for the same contract",
    ],
};

/// Metadata for a metric. The governance system is the definition owner of
/// record for all three.
pub fn metric_definition(metric: Metric) -> &'static MetricDefinition {
    match metric {
        Metric::OnTimeDelivery => &ON_TIME_DELIVERY,
        Metric::NegotiatedSavings => &NEGOTIATED_SAVINGS,
        Metric::ActiveContractValue => &ACTIVE_CONTRACT_VALUE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_metric_has_a_definition() {
        for m in Metric::ALL {
            let def = metric_definition(m);
            assert_eq!(def.name, m.display_name());
            assert!(!def.inclusions.is_empty());
            assert!(!def.exclusions.is_empty());
        }
    }
}
