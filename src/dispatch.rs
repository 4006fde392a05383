//! Metric routing.
//!
//! Metric names arrive as display strings from callers; internally every
//! route is an exhaustive match on a closed enum. For each metric the one
//! system that does not track it is reported as absent without being
//! computed. An unparseable name is tolerated at the string boundary only:
//! it logs a warning and yields an empty mapping, so callers must check
//! for the keys they expect.

use std::collections::BTreeMap;

use anyhow::{bail, Error};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::compute;
use crate::governed;
use crate::logging::{json_log, log, obj, v_str, Domain, Level};
use crate::store::{MetricFilter, RecordStore};

/// The three governed metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    OnTimeDelivery,
    NegotiatedSavings,
    ActiveContractValue,
}

impl Metric {
    pub const ALL: [Metric; 3] = [
        Metric::OnTimeDelivery,
        Metric::NegotiatedSavings,
        Metric::ActiveContractValue,
    ];

    /// Parse a display name. Anything outside the closed set is a caller
    /// error.
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name.trim() {
            "Supplier On-Time Delivery Rate" => Ok(Metric::OnTimeDelivery),
            "Negotiated Savings" => Ok(Metric::NegotiatedSavings),
            "Active Contract Value" => Ok(Metric::ActiveContractValue),
            other => bail!("unrecognized metric: {}", other),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::OnTimeDelivery => "Supplier On-Time Delivery Rate",
            Metric::NegotiatedSavings => "Negotiated Savings",
            Metric::ActiveContractValue => "Active Contract Value",
        }
    }

    /// On-time delivery reads as a percentage; the other two as currency.
    pub fn is_percentage(&self) -> bool {
        matches!(self, Metric::OnTimeDelivery)
    }
}

/// Result-map keys: the three source systems plus the governed definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SystemLabel {
    Vgs,
    Vpc,
    Si,
    Governed,
}

impl SystemLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemLabel::Vgs => "VGS",
            SystemLabel::Vpc => "VPC",
            SystemLabel::Si => "SI+",
            SystemLabel::Governed => "Governed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SystemLabel::Vgs => "Supplier Governance",
            SystemLabel::Vpc => "Price/Cost Management",
            SystemLabel::Si => "Implementation Tracking",
            SystemLabel::Governed => "Governed Definition",
        }
    }
}

pub type MetricResults = BTreeMap<SystemLabel, Option<f64>>;

/// Compute one metric across all systems, with `today` pinned by the
/// caller so results are reproducible.
pub fn compute_metric(
    metric: Metric,
    store: &RecordStore,
    filter: &MetricFilter,
    today: NaiveDate,
) -> MetricResults {
    let mut results = MetricResults::new();
    match metric {
        Metric::OnTimeDelivery => {
            results.insert(SystemLabel::Vgs, compute::vgs_on_time_delivery(store, filter));
            results.insert(SystemLabel::Si, compute::si_on_time_delivery(store, filter));
            // VPC has no delivery data.
            results.insert(SystemLabel::Vpc, None);
            results.insert(
                SystemLabel::Governed,
                governed::governed_on_time_delivery(store, filter),
            );
        }
        Metric::NegotiatedSavings => {
            results.insert(SystemLabel::Vgs, compute::vgs_savings(store, filter));
            results.insert(SystemLabel::Vpc, compute::vpc_savings(store, filter));
            // SI+ has no pricing data.
            results.insert(SystemLabel::Si, None);
            results.insert(
                SystemLabel::Governed,
                governed::governed_savings(store, filter),
            );
        }
        Metric::ActiveContractValue => {
            results.insert(
                SystemLabel::Vgs,
                compute::vgs_contract_value(store, filter, today),
            );
            results.insert(SystemLabel::Vpc, compute::vpc_contract_value(store, filter));
            results.insert(SystemLabel::Si, compute::si_contract_value(store, filter));
            results.insert(
                SystemLabel::Governed,
                governed::governed_contract_value(store, filter, today),
            );
        }
    }
    json_log(
        Domain::Dispatch,
        "metric_computed",
        obj(&[
            ("metric", v_str(metric.display_name())),
            (
                "systems",
                serde_json::json!(results.len()),
            ),
        ]),
    );
    results
}

/// String-facing entry point. An unrecognized name yields an empty map.
pub fn compute_metric_per_system(
    metric_name: &str,
    store: &RecordStore,
    filter: &MetricFilter,
) -> MetricResults {
    match Metric::parse(metric_name) {
        Ok(metric) => compute_metric(metric, store, filter, Utc::now().date_naive()),
        Err(err) => {
            log(
                Level::Warn,
                Domain::Dispatch,
                "unknown_metric",
                obj(&[("error", v_str(&err.to_string()))]),
            );
            MetricResults::new()
        }
    }
}

/// Count suppliers whose governed on-time rate falls strictly below the
/// threshold. Defined only for the on-time-delivery metric; any other name
/// counts zero suppliers.
pub fn supplier_flag_count(
    metric_name: &str,
    store: &RecordStore,
    threshold: f64,
    filter: &MetricFilter,
) -> usize {
    match Metric::parse(metric_name) {
        Ok(Metric::OnTimeDelivery) => governed::supplier_on_time_rates(store, filter)
            .iter()
            .filter(|s| s.rate < threshold)
            .count(),
        Ok(_) => 0,
        Err(_) => 0,
    }
}
