use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The four reporting quarters used by every source system export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim() {
            "Q1" => Ok(Quarter::Q1),
            "Q2" => Ok(Quarter::Q2),
            "Q3" => Ok(Quarter::Q3),
            "Q4" => Ok(Quarter::Q4),
            other => Err(format!("bad quarter: {}", other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }
}

/// Receipt status in the SI+ export. RECEIVED already conflates partial and
/// full deliveries; that looseness is part of the source system's semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReceiptStatus {
    Received,
    Late,
    Delayed,
}

impl ReceiptStatus {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim() {
            "RECEIVED" => Ok(ReceiptStatus::Received),
            "LATE" => Ok(ReceiptStatus::Late),
            "DELAYED" => Ok(ReceiptStatus::Delayed),
            other => Err(format!("bad status: {}", other)),
        }
    }
}

/// One delivery event row from the VGS (supplier governance) export. A
/// contract spans many delivery rows; contract-level fields repeat per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceRecord {
    pub supplier_id: String,
    pub supplier_name: String,
    pub region: String,
    pub contract_id: String,
    pub contract_start: NaiveDate,
    pub contract_end: NaiveDate,
    pub original_value: f64,
    pub amendment_value: f64,
    pub prior_contract_price: Option<f64>,
    pub delivery_date: NaiveDate,
    pub agreed_window_start: NaiveDate,
    pub agreed_window_end: NaiveDate,
    pub is_partial_delivery: bool,
    pub force_majeure_flag: bool,
    pub quarter: Quarter,
}

/// One row from the VPC (price/cost management) export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRecord {
    pub supplier_id: String,
    pub supplier_name: String,
    pub region: String,
    pub contract_id: String,
    pub original_contract_value: f64,
    pub unit_price: f64,
    pub list_price: f64,
    pub volume: f64,
    pub negotiated_discount_pct: f64,
    pub quarter: Quarter,
}

/// One receipt event row from the SI+ (implementation tracking) export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub supplier_id: String,
    pub supplier_name: String,
    pub region: String,
    pub delivery_id: String,
    pub scheduled_date: NaiveDate,
    pub actual_receipt_date: NaiveDate,
    pub status: ReceiptStatus,
    pub is_partial: bool,
    pub committed_spend: f64,
    pub quarter: Quarter,
}

/// The three source system exports, loaded once and read-only afterwards.
/// Constructed explicitly and passed by reference into the calculators;
/// there is no ambient global cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordStore {
    pub governance: Vec<GovernanceRecord>,
    pub pricing: Vec<PricingRecord>,
    pub receipts: Vec<ReceiptRecord>,
}

/// Optional quarter/region filters shared by every calculator. Quarter is
/// exact-match; region is set membership. `None` (or an empty region set)
/// means unfiltered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricFilter {
    pub quarter: Option<Quarter>,
    pub regions: Option<Vec<String>>,
}

impl MetricFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn quarter(q: Quarter) -> Self {
        Self {
            quarter: Some(q),
            regions: None,
        }
    }

    pub fn regions<S: Into<String>>(regions: impl IntoIterator<Item = S>) -> Self {
        Self {
            quarter: None,
            regions: Some(regions.into_iter().map(Into::into).collect()),
        }
    }

    pub fn matches(&self, quarter: Quarter, region: &str) -> bool {
        if let Some(q) = self.quarter {
            if quarter != q {
                return false;
            }
        }
        match &self.regions {
            Some(set) if !set.is_empty() => set.iter().any(|r| r == region),
            _ => true,
        }
    }
}

impl RecordStore {
    /// Governance rows passing the filter, in load order.
    pub fn governance_view<'a>(&'a self, filter: &'a MetricFilter) -> impl Iterator<Item = &'a GovernanceRecord> {
        self.governance
            .iter()
            .filter(move |r| filter.matches(r.quarter, &r.region))
    }

    pub fn pricing_view<'a>(&'a self, filter: &'a MetricFilter) -> impl Iterator<Item = &'a PricingRecord> {
        self.pricing
            .iter()
            .filter(move |r| filter.matches(r.quarter, &r.region))
    }

    pub fn receipt_view<'a>(&'a self, filter: &'a MetricFilter) -> impl Iterator<Item = &'a ReceiptRecord> {
        self.receipts
            .iter()
            .filter(move |r| filter.matches(r.quarter, &r.region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_round_trip() {
        for q in Quarter::ALL {
            assert_eq!(Quarter::parse(q.as_str()), Ok(q));
        }
        assert!(Quarter::parse("Q5").is_err());
    }

    #[test]
    fn empty_region_set_means_unfiltered() {
        let filter = MetricFilter {
            quarter: None,
            regions: Some(Vec::new()),
        };
        assert!(filter.matches(Quarter::Q1, "Europe"));
    }

    #[test]
    fn region_filter_is_membership() {
        let filter = MetricFilter::regions(["Europe", "Asia"]);
        assert!(filter.matches(Quarter::Q3, "Asia"));
        assert!(!filter.matches(Quarter::Q3, "Americas"));
    }

    #[test]
    fn quarter_filter_is_exact() {
        let filter = MetricFilter::quarter(Quarter::Q2);
        assert!(filter.matches(Quarter::Q2, "Other"));
        assert!(!filter.matches(Quarter::Q3, "Other"));
    }
}
