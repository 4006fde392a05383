//! Load the three system exports and print, per metric, the value each
//! system reports next to the governed value, the governed definition,
//! and the supplier flag count for on-time delivery.
//!
//! Usage: report [data_dir] [quarter] [region,region,...]
//! FLAG_THRESHOLD overrides the default 85% review threshold.
//! LINEAGE=1 also prints each metric's lineage DOT source.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;

use metric_trust::data::load_record_store;
use metric_trust::definitions::metric_definition;
use metric_trust::dispatch::{compute_metric, supplier_flag_count, Metric, SystemLabel};
use metric_trust::lineage::lineage_dot;
use metric_trust::logging::{json_log, obj, v_str, Domain};
use metric_trust::store::{MetricFilter, Quarter};

fn format_value(metric: Metric, value: Option<f64>) -> String {
    match value {
        Some(v) if metric.is_percentage() => format!("{:.2}%", v),
        Some(v) => format!("${:.2}", v),
        None => "N/A".to_string(),
    }
}

fn main() -> Result<()> {
    let dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let quarter = match std::env::args().nth(2) {
        Some(q) if q != "All" => Some(Quarter::parse(&q).map_err(anyhow::Error::msg)?),
        _ => None,
    };
    let regions: Option<Vec<String>> = std::env::args()
        .nth(3)
        .map(|r| r.split(',').map(|s| s.trim().to_string()).collect());
    let threshold: f64 = std::env::var("FLAG_THRESHOLD")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(85.0);

    let filter = MetricFilter { quarter, regions };
    let (store, _manifests) = load_record_store(Path::new(&dir))?;
    json_log(
        Domain::System,
        "store_loaded",
        obj(&[("dir", v_str(&dir))]),
    );

    let today = Utc::now().date_naive();
    for metric in Metric::ALL {
        let def = metric_definition(metric);
        let results = compute_metric(metric, &store, &filter, today);

        println!("== {} ==", metric.display_name());
        println!("   {}", def.description);
        println!("   formula: {}", def.formula);
        for label in [
            SystemLabel::Vgs,
            SystemLabel::Vpc,
            SystemLabel::Si,
            SystemLabel::Governed,
        ] {
            println!(
                "   {:<9} ({:<24}) {}",
                label.as_str(),
                label.description(),
                format_value(metric, results.get(&label).copied().flatten()),
            );
        }
        if metric == Metric::OnTimeDelivery {
            let flagged = supplier_flag_count(metric.display_name(), &store, threshold, &filter);
            println!(
                "   suppliers below {:.0}% governed on-time rate: {}",
                threshold, flagged
            );
        }
        if std::env::var("LINEAGE").as_deref() == Ok("1") {
            println!("{}", lineage_dot(metric));
        }
        println!();
    }
    Ok(())
}
