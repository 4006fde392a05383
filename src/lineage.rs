//! Static lineage diagrams, one Graphviz DOT digraph per metric: source
//! systems feeding fields, fields feeding the merge/filter/calculate
//! pipeline, the pipeline feeding the governed metric. Descriptive only;
//! nothing here reads the record store.

use crate::dispatch::Metric;

struct Node {
    id: &'static str,
    label: &'static str,
    kind: NodeKind,
}

enum NodeKind {
    Source,
    Field,
    Transform,
    Output,
}

impl NodeKind {
    fn attrs(&self) -> &'static str {
        match self {
            NodeKind::Source => "shape=box, style=\"rounded,filled\", fillcolor=\"#4472C4\", fontcolor=white",
            NodeKind::Field => "shape=box, style=\"rounded,filled\", fillcolor=\"#E8F4F8\"",
            NodeKind::Transform => "shape=box, style=\"rounded,filled\", fillcolor=\"#F4A261\", fontcolor=white",
            NodeKind::Output => "shape=ellipse, style=filled, fillcolor=\"#27AE60\", fontcolor=white",
        }
    }
}

fn render(title: &str, nodes: &[Node], edges: &[(&str, &str)]) -> String {
    let mut dot = String::new();
    dot.push_str(&format!("digraph \"{}\" {{\n", title));
    dot.push_str("  rankdir=TB;\n");
    dot.push_str("  node [fontname=\"Arial\"];\n");
    dot.push_str("  edge [fontname=\"Arial\"];\n");
    for n in nodes {
        dot.push_str(&format!(
            "  {} [label=\"{}\", {}];\n",
            n.id,
            n.label,
            n.kind.attrs()
        ));
    }
    for (from, to) in edges {
        dot.push_str(&format!("  {} -> {};\n", from, to));
    }
    dot.push_str("}\n");
    dot
}

/// DOT source for a metric's lineage diagram.
pub fn lineage_dot(metric: Metric) -> String {
    match metric {
        Metric::OnTimeDelivery => render(
            metric.display_name(),
            &[
                Node { id: "si", label: "SI+ System\\n(Receipt Timestamps)", kind: NodeKind::Source },
                Node { id: "vgs", label: "VGS System\\n(Agreed Windows)", kind: NodeKind::Source },
                Node { id: "si_date", label: "actual_receipt_date", kind: NodeKind::Field },
                Node { id: "vgs_start", label: "agreed_window_start", kind: NodeKind::Field },
                Node { id: "vgs_end", label: "agreed_window_end", kind: NodeKind::Field },
                Node { id: "vgs_partial", label: "is_partial_delivery", kind: NodeKind::Field },
                Node { id: "vgs_fm", label: "force_majeure_flag", kind: NodeKind::Field },
                Node { id: "merge", label: "Merge by\\nsupplier_id", kind: NodeKind::Transform },
                Node { id: "filter", label: "Filter:\\nexclude partials\\nexclude force majeure", kind: NodeKind::Transform },
                Node { id: "calc", label: "Calculate:\\non-time rate", kind: NodeKind::Transform },
                Node { id: "metric", label: "Governed Metric\\nOn-Time Delivery Rate", kind: NodeKind::Output },
            ],
            &[
                ("si", "si_date"),
                ("vgs", "vgs_start"),
                ("vgs", "vgs_end"),
                ("vgs", "vgs_partial"),
                ("vgs", "vgs_fm"),
                ("si_date", "merge"),
                ("vgs_start", "merge"),
                ("vgs_end", "merge"),
                ("merge", "filter"),
                ("vgs_partial", "filter"),
                ("vgs_fm", "filter"),
                ("filter", "calc"),
                ("calc", "metric"),
            ],
        ),
        Metric::NegotiatedSavings => render(
            metric.display_name(),
            &[
                Node { id: "vgs", label: "VGS System\\n(Prior Contract Price)", kind: NodeKind::Source },
                Node { id: "vpc", label: "VPC System\\n(Current Price & Volume)", kind: NodeKind::Source },
                Node { id: "vgs_price", label: "prior_contract_price", kind: NodeKind::Field },
                Node { id: "vpc_price", label: "unit_price", kind: NodeKind::Field },
                Node { id: "vpc_vol", label: "volume", kind: NodeKind::Field },
                Node { id: "merge", label: "Merge by\\nsupplier_id", kind: NodeKind::Transform },
                Node { id: "filter", label: "Filter:\\nvalid prices\\nvolume > 0", kind: NodeKind::Transform },
                Node { id: "calc", label: "Calculate:\\n(prior - current) x volume", kind: NodeKind::Transform },
                Node { id: "metric", label: "Governed Metric\\nNegotiated Savings", kind: NodeKind::Output },
            ],
            &[
                ("vgs", "vgs_price"),
                ("vpc", "vpc_price"),
                ("vpc", "vpc_vol"),
                ("vgs_price", "merge"),
                ("vpc_price", "merge"),
                ("vpc_vol", "merge"),
                ("merge", "filter"),
                ("filter", "calc"),
                ("calc", "metric"),
            ],
        ),
        Metric::ActiveContractValue => render(
            metric.display_name(),
            &[
                Node { id: "vgs", label: "VGS System\\n(Contract Data)", kind: NodeKind::Source },
                Node { id: "vgs_start", label: "contract_start", kind: NodeKind::Field },
                Node { id: "vgs_end", label: "contract_end", kind: NodeKind::Field },
                Node { id: "vgs_orig", label: "original_value", kind: NodeKind::Field },
                Node { id: "vgs_amend", label: "amendment_value", kind: NodeKind::Field },
                Node { id: "filter", label: "Filter:\\nactive contracts only", kind: NodeKind::Transform },
                Node { id: "calc", label: "Calculate:\\noriginal + amendment", kind: NodeKind::Transform },
                Node { id: "agg", label: "Aggregate:\\nsum per contract", kind: NodeKind::Transform },
                Node { id: "metric", label: "Governed Metric\\nActive Contract Value", kind: NodeKind::Output },
            ],
            &[
                ("vgs", "vgs_start"),
                ("vgs", "vgs_end"),
                ("vgs", "vgs_orig"),
                ("vgs", "vgs_amend"),
                ("vgs_start", "filter"),
                ("vgs_end", "filter"),
                ("filter", "calc"),
                ("vgs_orig", "calc"),
                ("vgs_amend", "calc"),
                ("calc", "agg"),
                ("agg", "metric"),
            ],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_metric_renders_a_digraph() {
        for m in Metric::ALL {
            let dot = lineage_dot(m);
            assert!(dot.starts_with("digraph"));
            assert!(dot.trim_end().ends_with('}'));
            assert!(dot.contains("Governed Metric"));
        }
    }

    #[test]
    fn on_time_lineage_joins_both_systems() {
        let dot = lineage_dot(Metric::OnTimeDelivery);
        assert!(dot.contains("si_date -> merge"));
        assert!(dot.contains("vgs_fm -> filter"));
    }
}
