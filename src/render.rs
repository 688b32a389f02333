//! LaTeX `tabular` rendering of the summaries.

use crate::cdf::Total;
use crate::dimension::Quantity;
use crate::summarizers::distribution::DistributionTable;
use crate::summarizers::stats::{StatValue, StatsTable};
use crate::Summary;

const NO_DATA: &str = "nan";
const UNAVAILABLE: &str = "n/a";

/// Metadata shown above the statistics of a dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetInfo {
    pub name: String,
    pub exporter: String,
    pub l2_technology: String,
    pub sampling_rate: String,
    pub active_timeout_secs: u32,
    pub inactive_timeout_secs: u32,
}

impl Default for DatasetInfo {
    fn default() -> Self {
        DatasetInfo {
            name: "XXX".to_string(),
            exporter: "XXX".to_string(),
            l2_technology: "Ethernet".to_string(),
            sampling_rate: "none".to_string(),
            active_timeout_secs: 300,
            inactive_timeout_secs: 15,
        }
    }
}

pub fn stats_table(stats: &StatsTable, info: &DatasetInfo) -> String {
    let mut s: Vec<String> = vec![
        "\\begin{tabular}{lrr}".to_string(),
        "\\toprule".to_string(),
        format!("\\textbf{{Dataset name}} & {} & \\\\", info.name),
        format!("\\textbf{{Exporter}} & {} & \\\\", info.exporter),
        format!("\\textbf{{L2 technology}} & {} & \\\\", info.l2_technology),
        format!("\\textbf{{Sampling rate}} & {} & \\\\", info.sampling_rate),
        format!("\\textbf{{Active timeout}} & {} & seconds \\\\", info.active_timeout_secs),
        format!("\\textbf{{Inactive timeout}} & {} & seconds \\\\", info.inactive_timeout_secs),
        "\\midrule".to_string(),
    ];
    for row in stats.rows() {
        let value = match &row.value {
            Ok(StatValue::Total(t)) => format_total(*t),
            Ok(StatValue::Mean(Some(m))) => format!("{:.6}", m),
            Ok(StatValue::Mean(None)) => NO_DATA.to_string(),
            Err(_) => UNAVAILABLE.to_string(),
        };
        s.push(format!("\\textbf{{{}}} & {} & {} \\\\", row.kind.label(), value, row.kind.unit()));
    }
    s.push("\\bottomrule".to_string());
    s.push("\\end{tabular}".to_string());
    s.join("\n")
}

pub fn distribution_table(dist: &DistributionTable) -> String {
    let dimension = dist.dimension();
    let names: Vec<&str> = Quantity::ALL.iter().map(|q| q.name()).collect();
    let mut s: Vec<String> = vec![
        "\\begin{tabular}{lrrr}".to_string(),
        "\\toprule".to_string(),
        format!(
            "\\textbf{{Flows of {} up to}} & \\multicolumn{{3}}{{c}}{{\\textbf{{Make up \\%}}}} \\\\",
            dimension
        ),
        "\\cmidrule(lr){2-4}".to_string(),
        format!("\\multicolumn{{1}}{{c}}{{({})}} & {} \\\\", dimension.unit(), names.join(" & ")),
        "\\midrule".to_string(),
    ];
    for (row, breakpoint) in dist.breakpoints().iter().enumerate() {
        let cells: Vec<String> = Quantity::ALL
            .iter()
            .map(|&q| match dist.value(row, q) {
                Some(v) => format!("{:.4}", v),
                None => NO_DATA.to_string(),
            })
            .collect();
        s.push(format!("{} & {} \\\\", breakpoint, cells.join(" & ")));
    }
    s.push("\\bottomrule".to_string());
    s.push("\\end{tabular}".to_string());
    s.join("\n")
}

/// Statistics table, then the distribution table, each followed by two blank lines.
pub fn summary(summary: &Summary, info: &DatasetInfo) -> String {
    format!(
        "{}\n\n\n{}\n\n\n",
        stats_table(&summary.stats, info),
        distribution_table(&summary.distribution)
    )
}

fn format_total(total: Total) -> String {
    match total {
        Total::Exact(v) => group_thousands(&v.to_string()),
        Total::Approx(v) => {
            let s = v.to_string();
            match s.find('.') {
                Some(dot) => format!("{}{}", group_thousands(&s[..dot]), &s[dot..]),
                None => group_thousands(&s),
            }
        }
    }
}

// Space-separated groups of three digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
