use log::{info, warn};

use crate::cdf;
use crate::dimension::{detect_dimension, Dimension, Quantity};
use crate::summarizers::{SummaryError, TableSummarizer};
use crate::table::{AggregatedTable, Counter};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnStatus {
    Computed,
    /// The quantity was not collected.
    Missing,
    /// The quantity's grand total is zero, so it has no distribution.
    ZeroTotal,
}

/// Distribution of one quantity over the buckets.
#[derive(Clone, Debug, PartialEq)]
pub struct CdfColumn {
    pub quantity: Quantity,
    pub status: ColumnStatus,
    /// CDF in percent at each bucket key; empty unless computed.
    pub cdf: Vec<f64>,
    /// CDF in percent at each breakpoint, `None` where there is no data.
    pub percentages: Vec<Option<f64>>,
}

/// Percentages indexed by (breakpoint, quantity).
#[derive(Clone, Debug, PartialEq)]
pub struct DistributionTable {
    dimension: Dimension,
    breakpoints: &'static [u64],
    columns: Vec<CdfColumn>,
}

/// Samples the CDF of each quantity at the breakpoints of a dimension.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistributionSummarizer {
    /// Detected from the bucket keys when `None`.
    pub dimension: Option<Dimension>,
}

impl DistributionSummarizer {
    pub fn new(dimension: Option<Dimension>) -> Self {
        DistributionSummarizer { dimension }
    }
}

impl CdfColumn {
    fn build(
        quantity: Quantity,
        keys: &[f64],
        counters: Option<&[Counter]>,
        points: &[f64],
    ) -> Self {
        let counters = match counters {
            Some(c) => c,
            None => {
                warn!("column {} is missing, reporting no data", quantity.column());
                return CdfColumn::skipped(quantity, ColumnStatus::Missing, points.len());
            }
        };
        let cdf = match cdf::build(counters) {
            Some(cdf) => cdf,
            None => {
                warn!("column {} sums to zero, reporting no data", quantity.column());
                return CdfColumn::skipped(quantity, ColumnStatus::ZeroTotal, points.len());
            }
        };
        let percentages = points
            .iter()
            .map(|&x| cdf::interpolate(keys, &cdf, x).map(|y| y * 100.0))
            .collect();
        CdfColumn {
            quantity,
            status: ColumnStatus::Computed,
            cdf: cdf.into_iter().map(|y| y * 100.0).collect(),
            percentages,
        }
    }

    fn skipped(quantity: Quantity, status: ColumnStatus, npoints: usize) -> Self {
        CdfColumn { quantity, status, cdf: Vec::new(), percentages: vec![None; npoints] }
    }
}

impl DistributionTable {
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Row labels, ascending.
    pub fn breakpoints(&self) -> &'static [u64] {
        self.breakpoints
    }

    /// Columns in quantity order.
    pub fn columns(&self) -> &[CdfColumn] {
        &self.columns
    }

    pub fn column(&self, quantity: Quantity) -> Option<&CdfColumn> {
        self.columns.iter().find(|c| c.quantity == quantity)
    }

    /// Percentage of `quantity` in buckets up to breakpoint number `row`.
    pub fn value(&self, row: usize, quantity: Quantity) -> Option<f64> {
        self.column(quantity).and_then(|c| c.percentages.get(row).copied().flatten())
    }
}

impl TableSummarizer for DistributionSummarizer {
    type Output = DistributionTable;

    fn summarize(&self, table: &AggregatedTable) -> Result<DistributionTable, SummaryError> {
        if table.is_empty() {
            return Err(SummaryError::EmptyTable);
        }
        let dimension = match self.dimension {
            Some(d) => d,
            None => {
                let d = detect_dimension(table.keys())?;
                info!("detected dimension {}", d);
                d
            }
        };
        let breakpoints = dimension.breakpoints();
        let points: Vec<f64> = breakpoints.iter().map(|&b| b as f64).collect();
        let columns = Quantity::ALL
            .iter()
            .map(|&q| CdfColumn::build(q, table.keys(), table.quantity(q), &points))
            .collect();
        Ok(DistributionTable { dimension, breakpoints, columns })
    }
}
