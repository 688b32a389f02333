use crate::cdf::{self, Total};
use crate::dimension::{Dimension, Quantity};
use crate::summarizers::{SummaryError, TableSummarizer};
use crate::table::AggregatedTable;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatKind {
    Total(Quantity),
    AverageFlow(Dimension),
    AveragePacketSize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatValue {
    Total(Total),
    /// `None` when the denominator total is zero.
    Mean(Option<f64>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatRow {
    pub kind: StatKind,
    pub value: Result<StatValue, SummaryError>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatsTable {
    rows: Vec<StatRow>,
}

/// Reduces a table to quantity totals and per-flow averages.
#[derive(Clone, Copy, Debug, Default)]
pub struct AggregateStatsComputer;

impl StatKind {
    pub fn label(&self) -> String {
        match self {
            StatKind::Total(q) => format!("Number of {}", q),
            StatKind::AverageFlow(d) => format!("Average flow {}", d),
            StatKind::AveragePacketSize => "Average packet size".to_string(),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            StatKind::Total(q) => q.name(),
            StatKind::AverageFlow(d) => d.unit(),
            StatKind::AveragePacketSize => "bytes",
        }
    }
}

impl StatsTable {
    /// Totals in quantity order, then averages in dimension order, then packet size.
    pub fn rows(&self) -> &[StatRow] {
        &self.rows
    }

    pub fn get(&self, kind: StatKind) -> Option<&StatRow> {
        self.rows.iter().find(|r| r.kind == kind)
    }
}

impl TableSummarizer for AggregateStatsComputer {
    type Output = StatsTable;

    fn summarize(&self, table: &AggregatedTable) -> Result<StatsTable, SummaryError> {
        if table.is_empty() {
            return Err(SummaryError::EmptyTable);
        }
        let mut rows: Vec<StatRow> = Vec::new();

        for &q in Quantity::ALL.iter() {
            if let Some(counters) = table.quantity(q) {
                rows.push(StatRow {
                    kind: StatKind::Total(q),
                    value: Ok(StatValue::Total(cdf::total(counters))),
                });
            }
        }

        let flows = total_of(table, Quantity::Flows.column());
        for &d in Dimension::ALL.iter() {
            if let Ok(sum) = total_of(table, d.sum_column()) {
                rows.push(StatRow {
                    kind: StatKind::AverageFlow(d),
                    value: flows.clone().map(|f| StatValue::Mean(sum.ratio(f))),
                });
            }
        }

        let packet_size = total_of(table, Quantity::Octets.column()).and_then(|octets| {
            let packets = total_of(table, Quantity::Packets.column())?;
            Ok(StatValue::Mean(octets.ratio(packets)))
        });
        rows.push(StatRow { kind: StatKind::AveragePacketSize, value: packet_size });

        Ok(StatsTable { rows })
    }
}

fn total_of(table: &AggregatedTable, column: &'static str) -> Result<Total, SummaryError> {
    table.column(column).map(cdf::total).ok_or(SummaryError::MissingColumn(column))
}
