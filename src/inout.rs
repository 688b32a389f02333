use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::bufread::GzDecoder;
use log::{debug, info};
use serde::Serialize;

use crate::cdf::Total;
use crate::dimension::Quantity;
use crate::summarizers::distribution::DistributionTable;
use crate::summarizers::stats::{StatValue, StatsTable};
use crate::table::{AggregatedTable, Counter};

mod error;
pub use error::{LoadError, LoadErrorKind};

/// Columns with this suffix hold sums of squares, which no summary reads.
pub const SUM_OF_SQUARES_SUFFIX: &str = "_ssq";

#[derive(Debug, Serialize)]
struct StatOutputRow<'a> {
    label: String,
    value: Option<String>,
    unit: &'a str,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct CdfOutputRow {
    breakpoint: u64,
    flows: Option<f64>,
    packets: Option<f64>,
    octets: Option<f64>,
}

/// Loads a `csv_hist` file, gunzipping it if its name ends in `.gz`.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<AggregatedTable, LoadError> {
    let path = path.as_ref();
    info!("loading file {}", path.display());
    let filerdr = BufReader::new(File::open(path)?);
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(filerdr))
    } else {
        Box::new(filerdr)
    };
    let table = read_table(reader)?;
    info!("loaded file {} with {} buckets", path.display(), table.len());
    Ok(table)
}

/// Reads a `csv_hist` stream: a header row, then one row per bucket with the bucket key
/// in the first column. Sum-of-squares columns are dropped.
pub fn read_table<R: Read>(reader: R) -> Result<AggregatedTable, LoadError> {
    let mut csvrdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csvrdr.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::new(LoadErrorKind::MissingHeader, "no header row".to_string()));
    }
    let kept: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, name)| (i, name.trim()))
        .filter(|(_, name)| !name.ends_with(SUM_OF_SQUARES_SUFFIX))
        .map(|(i, name)| (i, name.to_string()))
        .collect();
    debug!("keeping columns {:?}", kept.iter().map(|(_, n)| n).collect::<Vec<_>>());

    let mut keys: Vec<f64> = Vec::new();
    let mut values: Vec<Vec<Counter>> = vec![Vec::new(); kept.len()];
    for result in csvrdr.records() {
        let record = result?;
        let row = keys.len();
        let field = record.get(0).unwrap_or("");
        let key: f64 = field.trim().parse().map_err(|_| {
            LoadError::new(
                LoadErrorKind::InvalidKey,
                format!("row {}: cannot parse bucket key {:?}", row, field),
            )
        })?;
        keys.push(key);
        for (column, (i, name)) in values.iter_mut().zip(kept.iter()) {
            let field = record.get(*i).unwrap_or("");
            column.push(parse_counter(field).ok_or_else(|| {
                LoadError::new(
                    LoadErrorKind::InvalidValue,
                    format!("row {} column {}: cannot parse counter {:?}", row, name, field),
                )
            })?);
        }
        if (keys.len() % 100_000) == 0 {
            info!("{} rows", keys.len());
        }
    }

    let columns: BTreeMap<String, Vec<Counter>> =
        kept.into_iter().map(|(_, name)| name).zip(values).collect();
    Ok(AggregatedTable::new(keys, columns)?)
}

fn parse_counter(field: &str) -> Option<Counter> {
    let field = field.trim();
    if let Ok(v) = field.parse::<u64>() {
        return Some(Counter::Int(v));
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(Counter::Float(v)),
        _ => None,
    }
}

pub fn dump_stats<P: AsRef<Path>>(stats: &StatsTable, path: P) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in stats.rows() {
        let (value, error) = match &row.value {
            Ok(StatValue::Total(Total::Exact(v))) => (Some(v.to_string()), None),
            Ok(StatValue::Total(Total::Approx(v))) => (Some(v.to_string()), None),
            Ok(StatValue::Mean(m)) => (m.map(|m| m.to_string()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        writer.serialize(StatOutputRow {
            label: row.kind.label(),
            value,
            unit: row.kind.unit(),
            error,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn dump_distribution<P: AsRef<Path>>(
    dist: &DistributionTable,
    path: P,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for (row, &breakpoint) in dist.breakpoints().iter().enumerate() {
        writer.serialize(CdfOutputRow {
            breakpoint,
            flows: dist.value(row, Quantity::Flows),
            packets: dist.value(row, Quantity::Packets),
            octets: dist.value(row, Quantity::Octets),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;
    use crate::dimension::Dimension;
    use crate::summarizers::distribution::DistributionSummarizer;
    use crate::summarizers::stats::AggregateStatsComputer;
    use crate::summarizers::TableSummarizer;

    const HIST: &str = "\
bin_lo,flows_sum,flows_ssq,packets_sum,octets_sum,duration_sum
64,10,100,100,15000,1.5
1500,5,25,50,70000,0.25
";

    #[test]
    fn test_read_table_drops_ssq() {
        let table = read_table(HIST.as_bytes()).unwrap();
        assert_eq!(table.keys(), &[64.0, 1500.0]);
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["duration_sum", "flows_sum", "octets_sum", "packets_sum"]
        );
        assert!(table.column("flows_ssq").is_none());
        let flows = table.quantity(Quantity::Flows).unwrap();
        assert_eq!(flows, &[Counter::Int(10), Counter::Int(5)]);
        assert_eq!(
            table.column("duration_sum").unwrap(),
            &[Counter::Float(1.5), Counter::Float(0.25)]
        );
    }

    #[test]
    fn test_read_table_errors() {
        let err = read_table("bin_lo,flows_sum\nx,1\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::InvalidKey);

        let err = read_table("bin_lo,flows_sum\n1,-3\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::InvalidValue);

        let err = read_table("bin_lo,flows_sum\n1,2,3\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::Csv);

        let err = read_table("bin_lo,flows_sum\n2,1\n1,1\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::Table);

        let err = read_table("".as_bytes()).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::MissingHeader);
    }

    #[test]
    fn test_read_header_only() {
        let table = read_table("bin_lo,flows_sum\n".as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter("42"), Some(Counter::Int(42)));
        assert_eq!(parse_counter(" 7 "), Some(Counter::Int(7)));
        assert_eq!(parse_counter("1.5"), Some(Counter::Float(1.5)));
        assert_eq!(parse_counter("1e3"), Some(Counter::Float(1000.0)));
        assert_eq!(parse_counter("nan"), None);
        assert_eq!(parse_counter("inf"), None);
        assert_eq!(parse_counter(""), None);
    }

    #[test]
    fn test_load_plain_and_gz() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("hist.csv");
        std::fs::write(&plain, HIST).unwrap();
        let gz = dir.path().join("hist.csv.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(HIST.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let from_plain = load_table(&plain).unwrap();
        let from_gz = load_table(&gz).unwrap();
        assert_eq!(from_plain, from_gz);
        assert_eq!(from_plain.len(), 2);

        let err = load_table(dir.path().join("missing.csv")).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::Io);
    }

    #[test]
    fn test_dumps() {
        let table = read_table(HIST.as_bytes()).unwrap();
        let stats = AggregateStatsComputer.summarize(&table).unwrap();
        let dist =
            DistributionSummarizer::new(Some(Dimension::Size)).summarize(&table).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let stats_path = dir.path().join("stats.csv");
        let cdf_path = dir.path().join("cdf.csv");
        dump_stats(&stats, &stats_path).unwrap();
        dump_distribution(&dist, &cdf_path).unwrap();

        let stats_csv = std::fs::read_to_string(&stats_path).unwrap();
        let mut lines = stats_csv.lines();
        assert_eq!(lines.next(), Some("label,value,unit,error"));
        assert_eq!(lines.next(), Some("Number of flows,15,flows,"));
        assert!(stats_csv.contains("Average packet size,566.66"));

        let cdf_csv = std::fs::read_to_string(&cdf_path).unwrap();
        let lines: Vec<&str> = cdf_csv.lines().collect();
        assert_eq!(lines[0], "breakpoint,flows,packets,octets");
        assert_eq!(lines.len(), 1 + dist.breakpoints().len());
        assert!(lines[6].starts_with("1500,100.0,100.0,100.0"));
        assert_eq!(lines[13], "1000000000,,,");
    }
}
