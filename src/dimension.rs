use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::summarizers::SummaryError;

/// Countable things whose mass is distributed over the buckets.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Flows,
    Packets,
    Octets,
}

/// Flow attribute the histogram is bucketed by.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Length,
    Size,
    Duration,
    Rate,
}

pub const LENGTH_BREAKPOINTS: [u64; 10] =
    [1, 2, 4, 8, 10, 100, 1_000, 10_000, 100_000, 1_000_000];

pub const BYTE_BREAKPOINTS: [u64; 13] = [
    64,
    128,
    256,
    512,
    1_024,
    1_500,
    4_096,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

// Keys of a duration histogram are seconds; no flow in a summarized capture spans more
// than a day.
const MAX_DURATION_KEY: f64 = 86_400.0;

// Smallest frame a flow can carry, in octets.
const MIN_SIZE_KEY: f64 = 64.0;

impl Quantity {
    pub const ALL: [Quantity; 3] = [Quantity::Flows, Quantity::Packets, Quantity::Octets];

    pub fn name(self) -> &'static str {
        match self {
            Quantity::Flows => "flows",
            Quantity::Packets => "packets",
            Quantity::Octets => "octets",
        }
    }

    /// Name of the counter column holding this quantity.
    pub fn column(self) -> &'static str {
        match self {
            Quantity::Flows => "flows_sum",
            Quantity::Packets => "packets_sum",
            Quantity::Octets => "octets_sum",
        }
    }
}

impl Dimension {
    pub const ALL: [Dimension; 4] =
        [Dimension::Length, Dimension::Size, Dimension::Duration, Dimension::Rate];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Size => "size",
            Dimension::Duration => "duration",
            Dimension::Rate => "rate",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Dimension::Length => "packets",
            Dimension::Size => "octets",
            Dimension::Duration => "seconds",
            Dimension::Rate => "bit/s",
        }
    }

    /// Column holding the per-bucket sum of this dimension over all flows.
    ///
    /// Length and size are counted in packets and octets, so their sums are the
    /// corresponding quantity counters.
    pub fn sum_column(self) -> &'static str {
        match self {
            Dimension::Length => Quantity::Packets.column(),
            Dimension::Size => Quantity::Octets.column(),
            Dimension::Duration => "duration_sum",
            Dimension::Rate => "rate_sum",
        }
    }

    pub fn breakpoints(self) -> &'static [u64] {
        match self {
            Dimension::Length => &LENGTH_BREAKPOINTS,
            Dimension::Size | Dimension::Duration | Dimension::Rate => &BYTE_BREAKPOINTS,
        }
    }

    // `keys` is non-empty, ascending and non-negative.
    fn is_plausible(self, keys: &[f64]) -> bool {
        let min = keys[0];
        let max = keys[keys.len() - 1];
        let integral = keys.iter().all(|k| k.fract() == 0.0);
        match self {
            Dimension::Length => integral && min >= 1.0 && min < MIN_SIZE_KEY,
            Dimension::Size => integral && min >= MIN_SIZE_KEY,
            // integral keys from 1 up to a frame size are lengths, not seconds
            Dimension::Duration => {
                max <= MAX_DURATION_KEY && !Dimension::Length.is_plausible(keys)
            }
            Dimension::Rate => !integral && min > 0.0,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown dimension {0:?}, expected one of length, size, duration, rate")]
pub struct ParseDimensionError(String);

impl FromStr for Dimension {
    type Err = ParseDimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .iter()
            .copied()
            .find(|d| d.name() == s)
            .ok_or_else(|| ParseDimensionError(s.to_string()))
    }
}

/// Infers the dimension of a histogram from its sorted bucket keys.
///
/// Each dimension has a plausibility rule; detection succeeds only when exactly one rule
/// holds. Otherwise the matching candidates, possibly none, are reported and the caller
/// has to name the dimension.
pub fn detect_dimension(keys: &[f64]) -> Result<Dimension, SummaryError> {
    if keys.is_empty() {
        return Err(SummaryError::EmptyTable);
    }
    let candidates: Vec<Dimension> =
        Dimension::ALL.iter().copied().filter(|d| d.is_plausible(keys)).collect();
    match candidates.as_slice() {
        [dimension] => Ok(*dimension),
        _ => Err(SummaryError::AmbiguousDimension { candidates }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(values: &[f64]) -> Vec<f64> {
        values.to_vec()
    }

    #[test]
    fn test_units_and_sum_columns() {
        assert_eq!(Dimension::Length.unit(), "packets");
        assert_eq!(Dimension::Rate.unit(), "bit/s");
        assert_eq!(Dimension::Length.sum_column(), "packets_sum");
        assert_eq!(Dimension::Size.sum_column(), "octets_sum");
        assert_eq!(Dimension::Duration.sum_column(), "duration_sum");
        assert_eq!(Dimension::Rate.sum_column(), "rate_sum");
    }

    #[test]
    fn test_breakpoint_sets() {
        assert_eq!(Dimension::Length.breakpoints().first(), Some(&1));
        assert_eq!(Dimension::Length.breakpoints().last(), Some(&1_000_000));
        for d in [Dimension::Size, Dimension::Duration, Dimension::Rate].iter() {
            assert_eq!(d.breakpoints().first(), Some(&64));
            assert_eq!(d.breakpoints().last(), Some(&1_000_000_000));
        }
        for d in Dimension::ALL.iter() {
            assert!(d.breakpoints().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_parse_dimension() {
        for d in Dimension::ALL.iter() {
            assert_eq!(d.name().parse::<Dimension>().unwrap(), *d);
            assert_eq!(d.to_string(), d.name());
        }
        assert!("width".parse::<Dimension>().is_err());
        assert!("Length".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_detect_unique() {
        let length: Vec<f64> = (1..=200_000).step_by(1000).map(|k| k as f64).collect();
        assert_eq!(detect_dimension(&length).unwrap(), Dimension::Length);

        let size = keys(&[64.0, 128.0, 1500.0, 1e6, 1e9]);
        assert_eq!(detect_dimension(&size).unwrap(), Dimension::Size);

        let duration = keys(&[0.0, 0.25, 1.5, 300.0, 3600.0]);
        assert_eq!(detect_dimension(&duration).unwrap(), Dimension::Duration);

        let rate = keys(&[12.5, 800.0, 1e5, 1e8]);
        assert_eq!(detect_dimension(&rate).unwrap(), Dimension::Rate);
    }

    #[test]
    fn test_detect_short_length_histogram() {
        let length: Vec<f64> = (1..=1000).map(|k| k as f64).collect();
        assert_eq!(detect_dimension(&length).unwrap(), Dimension::Length);
        assert_eq!(detect_dimension(&keys(&[1.0, 2.0, 4.0, 8.0])).unwrap(), Dimension::Length);
        assert_eq!(detect_dimension(&keys(&[63.0, 64.0, 90.0])).unwrap(), Dimension::Length);

        // starting at zero seconds
        let duration = keys(&[0.0, 1.0, 2.0, 60.0]);
        assert_eq!(detect_dimension(&duration).unwrap(), Dimension::Duration);
    }

    #[test]
    fn test_detect_ambiguous() {
        let err = detect_dimension(&keys(&[64.0, 1500.0])).unwrap_err();
        assert_eq!(
            err,
            SummaryError::AmbiguousDimension {
                candidates: vec![Dimension::Size, Dimension::Duration]
            }
        );

        let err = detect_dimension(&keys(&[0.5, 2.5, 10.0])).unwrap_err();
        assert_eq!(
            err,
            SummaryError::AmbiguousDimension {
                candidates: vec![Dimension::Duration, Dimension::Rate]
            }
        );
    }

    #[test]
    fn test_detect_no_candidate() {
        // Integral keys starting at zero beyond a day fit no rule.
        let err = detect_dimension(&keys(&[0.0, 10.0, 100_000.0])).unwrap_err();
        assert_eq!(err, SummaryError::AmbiguousDimension { candidates: vec![] });
        assert_eq!(detect_dimension(&[]).unwrap_err(), SummaryError::EmptyTable);
    }
}
