use crate::table::Counter;

/// Sum of a counter column.
///
/// Integer columns are summed exactly; a column holding any fractional counter is summed
/// as `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Total {
    Exact(u128),
    Approx(f64),
}

impl Total {
    pub fn as_f64(self) -> f64 {
        match self {
            Total::Exact(v) => v as f64,
            Total::Approx(v) => v,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Total::Exact(v) => v == 0,
            Total::Approx(v) => v == 0.0,
        }
    }

    /// `self / denominator`, or `None` when the denominator is zero.
    pub fn ratio(self, denominator: Total) -> Option<f64> {
        if denominator.is_zero() {
            return None;
        }
        match (self, denominator) {
            // Split off the integral part so large totals keep their low digits.
            (Total::Exact(n), Total::Exact(d)) => Some((n / d) as f64 + (n % d) as f64 / d as f64),
            (n, d) => Some(n.as_f64() / d.as_f64()),
        }
    }
}

pub fn total(counters: &[Counter]) -> Total {
    match cumulative_totals(counters).last() {
        Some(t) => *t,
        None => Total::Exact(0),
    }
}

/// Running totals over `counters` in order.
pub fn cumulative(counters: &[Counter]) -> Vec<f64> {
    cumulative_totals(counters).into_iter().map(Total::as_f64).collect()
}

fn cumulative_totals(counters: &[Counter]) -> Vec<Total> {
    let mut sums: Vec<Total> = Vec::with_capacity(counters.len());
    if counters.iter().all(|c| matches!(c, Counter::Int(_))) {
        let mut acc: u128 = 0;
        for c in counters {
            if let Counter::Int(v) = c {
                acc += u128::from(*v);
            }
            sums.push(Total::Exact(acc));
        }
    } else {
        let mut acc: f64 = 0.0;
        for c in counters {
            acc += c.as_f64();
            sums.push(Total::Approx(acc));
        }
    }
    sums
}

/// Empirical CDF of `counters` over their buckets: running totals divided by the grand
/// total. Non-decreasing, ending at exactly 1.0. `None` if the grand total is zero.
pub fn build(counters: &[Counter]) -> Option<Vec<f64>> {
    let sums = cumulative(counters);
    let grand = *sums.last()?;
    if grand == 0.0 {
        return None;
    }
    Some(sums.into_iter().map(|s| s / grand).collect())
}

/// Linear interpolation of the points `(xs[i], ys[i])` at `x`.
///
/// `xs` must be strictly ascending and as long as `ys`. Points outside `[xs[0],
/// xs[n - 1]]` have no value and yield `None`; they are never clamped to the end values.
/// A point equal to a known `xs[i]` yields `ys[i]` exactly.
pub fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    let i = xs.partition_point(|&k| k < x);
    if i == xs.len() {
        return None;
    }
    if xs[i] == x {
        return Some(ys[i]);
    }
    if i == 0 {
        return None;
    }
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}
