// ── Median / percentile ───────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using linear
/// interpolation between closest ranks.
///
/// Returns `None` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> Option<f64> {
    if sorted_data.is_empty() {
        return None;
    }
    let len = sorted_data.len();
    if len == 1 {
        return Some(sorted_data[0]);
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted_data[lo]);
    }
    let frac = rank - lo as f64;
    Some(sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo]))
}

/// Median of an unsorted sample; the mean of the two middle values when the
/// count is even. `None` when there is nothing to take the median of.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    percentile(&sorted, 50.0)
}

/// Arithmetic mean; `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

// ── Histogram ─────────────────────────────────────────────────────────────────

/// One equal-width histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Inclusive lower edge.
    pub start: f64,
    /// Exclusive upper edge (inclusive for the last bin).
    pub end: f64,
    pub count: u64,
}

/// Count `values` into `bins` equal-width buckets spanning `range`.
///
/// Values outside `range` are ignored; a value equal to the upper bound lands
/// in the last bucket. A degenerate range (`lo >= hi`) is widened by one unit
/// so a sample of identical values still produces a single populated bucket.
pub fn histogram(values: &[f64], bins: usize, range: (f64, f64)) -> Vec<Bin> {
    let bins = bins.max(1);
    let (lo, mut hi) = range;
    if hi <= lo {
        hi = lo + 1.0;
    }
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &v in values {
        if !v.is_finite() || v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// `(min, max)` of the finite values, or `None` if there are none.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
