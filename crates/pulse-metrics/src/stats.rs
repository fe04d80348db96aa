//! Order statistics over optional values. `None` entries are skipped, never
//! treated as zero.

/// Collects the defined values and sorts them ascending.
fn sorted_defined<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut defined: Vec<f64> = values.into_iter().flatten().collect();
    defined.sort_by(f64::total_cmp);
    defined
}

/// Median of the defined values; the mean of the two middle values for even
/// counts. `None` when nothing is defined.
#[must_use]
pub fn median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let sorted = sorted_defined(values);
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Quantile `q` in `[0, 1]` of the defined values using linear interpolation
/// between closest ranks. `None` when nothing is defined.
#[must_use]
pub fn percentile<I>(values: I, q: f64) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let sorted = sorted_defined(values);
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    #[allow(clippy::cast_precision_loss)]
    let h = (sorted.len() - 1) as f64 * q;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - h.floor();
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}
