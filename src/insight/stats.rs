use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation over the rows where both values are present.
///
/// Fewer than two complete pairs, or zero variance on either side, yields
/// `0.0` instead of `NaN`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();

    if pairs.len() < 2 {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    cov / denom
}

// ---------------------------------------------------------------------------
// Quantiles
// ---------------------------------------------------------------------------

/// Linear-interpolation quantile of already sorted, `NaN`-free values.
///
/// The position of quantile `q` is `q * (n - 1)`; the result interpolates
/// between the two neighbouring ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Quantiles `qs` of `values`, ignoring `NaN`. `None` if no value is present.
pub fn quantiles(values: &[f64], qs: &[f64]) -> Option<Vec<f64>> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    qs.iter().map(|&q| quantile_sorted(&sorted, q)).collect()
}

// ---------------------------------------------------------------------------
// Group-by
// ---------------------------------------------------------------------------

/// Running aggregate for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupAcc {
    /// Sum of the present values.
    pub sum: f64,
    /// Number of present values.
    pub count: usize,
    /// Number of rows in the group, present value or not.
    pub size: usize,
}

impl GroupAcc {
    fn push(&mut self, value: f64) {
        self.size += 1;
        if !value.is_nan() {
            self.sum += value;
            self.count += 1;
        }
    }

    /// Mean of the present values, `NaN` if there are none.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Group `values` by `keys`. Rows with a missing key are left out.
///
/// Groups iterate in key order.
pub fn group_by<'a>(keys: &'a [Option<String>], values: &[f64]) -> BTreeMap<&'a str, GroupAcc> {
    let mut groups: BTreeMap<&str, GroupAcc> = BTreeMap::new();
    for (key, &value) in keys.iter().zip(values) {
        if let Some(key) = key {
            groups.entry(key.as_str()).or_default().push(value);
        }
    }
    groups
}

/// Key with the largest score. On ties the smallest key wins; `NaN` scores
/// never win.
pub fn arg_max<'a, I>(scored: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut best: Option<(&str, f64)> = None;
    for (key, score) in scored {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((best_key, best_score))
                if score < best_score || (score == best_score && key >= best_key) => {}
            _ => best = Some((key, score)),
        }
    }
    best.map(|(key, _)| key)
}

// ---------------------------------------------------------------------------
// Frequency shares
// ---------------------------------------------------------------------------

/// Percentage share of each distinct present value, most frequent first.
/// Equal counts are ordered by value.
pub fn value_shares(values: &[Option<String>]) -> Vec<(&str, f64)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_default() += 1;
    }
    let total: usize = counts.values().sum();

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // Stable sort keeps the key order from the map for equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .map(|(value, count)| (value, count as f64 / total as f64 * 100.0))
        .collect()
}
