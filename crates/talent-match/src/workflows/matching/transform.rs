//! Distance-to-match transform.
//!
//! A candidate value is scored by how many baseline standard deviations it sits
//! from the baseline mean: every deviation costs 10 points, starting from 100 at
//! the mean and floored at 0. Missing or zero-spread baselines carry no signal and
//! score 0.

/// Points lost per standard deviation of distance from the baseline mean.
pub const POINTS_PER_STD_DEV: f64 = 10.0;

pub const MAX_MATCH: f64 = 100.0;

/// Match score in `[0, 100]` for a single value.
pub fn tv_match(value: f64, mean: Option<f64>, std_dev: Option<f64>) -> f64 {
    match usable_baseline(mean, std_dev) {
        Some((mean, std_dev)) => decay(value, mean, std_dev),
        None => 0.0,
    }
}

/// Element-wise [`tv_match`] over a whole column of values.
pub fn tv_match_batch(values: &[f64], mean: Option<f64>, std_dev: Option<f64>) -> Vec<f64> {
    match usable_baseline(mean, std_dev) {
        Some((mean, std_dev)) => values
            .iter()
            .map(|value| decay(*value, mean, std_dev))
            .collect(),
        None => vec![0.0; values.len()],
    }
}

fn usable_baseline(mean: Option<f64>, std_dev: Option<f64>) -> Option<(f64, f64)> {
    let mean = mean.filter(|value| value.is_finite())?;
    let std_dev = std_dev.filter(|value| value.is_finite() && *value != 0.0)?;
    Some((mean, std_dev))
}

fn decay(value: f64, mean: f64, std_dev: f64) -> f64 {
    let distance = (value - mean).abs() / std_dev * POINTS_PER_STD_DEV;
    (MAX_MATCH - distance).max(0.0)
}

/// Rounds to two decimal places, exact ties to the even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
